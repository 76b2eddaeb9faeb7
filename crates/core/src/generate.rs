//! Point generation: jittered grid or uniform scatter, plus the optional
//! grid connection pass.

use glam::DVec2;
use std::collections::HashMap;
use tracing::debug;

use crate::config::{FieldConfig, GridExtent, Layout, MassSampling};
use crate::graph::Connections;
use crate::point::Point;
use crate::prng::Xorshift64;

/// Output of [`generate`]: points in generation order and their edges.
#[derive(Debug, Clone, Default)]
pub struct Generated {
    pub points: Vec<Point>,
    pub connections: Connections,
}

/// Upper bound on the up-front reservation; larger fields grow on demand.
const INITIAL_CAPACITY: usize = 1 << 16;

/// The square lattice a grid layout iterates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lattice {
    pub cols: usize,
    pub rows: usize,
    /// Top-left corner of the first cell.
    pub origin: DVec2,
    pub spacing: f64,
}

impl Lattice {
    /// Lattice for a `width x height` surface, centered on it.
    pub fn new(width: f64, height: f64, spacing: f64, extent: GridExtent) -> Self {
        let count = |len: f64| (len / spacing).floor().max(0.0) as usize;
        let (cols, rows) = match extent {
            GridExtent::Surface => (count(width), count(height)),
            GridExtent::Square => {
                let n = count(width.max(height));
                (n, n)
            }
        };
        let origin = DVec2::new(
            (width - cols as f64 * spacing) / 2.0,
            (height - rows as f64 * spacing) / 2.0,
        );
        Self {
            cols,
            rows,
            origin,
            spacing,
        }
    }

    /// Number of cells considered, saturating on huge lattices.
    pub fn cell_count(&self) -> usize {
        self.cols.saturating_mul(self.rows)
    }

    pub fn cell_center(&self, col: usize, row: usize) -> DVec2 {
        self.origin + DVec2::new(col as f64 + 0.5, row as f64 + 0.5) * self.spacing
    }
}

/// Builds the point set for a `width x height` surface.
pub fn generate(width: f64, height: f64, config: &FieldConfig, rng: &mut Xorshift64) -> Generated {
    let generated = match config.layout {
        Layout::Grid => jittered_grid(width, height, config, rng),
        Layout::Scatter => scatter(width, height, config, rng),
    };
    debug!(
        layout = config.layout.as_str(),
        width,
        height,
        points = generated.points.len(),
        edges = generated.connections.edge_count(),
        "generated point field"
    );
    generated
}

fn point_cap(config: &FieldConfig) -> usize {
    if config.max_points == 0 {
        usize::MAX
    } else {
        config.max_points
    }
}

/// Draws a mass in `[min_mass, max_mass)`.
pub fn sample_mass(config: &FieldConfig, rng: &mut Xorshift64) -> f64 {
    let mass = rng.next_range(config.min_mass, config.max_mass);
    match config.mass_sampling {
        MassSampling::Uniform => mass,
        MassSampling::Floored => mass.floor().max(config.min_mass),
    }
}

fn jittered_grid(width: f64, height: f64, config: &FieldConfig, rng: &mut Xorshift64) -> Generated {
    let lattice = Lattice::new(width, height, config.spacing, config.grid_extent);
    let cap = point_cap(config);
    let mut points = Vec::with_capacity(lattice.cell_count().min(cap).min(INITIAL_CAPACITY));
    // Occupied cells only, in column-major order, so memory follows the
    // point count rather than the lattice size.
    let mut placed: Vec<(usize, usize)> = Vec::with_capacity(points.capacity());

    'cells: for col in 0..lattice.cols {
        for row in 0..lattice.rows {
            if points.len() >= cap {
                break 'cells;
            }
            if config.skip_probability > 0.0 && rng.chance(config.skip_probability) {
                continue;
            }
            let jitter = DVec2::new(rng.jitter(config.deviation), rng.jitter(config.deviation));
            let mass = sample_mass(config, rng);
            placed.push((col, row));
            points.push(Point::new(lattice.cell_center(col, row) + jitter, mass));
        }
    }

    let mut connections = Connections::new(points.len());
    if config.connection_probability > 0.0 {
        connect_backward(&placed, config, rng, &mut connections);
    }
    Generated {
        points,
        connections,
    }
}

/// Links each grid point to its left, top and top-left neighbors.
///
/// Looking only backward produces each undirected edge at most once.
/// `placed[i]` is the `(col, row)` cell of point `i`.
fn connect_backward(
    placed: &[(usize, usize)],
    config: &FieldConfig,
    rng: &mut Xorshift64,
    connections: &mut Connections,
) {
    let cells: HashMap<(usize, usize), usize> = placed
        .iter()
        .enumerate()
        .map(|(i, &cell)| (cell, i))
        .collect();
    let full = |c: &Connections, i: usize| {
        config.max_connections != 0 && c.degree(i) >= config.max_connections
    };
    for (here, &(col, row)) in placed.iter().enumerate() {
        let backward = [
            (col.checked_sub(1), Some(row)),
            (Some(col), row.checked_sub(1)),
            (col.checked_sub(1), row.checked_sub(1)),
        ];
        for (c, r) in backward {
            let (Some(c), Some(r)) = (c, r) else {
                continue;
            };
            let Some(&there) = cells.get(&(c, r)) else {
                continue;
            };
            if !rng.chance(config.connection_probability) {
                continue;
            }
            if full(connections, here) || full(connections, there) {
                continue;
            }
            connections.connect(here, there);
        }
    }
}

fn scatter(width: f64, height: f64, config: &FieldConfig, rng: &mut Xorshift64) -> Generated {
    let count = config.scatter_count.min(point_cap(config));
    let points: Vec<Point> = (0..count)
        .map(|_| {
            let position = DVec2::new(rng.next_range(0.0, width), rng.next_range(0.0, height));
            Point::new(position, sample_mass(config, rng))
        })
        .collect();
    Generated {
        connections: Connections::new(points.len()),
        points,
    }
}
