//! Undirected connections between points, keyed by point index.

/// Symmetric adjacency list. Edges are only ever added; the whole structure
/// is dropped when the field regenerates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Connections {
    adjacency: Vec<Vec<usize>>,
    edge_count: usize,
}

impl Connections {
    /// Empty adjacency for `len` points.
    pub fn new(len: usize) -> Self {
        Self {
            adjacency: vec![Vec::new(); len],
            edge_count: 0,
        }
    }

    /// Number of points covered.
    pub fn len(&self) -> usize {
        self.adjacency.len()
    }

    /// True when no points are covered.
    pub fn is_empty(&self) -> bool {
        self.adjacency.is_empty()
    }

    pub fn has_edges(&self) -> bool {
        self.edge_count > 0
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Adds the undirected edge `a - b`.
    ///
    /// Returns false for self-loops, duplicates, and out-of-range indices.
    pub fn connect(&mut self, a: usize, b: usize) -> bool {
        if a == b || a >= self.len() || b >= self.len() || self.are_connected(a, b) {
            return false;
        }
        self.adjacency[a].push(b);
        self.adjacency[b].push(a);
        self.edge_count += 1;
        true
    }

    pub fn neighbors(&self, i: usize) -> &[usize] {
        self.adjacency.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn degree(&self, i: usize) -> usize {
        self.neighbors(i).len()
    }

    pub fn are_connected(&self, a: usize, b: usize) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Every undirected edge exactly once, as `(low, high)`.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.adjacency.iter().enumerate().flat_map(|(i, ns)| {
            ns.iter()
                .copied()
                .filter(move |&j| j > i)
                .map(move |j| (i, j))
        })
    }
}
