#![deny(unsafe_code)]
//! Offline rendering of a point field: a software [`Raster`] surface and
//! PNG output.
//!
//! Sits between `live-background-core` and the CLI so that the CLI and
//! tests share one way of turning a [`Seed`] into pixels.

pub mod raster;

#[cfg(feature = "png")]
pub mod png;

use live_background_core::{EngineError, PointField, Seed, Srgb};
use tracing::debug;

pub use raster::Raster;

/// Builds the seed's field, advances it, and draws one frame.
pub fn render_seed(
    seed: &Seed,
    background: Option<Srgb>,
) -> Result<(PointField, Raster), EngineError> {
    let field = seed.build()?;
    let mut raster = Raster::new(seed.width, seed.height, background)?;
    field.draw(&mut raster);
    debug!(
        preset = %seed.preset,
        ticks = seed.ticks,
        points = field.points().len(),
        painted = raster.painted_pixels(),
        "rendered snapshot"
    );
    Ok((field, raster))
}
