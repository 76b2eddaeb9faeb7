//! PNG output of a [`Raster`].
//!
//! Feature-gated behind `png` (default on) so that builds which only need
//! the raster surface do not pull in the `image` crate.

use live_background_core::error::EngineError;
use std::path::Path;

use crate::raster::Raster;

/// Writes the raster as an RGBA PNG.
///
/// Returns `EngineError::InvalidDimensions` if the size overflows `u32`,
/// or `EngineError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), EngineError> {
    let w = u32::try_from(raster.width_px()).map_err(|_| EngineError::InvalidDimensions)?;
    let h = u32::try_from(raster.height_px()).map_err(|_| EngineError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, raster.data().to_vec())
        .ok_or_else(|| EngineError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| EngineError::Io(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use live_background_core::{Srgb, Surface};

    #[test]
    fn write_png_round_trip() {
        let mut raster = Raster::new(16, 12, Some(Srgb::BLACK)).unwrap();
        raster.clear_rect(0.0, 0.0, 16.0, 12.0);
        raster.set_fill_style(Srgb::WHITE);
        raster.begin_path();
        raster.arc(8.0, 6.0, 2.0, 0.0, std::f64::consts::TAU);
        raster.fill();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame.png");
        write_png(&raster, &path).unwrap();

        let img = image::open(&path).unwrap().to_rgba8();
        assert_eq!((img.width(), img.height()), (16, 12));
        assert_eq!(img.get_pixel(8, 6).0, [255, 255, 255, 255]);
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn write_png_to_missing_directory_is_io_error() {
        let raster = Raster::new(2, 2, None).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("frame.png");
        assert!(matches!(write_png(&raster, &path), Err(EngineError::Io(_))));
    }
}
