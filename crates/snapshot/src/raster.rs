//! A [`Surface`] that rasterizes into an RGBA8 buffer.
//!
//! Only what the point field draws is supported: filled circles and 1px
//! stroked line segments. Arcs are always rasterized as full circles and
//! pixels are written opaque, without blending or anti-aliasing. This module
//! has no feature gate so both PNG output and tests can use it.

use live_background_core::error::EngineError;
use live_background_core::{Srgb, Surface};

type Vec2 = (f64, f64);

/// RGBA8 pixel buffer with canvas-like path state.
#[derive(Debug, Clone)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
    background: Option<Srgb>,
    fill_style: Srgb,
    stroke_style: Srgb,
    segments: Vec<(Vec2, Vec2)>,
    circles: Vec<(Vec2, f64)>,
    cursor: Option<Vec2>,
    subpath_start: Option<Vec2>,
}

impl Raster {
    /// A transparent buffer. With a `background`, cleared areas are painted
    /// opaque in that color instead of becoming transparent.
    ///
    /// Returns `EngineError::InvalidDimensions` for zero or overflowing sizes.
    pub fn new(width: usize, height: usize, background: Option<Srgb>) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            pixels: vec![0; len],
            background,
            fill_style: Srgb::BLACK,
            stroke_style: Srgb::BLACK,
            segments: Vec::new(),
            circles: Vec::new(),
            cursor: None,
            subpath_start: None,
        })
    }

    pub fn width_px(&self) -> usize {
        self.width
    }

    pub fn height_px(&self) -> usize {
        self.height
    }

    /// Row-major RGBA8 data, `width * height * 4` bytes.
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    /// RGBA at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Count of pixels with non-zero alpha that differ from the background.
    pub fn painted_pixels(&self) -> usize {
        let bg = self.background.map(|c| {
            let [r, g, b] = c.to_rgb8();
            [r, g, b, 255]
        });
        self.pixels
            .chunks_exact(4)
            .filter(|px| px[3] != 0 && Some([px[0], px[1], px[2], px[3]]) != bg)
            .count()
    }

    fn put(&mut self, x: i64, y: i64, rgba: [u8; 4]) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 4;
        self.pixels[i..i + 4].copy_from_slice(&rgba);
    }

    fn opaque(color: Srgb) -> [u8; 4] {
        let [r, g, b] = color.to_rgb8();
        [r, g, b, 255]
    }

    /// Paints every pixel whose center lies inside the circle.
    fn fill_circle(&mut self, (cx, cy): Vec2, radius: f64, rgba: [u8; 4]) {
        if !(radius > 0.0) {
            return;
        }
        let x0 = (cx - radius).floor() as i64;
        let x1 = (cx + radius).ceil() as i64;
        let y0 = (cy - radius).floor() as i64;
        let y1 = (cy + radius).ceil() as i64;
        let r2 = radius * radius;
        for y in y0.max(0)..=y1.min(self.height as i64 - 1) {
            for x in x0.max(0)..=x1.min(self.width as i64 - 1) {
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.put(x, y, rgba);
                }
            }
        }
    }

    /// 1px DDA line.
    fn draw_line(&mut self, (ax, ay): Vec2, (bx, by): Vec2, rgba: [u8; 4]) {
        let (dx, dy) = (bx - ax, by - ay);
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        if !steps.is_finite() {
            return;
        }
        let n = steps as i64;
        for i in 0..=n {
            let i = i as f64;
            self.put(
                (ax + dx * i / steps).floor() as i64,
                (ay + dy * i / steps).floor() as i64,
                rgba,
            );
        }
    }
}

impl Surface for Raster {
    fn width(&self) -> f64 {
        self.width as f64
    }

    fn height(&self) -> f64 {
        self.height as f64
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let rgba = self.background.map(Self::opaque).unwrap_or([0; 4]);
        let x0 = x.floor().max(0.0) as usize;
        let y0 = y.floor().max(0.0) as usize;
        let x1 = ((x + width).ceil().max(0.0) as usize).min(self.width);
        let y1 = ((y + height).ceil().max(0.0) as usize).min(self.height);
        for row in y0..y1 {
            for col in x0..x1 {
                let i = (row * self.width + col) * 4;
                self.pixels[i..i + 4].copy_from_slice(&rgba);
            }
        }
    }

    fn begin_path(&mut self) {
        self.segments.clear();
        self.circles.clear();
        self.cursor = None;
        self.subpath_start = None;
    }

    fn close_path(&mut self) {
        if let (Some(cursor), Some(start)) = (self.cursor, self.subpath_start) {
            if cursor != start {
                self.segments.push((cursor, start));
            }
            self.cursor = Some(start);
        }
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, _start_angle: f64, end_angle: f64) {
        self.circles.push(((x, y), radius));
        let end = (x + radius * end_angle.cos(), y + radius * end_angle.sin());
        if self.subpath_start.is_none() {
            self.subpath_start = Some(end);
        }
        self.cursor = Some(end);
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.cursor = Some((x, y));
        self.subpath_start = Some((x, y));
    }

    fn line_to(&mut self, x: f64, y: f64) {
        match self.cursor {
            Some(from) => self.segments.push((from, (x, y))),
            None => self.subpath_start = Some((x, y)),
        }
        self.cursor = Some((x, y));
    }

    fn fill(&mut self) {
        let rgba = Self::opaque(self.fill_style);
        let circles = std::mem::take(&mut self.circles);
        for &(center, radius) in &circles {
            self.fill_circle(center, radius, rgba);
        }
        self.circles = circles;
    }

    fn stroke(&mut self) {
        let rgba = Self::opaque(self.stroke_style);
        let segments = std::mem::take(&mut self.segments);
        for &(a, b) in &segments {
            self.draw_line(a, b, rgba);
        }
        self.segments = segments;
    }

    fn fill_style(&self) -> Srgb {
        self.fill_style
    }

    fn set_fill_style(&mut self, color: Srgb) {
        self.fill_style = color;
    }

    fn stroke_style(&self) -> Srgb {
        self.stroke_style
    }

    fn set_stroke_style(&mut self, color: Srgb) {
        self.stroke_style = color;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn new_is_transparent_and_sized() {
        let r = Raster::new(8, 4, None).unwrap();
        assert_eq!(r.data().len(), 8 * 4 * 4);
        assert!(r.data().iter().all(|&b| b == 0));
        assert_eq!((r.width(), r.height()), (8.0, 4.0));
    }

    #[test]
    fn new_rejects_zero_dimensions() {
        assert!(Raster::new(0, 4, None).is_err());
        assert!(Raster::new(4, 0, None).is_err());
        assert!(Raster::new(usize::MAX, 2, None).is_err());
    }

    #[test]
    fn clear_with_background_paints_opaque() {
        let mut r = Raster::new(3, 3, Some(Srgb::from_rgb8(10, 20, 30))).unwrap();
        r.clear_rect(0.0, 0.0, 3.0, 3.0);
        assert_eq!(r.pixel(2, 2), Some([10, 20, 30, 255]));
        assert_eq!(r.painted_pixels(), 0);
    }

    #[test]
    fn filled_circle_covers_its_center() {
        let mut r = Raster::new(20, 20, None).unwrap();
        r.set_fill_style(Srgb::grey(100.0));
        r.begin_path();
        r.arc(10.0, 10.0, 3.0, 0.0, TAU);
        r.close_path();
        r.fill();
        assert_eq!(r.pixel(10, 10), Some([100, 100, 100, 255]));
        assert_eq!(r.pixel(0, 0), Some([0, 0, 0, 0]));
        let painted = r.painted_pixels();
        // Area of a radius-3 disc is about 28 pixels.
        assert!((20..=37).contains(&painted), "painted {painted}");
    }

    #[test]
    fn circle_partly_off_surface_is_clipped() {
        let mut r = Raster::new(10, 10, None).unwrap();
        r.begin_path();
        r.arc(-1.0, 5.0, 3.0, 0.0, TAU);
        r.fill();
        assert!(r.painted_pixels() > 0);
        r.begin_path();
        r.arc(-50.0, -50.0, 3.0, 0.0, TAU);
        r.fill();
    }

    #[test]
    fn stroke_draws_horizontal_segment() {
        let mut r = Raster::new(10, 5, None).unwrap();
        r.set_stroke_style(Srgb::WHITE);
        r.begin_path();
        r.move_to(1.0, 2.0);
        r.line_to(8.0, 2.0);
        r.stroke();
        for x in 1..=8 {
            assert_eq!(r.pixel(x, 2), Some([255, 255, 255, 255]), "x={x}");
        }
        assert_eq!(r.pixel(1, 3), Some([0, 0, 0, 0]));
    }

    #[test]
    fn begin_path_discards_previous_shapes() {
        let mut r = Raster::new(10, 10, None).unwrap();
        r.begin_path();
        r.arc(5.0, 5.0, 2.0, 0.0, TAU);
        r.begin_path();
        r.fill();
        assert_eq!(r.painted_pixels(), 0);
    }

    #[test]
    fn line_to_without_current_point_only_moves() {
        let mut r = Raster::new(10, 10, None).unwrap();
        r.begin_path();
        r.line_to(3.0, 3.0);
        r.stroke();
        assert_eq!(r.painted_pixels(), 0);
    }
}
