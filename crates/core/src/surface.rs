//! The drawing boundary: a 2D immediate-mode context over a pixel surface.
//!
//! [`Surface`] mirrors the handful of canvas-2D calls the field needs
//! (clear, path building, arc, fill, stroke, fill/stroke style). The browser
//! host implements it over `CanvasRenderingContext2d`, the snapshot crate
//! over an RGBA buffer, and [`Recorder`] simply logs every call.

use serde::Serialize;

use crate::color::Srgb;

/// Immediate-mode 2D drawing context with queryable pixel size.
///
/// Object safe: the field renders through `&mut dyn Surface`.
pub trait Surface {
    /// Surface width in pixels.
    fn width(&self) -> f64;

    /// Surface height in pixels.
    fn height(&self) -> f64;

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Starts a new path, discarding the current one.
    fn begin_path(&mut self);

    fn close_path(&mut self);

    /// Adds a circular arc centered at `(x, y)` to the current path.
    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64);

    fn move_to(&mut self, x: f64, y: f64);

    fn line_to(&mut self, x: f64, y: f64);

    /// Fills the current path with the fill style.
    fn fill(&mut self);

    /// Strokes the current path with the stroke style.
    fn stroke(&mut self);

    fn fill_style(&self) -> Srgb;

    fn set_fill_style(&mut self, color: Srgb);

    fn stroke_style(&self) -> Srgb;

    fn set_stroke_style(&mut self, color: Srgb);
}

/// One recorded drawing call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    ClearRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    BeginPath,
    ClosePath,
    Arc {
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    MoveTo {
        x: f64,
        y: f64,
    },
    LineTo {
        x: f64,
        y: f64,
    },
    Fill,
    Stroke,
    SetFillStyle {
        color: Srgb,
    },
    SetStrokeStyle {
        color: Srgb,
    },
}

/// A [`Surface`] that draws nothing and records every call in order.
#[derive(Debug, Clone)]
pub struct Recorder {
    width: f64,
    height: f64,
    fill_style: Srgb,
    stroke_style: Srgb,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    /// Canvas defaults: black fill and stroke.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            fill_style: Srgb::BLACK,
            stroke_style: Srgb::BLACK,
            commands: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Drains the recorded commands, keeping the current styles.
    pub fn take_commands(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Number of `fill` calls, i.e. points drawn by the field renderer.
    pub fn fill_count(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Fill))
            .count()
    }
}

impl Surface for Recorder {
    fn width(&self) -> f64 {
        self.width
    }

    fn height(&self) -> f64 {
        self.height
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.commands.push(DrawCommand::ClearRect {
            x,
            y,
            width,
            height,
        });
    }

    fn begin_path(&mut self) {
        self.commands.push(DrawCommand::BeginPath);
    }

    fn close_path(&mut self) {
        self.commands.push(DrawCommand::ClosePath);
    }

    fn arc(&mut self, x: f64, y: f64, radius: f64, start_angle: f64, end_angle: f64) {
        self.commands.push(DrawCommand::Arc {
            x,
            y,
            radius,
            start_angle,
            end_angle,
        });
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::MoveTo { x, y });
    }

    fn line_to(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::LineTo { x, y });
    }

    fn fill(&mut self) {
        self.commands.push(DrawCommand::Fill);
    }

    fn stroke(&mut self) {
        self.commands.push(DrawCommand::Stroke);
    }

    fn fill_style(&self) -> Srgb {
        self.fill_style
    }

    fn set_fill_style(&mut self, color: Srgb) {
        self.fill_style = color;
        self.commands.push(DrawCommand::SetFillStyle { color });
    }

    fn stroke_style(&self) -> Srgb {
        self.stroke_style
    }

    fn set_stroke_style(&mut self, color: Srgb) {
        self.stroke_style = color;
        self.commands.push(DrawCommand::SetStrokeStyle { color });
    }
}
