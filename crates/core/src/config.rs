//! Field configuration: layout, mass, connections, motion, activation and
//! scheduling knobs.
//!
//! A configuration is fixed once the field is built. It starts from a preset
//! (see [`crate::preset`]) and may be overridden from a JSON object, which
//! is how seed files and the CLI `--params` flag feed it.

use serde_json::{json, Value};

use crate::activation::ActivationSettings;
use crate::color::Srgb;
use crate::error::EngineError;
use crate::params::{param_bool, param_f64, param_string, param_usize};

/// Smallest lattice spacing in pixels.
pub const MIN_SPACING: f64 = 1.0;

/// Largest point count the scatter layout accepts.
pub const MAX_SCATTER_COUNT: usize = 100_000;

/// How points are placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// One jittered point per lattice cell.
    Grid,
    /// A fixed number of points uniform over the surface.
    Scatter,
}

/// Which region the lattice covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridExtent {
    /// `floor(W/S) x floor(H/S)` cells, centered on the surface.
    Surface,
    /// A square of side `max(W, H)` centered on the surface, overhanging
    /// the shorter axis.
    Square,
}

/// How a mass is drawn from `[min_mass, max_mass)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MassSampling {
    Uniform,
    /// Uniform then floored, never below `min_mass`.
    Floored,
}

/// What a surface resize does to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizePolicy {
    /// Drop all points and connections and generate a new field.
    Regenerate,
    /// Keep the points; only move the orbit center.
    Recenter,
}

/// How updating and drawing are driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Physics on a fixed-rate timer, drawing on the display refresh.
    Split,
    /// One fixed-rate timer both updates and draws.
    Fused,
}

macro_rules! string_enum {
    ($ty:ident { $($variant:ident => $name:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $name,)+
                }
            }

            pub fn names() -> &'static [&'static str] {
                &[$($name),+]
            }

            fn parse(key: &str, value: &str) -> Result<Self, EngineError> {
                match value {
                    $($name => Ok($ty::$variant),)+
                    other => Err(EngineError::invalid_param(
                        key,
                        format!("unknown value '{other}', expected one of {:?}", Self::names()),
                    )),
                }
            }
        }
    };
}

string_enum!(Layout { Grid => "grid", Scatter => "scatter" });
string_enum!(GridExtent { Surface => "surface", Square => "square" });
string_enum!(MassSampling { Uniform => "uniform", Floored => "floored" });
string_enum!(ResizePolicy { Regenerate => "regenerate", Recenter => "recenter" });
string_enum!(Schedule { Split => "split", Fused => "fused" });

/// Everything that shapes a point field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldConfig {
    pub layout: Layout,
    /// Point count for [`Layout::Scatter`].
    pub scatter_count: usize,
    pub grid_extent: GridExtent,
    /// Lattice spacing in pixels.
    pub spacing: f64,
    /// Full width of the positional jitter; offsets are `+/- deviation / 2`.
    pub deviation: f64,
    pub min_mass: f64,
    pub max_mass: f64,
    pub mass_sampling: MassSampling,
    /// Probability of leaving a lattice cell empty.
    pub skip_probability: f64,
    /// Probability of linking a grid point to each backward neighbor.
    pub connection_probability: f64,
    /// Per-point edge cap, 0 for none.
    pub max_connections: usize,
    /// Point cap, 0 for none.
    pub max_points: usize,
    pub orbit: bool,
    pub activation: bool,
    pub activation_max: f64,
    pub activation_per_second: f64,
    pub activation_ramp_ms: f64,
    /// Update ticks per second.
    pub fps: f64,
    pub resize: ResizePolicy,
    pub schedule: Schedule,
    /// Point color when activation is off.
    pub fill_color: Srgb,
    /// Connection line color.
    pub stroke_color: Srgb,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            layout: Layout::Grid,
            scatter_count: 150,
            grid_extent: GridExtent::Surface,
            spacing: 30.0,
            deviation: 40.0,
            min_mass: 1.0,
            max_mass: 2.5,
            mass_sampling: MassSampling::Uniform,
            skip_probability: 0.0,
            connection_probability: 0.0,
            max_connections: 0,
            max_points: 0,
            orbit: true,
            activation: true,
            activation_max: 100.0,
            activation_per_second: 0.5,
            activation_ramp_ms: 2000.0,
            fps: 60.0,
            resize: ResizePolicy::Recenter,
            schedule: Schedule::Split,
            fill_color: Srgb::WHITE,
            stroke_color: Srgb::from_rgb8(60, 60, 60),
        }
    }
}

impl FieldConfig {
    /// Applies the overrides in `params` on top of `base` and validates.
    ///
    /// Missing keys and keys of the wrong JSON type keep the base value.
    /// Enum and color strings that do not parse are errors.
    pub fn from_json(base: &FieldConfig, params: &Value) -> Result<Self, EngineError> {
        let color = |key: &str, current: Srgb| -> Result<Srgb, EngineError> {
            match params.get(key).and_then(Value::as_str) {
                Some(s) => Srgb::from_hex(s),
                None => Ok(current),
            }
        };
        let config = Self {
            layout: Layout::parse(
                "layout",
                &param_string(params, "layout", base.layout.as_str()),
            )?,
            scatter_count: param_usize(params, "scatter_count", base.scatter_count),
            grid_extent: GridExtent::parse(
                "grid_extent",
                &param_string(params, "grid_extent", base.grid_extent.as_str()),
            )?,
            spacing: param_f64(params, "spacing", base.spacing),
            deviation: param_f64(params, "deviation", base.deviation),
            min_mass: param_f64(params, "min_mass", base.min_mass),
            max_mass: param_f64(params, "max_mass", base.max_mass),
            mass_sampling: MassSampling::parse(
                "mass_sampling",
                &param_string(params, "mass_sampling", base.mass_sampling.as_str()),
            )?,
            skip_probability: param_f64(params, "skip_probability", base.skip_probability),
            connection_probability: param_f64(
                params,
                "connection_probability",
                base.connection_probability,
            ),
            max_connections: param_usize(params, "max_connections", base.max_connections),
            max_points: param_usize(params, "max_points", base.max_points),
            orbit: param_bool(params, "orbit", base.orbit),
            activation: param_bool(params, "activation", base.activation),
            activation_max: param_f64(params, "activation_max", base.activation_max),
            activation_per_second: param_f64(
                params,
                "activation_per_second",
                base.activation_per_second,
            ),
            activation_ramp_ms: param_f64(params, "activation_ramp_ms", base.activation_ramp_ms),
            fps: param_f64(params, "fps", base.fps),
            resize: ResizePolicy::parse(
                "resize",
                &param_string(params, "resize", base.resize.as_str()),
            )?,
            schedule: Schedule::parse(
                "schedule",
                &param_string(params, "schedule", base.schedule.as_str()),
            )?,
            fill_color: color("fill_color", base.fill_color)?,
            stroke_color: color("stroke_color", base.stroke_color)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Checks ranges that generation and update rely on.
    pub fn validate(&self) -> Result<(), EngineError> {
        let finite = [
            ("spacing", self.spacing),
            ("deviation", self.deviation),
            ("min_mass", self.min_mass),
            ("max_mass", self.max_mass),
            ("skip_probability", self.skip_probability),
            ("connection_probability", self.connection_probability),
            ("activation_max", self.activation_max),
            ("activation_per_second", self.activation_per_second),
            ("activation_ramp_ms", self.activation_ramp_ms),
            ("fps", self.fps),
        ];
        if let Some((name, _)) = finite.iter().find(|(_, v)| !v.is_finite()) {
            return Err(EngineError::invalid_param(name, "must be finite"));
        }
        if self.spacing < MIN_SPACING {
            return Err(EngineError::invalid_param(
                "spacing",
                format!("must be at least {MIN_SPACING}"),
            ));
        }
        if self.scatter_count > MAX_SCATTER_COUNT {
            return Err(EngineError::invalid_param(
                "scatter_count",
                format!("must not exceed {MAX_SCATTER_COUNT}"),
            ));
        }
        if self.deviation < 0.0 {
            return Err(EngineError::invalid_param("deviation", "must not be negative"));
        }
        if self.min_mass <= 0.0 {
            return Err(EngineError::invalid_param("min_mass", "must be positive"));
        }
        if self.max_mass <= self.min_mass {
            return Err(EngineError::invalid_param(
                "max_mass",
                format!("must exceed min_mass ({})", self.min_mass),
            ));
        }
        for (name, p) in [
            ("skip_probability", self.skip_probability),
            ("connection_probability", self.connection_probability),
            ("activation_per_second", self.activation_per_second),
        ] {
            if !(0.0..=1.0).contains(&p) {
                return Err(EngineError::invalid_param(name, "must lie in [0, 1]"));
            }
        }
        if self.activation_max <= 0.0 || self.activation_max > 255.0 {
            return Err(EngineError::invalid_param(
                "activation_max",
                "must lie in (0, 255]",
            ));
        }
        if self.activation_ramp_ms <= 0.0 {
            return Err(EngineError::invalid_param(
                "activation_ramp_ms",
                "must be positive",
            ));
        }
        if self.fps <= 0.0 {
            return Err(EngineError::invalid_param("fps", "must be positive"));
        }
        Ok(())
    }

    pub fn activation_settings(&self) -> ActivationSettings {
        ActivationSettings {
            max: self.activation_max,
            per_second_probability: self.activation_per_second,
            ramp_ms: self.activation_ramp_ms,
            fps: self.fps,
        }
    }

    /// Milliseconds between update ticks.
    pub fn tick_interval_ms(&self) -> f64 {
        1000.0 / self.fps
    }

    /// Current values, using the same keys [`FieldConfig::from_json`] reads.
    pub fn to_json(&self) -> Value {
        json!({
            "layout": self.layout.as_str(),
            "scatter_count": self.scatter_count,
            "grid_extent": self.grid_extent.as_str(),
            "spacing": self.spacing,
            "deviation": self.deviation,
            "min_mass": self.min_mass,
            "max_mass": self.max_mass,
            "mass_sampling": self.mass_sampling.as_str(),
            "skip_probability": self.skip_probability,
            "connection_probability": self.connection_probability,
            "max_connections": self.max_connections,
            "max_points": self.max_points,
            "orbit": self.orbit,
            "activation": self.activation,
            "activation_max": self.activation_max,
            "activation_per_second": self.activation_per_second,
            "activation_ramp_ms": self.activation_ramp_ms,
            "fps": self.fps,
            "resize": self.resize.as_str(),
            "schedule": self.schedule.as_str(),
            "fill_color": self.fill_color.to_hex(),
            "stroke_color": self.stroke_color.to_hex(),
        })
    }

    /// Describes every key: type, default (this config's value), range and
    /// a short description.
    pub fn schema(&self) -> Value {
        fn number(default: f64, min: f64, max: f64, description: &str) -> Value {
            json!({"type": "number", "default": default, "min": min, "max": max, "description": description})
        }
        fn integer(default: usize, description: &str) -> Value {
            json!({"type": "integer", "default": default, "min": 0, "description": description})
        }
        fn bounded(default: usize, max: usize, description: &str) -> Value {
            json!({"type": "integer", "default": default, "min": 0, "max": max, "description": description})
        }
        fn boolean(default: bool, description: &str) -> Value {
            json!({"type": "boolean", "default": default, "description": description})
        }
        fn choice(default: &str, values: &[&str], description: &str) -> Value {
            json!({"type": "string", "default": default, "values": values, "description": description})
        }
        fn color(default: Srgb, description: &str) -> Value {
            json!({"type": "color", "default": default.to_hex(), "description": description})
        }

        json!({
            "layout": choice(self.layout.as_str(), Layout::names(), "Jittered grid or uniform scatter"),
            "scatter_count": bounded(self.scatter_count, MAX_SCATTER_COUNT, "Point count for the scatter layout"),
            "grid_extent": choice(self.grid_extent.as_str(), GridExtent::names(), "Lattice covers the surface or a centered square of the longer side"),
            "spacing": number(self.spacing, MIN_SPACING, 500.0, "Pixels between lattice cells"),
            "deviation": number(self.deviation, 0.0, 500.0, "Full width of positional jitter"),
            "min_mass": number(self.min_mass, 0.1, 50.0, "Smallest mass (radius)"),
            "max_mass": number(self.max_mass, 0.1, 50.0, "Exclusive upper mass bound"),
            "mass_sampling": choice(self.mass_sampling.as_str(), MassSampling::names(), "Uniform masses or floored to whole pixels"),
            "skip_probability": number(self.skip_probability, 0.0, 1.0, "Chance of leaving a lattice cell empty"),
            "connection_probability": number(self.connection_probability, 0.0, 1.0, "Chance of linking to each left/top/top-left grid neighbor"),
            "max_connections": integer(self.max_connections, "Per-point edge cap, 0 for none"),
            "max_points": integer(self.max_points, "Point cap, 0 for none"),
            "orbit": boolean(self.orbit, "Drift around the surface center"),
            "activation": boolean(self.activation, "Random greyscale pulses; points are hidden while dark"),
            "activation_max": number(self.activation_max, 1.0, 255.0, "Peak grey value"),
            "activation_per_second": number(self.activation_per_second, 0.0, 1.0, "Fraction of points triggered per second"),
            "activation_ramp_ms": number(self.activation_ramp_ms, 1.0, 60000.0, "Milliseconds for a full ramp"),
            "fps": number(self.fps, 1.0, 240.0, "Update ticks per second"),
            "resize": choice(self.resize.as_str(), ResizePolicy::names(), "Regenerate the field or only move the center on resize"),
            "schedule": choice(self.schedule.as_str(), Schedule::names(), "Separate update timer and redraw callback, or one fused timer"),
            "fill_color": color(self.fill_color, "Point color when activation is off"),
            "stroke_color": color(self.stroke_color, "Connection line color"),
        })
    }
}
