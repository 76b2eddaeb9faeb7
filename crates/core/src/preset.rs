//! Named configurations, one per iteration of the background.

use crate::color::Srgb;
use crate::config::{FieldConfig, GridExtent, Layout, MassSampling, ResizePolicy, Schedule};
use crate::error::EngineError;

const PRESET_NAMES: &[&str] = &["orbital", "constellation", "drift"];

/// A named starting configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Square jittered grid orbiting the center with random greyscale
    /// pulses; only the center moves on resize.
    Orbital,
    /// Static jittered grid linked to its left, top and top-left
    /// neighbors; rebuilt on resize.
    Constellation,
    /// Uniform scatter drifting around the center; rebuilt on resize.
    Drift,
}

impl Preset {
    /// Looks a preset up by name.
    ///
    /// Returns `EngineError::UnknownPreset` if the name is not recognized.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "orbital" => Ok(Preset::Orbital),
            "constellation" => Ok(Preset::Constellation),
            "drift" => Ok(Preset::Drift),
            _ => Err(EngineError::UnknownPreset(name.to_string())),
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        PRESET_NAMES
    }

    pub fn name(self) -> &'static str {
        match self {
            Preset::Orbital => "orbital",
            Preset::Constellation => "constellation",
            Preset::Drift => "drift",
        }
    }

    pub fn config(self) -> FieldConfig {
        match self {
            Preset::Orbital => FieldConfig {
                layout: Layout::Grid,
                grid_extent: GridExtent::Square,
                spacing: 30.0,
                deviation: 40.0,
                min_mass: 1.0,
                max_mass: 2.5,
                mass_sampling: MassSampling::Floored,
                orbit: true,
                activation: true,
                resize: ResizePolicy::Recenter,
                schedule: Schedule::Split,
                ..FieldConfig::default()
            },
            Preset::Constellation => FieldConfig {
                layout: Layout::Grid,
                grid_extent: GridExtent::Surface,
                spacing: 60.0,
                deviation: 30.0,
                min_mass: 1.0,
                max_mass: 3.0,
                skip_probability: 0.1,
                connection_probability: 0.65,
                max_connections: 4,
                orbit: false,
                activation: false,
                resize: ResizePolicy::Regenerate,
                schedule: Schedule::Fused,
                fill_color: Srgb::from_rgb8(200, 200, 200),
                stroke_color: Srgb::from_rgb8(70, 70, 70),
                ..FieldConfig::default()
            },
            Preset::Drift => FieldConfig {
                layout: Layout::Scatter,
                scatter_count: 150,
                min_mass: 0.5,
                max_mass: 3.0,
                orbit: true,
                activation: false,
                resize: ResizePolicy::Regenerate,
                schedule: Schedule::Fused,
                fill_color: Srgb::from_rgb8(180, 180, 180),
                ..FieldConfig::default()
            },
        }
    }
}
