//! Reproducible description of a background run.
//!
//! A [`Seed`] names the preset, surface size, parameter overrides, PRNG
//! seed and tick count. Two identical seeds produce bit-identical fields.

use crate::error::EngineError;
use crate::field::PointField;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Seed {
    pub preset: String,
    pub width: usize,
    pub height: usize,
    pub params: serde_json::Value,
    pub seed: u64,
    pub ticks: usize,
}

impl Seed {
    /// Empty params (`{}`) and zero ticks.
    pub fn new(preset: &str, width: usize, height: usize, seed: u64) -> Self {
        Self {
            preset: preset.to_string(),
            width,
            height,
            params: serde_json::Value::Object(serde_json::Map::new()),
            seed,
            ticks: 0,
        }
    }

    /// Rejects zero dimensions and overflowing pixel counts.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.width == 0 || self.height == 0 {
            return Err(EngineError::InvalidDimensions);
        }
        self.width
            .checked_mul(self.height)
            .ok_or(EngineError::InvalidDimensions)?;
        Ok(())
    }

    /// Builds the field and advances it `ticks` times.
    pub fn build(&self) -> Result<PointField, EngineError> {
        self.validate()?;
        let mut field = PointField::from_preset(
            &self.preset,
            self.width as f64,
            self.height as f64,
            self.seed,
            &self.params,
        )?;
        for _ in 0..self.ticks {
            field.update();
        }
        Ok(field)
    }
}
