//! Error types for the live-background core.

use thiserror::Error;

/// Errors produced while building or resizing a point field.
///
/// Updating and drawing never fail; only construction-time inputs
/// (dimensions, configuration, preset names, colors) are validated.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Width or height was zero, negative, or not finite.
    #[error("invalid dimensions: width and height must be positive and finite")]
    InvalidDimensions,

    /// A configuration value was present but unusable.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParam { name: String, reason: String },

    /// No preset is registered under the requested name.
    #[error("unknown preset: {0}")]
    UnknownPreset(String),

    /// A color string could not be parsed.
    #[error("invalid color: {0}")]
    InvalidColor(String),

    /// Writing an output file failed.
    #[error("i/o error: {0}")]
    Io(String),
}

impl EngineError {
    /// Shorthand for [`EngineError::InvalidParam`].
    pub fn invalid_param(name: &str, reason: impl Into<String>) -> Self {
        EngineError::InvalidParam {
            name: name.to_owned(),
            reason: reason.into(),
        }
    }
}
