//! The `Engine` trait: what an animation host drives.
//!
//! The trait is object-safe so hosts can hold `Box<dyn Engine>` and the
//! [`Animator`](crate::animator::Animator) stays generic over it.

use crate::error::EngineError;
use crate::surface::Surface;
use serde_json::Value;

/// A simulation advanced by a timer and drawn onto a [`Surface`].
pub trait Engine {
    /// Advances the simulation by one tick. Cannot fail.
    fn step(&mut self);

    /// Clears `surface` and draws the current state.
    fn render(&self, surface: &mut dyn Surface);

    /// Reacts to a new surface size.
    ///
    /// Returns `EngineError::InvalidDimensions` for zero, negative or
    /// non-finite sizes; the previous state is kept in that case.
    fn resize(&mut self, width: f64, height: f64) -> Result<(), EngineError>;

    /// Current parameter values as a JSON object.
    fn params(&self) -> Value;

    /// Schema describing every parameter, its type, range and default.
    fn param_schema(&self) -> Value;
}
