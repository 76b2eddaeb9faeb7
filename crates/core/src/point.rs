//! A single particle of the background.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;

/// A 2D particle.
///
/// `mass` is fixed at creation. It is the drawn radius and the inverse
/// scale of the orbit velocity, so heavy points are big and slow.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub position: DVec2,
    pub velocity: DVec2,
    mass: f64,
    pub activation: Activation,
}

impl Point {
    /// A resting, unactivated point.
    pub fn new(position: DVec2, mass: f64) -> Self {
        Self {
            position,
            velocity: DVec2::ZERO,
            mass,
            activation: Activation::default(),
        }
    }

    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// Explicit Euler step: `position += velocity`.
    pub fn integrate(&mut self) {
        self.position += self.velocity;
    }
}
