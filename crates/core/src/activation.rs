//! Brightness pulses.
//!
//! Every tick a point may be triggered, which adds one second's worth of
//! frames to its counter. While the counter runs the level ramps up toward
//! `max`; once it hits zero the level ramps back down. The rendered color is
//! the rounded level on all three channels.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::prng::Xorshift64;

/// Activation timing, derived together with the tick rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActivationSettings {
    /// Peak greyscale value.
    pub max: f64,
    /// Expected fraction of points triggered per second.
    pub per_second_probability: f64,
    /// Time for a full ramp from 0 to `max`, in milliseconds.
    pub ramp_ms: f64,
    /// Update ticks per second.
    pub fps: f64,
}

impl Default for ActivationSettings {
    fn default() -> Self {
        Self {
            max: 100.0,
            per_second_probability: 0.5,
            ramp_ms: 2000.0,
            fps: 60.0,
        }
    }
}

impl ActivationSettings {
    /// Per-tick trigger probability.
    pub fn trigger_probability(&self) -> f64 {
        self.per_second_probability / self.fps
    }

    /// Level change per tick while ramping.
    pub fn delta_per_frame(&self) -> f64 {
        let ms_per_frame = 1000.0 / self.fps;
        self.max / (self.ramp_ms / ms_per_frame)
    }

    /// Frames added to the counter by one trigger.
    pub fn frames_per_trigger(&self) -> u32 {
        self.fps.round().max(1.0) as u32
    }
}

/// Per-point activation state. `level` stays in `[0, max]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Activation {
    pub level: f64,
    pub counter: u32,
}

impl Activation {
    /// Rolls the per-tick trigger.
    pub fn maybe_trigger(&mut self, settings: &ActivationSettings, rng: &mut Xorshift64) {
        if rng.chance(settings.trigger_probability()) {
            self.trigger(settings);
        }
    }

    pub fn trigger(&mut self, settings: &ActivationSettings) {
        self.counter = self
            .counter
            .saturating_add(settings.frames_per_trigger());
    }

    /// Advances the ramp by one tick.
    pub fn step(&mut self, settings: &ActivationSettings) {
        let delta = settings.delta_per_frame();
        if self.counter > 0 {
            self.counter -= 1;
            if self.level < settings.max {
                self.level += delta;
            }
        } else if self.level > 0.0 {
            self.level -= delta;
        }
        self.level = self.level.clamp(0.0, settings.max);
    }

    pub fn is_active(&self) -> bool {
        self.level > 0.0
    }

    pub fn color(&self) -> Srgb {
        Srgb::grey(self.level)
    }
}
