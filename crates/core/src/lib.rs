#![deny(unsafe_code)]
//! Core of the live-background point field.
//!
//! Provides [`Point`] and [`PointField`] (generation, per-tick update, draw,
//! resize), the [`Surface`] drawing boundary with an in-memory [`Recorder`],
//! [`FieldConfig`] and named [`Preset`]s, the [`Engine`] trait and the
//! [`Animator`] that hosts drive from their timer and refresh callbacks.

pub mod activation;
pub mod animator;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod generate;
pub mod graph;
pub mod orbit;
pub mod params;
pub mod point;
pub mod preset;
pub mod prng;
pub mod seed;
pub mod surface;

pub use animator::Animator;
pub use color::Srgb;
pub use config::FieldConfig;
pub use engine::Engine;
pub use error::EngineError;
pub use field::PointField;
pub use graph::Connections;
pub use point::Point;
pub use preset::Preset;
pub use prng::Xorshift64;
pub use seed::Seed;
pub use surface::{DrawCommand, Recorder, Surface};
