//! Drives an [`Engine`] from a host's timer and display-refresh callbacks.
//!
//! The animator owns the engine; the host holds the animator (in the
//! browser as `Rc<RefCell<Animator<_>>>`) and forwards its callbacks. Every
//! callback runs to completion on the single host thread, so a resize can
//! never interleave with an update or a draw.

use tracing::debug;

use crate::config::Schedule;
use crate::engine::Engine;
use crate::error::EngineError;
use crate::field::PointField;
use crate::surface::Surface;

/// Owns an engine and decides what each host callback does.
#[derive(Debug)]
pub struct Animator<E: Engine> {
    engine: E,
    schedule: Schedule,
    tick_interval_ms: f64,
    running: bool,
    ticks: u64,
    frames: u64,
}

impl<E: Engine> Animator<E> {
    /// `fps` sets the fixed tick rate of the update timer.
    pub fn new(engine: E, schedule: Schedule, fps: f64) -> Self {
        Self {
            engine,
            schedule,
            tick_interval_ms: 1000.0 / fps,
            running: true,
            ticks: 0,
            frames: 0,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Period of the update timer.
    pub fn tick_interval_ms(&self) -> f64 {
        self.tick_interval_ms
    }

    /// Whether the host should keep a display-refresh loop going.
    pub fn wants_frames(&self) -> bool {
        self.running && self.schedule == Schedule::Split
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Timer callback: one update, plus a redraw when fused.
    pub fn on_tick(&mut self, surface: &mut dyn Surface) {
        if !self.running {
            return;
        }
        self.engine.step();
        self.ticks += 1;
        if self.schedule == Schedule::Fused {
            self.engine.render(surface);
            self.frames += 1;
        }
    }

    /// Display-refresh callback: redraws the current state when split.
    pub fn on_frame(&mut self, surface: &mut dyn Surface) {
        if !self.wants_frames() {
            return;
        }
        self.engine.render(surface);
        self.frames += 1;
    }

    /// Forwards a new surface size; ignored once stopped.
    pub fn on_resize(&mut self, width: f64, height: f64) -> Result<(), EngineError> {
        if !self.running {
            return Ok(());
        }
        self.engine.resize(width, height)
    }

    /// Turns every later callback into a no-op. Hosts should also cancel
    /// their timers once this is called.
    pub fn stop(&mut self) {
        if self.running {
            debug!(ticks = self.ticks, frames = self.frames, "animator stopped");
        }
        self.running = false;
    }
}

impl Animator<PointField> {
    /// Takes schedule and tick rate from the field's configuration.
    pub fn for_field(field: PointField) -> Self {
        let schedule = field.config().schedule;
        let fps = field.config().fps;
        Self::new(field, schedule, fps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::preset::Preset;
    use crate::surface::{DrawCommand, Recorder};

    fn field(schedule: Schedule) -> PointField {
        let config = FieldConfig {
            schedule,
            ..Preset::Drift.config()
        };
        PointField::new(300.0, 300.0, 7, config).unwrap()
    }

    fn clears(rec: &Recorder) -> usize {
        rec.commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::ClearRect { .. }))
            .count()
    }

    #[test]
    fn split_ticks_update_and_frames_draw() {
        let mut animator = Animator::for_field(field(Schedule::Split));
        let mut rec = Recorder::new(300.0, 300.0);
        let start = animator.engine().points()[0].position;
        animator.on_tick(&mut rec);
        assert_eq!(clears(&rec), 0, "split ticks must not draw");
        assert_ne!(animator.engine().points()[0].position, start);
        animator.on_frame(&mut rec);
        animator.on_frame(&mut rec);
        assert_eq!(clears(&rec), 2);
        assert_eq!((animator.ticks(), animator.frames()), (1, 2));
    }

    #[test]
    fn fused_ticks_update_and_draw() {
        let mut animator = Animator::for_field(field(Schedule::Fused));
        let mut rec = Recorder::new(300.0, 300.0);
        animator.on_tick(&mut rec);
        animator.on_frame(&mut rec);
        assert_eq!(clears(&rec), 1, "fused frames are drawn by the tick only");
        assert_eq!((animator.ticks(), animator.frames()), (1, 1));
        assert!(!animator.wants_frames());
    }

    #[test]
    fn frames_do_not_advance_the_simulation() {
        let mut animator = Animator::for_field(field(Schedule::Split));
        let before = animator.engine().points().to_vec();
        let mut rec = Recorder::new(300.0, 300.0);
        for _ in 0..5 {
            animator.on_frame(&mut rec);
        }
        assert_eq!(animator.engine().points(), before.as_slice());
    }

    #[test]
    fn stop_silences_callbacks() {
        let mut animator = Animator::for_field(field(Schedule::Split));
        let mut rec = Recorder::new(300.0, 300.0);
        animator.stop();
        animator.on_tick(&mut rec);
        animator.on_frame(&mut rec);
        assert!(!animator.is_running());
        assert!(!animator.wants_frames());
        assert_eq!((animator.ticks(), animator.frames()), (0, 0));
        assert!(rec.commands().is_empty());
    }

    #[test]
    fn stopped_animator_ignores_resizes() {
        let mut animator = Animator::for_field(field(Schedule::Fused));
        animator.stop();
        animator.on_resize(500.0, 100.0).unwrap();
        assert_eq!(animator.engine().width(), 300.0);
        animator.stop();
        assert!(!animator.is_running());
    }

    #[test]
    fn tick_interval_follows_fps() {
        let animator = Animator::for_field(field(Schedule::Split));
        assert!((animator.tick_interval_ms() - 1000.0 / 60.0).abs() < 1e-12);
    }

    #[test]
    fn resize_goes_to_the_engine() {
        let mut animator = Animator::for_field(field(Schedule::Fused));
        animator.on_resize(500.0, 100.0).unwrap();
        assert_eq!(animator.engine().width(), 500.0);
        assert!(animator.on_resize(-1.0, 100.0).is_err());
    }
}
