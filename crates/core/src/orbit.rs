//! Orbit force: the velocity rule that makes points drift around the center.

use glam::DVec2;

/// Velocity for a point of `mass` at `position` orbiting `center`.
///
/// `theta` is `atan2(dx, dy)`, horizontal offset first. Every iteration of
/// the background has used this order and the rotation sense and speed
/// profile depend on it; `atan2(dy, dx)` yields a different motion. The
/// result is `(-cos(theta), sin(theta)) / mass`, so its magnitude is
/// `1 / mass`.
pub fn orbit_velocity(position: DVec2, center: DVec2, mass: f64) -> DVec2 {
    let offset = position - center;
    let theta = offset.x.atan2(offset.y);
    DVec2::new(-theta.cos() / mass, theta.sin() / mass)
}
