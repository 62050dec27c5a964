//! Ring geometry
//!
//! Pulses, power waves and echo replays are all thin rings expanding at a
//! constant speed up to a cap. A body is hit when its circle overlaps the
//! ring's band.

use glam::Vec2;

/// Ring radius `age_ms` after emission: linear growth capped at `max_radius`.
/// Negative ages clamp to zero.
#[inline]
pub fn ring_radius(age_ms: f64, speed: f32, max_radius: f32) -> f32 {
    let grown = (age_ms.max(0.0) / 1000.0) as f32 * speed;
    grown.min(max_radius)
}

/// Ring-hit test: does a body of `body_radius` at `point` overlap a ring of
/// `radius` and `thickness` centred on `center`?
///
/// `| |point - center| - radius | <= thickness / 2 + body_radius`
///
/// Thickness is taken by magnitude, so a point exactly on the center circle
/// always hits.
#[inline]
pub fn ring_hit(center: Vec2, radius: f32, thickness: f32, point: Vec2, body_radius: f32) -> bool {
    let d = center.distance(point);
    (d - radius).abs() <= thickness.abs() * 0.5 + body_radius.max(0.0)
}

/// Two circles touch (strictly overlapping)
#[inline]
pub fn circles_touch(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) < ra + rb
}
