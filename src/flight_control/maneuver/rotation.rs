use crate::flight_control::common::vec3d::Vec3D;
use chrono::TimeDelta;
use std::f32::consts::PI;

/// Angular velocity (rad/s, world space) that turns `current` onto `desired` in one second.
///
/// Both inputs are normalized internally. Opposite vectors rotate by `π` around an
/// arbitrary perpendicular axis, parallel ones yield zero.
pub fn point_at(current: Vec3D<f32>, desired: Vec3D<f32>) -> Vec3D<f32> {
    let c = current.normalize();
    let t = desired.normalize();
    let axis = c.cross(t);
    let sin = axis.abs();
    let cos = c.dot(t);

    if sin <= f32::EPSILON {
        return if cos >= 0.0 { Vec3D::zero() } else { c.any_perpendicular() * PI };
    }
    let angle = sin.atan2(cos);
    axis / sin * angle
}

/// Countdown driving the free-spin bias.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpinTimer {
    remaining: TimeDelta,
}

impl SpinTimer {
    pub fn start(&mut self, duration: TimeDelta) { self.remaining = duration; }

    pub fn stop(&mut self) { self.remaining = TimeDelta::zero(); }

    pub fn is_spinning(&self) -> bool { self.remaining > TimeDelta::zero() }

    /// Advances the countdown by `dt`.
    ///
    /// # Returns
    /// - The angular-rate bias around `axis` for this tick, zero once the timer ran out.
    pub fn tick(&mut self, dt: TimeDelta, axis: Vec3D<f32>, rate: f32) -> Vec3D<f32> {
        if !self.is_spinning() {
            return Vec3D::zero();
        }
        self.remaining = (self.remaining - dt).max(TimeDelta::zero());
        axis.normalize() * rate
    }
}
