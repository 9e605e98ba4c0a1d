use crate::config::AutopilotConfig;
use crate::flight_control::{
    common::vec3d::Vec3D,
    frame::{Frame, FrameState},
};

/// World-space pure-pursuit thrust towards `target`.
///
/// Cancels the ship's velocity across the line of sight and adds a unit bias along it;
/// the sum is clamped to unit magnitude.
pub fn crash_thrust(ship: &FrameState, target: &FrameState, config: &AutopilotConfig) -> Vec3D<f32> {
    let los = ship.position().to(&target.position());
    let dir = los.normalize();
    let ship_rel_vel = -ship.relative_velocity(target);

    let cancel = -ship_rel_vel.reject_from(dir) / config.smoothing_window;
    (cancel + los.clamp_abs(1.0)).clamp_abs(1.0)
}
