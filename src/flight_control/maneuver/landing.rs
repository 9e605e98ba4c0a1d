use crate::config::AutopilotConfig;
use crate::flight_control::{
    common::vec3d::Vec3D,
    frame::{Frame, FrameState},
};

/// Vertical speed of the ship relative to `surface`, positive when climbing.
///
/// ```text
/// landing_velocity = dot(-relative_velocity(ship, surface), normalize(ship - surface))
/// ```
pub fn landing_velocity(ship: &FrameState, surface: &FrameState) -> f32 {
    let up = up_axis(ship, surface);
    (-ship.relative_velocity(surface)).dot(up)
}

/// Outward unit vector from the surface frame's origin through the ship.
pub fn up_axis(ship: &FrameState, surface: &FrameState) -> Vec3D<f32> {
    (ship.position() - surface.position()).normalize()
}

/// Requested climb rate during take-off.
pub fn takeoff_target_speed(config: &AutopilotConfig) -> f32 { config.takeoff_target_velocity }

/// Requested (negative) climb rate during landing.
///
/// The descent rate shrinks with the remaining altitude above `inner_radius`, is capped
/// at `landing_target_velocity` far out and never drops below `landing_min_speed` so the
/// ship keeps closing in until touchdown.
pub fn landing_target_speed(
    ship: &FrameState,
    surface: &FrameState,
    inner_radius: f32,
    config: &AutopilotConfig,
) -> f32 {
    let remaining = ship.distance_to(surface);
    let profile = -(remaining - inner_radius) / config.landing_profile_divisor;
    profile.max(config.landing_target_velocity).min(-config.landing_min_speed)
}

/// World-space thrust holding the ship laterally still over `surface` while tracking
/// `target_speed` vertically. Clamped to unit magnitude.
pub fn vertical_thrust(
    ship: &FrameState,
    surface: &FrameState,
    target_speed: f32,
    config: &AutopilotConfig,
) -> Vec3D<f32> {
    let up = up_axis(ship, surface);
    let ship_rel_vel = -ship.relative_velocity(surface);
    let current_speed = ship_rel_vel.dot(up);

    let lateral = (-ship_rel_vel.reject_from(up) / config.smoothing_window).clamp_abs(1.0);
    let vertical = ((target_speed - current_speed) / config.smoothing_window).clamp(-1.0, 1.0);

    (lateral + up * vertical).clamp_abs(1.0)
}
