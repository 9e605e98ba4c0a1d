use crate::flight_control::{
    common::{math::sign_or_positive, vec3d::Vec3D},
    frame::{Frame, FrameState},
};

/// Relative speed (m/s) below which evasion falls back to plain retrograde thrust.
const HYPERBOLIC_MIN_SPEED: f32 = 1.0;

/// World-space thrust steering the ship away from `target`. Always of unit magnitude
/// unless ship and target coincide.
///
/// Above 1 m/s relative speed the thrust blends braking along the relative velocity
/// (`1/|v|`) with a sideways push away from the target (`sqrt(|v|² - 1)/|v|`), which
/// bends the relative path onto a diverging hyperbola instead of reversing it.
pub fn evasion_thrust(ship: &FrameState, target: &FrameState) -> Vec3D<f32> {
    // ship motion and target offset as seen from the target
    let v = -ship.relative_velocity(target);
    let r = target.position() - ship.position();
    let speed = v.abs();

    if speed <= f32::EPSILON {
        return -r.normalize();
    }
    if speed <= HYPERBOLIC_MIN_SPEED {
        return -v.normalize();
    }

    let u = v.normalize();
    let mut w = r.reject_from(u).normalize();
    if w.is_zero() {
        // head-on: any sideways direction diverges
        w = u.any_perpendicular();
    }
    let x = 1.0 / speed;
    let y = (speed * speed - 1.0).sqrt() / speed;
    let side = sign_or_positive(r.dot(w));

    -(u * x) - w * (side * y)
}

/// Evasion is done once ship and target are moving apart.
pub fn evasion_complete(ship: &FrameState, target: &FrameState) -> bool {
    let toward = (target.position() - ship.position()).normalize();
    toward.dot(ship.relative_velocity(target).normalize()) > 0.0
}
