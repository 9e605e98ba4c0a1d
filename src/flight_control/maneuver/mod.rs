pub(crate) mod crash;
pub(crate) mod evasion;
pub(crate) mod landing;
pub(crate) mod rotation;

use crate::config::AutopilotConfig;
use crate::flight_control::{
    common::{math::Basis, vec3d::Vec3D},
    frame::FrameState,
    task::Task,
};

/// Vehicle-local thrust requested by the active task, clamped to unit magnitude.
///
/// # Arguments
/// - `task`: The active task.
/// - `ship`: Kinematic state of the ship.
/// - `orientation`: Orientation of the ship, used to express the result locally.
/// - `target`: Current frame of the task's destination.
/// - `config`: Controller tuning.
///
/// # Returns
/// - `None` for travel legs, which the navigation engine flies on its own.
pub fn maneuver_thrust(
    task: &Task,
    ship: &FrameState,
    orientation: &Basis,
    target: &FrameState,
    config: &AutopilotConfig,
) -> Option<Vec3D<f32>> {
    let world = match task {
        Task::Travel(_) => return None,
        Task::TakeOff(_) => {
            let speed = landing::takeoff_target_speed(config);
            landing::vertical_thrust(ship, target, speed, config)
        }
        Task::Land(dest) => {
            let speed = landing::landing_target_speed(ship, target, dest.inner_radius(), config);
            landing::vertical_thrust(ship, target, speed, config)
        }
        Task::Evade(_) => evasion::evasion_thrust(ship, target),
        Task::Crash(_) => crash::crash_thrust(ship, target, config),
    };
    Some(orientation.to_local(world).clamp_abs(1.0))
}

/// Requested vertical speed for take-off and landing tasks, `0.0` for all others.
pub fn target_landing_speed(
    task: &Task,
    ship: &FrameState,
    target: &FrameState,
    config: &AutopilotConfig,
) -> f32 {
    match task {
        Task::TakeOff(_) => landing::takeoff_target_speed(config),
        Task::Land(dest) => landing::landing_target_speed(ship, target, dest.inner_radius(), config),
        Task::Travel(_) | Task::Evade(_) | Task::Crash(_) => 0.0,
    }
}
