use crate::flight_control::common::vec3d::Vec3D;
use strum_macros::Display;

/// Ship-local axis the alignment controller keeps pointed at the target frame.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentAxis {
    /// Nose towards the target while traveling.
    Forward,
    /// Belly towards the surface for every other maneuver.
    Down,
}

/// Commands produced by one autopilot tick, to be applied by the physics integrator.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlOutput {
    /// Translational thrust in vehicle-local space, magnitude `<= 1`.
    pub thrust: Option<Vec3D<f32>>,
    /// One-shot angular velocity change (world space, rad/s) from a point-at request.
    pub angular_velocity_delta: Option<Vec3D<f32>>,
    /// Angular rate bias (world space, rad/s) of an active free-spin.
    pub spin_bias: Vec3D<f32>,
    /// Whether the engine's landing submode should be engaged.
    pub landing_mode: bool,
    pub thrust_enabled: bool,
    pub alignment_enabled: bool,
    pub alignment_axis: AlignmentAxis,
}
