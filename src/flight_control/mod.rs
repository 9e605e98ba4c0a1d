mod autopilot;
pub(crate) mod common;
pub(crate) mod frame;
pub(crate) mod maneuver;
pub(crate) mod obstacle;
pub(crate) mod ship_interface;
pub(crate) mod task;

pub use autopilot::{Autopilot, CommandRejection, ControlOutput};
