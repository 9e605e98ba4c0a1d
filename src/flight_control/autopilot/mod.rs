#[allow(clippy::module_inception)]
mod autopilot;
mod command_gate;
mod control_output;
mod status;
#[cfg(test)]
mod tests;

pub use autopilot::Autopilot;
pub use command_gate::CommandRejection;
pub use control_output::ControlOutput;
