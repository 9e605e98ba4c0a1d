use crate::flight_control::frame::DestinationRef;
use std::fmt::{Display, Formatter};

/// A single maneuver intent, queued and supervised by the autopilot.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    /// Long-range flight handled by the navigation engine.
    Travel(DestinationRef),
    /// Climb away from the surface of the given location.
    TakeOff(DestinationRef),
    /// Descend onto the surface of the given location.
    Land(DestinationRef),
    /// Steer away from the given object until moving apart.
    Evade(DestinationRef),
    /// Ram the given object.
    Crash(DestinationRef),
}

impl Task {
    pub fn destination(&self) -> &DestinationRef {
        match self {
            Task::Travel(d) | Task::TakeOff(d) | Task::Land(d) | Task::Evade(d) | Task::Crash(d) => d,
        }
    }

    /// Take-off and landing run in the engine's landing submode.
    pub fn is_vertical(&self) -> bool { matches!(self, Task::TakeOff(_) | Task::Land(_)) }

    /// Tasks that point the ship at their destination when they start.
    pub fn points_at_target(&self) -> bool { matches!(self, Task::Travel(_) | Task::Crash(_)) }
}

impl Display for Task {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Task::Travel(d) => write!(f, "travel to {d}"),
            Task::TakeOff(d) => write!(f, "take off from {d}"),
            Task::Land(d) => write!(f, "land at {d}"),
            Task::Evade(d) => write!(f, "evade {d}"),
            Task::Crash(d) => write!(f, "crash into {d}"),
        }
    }
}
