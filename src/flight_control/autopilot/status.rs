use super::Autopilot;
use crate::flight_control::ship_interface::{
    DestinationRegistry, NavigationEngine, NotificationSink, ShipTelemetry,
};
use crate::flight_control::task::Task;
use itertools::Itertools;
use std::fmt::{Display, Formatter};

/// Snapshot of the autopilot state for the external agent.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusReport {
    /// `None` if commands are accepted, otherwise the gate's rejection reason.
    pub unavailable_reason: Option<String>,
    pub location: Option<String>,
    pub current_task: Option<Task>,
    /// Tasks waiting behind the active one.
    pub pending_tasks: Vec<Task>,
    pub flying: bool,
    pub landed: bool,
    pub landing_velocity: f32,
    pub target_landing_velocity: f32,
    pub possible_obstacles: Vec<String>,
    pub active_obstacles: Vec<String>,
}

impl Display for StatusReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.unavailable_reason {
            None => writeln!(f, "Autopilot: available")?,
            Some(reason) => writeln!(f, "Autopilot: unavailable ({reason})")?,
        }
        let location = self.location.as_deref().unwrap_or("deep space");
        let posture = if self.landed { "landed" } else { "in flight" };
        writeln!(f, "Location: {location} ({posture})")?;
        match &self.current_task {
            Some(task) => writeln!(f, "Current task: {task}")?,
            None => writeln!(f, "Current task: none")?,
        }
        if !self.pending_tasks.is_empty() {
            writeln!(f, "Queued: {}", self.pending_tasks.iter().join(", then "))?;
        }
        if self.flying {
            writeln!(f, "Navigation engine: flying")?;
        }
        if matches!(self.current_task, Some(Task::TakeOff(_) | Task::Land(_))) {
            writeln!(
                f,
                "Vertical speed: {:.1} m/s (target {:.1} m/s)",
                self.landing_velocity, self.target_landing_velocity
            )?;
        }
        if !self.active_obstacles.is_empty() {
            writeln!(f, "Obstacles in path: {}", self.active_obstacles.join(", "))?;
        }
        if !self.possible_obstacles.is_empty() {
            writeln!(f, "Obstacles near path: {}", self.possible_obstacles.join(", "))?;
        }
        Ok(())
    }
}

impl<T, N, R, S> Autopilot<T, N, R, S>
where
    T: ShipTelemetry,
    N: NavigationEngine,
    R: DestinationRegistry,
    S: NotificationSink,
{
    pub fn status(&self) -> StatusReport {
        let unavailable_reason = super::command_gate::check_gate(self.telemetry(), self.engine())
            .err()
            .map(|rejection| rejection.to_string());
        StatusReport {
            unavailable_reason,
            location: self.registry().current_location().map(|loc| loc.name()),
            current_task: self.current_task().cloned(),
            pending_tasks: self.queued_tasks().skip(1).cloned().collect(),
            flying: self.engine().is_flying(),
            landed: self.telemetry().is_landed(),
            landing_velocity: self.current_landing_velocity(),
            target_landing_velocity: self.target_landing_velocity(),
            possible_obstacles: self.possible_obstacles().iter().map(|d| d.name()).collect(),
            active_obstacles: self.active_obstacles().iter().map(|d| d.name()).collect(),
        }
    }

    /// Human-readable multi-line status summary.
    pub fn status_report(&self) -> String { self.status().to_string() }
}
