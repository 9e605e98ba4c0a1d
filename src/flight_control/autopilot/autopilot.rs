use super::{
    command_gate::{self, CommandRejection},
    control_output::{AlignmentAxis, ControlOutput},
};
use crate::config::AutopilotConfig;
use crate::flight_control::{
    common::vec3d::Vec3D,
    frame::{DestinationKind, DestinationRef, Frame, FrameState},
    maneuver::{self, evasion, landing, rotation::{self, SpinTimer}},
    obstacle::ObstacleScanner,
    ship_interface::{
        Cue, DestinationRegistry, EngineEvent, NavigationEngine, NotificationSink, ShipTelemetry,
    },
    task::{task_queue::TaskQueue, Task},
};
use crate::{event, info, nav, warn};
use chrono::TimeDelta;

/// The autopilot task orchestrator.
///
/// Turns high-level commands into a queue of maneuvers, supervises the active one every
/// tick and computes the thrust and rotation commands that execute it. The collaborators
/// are injected at construction and only ever touched from the simulation thread.
pub struct Autopilot<T, N, R, S>
where
    T: ShipTelemetry,
    N: NavigationEngine,
    R: DestinationRegistry,
    S: NotificationSink,
{
    telemetry: T,
    engine: N,
    registry: R,
    sink: S,
    config: AutopilotConfig,
    /// Active task at the front, pending brackets behind it.
    tasks: TaskQueue,
    obstacles: ObstacleScanner,
    /// Time spent without vertical progress during take-off or landing.
    stuck_time: TimeDelta,
    spin: SpinTimer,
    /// Point-at command waiting to be handed out with the next control output.
    pending_rotation: Option<Vec3D<f32>>,
    landing_mode: bool,
    powered_notice_sent: bool,
}

impl<T, N, R, S> Autopilot<T, N, R, S>
where
    T: ShipTelemetry,
    N: NavigationEngine,
    R: DestinationRegistry,
    S: NotificationSink,
{
    pub fn new(telemetry: T, engine: N, registry: R, sink: S, config: AutopilotConfig) -> Self {
        Self {
            telemetry,
            engine,
            registry,
            sink,
            config,
            tasks: TaskQueue::new(),
            obstacles: ObstacleScanner::new(),
            stuck_time: TimeDelta::zero(),
            spin: SpinTimer::default(),
            pending_rotation: None,
            landing_mode: false,
            powered_notice_sent: false,
        }
    }

    pub fn telemetry(&self) -> &T { &self.telemetry }
    pub fn engine(&self) -> &N { &self.engine }
    pub(crate) fn engine_mut(&mut self) -> &mut N { &mut self.engine }
    pub fn registry(&self) -> &R { &self.registry }
    pub fn sink(&self) -> &S { &self.sink }
    pub fn config(&self) -> &AutopilotConfig { &self.config }

    pub fn current_task(&self) -> Option<&Task> { self.tasks.front() }

    /// All queued tasks, the active one first.
    pub fn queued_tasks(&self) -> impl Iterator<Item = &Task> { self.tasks.iter() }

    pub fn is_active(&self) -> bool { !self.tasks.is_empty() }

    pub fn is_traveling(&self) -> bool { matches!(self.current_task(), Some(Task::Travel(_))) }

    pub fn possible_obstacles(&self) -> &[DestinationRef] { self.obstacles.possible() }

    pub fn active_obstacles(&self) -> &[DestinationRef] { self.obstacles.active() }

    pub fn is_spinning(&self) -> bool { self.spin.is_spinning() }

    /// Reference surface for vertical speed: the active task's destination for take-off
    /// and landing, the current location otherwise.
    fn landing_reference(&self) -> Option<FrameState> {
        match self.current_task() {
            Some(task) if task.is_vertical() => task.destination().frame(),
            _ => self.registry.current_location().and_then(|loc| loc.frame()),
        }
    }

    /// Current climb rate relative to the landing reference, `0.0` without one.
    pub fn current_landing_velocity(&self) -> f32 {
        self.landing_reference()
            .map_or(0.0, |surface| landing::landing_velocity(&self.telemetry.frame(), &surface))
    }

    /// Climb rate the active task asks for, `0.0` for non-vertical tasks.
    pub fn target_landing_velocity(&self) -> f32 {
        let (Some(task), Some(surface)) = (self.current_task(), self.landing_reference()) else {
            return 0.0;
        };
        maneuver::target_landing_speed(task, &self.telemetry.frame(), &surface, &self.config)
    }

    /// Forwards `message` to the notification feed and the log.
    fn message(&mut self, message: &str, silent: bool) {
        info!("{message}");
        self.sink.notify(message, silent);
    }

    pub fn try_travel(&mut self, name: &str) -> Result<(), CommandRejection> {
        command_gate::check_gate(&self.telemetry, &self.engine)?;
        let dest = command_gate::resolve_destination(&self.registry, name)?;
        self.accept_task(Task::Travel(dest));
        Ok(())
    }

    pub fn try_take_off(&mut self) -> Result<(), CommandRejection> {
        command_gate::check_gate(&self.telemetry, &self.engine)?;
        let location =
            self.registry.current_location().ok_or(CommandRejection::NoTakeOffLocation)?;
        self.accept_task(Task::TakeOff(location));
        Ok(())
    }

    pub fn try_land(&mut self) -> Result<(), CommandRejection> {
        command_gate::check_gate(&self.telemetry, &self.engine)?;
        let location =
            self.registry.current_location().ok_or(CommandRejection::NoLandingLocation)?;
        if self.telemetry.is_landed() {
            return Err(CommandRejection::AlreadyLanded);
        }
        self.accept_task(Task::Land(location));
        Ok(())
    }

    pub fn try_evade(&mut self, name: &str) -> Result<(), CommandRejection> {
        command_gate::check_gate(&self.telemetry, &self.engine)?;
        let dest = command_gate::resolve_destination(&self.registry, name)?;
        self.accept_task(Task::Evade(dest));
        Ok(())
    }

    pub fn try_crash(&mut self, name: &str) -> Result<(), CommandRejection> {
        command_gate::check_gate(&self.telemetry, &self.engine)?;
        let dest = command_gate::resolve_destination(&self.registry, name)?;
        self.accept_task(Task::Crash(dest));
        Ok(())
    }

    /// Snaps the ship's nose towards a destination or a named special direction.
    pub fn try_orient(&mut self, name: &str) -> Result<(), CommandRejection> {
        command_gate::check_gate(&self.telemetry, &self.engine)?;
        if self.telemetry.is_landed() {
            return Err(CommandRejection::OrientWhileLanded);
        }
        let (label, direction) = if let Some(dir) = self.registry.special_direction(name) {
            (name.to_string(), dir)
        } else {
            let dest = command_gate::resolve_destination(&self.registry, name)?;
            let Some(frame) = dest.frame() else {
                return Err(CommandRejection::NoLock { name: dest.name() });
            };
            (dest.name(), frame.position() - self.telemetry.frame().position())
        };
        self.point_towards(direction);
        self.message(&format!("The ship is turning to face {label}."), true);
        Ok(())
    }

    pub fn try_spin(&mut self) -> Result<(), CommandRejection> {
        command_gate::check_gate(&self.telemetry, &self.engine)?;
        self.spin.start(self.config.spin_duration);
        self.message("The ship is spinning.", true);
        Ok(())
    }

    /// Cancels the active task, every queued bracket, a running flight and a running spin.
    pub fn try_abort(&mut self) -> Result<(), CommandRejection> {
        command_gate::check_gate(&self.telemetry, &self.engine)?;
        if !self.is_active() && !self.engine.is_flying() && !self.spin.is_spinning() {
            return Err(CommandRejection::NotEngaged);
        }
        self.spin.stop();
        self.abort_task();
        self.message("Autopilot has been aborted.", false);
        Ok(())
    }

    fn is_on_landable_surface(&self) -> bool {
        self.telemetry.is_landed()
            || self.registry.current_location().is_some_and(|loc| loc.can_land())
    }

    /// Replaces the whole queue with `task`, plus a take-off bracket when a travel or
    /// crash starts from a landable surface.
    fn accept_task(&mut self, task: Task) {
        if self.is_active() {
            self.abort_task();
        }
        let mut bracketed = false;
        if task.points_at_target() && self.is_on_landable_surface() {
            if let Some(location) = self.registry.current_location() {
                self.tasks.push(Task::TakeOff(location));
                bracketed = true;
            }
        }
        let target = task.destination().clone();
        nav!("Accepted task: {task}");
        self.tasks.push(task);
        self.start_front_task();
        if bracketed {
            self.point_at_destination(&target);
        }
    }

    /// Announces the front task and, for travel and crash, points the ship at its target.
    fn start_front_task(&mut self) {
        let Some(task) = self.tasks.front().cloned() else {
            return;
        };
        self.stuck_time = TimeDelta::zero();
        let msg = format!("Autopilot engaged: {task}.");
        self.sink.pin(&msg.to_uppercase());
        self.message(&msg, true);
        if task.points_at_target() {
            self.point_at_destination(task.destination());
        }
    }

    fn complete_task(&mut self) {
        self.sink.unpin();
        let Some(finished) = self.tasks.pop() else {
            return;
        };
        if finished.is_vertical() {
            self.landing_mode = false;
        }
        nav!("Completed task: {finished}");
        if let Task::Travel(dest) = &finished {
            if dest.can_land() && !self.telemetry.operator_aboard() {
                self.tasks.push_front(Task::Land(dest.clone()));
            }
        }
        self.stuck_time = TimeDelta::zero();
        self.start_front_task();
    }

    fn abort_task(&mut self) {
        if self.engine.is_flying() {
            self.engine.abort_flight();
        } else {
            self.sink.play_cue(Cue::AutopilotOff);
        }
        if let Some(task) = self.tasks.front() {
            nav!("Aborted task: {task} ({} queued)", self.tasks.len());
        }
        self.sink.unpin();
        self.landing_mode = false;
        self.stuck_time = TimeDelta::zero();
        self.tasks.clear();
    }

    fn point_at_destination(&mut self, dest: &DestinationRef) {
        if let Some(frame) = dest.frame() {
            self.point_towards(frame.position() - self.telemetry.frame().position());
        }
    }

    fn point_towards(&mut self, direction: Vec3D<f32>) {
        let forward = self.telemetry.orientation().forward();
        self.pending_rotation = Some(rotation::point_at(forward, direction));
    }

    /// Reacts to a navigation engine signal. Signals are ignored unless a travel task
    /// is active.
    pub(super) fn handle_engine_event(&mut self, event: EngineEvent) {
        let Some(Task::Travel(dest)) = self.current_task().cloned() else {
            event!("Ignoring engine event {event} outside of travel");
            return;
        };
        let name = dest.name();
        event!("Engine event {event} while heading to {name}");
        match event {
            EngineEvent::FlightInitiated => {
                self.message(&format!("Autopilot engaged to travel to destination: {name}."), true);
            }
            EngineEvent::MatchingVelocity => {
                self.message(&format!("Autopilot is matching velocity with destination: {name}."), true);
            }
            EngineEvent::VelocityMatched => self.message(
                &format!(
                    "Autopilot has matched velocity with destination: {name} and will begin accelerating towards it."
                ),
                true,
            ),
            EngineEvent::RetroRocketsFired => self.message(
                &format!(
                    "Autopilot is firing retro rockets to decelerate before arriving at destination: {name}."
                ),
                true,
            ),
            EngineEvent::Arrived { arrival_error } => self.on_arrival(dest, arrival_error),
            EngineEvent::AlreadyAtDestination => {
                self.message(&format!("Autopilot is already at destination: {name}."), false);
                self.abort_task();
            }
            EngineEvent::Aborted => {
                self.message(&format!("Autopilot to destination '{name}' has been aborted."), false);
                self.abort_task();
            }
        }
    }

    fn on_arrival(&mut self, dest: DestinationRef, arrival_error: f32) {
        let name = dest.name();

        if arrival_error.abs() > self.config.arrival_retry_error {
            // too far off to count as arrived
            if dest.kind() == DestinationKind::Operator {
                let ship_at = self.registry.current_location();
                let operator_at = self.registry.operator_location();
                if let (Some(ship_at), Some(operator_at)) = (ship_at, operator_at) {
                    if ship_at.same_as(&operator_at) {
                        nav!("Operator is at {ship_at}, landing there instead.");
                        self.accept_task(Task::Land(ship_at));
                        return;
                    }
                }
            }
            warn!("Missed {name} by {arrival_error:.2} meters, retrying.");
            self.accept_task(Task::Travel(dest));
            return;
        }

        let report = self.config.arrival_report_error;
        let msg = if arrival_error > report {
            format!("Autopilot arrived at destination: {name} (undershot by {arrival_error:.2} meters).")
        } else if arrival_error < -report {
            format!(
                "Autopilot arrived at destination: {name} (overshot by {:.2} meters).",
                arrival_error.abs()
            )
        } else {
            format!("Autopilot successfully arrived at destination: {name}.")
        };
        self.message(&msg, false);
        self.complete_task();
    }

    /// Advances the autopilot by one simulation step of length `dt`.
    ///
    /// # Returns
    /// - The thrust, rotation and mode commands for this step.
    pub fn tick(&mut self, dt: TimeDelta) -> ControlOutput {
        if !self.powered_notice_sent && self.telemetry.is_powered() {
            self.powered_notice_sent = true;
            self.message("The ship has been powered on. Autopilot can now be engaged at any time.", false);
        }
        for event in self.engine.poll_events() {
            self.handle_engine_event(event);
        }

        self.advance_lifecycle(dt);
        self.scan_obstacles();
        self.control_output(dt)
    }

    /// Runs the ordered progress checks; stops at the first one that changes the queue.
    fn advance_lifecycle(&mut self, dt: TimeDelta) {
        let Some(task) = self.current_task().cloned() else {
            return;
        };

        if self.telemetry.is_destroyed() || self.engine.is_damaged() {
            self.message(&format!("Autopilot has aborted ({task}) because the ship has been damaged."), false);
            self.abort_task();
            return;
        }

        let Some(target) = task.destination().frame() else {
            let lost = task.destination();
            self.message(&format!("Autopilot has aborted because it lost its lock on {lost}."), false);
            self.abort_task();
            return;
        };
        let ship = self.telemetry.frame();

        if task.is_vertical() {
            self.landing_mode = true;
            if self.check_stuck(&task, &ship, &target, dt) {
                return;
            }
        } else {
            self.landing_mode = false;
        }

        match &task {
            Task::TakeOff(origin) => {
                if ship.distance_to(&target) > origin.inner_radius() + self.config.arrival_buffer {
                    self.message(&format!("Autopilot has successfully taken off from {origin}."), false);
                    self.complete_task();
                }
            }
            Task::Land(location) => {
                let here = self.registry.current_location();
                if here.as_ref().is_some_and(|loc| !loc.same_as(location)) {
                    self.message(
                        "Autopilot has aborted landing because the ship is no longer at the intended landing location.",
                        false,
                    );
                    self.abort_task();
                } else if self.telemetry.is_landed() {
                    self.message(&format!("Autopilot has successfully landed at {location}."), false);
                    self.complete_task();
                }
            }
            Task::Evade(threat) => {
                if evasion::evasion_complete(&ship, &target) {
                    self.message(&format!("Autopilot has successfully evaded {threat}."), false);
                    self.complete_task();
                }
            }
            Task::Crash(victim) => {
                if self.telemetry.is_landed() {
                    self.message(&format!("The ship has collided with {victim}."), false);
                    self.complete_task();
                }
            }
            Task::Travel(dest) => {
                if !self.engine.is_flying() && !self.engine.request_flight(dest) {
                    self.message(&format!("Autopilot failed to engage travel to destination '{dest}'."), false);
                    self.abort_task();
                } else if self.telemetry.in_restricted_zone() {
                    self.message("Autopilot has aborted travel because the ship has entered a cloaking field.", false);
                    self.abort_task();
                }
            }
        }
    }

    /// Accumulates time without vertical progress.
    ///
    /// # Returns
    /// - `true` if the timeout fired and the task was completed or aborted.
    fn check_stuck(&mut self, task: &Task, ship: &FrameState, surface: &FrameState, dt: TimeDelta) -> bool {
        let velocity = landing::landing_velocity(ship, surface);
        if velocity.abs() >= self.config.stuck_epsilon {
            self.stuck_time = TimeDelta::zero();
            return false;
        }
        self.stuck_time += dt;
        if self.stuck_time <= self.config.stuck_timeout {
            return false;
        }
        self.stuck_time = TimeDelta::zero();
        if let Task::TakeOff(_) = task {
            self.message("Autopilot has aborted because the ship became stuck while trying to take off.", false);
            self.abort_task();
        } else {
            self.message("Autopilot complete. The ship has come to a stop but may not be on solid ground.", false);
            self.complete_task();
        }
        true
    }

    fn scan_obstacles(&mut self) {
        let Some(Task::Travel(dest)) = self.current_task().cloned() else {
            self.obstacles.clear();
            return;
        };
        let Some(end) = dest.frame().map(|f| f.position()) else {
            self.obstacles.clear();
            return;
        };
        let start = self.telemetry.frame().position();
        let here = self.registry.current_location();
        let candidates: Vec<DestinationRef> = self
            .registry
            .all()
            .into_iter()
            .filter(|d| !d.same_as(&dest))
            .filter(|d| here.as_ref().is_none_or(|loc| !loc.same_as(d)))
            .filter(|d| d.frame().is_some())
            .collect();

        for obstacle_event in self.obstacles.scan(start, end, &candidates) {
            nav!("{obstacle_event}");
            self.sink.notify(&obstacle_event.to_string(), false);
        }
    }

    fn control_output(&mut self, dt: TimeDelta) -> ControlOutput {
        let ship = self.telemetry.frame();
        let orientation = self.telemetry.orientation();
        let thrust_enabled = self.telemetry.thrust_permitted() && !self.telemetry.is_destroyed();

        let thrust = self
            .current_task()
            .and_then(|task| task.destination().frame().map(|target| (task, target)))
            .and_then(|(task, target)| {
                maneuver::maneuver_thrust(task, &ship, &orientation, &target, &self.config)
            })
            .filter(|_| thrust_enabled);

        let directed = self.current_task().is_some_and(|task| !task.is_vertical());
        let spin_axis = if directed { orientation.forward() } else { orientation.up() };
        let spin_bias = self.spin.tick(dt, spin_axis, self.config.spin_rate);

        ControlOutput {
            thrust,
            angular_velocity_delta: self.pending_rotation.take(),
            spin_bias,
            landing_mode: self.landing_mode,
            thrust_enabled,
            alignment_enabled: self.is_active(),
            alignment_axis: if self.is_traveling() { AlignmentAxis::Forward } else { AlignmentAxis::Down },
        }
    }
}
