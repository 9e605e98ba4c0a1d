//! Boundary traits towards the physics engine, the destination registry and the
//! notification feed. The autopilot receives one implementation of each at construction.
use super::{
    common::{math::Basis, vec3d::Vec3D},
    frame::{DestinationRef, FrameState},
};
use strum_macros::Display;

/// Read-only vehicle and crew telemetry, sampled each tick.
pub trait ShipTelemetry {
    /// Kinematic state of the ship body.
    fn frame(&self) -> FrameState;
    /// Current orientation of the ship body in world space.
    fn orientation(&self) -> Basis;
    fn is_landed(&self) -> bool;
    fn is_destroyed(&self) -> bool;
    /// `true` once the ship has been powered up (the operator entered it at least once).
    fn is_powered(&self) -> bool;
    /// `true` while the ship is inside a zone that forbids autopilot travel (e.g. a cloaking field).
    fn in_restricted_zone(&self) -> bool;
    fn manual_override(&self) -> bool;
    fn operator_at_console(&self) -> bool;
    fn operator_aboard(&self) -> bool;
    /// `false` while the hull systems refuse thrust commands (e.g. system failure).
    fn thrust_permitted(&self) -> bool;
}

/// Signals delivered by the navigation engine, drained once per tick.
#[derive(Debug, Display, Clone, Copy, PartialEq)]
pub enum EngineEvent {
    FlightInitiated,
    MatchingVelocity,
    VelocityMatched,
    RetroRocketsFired,
    /// Flight leg finished; signed error in meters (positive = undershoot).
    Arrived { arrival_error: f32 },
    AlreadyAtDestination,
    Aborted,
}

/// The engine-side autopilot that performs long-range travel legs.
pub trait NavigationEngine {
    /// Requests a flight to `target`; `false` if the engine refuses.
    fn request_flight(&mut self, target: &DestinationRef) -> bool;
    fn is_flying(&self) -> bool;
    fn abort_flight(&mut self);
    fn is_damaged(&self) -> bool;
    /// Drains all events emitted since the previous call.
    fn poll_events(&mut self) -> Vec<EngineEvent>;
}

/// Catalogue of destinations currently known to the agent.
pub trait DestinationRegistry {
    /// All destinations, available or not.
    fn all(&self) -> Vec<DestinationRef>;
    /// The destination the ship is currently at, if any.
    fn current_location(&self) -> Option<DestinationRef>;
    /// The destination the operator is currently at, if any.
    fn operator_location(&self) -> Option<DestinationRef>;
    /// Looks up a named fixed direction usable as an orientation target.
    fn special_direction(&self, _name: &str) -> Option<Vec3D<f32>> { None }

    /// Case-insensitive lookup preferring available destinations.
    fn by_name(&self, name: &str) -> Option<DestinationRef> {
        let all = self.all();
        let matches = |d: &&DestinationRef| d.name().eq_ignore_ascii_case(name.trim());
        all.iter()
            .filter(|d| d.is_available().is_ok())
            .find(matches)
            .or_else(|| all.iter().find(matches))
            .cloned()
    }

    /// Names of all destinations that may currently be targeted.
    fn available_names(&self) -> Vec<String> {
        self.all().iter().filter(|d| d.is_available().is_ok()).map(|d| d.name()).collect()
    }
}

/// Audible feedback cues played on the ship.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    AutopilotOff,
}

/// Player-facing alerts and the external agent feed.
pub trait NotificationSink {
    /// Forwards a message to the agent feed; `silent` messages are context only.
    fn notify(&mut self, message: &str, silent: bool);
    /// Shows a persistent on-screen notification, replacing any pinned one.
    fn pin(&mut self, _message: &str) {}
    /// Removes the pinned notification, if any.
    fn unpin(&mut self) {}
    fn play_cue(&mut self, _cue: Cue) {}
}
