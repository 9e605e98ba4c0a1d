use super::ship::SharedShip;
use crate::flight_control::{
    frame::{DestinationRef, Frame},
    ship_interface::{EngineEvent, NavigationEngine},
};
use crate::event;
use rand::Rng;

/// Phases of a simulated flight leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Leg {
    Matching,
    Cruising,
    Braking,
}

/// Scripted stand-in for the game's navigation engine.
///
/// Flies the ship in a straight line at `cruise_speed` relative to the target and
/// reports an arrival with a random error once inside the target's approach zone.
pub struct SimEngine {
    ship: SharedShip,
    target: Option<DestinationRef>,
    leg: Leg,
    events: Vec<EngineEvent>,
    /// Refuse every flight request while set.
    pub refuse_requests: bool,
    pub damaged: bool,
    pub cruise_speed: f32,
    /// Maximum magnitude of the random arrival error in meters.
    pub arrival_noise: f32,
    pub flight_requests: usize,
    pub aborts: usize,
}

impl SimEngine {
    const CRUISE_SPEED: f32 = 500.0;
    const ARRIVAL_NOISE: f32 = 30.0;
    /// Slowest speed while braking into the approach zone.
    const APPROACH_SPEED: f32 = 20.0;
    /// Distance factor of the approach zone at which braking starts.
    const BRAKING_FACTOR: f32 = 3.0;

    pub fn new(ship: SharedShip) -> Self {
        Self {
            ship,
            target: None,
            leg: Leg::Matching,
            events: Vec::new(),
            refuse_requests: false,
            damaged: false,
            cruise_speed: Self::CRUISE_SPEED,
            arrival_noise: Self::ARRIVAL_NOISE,
            flight_requests: 0,
            aborts: 0,
        }
    }

    /// Queues `event` as if the engine had emitted it.
    #[cfg(test)]
    pub fn push_event(&mut self, event: EngineEvent) { self.events.push(event); }

    /// Steers the ship along the current leg; call once per tick before integrating.
    pub fn step(&mut self) {
        let Some(target) = self.target.clone() else {
            return;
        };
        let Some(goal) = target.frame() else {
            event!("Engine lost its target {target}, aborting flight.");
            self.target = None;
            self.events.push(EngineEvent::Aborted);
            return;
        };
        let mut ship = self.ship.borrow_mut();
        let offset = goal.position() - ship.position;
        let dist = offset.abs();

        match self.leg {
            Leg::Matching => {
                ship.velocity = goal.velocity();
                self.leg = Leg::Cruising;
                self.events.push(EngineEvent::VelocityMatched);
            }
            Leg::Cruising => {
                ship.velocity = goal.velocity() + offset.normalize() * self.cruise_speed;
                if dist < target.outer_radius() * Self::BRAKING_FACTOR {
                    self.leg = Leg::Braking;
                    self.events.push(EngineEvent::RetroRocketsFired);
                }
            }
            Leg::Braking => {
                let speed = (dist - target.outer_radius()).min(self.cruise_speed).max(Self::APPROACH_SPEED);
                ship.velocity = goal.velocity() + offset.normalize() * speed;
                if dist <= target.outer_radius() {
                    ship.velocity = goal.velocity();
                    drop(ship);
                    self.arrive();
                }
            }
        }
    }

    fn arrive(&mut self) {
        let arrival_error = if self.arrival_noise > 0.0 {
            rand::rng().random_range(-self.arrival_noise..=self.arrival_noise)
        } else {
            0.0
        };
        self.target = None;
        self.events.push(EngineEvent::Arrived { arrival_error });
    }
}

impl NavigationEngine for SimEngine {
    fn request_flight(&mut self, target: &DestinationRef) -> bool {
        self.flight_requests += 1;
        if self.refuse_requests || self.damaged {
            return false;
        }
        let Some(goal) = target.frame() else {
            return false;
        };
        if self.ship.borrow().position.euclid_distance(&goal.position()) <= target.outer_radius() {
            self.events.push(EngineEvent::AlreadyAtDestination);
            return true;
        }
        self.target = Some(target.clone());
        self.leg = Leg::Matching;
        self.events.push(EngineEvent::FlightInitiated);
        self.events.push(EngineEvent::MatchingVelocity);
        true
    }

    fn is_flying(&self) -> bool { self.target.is_some() }

    /// Stops the current leg silently; [`EngineEvent::Aborted`] is reserved for
    /// aborts the engine decides on by itself.
    fn abort_flight(&mut self) {
        self.aborts += 1;
        self.target = None;
    }

    fn is_damaged(&self) -> bool { self.damaged }

    fn poll_events(&mut self) -> Vec<EngineEvent> { std::mem::take(&mut self.events) }
}
