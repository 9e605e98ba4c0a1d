//! Minimal stand-ins for the physics engine, the navigation engine, the destination
//! catalogue and the notification feed, used by the demo binary and the tests.
mod destination;
mod engine;
mod registry;
mod ship;
mod sink;

pub use destination::SimDestination;
pub use engine::SimEngine;
pub use registry::SimRegistry;
pub use ship::{SharedShip, ShipBody, SimTelemetry};
pub use sink::RecordingSink;

use crate::config::AutopilotConfig;
use crate::flight_control::{Autopilot, ControlOutput};
use chrono::TimeDelta;
use std::{cell::RefCell, rc::Rc};

pub type SimAutopilot = Autopilot<SimTelemetry, SimEngine, SimRegistry, RecordingSink>;

/// Converts a tick length into fractional seconds.
#[allow(clippy::cast_precision_loss)]
pub fn secs(dt: TimeDelta) -> f32 { dt.num_milliseconds() as f32 / 1000.0 }

/// A ship, its autopilot and a world to fly in.
pub struct SimWorld {
    pub ship: SharedShip,
    pub autopilot: SimAutopilot,
}

impl SimWorld {
    /// Creates a powered ship floating at the origin, to be shared with a [`SimRegistry`].
    pub fn ship() -> SharedShip { Rc::new(RefCell::new(ShipBody::default())) }

    pub fn with_registry(ship: SharedShip, registry: SimRegistry, config: AutopilotConfig) -> Self {
        let autopilot = Autopilot::new(
            SimTelemetry::new(Rc::clone(&ship)),
            SimEngine::new(Rc::clone(&ship)),
            registry,
            RecordingSink::new(),
            config,
        );
        Self { ship, autopilot }
    }

    /// Runs one autopilot tick and integrates the world by `dt`.
    pub fn step(&mut self, dt: TimeDelta) -> ControlOutput {
        let output = self.autopilot.tick(dt);
        let dt_secs = secs(dt);
        self.autopilot.engine_mut().step();
        self.autopilot.registry().step(dt_secs);
        let mut ship = self.ship.borrow_mut();
        ship.apply(&output, dt_secs);
        ship.resolve_contacts(self.autopilot.registry().destinations());
        output
    }
}
