use super::destination::SimDestination;
use crate::flight_control::{
    ControlOutput,
    common::{math::Basis, vec3d::Vec3D},
    frame::{Destination, Frame, FrameState},
    ship_interface::ShipTelemetry,
};
use std::{cell::RefCell, rc::Rc};

/// Rigid-body state of the simulated ship plus its crew and hull flags.
#[derive(Debug, Clone)]
pub struct ShipBody {
    pub position: Vec3D<f32>,
    pub velocity: Vec3D<f32>,
    pub orientation: Basis,
    pub landed: bool,
    pub destroyed: bool,
    pub powered: bool,
    pub manual_override: bool,
    pub operator_at_console: bool,
    pub operator_aboard: bool,
    pub in_restricted_zone: bool,
    pub thrust_permitted: bool,
    /// Acceleration (m/s²) produced by a unit thrust command.
    pub thrust_acceleration: f32,
}

impl Default for ShipBody {
    fn default() -> Self {
        Self {
            position: Vec3D::zero(),
            velocity: Vec3D::zero(),
            orientation: Basis::identity(),
            landed: false,
            destroyed: false,
            powered: true,
            manual_override: false,
            operator_at_console: false,
            operator_aboard: false,
            in_restricted_zone: false,
            thrust_permitted: true,
            thrust_acceleration: Self::THRUST_ACCELERATION,
        }
    }
}

impl ShipBody {
    const THRUST_ACCELERATION: f32 = 20.0;
    /// Relative speed above which touching a surface destroys the ship.
    const CRASH_SPEED: f32 = 60.0;
    const CONTACT_TOLERANCE: f32 = 0.5;

    /// Places the ship at rest on the surface of `body`, on the side facing `up`.
    pub fn land_on(&mut self, body: &SimDestination, up: Vec3D<f32>) {
        let surface = body.state();
        self.position = surface.position() + up.normalize() * body.inner_radius();
        self.velocity = surface.velocity();
        self.orientation = Basis::from_forward_up(up.any_perpendicular(), up);
        self.landed = true;
    }

    pub fn frame(&self) -> FrameState { FrameState::new(self.position, self.velocity) }

    /// Applies one tick of autopilot output and integrates the motion.
    ///
    /// Thrust is resolved against the orientation the autopilot saw, rotations follow.
    pub fn apply(&mut self, output: &ControlOutput, dt_secs: f32) {
        if let Some(local) = output.thrust.filter(|_| output.thrust_enabled && !self.destroyed) {
            let world = self.orientation.to_world(local);
            self.velocity += world * (self.thrust_acceleration * dt_secs);
        }
        self.position += self.velocity * dt_secs;
        if let Some(delta) = output.angular_velocity_delta {
            self.rotate(delta);
        }
        if !output.spin_bias.is_zero() {
            self.rotate(output.spin_bias * dt_secs);
        }
    }

    /// Resolves contact with `bodies`: touching a landable surface slowly lands the ship,
    /// anything else at speed destroys it.
    pub fn resolve_contacts(&mut self, bodies: &[Rc<SimDestination>]) {
        for body in bodies {
            let Some(surface) = body.frame() else {
                continue;
            };
            let offset = self.position - surface.position();
            if offset.abs() > body.inner_radius() + Self::CONTACT_TOLERANCE {
                continue;
            }
            let up = offset.normalize();
            let closing = (self.velocity - surface.velocity()).dot(up);
            if closing > 0.0 {
                // lifting off
                break;
            }
            if closing < -Self::CRASH_SPEED || !body.can_land() {
                self.destroyed = true;
            }
            self.position = surface.position() + up * body.inner_radius();
            self.velocity = surface.velocity();
            self.landed = true;
            return;
        }
        self.landed = false;
    }

    /// Rotates the orientation by the rotation vector `rotation` (axis times angle).
    fn rotate(&mut self, rotation: Vec3D<f32>) {
        let angle = rotation.abs();
        if angle <= f32::EPSILON {
            return;
        }
        let axis = rotation / angle;
        let (sin, cos) = angle.sin_cos();
        let turn = |v: Vec3D<f32>| v * cos + axis.cross(v) * sin + axis * (axis.dot(v) * (1.0 - cos));
        self.orientation =
            Basis::from_forward_up(turn(self.orientation.forward()), turn(self.orientation.up()));
    }
}

/// Shared handle to the simulated ship body.
pub type SharedShip = Rc<RefCell<ShipBody>>;

/// [`ShipTelemetry`] view onto a [`SharedShip`].
#[derive(Debug, Clone)]
pub struct SimTelemetry {
    ship: SharedShip,
}

impl SimTelemetry {
    pub fn new(ship: SharedShip) -> Self { Self { ship } }
}

impl ShipTelemetry for SimTelemetry {
    fn frame(&self) -> FrameState { self.ship.borrow().frame() }
    fn orientation(&self) -> Basis { self.ship.borrow().orientation }
    fn is_landed(&self) -> bool { self.ship.borrow().landed }
    fn is_destroyed(&self) -> bool { self.ship.borrow().destroyed }
    fn is_powered(&self) -> bool { self.ship.borrow().powered }
    fn in_restricted_zone(&self) -> bool { self.ship.borrow().in_restricted_zone }
    fn manual_override(&self) -> bool { self.ship.borrow().manual_override }
    fn operator_at_console(&self) -> bool { self.ship.borrow().operator_at_console }
    fn operator_aboard(&self) -> bool { self.ship.borrow().operator_aboard }
    fn thrust_permitted(&self) -> bool { self.ship.borrow().thrust_permitted }
}
