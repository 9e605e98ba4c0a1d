use super::{destination::SimDestination, ship::SharedShip};
use crate::flight_control::{
    common::vec3d::Vec3D,
    frame::{Destination, DestinationRef, Frame},
    ship_interface::DestinationRegistry,
};
use std::rc::Rc;

/// Fixed catalogue of simulated destinations.
///
/// The current location is the nearest resolvable destination whose approach zone
/// contains the ship.
pub struct SimRegistry {
    ship: SharedShip,
    destinations: Vec<Rc<SimDestination>>,
    operator_location: Option<Rc<SimDestination>>,
    special_directions: Vec<(String, Vec3D<f32>)>,
}

impl SimRegistry {
    pub fn new(ship: SharedShip) -> Self {
        Self { ship, destinations: Vec::new(), operator_location: None, special_directions: Vec::new() }
    }

    /// Registers `destination` and returns a handle for scripting it.
    pub fn add(&mut self, destination: SimDestination) -> Rc<SimDestination> {
        let dest = Rc::new(destination);
        self.destinations.push(Rc::clone(&dest));
        dest
    }

    /// Registers a fixed world-space direction usable by orient commands.
    pub fn add_special_direction(&mut self, name: &str, direction: Vec3D<f32>) {
        self.special_directions.push((name.to_string(), direction));
    }

    pub fn set_operator_location(&mut self, location: Option<&Rc<SimDestination>>) {
        self.operator_location = location.cloned();
    }

    pub fn destinations(&self) -> &[Rc<SimDestination>] { &self.destinations }

    /// Moves every destination along its velocity.
    pub fn step(&self, dt_secs: f32) {
        for dest in &self.destinations {
            dest.step(dt_secs);
        }
    }

    fn handle(dest: &Rc<SimDestination>) -> DestinationRef { DestinationRef::from(Rc::clone(dest)) }
}

impl DestinationRegistry for SimRegistry {
    fn all(&self) -> Vec<DestinationRef> { self.destinations.iter().map(Self::handle).collect() }

    fn current_location(&self) -> Option<DestinationRef> {
        let ship = self.ship.borrow().position;
        self.destinations
            .iter()
            .filter_map(|d| d.frame().map(|f| (d, f.position().euclid_distance(&ship))))
            .filter(|(d, dist)| *dist <= d.outer_radius())
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .map(|(d, _)| Self::handle(d))
    }

    fn operator_location(&self) -> Option<DestinationRef> {
        self.operator_location.as_ref().map(Self::handle)
    }

    fn special_direction(&self, name: &str) -> Option<Vec3D<f32>> {
        self.special_directions
            .iter()
            .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
            .map(|(_, dir)| *dir)
    }
}
