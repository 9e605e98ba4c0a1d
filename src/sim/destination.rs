use crate::flight_control::{
    common::vec3d::Vec3D,
    frame::{Destination, DestinationKind, Frame, FrameState},
};
use std::cell::{Cell, RefCell};

/// A simulated destination with interior mutability so scenarios can move it, hide it
/// or make it unavailable while the autopilot holds handles to it.
#[derive(Debug)]
pub struct SimDestination {
    name: String,
    kind: DestinationKind,
    state: Cell<FrameState>,
    /// `false` while the destination's frame cannot be resolved.
    resolvable: Cell<bool>,
    unavailable: RefCell<Option<String>>,
    inner_radius: f32,
    outer_radius: f32,
    can_land: bool,
}

impl SimDestination {
    /// Approach zone around a landable body, relative to its surface radius.
    const APPROACH_FACTOR: f32 = 2.0;
    const APPROACH_MARGIN: f32 = 200.0;

    fn build(
        name: &str,
        kind: DestinationKind,
        state: FrameState,
        inner_radius: f32,
        outer_radius: f32,
        can_land: bool,
    ) -> Self {
        Self {
            name: name.to_string(),
            kind,
            state: Cell::new(state),
            resolvable: Cell::new(true),
            unavailable: RefCell::new(None),
            inner_radius,
            outer_radius: outer_radius.max(inner_radius),
            can_land,
        }
    }

    /// A stationary body the ship may land on. `radius` is its surface radius.
    pub fn planetoid(name: &str, position: Vec3D<f32>, radius: f32) -> Self {
        let outer = radius * Self::APPROACH_FACTOR + Self::APPROACH_MARGIN;
        Self::build(
            name,
            DestinationKind::Landmark,
            FrameState::new(position, Vec3D::zero()),
            radius,
            outer,
            true,
        )
    }

    /// A moving object the ship cannot land on (debris, probes, comets).
    pub fn floating(name: &str, position: Vec3D<f32>, velocity: Vec3D<f32>, radius: f32) -> Self {
        let outer = radius * Self::APPROACH_FACTOR;
        Self::build(
            name,
            DestinationKind::Landmark,
            FrameState::new(position, velocity),
            radius,
            outer,
            false,
        )
    }

    /// The operator's own position.
    pub fn operator(name: &str, position: Vec3D<f32>) -> Self {
        Self::build(
            name,
            DestinationKind::Operator,
            FrameState::new(position, Vec3D::zero()),
            10.0,
            50.0,
            false,
        )
    }

    pub fn state(&self) -> FrameState { self.state.get() }

    #[cfg(test)]
    pub fn set_state(&self, position: Vec3D<f32>, velocity: Vec3D<f32>) {
        self.state.set(FrameState::new(position, velocity));
    }

    #[cfg(test)]
    pub fn set_resolvable(&self, resolvable: bool) { self.resolvable.set(resolvable); }

    /// Marks the destination as not targetable, `None` makes it available again.
    #[cfg(test)]
    pub fn set_unavailable(&self, reason: Option<&str>) {
        *self.unavailable.borrow_mut() = reason.map(str::to_string);
    }

    /// Advances the destination along its velocity.
    pub fn step(&self, dt_secs: f32) {
        let state = self.state.get();
        let moved = state.position() + state.velocity() * dt_secs;
        self.state.set(FrameState::new(moved, state.velocity()));
    }
}

impl Destination for SimDestination {
    fn name(&self) -> String { self.name.clone() }

    fn frame(&self) -> Option<FrameState> { self.resolvable.get().then(|| self.state.get()) }

    fn inner_radius(&self) -> f32 { self.inner_radius }

    fn outer_radius(&self) -> f32 { self.outer_radius }

    fn can_land(&self) -> bool { self.can_land }

    fn is_available(&self) -> Result<(), String> {
        match self.unavailable.borrow().as_ref() {
            Some(reason) => Err(reason.clone()),
            None => Ok(()),
        }
    }

    fn kind(&self) -> DestinationKind { self.kind }
}
