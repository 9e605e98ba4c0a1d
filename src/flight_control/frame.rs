use super::common::vec3d::Vec3D;
use std::fmt::{Debug, Formatter};
use std::rc::Rc;
use strum_macros::Display;

/// Minimal view on a physics reference frame: a moving point in world space.
pub trait Frame {
    fn position(&self) -> Vec3D<f32>;
    fn velocity(&self) -> Vec3D<f32>;

    /// Velocity of `other` as seen from this frame (`other.velocity - self.velocity`).
    fn relative_velocity(&self, other: &impl Frame) -> Vec3D<f32>
    where Self: Sized {
        other.velocity() - self.velocity()
    }

    /// Distance between the origins of both frames.
    fn distance_to(&self, other: &impl Frame) -> f32
    where Self: Sized {
        self.position().euclid_distance(&other.position())
    }
}

/// Snapshot of a frame's kinematic state at the current tick.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameState {
    position: Vec3D<f32>,
    velocity: Vec3D<f32>,
}

impl FrameState {
    pub const fn new(position: Vec3D<f32>, velocity: Vec3D<f32>) -> Self {
        Self { position, velocity }
    }
}

impl Frame for FrameState {
    fn position(&self) -> Vec3D<f32> { self.position }
    fn velocity(&self) -> Vec3D<f32> { self.velocity }
}

/// Destination categories the autopilot treats specially.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum DestinationKind {
    /// Any celestial body, station or shuttle.
    Landmark,
    /// The human operator's own position, which travels with them.
    Operator,
}

/// A navigable point of interest supplied by the external destination registry.
///
/// The autopilot never constructs destinations; it only stores [`DestinationRef`]
/// handles inside tasks and queries them every tick.
pub trait Destination {
    fn name(&self) -> String;

    /// Current kinematic state, `None` while the destination cannot be resolved.
    fn frame(&self) -> Option<FrameState>;

    /// Radius of the arrival / active-hazard zone.
    fn inner_radius(&self) -> f32;

    /// Radius of the approach / possible-hazard zone, never below `inner_radius`.
    fn outer_radius(&self) -> f32;

    fn can_land(&self) -> bool;

    /// Checks whether the destination may currently be targeted.
    ///
    /// # Returns
    /// - `Err(reason)` with a human-readable explanation if it may not.
    fn is_available(&self) -> Result<(), String>;

    fn kind(&self) -> DestinationKind { DestinationKind::Landmark }
}

/// Shared handle to a registry destination. Identity is pointer equality.
#[derive(Clone)]
pub struct DestinationRef(Rc<dyn Destination>);

impl DestinationRef {
    /// Checks whether both handles refer to the same destination instance.
    pub fn same_as(&self, other: &DestinationRef) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

impl PartialEq for DestinationRef {
    fn eq(&self, other: &Self) -> bool { self.same_as(other) }
}

impl Debug for DestinationRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "DestinationRef({})", self.0.name())
    }
}

impl std::fmt::Display for DestinationRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0.name()) }
}

impl std::ops::Deref for DestinationRef {
    type Target = dyn Destination;

    fn deref(&self) -> &Self::Target { self.0.as_ref() }
}

impl<D: Destination + 'static> From<Rc<D>> for DestinationRef {
    fn from(value: Rc<D>) -> Self { Self(value) }
}
