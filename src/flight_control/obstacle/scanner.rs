use crate::flight_control::{
    common::{math::closest_point_on_segment, vec3d::Vec3D},
    frame::{DestinationRef, Frame},
};
use std::fmt::{Display, Formatter};
use strum_macros::Display;

/// Hazard level of a destination with respect to the current route.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum HazardClass {
    None,
    Possible,
    Active,
}

/// Transition of a destination between hazard classes.
#[derive(Debug, Clone, PartialEq)]
pub enum ObstacleEvent {
    EnteredPossible(DestinationRef),
    ExitedPossible(DestinationRef),
    EnteredActive(DestinationRef),
    ExitedActive(DestinationRef),
}

impl Display for ObstacleEvent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ObstacleEvent::EnteredPossible(d) => {
                write!(f, "Possible obstacle detected: {d} is close to the ship's flight path.")
            }
            ObstacleEvent::ExitedPossible(d) => {
                write!(f, "{d} is no longer close to the ship's flight path.")
            }
            ObstacleEvent::EnteredActive(d) => {
                write!(f, "Obstacle detected: {d} is directly in the ship's flight path!")
            }
            ObstacleEvent::ExitedActive(d) => {
                write!(f, "{d} is no longer directly in the ship's flight path.")
            }
        }
    }
}

/// Edge-triggered proximity hazard detection along a straight travel route.
///
/// `possible` and `active` are disjoint; a destination is announced when it moves
/// between classes, never while it stays in one.
#[derive(Debug, Default)]
pub struct ObstacleScanner {
    possible: Vec<DestinationRef>,
    active: Vec<DestinationRef>,
}

impl ObstacleScanner {
    pub fn new() -> Self { Self::default() }

    pub fn possible(&self) -> &[DestinationRef] { &self.possible }

    pub fn active(&self) -> &[DestinationRef] { &self.active }

    /// Classifies `dest` against the route `[start, end]`.
    ///
    /// # Returns
    /// - [`HazardClass::None`] if the destination has no resolvable position.
    pub fn classify(start: Vec3D<f32>, end: Vec3D<f32>, dest: &DestinationRef) -> HazardClass {
        let Some(frame) = dest.frame() else {
            return HazardClass::None;
        };
        let nearest = closest_point_on_segment(start, end, frame.position());
        let dist = nearest.euclid_distance(&frame.position());
        if dist < dest.inner_radius() {
            HazardClass::Active
        } else if dist < dest.outer_radius() {
            HazardClass::Possible
        } else {
            HazardClass::None
        }
    }

    fn class_of(&self, dest: &DestinationRef) -> HazardClass {
        if self.active.iter().any(|d| d.same_as(dest)) {
            HazardClass::Active
        } else if self.possible.iter().any(|d| d.same_as(dest)) {
            HazardClass::Possible
        } else {
            HazardClass::None
        }
    }

    /// Re-derives both sets for the route `[start, end]`.
    ///
    /// Destinations tracked on the previous scan but missing from `candidates` are
    /// treated as [`HazardClass::None`].
    ///
    /// # Returns
    /// - The class transitions since the previous scan, in candidate order.
    pub fn scan(
        &mut self,
        start: Vec3D<f32>,
        end: Vec3D<f32>,
        candidates: &[DestinationRef],
    ) -> Vec<ObstacleEvent> {
        let mut events = Vec::new();
        let mut possible = Vec::new();
        let mut active = Vec::new();

        for dest in candidates {
            let before = self.class_of(dest);
            let now = Self::classify(start, end, dest);
            Self::transition(dest, before, now, &mut events);
            match now {
                HazardClass::Active => active.push(dest.clone()),
                HazardClass::Possible => possible.push(dest.clone()),
                HazardClass::None => (),
            }
        }

        let dropped = self
            .active
            .iter()
            .chain(self.possible.iter())
            .filter(|d| !candidates.iter().any(|c| c.same_as(d)));
        for dest in dropped {
            Self::transition(dest, self.class_of(dest), HazardClass::None, &mut events);
        }

        self.possible = possible;
        self.active = active;
        events
    }

    fn transition(
        dest: &DestinationRef,
        before: HazardClass,
        now: HazardClass,
        events: &mut Vec<ObstacleEvent>,
    ) {
        let d = || dest.clone();
        match (before, now) {
            (HazardClass::None, HazardClass::Possible) => {
                events.push(ObstacleEvent::EnteredPossible(d()));
            }
            (HazardClass::None | HazardClass::Possible, HazardClass::Active) => {
                events.push(ObstacleEvent::EnteredActive(d()));
            }
            (HazardClass::Possible, HazardClass::None) => {
                events.push(ObstacleEvent::ExitedPossible(d()));
            }
            (HazardClass::Active, HazardClass::Possible) => {
                events.push(ObstacleEvent::ExitedActive(d()));
                events.push(ObstacleEvent::EnteredPossible(d()));
            }
            (HazardClass::Active, HazardClass::None) => {
                events.push(ObstacleEvent::ExitedActive(d()));
            }
            (HazardClass::None, HazardClass::None)
            | (HazardClass::Possible, HazardClass::Possible)
            | (HazardClass::Active, HazardClass::Active) => (),
        }
    }

    /// Forgets all tracked obstacles without emitting exit events.
    pub fn clear(&mut self) {
        self.possible.clear();
        self.active.clear();
    }
}
