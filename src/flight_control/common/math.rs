use super::vec3d::Vec3D;

/// Returns the point on the segment `[start, end]` closest to `point`.
///
/// The projection is clamped to the endpoints: if `point` lies behind `start` (seen
/// along the segment) `start` is returned, if it lies beyond `end` then `end` is returned.
///
/// # Arguments
/// - `start`: Beginning of the segment.
/// - `end`: End of the segment.
/// - `point`: The point to project.
///
/// # Returns
/// - A `Vec3D<f32>` on the segment.
pub fn closest_point_on_segment(
    start: Vec3D<f32>,
    end: Vec3D<f32>,
    point: Vec3D<f32>,
) -> Vec3D<f32> {
    let seg = end - start;
    if seg.dot(point - start) <= 0.0 {
        start
    } else if (start - end).dot(point - end) <= 0.0 {
        end
    } else {
        let dir = seg.normalize();
        start + dir * dir.dot(point - start)
    }
}

/// Sign function with zero treated as positive.
///
/// # Returns
/// - `-1.0` for negative inputs, `1.0` otherwise (including `0.0` and `-0.0`).
pub fn sign_or_positive(value: f32) -> f32 { if value < 0.0 { -1.0 } else { 1.0 } }

/// Orthonormal orientation of the vehicle expressed in world space.
///
/// Vehicle-local coordinates use `x = right`, `y = up`, `z = forward`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Basis {
    right: Vec3D<f32>,
    up: Vec3D<f32>,
    forward: Vec3D<f32>,
}

impl Basis {
    /// Builds a basis from `forward` and an approximate `up` vector.
    ///
    /// `up` is re-orthogonalized against `forward`; a degenerate `up` falls back to an
    /// arbitrary perpendicular.
    pub fn from_forward_up(forward_hint: Vec3D<f32>, up_hint: Vec3D<f32>) -> Self {
        let forward = forward_hint.normalize();
        let mut up = up_hint.reject_from(forward).normalize();
        if up.is_zero() {
            up = forward.any_perpendicular();
        }
        let right = up.cross(forward);
        Self { right, up, forward }
    }

    /// World-aligned basis (`right = +x`, `up = +y`, `forward = +z`).
    pub fn identity() -> Self {
        Self { right: Vec3D::unit_x(), up: Vec3D::unit_y(), forward: Vec3D::unit_z() }
    }

    pub fn up(&self) -> Vec3D<f32> { self.up }
    pub fn forward(&self) -> Vec3D<f32> { self.forward }

    /// Expresses a world-space vector in vehicle-local coordinates.
    pub fn to_local(&self, world: Vec3D<f32>) -> Vec3D<f32> {
        Vec3D::new(world.dot(self.right), world.dot(self.up), world.dot(self.forward))
    }

    /// Expresses a vehicle-local vector in world-space coordinates.
    pub fn to_world(&self, local: Vec3D<f32>) -> Vec3D<f32> {
        self.right * local.x() + self.up * local.y() + self.forward * local.z()
    }
}

impl Default for Basis {
    fn default() -> Self { Self::identity() }
}
