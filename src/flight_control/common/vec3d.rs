use num::Float;
use std::fmt::{Display, Formatter};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub};

/// A 3D vector generic over any floating point type.
///
/// This struct represents a point, a velocity or a thrust direction in world or
/// vehicle-local space and provides the vector algebra needed by the maneuver controllers.
///
/// # Type Parameters
/// * `T` - The floating point type of the components.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Vec3D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
    /// The z-component of the vector.
    z: T,
}

impl<T: Copy> Vec3D<T> {
    /// Creates a new vector with the given components.
    ///
    /// # Arguments
    /// * `x` - The x-component of the vector.
    /// * `y` - The y-component of the vector.
    /// * `z` - The z-component of the vector.
    ///
    /// # Returns
    /// A new `Vec3D` object.
    pub const fn new(x: T, y: T, z: T) -> Self { Self { x, y, z } }

    /// Returns the x-component of the vector.
    pub const fn x(&self) -> T { self.x }

    /// Returns the y-component of the vector.
    pub const fn y(&self) -> T { self.y }

    /// Returns the z-component of the vector.
    pub const fn z(&self) -> T { self.z }
}

impl<T: Float> Vec3D<T> {
    /// Creates a zero vector (x = 0, y = 0, z = 0).
    pub fn zero() -> Self { Self::new(T::zero(), T::zero(), T::zero()) }

    /// Unit vector along the x-axis.
    pub fn unit_x() -> Self { Self::new(T::one(), T::zero(), T::zero()) }

    /// Unit vector along the y-axis.
    pub fn unit_y() -> Self { Self::new(T::zero(), T::one(), T::zero()) }

    /// Unit vector along the z-axis.
    pub fn unit_z() -> Self { Self::new(T::zero(), T::zero(), T::one()) }

    /// Computes the magnitude (absolute value) of the vector.
    ///
    /// # Returns
    /// The magnitude of the vector as a scalar of type `T`.
    pub fn abs(&self) -> T { self.dot(*self).sqrt() }

    /// Checks whether all components are exactly zero.
    pub fn is_zero(&self) -> bool {
        self.x.is_zero() && self.y.is_zero() && self.z.is_zero()
    }

    /// Computes the dot product of the current vector with another vector.
    ///
    /// ```text
    /// dot_product = (x1 * x2) + (y1 * y2) + (z1 * z2)
    /// ```
    pub fn dot(self, other: Vec3D<T>) -> T {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Computes the right-handed cross product `self × other`.
    pub fn cross(self, other: Vec3D<T>) -> Vec3D<T> {
        Vec3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Creates a vector pointing from the current vector (`self`) to another vector (`other`).
    pub fn to(&self, other: &Vec3D<T>) -> Vec3D<T> { *other - *self }

    /// Normalizes the vector to have a magnitude of 1.
    /// If the magnitude is zero, the original vector is returned unmodified.
    pub fn normalize(self) -> Self {
        let magnitude = self.abs();
        if magnitude.is_zero() { self } else { self / magnitude }
    }

    /// Scales the vector down so that its magnitude does not exceed `max`.
    /// Vectors already shorter than `max` are returned unmodified.
    pub fn clamp_abs(self, max: T) -> Self {
        let magnitude = self.abs();
        if magnitude > max && !magnitude.is_zero() { self * (max / magnitude) } else { self }
    }

    /// Removes the component parallel to `axis` (which must be normalized).
    pub fn reject_from(self, axis: Vec3D<T>) -> Self { self - axis * self.dot(axis) }

    /// Returns an arbitrary unit vector perpendicular to `self`.
    ///
    /// The axis least aligned with `self` is crossed with it, which keeps the
    /// result well-conditioned for any non-zero input.
    pub fn any_perpendicular(self) -> Self {
        let (ax, ay, az) = (self.x.abs(), self.y.abs(), self.z.abs());
        let helper = if ax <= ay && ax <= az {
            Self::unit_x()
        } else if ay <= az {
            Self::unit_y()
        } else {
            Self::unit_z()
        };
        self.cross(helper).normalize()
    }

    /// Computes the Euclidean distance between the current vector and another vector.
    pub fn euclid_distance(&self, other: &Self) -> T { self.to(other).abs() }
}

impl<T: Float> Add for Vec3D<T> {
    type Output = Vec3D<T>;

    fn add(self, rhs: Vec3D<T>) -> Self::Output {
        Vec3D::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl<T: Float> AddAssign for Vec3D<T> {
    fn add_assign(&mut self, rhs: Vec3D<T>) { *self = *self + rhs; }
}

impl<T: Float> Sub for Vec3D<T> {
    type Output = Vec3D<T>;

    fn sub(self, rhs: Vec3D<T>) -> Self::Output {
        Vec3D::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl<T: Float> Neg for Vec3D<T> {
    type Output = Vec3D<T>;

    fn neg(self) -> Self::Output { Vec3D::new(-self.x, -self.y, -self.z) }
}

impl<T: Float> Mul<T> for Vec3D<T> {
    type Output = Vec3D<T>;

    /// Implements the `*` operator for a `Vec3D` and a scalar.
    fn mul(self, rhs: T) -> Self::Output { Vec3D::new(self.x * rhs, self.y * rhs, self.z * rhs) }
}

impl<T: Float> Div<T> for Vec3D<T> {
    type Output = Vec3D<T>;

    /// Implements the `/` operator for a `Vec3D` and a scalar.
    fn div(self, rhs: T) -> Self::Output { Vec3D::new(self.x / rhs, self.y / rhs, self.z / rhs) }
}

impl<T: Copy> From<(T, T, T)> for Vec3D<T> {
    /// Creates a `Vec3D` from a tuple of (x, y, z) values.
    fn from(tuple: (T, T, T)) -> Self { Vec3D::new(tuple.0, tuple.1, tuple.2) }
}

impl<T: Display> Display for Vec3D<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:.2}, {:.2}, {:.2}]", self.x, self.y, self.z)
    }
}
