//! 3D vector type for particle and collider state.

use crate::float::Float;
use core::ops::{Add, Sub};

/// 3D vector used for positions, velocities, and forces.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Vec3<F: Float> {
    pub x: F,
    pub y: F,
    pub z: F,
}

impl<F: Float> Vec3<F> {
    /// Create a new 3D vector.
    pub fn new(x: F, y: F, z: F) -> Self { Vec3 { x, y, z } }

    /// Zero vector.
    pub fn zero() -> Self { Vec3 { x: F::zero(), y: F::zero(), z: F::zero() } }

    /// Dot product.
    pub fn dot(self, other: Self) -> F {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// 3D cross product.
    pub fn cross(self, other: Self) -> Self {
        Vec3 {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Scale all components by a scalar.
    pub fn scale(self, s: F) -> Self {
        Vec3 { x: self.x * s, y: self.y * s, z: self.z * s }
    }

    /// Squared length (avoids sqrt).
    pub fn length_sq(self) -> F {
        self.dot(self)
    }

    /// Length (magnitude).
    pub fn length(self) -> F {
        self.length_sq().sqrt()
    }

    /// Unit vector in the same direction, or `None` for the zero vector.
    ///
    /// Only an exactly zero length is rejected: springs and contacts must keep
    /// acting on arbitrarily short but nonzero separations.
    pub fn try_normalize(self) -> Option<Self> {
        let len = self.length();
        if len > F::zero() && len.is_finite() {
            Some(self.scale(F::one() / len))
        } else {
            None
        }
    }

    /// Normalize to unit length. Returns zero vector if length is zero.
    pub fn normalize_or_zero(self) -> Self {
        self.try_normalize().unwrap_or_else(Self::zero)
    }

    /// All three components finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// `[x, y, z]` narrowed to `f32`.
    pub fn to_f32_array(self) -> [f32; 3] {
        [self.x.to_f32(), self.y.to_f32(), self.z.to_f32()]
    }
}

impl<F: Float> Add for Vec3<F> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Vec3 { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z }
    }
}

impl<F: Float> Sub for Vec3<F> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Vec3 { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec3_length() {
        let v = Vec3::new(2.0f32, 3.0, 6.0);
        assert!((v.length() - 7.0).abs() < 1e-6);
    }

    #[test]
    fn vec3_cross() {
        let i = Vec3::new(1.0f32, 0.0, 0.0);
        let j = Vec3::new(0.0f32, 1.0, 0.0);
        let k = i.cross(j);
        assert!((k.x - 0.0).abs() < 1e-6);
        assert!((k.y - 0.0).abs() < 1e-6);
        assert!((k.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn normalize_zero_vector() {
        assert_eq!(Vec3::<f32>::zero().try_normalize(), None);
        assert_eq!(Vec3::<f32>::zero().normalize_or_zero(), Vec3::zero());
    }

    #[test]
    fn normalize_tiny_vector_still_has_direction() {
        let n = Vec3::new(0.0f64, 1e-12, 0.0).try_normalize().unwrap();
        assert!((n.y - 1.0).abs() < 1e-12);
    }
}
