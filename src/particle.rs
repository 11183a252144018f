//! Point masses advanced by explicit force integration.

use crate::float::Float;
use crate::vec::Vec3;

/// A unit-mass cloth particle with explicit velocity.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Particle<F: Float> {
    pub position: Vec3<F>,
    pub velocity: Vec3<F>,
}

impl<F: Float> Particle<F> {
    /// A particle at rest at `position`.
    pub fn at_rest(position: Vec3<F>) -> Self {
        Particle { position, velocity: Vec3::zero() }
    }

    pub fn new(position: Vec3<F>, velocity: Vec3<F>) -> Self {
        Particle { position, velocity }
    }

    /// `0.5 * |v|^2` for unit mass.
    pub fn kinetic_energy(&self) -> F {
        F::half() * self.velocity.length_sq()
    }

    /// Multiply velocity by `factor`.
    pub fn damp(&mut self, factor: F) {
        self.velocity = self.velocity.scale(factor);
    }

    /// Semi-implicit Euler position update using the current velocity.
    pub fn drift(&mut self, dt: F) {
        self.position = self.position + self.velocity.scale(dt);
    }
}
