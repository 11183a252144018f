//! Sphere colliders and inelastic contact response.

use crate::float::Float;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;
use rand::Rng;

/// Colliders are pulled toward the origin by this factor after placement so
/// they stay under the resting cloth.
const PLACEMENT_SCALE: f32 = 0.9;

/// A fixed number of spheres sharing one radius.
#[derive(Clone, Debug, PartialEq)]
pub struct ColliderSet<F: Float> {
    centers: AllocVec<Vec3<F>>,
    radius: F,
}

impl<F: Float> ColliderSet<F> {
    /// `count` spheres at the origin. Call [`initialize`](Self::initialize) to place them.
    pub fn new(count: usize, radius: F) -> Self {
        ColliderSet { centers: alloc::vec![Vec3::zero(); count], radius }
    }

    /// Spheres at explicit centers.
    pub fn from_centers(centers: AllocVec<Vec3<F>>, radius: F) -> Self {
        ColliderSet { centers, radius }
    }

    /// Place the spheres along the `x = z` diagonal with per-axis jitter.
    ///
    /// Draws three uniforms per collider (x, y, z) in index order.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.centers.is_empty() {
            return;
        }
        let spacing = F::one() / F::from_usize(self.centers.len());
        let lead = F::from_f32(0.4);
        let horizontal = F::from_f32(15.0);
        let vertical = F::from_f32(3.0);
        let drop = F::from_f32(0.1);
        let shrink = F::from_f32(PLACEMENT_SCALE);

        for (k, center) in self.centers.iter_mut().enumerate() {
            let along = F::from_usize(k) * spacing - lead;
            let ux = F::from_f32(rng.random::<f32>()) - F::half();
            let uy = F::from_f32(rng.random::<f32>()) - F::half();
            let uz = F::from_f32(rng.random::<f32>()) - F::half();
            *center = Vec3::new(
                along + ux / horizontal,
                uy / vertical - drop,
                along + uz / horizontal,
            )
            .scale(shrink);
        }
    }

    /// Apply contact against every sphere in order and return the new velocity.
    pub fn respond(&self, position: Vec3<F>, velocity: Vec3<F>, friction: F) -> Vec3<F> {
        self.centers.iter().fold(velocity, |v, &center| {
            resolve_contact(position, v, center, self.radius, friction)
        })
    }

    pub fn centers(&self) -> &[Vec3<F>] {
        &self.centers
    }

    /// Interleaved `[x0, y0, z0, x1, ...]` for instance buffers.
    pub fn flat_centers(&self) -> AllocVec<f32> {
        let mut out = AllocVec::with_capacity(self.centers.len() * 3);
        for c in &self.centers {
            out.extend_from_slice(&c.to_f32_array());
        }
        out
    }

    pub fn radius(&self) -> F { self.radius }
    pub fn len(&self) -> usize { self.centers.len() }
    pub fn is_empty(&self) -> bool { self.centers.is_empty() }
}

/// Velocity after contact with one sphere.
///
/// Inside or on the surface, the inward normal component is removed and the
/// remainder scaled by `friction`. Outside, or exactly at the center where the
/// normal is undefined, the velocity is returned unchanged.
pub fn resolve_contact<F: Float>(
    position: Vec3<F>,
    velocity: Vec3<F>,
    center: Vec3<F>,
    radius: F,
    friction: F,
) -> Vec3<F> {
    let offset = position - center;
    if offset.length() > radius {
        return velocity;
    }
    let Some(normal) = offset.try_normalize() else {
        return velocity;
    };
    let inward = velocity.dot(normal).min(F::zero());
    (velocity - normal.scale(inward)).scale(friction)
}
