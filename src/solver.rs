//! Explicit mass-spring solver for the cloth grid.
//!
//! One substep is two sweeps over the grid separated by a barrier:
//!
//! 1. **Forces.** Every particle sums gravity plus a Hookean spring and a
//!    dashpot for each in-bounds stencil neighbor, reading only the state at
//!    the start of the substep. The resulting velocities go into a separate
//!    buffer, so no particle ever sees a neighbor's half-updated velocity.
//! 2. **Integration.** The buffered velocities are published, decayed by
//!    drag, projected against the colliders, and used to advance positions
//!    (semi-implicit Euler). Each particle only touches its own state.

use crate::backend::Backend;
use crate::collider::ColliderSet;
use crate::config::ClothConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::grid::ParticleGrid;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::stencil::{Stencil, StencilOffset};
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Force exerted on particle `i` by one stencil neighbor `j`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PairForce<F: Float> {
    /// Hookean term along the pair axis.
    pub spring: Vec3<F>,
    /// Dashpot term opposing the closing speed along the pair axis.
    pub dashpot: Vec3<F>,
}

impl<F: Float> PairForce<F> {
    pub fn zero() -> Self {
        PairForce { spring: Vec3::zero(), dashpot: Vec3::zero() }
    }

    pub fn total(&self) -> Vec3<F> {
        self.spring + self.dashpot
    }
}

/// Spring and dashpot force on `a` from `b`, coupled through `offset`.
///
/// Coincident particles have no defined axis and exert no force on each other.
pub fn pair_force<F: Float>(
    a: &Particle<F>,
    b: &Particle<F>,
    offset: StencilOffset,
    quad_size: F,
    stiffness: F,
    dashpot_damping: F,
) -> PairForce<F> {
    let x_ij = a.position - b.position;
    let Some(d) = x_ij.try_normalize() else {
        return PairForce::zero();
    };
    let v_ij = a.velocity - b.velocity;
    let current = x_ij.length();
    let rest = offset.rest_length(quad_size);

    let spring = d.scale(-stiffness * (current / rest - F::one()));
    let dashpot = d.scale(-v_ij.dot(d) * dashpot_damping * quad_size);
    PairForce { spring, dashpot }
}

/// Steps a [`ParticleGrid`] against a [`ColliderSet`].
#[derive(Clone, Debug)]
pub struct ClothSolver {
    stencil: Stencil,
    backend: Backend,
}

impl ClothSolver {
    pub fn new(stencil: Stencil, backend: Backend) -> Self {
        ClothSolver { stencil, backend }
    }

    /// Total force on the particle at `index`: gravity plus every in-bounds
    /// stencil neighbor, summed in stencil order.
    pub fn net_force<F: Float>(
        &self,
        grid: &ParticleGrid<F>,
        index: usize,
        config: &ClothConfig<F>,
    ) -> Result<Vec3<F>, PhysicsError> {
        grid.get(index)?;
        Ok(self.force_on(grid, index, config))
    }

    fn force_on<F: Float>(
        &self,
        grid: &ParticleGrid<F>,
        index: usize,
        config: &ClothConfig<F>,
    ) -> Vec3<F> {
        let (i, j) = grid.coords(index);
        let particles = grid.particles();
        let me = &particles[index];
        let mut force = config.gravity;
        for &offset in self.stencil.offsets() {
            let Some(other) = grid.neighbor(i, j, offset) else {
                continue;
            };
            let pair = pair_force(
                me,
                &particles[other],
                offset,
                grid.quad_size(),
                config.spring_stiffness,
                config.dashpot_damping,
            );
            force = force + pair.spring;
            force = force + pair.dashpot;
        }
        force
    }

    /// Force phase: next velocity of every particle, computed from the
    /// untouched current state. The grid is not modified.
    pub fn accumulate_forces<F: Float>(
        &self,
        grid: &ParticleGrid<F>,
        config: &ClothConfig<F>,
    ) -> AllocVec<Vec3<F>> {
        let mut next = alloc::vec![Vec3::zero(); grid.particle_count()];
        self.gather(grid, config, &mut next);
        next
    }

    /// Force phase into a caller-owned back buffer.
    pub fn accumulate_forces_into<F: Float>(
        &self,
        grid: &ParticleGrid<F>,
        config: &ClothConfig<F>,
        next: &mut [Vec3<F>],
    ) -> Result<(), PhysicsError> {
        check_len(grid, next.len())?;
        self.gather(grid, config, next);
        Ok(())
    }

    fn gather<F: Float>(&self, grid: &ParticleGrid<F>, config: &ClothConfig<F>, next: &mut [Vec3<F>]) {
        let dt = config.dt;
        self.backend.map_into(grid.particles(), next, |index, p| {
            p.velocity + self.force_on(grid, index, config).scale(dt)
        });
    }

    /// Integration phase: publish `velocities`, apply drag and contacts, and
    /// advance positions.
    pub fn integrate<F: Float>(
        &self,
        grid: &mut ParticleGrid<F>,
        velocities: &[Vec3<F>],
        colliders: &ColliderSet<F>,
        config: &ClothConfig<F>,
    ) -> Result<(), PhysicsError> {
        check_len(grid, velocities.len())?;
        self.scatter(grid, velocities, colliders, config);
        Ok(())
    }

    fn scatter<F: Float>(
        &self,
        grid: &mut ParticleGrid<F>,
        velocities: &[Vec3<F>],
        colliders: &ColliderSet<F>,
        config: &ClothConfig<F>,
    ) {
        let dt = config.dt;
        let decay = (-config.drag_damping * dt).exp();
        let friction = config.friction;
        self.backend.for_each_mut(grid.particles_mut(), |index, p| {
            p.velocity = velocities[index];
            p.damp(decay);
            p.velocity = colliders.respond(p.position, p.velocity, friction);
            p.drift(dt);
        });
    }

    /// Advance the grid by one substep of `config.dt`, using a scratch
    /// velocity buffer. Loops should prefer [`substep_with`](Self::substep_with).
    pub fn substep<F: Float, O: StepObserver>(
        &self,
        grid: &mut ParticleGrid<F>,
        colliders: &ColliderSet<F>,
        config: &ClothConfig<F>,
        observer: &mut O,
    ) {
        let mut next = AllocVec::new();
        self.substep_with(grid, colliders, config, &mut next, observer);
    }

    /// Advance one substep, reusing `next` as the velocity back buffer. The
    /// buffer is resized to the particle count if needed.
    pub fn substep_with<F: Float, O: StepObserver>(
        &self,
        grid: &mut ParticleGrid<F>,
        colliders: &ColliderSet<F>,
        config: &ClothConfig<F>,
        next: &mut AllocVec<Vec3<F>>,
        observer: &mut O,
    ) {
        next.resize(grid.particle_count(), Vec3::zero());
        self.gather(grid, config, next);
        observer.on_forces_accumulated();

        self.scatter(grid, next, colliders, config);
        observer.on_integrate();
    }

    pub fn stencil(&self) -> &Stencil { &self.stencil }
    pub fn backend(&self) -> Backend { self.backend }
}

fn check_len<F: Float>(grid: &ParticleGrid<F>, actual: usize) -> Result<(), PhysicsError> {
    let expected = grid.particle_count();
    if actual == expected {
        Ok(())
    } else {
        Err(PhysicsError::BufferLengthMismatch { expected, actual })
    }
}

impl Default for ClothSolver {
    fn default() -> Self {
        Self::new(Stencil::cloth(), Backend::default())
    }
}
