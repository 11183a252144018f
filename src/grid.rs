//! Particle grid: an n x n sheet of point masses in row-major order.

use crate::config::ClothConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::particle::Particle;
use crate::stencil::StencilOffset;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;
use rand::Rng;

/// How a freshly reset grid is laid out.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridLayout<F: Float> {
    /// Height of the flat sheet.
    pub rest_height: F,
    /// Scale of the shared horizontal jitter.
    pub jitter_scale: F,
}

impl<F: Float> GridLayout<F> {
    pub fn from_config(config: &ClothConfig<F>) -> Self {
        GridLayout {
            rest_height: config.rest_height,
            jitter_scale: config.jitter_scale,
        }
    }
}

/// An `n`x`n` cloth of particles. The particle at `(i, j)` has index `i * n + j`.
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleGrid<F: Float> {
    particles: AllocVec<Particle<F>>,
    n: usize,
    quad_size: F,
}

impl<F: Float> ParticleGrid<F> {
    /// Create a grid with every particle at the origin and at rest.
    /// Call [`initialize`](Self::initialize) or [`flat`](Self::flat) to lay it out.
    pub fn new(n: usize, quad_size: F) -> Result<Self, PhysicsError> {
        if n < 2 {
            return Err(PhysicsError::InvalidGridDimensions(n));
        }
        if !(quad_size.is_finite() && quad_size > F::zero()) {
            return Err(PhysicsError::InvalidSpacing);
        }
        Ok(ParticleGrid {
            particles: alloc::vec![Particle::default(); n * n],
            n,
            quad_size,
        })
    }

    /// Unjittered flat sheet at `height`, every spring exactly at rest length.
    pub fn flat(n: usize, quad_size: F, height: F) -> Result<Self, PhysicsError> {
        let mut grid = Self::new(n, quad_size)?;
        grid.lay_out(height, F::zero(), F::zero());
        Ok(grid)
    }

    /// Reset to a flat horizontal sheet with zero velocity.
    ///
    /// One jitter vector is drawn per call and shared by the whole grid, so the
    /// sheet moves rigidly and every spring stays at its lattice rest length.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R, layout: &GridLayout<F>) {
        let jx = (F::from_f32(rng.random::<f32>()) - F::half()) * layout.jitter_scale;
        let jz = (F::from_f32(rng.random::<f32>()) - F::half()) * layout.jitter_scale;
        self.lay_out(layout.rest_height, jx, jz);
    }

    fn lay_out(&mut self, height: F, jx: F, jz: F) {
        let n = self.n;
        let q = self.quad_size;
        for (idx, p) in self.particles.iter_mut().enumerate() {
            let (i, j) = (idx / n, idx % n);
            let x = F::from_usize(i) * q - F::half() + jx;
            let z = F::from_usize(j) * q - F::half() + jz;
            *p = Particle::at_rest(Vec3::new(x, height, z));
        }
    }

    pub fn index(&self, i: usize, j: usize) -> usize {
        i * self.n + j
    }

    pub fn coords(&self, index: usize) -> (usize, usize) {
        (index / self.n, index % self.n)
    }

    /// Index of the neighbor at `offset` from `(i, j)`, or `None` off the grid.
    pub fn neighbor(&self, i: usize, j: usize, offset: StencilOffset) -> Option<usize> {
        offset.apply(i, j, self.n).map(|(ni, nj)| self.index(ni, nj))
    }

    pub fn particle(&self, i: usize, j: usize) -> &Particle<F> {
        &self.particles[self.index(i, j)]
    }

    pub fn get(&self, index: usize) -> Result<&Particle<F>, PhysicsError> {
        self.particles.get(index).ok_or(PhysicsError::ParticleOutOfBounds {
            index,
            count: self.particles.len(),
        })
    }

    /// Overwrite one particle's state.
    pub fn set(&mut self, index: usize, particle: Particle<F>) -> Result<(), PhysicsError> {
        let count = self.particles.len();
        let slot = self
            .particles
            .get_mut(index)
            .ok_or(PhysicsError::ParticleOutOfBounds { index, count })?;
        *slot = particle;
        Ok(())
    }

    pub fn particles(&self) -> &[Particle<F>] {
        &self.particles
    }

    pub(crate) fn particles_mut(&mut self) -> &mut [Particle<F>] {
        &mut self.particles
    }

    pub fn position_at(&self, i: usize, j: usize) -> Vec3<F> {
        self.particle(i, j).position
    }

    pub fn velocity_at(&self, i: usize, j: usize) -> Vec3<F> {
        self.particle(i, j).velocity
    }

    /// Positions in row-major order.
    pub fn positions(&self) -> AllocVec<Vec3<F>> {
        self.particles.iter().map(|p| p.position).collect()
    }

    /// Velocities in row-major order.
    pub fn velocities(&self) -> AllocVec<Vec3<F>> {
        self.particles.iter().map(|p| p.velocity).collect()
    }

    /// Interleaved `[x0, y0, z0, x1, ...]` for vertex buffers.
    pub fn flat_positions(&self) -> AllocVec<f32> {
        let mut out = AllocVec::with_capacity(self.particles.len() * 3);
        for p in &self.particles {
            out.extend_from_slice(&p.position.to_f32_array());
        }
        out
    }

    /// Total kinetic energy of the sheet (unit masses).
    pub fn kinetic_energy(&self) -> F {
        self.particles
            .iter()
            .fold(F::zero(), |acc, p| acc + p.kinetic_energy())
    }

    /// Mean particle position.
    pub fn centroid(&self) -> Vec3<F> {
        let sum = self
            .particles
            .iter()
            .fold(Vec3::zero(), |acc, p| acc + p.position);
        sum.scale(F::one() / F::from_usize(self.particles.len()))
    }

    /// Largest particle speed. NaN compares false, so a non-finite speed is
    /// reported as infinity rather than hidden.
    pub fn max_speed(&self) -> F {
        let infinity = F::one() / F::zero();
        self.particles.iter().fold(F::zero(), |fastest, p| {
            let speed = p.velocity.length();
            if !speed.is_finite() {
                infinity
            } else if speed > fastest {
                speed
            } else {
                fastest
            }
        })
    }

    /// `false` once any component has gone NaN or infinite.
    pub fn is_finite(&self) -> bool {
        self.particles
            .iter()
            .all(|p| p.position.is_finite() && p.velocity.is_finite())
    }

    pub fn n(&self) -> usize { self.n }
    pub fn quad_size(&self) -> F { self.quad_size }
    pub fn particle_count(&self) -> usize { self.particles.len() }
}
