//! Execution backends for the per-particle phases of a substep.
//!
//! The solver only describes what happens to one particle. A backend decides
//! how the grid is swept: a plain loop, or a rayon task pool when the
//! `parallel` feature is enabled. Every particle's arithmetic is independent of
//! the sweep order, so all backends produce bit-identical states.

use crate::float::Float;
use crate::particle::Particle;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// How a phase is swept over the grid.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Backend {
    /// Single-threaded loop in index order.
    #[cfg_attr(not(feature = "parallel"), default)]
    Serial,
    /// Rayon work-stealing pool.
    #[cfg(feature = "parallel")]
    #[default]
    Rayon,
}

impl Backend {
    /// Read-only sweep writing one value per particle into `out`.
    ///
    /// Returns only after every particle is done, which is the barrier between
    /// the gather phase and whatever consumes its output. `out` must hold one
    /// slot per particle; extra slots on either side are left alone.
    pub fn map_into<F, T, M>(self, particles: &[Particle<F>], out: &mut [T], f: M)
    where
        F: Float,
        T: Send,
        M: Fn(usize, &Particle<F>) -> T + Sync + Send,
    {
        match self {
            Backend::Serial => out
                .iter_mut()
                .zip(particles)
                .enumerate()
                .for_each(|(i, (slot, p))| *slot = f(i, p)),
            #[cfg(feature = "parallel")]
            Backend::Rayon => out
                .par_iter_mut()
                .zip(particles.par_iter())
                .enumerate()
                .for_each(|(i, (slot, p))| *slot = f(i, p)),
        }
    }

    /// In-place sweep where each call only touches its own particle.
    pub fn for_each_mut<F, U>(self, particles: &mut [Particle<F>], f: U)
    where
        F: Float,
        U: Fn(usize, &mut Particle<F>) + Sync + Send,
    {
        match self {
            Backend::Serial => particles.iter_mut().enumerate().for_each(|(i, p)| f(i, p)),
            #[cfg(feature = "parallel")]
            Backend::Rayon => particles.par_iter_mut().enumerate().for_each(|(i, p)| f(i, p)),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Backend::Serial => "serial",
            #[cfg(feature = "parallel")]
            Backend::Rayon => "rayon",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec3;
    use alloc::vec::Vec as AllocVec;

    fn sample() -> AllocVec<Particle<f64>> {
        (0..64)
            .map(|i| Particle::at_rest(Vec3::new(i as f64, 0.0, 0.0)))
            .collect()
    }

    #[test]
    fn serial_map_preserves_order() {
        let mut out = alloc::vec![(0usize, 0.0f64); 64];
        Backend::Serial.map_into(&sample(), &mut out, |i, p| (i, p.position.x));
        for (i, (idx, x)) in out.into_iter().enumerate() {
            assert_eq!(idx, i);
            assert_eq!(x, i as f64);
        }
    }

    #[test]
    fn map_into_reuses_the_buffer() {
        let particles = sample();
        let mut out = alloc::vec![-1.0f64; 64];
        let ptr = out.as_ptr();
        Backend::default().map_into(&particles, &mut out, |_, p| p.position.x * 2.0);
        Backend::default().map_into(&particles, &mut out, |_, p| p.position.x * 3.0);
        assert_eq!(out.as_ptr(), ptr);
        assert_eq!(out[5], 15.0);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn rayon_map_matches_serial() {
        let particles = sample();
        let mut a = alloc::vec![0.0f64; 64];
        let mut b = alloc::vec![0.0f64; 64];
        Backend::Serial.map_into(&particles, &mut a, |i, p| p.position.x * i as f64);
        Backend::Rayon.map_into(&particles, &mut b, |i, p| p.position.x * i as f64);
        assert_eq!(a, b);
    }

    #[test]
    fn for_each_mut_touches_every_particle() {
        let mut particles = sample();
        Backend::default().for_each_mut(&mut particles, |i, p| {
            p.velocity = Vec3::new(0.0, i as f64, 0.0);
        });
        assert!(particles.iter().enumerate().all(|(i, p)| p.velocity.y == i as f64));
    }
}
