//! Episode controller: owns the cloth, the colliders, the clock and the
//! random source, and loops the demonstration by resetting after a fixed
//! amount of simulated time.

use crate::backend::Backend;
use crate::collider::ColliderSet;
use crate::config::ClothConfig;
use crate::error::PhysicsError;
use crate::float::Float;
use crate::grid::{GridLayout, ParticleGrid};
use crate::observer::{NoOpStepObserver, StepObserver};
use crate::solver::ClothSolver;
use crate::stencil::Stencil;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;
use log::{debug, info, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Where the controller is in its two-state cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EpisodePhase {
    /// Clock below the episode duration.
    Running,
    /// Clock has reached the episode duration; the next frame resets first.
    Resetting,
}

/// A looping cloth simulation.
///
/// The random source is injected and owned here, so a seed fully determines
/// every episode.
pub struct Simulation<F: Float, R: Rng = ChaCha8Rng> {
    grid: ParticleGrid<F>,
    colliders: ColliderSet<F>,
    solver: ClothSolver,
    /// Phase A back buffer, reused by every substep.
    next_velocities: AllocVec<Vec3<F>>,
    config: ClothConfig<F>,
    rng: R,
    clock: F,
    episode: u64,
    frame: u64,
}

impl<F: Float> Simulation<F, ChaCha8Rng> {
    /// Build and initialize a simulation seeded with `seed`.
    pub fn new(config: ClothConfig<F>, seed: u64) -> Result<Self, PhysicsError> {
        Self::with_rng(config, ChaCha8Rng::seed_from_u64(seed))
    }
}

impl<F: Float, R: Rng> Simulation<F, R> {
    /// Build and initialize a simulation drawing from `rng`.
    pub fn with_rng(config: ClothConfig<F>, rng: R) -> Result<Self, PhysicsError> {
        Self::with_parts(config, rng, ClothSolver::default())
    }

    /// Build with an explicit stencil and backend.
    pub fn with_parts(
        config: ClothConfig<F>,
        rng: R,
        solver: ClothSolver,
    ) -> Result<Self, PhysicsError> {
        config.validate()?;
        if solver.stencil().is_empty() {
            return Err(PhysicsError::EmptyStencil {
                range: solver.stencil().range(),
                manhattan_bound: solver.stencil().manhattan_bound(),
            });
        }
        let grid = ParticleGrid::new(config.n, config.quad_size)?;
        let colliders = ColliderSet::new(config.collider_count, config.collider_radius());
        debug!(
            "cloth config: n={} dt={:?} sub_steps={} stiffness={:?} dashpot={:?} drag={:?}",
            config.n,
            config.dt,
            config.sub_steps,
            config.spring_stiffness,
            config.dashpot_damping,
            config.drag_damping,
        );

        let next_velocities = alloc::vec![Vec3::zero(); grid.particle_count()];
        let mut sim = Simulation {
            grid,
            colliders,
            solver,
            next_velocities,
            config,
            rng,
            clock: F::zero(),
            episode: 0,
            frame: 0,
        };
        sim.initialize_state();
        info!(
            "cloth simulation ready: {}x{} particles, {} colliders, {} stencil offsets, {} backend",
            sim.config.n,
            sim.config.n,
            sim.colliders.len(),
            sim.solver.stencil().len(),
            sim.solver.backend().name(),
        );
        Ok(sim)
    }

    fn initialize_state(&mut self) {
        let layout = GridLayout::from_config(&self.config);
        self.grid.initialize(&mut self.rng, &layout);
        self.colliders.initialize(&mut self.rng);
        self.clock = F::zero();
    }

    pub fn phase(&self) -> EpisodePhase {
        if self.clock >= self.config.episode_duration {
            EpisodePhase::Resetting
        } else {
            EpisodePhase::Running
        }
    }

    pub fn needs_reset(&self) -> bool {
        self.phase() == EpisodePhase::Resetting
    }

    /// Replace the grid and colliders with a fresh random configuration and
    /// zero the clock, all before any further substep can run.
    pub fn reset(&mut self) {
        self.reset_observed(&mut NoOpStepObserver);
    }

    pub fn reset_observed<O: StepObserver>(&mut self, observer: &mut O) {
        self.initialize_state();
        self.episode += 1;
        info!("episode {} started after frame {}", self.episode, self.frame);
        observer.on_episode_reset(self.episode);
    }

    /// Advance one substep and the clock by `dt`. Does not check for reset.
    pub fn substep(&mut self) {
        self.substep_observed(&mut NoOpStepObserver);
    }

    pub fn substep_observed<O: StepObserver>(&mut self, observer: &mut O) {
        self.solver.substep_with(
            &mut self.grid,
            &self.colliders,
            &self.config,
            &mut self.next_velocities,
            observer,
        );
        self.clock = self.clock + self.config.dt;
    }

    /// Advance one rendered frame: reset if the episode has run out, then run
    /// every substep of the frame.
    pub fn advance_frame(&mut self) {
        self.advance_frame_observed(&mut NoOpStepObserver);
    }

    pub fn advance_frame_observed<O: StepObserver>(&mut self, observer: &mut O) {
        if self.needs_reset() {
            self.reset_observed(observer);
        }
        for sub in 0..self.config.sub_steps {
            self.substep_observed(observer);
            observer.on_substep_complete(sub);
            trace!("frame {} substep {} clock {:?}", self.frame, sub, self.clock);
        }
        self.frame += 1;
        observer.on_frame_complete();
        debug!(
            "frame {} done: episode {} clock {:?} kinetic energy {:?}",
            self.frame,
            self.episode,
            self.clock,
            self.grid.kinetic_energy(),
        );
    }

    /// Run `frames` frames.
    pub fn run_frames(&mut self, frames: usize) {
        for _ in 0..frames {
            self.advance_frame();
        }
    }

    pub fn grid(&self) -> &ParticleGrid<F> { &self.grid }
    pub fn colliders(&self) -> &ColliderSet<F> { &self.colliders }
    pub fn config(&self) -> &ClothConfig<F> { &self.config }
    pub fn stencil(&self) -> &Stencil { self.solver.stencil() }
    pub fn backend(&self) -> Backend { self.solver.backend() }

    /// Simulated seconds since the last reset.
    pub fn clock(&self) -> F { self.clock }

    /// Number of resets so far.
    pub fn episode(&self) -> u64 { self.episode }

    /// Number of completed frames.
    pub fn frame(&self) -> u64 { self.frame }

    /// Row-major positions, published once per frame.
    pub fn positions(&self) -> AllocVec<Vec3<F>> {
        self.grid.positions()
    }

    pub fn collider_centers(&self) -> &[Vec3<F>] {
        self.colliders.centers()
    }

    pub fn collider_radius(&self) -> F {
        self.colliders.radius()
    }
}
