//! Data-parallel mass-spring cloth draped over moving spheres.
//!
//! `swatch` advances an n x n sheet of point masses with explicit,
//! semi-implicit Euler substeps. Every particle is coupled to the lattice
//! neighbors of a fixed stencil by Hookean springs and dashpots, decays under
//! ambient drag, and slides inelastically over a handful of sphere colliders.
//! After a fixed amount of simulated time the sheet and the spheres are
//! re-randomized, producing a looping demonstration.
//!
//! # Features
//!
//! - **Stencil springs**: structural, shear and bending couplings from one
//!   symmetric offset set, no edge list
//! - **Snapshot force phase**: velocities are double-buffered, so the result
//!   never depends on sweep order
//! - **Backends**: serial loop or rayon pool (`parallel` feature, on by default)
//! - **Inelastic contact**: non-penetrating sphere response with friction
//! - **Reproducible episodes**: the random source is injected and seeded
//! - **Observable**: monitor substeps, frames and resets via `StepObserver`
//! - **Render topology**: static triangles, checkerboard colors, vertex normals
//! - **`no_std` compatible** with `default-features = false`: the core solver
//!   only needs `alloc`, so it runs in WASM and embedded targets
//!
//! ```
//! use swatch::{ClothConfig, Simulation};
//!
//! let config: ClothConfig<f32> = ClothConfig::with_resolution(16);
//! let mut sim = Simulation::new(config, 42)?;
//! sim.advance_frame();
//! assert_eq!(sim.positions().len(), 16 * 16);
//! assert!(sim.grid().max_speed() < 1.0);
//! # Ok::<(), swatch::PhysicsError>(())
//! ```

#![cfg_attr(not(feature = "parallel"), no_std)]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod stencil;
pub mod particle;
pub mod grid;
pub mod collider;
pub mod backend;
pub mod solver;
pub mod episode;
pub mod mesh;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::Vec3;
pub use stencil::{Stencil, StencilOffset};
pub use particle::Particle;
pub use grid::{GridLayout, ParticleGrid};
pub use collider::{resolve_contact, ColliderSet};
pub use backend::Backend;
pub use solver::{pair_force, ClothSolver, PairForce};
pub use episode::{EpisodePhase, Simulation};
pub use mesh::ClothMesh;
pub use config::ClothConfig;
pub use observer::{CountingObserver, NoOpStepObserver, StepObserver};
pub use error::PhysicsError;
