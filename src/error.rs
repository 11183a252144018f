//! Error types for cloth configuration and setup.
//!
//! Stepping itself never fails: degenerate geometry resolves locally and
//! numerical blow-up is a tuning concern of the configuration.

use thiserror::Error;

/// Errors that can occur while configuring or building a simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PhysicsError {
    /// Grid must be at least 2x2 so that every particle has a neighbor.
    #[error("grid must be at least 2x2 (got {0}x{0})")]
    InvalidGridDimensions(usize),
    /// Lattice spacing must be positive and finite.
    #[error("lattice spacing must be positive and finite")]
    InvalidSpacing,
    /// Time step must be positive and finite.
    #[error("time step must be positive and finite")]
    InvalidTimeStep,
    /// At least one substep per frame is required.
    #[error("at least one substep per frame is required")]
    InvalidSubSteps,
    /// Spring stiffness must be non-negative and finite.
    #[error("spring stiffness must be non-negative and finite")]
    InvalidStiffness,
    /// Damping coefficients must be non-negative and finite.
    #[error("damping coefficient `{0}` must be non-negative and finite")]
    InvalidDamping(&'static str),
    /// Contact friction fraction must be in [0, 1].
    #[error("friction fraction must be in [0, 1]")]
    InvalidFriction,
    /// Collider radius scale must be positive and finite.
    #[error("collider radius scale must be positive and finite")]
    InvalidColliderRadius,
    /// Episode duration must be positive and finite.
    #[error("episode duration must be positive and finite")]
    InvalidEpisodeDuration,
    /// Gravity, rest height and jitter must be finite.
    #[error("`{0}` must be finite")]
    NonFiniteParameter(&'static str),
    /// Stencil range and Manhattan bound must both be at least 1.
    #[error("stencil is empty (range {range}, manhattan bound {manhattan_bound})")]
    EmptyStencil { range: usize, manhattan_bound: usize },
    /// Stencil range does not fit a signed lattice offset.
    #[error("stencil range {0} is too large for a lattice offset")]
    StencilRangeTooLarge(usize),
    /// A per-particle buffer does not match the particle count.
    #[error("buffer holds {actual} entries, expected one per particle ({expected})")]
    BufferLengthMismatch { expected: usize, actual: usize },
    /// Particle index is out of bounds.
    #[error("particle index {index} out of bounds (count: {count})")]
    ParticleOutOfBounds { index: usize, count: usize },
}
