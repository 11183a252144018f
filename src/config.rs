//! Configuration for the cloth simulation.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec3;

/// Grid resolution used by [`ClothConfig::default`].
pub const DEFAULT_RESOLUTION: usize = 128;

/// Simulated seconds per rendered frame.
pub const FRAME_TIME: f64 = 1.0 / 60.0;

/// Physical and scheduling parameters of a cloth simulation.
///
/// # Builder Pattern
/// ```
/// use swatch::config::ClothConfig;
/// use swatch::vec::Vec3;
///
/// let config: ClothConfig<f32> = ClothConfig::with_resolution(64)
///     .with_gravity(Vec3::new(0.0, -9.8, 0.0))
///     .with_spring_stiffness(2e4)
///     .with_collider_count(3);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct ClothConfig<F: Float> {
    /// Particles per side; the grid holds `n * n` particles.
    pub n: usize,
    /// Lattice spacing. Default: `1 / n`.
    pub quad_size: F,
    /// Substep size. Default: `0.04 / n` from `n = 128` up, `0.04 * n / 128^2` below.
    pub dt: F,
    /// Substeps per frame. Default: `floor((1/60) / dt)`.
    pub sub_steps: usize,
    /// Gravity acceleration. Default: `(0, -9.8, 0)`.
    pub gravity: Vec3<F>,
    /// Hookean spring stiffness. Default: 1e4.
    pub spring_stiffness: F,
    /// Dashpot damping along each spring axis. Default: 1e4.
    pub dashpot_damping: F,
    /// Exponential velocity decay rate. Default: 1.
    pub drag_damping: F,
    /// Velocity kept after a contact, in [0, 1]. Default: 0.99.
    pub friction: F,
    /// Number of sphere colliders. Default: 5.
    pub collider_count: usize,
    /// Collider radius is `collider_radius_scale / collider_count`. Default: 0.5.
    pub collider_radius_scale: F,
    /// Simulated seconds before an episode resets. Default: 1.5.
    pub episode_duration: F,
    /// Height of the flat cloth at reset. Default: 0.6.
    pub rest_height: F,
    /// Magnitude of the shared horizontal jitter at reset. Default: 0.1.
    pub jitter_scale: F,
}

impl<F: Float> ClothConfig<F> {
    /// Create a config for the default resolution.
    pub fn new() -> Self {
        Self::with_resolution(DEFAULT_RESOLUTION)
    }

    /// Create a config for an `n`x`n` grid, deriving spacing, time step and
    /// substep count from `n`.
    ///
    /// The explicit dashpot is stable while `dashpot_damping * quad_size * dt`
    /// stays at its `n = 128` value. Coarser grids have longer springs, so the
    /// step shrinks with `n^2` below the default resolution and more substeps
    /// fill each frame.
    pub fn with_resolution(n: usize) -> Self {
        let side = n.max(1) as f64;
        let dt = stable_dt(side);
        ClothConfig {
            n,
            quad_size: F::from_f64(1.0 / side),
            dt: F::from_f64(dt),
            sub_steps: sub_steps_for(dt),
            gravity: Vec3::new(F::zero(), F::from_f32(-9.8), F::zero()),
            spring_stiffness: F::from_f32(1e4),
            dashpot_damping: F::from_f32(1e4),
            drag_damping: F::one(),
            friction: F::from_f32(0.99),
            collider_count: 5,
            collider_radius_scale: F::half(),
            episode_duration: F::from_f32(1.5),
            rest_height: F::from_f32(0.6),
            jitter_scale: F::from_f32(0.1),
        }
    }

    /// Set the lattice spacing.
    pub fn with_quad_size(mut self, quad_size: F) -> Self {
        self.quad_size = quad_size;
        self
    }

    /// Set the substep size. The substep count is left untouched.
    pub fn with_dt(mut self, dt: F) -> Self {
        self.dt = dt;
        self
    }

    /// Set the number of substeps per frame.
    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec3<F>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the spring stiffness.
    pub fn with_spring_stiffness(mut self, stiffness: F) -> Self {
        self.spring_stiffness = stiffness;
        self
    }

    /// Set the dashpot damping coefficient.
    pub fn with_dashpot_damping(mut self, damping: F) -> Self {
        self.dashpot_damping = damping;
        self
    }

    /// Set the drag damping rate.
    pub fn with_drag_damping(mut self, damping: F) -> Self {
        self.drag_damping = damping;
        self
    }

    /// Set the contact friction fraction.
    pub fn with_friction(mut self, friction: F) -> Self {
        self.friction = friction;
        self
    }

    /// Set the number of colliders.
    pub fn with_collider_count(mut self, count: usize) -> Self {
        self.collider_count = count;
        self
    }

    /// Set the collider radius scale.
    pub fn with_collider_radius_scale(mut self, scale: F) -> Self {
        self.collider_radius_scale = scale;
        self
    }

    /// Set the episode duration.
    pub fn with_episode_duration(mut self, seconds: F) -> Self {
        self.episode_duration = seconds;
        self
    }

    /// Set the rest height of the cloth plane.
    pub fn with_rest_height(mut self, height: F) -> Self {
        self.rest_height = height;
        self
    }

    /// Set the jitter scale applied at reset.
    pub fn with_jitter_scale(mut self, scale: F) -> Self {
        self.jitter_scale = scale;
        self
    }

    /// Shared collider radius. Zero when there are no colliders.
    pub fn collider_radius(&self) -> F {
        if self.collider_count == 0 {
            F::zero()
        } else {
            self.collider_radius_scale / F::from_usize(self.collider_count)
        }
    }

    /// Simulated seconds covered by one frame of substeps.
    pub fn frame_duration(&self) -> F {
        self.dt * F::from_usize(self.sub_steps)
    }

    pub fn particle_count(&self) -> usize {
        self.n * self.n
    }

    /// Check every parameter. Stepping assumes a validated config.
    pub fn validate(&self) -> Result<(), PhysicsError> {
        if self.n < 2 {
            return Err(PhysicsError::InvalidGridDimensions(self.n));
        }
        if !(self.quad_size.is_finite() && self.quad_size > F::zero()) {
            return Err(PhysicsError::InvalidSpacing);
        }
        if !(self.dt.is_finite() && self.dt > F::zero()) {
            return Err(PhysicsError::InvalidTimeStep);
        }
        if self.sub_steps == 0 {
            return Err(PhysicsError::InvalidSubSteps);
        }
        if !non_negative(self.spring_stiffness) {
            return Err(PhysicsError::InvalidStiffness);
        }
        if !non_negative(self.dashpot_damping) {
            return Err(PhysicsError::InvalidDamping("dashpot_damping"));
        }
        if !non_negative(self.drag_damping) {
            return Err(PhysicsError::InvalidDamping("drag_damping"));
        }
        if !(non_negative(self.friction) && self.friction <= F::one()) {
            return Err(PhysicsError::InvalidFriction);
        }
        if !(self.collider_radius_scale.is_finite() && self.collider_radius_scale > F::zero()) {
            return Err(PhysicsError::InvalidColliderRadius);
        }
        if !(self.episode_duration.is_finite() && self.episode_duration > F::zero()) {
            return Err(PhysicsError::InvalidEpisodeDuration);
        }
        if !self.gravity.is_finite() {
            return Err(PhysicsError::NonFiniteParameter("gravity"));
        }
        if !self.rest_height.is_finite() {
            return Err(PhysicsError::NonFiniteParameter("rest_height"));
        }
        if !self.jitter_scale.is_finite() {
            return Err(PhysicsError::NonFiniteParameter("jitter_scale"));
        }
        Ok(())
    }
}

impl<F: Float> Default for ClothConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// `0.04 / n`, scaled by `(n / 128)^2` below the default resolution.
fn stable_dt(side: f64) -> f64 {
    let reference = DEFAULT_RESOLUTION as f64;
    let dt = 0.04 / side;
    if side < reference {
        dt * (side / reference) * (side / reference)
    } else {
        dt
    }
}

/// Whole substeps of size `dt` that fit in one frame, at least one.
fn sub_steps_for(dt: f64) -> usize {
    (libm::floor(FRAME_TIME / dt) as usize).max(1)
}

fn non_negative<F: Float>(v: F) -> bool {
    v.is_finite() && v >= F::zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_reference_constants() {
        let c: ClothConfig<f64> = ClothConfig::default();
        assert_eq!(c.n, 128);
        assert_eq!(c.quad_size, 1.0 / 128.0);
        assert_eq!(c.dt, 0.04 / 128.0);
        assert_eq!(c.sub_steps, 53);
        assert!((c.collider_radius() - 0.1).abs() < 1e-12);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn coarse_grids_keep_the_default_dashpot_step() {
        let reference: ClothConfig<f64> = ClothConfig::default();
        let factor = |c: &ClothConfig<f64>| c.dashpot_damping * c.quad_size * c.dt;
        for n in [2, 4, 8, 16, 32, 64, 127] {
            let c: ClothConfig<f64> = ClothConfig::with_resolution(n);
            assert!(
                (factor(&c) - factor(&reference)).abs() < 1e-12,
                "n={} dashpot step {}",
                n,
                factor(&c),
            );
            // A frame still covers one sixtieth of a second.
            assert!(c.frame_duration() <= FRAME_TIME);
            assert!(c.frame_duration() > FRAME_TIME - c.dt);
        }
    }

    #[test]
    fn fine_grids_keep_the_linear_step() {
        let c: ClothConfig<f64> = ClothConfig::with_resolution(256);
        assert_eq!(c.dt, 0.04 / 256.0);
        assert_eq!(c.sub_steps, 106);
    }

    #[test]
    fn rejects_tiny_grid() {
        let c: ClothConfig<f32> = ClothConfig::with_resolution(1);
        assert_eq!(c.validate(), Err(PhysicsError::InvalidGridDimensions(1)));
    }

    #[test]
    fn rejects_bad_friction() {
        let c: ClothConfig<f32> = ClothConfig::new().with_friction(1.5);
        assert_eq!(c.validate(), Err(PhysicsError::InvalidFriction));
    }

    #[test]
    fn rejects_negative_drag() {
        let c: ClothConfig<f32> = ClothConfig::new().with_drag_damping(-1.0);
        assert_eq!(c.validate(), Err(PhysicsError::InvalidDamping("drag_damping")));
    }

    #[test]
    fn rejects_zero_substeps() {
        let c: ClothConfig<f32> = ClothConfig::new().with_sub_steps(0);
        assert_eq!(c.validate(), Err(PhysicsError::InvalidSubSteps));
    }

    #[test]
    fn no_colliders_means_zero_radius() {
        let c: ClothConfig<f32> = ClothConfig::new().with_collider_count(0);
        assert_eq!(c.collider_radius(), 0.0);
        assert!(c.validate().is_ok());
    }
}
