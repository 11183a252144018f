use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use swatch::{
    Backend, ClothConfig, ClothSolver, ColliderSet, NoOpStepObserver, Particle, ParticleGrid,
    Stencil, Vec3,
};

fn no_colliders() -> ColliderSet<f64> {
    ColliderSet::new(0, 0.0)
}

#[test]
fn flat_sheet_at_rest_stays_put() {
    let config: ClothConfig<f64> = ClothConfig::with_resolution(8)
        .with_gravity(Vec3::zero())
        .with_dt(0.001);
    // Spacing is a power of two, so every rest length is exact.
    let mut grid = ParticleGrid::flat(8, 0.125, 0.6).unwrap();
    let start = grid.clone();
    let solver = ClothSolver::default();

    for _ in 0..500 {
        solver.substep(&mut grid, &no_colliders(), &config, &mut NoOpStepObserver);
    }

    for (a, b) in grid.particles().iter().zip(start.particles()) {
        assert_eq!(a.position, b.position);
        assert_eq!(a.velocity, Vec3::zero());
    }
}

#[test]
fn kinetic_energy_never_increases_under_drag() {
    let config: ClothConfig<f64> = ClothConfig::with_resolution(8)
        .with_gravity(Vec3::zero())
        .with_spring_stiffness(0.0)
        .with_dashpot_damping(10.0)
        .with_drag_damping(1.0)
        .with_dt(0.001)
        .with_collider_count(0);
    let mut grid = ParticleGrid::flat(8, 0.125, 0.0).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for index in 0..grid.particle_count() {
        let mut p = grid.particles()[index];
        p.velocity = Vec3::new(
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
            rng.random_range(-1.0..1.0),
        );
        grid.set(index, p).unwrap();
    }

    let solver = ClothSolver::default();
    let mut previous = grid.kinetic_energy();
    assert!(previous > 0.0);
    for step in 0..400 {
        solver.substep(&mut grid, &no_colliders(), &config, &mut NoOpStepObserver);
        let energy = grid.kinetic_energy();
        assert!(
            energy <= previous,
            "kinetic energy rose at substep {}: {} -> {}",
            step,
            previous,
            energy,
        );
        previous = energy;
    }
}

#[test]
fn particle_hitting_sphere_loses_inward_velocity() {
    let radius = 0.25;
    let config: ClothConfig<f64> = ClothConfig::with_resolution(2)
        .with_quad_size(1.0)
        .with_spring_stiffness(0.0)
        .with_dashpot_damping(0.0)
        .with_dt(0.01);
    let colliders = ColliderSet::from_centers(vec![Vec3::zero()], radius);

    let mut grid = ParticleGrid::flat(2, 1.0, 5.0).unwrap();
    let surface = Vec3::new(0.0, radius, 0.0);
    grid.set(0, Particle::new(surface, Vec3::new(0.0, -3.0, 0.0))).unwrap();

    ClothSolver::default().substep(&mut grid, &colliders, &config, &mut NoOpStepObserver);

    let p = grid.particles()[0];
    let normal = Vec3::new(0.0, 1.0, 0.0);
    assert!(p.velocity.dot(normal) >= 0.0);
    assert_eq!(p.velocity.dot(normal), 0.0);
    assert!(p.position.length() >= radius);
}

#[test]
fn grazing_contact_keeps_tangential_motion_with_friction() {
    let radius = 0.25;
    let config: ClothConfig<f64> = ClothConfig::with_resolution(2)
        .with_quad_size(1.0)
        .with_gravity(Vec3::zero())
        .with_spring_stiffness(0.0)
        .with_dashpot_damping(0.0)
        .with_drag_damping(0.0)
        .with_friction(0.5)
        .with_dt(0.01);
    let colliders = ColliderSet::from_centers(vec![Vec3::zero()], radius);
    let mut grid = ParticleGrid::flat(2, 1.0, 5.0).unwrap();
    grid.set(0, Particle::new(Vec3::new(0.0, 0.2, 0.0), Vec3::new(2.0, -1.0, 0.0)))
        .unwrap();

    ClothSolver::default().substep(&mut grid, &colliders, &config, &mut NoOpStepObserver);

    assert_eq!(grid.particles()[0].velocity, Vec3::new(1.0, 0.0, 0.0));
}

#[test]
fn velocity_update_does_not_depend_on_sweep_order() {
    let config: ClothConfig<f64> = ClothConfig::with_resolution(6)
        .with_spring_stiffness(200.0)
        .with_dashpot_damping(1.0)
        .with_dt(0.0005);
    let mut grid = ParticleGrid::flat(6, 1.0 / 6.0, 0.3).unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for index in 0..grid.particle_count() {
        let mut p = grid.particles()[index];
        p.position = p.position + Vec3::new(0.0, rng.random_range(-0.02..0.02), 0.0);
        p.velocity = Vec3::new(0.0, rng.random_range(-0.5..0.5), 0.0);
        grid.set(index, p).unwrap();
    }

    let solver = ClothSolver::new(Stencil::cloth(), Backend::Serial);
    let forward = solver.accumulate_forces(&grid, &config);

    // Build the same grid with particles visited in reverse: mirror both axes
    // so index k becomes n*n-1-k, and compare mirrored results.
    let n = grid.n();
    let mut mirrored = ParticleGrid::flat(n, 1.0 / 6.0, 0.3).unwrap();
    for index in 0..grid.particle_count() {
        mirrored.set(n * n - 1 - index, grid.particles()[index]).unwrap();
    }
    let backward = solver.accumulate_forces(&mirrored, &config);
    for index in 0..grid.particle_count() {
        let a = forward[index];
        let b = backward[n * n - 1 - index];
        assert!((a - b).length() < 1e-9, "particle {} differs: {:?} vs {:?}", index, a, b);
    }
}
