//! Headless cloth run - prints per-frame statistics
//!
//! Drops a 128x128 sheet on the default spheres and reports the centroid
//! height, kinetic energy and episode counter once per second of simulated
//! time. Set RUST_LOG=debug to see per-frame logging.
//!
//! Run with: cargo run --example headless --release -- [frames] [seed]

use std::time::Instant;
use swatch::{ClothConfig, ClothMesh, CountingObserver, Simulation};

const FRAMES_PER_REPORT: u64 = 60;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let frames: u64 = args.next().map(|a| a.parse()).transpose()?.unwrap_or(240);
    let seed: u64 = args.next().map(|a| a.parse()).transpose()?.unwrap_or(0);

    let config: ClothConfig<f32> = ClothConfig::default();
    let mut sim = Simulation::new(config, seed)?;
    let mesh = ClothMesh::new(sim.config().n);
    let mut observer = CountingObserver::default();

    println!(
        "{}x{} cloth, {} substeps/frame, backend {}, seed {}",
        sim.config().n,
        sim.config().n,
        sim.config().sub_steps,
        sim.backend().name(),
        seed,
    );

    let start = Instant::now();
    for _ in 0..frames {
        sim.advance_frame_observed(&mut observer);
        if sim.frame() % FRAMES_PER_REPORT == 0 {
            let grid = sim.grid();
            println!(
                "frame {:5}  episode {:2}  t={:.3}s  centroid y={:+.4}  KE={:.5}  max |v|={:.3}",
                sim.frame(),
                sim.episode(),
                sim.clock(),
                grid.centroid().y,
                grid.kinetic_energy(),
                grid.max_speed(),
            );
        }
    }
    let elapsed = start.elapsed();

    let normals = mesh.vertex_normals(&sim.positions())?;
    let upward = normals.iter().filter(|n| n.y > 0.0).count();
    println!(
        "{} frames, {} substeps, {} resets in {:.2?} ({:.1} frames/s)",
        observer.frames,
        observer.substeps,
        observer.resets,
        elapsed,
        frames as f64 / elapsed.as_secs_f64(),
    );
    println!("{} of {} vertex normals face +y", upward, normals.len());
    if !(sim.grid().is_finite() && sim.grid().max_speed().is_finite()) {
        return Err("cloth state diverged".into());
    }
    Ok(())
}
