use swatch::{ClothConfig, ClothMesh, Simulation};
use wasm_bindgen::prelude::*;

// ---- Cloth Demo ----

#[wasm_bindgen]
pub struct ClothDemo {
    sim: Simulation<f32>,
    mesh: ClothMesh,
}

#[wasm_bindgen]
impl ClothDemo {
    #[wasm_bindgen(constructor)]
    pub fn new(n: usize, seed: u64) -> Result<ClothDemo, JsError> {
        let sim = Simulation::new(ClothConfig::with_resolution(n), seed)?;
        let mesh = ClothMesh::new(n);
        Ok(ClothDemo { sim, mesh })
    }

    /// Advance one display frame. The frame length is fixed by the config,
    /// so the host's wall-clock delta is ignored.
    pub fn update(&mut self) {
        self.sim.advance_frame();
    }

    /// Returns [x0, y0, z0, x1, ...] in row-major particle order
    pub fn positions(&self) -> Vec<f32> {
        self.sim.grid().flat_positions()
    }

    /// Returns [x0, y0, z0, ...] unit vertex normals for shading
    pub fn normals(&self) -> Result<Vec<f32>, JsError> {
        let normals = self.mesh.vertex_normals(&self.sim.positions())?;
        Ok(normals.iter().flat_map(|n| n.to_f32_array()).collect())
    }

    pub fn indices(&self) -> Vec<u32> {
        self.mesh.indices().to_vec()
    }

    pub fn colors(&self) -> Vec<f32> {
        self.mesh.flat_colors()
    }

    /// Returns [x0, y0, z0, x1, ...] for each collider sphere
    pub fn collider_centers(&self) -> Vec<f32> {
        self.sim.colliders().flat_centers()
    }

    pub fn collider_radius(&self) -> f32 {
        self.sim.collider_radius()
    }

    pub fn episode(&self) -> u32 {
        self.sim.episode() as u32
    }

    pub fn clock(&self) -> f32 {
        self.sim.clock()
    }
}
