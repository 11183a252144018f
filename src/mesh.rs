//! Static render topology for the cloth: triangles, colors, normals.
//!
//! Nothing here feeds back into physics.

use crate::error::PhysicsError;
use crate::float::Float;
use crate::vec::Vec3;
use alloc::vec::Vec as AllocVec;

/// Checkerboard block size in grid cells.
pub const CHECKER_BLOCK: usize = 4;

pub const COLOR_EVEN: [f32; 3] = [0.0, 0.5, 1.0];
pub const COLOR_ODD: [f32; 3] = [1.0, 0.5, 0.0];

/// Triangle indices and per-vertex colors for an `n`x`n` cloth.
#[derive(Clone, Debug, PartialEq)]
pub struct ClothMesh {
    n: usize,
    indices: AllocVec<u32>,
    colors: AllocVec<[f32; 3]>,
}

impl ClothMesh {
    /// Two triangles per grid quad, vertices indexed `i * n + j`.
    pub fn new(n: usize) -> Self {
        let quads = n.saturating_sub(1);
        let mut indices = AllocVec::with_capacity(quads * quads * 6);
        for i in 0..quads {
            for j in 0..quads {
                let v = |a: usize, b: usize| (a * n + b) as u32;
                indices.extend_from_slice(&[
                    v(i, j),
                    v(i + 1, j),
                    v(i, j + 1),
                    v(i + 1, j + 1),
                    v(i, j + 1),
                    v(i + 1, j),
                ]);
            }
        }

        let colors = (0..n * n)
            .map(|idx| {
                let (i, j) = (idx / n, idx % n);
                if (i / CHECKER_BLOCK + j / CHECKER_BLOCK) % 2 == 0 {
                    COLOR_EVEN
                } else {
                    COLOR_ODD
                }
            })
            .collect();

        ClothMesh { n, indices, colors }
    }

    pub fn indices(&self) -> &[u32] { &self.indices }
    pub fn colors(&self) -> &[[f32; 3]] { &self.colors }
    pub fn n(&self) -> usize { self.n }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Colors flattened to `[r0, g0, b0, r1, ...]`.
    pub fn flat_colors(&self) -> AllocVec<f32> {
        self.colors.iter().flatten().copied().collect()
    }

    /// Area-weighted vertex normals: each triangle's unnormalized face normal
    /// is added to its three vertices, then each sum is normalized. Winding
    /// follows [`indices`](Self::indices), so a flat sheet in the xz plane
    /// faces -y.
    ///
    /// `positions` must hold exactly `n * n` points in row-major order.
    pub fn vertex_normals<F: Float>(
        &self,
        positions: &[Vec3<F>],
    ) -> Result<AllocVec<Vec3<F>>, PhysicsError> {
        let expected = self.n * self.n;
        if positions.len() != expected {
            return Err(PhysicsError::BufferLengthMismatch { expected, actual: positions.len() });
        }
        let mut normals = alloc::vec![Vec3::zero(); positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let (a, b, c) = (tri[0] as usize, tri[1] as usize, tri[2] as usize);
            let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
            normals[a] = normals[a] + face;
            normals[b] = normals[b] + face;
            normals[c] = normals[c] + face;
        }
        Ok(normals.into_iter().map(Vec3::normalize_or_zero).collect())
    }
}
