//! Connectivity stencil: which lattice neighbors pull on a particle.
//!
//! There is no explicit edge list. Each particle sums forces from every
//! neighbor reachable through the stencil, and since the stencil is closed
//! under negation the two per-particle sums form an action/reaction pair.

use crate::error::PhysicsError;
use crate::float::Float;
use alloc::vec::Vec as AllocVec;

/// Integer lattice offset `(di, dj)` to a coupled neighbor.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct StencilOffset {
    pub di: isize,
    pub dj: isize,
}

impl StencilOffset {
    pub const fn new(di: isize, dj: isize) -> Self {
        StencilOffset { di, dj }
    }

    pub fn negated(self) -> Self {
        StencilOffset { di: -self.di, dj: -self.dj }
    }

    pub fn manhattan(self) -> usize {
        self.di.unsigned_abs() + self.dj.unsigned_abs()
    }

    /// Euclidean norm of the integer offset.
    pub fn norm<F: Float>(self) -> F {
        let sq = (self.di * self.di + self.dj * self.dj) as usize;
        F::from_usize(sq).sqrt()
    }

    /// Spring rest length for this offset on a lattice of the given spacing.
    pub fn rest_length<F: Float>(self, quad_size: F) -> F {
        quad_size * self.norm::<F>()
    }

    /// Neighbor coordinates of `(i, j)` on an `n`x`n` grid, or `None` when the
    /// neighbor falls outside the grid.
    pub fn apply(self, i: usize, j: usize, n: usize) -> Option<(usize, usize)> {
        let ni = i.checked_add_signed(self.di)?;
        let nj = j.checked_add_signed(self.dj)?;
        if ni < n && nj < n {
            Some((ni, nj))
        } else {
            None
        }
    }
}

/// A fixed set of lattice offsets, built once at startup.
#[derive(Clone, Debug, PartialEq)]
pub struct Stencil {
    offsets: AllocVec<StencilOffset>,
    range: usize,
    manhattan_bound: usize,
}

impl Stencil {
    /// Enumerate every `(di, dj) != (0, 0)` with `|di|, |dj| <= range` and
    /// `|di| + |dj| <= manhattan_bound`, row-major in `di` then `dj`.
    pub fn new(range: usize, manhattan_bound: usize) -> Result<Self, PhysicsError> {
        if range == 0 || manhattan_bound == 0 {
            return Err(PhysicsError::EmptyStencil { range, manhattan_bound });
        }
        let r = isize::try_from(range).map_err(|_| PhysicsError::StencilRangeTooLarge(range))?;
        // No offset outside the Manhattan bound can pass the filter.
        let r = r.min(isize::try_from(manhattan_bound).unwrap_or(isize::MAX));
        let mut offsets = AllocVec::new();
        for di in -r..=r {
            for dj in -r..=r {
                let o = StencilOffset::new(di, dj);
                if (di, dj) != (0, 0) && o.manhattan() <= manhattan_bound {
                    offsets.push(o);
                }
            }
        }
        Ok(Stencil { offsets, range, manhattan_bound })
    }

    /// Structural, shear and bending couplings: range 2, Manhattan bound 2.
    pub fn cloth() -> Self {
        let offsets = CLOTH_OFFSETS.to_vec();
        Stencil { offsets, range: 2, manhattan_bound: 2 }
    }

    pub fn offsets(&self) -> &[StencilOffset] {
        &self.offsets
    }

    pub fn iter(&self) -> impl Iterator<Item = StencilOffset> + '_ {
        self.offsets().iter().copied()
    }

    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub fn range(&self) -> usize { self.range }
    pub fn manhattan_bound(&self) -> usize { self.manhattan_bound }

    pub fn contains(&self, offset: StencilOffset) -> bool {
        self.offsets().contains(&offset)
    }

    /// Every offset's negation is also present.
    pub fn is_symmetric(&self) -> bool {
        self.iter().all(|o| self.contains(o.negated()))
    }

    /// Number of stencil neighbors of `(i, j)` that lie inside an `n`x`n` grid.
    pub fn neighbor_count(&self, i: usize, j: usize, n: usize) -> usize {
        self.iter().filter(|o| o.apply(i, j, n).is_some()).count()
    }
}

impl Default for Stencil {
    fn default() -> Self {
        Self::cloth()
    }
}

const CLOTH_OFFSETS: [StencilOffset; 12] = [
    StencilOffset::new(-2, 0),
    StencilOffset::new(-1, -1),
    StencilOffset::new(-1, 0),
    StencilOffset::new(-1, 1),
    StencilOffset::new(0, -2),
    StencilOffset::new(0, -1),
    StencilOffset::new(0, 1),
    StencilOffset::new(0, 2),
    StencilOffset::new(1, -1),
    StencilOffset::new(1, 0),
    StencilOffset::new(1, 1),
    StencilOffset::new(2, 0),
];
