//! Floating-point abstraction so the solver runs in `f32` or `f64`.

use core::cmp::PartialOrd;
use core::ops::{Add, Sub, Mul, Div, Neg};

/// Scalar operations needed by the cloth solver.
///
/// Implemented for `f32` and `f64`. Transcendentals go through `libm` so a
/// given seed produces the same trajectory on every platform.
pub trait Float:
    Copy
    + Clone
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + Default
    + Send
    + Sync
    + core::fmt::Debug
    + 'static
{
    /// The additive identity (0.0).
    fn zero() -> Self;
    /// The multiplicative identity (1.0).
    fn one() -> Self;
    /// Half (0.5).
    fn half() -> Self;
    /// Square root.
    fn sqrt(self) -> Self;
    /// Natural exponential (e^self).
    fn exp(self) -> Self;
    /// Minimum of two values.
    fn min(self, other: Self) -> Self;
    /// Convert from f32 (for constants and configuration).
    fn from_f32(v: f32) -> Self;
    /// Convert from f64 (for derived constants computed in double precision).
    fn from_f64(v: f64) -> Self;
    /// Lossy conversion for GPU-facing buffers.
    fn to_f32(self) -> f32;
    /// `true` unless NaN or infinite.
    fn is_finite(self) -> bool;

    /// Exact for grid indices and lattice offsets.
    fn from_usize(v: usize) -> Self {
        Self::from_f64(v as f64)
    }
}

impl Float for f32 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
    fn half() -> Self { 0.5 }
    fn sqrt(self) -> Self { libm::sqrtf(self) }
    fn exp(self) -> Self { libm::expf(self) }
    fn min(self, other: Self) -> Self { if self < other { self } else { other } }
    fn from_f32(v: f32) -> Self { v }
    fn from_f64(v: f64) -> Self { v as f32 }
    fn to_f32(self) -> f32 { self }
    fn is_finite(self) -> bool { f32::is_finite(self) }
}

impl Float for f64 {
    fn zero() -> Self { 0.0 }
    fn one() -> Self { 1.0 }
    fn half() -> Self { 0.5 }
    fn sqrt(self) -> Self { libm::sqrt(self) }
    fn exp(self) -> Self { libm::exp(self) }
    fn min(self, other: Self) -> Self { if self < other { self } else { other } }
    fn from_f32(v: f32) -> Self { v as f64 }
    fn from_f64(v: f64) -> Self { v }
    fn to_f32(self) -> f32 { self as f32 }
    fn is_finite(self) -> bool { f64::is_finite(self) }
}
