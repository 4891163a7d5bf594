//! Scalar abstraction shared by plain and derivative-carrying evaluations.
//!
//! Utility functions and the logit likelihood are written once, generically
//! over [`Scalar`]. Instantiating with `f64` yields the plain value;
//! instantiating with [`HyperDual64`] yields exact first and second
//! derivatives with respect to the seeded parameters.
use num_dual::{DualNum, HyperDual64};

/// Arithmetic surface required by utility functions and the likelihood.
///
/// Everything except [`Scalar::value`] comes from [`DualNum`]: the field
/// operations, mixed arithmetic with `f64`, and `exp`/`ln`/`sqrt`/`powi`.
/// Implementors are `Copy`, so the hot loop never allocates.
pub trait Scalar: DualNum<f64> + Copy + Send + Sync {
    /// Lift a constant (no derivative information) into the scalar type.
    #[inline]
    fn constant(value: f64) -> Self {
        <Self as From<f64>>::from(value)
    }

    /// Real part, used for branching (e.g. picking the running maximum).
    fn value(&self) -> f64;
}

impl Scalar for f64 {
    #[inline]
    fn value(&self) -> f64 {
        *self
    }
}

impl Scalar for HyperDual64 {
    #[inline]
    fn value(&self) -> f64 {
        self.re
    }
}

/// Parameter value seeded into the chosen perturbation directions.
///
/// Seeding one parameter in both directions puts `∂²f/∂θ_j²` in
/// `eps1eps2`; seeding `θ_j` in direction one and `θ_k` in direction two
/// puts the mixed partial there.
#[inline]
pub fn seed(value: f64, first: bool, second: bool) -> HyperDual64 {
    let unit = |on: bool| if on { 1.0 } else { 0.0 };
    HyperDual64::new(value, unit(first), unit(second), 0.0)
}
