//! autodiff — exact derivatives through generic scalar arithmetic.
//!
//! Purpose
//! -------
//! Provide the numeric types that let user-supplied utility code be
//! differentiated exactly, without hand-written gradients and without
//! finite-difference truncation error.
//!
//! Key behaviors
//! -------------
//! - [`Scalar`] is the arithmetic surface utility functions are written
//!   against. It is a thin bound over [`num_dual::DualNum`]; `f64` gives
//!   plain evaluation.
//! - [`HyperDual64`] (from `num-dual`) carries two first-order perturbations
//!   and a mixed second-order term, giving gradient and Hessian entries from
//!   seeded evaluations. [`seed`] builds the seeded parameter entries.
//!
//! Conventions
//! -----------
//! - Record fields are constants (`f64`); only parameter entries are seeded.
//! - A Hessian of a `p`-parameter function takes `p(p + 1)/2` seeded
//!   evaluations; a gradient takes `p` (direction one only).

pub mod scalar;

pub use self::scalar::{Scalar, seed};
pub use num_dual::HyperDual64;
