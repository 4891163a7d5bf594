//! inference — asymptotic covariance for fitted models.
//!
//! Purpose
//! -------
//! Provide post-estimation uncertainty quantification: classical
//! observed-information covariance `I(θ̂)⁻¹` for the free parameters, laid
//! out over the full coefficient list with `NaN` for fixed coefficients.
//!
//! Key behaviors
//! -------------
//! - [`invert_information`] classifies the information matrix through a
//!   symmetric eigendecomposition and returns a [`CovarianceEstimate`].
//! - [`embed_covariance`] builds the `(free + fixed)²` reported matrix.
//! - Failures are [`InferenceError`] values; a singular information matrix
//!   is an ordinary outcome, not an error.
//!
//! Conventions
//! -----------
//! - Inputs are on the *sum* log-likelihood scale (no `1/n` factor), so the
//!   covariance is the inverse information directly.
//! - No logging here; callers decide how to report a singular outcome.

pub mod errors;
pub mod hessian;

pub use self::errors::{InferenceError, InferenceResult};
pub use self::hessian::{CovarianceEstimate, SINGULAR_REL_TOL, embed_covariance, invert_information};
