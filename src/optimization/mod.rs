//! optimization — MLE stack, exact derivatives, and unified error surface.
//!
//! Purpose
//! -------
//! Provide a cohesive optimization layer for model fitting, combining an
//! Argmin-backed log-likelihood optimizer, forward-mode automatic
//! differentiation, and a single error/result surface. Callers implement a
//! log-likelihood, choose tolerances, and obtain fitted parameters and
//! diagnostics without touching backend solver details.
//!
//! Key behaviors
//! -------------
//! - Expose a high-level API for **maximizing log-likelihoods** `ℓ(θ)`
//!   (`loglik_optimizer`), including solver selection and stopping criteria.
//! - Supply the `Scalar` / `HyperDual64` arithmetic (`autodiff`) that model
//!   code uses to produce exact gradients and Hessians.
//! - Normalize configuration issues, numerical failures, and backend solver
//!   errors into a single enum (`errors::OptError`) with a common result
//!   alias (`OptResult<T>`).
//!
//! Conventions
//! -----------
//! - All solvers conceptually maximize `ℓ(θ)` by minimizing an internal
//!   cost `c(θ) = -ℓ(θ)`; user-facing APIs and outcomes are expressed in
//!   terms of `ℓ`.
//! - Parameters, gradients, and Hessians use the `ndarray` aliases `Theta`,
//!   `Grad`, `Hessian`.
//! - This module does no logging of its own; progress is handed to an
//!   `IterationSink` supplied by the caller.
//!
//! Testing notes
//! -------------
//! - `loglik_optimizer`: solver wiring, tolerance handling, and MLE behavior
//!   on toy models.
//! - `autodiff`: hyper-dual derivatives against closed forms.
//! - `errors`: conversions from backend errors into `OptError`.

pub mod autodiff;
pub mod errors;
pub mod loglik_optimizer;

pub mod prelude {
    pub use super::autodiff::{HyperDual64, Scalar, seed};
    pub use super::errors::{OptError, OptResult};
    pub use super::loglik_optimizer::prelude::*;
}
