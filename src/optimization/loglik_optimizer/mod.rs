//! loglik_optimizer — argmin-powered log-likelihood maximizer.
//!
//! Purpose
//! -------
//! Provide a high-level, Argmin-backed optimization layer for **maximizing
//! log-likelihoods** `ℓ(θ)`. Callers implement a single trait,
//! [`LogLikelihood`], and invoke [`maximize`] to run either a Newton
//! trust-region search (default) or L-BFGS, with finite-difference
//! fallbacks for any derivative the model does not supply.
//!
//! Key behaviors
//! -------------
//! - Convert user-supplied log-likelihoods `ℓ(θ)` into Argmin-compatible
//!   cost functions `c(θ) = -ℓ(θ)` via [`adapter::ArgMinAdapter`], which
//!   implements `CostFunction`, `Gradient` and `Hessian`.
//! - Expose a single entrypoint [`maximize`] that:
//!   - validates the initial guess with [`LogLikelihood::check`],
//!   - selects a solver via [`builders`] based on [`Method`],
//!   - executes it via [`run::run_solver`], optionally streaming
//!     iterations to an [`IterationSink`], and
//!   - normalizes results into an [`OptimOutcome`].
//! - Centralize optimizer configuration ([`Tolerances`], [`MLEOptions`]) and
//!   validation logic ([`validation`]) so downstream code can assume sane,
//!   finite inputs.
//!
//! Invariants & assumptions
//! ------------------------
//! - The optimizer **always maximizes** `ℓ(θ)` by minimizing `c(θ) = -ℓ(θ)`;
//!   user code implements `ℓ`, `∇ℓ` and `∇²ℓ`, never the cost directly.
//! - [`LogLikelihood`] methods report invalid inputs as recoverable
//!   [`OptError`](crate::optimization::errors::OptError) values, not panics.
//! - An outcome is `converged` when the solver reports convergence or the
//!   cost-gradient norm at θ̂ is within `tol_grad · max(1, |c(θ̂)|)`. The
//!   same test runs after every iteration through [`stopping::GradientStop`],
//!   since argmin's trust-region solver has no stopping rule of its own.
//!
//! Testing notes
//! -------------
//! - Submodule tests cover sign conventions ([`adapter`]), solver
//!   construction ([`builders`]), step bounds ([`linesearch`]), finite
//!   differences ([`finite_diff`]),
//!   validation ([`validation`]) and option parsing ([`traits`]).
//! - [`api`] tests run every method on a concave quadratic.

pub mod adapter;
pub mod api;
pub mod builders;
pub mod finite_diff;
pub mod linesearch;
pub mod observer;
pub mod run;
pub mod stopping;
pub mod traits;
pub mod types;
pub mod validation;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::api::maximize;
pub use self::observer::{IterationSink, ProgressObserver};
pub use self::traits::{
    LineSearcher, LogLikelihood, MLEOptions, Method, OptimOutcome, Subproblem, Tolerances,
};
pub use self::types::{Cost, DEFAULT_LBFGS_MEM, FnEvalMap, Grad, Hessian, Theta};

pub mod prelude {
    pub use super::api::maximize;
    pub use super::observer::{IterationSink, ProgressObserver};
    pub use super::traits::{LogLikelihood, MLEOptions, Method, OptimOutcome, Tolerances};
    pub use super::types::{Cost, Grad, Hessian, Theta};
}
