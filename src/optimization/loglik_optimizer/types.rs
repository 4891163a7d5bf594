//! loglik_optimizer::types — shared numeric aliases and solver wiring.
//!
//! Purpose
//! -------
//! Centralize the core numeric types and solver aliases used by the
//! log-likelihood optimizer. By defining these in one place, the rest of
//! the optimization code can stay agnostic to `ndarray` and Argmin
//! generics and can more easily evolve if the backend changes.
//!
//! Key behaviors
//! -------------
//! - Define canonical aliases for parameter vectors, gradients,
//!   Hessians, and scalar costs (`Theta`, `Grad`, `Hessian`, `Cost`).
//! - Provide a standard map type for Argmin function-evaluation counters
//!   (`FnEvalMap`).
//! - Expose pre-wired trust-region and L-BFGS solver aliases, using the
//!   common `(Theta, Grad, Hessian, Cost)` numeric shapes. L-BFGS line
//!   searches are wrapped in [`BoundedLineSearch`].
//!
//! Invariants & assumptions
//! ------------------------
//! - All optimizer vectors and matrices are represented as `ndarray`
//!   containers over `f64`.
//! - `Cost` is always a scalar `f64`; higher layers handle the sign flip
//!   between cost and log-likelihood.
//!
//! Conventions
//! -----------
//! - `Theta` and `Grad` are column vectors with length equal to the number
//!   of free coefficients.
//! - `Hessian` is a dense `theta.len() × theta.len()` matrix.
//! - The executor state for every solver is [`SolverState`]; solvers that
//!   do not use curvature simply leave the Hessian slot empty.
use crate::optimization::loglik_optimizer::linesearch::BoundedLineSearch;
use argmin::{
    core::IterState,
    solver::{
        linesearch::{HagerZhangLineSearch, MoreThuenteLineSearch},
        quasinewton::LBFGS,
        trustregion::{CauchyPoint, Steihaug, TrustRegion},
    },
};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Parameter vector `θ` of free coefficients.
pub type Theta = Array1<f64>;

/// Gradient vector `∇ℓ(θ)` or `∇c(θ)`, matching the shape of `Theta`.
pub type Grad = Array1<f64>;

/// Dense Hessian matrix; `n × n` for `n = Theta.len()`.
pub type Hessian = Array2<f64>;

/// Scalar objective value used by the optimizer.
///
/// In this crate, this is the cost `c(θ) = -ℓ(θ)` derived from a
/// log-likelihood `ℓ(θ)`.
pub type Cost = f64;

/// Function-evaluation counters as reported by the solver.
///
/// Maps counter names (e.g., `"cost_count"`, `"hessian_count"`) to counts.
pub type FnEvalMap = HashMap<String, u64>;

/// Executor state shared by every solver in this crate.
pub type SolverState = IterState<Theta, Grad, (), Hessian, (), Cost>;

/// State type argmin's line searches run with inside L-BFGS.
pub type LineSearchState = IterState<Theta, Grad, (), (), (), Cost>;

/// Default history size (`m`) for L-BFGS runs.
pub const DEFAULT_LBFGS_MEM: usize = 7;

/// Default initial trust-region radius.
pub const DEFAULT_TRUST_RADIUS: f64 = 1.0;

/// Default upper bound on the trust-region radius.
pub const DEFAULT_MAX_TRUST_RADIUS: f64 = 100.0;

/// Hager–Zhang line search specialized to this crate’s numeric types.
pub type HagerZhangLS = HagerZhangLineSearch<Theta, Grad, Cost>;

/// More–Thuente line search specialized to this crate’s numeric types.
pub type MoreThuenteLS = MoreThuenteLineSearch<Theta, Grad, Cost>;

/// L-BFGS solver wired to the bounded Hager–Zhang line search.
pub type LbfgsHagerZhang = LBFGS<BoundedLineSearch<HagerZhangLS>, Theta, Grad, Cost>;

/// L-BFGS solver wired to the bounded More–Thuente line search.
pub type LbfgsMoreThuente = LBFGS<BoundedLineSearch<MoreThuenteLS>, Theta, Grad, Cost>;

/// Newton trust-region solver with a Steihaug-CG subproblem.
pub type TrustRegionSteihaug = TrustRegion<Steihaug<Theta, Cost>, Cost>;

/// Newton trust-region solver with a Cauchy-point subproblem.
pub type TrustRegionCauchy = TrustRegion<CauchyPoint<Cost>, Cost>;
