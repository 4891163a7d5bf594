//! loglik_optimizer::builders — solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small, focused builders for the solvers used by the
//! log-likelihood optimizer. These helpers hide Argmin's generic wiring and
//! apply crate-level options (tolerances, memory size, trust-region radii)
//! so that higher-level code can request a configured solver without
//! touching Argmin-specific types.
//!
//! Key behaviors
//! -------------
//! - Construct Newton trust-region solvers with either a Steihaug-CG or a
//!   Cauchy-point subproblem, using the radii from [`MLEOptions`].
//! - Construct L-BFGS solvers with either Hager–Zhang or More–Thuente line
//!   search, applying the optional gradient and cost-change tolerances. The
//!   line search is bounded by the same radii, so its first trial moves `θ`
//!   by at most `trust_radius` whatever the gradient scale.
//!
//! Conventions
//! -----------
//! - The builders do **not** set an initial parameter vector or
//!   `max_iters`; these are applied by the runner.
//! - Invalid settings rejected by Argmin are surfaced as [`OptError`]
//!   through the crate's `From<Error>` implementation.
//!
//! [`OptError`]: crate::optimization::errors::OptError
use crate::optimization::{
    errors::OptResult,
    loglik_optimizer::{
        linesearch::{BoundedLineSearch, StepBounds},
        traits::MLEOptions,
        types::{
            Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang, LbfgsMoreThuente,
            MoreThuenteLS, Theta, TrustRegionCauchy, TrustRegionSteihaug,
        },
    },
};
use argmin::solver::{
    quasinewton::LBFGS,
    trustregion::{CauchyPoint, Steihaug},
};

/// Build a Newton trust-region solver with a Steihaug-CG subproblem.
///
/// # Errors
/// Returns an `OptError` if Argmin rejects the configured radii.
pub fn build_trust_region_steihaug(opts: &MLEOptions) -> OptResult<TrustRegionSteihaug> {
    let solver = TrustRegionSteihaug::new(Steihaug::new())
        .with_radius(opts.trust_radius)?
        .with_max_radius(opts.max_trust_radius)?;
    Ok(solver)
}

/// Build a Newton trust-region solver with a Cauchy-point subproblem.
///
/// # Errors
/// Returns an `OptError` if Argmin rejects the configured radii.
pub fn build_trust_region_cauchy(opts: &MLEOptions) -> OptResult<TrustRegionCauchy> {
    let solver = TrustRegionCauchy::new(CauchyPoint::new())
        .with_radius(opts.trust_radius)?
        .with_max_radius(opts.max_trust_radius)?;
    Ok(solver)
}

/// build_optimizer_hager_zhang — construct L-BFGS with Hager–Zhang line search.
///
/// Purpose
/// -------
/// Build an [`LbfgsHagerZhang`] solver whose line search is bounded by the
/// trust-region radii and whose tolerances come from [`MLEOptions`].
///
/// Parameters
/// ----------
/// - `opts`: `&MLEOptions`
///   This builder consults:
///   - `opts.lbfgs_mem`: history size (`m`); [`DEFAULT_LBFGS_MEM`] when
///     `None`.
///   - `opts.trust_radius` / `opts.max_trust_radius`: the largest first
///     trial move and the largest move of any trial, in `θ` units.
///   - `opts.tols.tol_grad` and `opts.tols.tol_cost`.
///
/// Returns
/// -------
/// `OptResult<LbfgsHagerZhang>`
///   - `Ok(solver)` ready for the runner.
///
/// Errors
/// ------
/// - `OptError` (via `From<argmin::core::Error>`) when Argmin rejects a
///   tolerance.
///
/// Panics
/// ------
/// - Never panics.
///
/// Notes
/// -----
/// - Does not set `theta0` or `max_iters`; the runner does.
pub fn build_optimizer_hager_zhang(opts: &MLEOptions) -> OptResult<LbfgsHagerZhang> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(bounded(HagerZhangLS::new(), opts), mem);
    configure_lbfgs(lbfgs, opts)
}

/// Build an L-BFGS solver with More–Thuente line search.
///
/// # Errors
/// Returns an `OptError` if applying tolerances fails.
pub fn build_optimizer_more_thuente(opts: &MLEOptions) -> OptResult<LbfgsMoreThuente> {
    let mem = opts.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(bounded(MoreThuenteLS::new(), opts), mem);
    configure_lbfgs(lbfgs, opts)
}

fn bounded<L: StepBounds + Clone>(search: L, opts: &MLEOptions) -> BoundedLineSearch<L> {
    BoundedLineSearch::new(search, opts.trust_radius, opts.max_trust_radius)
}

/// Apply optional gradient and cost-change tolerances to an L-BFGS solver.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, opts: &MLEOptions,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = opts.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = opts.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}
