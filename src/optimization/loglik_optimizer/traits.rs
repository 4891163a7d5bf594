//! Public API surface for log-likelihood maximization.
//!
//! - [`LogLikelihood`]: trait users implement for their model.
//! - [`MLEOptions`] and [`Tolerances`]: configuration for the optimizer.
//! - [`Method`], [`Subproblem`], [`LineSearcher`]: choice of derivative-based
//!   search (trust-region Newton or L-BFGS) and its inner strategy.
//! - [`OptimOutcome`]: normalized result returned by the high-level `maximize` API.
//!
//! Convention: we *maximize* a user log-likelihood `ℓ(θ)` by minimizing the cost
//! `c(θ) = -ℓ(θ)`. Derivatives provided by implementors are derivatives of the
//! log-likelihood (`∇ℓ(θ)`, `∇²ℓ(θ)`); the adapter flips the sign as needed.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::{
        types::{
            Cost, DEFAULT_MAX_TRUST_RADIUS, DEFAULT_TRUST_RADIUS, FnEvalMap, Grad, Hessian, Theta,
        },
        stopping::gradient_converged,
        validation::{
            validate_theta_hat, validate_value, verify_tol_cost, verify_tol_grad,
            verify_trust_radius,
        },
    },
};
use argmin::core::{TerminationReason, TerminationStatus};
use std::str::FromStr;

/// User-implemented log-likelihood interface.
///
/// You maximize `ℓ(θ)`; internally we minimize the cost `c(θ) = -ℓ(θ)`.
///
/// - `type Data`: per-model data carried into `value`/`grad`/`hessian`/`check`.
///
/// Required:
/// - `value(&Theta, &Data) -> OptResult<Cost>`: evaluate `ℓ(θ)`.
/// - `check(&Theta, &Data) -> OptResult<()>`: validation hook to reject
///   obviously invalid `θ`/`data` pairs. Called once before optimization.
///
/// Optional:
/// - `grad(&Theta, &Data) -> OptResult<Grad>`: exact gradient `∇ℓ(θ)`.
///   If not implemented, robust finite differences are used automatically.
/// - `hessian(&Theta, &Data) -> OptResult<Hessian>`: exact Hessian `∇²ℓ(θ)`.
///   If not implemented, the gradient is finite-differenced.
pub trait LogLikelihood {
    type Data;

    // Required methods
    fn value(&self, theta: &Theta, data: &Self::Data) -> OptResult<Cost>;
    fn check(&self, theta: &Theta, data: &Self::Data) -> OptResult<()>;

    // Optional methods
    fn grad(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Grad> {
        Err(OptError::GradientNotImplemented)
    }

    fn hessian(&self, _theta: &Theta, _data: &Self::Data) -> OptResult<Hessian> {
        Err(OptError::HessianNotImplemented)
    }
}

/// Choice of line search used inside the L-BFGS solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineSearcher {
    MoreThuente,
    HagerZhang,
}

/// Choice of trust-region subproblem solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subproblem {
    /// Steihaug's truncated conjugate gradient; uses full curvature.
    Steihaug,
    /// Minimizer of the quadratic model along the steepest-descent direction.
    CauchyPoint,
}

/// Derivative-based search used to maximize the log-likelihood.
///
/// Parsing:
/// This enum implements `FromStr` and accepts case-insensitive names
/// (`"NewtonTrustRegion"`, `"TrustRegionCauchy"`, `"LBFGS"`,
/// `"LBFGSHagerZhang"`). Unknown names return `OptError::InvalidMethod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Newton trust-region search using the exact Hessian.
    NewtonTrustRegion(Subproblem),
    /// Limited-memory BFGS using exact gradients.
    Lbfgs(LineSearcher),
}

impl Default for Method {
    fn default() -> Self {
        Method::NewtonTrustRegion(Subproblem::Steihaug)
    }
}

impl FromStr for Method {
    type Err = OptError;

    /// Parse a method name (case-insensitive, `-`/`_` ignored).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String =
            s.chars().filter(|c| *c != '-' && *c != '_').collect::<String>().to_lowercase();
        match key.as_str() {
            "newtontrustregion" | "trustregion" | "trustregionsteihaug" => {
                Ok(Method::NewtonTrustRegion(Subproblem::Steihaug))
            }
            "trustregioncauchy" | "cauchypoint" => {
                Ok(Method::NewtonTrustRegion(Subproblem::CauchyPoint))
            }
            "lbfgs" | "lbfgsmorethuente" => Ok(Method::Lbfgs(LineSearcher::MoreThuente)),
            "lbfgshagerzhang" => Ok(Method::Lbfgs(LineSearcher::HagerZhang)),
            _ => Err(OptError::InvalidMethod {
                name: s.to_string(),
                reason: "Valid options are case insensitive 'NewtonTrustRegion', \
                         'TrustRegionCauchy', 'LBFGS' or 'LBFGSHagerZhang'.",
            }),
        }
    }
}

/// Optimizer-level configuration.
///
/// Fields:
/// - `tols: Tolerances` — numerical tolerances and iteration limits.
/// - `method: Method` — trust-region Newton (default) or L-BFGS.
/// - `lbfgs_mem: Option<usize>` — L-BFGS history (default 7).
/// - `trust_radius`, `max_trust_radius` — initial and maximal trust-region
///   radius (defaults 1 and 100).
#[derive(Debug, Clone, PartialEq)]
pub struct MLEOptions {
    pub tols: Tolerances,
    pub method: Method,
    pub lbfgs_mem: Option<usize>,
    pub trust_radius: f64,
    pub max_trust_radius: f64,
}

impl MLEOptions {
    /// Create a new set of optimizer options with default trust-region radii.
    ///
    /// # Errors
    /// - [`OptError::InvalidLBFGSMem`] if `lbfgs_mem == Some(0)`.
    pub fn new(tols: Tolerances, method: Method, lbfgs_mem: Option<usize>) -> OptResult<Self> {
        if let Some(m) = lbfgs_mem {
            if m == 0 {
                return Err(OptError::InvalidLBFGSMem {
                    mem: m,
                    reason: "L-BFGS memory must be greater than zero.",
                });
            }
        }
        Ok(Self {
            tols,
            method,
            lbfgs_mem,
            trust_radius: DEFAULT_TRUST_RADIUS,
            max_trust_radius: DEFAULT_MAX_TRUST_RADIUS,
        })
    }

    /// Override the trust-region radii.
    ///
    /// # Errors
    /// - [`OptError::InvalidTrustRadius`] unless `0 < radius <= max_radius < ∞`.
    pub fn with_trust_radius(mut self, radius: f64, max_radius: f64) -> OptResult<Self> {
        verify_trust_radius(radius, max_radius)?;
        self.trust_radius = radius;
        self.max_trust_radius = max_radius;
        Ok(self)
    }
}

impl Default for MLEOptions {
    fn default() -> Self {
        Self {
            tols: Tolerances::default(),
            method: Method::default(),
            lbfgs_mem: None,
            trust_radius: DEFAULT_TRUST_RADIUS,
            max_trust_radius: DEFAULT_MAX_TRUST_RADIUS,
        }
    }
}

/// Numerical tolerances and iteration limits used by the optimizer.
///
/// - `tol_grad`: converged when the gradient norm at θ̂ falls below this,
///   scaled by `max(1, |ℓ(θ̂)|)`.
/// - `tol_cost`: L-BFGS terminates when the change in cost falls below this.
/// - `max_iter`: hard cap on the number of iterations.
///
/// Any field can be `None` but **at least one** of the three must be provided
/// (see [`Tolerances::new`]).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    pub tol_grad: Option<f64>,
    pub tol_cost: Option<f64>,
    pub max_iter: Option<usize>,
}

impl Tolerances {
    /// Construct validated tolerances.
    ///
    /// # Rules
    /// - At least one of `tol_grad`, `tol_cost`, or `max_iter` must be `Some`.
    /// - If provided, tolerances must be **finite and strictly positive**.
    /// - If provided, `max_iter` must be `> 0`.
    ///
    /// # Errors
    /// - [`OptError::NoTolerancesProvided`] if all three are `None`.
    /// - [`OptError::InvalidTolGrad`] / [`OptError::InvalidTolCost`] for non-finite or non-positive tolerances.
    /// - [`OptError::InvalidMaxIter`] if `max_iter == 0`.
    pub fn new(
        tol_grad: Option<f64>, tol_cost: Option<f64>, max_iter: Option<usize>,
    ) -> OptResult<Self> {
        if tol_grad.is_none() && tol_cost.is_none() && max_iter.is_none() {
            return Err(OptError::NoTolerancesProvided);
        }
        verify_tol_cost(tol_cost)?;
        verify_tol_grad(tol_grad)?;
        if let Some(max_iter) = max_iter {
            if max_iter == 0 {
                return Err(OptError::InvalidMaxIter {
                    max_iter,
                    reason: "Maximum iterations must be greater than zero.",
                });
            }
        }
        Ok(Self { tol_grad, tol_cost, max_iter })
    }
}

impl Default for Tolerances {
    fn default() -> Self {
        Self { tol_grad: Some(1e-6), tol_cost: None, max_iter: Some(100) }
    }
}

/// Canonical result returned by `maximize`.
///
/// - `theta_hat`: best parameter vector found.
/// - `value`: best **log-likelihood** value `ℓ(θ)` (not the cost).
/// - `converged`: `true` if the backend reported convergence or the exact
///   gradient norm at `theta_hat` is within `tol_grad · max(1, |value|)`.
/// - `status`: human-readable termination status string.
/// - `iterations`: number of optimizer iterations performed.
/// - `fn_evals`: function-evaluation counters reported by `argmin`
///   (`cost_count`, `gradient_count`, `hessian_count`, ...).
/// - `grad_norm`: norm of the gradient at `theta_hat`, if available.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimOutcome {
    pub theta_hat: Theta,
    pub value: f64,
    pub converged: bool,
    pub status: String,
    pub iterations: usize,
    pub fn_evals: FnEvalMap,
    pub grad_norm: Option<f64>,
}

impl OptimOutcome {
    /// Build a validated [`OptimOutcome`] from raw solver state.
    ///
    /// Performs:
    /// - `theta_hat` check via `validate_theta_hat` (present and all finite).
    /// - `value` check via `validate_value` (finite).
    /// - Maps `TerminationStatus` and the gradient test into `(converged, status)`.
    ///
    /// # Errors
    /// - Propagates any validation errors for `theta_hat` or `value`.
    pub fn new(
        theta_hat_opt: Option<Theta>, value: f64, termination: TerminationStatus,
        iterations: u64, fn_evals: FnEvalMap, grad_norm: Option<f64>, tol_grad: Option<f64>,
    ) -> OptResult<Self> {
        let theta_hat = validate_theta_hat(theta_hat_opt)?;
        validate_value(value)?;
        let solver_converged = matches!(
            termination,
            TerminationStatus::Terminated(
                TerminationReason::SolverConverged | TerminationReason::TargetCostReached
            )
        );
        let grad_ok = match (grad_norm, tol_grad) {
            (Some(norm), Some(tol)) => gradient_converged(norm, value, tol),
            _ => false,
        };
        let status = match termination {
            TerminationStatus::NotTerminated => "Not terminated".to_string(),
            other => format!("{other:?}"),
        };
        Ok(Self {
            theta_hat,
            value,
            converged: solver_converged || grad_ok,
            status,
            iterations: iterations as usize,
            fn_evals,
            grad_norm,
        })
    }
}
