//! inference::hessian — covariance from the observed information matrix.
//!
//! Purpose
//! -------
//! Turn the Hessian of the *negated* log-likelihood at θ̂ (the observed
//! information `I(θ̂) = -∇²ℓ(θ̂)`) into an asymptotic covariance matrix
//! `I(θ̂)⁻¹`, and lay that matrix out over the full coefficient list.
//!
//! Key behaviors
//! -------------
//! - [`invert_information`] eigendecomposes `I(θ̂)` with nalgebra's
//!   `symmetric_eigen` and classifies it:
//!   - any non-finite entry → [`InferenceError::NonFiniteHessian`];
//!   - `|λ_min| ≤ SINGULAR_REL_TOL·λ_max` or `λ_max ≤ 0` →
//!     [`CovarianceEstimate::Singular`] (recoverable);
//!   - `λ_min < -SINGULAR_REL_TOL·λ_max` → [`InferenceError::NotAtMaximum`];
//!   - otherwise `Q Λ⁻¹ Qᵀ` as [`CovarianceEstimate::Available`].
//! - [`embed_covariance`] places the free-parameter block top-left in a
//!   `(free + fixed)²` matrix and fills every other cell with `NaN`.
//!
//! Invariants & assumptions
//! ------------------------
//! - The input is treated as symmetric; only the lower triangle is read.
//! - Returned covariance matrices are exactly symmetric.
use crate::inference::errors::{InferenceError, InferenceResult};
use nalgebra::DMatrix;
use ndarray::Array2;

/// Relative eigenvalue threshold below which the information matrix is
/// treated as singular.
pub const SINGULAR_REL_TOL: f64 = 1e-10;

/// Outcome of inverting the observed information matrix.
#[derive(Debug, Clone, PartialEq)]
pub enum CovarianceEstimate {
    /// `I(θ̂)⁻¹`, `p × p`.
    Available(Array2<f64>),
    /// The information matrix is (numerically) singular.
    Singular {
        min_eigenvalue: f64,
        max_eigenvalue: f64,
    },
}

/// invert_information — asymptotic covariance from the observed information.
///
/// Purpose
/// -------
/// Invert `info = -∇²ℓ(θ̂)` through its eigendecomposition, telling apart a
/// proper maximum, a flat direction (singular), and a point that is not a
/// maximum.
///
/// Parameters
/// ----------
/// - `info`: `&Array2<f64>`
///   Observed information over the free coefficients. Only the lower
///   triangle is read.
///
/// Returns
/// -------
/// `InferenceResult<CovarianceEstimate>`
///   - `Available(cov)` with an exactly symmetric `p × p` inverse.
///   - `Singular { .. }` when `λ_max ≤ 0` or `|λ_min| ≤ SINGULAR_REL_TOL·λ_max`.
///
/// Errors
/// ------
/// - [`InferenceError::DimensionMismatch`] if `info` is not square.
/// - [`InferenceError::NonFiniteHessian`] for the first non-finite entry.
/// - [`InferenceError::NotAtMaximum`] for an eigenvalue below
///   `-SINGULAR_REL_TOL·λ_max`.
///
/// Panics
/// ------
/// - Never panics.
///
/// Notes
/// -----
/// - A singular matrix is not an error; estimation reports it as an event
///   and keeps the point estimates.
pub fn invert_information(info: &Array2<f64>) -> InferenceResult<CovarianceEstimate> {
    let p = info.nrows();
    if info.ncols() != p {
        return Err(InferenceError::DimensionMismatch {
            expected: p,
            found: (info.nrows(), info.ncols()),
        });
    }
    if let Some(((row, col), &value)) = info.indexed_iter().find(|(_, v)| !v.is_finite()) {
        return Err(InferenceError::NonFiniteHessian { row, col, value });
    }

    let eigen = to_dmatrix(info).symmetric_eigen();
    let lambda_max = eigen.eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let lambda_min = eigen.eigenvalues.iter().copied().fold(f64::INFINITY, f64::min);

    let threshold = SINGULAR_REL_TOL * lambda_max;
    if lambda_max <= 0.0 || lambda_min.abs() <= threshold {
        return Ok(CovarianceEstimate::Singular {
            min_eigenvalue: lambda_min,
            max_eigenvalue: lambda_max,
        });
    }
    if lambda_min < -threshold {
        return Err(InferenceError::NotAtMaximum {
            eigenvalue: lambda_min,
            max_eigenvalue: lambda_max,
        });
    }

    let q = &eigen.eigenvectors;
    let mut cov = Array2::<f64>::zeros((p, p));
    for i in 0..p {
        for j in 0..=i {
            let v: f64 = eigen
                .eigenvalues
                .iter()
                .enumerate()
                .map(|(k, &lambda)| q[(i, k)] * q[(j, k)] / lambda)
                .sum();
            cov[[i, j]] = v;
            cov[[j, i]] = v;
        }
    }
    Ok(CovarianceEstimate::Available(cov))
}

/// embed_covariance — covariance over the full coefficient list.
///
/// Purpose
/// -------
/// Lay out a free-parameter covariance over `n_free + n_fixed`
/// coefficients, free coefficients first.
///
/// Parameters
/// ----------
/// - `free_cov`: `Option<&Array2<f64>>`
///   Covariance of the free coefficients, at least `n_free × n_free`.
///   `None` (singular, or standard errors not requested) yields an
///   all-`NaN` matrix.
/// - `n_free`, `n_fixed`: `usize`
///   Coefficient counts.
///
/// Returns
/// -------
/// `Array2<f64>` of shape `(n_free + n_fixed)²`: the free block top-left,
/// `NaN` in every row and column of a fixed coefficient.
///
/// Panics
/// ------
/// - If `free_cov` is smaller than `n_free × n_free`.
pub fn embed_covariance(free_cov: Option<&Array2<f64>>, n_free: usize, n_fixed: usize) -> Array2<f64> {
    let total = n_free + n_fixed;
    let mut full = Array2::<f64>::from_elem((total, total), f64::NAN);
    if let Some(cov) = free_cov {
        for i in 0..n_free {
            for j in 0..n_free {
                full[[i, j]] = cov[[i, j]];
            }
        }
    }
    full
}

fn to_dmatrix(info: &Array2<f64>) -> DMatrix<f64> {
    let p = info.nrows();
    let mut out = DMatrix::<f64>::zeros(p, p);
    for j in 0..p {
        for i in j..p {
            out[(i, j)] = info[[i, j]];
            out[(j, i)] = info[[i, j]];
        }
    }
    out
}
