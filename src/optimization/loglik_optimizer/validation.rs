//! Validation helpers for log-likelihood optimization.
//!
//! This module centralizes common consistency checks used across the
//! optimizer interface:
//!
//! - **Tolerance checks**: [`verify_tol_grad`], [`verify_tol_cost`] ensure
//!   numeric tolerances are finite and strictly positive when provided.
//! - **Trust-region settings**: [`verify_trust_radius`].
//! - **Parameter vectors**: [`validate_theta`] checks an input vector against
//!   the model dimension; [`validate_theta_hat`] ensures a candidate
//!   `theta_hat` exists and contains only finite values.
//! - **Derivatives**: [`validate_grad`] and [`validate_hessian`] enforce
//!   dimension and finiteness.
//! - **Objective values**: [`validate_value`] checks log-likelihood outputs
//!   for finiteness.
use crate::optimization::{
    errors::{OptError, OptResult},
    loglik_optimizer::types::{Grad, Hessian, Theta},
};

/// Validate the optional gradient‐norm tolerance.
///
/// - Accepts `None` (no stopping rule on gradient).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolGrad`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_grad(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolGrad { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate the optional cost‐change tolerance (for convergence).
///
/// - Accepts `None` (no stopping rule on cost change).
/// - If `Some`, the value must be **finite** and **strictly positive**.
///
/// # Errors
/// Returns [`OptError::InvalidTolCost`] if the value is non-finite or ≤ 0.0.
pub fn verify_tol_cost(tol: Option<f64>) -> OptResult<()> {
    if let Some(tol) = tol {
        if !tol.is_finite() {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be finite." });
        }
        if tol <= 0.0 {
            return Err(OptError::InvalidTolCost { tol, reason: "Tolerance must be positive." });
        }
    }
    Ok(())
}

/// Validate an initial trust-region radius against its upper bound.
///
/// # Errors
/// Returns [`OptError::InvalidTrustRadius`] unless
/// `0 < radius <= max_radius < ∞`.
pub fn verify_trust_radius(radius: f64, max_radius: f64) -> OptResult<()> {
    if !radius.is_finite() || !max_radius.is_finite() {
        return Err(OptError::InvalidTrustRadius {
            radius,
            max_radius,
            reason: "Radii must be finite.",
        });
    }
    if radius <= 0.0 {
        return Err(OptError::InvalidTrustRadius {
            radius,
            max_radius,
            reason: "Initial radius must be positive.",
        });
    }
    if radius > max_radius {
        return Err(OptError::InvalidTrustRadius {
            radius,
            max_radius,
            reason: "Initial radius must not exceed the maximum radius.",
        });
    }
    Ok(())
}

/// Validate a parameter vector against the model dimension.
///
/// # Errors
/// - [`OptError::ThetaLengthMismatch`] if `theta.len() != dim`.
/// - [`OptError::InvalidThetaInput`] for the first non-finite entry.
pub fn validate_theta(theta: &Theta, dim: usize) -> OptResult<()> {
    if theta.len() != dim {
        return Err(OptError::ThetaLengthMismatch { expected: dim, actual: theta.len() });
    }
    if let Some((index, &value)) = theta.iter().enumerate().find(|(_, v)| !v.is_finite()) {
        return Err(OptError::InvalidThetaInput { index, value });
    }
    Ok(())
}

/// Validate a gradient vector against dimension and finiteness.
///
/// # Errors
/// - [`OptError::GradientDimMismatch`] if length does not match `dim`.
/// - [`OptError::InvalidGradient`] with the index/value/reason of the first
///   offending element.
pub fn validate_grad(grad: &Grad, dim: usize) -> OptResult<()> {
    if grad.len() != dim {
        return Err(OptError::GradientDimMismatch { expected: dim, found: grad.len() });
    }
    for (index, &value) in grad.iter().enumerate() {
        if !value.is_finite() {
            return Err(OptError::InvalidGradient {
                index,
                value,
                reason: "Gradient elements must be finite.",
            });
        }
    }
    Ok(())
}

/// Validate and unwrap an estimated parameter vector (`theta_hat`).
///
/// # Errors
/// - [`OptError::MissingThetaHat`] if no vector was provided.
/// - [`OptError::InvalidThetaHat`] if any element is non-finite.
pub fn validate_theta_hat(theta_hat: Option<Theta>) -> OptResult<Theta> {
    match theta_hat {
        Some(t) => {
            for (index, &value) in t.iter().enumerate() {
                if !value.is_finite() {
                    return Err(OptError::InvalidThetaHat {
                        index,
                        value,
                        reason: "Parameter estimates must be finite.",
                    });
                }
            }
            Ok(t)
        }
        None => Err(OptError::MissingThetaHat),
    }
}

/// Validate that a scalar log-likelihood value is finite.
///
/// # Errors
/// Returns [`OptError::NonFiniteCost`] if the value is `NaN` or infinite.
pub fn validate_value(value: f64) -> OptResult<()> {
    if !value.is_finite() {
        return Err(OptError::NonFiniteCost { value });
    }
    Ok(())
}

/// Validate the shape and entries of a Hessian matrix.
///
/// # Errors
/// - [`OptError::HessianDimMismatch`] if dimensions do not match `dim`.
/// - [`OptError::InvalidHessian`] if any entry is non-finite, with offending
///   row/col indices and value.
pub fn validate_hessian(hessian: &Hessian, dim: usize) -> OptResult<()> {
    if hessian.nrows() != dim || hessian.ncols() != dim {
        return Err(OptError::HessianDimMismatch {
            expected: dim,
            found: (hessian.nrows(), hessian.ncols()),
        });
    }
    for ((i, j), &value) in hessian.indexed_iter() {
        if !value.is_finite() {
            return Err(OptError::InvalidHessian { row: i, col: j, value });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Tolerance validators accept `None` and positive finite values and
    // reject zero, negative, and non-finite values.
    //
    // Given
    // -----
    // - A spread of candidate tolerances.
    //
    // Expect
    // ------
    // - Only `None` and `1e-6` pass.
    fn tolerance_validators_reject_non_positive_and_non_finite() {
        // Act / Assert
        assert!(verify_tol_grad(None).is_ok());
        assert!(verify_tol_grad(Some(1e-6)).is_ok());
        assert!(verify_tol_grad(Some(0.0)).is_err());
        assert!(verify_tol_grad(Some(f64::NAN)).is_err());
        assert!(verify_tol_cost(Some(-1.0)).is_err());
        assert!(verify_tol_cost(Some(f64::INFINITY)).is_err());
    }

    #[test]
    // Purpose
    // -------
    // Trust-region radius must be positive, finite, and within its cap.
    //
    // Given
    // -----
    // - Valid `(1, 100)` and invalid `(0, 1)`, `(5, 1)` pairs.
    //
    // Expect
    // ------
    // - Only the valid pair is accepted.
    fn trust_radius_requires_positive_radius_below_cap() {
        // Act / Assert
        assert!(verify_trust_radius(1.0, 100.0).is_ok());
        assert!(verify_trust_radius(0.0, 1.0).is_err());
        assert!(verify_trust_radius(5.0, 1.0).is_err());
        assert!(verify_trust_radius(1.0, f64::NAN).is_err());
    }

    #[test]
    // Purpose
    // -------
    // `validate_theta` reports length mismatches before finiteness.
    //
    // Given
    // -----
    // - A length-2 vector checked against dim 3, and a vector with NaN.
    //
    // Expect
    // ------
    // - `ThetaLengthMismatch` and `InvalidThetaInput` respectively.
    fn validate_theta_reports_length_then_finiteness() {
        // Arrange
        let short = array![0.0, 1.0];
        let bad = array![0.0, f64::NAN, 1.0];

        // Act
        let short_err = validate_theta(&short, 3).unwrap_err();
        let bad_err = validate_theta(&bad, 3).unwrap_err();

        // Assert
        assert_eq!(short_err, OptError::ThetaLengthMismatch { expected: 3, actual: 2 });
        assert!(matches!(bad_err, OptError::InvalidThetaInput { index: 1, .. }));
    }

    #[test]
    // Purpose
    // -------
    // Hessian validation checks shape then finiteness.
    //
    // Given
    // -----
    // - A 2×2 matrix with an infinite entry, and a 2×2 checked against 3.
    //
    // Expect
    // ------
    // - `InvalidHessian` at (1, 0) and `HessianDimMismatch`.
    fn validate_hessian_flags_shape_and_non_finite_entries() {
        // Arrange
        let h = array![[1.0, 0.0], [f64::INFINITY, 1.0]];

        // Act / Assert
        assert!(matches!(
            validate_hessian(&h, 2),
            Err(OptError::InvalidHessian { row: 1, col: 0, .. })
        ));
        assert!(matches!(validate_hessian(&h, 3), Err(OptError::HessianDimMismatch { .. })));
    }
}
