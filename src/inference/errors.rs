//! Unified error handling for inference routines.
//!
//! `InferenceError` covers failures while turning the curvature of the
//! log-likelihood at θ̂ into a covariance matrix. A singular (flat)
//! information matrix is *not* an error; it is reported through
//! [`CovarianceEstimate::Singular`](crate::inference::hessian::CovarianceEstimate).

/// Unified error type for inference routines.
#[derive(Debug, Clone, PartialEq)]
pub enum InferenceError {
    // ---- Information matrix ----
    /// The information matrix is not square or does not match the number of
    /// free parameters.
    DimensionMismatch {
        expected: usize,
        found: (usize, usize),
    },

    /// The information matrix contains a non-finite entry.
    NonFiniteHessian {
        row: usize,
        col: usize,
        value: f64,
    },

    /// A clearly negative eigenvalue: θ̂ is not a local maximum of ℓ.
    NotAtMaximum {
        eigenvalue: f64,
        max_eigenvalue: f64,
    },

    // ---- Fallback ----
    UnknownError,
}

pub type InferenceResult<T> = Result<T, InferenceError>;

impl std::error::Error for InferenceError {}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Information matrix ----
            InferenceError::DimensionMismatch { expected, found } => write!(
                f,
                "Inference Error: information matrix must be {expected}x{expected}, found {}x{}",
                found.0, found.1
            ),
            InferenceError::NonFiniteHessian { row, col, value } => {
                write!(f, "Inference Error: non-finite Hessian entry at ({row}, {col}): {value}")
            }
            InferenceError::NotAtMaximum { eigenvalue, max_eigenvalue } => write!(
                f,
                "Inference Error: information matrix has eigenvalue {eigenvalue} \
                 (largest {max_eigenvalue}); estimates are not at a maximum"
            ),

            // ---- Fallback ----
            InferenceError::UnknownError => write!(f, "Inference Error: Unknown error occurred"),
        }
    }
}
