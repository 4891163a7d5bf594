//! Errors for discrete-choice estimation (data, coefficients, utilities,
//! choice/availability resolution, and estimation failures).
//!
//! This module defines [`ChoiceError`], the single error type returned by
//! [`estimate`](crate::choice::models::mnl::estimate). Optimizer and
//! inference failures are wrapped via `From`, so callers see one type.
//!
//! ## Conventions
//! - **Rows and alternatives are 0-based.**
//! - Every input inconsistency is reported before the optimizer starts.
//! - A singular information matrix is *not* an error; see
//!   [`EstimationEvent::StandardErrorsUnavailable`](crate::choice::core::reporter::EstimationEvent).
use crate::{inference::errors::InferenceError, optimization::errors::OptError};

/// Crate-wide result alias for choice-model operations.
pub type ChoiceResult<T> = Result<T, ChoiceError>;

/// Unified error type for discrete-choice estimation.
#[derive(Debug, Clone, PartialEq)]
pub enum ChoiceError {
    // ---- Data table ----
    /// The table has no columns or no rows.
    EmptyData,

    /// A column's length differs from the first column's.
    ColumnLengthMismatch { name: String, expected: usize, found: usize },

    /// Two columns share a name.
    DuplicateColumn { name: String },

    /// A numeric cell is NaN/±inf.
    NonFiniteValue { column: String, row: usize, value: f64 },

    // ---- Field resolution ----
    /// No column with this name exists.
    UnknownField { name: String },

    /// The column exists but has a different type than required.
    WrongFieldType { name: String, expected: &'static str, found: &'static str },

    /// A categorical level referenced by a utility term never occurs.
    UnknownLevel { field: String, level: String },

    // ---- Coefficients ----
    /// Two coefficients share a name.
    DuplicateCoefficient { name: String },

    /// A starting or fixed value is NaN/±inf.
    NonFiniteCoefficient { name: String, value: f64 },

    /// Every coefficient is fixed; nothing to estimate.
    NoFreeCoefficients,

    /// A utility term references a coefficient that was not declared.
    UnknownCoefficient { name: String },

    /// The utility set expects a different number of free parameters.
    ParameterCountMismatch { expected: usize, found: usize },

    /// The utility set was built against a coefficient set that binds this
    /// coefficient differently (another free position or fixed value), or
    /// does not declare it at all.
    CoefficientBindingMismatch { name: String },

    // ---- Utilities ----
    /// The utility set has no alternatives.
    NoAlternatives,

    /// A utility term targets an alternative outside `0..n_alternatives`.
    AlternativeOutOfRange { alternative: usize, n_alternatives: usize },

    /// The utility set was built against a table in which this field
    /// resolves to another column, type, or level code.
    SchemaMismatch { field: String },

    // ---- Choice / availability ----
    /// The observed choice value has no mapping to an alternative.
    UnmappedChoice { row: usize, value: String },

    /// A choice mapping targets an alternative outside `0..n_alternatives`.
    ChoicePositionOutOfRange { position: usize, n_alternatives: usize },

    /// The chosen alternative is marked unavailable.
    ChosenUnavailable { row: usize, alternative: usize },

    /// The availability declaration does not have one entry per alternative.
    AvailabilityArity { expected: usize, found: usize },

    // ---- Options ----
    /// An option string could not be parsed.
    InvalidOption { option: &'static str, value: String, reason: &'static str },

    // ---- Estimation ----
    /// The optimizer exhausted its budget without meeting the convergence test.
    NonConvergence { iterations: usize, log_likelihood: f64 },

    /// Wrapper for optimizer-layer failures.
    Optimization(OptError),

    /// Wrapper for covariance computation failures.
    Inference(InferenceError),
}

impl std::error::Error for ChoiceError {}

impl std::fmt::Display for ChoiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Data table ----
            ChoiceError::EmptyData => write!(f, "Data table has no columns or no rows."),
            ChoiceError::ColumnLengthMismatch { name, expected, found } => {
                write!(f, "Column '{name}' has {found} rows, expected {expected}.")
            }
            ChoiceError::DuplicateColumn { name } => write!(f, "Duplicate column name '{name}'."),
            ChoiceError::NonFiniteValue { column, row, value } => {
                write!(f, "Column '{column}' row {row} is non-finite: {value}")
            }

            // ---- Field resolution ----
            ChoiceError::UnknownField { name } => write!(f, "Unknown field '{name}'."),
            ChoiceError::WrongFieldType { name, expected, found } => {
                write!(f, "Field '{name}' is {found}, expected {expected}.")
            }
            ChoiceError::UnknownLevel { field, level } => {
                write!(f, "Level '{level}' does not occur in categorical field '{field}'.")
            }

            // ---- Coefficients ----
            ChoiceError::DuplicateCoefficient { name } => {
                write!(f, "Duplicate coefficient name '{name}'.")
            }
            ChoiceError::NonFiniteCoefficient { name, value } => {
                write!(f, "Coefficient '{name}' has non-finite value {value}.")
            }
            ChoiceError::NoFreeCoefficients => write!(f, "All coefficients are fixed."),
            ChoiceError::UnknownCoefficient { name } => {
                write!(f, "Utility references undeclared coefficient '{name}'.")
            }
            ChoiceError::ParameterCountMismatch { expected, found } => write!(
                f,
                "Utility set expects {expected} free parameters, coefficient set has {found}."
            ),
            ChoiceError::CoefficientBindingMismatch { name } => write!(
                f,
                "Coefficient '{name}' is bound differently than when the utilities were built."
            ),

            // ---- Utilities ----
            ChoiceError::NoAlternatives => write!(f, "Utility set has no alternatives."),
            ChoiceError::AlternativeOutOfRange { alternative, n_alternatives } => write!(
                f,
                "Alternative {alternative} is out of range for {n_alternatives} alternatives."
            ),
            ChoiceError::SchemaMismatch { field } => write!(
                f,
                "Field '{field}' resolves differently than in the table the utilities were built on."
            ),

            // ---- Choice / availability ----
            ChoiceError::UnmappedChoice { row, value } => {
                write!(f, "Row {row}: chosen value '{value}' is not mapped to an alternative.")
            }
            ChoiceError::ChoicePositionOutOfRange { position, n_alternatives } => write!(
                f,
                "Choice mapping targets alternative {position}, but only {n_alternatives} exist."
            ),
            ChoiceError::ChosenUnavailable { row, alternative } => {
                write!(f, "Row {row}: chosen alternative {alternative} is unavailable.")
            }
            ChoiceError::AvailabilityArity { expected, found } => write!(
                f,
                "Availability lists {found} entries, expected one per alternative ({expected})."
            ),

            // ---- Options ----
            ChoiceError::InvalidOption { option, value, reason } => {
                write!(f, "Invalid {option} '{value}': {reason}")
            }

            // ---- Estimation ----
            ChoiceError::NonConvergence { iterations, log_likelihood } => write!(
                f,
                "Estimation did not converge after {iterations} iterations \
                 (log-likelihood {log_likelihood})."
            ),
            ChoiceError::Optimization(err) => write!(f, "Optimization failed: {err}"),
            ChoiceError::Inference(err) => write!(f, "{err}"),
        }
    }
}

impl From<OptError> for ChoiceError {
    fn from(err: OptError) -> Self {
        ChoiceError::Optimization(err)
    }
}

impl From<InferenceError> for ChoiceError {
    fn from(err: InferenceError) -> Self {
        ChoiceError::Inference(err)
    }
}
