//! choice — multinomial logit estimation: inputs, models, and errors.
//!
//! Purpose
//! -------
//! Estimate the coefficients of a multinomial logit (MNL) discrete-choice
//! model by maximum likelihood and report estimates, asymptotic standard
//! errors, and fit statistics. This is the surface most callers should
//! depend on.
//!
//! Key behaviors
//! -------------
//! - [`core`] holds the record table ([`ChoiceData`]), coefficients
//!   ([`CoefficientSet`]), utility functions ([`UtilityFunctionSet`],
//!   [`LinearUtilities`]), the chosen-alternative and availability
//!   declarations, [`EstimationOptions`], and the [`Reporter`] events.
//! - [`models`] evaluates the MNL log-likelihood with exact hyper-dual
//!   derivatives, drives the optimizer through [`estimate`], and packages
//!   the outcome as a [`Model`].
//! - [`errors`] defines [`ChoiceError`], which wraps optimizer and
//!   inference failures so `estimate` has a single error type.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every input inconsistency (unmapped choices, unavailable chosen
//!   alternatives, unknown fields, bad coefficients) is reported before the
//!   optimizer starts.
//! - Non-convergence is fatal; a singular information matrix is not.
//! - Free coefficients are optimized in declaration order; fixed
//!   coefficients are constants and keep their input values.
//!
//! Conventions
//! -----------
//! - Rows, alternatives, and parameter positions are 0-based.
//! - Log-likelihoods are sums over records (no `1/n` scaling).
//!
//! Downstream usage
//! ----------------
//! 1. Build a [`ChoiceData`] with [`ChoiceData::builder`].
//! 2. Declare coefficients in a [`CoefficientSet`].
//! 3. Build utilities, e.g. [`LinearUtilities::builder`], resolved against
//!    the coefficients and the table.
//! 4. Call [`estimate`] with a [`ChoiceSelector`], optional
//!    [`Availability`], and [`EstimationOptions`].
//! 5. Read the [`Model`] or print `model.summary()`.
//!
//! Testing notes
//! -------------
//! - Unit tests in [`core`] cover table validation, coefficient slots,
//!   term resolution, choice/availability resolution, options parsing, and
//!   reporter filtering.
//! - Unit tests in [`models`] cover row-level likelihood properties,
//!   autodiff against finite differences, stabilization parity, and the
//!   estimation event sequence.
//! - `tests/integration_mnl_pipeline.rs` recovers known coefficients from
//!   synthetic data.

pub mod core;
pub mod errors;
pub mod models;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::core::{
    Availability, ChoiceData, ChoiceDataBuilder, ChoiceSelector, Coefficient, CoefficientSet,
    CollectingReporter, EstimationEvent, EstimationOptions, ExpStabilization, LinearUtilities,
    Reporter, Row, SilentReporter, TracingReporter, UtilityFunctionSet, Verbosity,
};
pub use self::errors::{ChoiceError, ChoiceResult};
pub use self::models::{MnlObjective, Model, ModelSummary, estimate, estimate_with_reporter};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_choice::choice::prelude::*;
//
// to import the main estimation surface in a single line.

pub mod prelude {
    pub use super::{
        Availability, ChoiceData, ChoiceError, ChoiceResult, ChoiceSelector, Coefficient,
        CoefficientSet, EstimationEvent, EstimationOptions, ExpStabilization, LinearUtilities,
        Model, Reporter, Row, TracingReporter, UtilityFunctionSet, Verbosity, estimate,
        estimate_with_reporter,
    };
}
