//! rust_choice — maximum-likelihood estimation of multinomial logit models.
//!
//! Purpose
//! -------
//! Serve as the crate root. Given a table of decision-maker records, a set
//! of per-alternative utility functions, and each record's chosen
//! alternative, find the coefficients maximizing the MNL log-likelihood and
//! report estimates, standard errors, and fit statistics.
//!
//! Key behaviors
//! -------------
//! - [`choice`]: the discrete-choice surface (data, coefficients, utilities,
//!   estimation, results, errors).
//! - [`optimization`]: the argmin-backed log-likelihood maximizer and the
//!   hyper-dual autodiff types used for exact derivatives.
//! - [`inference`]: covariance from the observed information matrix.
//!
//! Invariants & assumptions
//! ------------------------
//! - All heavy numerical work is deterministic for a given input: record
//!   chunks are reduced in a fixed order regardless of thread count.
//! - No I/O and no global output; diagnostics go through a caller-supplied
//!   [`choice::Reporter`] (by default, the `tracing` facade).
//!
//! Conventions
//! -----------
//! - Indexing is 0-based throughout.
//! - Errors are layered: `OptError` (optimizer), `InferenceError`
//!   (covariance), wrapped by `ChoiceError` at the estimation boundary.
//!
//! Example
//! -------
//! ```no_run
//! use rust_choice::choice::prelude::*;
//!
//! let data = ChoiceData::builder()
//!     .numeric("time_bus", vec![10.0, 25.0, 15.0])
//!     .numeric("time_car", vec![12.0, 10.0, 30.0])
//!     .categorical("mode", ["car", "car", "bus"])
//!     .build()?;
//! let coefs = CoefficientSet::new(vec![
//!     Coefficient::free("asc_car", 0.0),
//!     Coefficient::free("b_time", 0.0),
//! ])?;
//! let utilities = LinearUtilities::builder(2)
//!     .variable(0, "b_time", "time_bus")
//!     .constant(1, "asc_car")
//!     .variable(1, "b_time", "time_car")
//!     .build(&coefs, &data)?;
//! let choice = ChoiceSelector::by_level("mode", [("bus", 0), ("car", 1)]);
//!
//! let model = estimate(&utilities, &coefs, &data, &choice, None, &EstimationOptions::default())?;
//! println!("{}", model.summary());
//! # Ok::<(), ChoiceError>(())
//! ```

pub mod choice;
pub mod inference;
pub mod optimization;
