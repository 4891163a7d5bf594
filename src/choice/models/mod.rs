//! choice::models — likelihood evaluation, estimation, and results.
//!
//! - [`mnl`]: the multinomial logit row log-likelihood, the aggregate
//!   [`MnlObjective`], and the [`estimate`] / [`estimate_with_reporter`]
//!   drivers.
//! - [`result`]: the immutable [`Model`] and its printable summary.

pub mod mnl;
pub mod result;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::mnl::{
    CHUNK_ROWS, MnlObjective, estimate, estimate_with_reporter, row_log_likelihood,
};
pub use self::result::{CoefficientEstimate, Model, ModelSummary};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_choice::choice::models::prelude::*;
//
// to import the estimation surface in a single line.

pub mod prelude {
    pub use super::mnl::{estimate, estimate_with_reporter};
    pub use super::result::{CoefficientEstimate, Model};
}
