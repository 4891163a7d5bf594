//! choice::core — inputs and configuration of a discrete-choice estimation.
//!
//! Purpose
//! -------
//! Hold everything an estimation consumes before the optimizer starts: the
//! record table, the coefficient list, the per-alternative utility
//! functions, the chosen-alternative and availability declarations, the
//! estimation options, and the progress reporters.
//!
//! Key behaviors
//! -------------
//! - [`ChoiceData`] stores records column-wise; field names are resolved
//!   once into typed handles read through [`Row`].
//! - [`CoefficientSet`] splits coefficients into the free parameter vector
//!   and fixed constants.
//! - [`UtilityFunctionSet`] is the static-dispatch calling convention for
//!   utility code; [`LinearUtilities`] is the built-in implementation.
//! - [`ChoiceSelector`] and [`Availability`] resolve into flat tables.
//! - [`Reporter`] receives [`EstimationEvent`]s filtered by [`Verbosity`].
//!
//! Conventions
//! -----------
//! - Rows, alternatives, and parameter positions are 0-based.
//! - Nothing in this module performs I/O.

pub mod coefficients;
pub mod data;
pub mod options;
pub mod reporter;
pub mod selection;
pub mod utility;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::coefficients::{Coefficient, CoefficientSet, CoefficientSlot};
pub use self::data::{
    BooleanColumn, CategoricalColumn, ChoiceData, ChoiceDataBuilder, ColumnKind, NumericColumn, Row,
};
pub use self::options::{EstimationOptions, ExpStabilization, Verbosity};
pub use self::reporter::{
    CollectingReporter, EstimationEvent, ReportFilter, Reporter, SilentReporter, TracingReporter,
};
pub use self::selection::{Availability, AvailabilityTable, ChoiceSelector};
pub use self::utility::{LinearUtilities, LinearUtilitiesBuilder, UtilityFunctionSet};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use rust_choice::choice::core::prelude::*;
//
// to import the main choice-model inputs in a single line.

pub mod prelude {
    pub use super::coefficients::{Coefficient, CoefficientSet};
    pub use super::data::{ChoiceData, Row};
    pub use super::options::{EstimationOptions, ExpStabilization, Verbosity};
    pub use super::reporter::{EstimationEvent, Reporter, TracingReporter};
    pub use super::selection::{Availability, ChoiceSelector};
    pub use super::utility::{LinearUtilities, UtilityFunctionSet};
}
