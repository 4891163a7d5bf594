//! Utility functions: one per alternative, generic over the scalar type.
//!
//! Purpose
//! -------
//! Define the calling convention between the likelihood and user utility
//! code ([`UtilityFunctionSet`]) and provide a compiled linear-in-parameters
//! implementation ([`LinearUtilities`]) for the common case.
//!
//! Key behaviors
//! -------------
//! - `utility::<S>(alt, params, row)` is statically dispatched and generic
//!   over [`Scalar`], so the same code yields plain values (`f64`) and exact
//!   derivatives (`HyperDual64`).
//! - [`LinearUtilitiesBuilder`] collects term declarations by name and
//!   resolves them once against a [`CoefficientSet`] and a [`ChoiceData`]
//!   schema; evaluation then touches only typed handles and slots.
//!
//! Invariants & assumptions
//! ------------------------
//! - `params` holds the free coefficients only, in [`CoefficientSet`]
//!   order; fixed coefficients are folded in as constants.
//! - Implementations must be pure: same `(alt, params, row)` → same value.
//! - [`LinearUtilities`] records the coefficient slots and column handles it
//!   was compiled against; estimation refuses a coefficient set or table
//!   that binds any of them differently.
use crate::{
    choice::{
        core::{
            coefficients::{CoefficientSet, CoefficientSlot},
            data::{CategoricalColumn, ChoiceData, NumericColumn, Row},
        },
        errors::{ChoiceError, ChoiceResult},
    },
    optimization::autodiff::Scalar,
};

/// Ordered set of per-alternative utility functions.
pub trait UtilityFunctionSet: Sync {
    /// Number of alternatives `N`.
    fn n_alternatives(&self) -> usize;

    /// Utility of alternative `alt` (0-based) for `row` at `params`.
    fn utility<S: Scalar>(&self, alt: usize, params: &[S], row: Row<'_>) -> S;

    /// Number of free parameters the set was built for, when known.
    ///
    /// Used to cross-check against the coefficient set before estimating.
    fn n_parameters(&self) -> Option<usize> {
        None
    }

    /// First coefficient that `coefficients` binds differently from the set
    /// the utilities were built with, or declares in addition to it.
    ///
    /// `None` when every binding agrees or the set does not track them.
    fn mismatched_coefficient(&self, _coefficients: &CoefficientSet) -> Option<String> {
        None
    }

    /// First field that resolves differently in `data` than in the table the
    /// utilities were built on.
    ///
    /// `None` when every field agrees or the set does not track them.
    fn mismatched_field(&self, _data: &ChoiceData) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq)]
enum TermSpec {
    Constant { coefficient: String },
    Variable { coefficient: String, field: String },
    Dummy { coefficient: String, field: String, level: String },
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum TermKind {
    Constant,
    Variable(NumericColumn),
    Dummy(CategoricalColumn, u32),
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Term {
    slot: CoefficientSlot,
    kind: TermKind,
}

// A field as it resolved at build time.
#[derive(Debug, Clone, PartialEq)]
enum FieldBinding {
    Numeric { field: String, column: NumericColumn },
    Level { field: String, level: String, column: CategoricalColumn, code: u32 },
}

impl FieldBinding {
    fn field(&self) -> &str {
        match self {
            FieldBinding::Numeric { field, .. } | FieldBinding::Level { field, .. } => field,
        }
    }

    fn holds(&self, data: &ChoiceData) -> bool {
        match self {
            FieldBinding::Numeric { field, column } => {
                data.numeric_column(field).is_ok_and(|found| found == *column)
            }
            FieldBinding::Level { field, level, column, code } => {
                data.categorical_column(field).is_ok_and(|found| {
                    found == *column && data.level_code(found, level) == Some(*code)
                })
            }
        }
    }
}

/// Collects linear utility terms by name.
#[derive(Debug, Clone)]
pub struct LinearUtilitiesBuilder {
    n_alternatives: usize,
    terms: Vec<(usize, TermSpec)>,
}

impl LinearUtilitiesBuilder {
    pub fn new(n_alternatives: usize) -> Self {
        LinearUtilitiesBuilder { n_alternatives, terms: Vec::new() }
    }

    /// Alternative-specific constant: `β`.
    pub fn constant(mut self, alt: usize, coefficient: impl Into<String>) -> Self {
        self.terms.push((alt, TermSpec::Constant { coefficient: coefficient.into() }));
        self
    }

    /// `β · x` for a numeric field `x`.
    pub fn variable(
        mut self, alt: usize, coefficient: impl Into<String>, field: impl Into<String>,
    ) -> Self {
        self.terms.push((
            alt,
            TermSpec::Variable { coefficient: coefficient.into(), field: field.into() },
        ));
        self
    }

    /// `β · [field == level]` for a categorical field.
    pub fn dummy(
        mut self, alt: usize, coefficient: impl Into<String>, field: impl Into<String>,
        level: impl Into<String>,
    ) -> Self {
        self.terms.push((
            alt,
            TermSpec::Dummy {
                coefficient: coefficient.into(),
                field: field.into(),
                level: level.into(),
            },
        ));
        self
    }

    /// Resolve every term against the coefficients and the table schema.
    ///
    /// # Errors
    /// - [`ChoiceError::NoAlternatives`] if `n_alternatives == 0`.
    /// - [`ChoiceError::AlternativeOutOfRange`] for a term on a missing alternative.
    /// - [`ChoiceError::UnknownCoefficient`] for an undeclared coefficient.
    /// - [`ChoiceError::UnknownField`] / [`ChoiceError::WrongFieldType`] for
    ///   unresolvable fields.
    /// - [`ChoiceError::UnknownLevel`] for a dummy level absent from the data.
    pub fn build(self, coefficients: &CoefficientSet, data: &ChoiceData) -> ChoiceResult<LinearUtilities> {
        if self.n_alternatives == 0 {
            return Err(ChoiceError::NoAlternatives);
        }
        let mut alternatives: Vec<Vec<Term>> = vec![Vec::new(); self.n_alternatives];
        let mut fields: Vec<FieldBinding> = Vec::new();
        for (alt, spec) in self.terms {
            if alt >= self.n_alternatives {
                return Err(ChoiceError::AlternativeOutOfRange {
                    alternative: alt,
                    n_alternatives: self.n_alternatives,
                });
            }
            let (term, binding) = match spec {
                TermSpec::Constant { coefficient } => (
                    Term { slot: coefficients.slot(&coefficient)?, kind: TermKind::Constant },
                    None,
                ),
                TermSpec::Variable { coefficient, field } => {
                    let column = data.numeric_column(&field)?;
                    (
                        Term {
                            slot: coefficients.slot(&coefficient)?,
                            kind: TermKind::Variable(column),
                        },
                        Some(FieldBinding::Numeric { field, column }),
                    )
                }
                TermSpec::Dummy { coefficient, field, level } => {
                    let column = data.categorical_column(&field)?;
                    let code = data.level_code(column, &level).ok_or_else(|| {
                        ChoiceError::UnknownLevel { field: field.clone(), level: level.clone() }
                    })?;
                    (
                        Term {
                            slot: coefficients.slot(&coefficient)?,
                            kind: TermKind::Dummy(column, code),
                        },
                        Some(FieldBinding::Level { field, level, column, code }),
                    )
                }
            };
            alternatives[alt].push(term);
            if let Some(binding) = binding.filter(|b| !fields.contains(b)) {
                fields.push(binding);
            }
        }
        Ok(LinearUtilities {
            alternatives,
            n_free: coefficients.n_free(),
            coefficients: coefficients
                .bindings()
                .map(|(name, slot)| (name.to_string(), slot))
                .collect(),
            fields,
        })
    }
}

/// Compiled linear-in-parameters utilities.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearUtilities {
    alternatives: Vec<Vec<Term>>,
    n_free: usize,
    coefficients: Vec<(String, CoefficientSlot)>,
    fields: Vec<FieldBinding>,
}

impl LinearUtilities {
    pub fn builder(n_alternatives: usize) -> LinearUtilitiesBuilder {
        LinearUtilitiesBuilder::new(n_alternatives)
    }
}

impl UtilityFunctionSet for LinearUtilities {
    fn n_alternatives(&self) -> usize {
        self.alternatives.len()
    }

    #[inline]
    fn utility<S: Scalar>(&self, alt: usize, params: &[S], row: Row<'_>) -> S {
        let mut u = S::constant(0.0);
        for term in &self.alternatives[alt] {
            let beta = match term.slot {
                CoefficientSlot::Free(i) => params[i],
                CoefficientSlot::Fixed(v) => S::constant(v),
            };
            match term.kind {
                TermKind::Constant => u += beta,
                TermKind::Variable(column) => u += beta * row.numeric(column),
                TermKind::Dummy(column, code) => {
                    if row.category(column) == code {
                        u += beta;
                    }
                }
            }
        }
        u
    }

    fn n_parameters(&self) -> Option<usize> {
        Some(self.n_free)
    }

    fn mismatched_coefficient(&self, coefficients: &CoefficientSet) -> Option<String> {
        let rebound = self
            .coefficients
            .iter()
            .find(|(name, slot)| coefficients.slot(name).ok() != Some(*slot))
            .map(|(name, _)| name.clone());
        rebound.or_else(|| {
            coefficients
                .bindings()
                .find(|(name, _)| {
                    self.coefficients.iter().all(|(known, _)| known.as_str() != *name)
                })
                .map(|(name, _)| name.to_string())
        })
    }

    fn mismatched_field(&self, data: &ChoiceData) -> Option<String> {
        self.fields.iter().find(|b| !b.holds(data)).map(|b| b.field().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        choice::core::coefficients::Coefficient,
        optimization::autodiff::{HyperDual64, seed},
    };

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Evaluation of each term kind, with free and fixed coefficients.
    // - Derivative propagation through `HyperDual64`.
    // - Resolution errors at build time.
    // -------------------------------------------------------------------------

    fn fixture() -> (ChoiceData, CoefficientSet) {
        let data = ChoiceData::builder()
            .numeric("time", vec![10.0, 20.0])
            .categorical("region", ["north", "south"])
            .build()
            .expect("valid table");
        let coefs = CoefficientSet::new(vec![
            Coefficient::free("asc_car", 0.5),
            Coefficient::free("b_time", -0.1),
            Coefficient::fixed("b_south", 2.0),
        ])
        .expect("valid coefficients");
        (data, coefs)
    }

    #[test]
    // Purpose
    // -------
    // Constant, variable, and dummy terms add up as declared.
    //
    // Given
    // -----
    // - Alternative 0 empty; alternative 1 = asc_car + b_time·time +
    //   b_south·[region == south] with b_south fixed at 2.
    //
    // Expect
    // ------
    // - Row 0: u₁ = 0.5 − 1.0 = −0.5; row 1: u₁ = 0.5 − 2.0 + 2.0 = 0.5;
    //   u₀ = 0 in both.
    fn linear_terms_evaluate_as_declared() {
        // Arrange
        let (data, coefs) = fixture();
        let utils = LinearUtilities::builder(2)
            .constant(1, "asc_car")
            .variable(1, "b_time", "time")
            .dummy(1, "b_south", "region", "south")
            .build(&coefs, &data)
            .expect("valid utilities");
        let params = [0.5, -0.1];
        let row0 = data.row(0).expect("row 0");
        let row1 = data.row(1).expect("row 1");

        // Act / Assert
        assert_eq!(utils.n_alternatives(), 2);
        assert_eq!(utils.n_parameters(), Some(2));
        assert_eq!(utils.utility(0, &params, row0), 0.0);
        assert!((utils.utility(1, &params, row0) + 0.5).abs() < 1e-12);
        assert!((utils.utility(1, &params, row1) - 0.5).abs() < 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // Seeding a free coefficient yields its regressor as the derivative.
    //
    // Given
    // -----
    // - u = b_time·time, b_time seeded in direction one, row 1 (time = 20).
    //
    // Expect
    // ------
    // - eps1 = 20 and no second-order term.
    fn hyperdual_seed_returns_regressor_as_derivative() {
        // Arrange
        let (data, coefs) = fixture();
        let utils = LinearUtilities::builder(1)
            .variable(0, "b_time", "time")
            .build(&coefs, &data)
            .expect("valid utilities");
        let params = [HyperDual64::constant(0.5), seed(-0.1, true, false)];

        // Act
        let u = utils.utility(0, &params, data.row(1).expect("row 1"));

        // Assert
        assert!((u.re + 2.0).abs() < 1e-12);
        assert_eq!(u.eps1, 20.0);
        assert_eq!(u.eps1eps2, 0.0);
    }

    #[test]
    // Purpose
    // -------
    // Build-time resolution reports each kind of bad declaration.
    //
    // Given
    // -----
    // - A term on alternative 3 of 2; an undeclared coefficient; a dummy on
    //   a numeric field; an absent level; zero alternatives.
    //
    // Expect
    // ------
    // - The matching `ChoiceError` for each.
    fn build_reports_unresolvable_terms() {
        // Arrange
        let (data, coefs) = fixture();

        // Act
        let out_of_range = LinearUtilities::builder(2).constant(3, "asc_car").build(&coefs, &data);
        let unknown_coef = LinearUtilities::builder(2).constant(0, "asc_bus").build(&coefs, &data);
        let wrong_type =
            LinearUtilities::builder(2).dummy(0, "asc_car", "time", "x").build(&coefs, &data);
        let bad_level =
            LinearUtilities::builder(2).dummy(0, "asc_car", "region", "east").build(&coefs, &data);
        let none = LinearUtilities::builder(0).build(&coefs, &data);

        // Assert
        assert!(matches!(out_of_range, Err(ChoiceError::AlternativeOutOfRange { alternative: 3, .. })));
        assert!(matches!(unknown_coef, Err(ChoiceError::UnknownCoefficient { .. })));
        assert!(matches!(wrong_type, Err(ChoiceError::WrongFieldType { .. })));
        assert!(matches!(bad_level, Err(ChoiceError::UnknownLevel { .. })));
        assert_eq!(none, Err(ChoiceError::NoAlternatives));
    }

    #[test]
    // Purpose
    // -------
    // The compiled set names the first binding that differs from the
    // coefficient set and table it was built against.
    //
    // Given
    // -----
    // - Utilities built on the fixture, then compared with: the same
    //   inputs; a set declaring the free coefficients in swapped order;
    //   a set fixing `b_south` at another value; a set with an extra
    //   coefficient; a table whose `region` levels appear in another order;
    //   a table where `time` is categorical.
    //
    // Expect
    // ------
    // - `None` for the original inputs, and the offending name otherwise.
    fn bindings_report_first_difference() {
        // Arrange
        let (data, coefs) = fixture();
        let utils = LinearUtilities::builder(2)
            .constant(1, "asc_car")
            .variable(1, "b_time", "time")
            .dummy(1, "b_south", "region", "south")
            .build(&coefs, &data)
            .expect("valid utilities");
        let swapped = CoefficientSet::new(vec![
            Coefficient::free("b_time", -0.1),
            Coefficient::free("asc_car", 0.5),
            Coefficient::fixed("b_south", 2.0),
        ])
        .expect("valid coefficients");
        let refixed = CoefficientSet::new(vec![
            Coefficient::free("asc_car", 0.5),
            Coefficient::free("b_time", -0.1),
            Coefficient::fixed("b_south", 5.0),
        ])
        .expect("valid coefficients");
        let extra = CoefficientSet::new(vec![
            Coefficient::free("asc_car", 0.5),
            Coefficient::free("b_time", -0.1),
            Coefficient::fixed("b_south", 2.0),
            Coefficient::fixed("b_cost", 0.0),
        ])
        .expect("valid coefficients");
        let reordered_levels = ChoiceData::builder()
            .numeric("time", vec![10.0, 20.0])
            .categorical("region", ["south", "north"])
            .build()
            .expect("valid table");
        let retyped = ChoiceData::builder()
            .categorical("time", ["fast", "slow"])
            .categorical("region", ["north", "south"])
            .build()
            .expect("valid table");

        // Act / Assert
        assert_eq!(utils.mismatched_coefficient(&coefs), None);
        assert_eq!(utils.mismatched_field(&data), None);
        assert_eq!(utils.mismatched_coefficient(&swapped), Some("asc_car".to_string()));
        assert_eq!(utils.mismatched_coefficient(&refixed), Some("b_south".to_string()));
        assert_eq!(utils.mismatched_coefficient(&extra), Some("b_cost".to_string()));
        assert_eq!(utils.mismatched_field(&reordered_levels), Some("region".to_string()));
        assert_eq!(utils.mismatched_field(&retyped), Some("time".to_string()));
    }
}
