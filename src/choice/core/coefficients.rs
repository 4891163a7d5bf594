//! Named model coefficients and their free/fixed split.
//!
//! The order of free coefficients in a [`CoefficientSet`] is the order of
//! the optimizer's parameter vector; their values are the starting point.
//! Fixed coefficients never enter the parameter vector.
use crate::{
    choice::errors::{ChoiceError, ChoiceResult},
    optimization::loglik_optimizer::Theta,
};
use std::collections::HashMap;

/// A named coefficient with its starting (or fixed) value.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficient {
    pub name: String,
    pub value: f64,
    pub is_fixed: bool,
}

impl Coefficient {
    pub fn new(name: impl Into<String>, value: f64, is_fixed: bool) -> Self {
        Coefficient { name: name.into(), value, is_fixed }
    }

    /// A coefficient to be estimated, starting from `start`.
    pub fn free(name: impl Into<String>, start: f64) -> Self {
        Self::new(name, start, false)
    }

    /// A coefficient held at `value` throughout estimation.
    pub fn fixed(name: impl Into<String>, value: f64) -> Self {
        Self::new(name, value, true)
    }
}

/// Where a coefficient's value comes from during utility evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CoefficientSlot {
    /// Position in the free parameter vector.
    Free(usize),
    /// Constant value.
    Fixed(f64),
}

/// Validated, ordered collection of coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientSet {
    coefficients: Vec<Coefficient>,
    free: Vec<usize>,
    fixed: Vec<usize>,
    slots: HashMap<String, CoefficientSlot>,
}

impl CoefficientSet {
    /// Validate a coefficient list.
    ///
    /// # Errors
    /// - [`ChoiceError::DuplicateCoefficient`] for a repeated name.
    /// - [`ChoiceError::NonFiniteCoefficient`] for a NaN/±inf value.
    /// - [`ChoiceError::NoFreeCoefficients`] if every coefficient is fixed.
    pub fn new(coefficients: Vec<Coefficient>) -> ChoiceResult<Self> {
        let mut free = Vec::new();
        let mut fixed = Vec::new();
        let mut slots = HashMap::with_capacity(coefficients.len());
        for (i, coef) in coefficients.iter().enumerate() {
            if !coef.value.is_finite() {
                return Err(ChoiceError::NonFiniteCoefficient {
                    name: coef.name.clone(),
                    value: coef.value,
                });
            }
            let slot = if coef.is_fixed {
                fixed.push(i);
                CoefficientSlot::Fixed(coef.value)
            } else {
                free.push(i);
                CoefficientSlot::Free(free.len() - 1)
            };
            if slots.insert(coef.name.clone(), slot).is_some() {
                return Err(ChoiceError::DuplicateCoefficient { name: coef.name.clone() });
            }
        }
        if free.is_empty() {
            return Err(ChoiceError::NoFreeCoefficients);
        }
        Ok(CoefficientSet { coefficients, free, fixed, slots })
    }

    pub fn n_free(&self) -> usize {
        self.free.len()
    }

    pub fn n_fixed(&self) -> usize {
        self.fixed.len()
    }

    /// Resolve a coefficient name to its evaluation slot.
    ///
    /// # Errors
    /// [`ChoiceError::UnknownCoefficient`] if the name was not declared.
    pub fn slot(&self, name: &str) -> ChoiceResult<CoefficientSlot> {
        self.slots
            .get(name)
            .copied()
            .ok_or_else(|| ChoiceError::UnknownCoefficient { name: name.to_string() })
    }

    /// Free coefficients in parameter-vector order.
    pub fn free(&self) -> impl Iterator<Item = &Coefficient> + '_ {
        self.free.iter().map(|&i| &self.coefficients[i])
    }

    /// Fixed coefficients in declaration order.
    pub fn fixed(&self) -> impl Iterator<Item = &Coefficient> + '_ {
        self.fixed.iter().map(|&i| &self.coefficients[i])
    }

    /// Starting parameter vector (free values in order).
    /// `(name, slot)` for every coefficient, in declaration order.
    pub fn bindings(&self) -> impl Iterator<Item = (&str, CoefficientSlot)> + '_ {
        self.coefficients
            .iter()
            .filter_map(|c| self.slots.get(&c.name).map(|&slot| (c.name.as_str(), slot)))
    }

    pub fn start_values(&self) -> Theta {
        self.free().map(|c| c.value).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Free coefficients get consecutive slots in declaration order; fixed
    // ones carry their value.
    //
    // Given
    // -----
    // - Free `a`, fixed `b = 2`, free `c`.
    //
    // Expect
    // ------
    // - Slots Free(0), Fixed(2), Free(1); start vector (a, c).
    fn slots_follow_declaration_order() {
        // Arrange
        let set = CoefficientSet::new(vec![
            Coefficient::free("a", 0.1),
            Coefficient::fixed("b", 2.0),
            Coefficient::free("c", -0.3),
        ])
        .expect("valid set");

        // Act / Assert
        assert_eq!(set.slot("a"), Ok(CoefficientSlot::Free(0)));
        assert_eq!(set.slot("b"), Ok(CoefficientSlot::Fixed(2.0)));
        assert_eq!(set.slot("c"), Ok(CoefficientSlot::Free(1)));
        assert_eq!(set.start_values().to_vec(), vec![0.1, -0.3]);
        assert_eq!((set.n_free(), set.n_fixed()), (2, 1));
        assert_eq!(
            set.bindings().collect::<Vec<_>>(),
            vec![
                ("a", CoefficientSlot::Free(0)),
                ("b", CoefficientSlot::Fixed(2.0)),
                ("c", CoefficientSlot::Free(1)),
            ]
        );
        assert_eq!(set.slot("z"), Err(ChoiceError::UnknownCoefficient { name: "z".into() }));
    }

    #[test]
    // Purpose
    // -------
    // Invalid coefficient lists are rejected.
    //
    // Given
    // -----
    // - A duplicated name; a NaN start; only fixed coefficients.
    //
    // Expect
    // ------
    // - `DuplicateCoefficient`, `NonFiniteCoefficient`, `NoFreeCoefficients`.
    fn invalid_sets_are_rejected() {
        // Act
        let dup = CoefficientSet::new(vec![Coefficient::free("a", 0.0), Coefficient::fixed("a", 1.0)]);
        let nan = CoefficientSet::new(vec![Coefficient::free("a", f64::NAN)]);
        let none = CoefficientSet::new(vec![Coefficient::fixed("a", 1.0)]);

        // Assert
        assert_eq!(dup, Err(ChoiceError::DuplicateCoefficient { name: "a".into() }));
        assert!(matches!(nan, Err(ChoiceError::NonFiniteCoefficient { .. })));
        assert_eq!(none, Err(ChoiceError::NoFreeCoefficients));
    }
}
