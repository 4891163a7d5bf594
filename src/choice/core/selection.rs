//! Chosen-alternative selector and availability masks.
//!
//! Both declarations name fields of the record table and are resolved once,
//! before estimation, into flat row-major tables: a `Vec<usize>` of chosen
//! positions and an [`AvailabilityTable`] of `n_rows × N` booleans.
use crate::choice::{
    core::data::ChoiceData,
    errors::{ChoiceError, ChoiceResult},
};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq)]
enum ChoiceMapping {
    Levels(HashMap<String, usize>),
    Codes(HashMap<i64, usize>),
}

/// Maps an observed field value to the chosen alternative's position.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceSelector {
    field: String,
    mapping: ChoiceMapping,
}

impl ChoiceSelector {
    /// Categorical field whose levels map to alternatives.
    pub fn by_level<S: Into<String>>(
        field: impl Into<String>, levels: impl IntoIterator<Item = (S, usize)>,
    ) -> Self {
        let mapping = levels.into_iter().map(|(l, p)| (l.into(), p)).collect();
        ChoiceSelector { field: field.into(), mapping: ChoiceMapping::Levels(mapping) }
    }

    /// Numeric field whose integer codes map to alternatives.
    pub fn by_code(field: impl Into<String>, codes: impl IntoIterator<Item = (i64, usize)>) -> Self {
        ChoiceSelector {
            field: field.into(),
            mapping: ChoiceMapping::Codes(codes.into_iter().collect()),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    fn check_positions(&self, n_alternatives: usize) -> ChoiceResult<()> {
        let positions: Vec<usize> = match &self.mapping {
            ChoiceMapping::Levels(m) => m.values().copied().collect(),
            ChoiceMapping::Codes(m) => m.values().copied().collect(),
        };
        match positions.into_iter().find(|&p| p >= n_alternatives) {
            Some(position) => Err(ChoiceError::ChoicePositionOutOfRange { position, n_alternatives }),
            None => Ok(()),
        }
    }

    /// Resolve the chosen position of every row.
    ///
    /// # Errors
    /// - [`ChoiceError::ChoicePositionOutOfRange`] for a mapping past `N`.
    /// - [`ChoiceError::UnknownField`] / [`ChoiceError::WrongFieldType`].
    /// - [`ChoiceError::UnmappedChoice`] for the first unmapped row.
    pub fn resolve(&self, data: &ChoiceData, n_alternatives: usize) -> ChoiceResult<Vec<usize>> {
        self.check_positions(n_alternatives)?;
        match &self.mapping {
            ChoiceMapping::Levels(levels) => {
                let column = data.categorical_column(&self.field)?;
                data.rows()
                    .map(|row| {
                        let level = data.level(column, row.category(column));
                        levels.get(level).copied().ok_or_else(|| ChoiceError::UnmappedChoice {
                            row: row.index(),
                            value: level.to_string(),
                        })
                    })
                    .collect()
            }
            ChoiceMapping::Codes(codes) => {
                let column = data.numeric_column(&self.field)?;
                data.rows()
                    .map(|row| {
                        let value = row.numeric(column);
                        let mapped = if value.fract() == 0.0 {
                            codes.get(&(value as i64)).copied()
                        } else {
                            None
                        };
                        mapped.ok_or_else(|| ChoiceError::UnmappedChoice {
                            row: row.index(),
                            value: value.to_string(),
                        })
                    })
                    .collect()
            }
        }
    }
}

/// Per-alternative availability fields; `None` means always available.
///
/// Boolean fields are used as-is; numeric fields are available when
/// non-zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Availability {
    fields: Vec<Option<String>>,
}

impl Availability {
    pub fn new<S: Into<String>>(fields: impl IntoIterator<Item = Option<S>>) -> Self {
        Availability { fields: fields.into_iter().map(|f| f.map(Into::into)).collect() }
    }

    /// Resolve into a flat `n_rows × N` table.
    ///
    /// # Errors
    /// - [`ChoiceError::AvailabilityArity`] unless there is one entry per
    ///   alternative.
    /// - [`ChoiceError::UnknownField`] / [`ChoiceError::WrongFieldType`] for
    ///   fields that are missing or categorical.
    pub fn resolve(&self, data: &ChoiceData, n_alternatives: usize) -> ChoiceResult<AvailabilityTable> {
        if self.fields.len() != n_alternatives {
            return Err(ChoiceError::AvailabilityArity {
                expected: n_alternatives,
                found: self.fields.len(),
            });
        }
        let n_rows = data.n_rows();
        let mut mask = vec![true; n_rows * n_alternatives];
        for (alt, field) in self.fields.iter().enumerate() {
            let Some(name) = field else { continue };
            if let Ok(column) = data.boolean_column(name) {
                for row in data.rows() {
                    mask[row.index() * n_alternatives + alt] = row.boolean(column);
                }
            } else {
                let column = data.numeric_column(name).map_err(|err| match err {
                    ChoiceError::WrongFieldType { name, found, .. } => ChoiceError::WrongFieldType {
                        name,
                        expected: "boolean or numeric",
                        found,
                    },
                    other => other,
                })?;
                for row in data.rows() {
                    mask[row.index() * n_alternatives + alt] = row.numeric(column) != 0.0;
                }
            }
        }
        Ok(AvailabilityTable { n_alternatives, mask })
    }
}

/// Flat row-major availability table.
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityTable {
    n_alternatives: usize,
    mask: Vec<bool>,
}

impl AvailabilityTable {
    /// Availability of each alternative for row `index`.
    #[inline]
    pub fn row(&self, index: usize) -> &[bool] {
        let start = index * self.n_alternatives;
        &self.mask[start..start + self.n_alternatives]
    }

    /// First row whose chosen alternative is unavailable.
    ///
    /// # Errors
    /// [`ChoiceError::ChosenUnavailable`].
    pub fn check_chosen(&self, chosen: &[usize]) -> ChoiceResult<()> {
        for (row, &alternative) in chosen.iter().enumerate() {
            if !self.row(row)[alternative] {
                return Err(ChoiceError::ChosenUnavailable { row, alternative });
            }
        }
        Ok(())
    }
}
