//! Column-oriented record table for discrete-choice estimation.
//!
//! Purpose
//! -------
//! Hold the decision-maker records read by utility functions, the choice
//! selector, and availability masks. The table is built once by an external
//! loader through [`ChoiceDataBuilder`] and is read-only afterwards.
//!
//! Key behaviors
//! -------------
//! - Three column kinds: numeric (`f64`), boolean, and categorical (string
//!   levels stored as integer codes with a per-column level dictionary).
//! - Field names are resolved **once** into typed handles
//!   ([`NumericColumn`], [`BooleanColumn`], [`CategoricalColumn`]); the hot
//!   loop reads cells through a [`Row`] view with no name lookups and no
//!   type dispatch.
//!
//! Invariants & assumptions
//! ------------------------
//! - At least one column and one row.
//! - All columns have the same length and distinct names.
//! - Numeric cells are finite.
//! - Handles are only produced by the table that owns the column, so a
//!   handle is always in range for that table.
//!
//! Conventions
//! -----------
//! - Rows are 0-based.
//! - Categorical codes are assigned in order of first appearance.
use crate::choice::errors::{ChoiceError, ChoiceResult};
use std::collections::HashMap;

/// Handle to a numeric column, resolved by [`ChoiceData::numeric_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericColumn(usize);

/// Handle to a boolean column, resolved by [`ChoiceData::boolean_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BooleanColumn(usize);

/// Handle to a categorical column, resolved by [`ChoiceData::categorical_column`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoricalColumn(usize);

/// Kind of a named column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Categorical,
}

impl ColumnKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Boolean => "boolean",
            ColumnKind::Categorical => "categorical",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Categorical {
    levels: Vec<String>,
    codes: Vec<u32>,
}

impl Categorical {
    fn from_values(values: Vec<String>) -> Self {
        let mut levels: Vec<String> = Vec::new();
        let mut index: HashMap<String, u32> = HashMap::new();
        let mut codes = Vec::with_capacity(values.len());
        for value in values {
            let code = match index.get(&value) {
                Some(&code) => code,
                None => {
                    let code = levels.len() as u32;
                    index.insert(value.clone(), code);
                    levels.push(value);
                    code
                }
            };
            codes.push(code);
        }
        Categorical { levels, codes }
    }
}

/// Validated, immutable column table.
#[derive(Debug, Clone, PartialEq)]
pub struct ChoiceData {
    n_rows: usize,
    numeric: Vec<Vec<f64>>,
    boolean: Vec<Vec<bool>>,
    categorical: Vec<Categorical>,
    schema: HashMap<String, (ColumnKind, usize)>,
}

impl ChoiceData {
    /// Start building a table.
    pub fn builder() -> ChoiceDataBuilder {
        ChoiceDataBuilder::default()
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Kind of the named column, if it exists.
    pub fn kind_of(&self, name: &str) -> Option<ColumnKind> {
        self.schema.get(name).map(|(kind, _)| *kind)
    }

    fn lookup(&self, name: &str, expected: ColumnKind) -> ChoiceResult<usize> {
        match self.schema.get(name) {
            None => Err(ChoiceError::UnknownField { name: name.to_string() }),
            Some((kind, idx)) if *kind == expected => Ok(*idx),
            Some((kind, _)) => Err(ChoiceError::WrongFieldType {
                name: name.to_string(),
                expected: expected.as_str(),
                found: kind.as_str(),
            }),
        }
    }

    /// Resolve a numeric column by name.
    ///
    /// # Errors
    /// [`ChoiceError::UnknownField`] or [`ChoiceError::WrongFieldType`].
    pub fn numeric_column(&self, name: &str) -> ChoiceResult<NumericColumn> {
        self.lookup(name, ColumnKind::Numeric).map(NumericColumn)
    }

    /// Resolve a boolean column by name.
    ///
    /// # Errors
    /// [`ChoiceError::UnknownField`] or [`ChoiceError::WrongFieldType`].
    pub fn boolean_column(&self, name: &str) -> ChoiceResult<BooleanColumn> {
        self.lookup(name, ColumnKind::Boolean).map(BooleanColumn)
    }

    /// Resolve a categorical column by name.
    ///
    /// # Errors
    /// [`ChoiceError::UnknownField`] or [`ChoiceError::WrongFieldType`].
    pub fn categorical_column(&self, name: &str) -> ChoiceResult<CategoricalColumn> {
        self.lookup(name, ColumnKind::Categorical).map(CategoricalColumn)
    }

    /// Code of `level` in a categorical column, if the level occurs.
    pub fn level_code(&self, column: CategoricalColumn, level: &str) -> Option<u32> {
        self.categorical[column.0].levels.iter().position(|l| l == level).map(|p| p as u32)
    }

    /// Level string for a categorical code.
    pub fn level(&self, column: CategoricalColumn, code: u32) -> &str {
        &self.categorical[column.0].levels[code as usize]
    }

    /// Read-only view of row `index`, or `None` past the end.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.n_rows).then(|| Row { data: self, index })
    }

    /// Row view for an index the caller already bounded by `n_rows`.
    #[inline]
    pub(crate) fn row_at(&self, index: usize) -> Row<'_> {
        Row { data: self, index }
    }

    /// Iterate over all rows in order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.n_rows).map(move |index| Row { data: self, index })
    }
}

/// Copyable view of one record.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    data: &'a ChoiceData,
    index: usize,
}

impl<'a> Row<'a> {
    /// 0-based position of this row in the table.
    pub fn index(&self) -> usize {
        self.index
    }

    #[inline]
    pub fn numeric(&self, column: NumericColumn) -> f64 {
        self.data.numeric[column.0][self.index]
    }

    #[inline]
    pub fn boolean(&self, column: BooleanColumn) -> bool {
        self.data.boolean[column.0][self.index]
    }

    /// Categorical code of this row; compare against [`ChoiceData::level_code`].
    #[inline]
    pub fn category(&self, column: CategoricalColumn) -> u32 {
        self.data.categorical[column.0].codes[self.index]
    }
}

#[derive(Debug, Clone)]
enum PendingColumn {
    Numeric(Vec<f64>),
    Boolean(Vec<bool>),
    Categorical(Vec<String>),
}

impl PendingColumn {
    fn len(&self) -> usize {
        match self {
            PendingColumn::Numeric(v) => v.len(),
            PendingColumn::Boolean(v) => v.len(),
            PendingColumn::Categorical(v) => v.len(),
        }
    }
}

/// Accumulates named columns and validates them into a [`ChoiceData`].
#[derive(Debug, Clone, Default)]
pub struct ChoiceDataBuilder {
    columns: Vec<(String, PendingColumn)>,
}

impl ChoiceDataBuilder {
    pub fn numeric(mut self, name: impl Into<String>, values: Vec<f64>) -> Self {
        self.columns.push((name.into(), PendingColumn::Numeric(values)));
        self
    }

    pub fn boolean(mut self, name: impl Into<String>, values: Vec<bool>) -> Self {
        self.columns.push((name.into(), PendingColumn::Boolean(values)));
        self
    }

    pub fn categorical<S: Into<String>>(
        mut self, name: impl Into<String>, values: impl IntoIterator<Item = S>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.columns.push((name.into(), PendingColumn::Categorical(values)));
        self
    }

    /// Validate and freeze the table.
    ///
    /// # Errors
    /// - [`ChoiceError::EmptyData`] with no columns or zero rows.
    /// - [`ChoiceError::ColumnLengthMismatch`] for unequal lengths.
    /// - [`ChoiceError::DuplicateColumn`] for repeated names.
    /// - [`ChoiceError::NonFiniteValue`] for the first NaN/±inf numeric cell.
    pub fn build(self) -> ChoiceResult<ChoiceData> {
        let n_rows = match self.columns.first() {
            Some((_, col)) if col.len() > 0 => col.len(),
            _ => return Err(ChoiceError::EmptyData),
        };
        let mut data = ChoiceData {
            n_rows,
            numeric: Vec::new(),
            boolean: Vec::new(),
            categorical: Vec::new(),
            schema: HashMap::new(),
        };
        for (name, column) in self.columns {
            if column.len() != n_rows {
                return Err(ChoiceError::ColumnLengthMismatch {
                    name,
                    expected: n_rows,
                    found: column.len(),
                });
            }
            if data.schema.contains_key(&name) {
                return Err(ChoiceError::DuplicateColumn { name });
            }
            let entry = match column {
                PendingColumn::Numeric(values) => {
                    if let Some((row, &value)) =
                        values.iter().enumerate().find(|(_, v)| !v.is_finite())
                    {
                        return Err(ChoiceError::NonFiniteValue { column: name, row, value });
                    }
                    data.numeric.push(values);
                    (ColumnKind::Numeric, data.numeric.len() - 1)
                }
                PendingColumn::Boolean(values) => {
                    data.boolean.push(values);
                    (ColumnKind::Boolean, data.boolean.len() - 1)
                }
                PendingColumn::Categorical(values) => {
                    data.categorical.push(Categorical::from_values(values));
                    (ColumnKind::Categorical, data.categorical.len() - 1)
                }
            };
            data.schema.insert(name, entry);
        }
        Ok(data)
    }
}
