//! Tabular records with nullable cells
#![allow(clippy::must_use_candidate)] // Accessors are clear at call sites without #[must_use].

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scalar cell value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Missing value
    #[default]
    Null,

    /// Boolean value
    Boolean(bool),

    /// Integer value
    Integer(i64),

    /// Decimal value
    Decimal(f64),

    /// String value
    String(String),
}

impl Value {
    /// True for `Null` and for a decimal NaN
    pub fn is_null(&self) -> bool {
        match self {
            Self::Null => true,
            Self::Decimal(d) => d.is_nan(),
            _ => false,
        }
    }

    /// Borrow the text of a string value
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text form of a non-null value
    pub fn as_text(&self) -> Option<String> {
        if self.is_null() {
            None
        } else {
            Some(self.to_string())
        }
    }

    /// Infer a typed value from raw text.
    ///
    /// Empty text is null; `true`/`false` become booleans; numbers without
    /// leading zeros become integers or decimals; anything else stays text.
    pub fn infer(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Null;
        }
        match trimmed {
            "true" | "True" | "TRUE" => return Self::Boolean(true),
            "false" | "False" | "FALSE" => return Self::Boolean(false),
            _ => {}
        }

        let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
        let leading_zero = digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.");
        if !leading_zero {
            if let Ok(i) = trimmed.parse::<i64>() {
                return Self::Integer(i);
            }
            if trimmed.contains('.') {
                if let Ok(d) = trimmed.parse::<f64>() {
                    if d.is_finite() {
                        return Self::Decimal(d);
                    }
                }
            }
        }
        Self::String(text.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => Ok(()),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(d) if d.is_nan() => Ok(()),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(d: f64) -> Self {
        Self::Decimal(d)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Boolean(b)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// A table of rows over named columns.
///
/// Every row has exactly one cell per column; absent data is [`Value::Null`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordSet {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl RecordSet {
    /// Create an empty record set with the given columns
    pub fn new<S: Into<String>>(columns: impl IntoIterator<Item = S>) -> Self {
        let mut set = Self::default();
        for column in columns {
            set.add_column(column.into());
        }
        set
    }

    /// Build a record set from keyed records.
    ///
    /// Columns are the union of keys in first-appearance order.
    pub fn from_records(records: impl IntoIterator<Item = IndexMap<String, Value>>) -> Self {
        let mut set = Self::default();
        for record in records {
            set.push_record(record);
        }
        set
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Append a row given in column order
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowLength`] when the row does not have one value per
    /// column.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(Error::RowLength {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Append a keyed record, adding columns for unseen keys
    pub fn push_record(&mut self, record: IndexMap<String, Value>) {
        for key in record.keys() {
            if !self.has_column(key) {
                self.add_column(key.clone());
            }
        }
        let mut row = vec![Value::Null; self.columns.len()];
        for (key, value) in record {
            if let Some(index) = self.column_index(&key) {
                row[index] = value;
            }
        }
        self.rows.push(row);
    }

    /// Cell at `row` in `column`
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row).map(|cells| &cells[index])
    }

    /// Replace the cell at `row` in `column`
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown column or a row out of range.
    pub fn set(&mut self, row: usize, column: &str, value: impl Into<Value>) -> Result<()> {
        let index = self
            .column_index(column)
            .ok_or_else(|| Error::unknown_column(column))?;
        let len = self.rows.len();
        let cells = self
            .rows
            .get_mut(row)
            .ok_or(Error::RowOutOfRange { index: row, len })?;
        cells[index] = value.into();
        Ok(())
    }

    /// All cells of a column, in row order
    pub fn column_values(&self, column: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(column)?;
        Some(self.rows.iter().map(|cells| &cells[index]).collect())
    }

    /// Add every missing column, filled with nulls. Returns how many were added.
    pub fn ensure_columns<S: AsRef<str>>(&mut self, names: impl IntoIterator<Item = S>) -> usize {
        let mut added = 0;
        for name in names {
            let name = name.as_ref();
            if !self.has_column(name) {
                self.add_column(name.to_string());
                added += 1;
            }
        }
        added
    }

    /// Fill null cells of `column` with `value`, adding the column if needed.
    ///
    /// Returns the number of cells changed.
    pub fn apply_default(&mut self, column: &str, value: impl Into<Value>) -> usize {
        let value = value.into();
        let index = match self.column_index(column) {
            Some(index) => index,
            None => self.add_column(column.to_string()),
        };
        let mut changed = 0;
        for cells in &mut self.rows {
            if cells[index].is_null() {
                cells[index] = value.clone();
                changed += 1;
            }
        }
        changed
    }

    /// Non-null `(column, value)` pairs of a row, in column order
    ///
    /// # Errors
    ///
    /// Returns [`Error::RowOutOfRange`] for an unknown row.
    pub fn row_values(&self, row: usize) -> Result<IndexMap<String, Value>> {
        let cells = self.rows.get(row).ok_or(Error::RowOutOfRange {
            index: row,
            len: self.rows.len(),
        })?;
        Ok(self
            .columns
            .iter()
            .zip(cells)
            .filter(|(_, value)| !value.is_null())
            .map(|(column, value)| (column.clone(), value.clone()))
            .collect())
    }

    /// Every row as a keyed record, nulls included
    pub fn to_records(&self) -> Vec<IndexMap<String, Value>> {
        self.rows
            .iter()
            .map(|cells| self.columns.iter().cloned().zip(cells.iter().cloned()).collect())
            .collect()
    }

    fn add_column(&mut self, name: String) -> usize {
        self.columns.push(name);
        for cells in &mut self.rows {
            cells.push(Value::Null);
        }
        self.columns.len() - 1
    }
}
