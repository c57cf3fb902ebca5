//! CSV reader

use crate::config::CsvConfig;
use crate::{CsvError, Result};
use emma_ir::{RecordSet, Value};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, trace};

/// Reads CSV text into a [`RecordSet`]
#[derive(Debug, Clone, Default)]
pub struct CsvReader {
    config: CsvConfig,
}

impl CsvReader {
    /// Create a new CSV reader
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Read every row.
    ///
    /// Without a header row, columns are named `column_1`, `column_2`, ...
    /// after the width of the first row.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed CSV, a duplicate header name, or a
    /// row whose width differs from the header.
    pub fn read<R: Read>(&self, input: R) -> Result<RecordSet> {
        let mut reader = self.config.reader_builder()?.from_reader(input);

        let mut records = if self.config.header {
            let headers = reader.headers()?.clone();
            header_columns(&headers)?
        } else {
            RecordSet::default()
        };

        for result in reader.records() {
            let row = result?;
            let line = row.position().map_or(0, csv::Position::line);

            if records.columns().is_empty() && !self.config.header {
                records = RecordSet::new((1..=row.len()).map(|i| format!("column_{i}")));
            }
            let expected = records.columns().len();
            if row.len() != expected {
                return Err(CsvError::Width {
                    line,
                    expected,
                    found: row.len(),
                });
            }

            let values: Vec<Value> = row.iter().map(|cell| self.cell_value(cell)).collect();
            trace!(line, cells = values.len(), "Read CSV row");
            records
                .push_row(values)
                .map_err(|e| CsvError::malformed(line, e.to_string()))?;
        }

        debug!(rows = records.len(), columns = records.columns().len(), "Finished reading CSV");
        Ok(records)
    }

    /// Read CSV from a string
    ///
    /// # Errors
    ///
    /// Same as [`CsvReader::read`].
    pub fn read_str(&self, text: &str) -> Result<RecordSet> {
        self.read(text.as_bytes())
    }

    /// Read CSV from a file
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be opened, otherwise the same
    /// as [`CsvReader::read`].
    pub fn read_path(&self, path: &Path) -> Result<RecordSet> {
        let file = std::fs::File::open(path)?;
        self.read(file)
    }

    fn cell_value(&self, cell: &str) -> Value {
        if self.config.is_null(cell) {
            Value::Null
        } else if self.config.infer_types {
            Value::infer(cell)
        } else {
            Value::String(cell.to_string())
        }
    }
}

fn header_columns(headers: &csv::StringRecord) -> Result<RecordSet> {
    let mut seen = HashSet::new();
    for name in headers {
        if !seen.insert(name) {
            return Err(CsvError::DuplicateColumn(name.to_string()));
        }
    }
    Ok(RecordSet::new(headers.iter()))
}
