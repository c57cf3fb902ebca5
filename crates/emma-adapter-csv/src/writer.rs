//! CSV writer

use crate::config::CsvConfig;
use crate::{CsvError, Result};
use emma_ir::{RecordSet, Value};
use std::io::Write;
use std::path::Path;
use tracing::{debug, trace};

/// Writes a [`RecordSet`] as CSV
#[derive(Debug, Clone, Default)]
pub struct CsvWriter {
    config: CsvConfig,
}

impl CsvWriter {
    /// Create a new CSV writer
    pub fn new() -> Self {
        Self::default()
    }

    /// Set configuration
    #[must_use]
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    /// Write the header row (when configured) and every record.
    /// Null cells are written as the configured null text.
    ///
    /// # Errors
    ///
    /// Returns an error when the configuration is invalid or the
    /// underlying writer fails.
    pub fn write<W: Write>(&self, output: W, records: &RecordSet) -> Result<()> {
        let mut writer = self.config.writer_builder()?.from_writer(output);

        if self.config.header {
            writer
                .write_record(records.columns())
                .map_err(|e| CsvError::Write(e.to_string()))?;
        }

        for (index, row) in records.rows().iter().enumerate() {
            let cells: Vec<String> = row.iter().map(|value| self.cell_text(value)).collect();
            writer
                .write_record(&cells)
                .map_err(|e| CsvError::Write(e.to_string()))?;
            trace!(row = index, "Wrote CSV row");
        }

        writer.flush()?;
        debug!(record_count = records.len(), "Finished writing CSV");
        Ok(())
    }

    /// Render records as a CSV string
    ///
    /// # Errors
    ///
    /// Same as [`CsvWriter::write`].
    pub fn write_string(&self, records: &RecordSet) -> Result<String> {
        let mut output = Vec::new();
        self.write(&mut output, records)?;
        String::from_utf8(output).map_err(|e| CsvError::Write(e.to_string()))
    }

    /// Write records to a file, replacing it
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be created or written.
    pub fn write_path(&self, path: &Path, records: &RecordSet) -> Result<()> {
        let file = std::fs::File::create(path)?;
        self.write(file, records)
    }

    fn cell_text(&self, value: &Value) -> String {
        if value.is_null() {
            self.config.null_text().to_string()
        } else {
            value.to_string()
        }
    }
}
