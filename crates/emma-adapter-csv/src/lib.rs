//! # emma-adapter-csv
//!
//! CSV import and export of record sets.
//!
//! The first row names the columns. Empty cells read as null and null
//! values are written as empty cells, unless another null spelling is
//! configured.
//!
//! ## Example Usage
//!
//! ```rust
//! use emma_adapter_csv::{CsvAdapter, CsvConfig};
//!
//! let adapter = CsvAdapter::new().with_config(CsvConfig::new().with_null_token("-"));
//! let records = adapter.reader().read_str("name,role\nr1,-\n").unwrap();
//! assert!(records.get(0, "role").unwrap().is_null());
//!
//! let text = adapter.writer().write_string(&records).unwrap();
//! assert_eq!(text, "name,role\nr1,-\n");
//! ```

pub mod config;
pub mod errors;
pub mod reader;
pub mod writer;

pub use config::CsvConfig;
pub use errors::{CsvError, CsvResult};
pub use reader::CsvReader;
pub use writer::CsvWriter;

pub use errors::CsvError as Error;
pub type Result<T> = CsvResult<T>;

/// CSV adapter that combines reader and writer functionality
#[derive(Debug, Clone, Default)]
pub struct CsvAdapter {
    config: CsvConfig,
}

impl CsvAdapter {
    /// Create a new CSV adapter with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(mut self, config: CsvConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &CsvConfig {
        &self.config
    }

    /// Reader configured with this adapter's settings
    pub fn reader(&self) -> CsvReader {
        CsvReader::new().with_config(self.config.clone())
    }

    /// Writer configured with this adapter's settings
    pub fn writer(&self) -> CsvWriter {
        CsvWriter::new().with_config(self.config.clone())
    }
}
