//! CSV dialect settings

use crate::{CsvError, Result};
use serde::{Deserialize, Serialize};

/// Dialect of a record file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvConfig {
    pub delimiter: char,
    pub quote: char,
    /// First row names the columns
    pub header: bool,
    /// Cell texts read as null besides the empty cell. The first one is
    /// written for null values; nulls are written empty when none is set.
    pub null_tokens: Vec<String>,
    /// Read integers, decimals and booleans as typed values
    pub infer_types: bool,
    /// Strip whitespace around cells when reading
    pub trim: bool,
    /// End written rows with CRLF instead of LF
    pub crlf: bool,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            delimiter: ',',
            quote: '"',
            header: true,
            null_tokens: Vec::new(),
            infer_types: true,
            trim: false,
            crlf: false,
        }
    }
}

impl CsvConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    #[must_use]
    pub fn with_quote(mut self, quote: char) -> Self {
        self.quote = quote;
        self
    }

    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Also read `token` as null
    #[must_use]
    pub fn with_null_token(mut self, token: impl Into<String>) -> Self {
        self.null_tokens.push(token.into());
        self
    }

    #[must_use]
    pub fn with_type_inference(mut self, infer: bool) -> Self {
        self.infer_types = infer;
        self
    }

    #[must_use]
    pub fn with_trim(mut self, trim: bool) -> Self {
        self.trim = trim;
        self
    }

    #[must_use]
    pub fn with_crlf(mut self, crlf: bool) -> Self {
        self.crlf = crlf;
        self
    }

    /// Whether a cell holds a null value
    pub fn is_null(&self, cell: &str) -> bool {
        cell.is_empty() || self.null_tokens.iter().any(|token| token == cell)
    }

    /// Cell text of a null value
    pub fn null_text(&self) -> &str {
        self.null_tokens.first().map_or("", String::as_str)
    }

    pub(crate) fn reader_builder(&self) -> Result<csv::ReaderBuilder> {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(ascii("delimiter", self.delimiter)?)
            .quote(ascii("quote", self.quote)?)
            .has_headers(self.header)
            .flexible(true)
            .trim(if self.trim { csv::Trim::All } else { csv::Trim::None });
        Ok(builder)
    }

    pub(crate) fn writer_builder(&self) -> Result<csv::WriterBuilder> {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(ascii("delimiter", self.delimiter)?)
            .quote(ascii("quote", self.quote)?)
            .terminator(if self.crlf {
                csv::Terminator::CRLF
            } else {
                csv::Terminator::Any(b'\n')
            });
        Ok(builder)
    }
}

fn ascii(setting: &'static str, c: char) -> Result<u8> {
    u8::try_from(c)
        .ok()
        .filter(u8::is_ascii)
        .ok_or(CsvError::NonAscii { setting, found: c })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_cells() {
        let config = CsvConfig::new().with_null_token("NULL").with_null_token("n/a");

        assert!(config.is_null(""));
        assert!(config.is_null("n/a"));
        assert!(!config.is_null("null"));
        assert_eq!(config.null_text(), "NULL");
        assert_eq!(CsvConfig::default().null_text(), "");
    }

    #[test]
    fn test_non_ascii_delimiter() {
        let err = CsvConfig::new().with_delimiter('§').reader_builder().unwrap_err();
        assert!(matches!(err, CsvError::NonAscii { setting: "delimiter", found: '§' }));
        assert!(CsvConfig::new().with_quote('«').writer_builder().is_err());
    }

    #[test]
    fn test_partial_settings_keep_defaults() {
        let config: CsvConfig = serde_json::from_str(r#"{"delimiter": ";", "null_tokens": ["-"]}"#).unwrap();

        assert_eq!(config.delimiter, ';');
        assert!(config.header);
        assert!(config.infer_types);
        assert!(config.is_null("-"));
    }
}
