//! Errors of the CSV adapter

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CsvError {
    /// Malformed CSV text
    #[error("Malformed CSV at line {line}: {message}")]
    Malformed { line: u64, message: String },

    /// A record has a different number of cells than the header
    #[error("Record at line {line} has {found} cells, expected {expected}")]
    Width { line: u64, expected: usize, found: usize },

    #[error("Column '{0}' appears twice in the header")]
    DuplicateColumn(String),

    #[error("The {setting} must be an ASCII character, got {found:?}")]
    NonAscii { setting: &'static str, found: char },

    #[error("Failed to write CSV: {0}")]
    Write(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CsvError {
    pub fn malformed(line: u64, message: impl Into<String>) -> Self {
        Self::Malformed {
            line,
            message: message.into(),
        }
    }

    /// Source line the error points at
    pub fn line(&self) -> Option<u64> {
        match self {
            Self::Malformed { line, .. } | Self::Width { line, .. } if *line > 0 => Some(*line),
            _ => None,
        }
    }
}

impl From<csv::Error> for CsvError {
    fn from(e: csv::Error) -> Self {
        let line = e.position().map_or(0, csv::Position::line);
        let message = e.to_string();
        match e.into_kind() {
            csv::ErrorKind::Io(io) => Self::Io(io),
            _ => Self::malformed(line, message),
        }
    }
}

pub type CsvResult<T> = std::result::Result<T, CsvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_message() {
        let err = CsvError::Width {
            line: 3,
            expected: 4,
            found: 2,
        };
        assert_eq!(err.to_string(), "Record at line 3 has 2 cells, expected 4");
        assert_eq!(err.line(), Some(3));
    }

    #[test]
    fn test_line_only_when_known() {
        assert_eq!(CsvError::malformed(0, "bad").line(), None);
        assert_eq!(CsvError::Write("closed".to_string()).line(), None);
        assert_eq!(CsvError::DuplicateColumn("name".to_string()).line(), None);
    }
}
