//! # emma-extract
//!
//! Field extraction from configuration segments.
//!
//! A [`RuleSet`] maps field names to regular expressions. The
//! [`FieldExtractor`] runs every rule against each segment instance and
//! reports where each field matched; [`records_from_matches`] turns those
//! results into a [`RecordSet`](emma_ir::RecordSet).

pub mod extractor;
pub mod records;
pub mod rules;

pub use extractor::{BlockMatches, FieldExtractor, FieldMatch, SkippedRule};
pub use records::records_from_matches;
pub use rules::RuleSet;

use thiserror::Error;

/// Errors that can occur when loading or compiling extraction rules
#[derive(Error, Debug)]
pub enum Error {
    #[error("Rule parse error: {message}")]
    Parse {
        message: String,
        line: Option<usize>,
        column: Option<usize>,
    },

    #[error("Invalid rule '{field}': {message}")]
    InvalidRule { field: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            line: None,
            column: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
