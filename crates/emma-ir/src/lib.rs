#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # emma-ir
//!
//! Format-neutral structures shared by the config analyzer crates.
//!
//! Device configurations of every dialect end up as a [`ParsedConfig`]
//! (named segments of raw text). Hierarchical dialects are first parsed into
//! a [`ConfigNode`] tree. Data extracted from segments is carried as a
//! [`RecordSet`] until it is validated and uploaded.

/// Named segments produced by the dialect parsers.
pub mod document;
/// Validation messages and their severity.
pub mod metadata;
/// Tree model for hierarchical (brace-delimited) configurations.
pub mod node;
/// Page slicing for long listings.
pub mod paginate;
/// Tabular records with nullable cells.
pub mod record;
/// Path lookup, insertion and visitor-based walking of config trees.
pub mod traversal;

pub use document::{PARSE_ERROR_SEGMENT, ParsedConfig, UNCAPTURED};
pub use metadata::{Severity, ValidationMessage};
pub use node::ConfigNode;
pub use paginate::{page_count, paginate};
pub use record::{RecordSet, Value};
pub use traversal::{Traversal, get_path, leaves, set_path, walk};

use thiserror::Error;

/// Errors that can occur when working with the IR
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Unknown column: {column}")]
    UnknownColumn { column: String },

    #[error("Row {index} out of range ({len} rows)")]
    RowOutOfRange { index: usize, len: usize },

    #[error("Row length mismatch: expected {expected} values, got {actual}")]
    RowLength { expected: usize, actual: usize },
}

impl Error {
    /// Build an invalid-path error with the offending path and a reason.
    pub fn invalid_path(path: &[String], reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.join(" > "),
            reason: reason.into(),
        }
    }

    /// Build an unknown-column error.
    pub fn unknown_column(column: impl Into<String>) -> Self {
        Self::UnknownColumn {
            column: column.into(),
        }
    }
}

/// Crate-local result type for IR operations.
pub type Result<T> = std::result::Result<T, Error>;
