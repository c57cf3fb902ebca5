//! # emma-adapter-ios
//!
//! Segment pattern registry and parser for line-oriented device
//! configurations (Cisco IOS style).
//!
//! Top-level blocks start at column 0 and run until the next sibling block,
//! a `!` separator line or an empty line. [`IosParser`] splits a
//! configuration into the named segments of a [`PatternRegistry`] and
//! collects every line no pattern claimed under `uncaptured`.

pub mod parser;
pub mod registry;

pub use parser::{IosParser, IosParserConfig, SegmentSpan, UncapturedMode};
pub use registry::{
    CompiledPattern, PatternMatcher, PatternRegistry, SegmentPattern, SkippedPattern,
    builtin_patterns,
};

use thiserror::Error;

/// Errors that can occur when building segment patterns
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid pattern '{name}': {message}")]
    InvalidPattern { name: String, message: String },

    #[error("Duplicate pattern name: {0}")]
    DuplicatePattern(String),
}

impl Error {
    pub fn invalid_pattern(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            name: name.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
