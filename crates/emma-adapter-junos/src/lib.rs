//! # emma-adapter-junos
//!
//! Parser, renderer and path-based segmentation for hierarchical device
//! configurations (Junos style).
//!
//! `key { ... }` blocks and `key value;` statements are parsed into a
//! [`ConfigNode`](emma_ir::ConfigNode) tree. [`JunosSegmenter`] cuts the tree
//! into the named segments of a [`PathRegistry`] and renders each segment
//! instance back to configuration text.

pub mod parser;
pub mod registry;
pub mod render;
pub mod segments;

pub use parser::{JunosParser, ParseOutcome, ParseWarning};
pub use registry::{PathRegistry, SegmentPath, SkippedPath, builtin_paths};
pub use render::{flat_line, render, render_wrapped};
pub use segments::{FAILED_TO_PARSE, JunosSegmenter, SegmentationMode};

use thiserror::Error;

/// Errors that can occur when parsing hierarchical configurations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("No configuration statements found")]
    NoStatements,

    #[error("Invalid segment path '{name}': {reason}")]
    InvalidPath { name: String, reason: String },

    #[error("Duplicate segment path name: {0}")]
    DuplicatePath(String),
}

pub type Result<T> = std::result::Result<T, Error>;
