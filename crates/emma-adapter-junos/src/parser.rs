//! Parser for brace-delimited configurations

use crate::{Error, Result};
use emma_ir::{ConfigNode, set_path};
use regex::Regex;
use std::sync::LazyLock;
use tracing::{debug, trace, warn};

static BLOCK_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment pattern"));

static LINE_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"//.*").expect("valid line comment pattern"));

/// A recoverable problem found while parsing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseWarning {
    /// Line number (1-indexed) after comment removal
    pub line: usize,
    pub message: String,
}

/// Parsed tree plus the warnings collected on the way
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    pub tree: ConfigNode,
    pub warnings: Vec<ParseWarning>,
}

/// Parser for `key { ... }` / `key value;` configurations
#[derive(Debug, Clone, Copy, Default)]
pub struct JunosParser;

impl JunosParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a configuration into a tree
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoStatements`] when no statement was found.
    pub fn parse(&self, text: &str) -> Result<ConfigNode> {
        self.parse_with_warnings(text).map(|outcome| outcome.tree)
    }

    /// Parse a configuration, keeping warnings about skipped lines
    ///
    /// Statements are stored at the current block path; a later statement
    /// with the same path replaces an earlier one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoStatements`] when no statement was found.
    pub fn parse_with_warnings(&self, text: &str) -> Result<ParseOutcome> {
        let without_blocks = BLOCK_COMMENT.replace_all(text, "");
        let cleaned = LINE_COMMENT.replace_all(&without_blocks, "");

        let mut tree = ConfigNode::block();
        let mut path: Vec<String> = Vec::new();
        let mut warnings = Vec::new();

        for (index, raw) in cleaned.trim().lines().enumerate() {
            let line = raw.trim();
            let line_number = index + 1;

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            if line.ends_with('{') {
                let key = line.trim_end_matches('{').trim();
                trace!(line = line_number, key, "Open block");
                path.push(key.to_string());
            } else if line == "}" {
                if path.pop().is_none() {
                    warn!(line = line_number, "Closing brace without open block");
                    warnings.push(ParseWarning {
                        line: line_number,
                        message: "Closing brace without open block".to_string(),
                    });
                }
            } else if line.ends_with(';') {
                let statement = line.trim_end_matches(';').trim();
                let (key, value) = match statement.split_once(char::is_whitespace) {
                    Some((key, value)) => (key, Some(value.trim())),
                    None => (statement, None),
                };
                if key.is_empty() {
                    warn!(line = line_number, "Statement without a key");
                    warnings.push(ParseWarning {
                        line: line_number,
                        message: "Statement without a key".to_string(),
                    });
                    continue;
                }

                let mut full_path = path.clone();
                full_path.push(key.to_string());
                let node = value.map_or_else(ConfigNode::flag, ConfigNode::leaf);
                if let Err(e) = set_path(&mut tree, &full_path, node) {
                    warn!(line = line_number, error = %e, "Unable to store statement");
                    warnings.push(ParseWarning {
                        line: line_number,
                        message: e.to_string(),
                    });
                }
            } else {
                trace!(line = line_number, text = line, "Ignoring unrecognised line");
            }
        }

        if !path.is_empty() {
            let line = cleaned.trim().lines().count();
            warn!(line, open = ?path, "Configuration ends inside a block");
            warnings.push(ParseWarning {
                line,
                message: format!("{} block(s) left open", path.len()),
            });
        }

        if tree.is_empty() {
            debug!("No statements found in configuration");
            return Err(Error::NoStatements);
        }

        debug!(leaves = tree.leaf_count(), warnings = warnings.len(), "Parsed configuration");
        Ok(ParseOutcome { tree, warnings })
    }
}
