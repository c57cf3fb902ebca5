//! Named segments of a parsed device configuration
#![allow(clippy::must_use_candidate)] // Accessors are clear at call sites without #[must_use].

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Segment holding text that no pattern claimed
pub const UNCAPTURED: &str = "uncaptured";

/// Segment name used when a configuration could not be parsed at all
pub const PARSE_ERROR_SEGMENT: &str = "Error";

/// A device configuration split into named segments.
///
/// Every segment maps to the ordered text blocks (instances) that belong to
/// it. Segment order follows the pattern registry, with [`UNCAPTURED`] last.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParsedConfig {
    segments: IndexMap<String, Vec<String>>,
}

impl ParsedConfig {
    /// Create an empty parsed configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the failure result carrying a single `Error` segment
    pub fn failed(message: impl Into<String>) -> Self {
        let mut parsed = Self::new();
        parsed.insert(PARSE_ERROR_SEGMENT, vec![message.into()]);
        parsed
    }

    /// True when this is the failure result of [`ParsedConfig::failed`]
    pub fn is_failure(&self) -> bool {
        self.segments.len() == 1 && self.segments.contains_key(PARSE_ERROR_SEGMENT)
    }

    /// Set the blocks of a segment, replacing any previous blocks
    pub fn insert(&mut self, name: impl Into<String>, blocks: Vec<String>) {
        self.segments.insert(name.into(), blocks);
    }

    /// Append one block to a segment, creating the segment if needed
    pub fn push_block(&mut self, name: &str, block: impl Into<String>) {
        self.segments
            .entry(name.to_string())
            .or_default()
            .push(block.into());
    }

    /// Blocks of a segment
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.segments.get(name).map(Vec::as_slice)
    }

    /// Blocks that no pattern claimed
    pub fn uncaptured(&self) -> &[String] {
        self.get(UNCAPTURED).unwrap_or_default()
    }

    /// Segment names in output order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.segments.keys().map(String::as_str)
    }

    /// Iterate over `(name, blocks)` pairs in output order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.segments
            .iter()
            .map(|(name, blocks)| (name.as_str(), blocks.as_slice()))
    }

    /// Number of segments, including [`UNCAPTURED`]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if there are no segments
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of blocks across all segments
    pub fn total_blocks(&self) -> usize {
        self.segments.values().map(Vec::len).sum()
    }

    /// Narrow to a single segment.
    ///
    /// The result always contains `name`, with no blocks when the segment
    /// is absent.
    pub fn select(&self, name: &str) -> ParsedConfig {
        let blocks = self.segments.get(name).cloned().unwrap_or_default();
        let mut narrowed = ParsedConfig::new();
        narrowed.insert(name, blocks);
        narrowed
    }
}

impl<'a> IntoIterator for &'a ParsedConfig {
    type Item = (&'a String, &'a Vec<String>);
    type IntoIter = indexmap::map::Iter<'a, String, Vec<String>>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ParsedConfig {
        let mut parsed = ParsedConfig::new();
        parsed.push_block("vlan", "vlan 10\n name users\n");
        parsed.push_block("vlan", "vlan 20\n name voice\n");
        parsed.push_block("ntp", "ntp server 10.0.0.1\n");
        parsed.insert(UNCAPTURED, vec!["hostname r1".to_string()]);
        parsed
    }

    #[test]
    fn test_segments_keep_insertion_order() {
        let parsed = sample();

        assert_eq!(parsed.names().collect::<Vec<_>>(), ["vlan", "ntp", UNCAPTURED]);
        assert_eq!(parsed.get("vlan").unwrap().len(), 2);
        assert_eq!(parsed.total_blocks(), 4);
        assert_eq!(parsed.uncaptured(), ["hostname r1"]);
    }

    #[test]
    fn test_select_narrows_to_one_segment() {
        let parsed = sample();

        let vlan = parsed.select("vlan");
        assert_eq!(vlan.len(), 1);
        assert_eq!(vlan.get("vlan"), parsed.get("vlan"));

        let missing = parsed.select("bgp");
        assert_eq!(missing.names().collect::<Vec<_>>(), ["bgp"]);
        assert!(missing.get("bgp").unwrap().is_empty());
    }

    #[test]
    fn test_failure_result() {
        let failed = ParsedConfig::failed("Failed to parse config.");

        assert!(failed.is_failure());
        assert!(!sample().is_failure());
        assert_eq!(
            serde_json::to_string(&failed).unwrap(),
            r#"{"Error":["Failed to parse config."]}"#
        );
    }

    #[test]
    fn test_uncaptured_defaults_to_empty() {
        let parsed = ParsedConfig::new();
        assert!(parsed.uncaptured().is_empty());
        assert!(parsed.is_empty());
    }
}
