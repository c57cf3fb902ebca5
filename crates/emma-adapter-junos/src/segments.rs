//! Path-based segmentation of configuration trees

use crate::parser::JunosParser;
use crate::registry::PathRegistry;
use crate::render::{flat_line, render_wrapped};
use emma_ir::{ConfigNode, ParsedConfig, Traversal, UNCAPTURED, get_path, walk};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Instance text of the failure result
pub const FAILED_TO_PARSE: &str = "Failed to parse config.";

/// How the tree is cut into segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentationMode {
    /// One instance per registry path: the block at the path wrapped in
    /// its ancestors
    #[default]
    Registry,

    /// Registry paths, with one instance per entry of the block
    SplitEntries,

    /// One segment per top-level key, one instance per entry
    TopLevel,
}

/// Cuts configuration trees into named segments
#[derive(Debug, Clone, Default)]
pub struct JunosSegmenter {
    registry: PathRegistry,
    mode: SegmentationMode,
}

impl JunosSegmenter {
    /// Segmenter over the built-in paths
    pub fn new() -> Self {
        Self::with_registry(PathRegistry::builtin())
    }

    pub fn with_registry(registry: PathRegistry) -> Self {
        Self {
            registry,
            mode: SegmentationMode::Registry,
        }
    }

    #[must_use]
    pub fn with_mode(mut self, mode: SegmentationMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn registry(&self) -> &PathRegistry {
        &self.registry
    }

    pub fn mode(&self) -> SegmentationMode {
        self.mode
    }

    /// Parse and segment a configuration.
    ///
    /// A configuration without statements yields the failure result: a
    /// single `Error` segment holding [`FAILED_TO_PARSE`].
    pub fn parse(&self, text: &str) -> ParsedConfig {
        match JunosParser::new().parse(text) {
            Ok(tree) => self.segment(&tree),
            Err(e) => {
                warn!(error = %e, "Unable to parse hierarchical configuration");
                ParsedConfig::failed(FAILED_TO_PARSE)
            }
        }
    }

    /// Cut a parsed tree into segments.
    ///
    /// Instances are rendered inside their ancestor blocks. A registry path
    /// that holds a leaf counts as captured but yields no segment. Leaves
    /// outside every captured path are listed under [`UNCAPTURED`] as
    /// one-line statements.
    pub fn segment(&self, tree: &ConfigNode) -> ParsedConfig {
        match self.mode {
            SegmentationMode::Registry => self.segment_by_registry(tree, whole_block),
            SegmentationMode::SplitEntries => self.segment_by_registry(tree, entries),
            SegmentationMode::TopLevel => segment_top_level(tree),
        }
    }

    fn segment_by_registry(
        &self,
        tree: &ConfigNode,
        split: fn(&[String], &ConfigNode) -> Vec<String>,
    ) -> ParsedConfig {
        let mut parsed = ParsedConfig::new();
        let mut captured: HashSet<Vec<String>> = HashSet::new();

        for entry in self.registry.paths() {
            let Some(node) = get_path(tree, &entry.path) else {
                continue;
            };
            captured.insert(entry.path.clone());
            if node.is_leaf() {
                debug!(segment = %entry.name, "Segment path holds a statement, not a block");
                continue;
            }
            let instances = split(&entry.path, node);
            debug!(segment = %entry.name, instances = instances.len(), "Matched segment path");
            if !instances.is_empty() {
                parsed.insert(entry.name.as_str(), instances);
            }
        }

        parsed.insert(UNCAPTURED, uncaptured(tree, &captured));
        parsed
    }
}

fn segment_top_level(tree: &ConfigNode) -> ParsedConfig {
    let mut parsed = ParsedConfig::new();
    if let Some(children) = tree.as_block() {
        for (key, node) in children {
            let instances = entries(std::slice::from_ref(key), node);
            debug!(segment = %key, instances = instances.len(), "Top-level segment");
            parsed.insert(key.as_str(), instances);
        }
    }
    parsed.insert(UNCAPTURED, Vec::new());
    parsed
}

/// The node at `path` as a single instance
fn whole_block(path: &[String], node: &ConfigNode) -> Vec<String> {
    match path.split_last() {
        Some((key, ancestors)) if !node.is_empty() => vec![render_wrapped(ancestors, key, node)],
        _ => Vec::new(),
    }
}

/// One rendered instance per child of the node at `path`
fn entries(path: &[String], node: &ConfigNode) -> Vec<String> {
    match node {
        ConfigNode::Block(children) => children
            .iter()
            .map(|(key, child)| render_wrapped(path, key, child))
            .collect(),
        ConfigNode::Leaf(_) => match path.split_last() {
            Some((key, ancestors)) => vec![render_wrapped(ancestors, key, node)],
            None => Vec::new(),
        },
    }
}

fn uncaptured(tree: &ConfigNode, captured: &HashSet<Vec<String>>) -> Vec<String> {
    struct Leftovers<'a> {
        captured: &'a HashSet<Vec<String>>,
        lines: Vec<String>,
    }

    impl Traversal for Leftovers<'_> {
        fn leaf(&mut self, path: &[String], value: Option<&str>) {
            if !self.captured.contains(path) {
                self.lines.push(flat_line(path, value));
            }
        }

        fn enter(&mut self, path: &[String]) -> bool {
            !self.captured.contains(path)
        }
    }

    let mut leftovers = Leftovers {
        captured,
        lines: Vec::new(),
    };
    walk(tree, &mut leftovers);
    leftovers.lines
}
