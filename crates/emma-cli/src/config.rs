//! Configuration file and feature flags

use anyhow::Context;
use emma_adapter_ios::{IosParser, IosParserConfig, PatternRegistry, SegmentPattern, UncapturedMode};
use emma_adapter_junos::{JunosSegmenter, PathRegistry, SegmentPath, SegmentationMode};
use emma_pipeline::Platform;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

/// Environment variable holding comma-separated feature flags
pub const FEATURE_FLAGS_ENV: &str = "EMMA_FEATURE_FLAGS";

/// Segment hierarchical configurations by top-level key
pub const JUNOS_TOP_LEVEL: &str = "junos_top_level";

/// One Junos segment instance per entry of the registry block
pub const JUNOS_SPLIT_ENTRIES: &str = "junos_split_entries";

/// Contents of the `--config` YAML file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmmaConfig {
    /// Platform used when a command gives none
    pub platform: Platform,
    pub uncaptured_mode: UncapturedMode,
    pub log_level: Option<String>,
    pub features: Vec<String>,
    /// Appended to the built-in line-oriented registry
    pub ios_patterns: Vec<SegmentPattern>,
    /// Appended to the built-in path registry
    pub junos_paths: IndexMap<String, Vec<String>>,
}

impl EmmaConfig {
    /// Read a configuration file
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or is not a valid configuration.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml(&text).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse a configuration document
    ///
    /// # Errors
    ///
    /// Fails on malformed YAML or unknown enum values.
    pub fn from_yaml(yaml: &str) -> anyhow::Result<Self> {
        // An empty document deserializes to unit, not to the defaults
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Flags from the file merged with the environment
    pub fn feature_flags(&self) -> FeatureFlags {
        let env = std::env::var(FEATURE_FLAGS_ENV).ok();
        FeatureFlags::merge(&self.features, env.as_deref())
    }

    /// Built-in line patterns followed by the configured ones
    pub fn pattern_registry(&self) -> PatternRegistry {
        let mut registry = PatternRegistry::builtin();
        registry.extend(self.ios_patterns.iter().cloned());
        registry
    }

    /// Built-in paths followed by the configured ones
    pub fn path_registry(&self) -> PathRegistry {
        let mut registry = PathRegistry::builtin();
        registry.extend(
            self.junos_paths
                .iter()
                .map(|(name, path)| SegmentPath::new(name, path.iter().map(String::as_str))),
        );
        registry
    }

    pub fn ios_parser(&self) -> IosParser {
        IosParser::with_registry(self.pattern_registry())
            .with_config(IosParserConfig::default().with_uncaptured_mode(self.uncaptured_mode))
    }

    /// Segmenter over the configured paths; `junos_top_level` wins over
    /// `junos_split_entries`
    pub fn junos_segmenter(&self, flags: &FeatureFlags) -> JunosSegmenter {
        let mode = if flags.is_feature_enabled(JUNOS_TOP_LEVEL) {
            SegmentationMode::TopLevel
        } else if flags.is_feature_enabled(JUNOS_SPLIT_ENTRIES) {
            SegmentationMode::SplitEntries
        } else {
            SegmentationMode::Registry
        };
        debug!(?mode, "Junos segmentation");
        JunosSegmenter::with_registry(self.path_registry()).with_mode(mode)
    }
}

/// Set of enabled feature flags
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureFlags {
    enabled: BTreeSet<String>,
}

impl FeatureFlags {
    /// Union of configured flags and a comma-separated list
    pub fn merge<S: AsRef<str>>(configured: &[S], env: Option<&str>) -> Self {
        let enabled = configured
            .iter()
            .map(|flag| flag.as_ref())
            .chain(env.unwrap_or_default().split(','))
            .map(str::trim)
            .filter(|flag| !flag.is_empty())
            .map(str::to_string)
            .collect();
        Self { enabled }
    }

    pub fn is_feature_enabled(&self, name: &str) -> bool {
        self.enabled.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }
}

/// Filter directive for the log subscriber.
///
/// The command-line flag wins over `RUST_LOG`, which wins over the
/// configuration file; `warn` applies when none is set.
pub fn log_directive(flag: Option<&str>, env: Option<&str>, configured: Option<&str>) -> String {
    [flag, env, configured]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|directive| !directive.is_empty())
        .unwrap_or("warn")
        .to_string()
}
