//! Segment pattern registry for line-oriented configurations

use crate::{Error, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// How a segment is recognised in the configuration text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternMatcher {
    /// A block starting at a line that begins with `start` and running up
    /// to the next line beginning with `sibling`, a `!` line or an empty
    /// line. `sibling` defaults to `start`.
    Block {
        start: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        sibling: Option<String>,
    },

    /// Every match of a single-line expression anchored at a line start
    Line { line: String },
}

/// A named segment pattern in source form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPattern {
    pub name: String,
    #[serde(flatten)]
    pub matcher: PatternMatcher,
}

impl SegmentPattern {
    /// Block pattern with an explicit sibling token
    pub fn block(name: impl Into<String>, start: impl Into<String>, sibling: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher: PatternMatcher::Block {
                start: start.into(),
                sibling: Some(sibling.into()),
            },
        }
    }

    /// Block pattern whose sibling token is its own start token
    pub fn repeating(name: impl Into<String>, start: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher: PatternMatcher::Block {
                start: start.into(),
                sibling: None,
            },
        }
    }

    /// Single-line pattern
    pub fn line(name: impl Into<String>, line: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            matcher: PatternMatcher::Line { line: line.into() },
        }
    }

    /// Equivalent multi-line regular expression, for display
    pub fn describe(&self) -> String {
        match &self.matcher {
            PatternMatcher::Block { start, sibling } => {
                let sibling = sibling.as_deref().unwrap_or(start);
                format!(r"^{start}[\s\S]+?(?=^{sibling}|^!|^$)")
            }
            PatternMatcher::Line { line } => format!("^{line}"),
        }
    }

    /// Compile the pattern
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPattern`] for an empty name or token, or an
    /// expression the regex engine rejects.
    pub fn compile(&self) -> Result<CompiledPattern> {
        if self.name.trim().is_empty() {
            return Err(Error::invalid_pattern(&self.name, "name must not be empty"));
        }

        let matcher = match &self.matcher {
            PatternMatcher::Block { start, sibling } => {
                let sibling = sibling.as_deref().unwrap_or(start);
                CompiledMatcher::Block {
                    start: self.anchored(start, "^(?:", ")")?,
                    sibling: self.anchored(sibling, "^(?:", ")")?,
                }
            }
            PatternMatcher::Line { line } => {
                CompiledMatcher::Line(self.anchored(line, "(?m)^(?:", ")")?)
            }
        };

        Ok(CompiledPattern {
            source: self.clone(),
            matcher,
        })
    }

    fn anchored(&self, token: &str, prefix: &str, suffix: &str) -> Result<Regex> {
        if token.is_empty() {
            return Err(Error::invalid_pattern(&self.name, "expression must not be empty"));
        }
        Regex::new(&format!("{prefix}{token}{suffix}"))
            .map_err(|e| Error::invalid_pattern(&self.name, e.to_string()))
    }
}

#[derive(Debug, Clone)]
pub(crate) enum CompiledMatcher {
    Block { start: Regex, sibling: Regex },
    Line(Regex),
}

/// A segment pattern ready for matching
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: SegmentPattern,
    pub(crate) matcher: CompiledMatcher,
}

impl CompiledPattern {
    pub fn name(&self) -> &str {
        &self.source.name
    }

    pub fn source(&self) -> &SegmentPattern {
        &self.source
    }

    pub fn describe(&self) -> String {
        self.source.describe()
    }
}

/// A pattern left out of a registry, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPattern {
    pub name: String,
    pub reason: String,
}

/// Ordered set of compiled segment patterns.
///
/// Patterns that fail to compile never abort construction; they are logged
/// and listed in [`PatternRegistry::skipped`].
#[derive(Debug, Clone, Default)]
pub struct PatternRegistry {
    patterns: Vec<CompiledPattern>,
    skipped: Vec<SkippedPattern>,
}

impl PatternRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in patterns
    pub fn builtin() -> Self {
        Self::from_patterns(builtin_patterns())
    }

    /// Registry built from the given patterns, in order
    pub fn from_patterns(patterns: impl IntoIterator<Item = SegmentPattern>) -> Self {
        let mut registry = Self::new();
        registry.extend(patterns);
        registry
    }

    /// Add a pattern at the end of the registry
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate name or a pattern that does not
    /// compile; the registry is left unchanged.
    pub fn add(&mut self, pattern: SegmentPattern) -> Result<()> {
        if self.get(&pattern.name).is_some() {
            return Err(Error::DuplicatePattern(pattern.name));
        }
        let compiled = pattern.compile()?;
        debug!(name = %compiled.name(), "Registered segment pattern");
        self.patterns.push(compiled);
        Ok(())
    }

    /// Add patterns, skipping the ones that cannot be registered
    pub fn extend(&mut self, patterns: impl IntoIterator<Item = SegmentPattern>) {
        for pattern in patterns {
            let name = pattern.name.clone();
            if let Err(e) = self.add(pattern) {
                warn!(name = %name, error = %e, "Skipping segment pattern");
                self.skipped.push(SkippedPattern {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    pub fn patterns(&self) -> &[CompiledPattern] {
        &self.patterns
    }

    /// Patterns that were rejected
    pub fn skipped(&self) -> &[SkippedPattern] {
        &self.skipped
    }

    pub fn get(&self, name: &str) -> Option<&CompiledPattern> {
        self.patterns.iter().find(|p| p.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(CompiledPattern::name)
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// The built-in segment patterns, in output order
pub fn builtin_patterns() -> Vec<SegmentPattern> {
    vec![
        SegmentPattern::repeating("vlan", r"vlan\s+\d+"),
        SegmentPattern::block("ospf", r"router\sospf\s\d+", r"router\s\S+"),
        SegmentPattern::block("eigrp", r"router\seigrp\s\d+", r"router\s\S+"),
        SegmentPattern::repeating("bgp", r"router\sbgp\s\d+"),
        SegmentPattern::repeating("standard_acl", r"access-list\s\d+"),
        SegmentPattern::block("extended_acl", r"access-list\s\d+\sextended", r"access-list\s\d+"),
        SegmentPattern::repeating("prefix_list", r"ip\sprefix-list\s\S+"),
        SegmentPattern::repeating("route_map", r"route-map\s\S+"),
        SegmentPattern::repeating("ntp", r"ntp\sserver\s\S+"),
        SegmentPattern::line("snmp", r"snmp-server\s.*"),
        SegmentPattern::repeating("logging", r"logging\s\S+"),
        SegmentPattern::block("line_vty", r"line\svty\s\d+\s\d+", r"line\s\S+"),
        SegmentPattern::block("line_console", r"line\scon\s\d+", r"line\s\S+"),
        SegmentPattern::repeating("line_aux", r"line\saux\s\d+"),
        SegmentPattern::repeating("class_map", r"class-map\s\S+"),
        SegmentPattern::repeating("policy_map", r"policy-map\s\S+"),
        SegmentPattern::repeating("service_policy", r"service-policy\s\S+"),
        SegmentPattern::repeating("aaa", r"aaa\s\S+"),
        SegmentPattern::repeating("vrf", r"ip\svrf\s\S+"),
        SegmentPattern::repeating("banner", r"banner\s\S+"),
        SegmentPattern::line(
            "dns_settings",
            r"ip domain-lookup|ip domain-name\s+\S+|ip name-server\s+[\d.\s]+(?:use-vrf\s+\S+)?",
        ),
        SegmentPattern::repeating("interface", r"interface\s+\S+"),
    ]
}
