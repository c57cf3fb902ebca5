//! Segment path registry for hierarchical configurations

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// A named path through the configuration tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentPath {
    pub name: String,
    pub path: Vec<String>,
}

impl SegmentPath {
    pub fn new<S: Into<String>>(name: impl Into<String>, path: impl IntoIterator<Item = S>) -> Self {
        Self {
            name: name.into(),
            path: path.into_iter().map(Into::into).collect(),
        }
    }

    /// Path for display, e.g. `protocols > bgp`
    pub fn describe(&self) -> String {
        self.path.join(" > ")
    }

    fn check(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::InvalidPath {
                name: self.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }
        if self.path.is_empty() || self.path.iter().any(|key| key.trim().is_empty()) {
            return Err(Error::InvalidPath {
                name: self.name.clone(),
                reason: "path must contain non-empty keys".to_string(),
            });
        }
        Ok(())
    }
}

/// A path left out of a registry, with the reason
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedPath {
    pub name: String,
    pub reason: String,
}

/// Ordered set of segment paths
#[derive(Debug, Clone, Default)]
pub struct PathRegistry {
    paths: Vec<SegmentPath>,
    skipped: Vec<SkippedPath>,
}

impl PathRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in paths
    pub fn builtin() -> Self {
        Self::from_paths(builtin_paths())
    }

    pub fn from_paths(paths: impl IntoIterator<Item = SegmentPath>) -> Self {
        let mut registry = Self::new();
        registry.extend(paths);
        registry
    }

    /// Add a path at the end of the registry
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate name or an empty name or path.
    pub fn add(&mut self, path: SegmentPath) -> Result<()> {
        path.check()?;
        if self.get(&path.name).is_some() {
            return Err(Error::DuplicatePath(path.name));
        }
        self.paths.push(path);
        Ok(())
    }

    /// Add paths, skipping the ones that cannot be registered
    pub fn extend(&mut self, paths: impl IntoIterator<Item = SegmentPath>) {
        for path in paths {
            let name = path.name.clone();
            if let Err(e) = self.add(path) {
                warn!(name = %name, error = %e, "Skipping segment path");
                self.skipped.push(SkippedPath {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    pub fn paths(&self) -> &[SegmentPath] {
        &self.paths
    }

    pub fn skipped(&self) -> &[SkippedPath] {
        &self.skipped
    }

    pub fn get(&self, name: &str) -> Option<&SegmentPath> {
        self.paths.iter().find(|p| p.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(|p| p.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// The built-in segment paths, in output order
pub fn builtin_paths() -> Vec<SegmentPath> {
    vec![
        SegmentPath::new("system", ["system"]),
        SegmentPath::new("ntp", ["system", "ntp"]),
        SegmentPath::new("dns", ["system", "name-server"]),
        SegmentPath::new("services", ["system", "services"]),
        SegmentPath::new("interfaces", ["interfaces"]),
        SegmentPath::new("protocols", ["protocols"]),
        SegmentPath::new("bgp", ["protocols", "bgp"]),
        SegmentPath::new("ospf", ["protocols", "ospf"]),
        SegmentPath::new("isis", ["protocols", "isis"]),
        SegmentPath::new("routing_options", ["routing-options"]),
        SegmentPath::new("policy_options", ["policy-options"]),
        SegmentPath::new("firewall", ["firewall"]),
        SegmentPath::new("security", ["security"]),
        SegmentPath::new("zones", ["security", "zones"]),
        SegmentPath::new("snmp", ["snmp"]),
        SegmentPath::new("routing_instances", ["routing-instances"]),
        SegmentPath::new("chassis", ["chassis"]),
    ]
}
