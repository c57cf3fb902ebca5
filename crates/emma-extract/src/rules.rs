//! Extraction rule sets: field name to regular expression
//!
//! Patterns use the syntax of the `regex` crate. Look-around and
//! backreferences are not available; a rule using them is skipped when the
//! extractor is built. Capture the wanted part in group 1 instead, e.g.
//! `hostname (\S+)` rather than `(?<=hostname )\S+`.

use crate::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Named regular expressions, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleSet {
    rules: IndexMap<String, String>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a rule
    #[must_use]
    pub fn with_rule(mut self, field: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.insert(field, pattern);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, pattern: impl Into<String>) {
        self.rules.insert(field.into(), pattern.into());
    }

    /// Remove a rule, returning its pattern
    pub fn remove(&mut self, field: &str) -> Option<String> {
        self.rules.shift_remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.rules.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Parse a YAML mapping of `field: regex`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] with the error location when the YAML is
    /// not a mapping of strings.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Parse {
            message: format!("Failed to parse rules: {e}"),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
        })
    }

    /// Parse a JSON object of `"field": "regex"`
    ///
    /// # Errors
    ///
    /// Returns [`Error::Parse`] when the JSON is not an object of strings.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Parse {
            message: format!("Failed to parse rules: {e}"),
            line: Some(e.line()),
            column: Some(e.column()),
        })
    }

    /// Load rules from a file; JSON for `.json`, YAML otherwise
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().is_some_and(|e| e == "json") {
            Self::from_json(&content)
        } else {
            Self::from_yaml(&content)
        }
    }

    /// Serialize to YAML
    ///
    /// # Errors
    ///
    /// Returns an error when serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(|e| Error::parse(format!("Failed to serialize: {e}")))
    }
}

impl FromIterator<(String, String)> for RuleSet {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_keeps_order() {
        let rules = RuleSet::from_yaml(
            "vlan_id: 'vlan\\s+(\\d+)'\nname: 'name\\s+(\\S+)'\nstatus: 'shutdown'\n",
        )
        .unwrap();

        assert_eq!(rules.len(), 3);
        assert_eq!(
            rules.iter().map(|(k, _)| k).collect::<Vec<_>>(),
            ["vlan_id", "name", "status"]
        );
        assert_eq!(rules.get("vlan_id"), Some(r"vlan\s+(\d+)"));
    }

    #[test]
    fn test_parse_json() {
        let rules = RuleSet::from_json(r#"{"address": "server\\s+(\\S+)"}"#).unwrap();
        assert_eq!(rules.get("address"), Some(r"server\s+(\S+)"));
    }

    #[test]
    fn test_parse_errors() {
        let err = RuleSet::from_yaml("vlan_id: [1, 2\n").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));

        let err = RuleSet::from_json("[\"not\", \"a map\"]").unwrap_err();
        assert!(err.to_string().contains("Failed to parse rules"));
    }

    #[test]
    fn test_builder_and_yaml_output() {
        let mut rules = RuleSet::new()
            .with_rule("name", r"name\s+(\S+)")
            .with_rule("mtu", r"mtu\s+(\d+)");
        assert_eq!(rules.remove("name").as_deref(), Some(r"name\s+(\S+)"));

        let yaml = rules.to_yaml().unwrap();
        assert_eq!(RuleSet::from_yaml(&yaml).unwrap(), rules);
    }
}
