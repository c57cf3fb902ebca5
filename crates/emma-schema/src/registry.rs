//! Schema registry keyed by kind

use crate::model::Schema;
use crate::{Error, Result};
use std::collections::HashMap;

/// Registry for looking up schemas by kind
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    schemas: HashMap<String, Schema>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a schema under its kind, replacing any previous one
    pub fn register(&mut self, schema: Schema) {
        self.schemas.insert(schema.kind().to_string(), schema);
    }

    /// Get a schema by kind
    pub fn get(&self, kind: &str) -> Option<&Schema> {
        self.schemas.get(kind)
    }

    /// Get a schema by kind, failing when it is not registered
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for unknown kinds.
    pub fn require(&self, kind: &str) -> Result<&Schema> {
        self.get(kind)
            .ok_or_else(|| Error::NotFound(format!("Schema {kind} is not registered")))
    }

    /// Check if a schema exists
    pub fn contains(&self, kind: &str) -> bool {
        self.schemas.contains_key(kind)
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.schemas.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

impl FromIterator<Schema> for SchemaRegistry {
    fn from_iter<T: IntoIterator<Item = Schema>>(iter: T) -> Self {
        let mut registry = Self::new();
        for schema in iter {
            registry.register(schema);
        }
        registry
    }
}
