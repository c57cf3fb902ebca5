//! # emma-schema
//!
//! Schema model, loader and registry for record kinds of the source of
//! truth.
//!
//! Schemas are read from Infrahub schema documents (JSON or YAML) and are
//! immutable once loaded. The validator consumes them read-only.

pub mod loader;
pub mod model;
pub mod registry;

pub use loader::SchemaLoader;
pub use model::{AttributeDefinition, Cardinality, RelationshipDefinition, Schema};
pub use registry::SchemaRegistry;

use thiserror::Error;

/// Errors that can occur when working with schemas
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema not found: {0}")]
    NotFound(String),

    #[error("Invalid schema format: {0}")]
    InvalidFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
