#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # emma-validation
//!
//! Schema-driven validation of extracted record sets.
//!
//! Record columns are compared with the mandatory, attribute and
//! relationship names of a target schema, and choice-constrained columns
//! are checked row by row. Results are plain messages; whether they block
//! an upload is decided by an [`AcceptancePolicy`].
//!
//! ## Example Usage
//!
//! ```rust
//! use emma_ir::RecordSet;
//! use emma_schema::{AttributeDefinition, Schema};
//! use emma_validation::{SchemaValidator, ValidationReport};
//!
//! let schema = Schema::new(
//!     "InfraVlan",
//!     vec![AttributeDefinition {
//!         name: "vlan_id".to_string(),
//!         kind: "Number".to_string(),
//!         optional: false,
//!         default_value: None,
//!         choices: Vec::new(),
//!     }],
//!     Vec::new(),
//! );
//! let records = RecordSet::new(["name"]);
//!
//! let report = ValidationReport::new(SchemaValidator::new().validate(&records, &schema));
//! assert_eq!(report.error_count(), 1);
//! assert_eq!(report.warning_count(), 1);
//! ```

pub mod engine;
pub mod policies;
pub mod reporter;
pub mod rules;

pub use engine::{SchemaValidator, ValidationConfig};
pub use policies::{AcceptancePolicy, StrictnessLevel};
pub use reporter::ValidationReport;
pub use rules::{
    validate_cardinality, validate_choices, validate_mandatory_columns, validate_unmapped_columns,
};

use emma_ir::{RecordSet, ValidationMessage};
use emma_schema::Schema;
use thiserror::Error;

/// Errors that can occur during validation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(#[from] emma_schema::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Validate a record set with every rule enabled
pub fn validate(records: &RecordSet, schema: &Schema) -> Vec<ValidationMessage> {
    SchemaValidator::new().validate(records, schema)
}
