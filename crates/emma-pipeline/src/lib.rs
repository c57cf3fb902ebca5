#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # emma-pipeline
//!
//! Config analysis pipeline, acceptance policies, and record upload.
//!
//! A [`Pipeline`] turns device configuration text into validated records
//! for one segment at a time. Records that pass the [`AcceptancePolicy`]
//! are written through a [`RecordStore`] by the [`UploadCoordinator`],
//! which keeps going when single rows fail.

pub mod node_ref;
pub mod pipeline;
pub mod policies;
pub mod store;
pub mod upload;

pub use node_ref::{HFID_SEPARATOR, NodeRef};
pub use pipeline::{Pipeline, PipelineConfig, Platform, SegmentAnalysis, expose_schema_columns};
pub use policies::{AcceptancePolicy, StrictnessLevel};
pub use store::{MemoryStore, Payload, RecordStore, StoredRecord};
pub use upload::{RowFailure, UploadCoordinator, UploadOptions, UploadReport, UploadStage};

use thiserror::Error;

/// Errors that can occur in the pipeline
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("Pipeline error during {operation} for '{subject}': {message}")]
    Pipeline {
        operation: String,
        subject: String,
        message: String,
    },

    #[error("Upload blocked by validation: {errors} errors, {warnings} warnings")]
    UploadBlocked { errors: usize, warnings: usize },

    #[error("No target schema configured")]
    NoSchema,

    /// The external store rejected a call
    #[error("Store error during {operation} of '{kind}': {message}")]
    Store {
        operation: String,
        kind: String,
        message: String,
    },
}

impl Error {
    /// Create a structured pipeline error with operation/subject context.
    pub fn pipeline(
        operation: impl Into<String>,
        subject: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Pipeline {
            operation: operation.into(),
            subject: subject.into(),
            message: message.into(),
        }
    }

    /// Create a store error with operation/kind context.
    pub fn store(
        operation: impl Into<String>,
        kind: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Store {
            operation: operation.into(),
            kind: kind.into(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_preserves_operation_and_kind_context() {
        let error = Error::store("upsert", "InfraVlan", "duplicate vlan_id");
        match &error {
            Error::Store {
                operation,
                kind,
                message,
            } => {
                assert_eq!(operation, "upsert");
                assert_eq!(kind, "InfraVlan");
                assert_eq!(message, "duplicate vlan_id");
            }
            _ => panic!("expected store variant"),
        }
        assert_eq!(
            error.to_string(),
            "Store error during upsert of 'InfraVlan': duplicate vlan_id"
        );
    }

    #[test]
    fn upload_blocked_reports_counts() {
        let error = Error::UploadBlocked {
            errors: 2,
            warnings: 1,
        };
        assert_eq!(
            error.to_string(),
            "Upload blocked by validation: 2 errors, 1 warnings"
        );
    }
}
