//! Validation messages and their severity
#![allow(clippy::must_use_candidate)] // Constructor helpers are clear at call sites without #[must_use].
#![allow(clippy::return_self_not_must_use)] // Fluent setters are designed for chaining.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        };
        f.write_str(label)
    }
}

/// A message produced while checking records against a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationMessage {
    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Machine-readable rule code (e.g. `missing_mandatory`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Column the message is about
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
}

impl ValidationMessage {
    /// Create a new validation message
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            code: None,
            column: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    /// Attach the rule code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the affected column
    pub fn with_column(mut self, column: impl Into<String>) -> Self {
        self.column = Some(column.into());
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for ValidationMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.severity, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_creation() {
        let msg = ValidationMessage::error("Mandatory column missing")
            .with_code("missing_mandatory")
            .with_column("role");

        assert_eq!(msg.severity, Severity::Error);
        assert_eq!(msg.message, "Mandatory column missing");
        assert_eq!(msg.code.as_deref(), Some("missing_mandatory"));
        assert_eq!(msg.column.as_deref(), Some("role"));
        assert!(msg.is_error());
        assert!(!msg.is_warning());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ValidationMessage::warning("Unable to map 'notes'").to_string(),
            "[WARNING] Unable to map 'notes'"
        );
        assert_eq!(ValidationMessage::info("ok").to_string(), "[INFO] ok");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn test_serialized_shape() {
        let msg = ValidationMessage::warning("Unable to map 'notes' for 'InfraVlan'");
        let json = serde_json::to_string(&msg).unwrap();

        assert_eq!(
            json,
            r#"{"severity":"warning","message":"Unable to map 'notes' for 'InfraVlan'"}"#
        );
    }
}
