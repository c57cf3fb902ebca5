//! Validation report

use crate::policies::{AcceptancePolicy, StrictnessLevel};
use emma_ir::{Severity, ValidationMessage};
use serde::Serialize;
use std::fmt;

/// Summary of the messages produced for one record set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    messages: Vec<ValidationMessage>,
}

impl ValidationReport {
    pub fn new(messages: Vec<ValidationMessage>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[ValidationMessage] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<ValidationMessage> {
        self.messages
    }

    /// Number of messages with the given severity
    pub fn count(&self, severity: Severity) -> usize {
        self.messages.iter().filter(|m| m.severity == severity).count()
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn info_count(&self) -> usize {
        self.count(Severity::Info)
    }

    /// No errors and no warnings
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0 && self.warning_count() == 0
    }

    /// Whether the policy refuses an upload of these records
    pub fn blocks_upload(&self, policy: AcceptancePolicy, strictness: StrictnessLevel) -> bool {
        policy.blocks(strictness, self.error_count(), self.warning_count())
    }
}

impl From<Vec<ValidationMessage>> for ValidationReport {
    fn from(messages: Vec<ValidationMessage>) -> Self {
        Self::new(messages)
    }
}

/// One `[SEVERITY] message` line per message, then the totals
impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for message in &self.messages {
            writeln!(f, "{message}")?;
        }
        writeln!(f, "Errors: {}", self.error_count())?;
        write!(f, "Warnings: {}", self.warning_count())
    }
}
