//! Acceptance policies and strictness levels

use serde::{Deserialize, Serialize};

/// Policy for records that produced validation messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptancePolicy {
    /// Block upload when any message is an error
    #[default]
    BlockOnError,

    /// Upload regardless of messages
    AcceptAll,
}

/// Strictness level for validation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrictnessLevel {
    /// Warnings are advisory
    #[default]
    Standard,

    /// Warnings block like errors
    Strict,
}

impl AcceptancePolicy {
    /// Whether the given message counts stop an upload
    pub fn blocks(self, strictness: StrictnessLevel, errors: usize, warnings: usize) -> bool {
        match self {
            Self::AcceptAll => false,
            Self::BlockOnError => {
                errors > 0 || (strictness == StrictnessLevel::Strict && warnings > 0)
            }
        }
    }
}
