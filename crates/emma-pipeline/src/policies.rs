//! Acceptance policies and strictness levels
//!
//! Defined next to the validation report, which applies them.

pub use emma_validation::policies::{AcceptancePolicy, StrictnessLevel};
