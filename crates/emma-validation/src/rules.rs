//! Validation rules
//!
//! Each rule compares a record set against a schema and returns the
//! messages it produces. Rules never fail; problems are reported as data.

use emma_ir::{RecordSet, ValidationMessage};
use emma_schema::{Cardinality, Schema};
use std::collections::BTreeSet;

/// Rule code of a missing mandatory column
pub const MISSING_MANDATORY: &str = "missing_mandatory";
/// Rule code of a column the schema does not know
pub const UNMAPPED_COLUMN: &str = "unmapped_column";
/// Rule code of values outside an attribute's choices
pub const INVALID_CHOICE: &str = "invalid_choice";
/// Rule code of a many-valued relationship column
pub const UNSUPPORTED_CARDINALITY: &str = "unsupported_cardinality";

/// One ERROR per mandatory name that is not a column, in name order
#[must_use]
pub fn validate_mandatory_columns(records: &RecordSet, schema: &Schema) -> Vec<ValidationMessage> {
    let missing: BTreeSet<&str> = schema
        .mandatory_names()
        .into_iter()
        .filter(|name| !records.has_column(name))
        .collect();

    missing
        .into_iter()
        .map(|name| {
            ValidationMessage::error(format!(
                "Mandatory column for '{}' missing: '{name}'",
                schema.kind()
            ))
            .with_code(MISSING_MANDATORY)
            .with_column(name)
        })
        .collect()
}

/// One WARNING per column that is neither an attribute nor a relationship,
/// in name order
#[must_use]
pub fn validate_unmapped_columns(records: &RecordSet, schema: &Schema) -> Vec<ValidationMessage> {
    let unmapped: BTreeSet<&str> = records
        .columns()
        .iter()
        .map(String::as_str)
        .filter(|column| !schema.is_known_column(column))
        .collect();

    unmapped
        .into_iter()
        .map(|column| {
            ValidationMessage::warning(format!("Unable to map '{column}' for '{}'", schema.kind()))
                .with_code(UNMAPPED_COLUMN)
                .with_column(column)
        })
        .collect()
}

/// One ERROR per choice-constrained column holding a value outside its
/// choices. Null cells count as invalid. Offending rows are listed 1-based.
#[must_use]
pub fn validate_choices(records: &RecordSet, schema: &Schema) -> Vec<ValidationMessage> {
    let mut messages = Vec::new();

    for column in records.columns() {
        let Some(choices) = schema.choices(column) else {
            continue;
        };
        let Some(values) = records.column_values(column) else {
            continue;
        };

        let rows: Vec<String> = values
            .iter()
            .enumerate()
            .filter(|(_, value)| {
                value
                    .as_text()
                    .is_none_or(|text| !choices.iter().any(|c| *c == text))
            })
            .map(|(index, _)| (index + 1).to_string())
            .collect();

        if rows.is_empty() {
            continue;
        }

        messages.push(
            ValidationMessage::error(format!(
                "Invalid value for '{column}' in '{}'. Must be one of {} (rows {})",
                schema.kind(),
                format_options(choices),
                rows.join(", ")
            ))
            .with_code(INVALID_CHOICE)
            .with_column(column.as_str()),
        );
    }

    messages
}

/// One ERROR per column naming a relationship of cardinality many
#[must_use]
pub fn validate_cardinality(records: &RecordSet, schema: &Schema) -> Vec<ValidationMessage> {
    records
        .columns()
        .iter()
        .filter(|column| schema.cardinality(column) == Some(Cardinality::Many))
        .map(|column| {
            ValidationMessage::error(format!(
                "Only relationships with a cardinality of one are supported: '{column}'"
            ))
            .with_code(UNSUPPORTED_CARDINALITY)
            .with_column(column.as_str())
        })
        .collect()
}

/// `['a', 'b']`
fn format_options(options: &[String]) -> String {
    let quoted: Vec<String> = options.iter().map(|o| format!("'{o}'")).collect();
    format!("[{}]", quoted.join(", "))
}
