//! Validation engine

use crate::rules::{
    validate_cardinality, validate_choices, validate_mandatory_columns, validate_unmapped_columns,
};
use emma_ir::{RecordSet, ValidationMessage};
use emma_schema::{Schema, SchemaRegistry};
use tracing::debug;

/// Validation configuration
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Report columns the schema does not know
    pub report_unmapped: bool,
    /// Check values of choice-constrained attributes
    pub check_choices: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            report_unmapped: true,
            check_choices: true,
        }
    }
}

/// Checks record sets against a target schema.
///
/// Rules run in a fixed order: missing mandatory columns, unmapped
/// columns, invalid choice values, unsupported relationship cardinality.
/// The same inputs always produce the same messages in the same order.
#[derive(Debug, Clone, Default)]
pub struct SchemaValidator {
    config: ValidationConfig,
}

impl SchemaValidator {
    /// Create a validator with every rule enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specific configuration
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate a record set
    pub fn validate(&self, records: &RecordSet, schema: &Schema) -> Vec<ValidationMessage> {
        let mut messages = validate_mandatory_columns(records, schema);
        if self.config.report_unmapped {
            messages.extend(validate_unmapped_columns(records, schema));
        }
        if self.config.check_choices {
            messages.extend(validate_choices(records, schema));
        }
        messages.extend(validate_cardinality(records, schema));

        debug!(
            kind = schema.kind(),
            rows = records.len(),
            columns = records.columns().len(),
            messages = messages.len(),
            "Validated records"
        );
        messages
    }

    /// Validate against the schema of `kind` in a registry
    ///
    /// # Errors
    ///
    /// Returns an error when the registry has no schema for `kind`.
    pub fn validate_kind(
        &self,
        records: &RecordSet,
        registry: &SchemaRegistry,
        kind: &str,
    ) -> crate::Result<Vec<ValidationMessage>> {
        let schema = registry.require(kind)?;
        Ok(self.validate(records, schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use emma_ir::Value;
    use emma_schema::{AttributeDefinition, Cardinality, RelationshipDefinition};

    fn schema() -> Schema {
        Schema::new(
            "InfraVlan",
            vec![
                AttributeDefinition {
                    name: "vlan_id".to_string(),
                    kind: "Number".to_string(),
                    optional: false,
                    default_value: None,
                    choices: Vec::new(),
                },
                AttributeDefinition {
                    name: "status".to_string(),
                    kind: "Dropdown".to_string(),
                    optional: true,
                    default_value: None,
                    choices: vec!["active".to_string()],
                },
            ],
            vec![RelationshipDefinition {
                name: "tags".to_string(),
                peer: "BuiltinTag".to_string(),
                cardinality: Cardinality::Many,
                optional: true,
            }],
        )
    }

    fn records() -> RecordSet {
        let mut records = RecordSet::new(["tags", "status", "extra"]);
        records
            .push_row(vec![Value::from("t1"), Value::from("retired"), Value::Null])
            .unwrap();
        records
    }

    #[test]
    fn test_rules_run_in_order() {
        let messages = SchemaValidator::new().validate(&records(), &schema());

        let codes: Vec<_> = messages.iter().filter_map(|m| m.code.as_deref()).collect();
        assert_eq!(
            codes,
            ["missing_mandatory", "unmapped_column", "invalid_choice", "unsupported_cardinality"]
        );
    }

    #[test]
    fn test_disabled_rules() {
        let validator = SchemaValidator::with_config(ValidationConfig {
            report_unmapped: false,
            check_choices: false,
        });
        let messages = validator.validate(&records(), &schema());

        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(ValidationMessage::is_error));
    }

    #[test]
    fn test_unknown_kind() {
        let registry = SchemaRegistry::new();
        let result = SchemaValidator::new().validate_kind(&records(), &registry, "InfraVlan");

        assert!(matches!(result, Err(crate::Error::Schema(_))));
    }
}
