//! Schema model definitions

use emma_ir::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How many peers a relationship may point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cardinality {
    One,
    #[default]
    Many,
}

impl fmt::Display for Cardinality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::One => f.write_str("one"),
            Self::Many => f.write_str("many"),
        }
    }
}

/// Definition of an attribute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDefinition {
    pub name: String,
    /// Attribute type as declared by the store (e.g. `Text`, `Dropdown`)
    pub kind: String,
    pub optional: bool,
    pub default_value: Option<Value>,
    /// Allowed values, in declaration order; empty when unconstrained
    pub choices: Vec<String>,
}

impl AttributeDefinition {
    /// True when a record must provide this attribute
    pub fn is_mandatory(&self) -> bool {
        !self.optional && self.default_value.is_none()
    }
}

/// Definition of a relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDefinition {
    pub name: String,
    /// Kind of the related node
    pub peer: String,
    pub cardinality: Cardinality,
    pub optional: bool,
}

/// Target schema of a record kind.
///
/// Built once from a schema document and immutable afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    kind: String,
    attributes: Vec<AttributeDefinition>,
    relationships: Vec<RelationshipDefinition>,
}

impl Schema {
    pub fn new(
        kind: impl Into<String>,
        attributes: Vec<AttributeDefinition>,
        relationships: Vec<RelationshipDefinition>,
    ) -> Self {
        Self {
            kind: kind.into(),
            attributes,
            relationships,
        }
    }

    /// Kind name, e.g. `InfraVlan`
    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn attributes(&self) -> &[AttributeDefinition] {
        &self.attributes
    }

    pub fn relationships(&self) -> &[RelationshipDefinition] {
        &self.relationships
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeDefinition> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn relationship(&self, name: &str) -> Option<&RelationshipDefinition> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Attribute names in declaration order
    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(|a| a.name.as_str()).collect()
    }

    /// Relationship names in declaration order
    pub fn relationship_names(&self) -> Vec<&str> {
        self.relationships.iter().map(|r| r.name.as_str()).collect()
    }

    /// Names a record has to provide: mandatory attributes, then
    /// non-optional relationships
    pub fn mandatory_names(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|a| a.is_mandatory())
            .map(|a| a.name.as_str())
            .chain(
                self.relationships
                    .iter()
                    .filter(|r| !r.optional)
                    .map(|r| r.name.as_str()),
            )
            .collect()
    }

    /// Allowed values of an attribute, if it declares any
    pub fn choices(&self, attribute: &str) -> Option<&[String]> {
        self.attribute(attribute)
            .map(|a| a.choices.as_slice())
            .filter(|choices| !choices.is_empty())
    }

    /// Attributes that declare a choice set, with their choices
    pub fn choice_attributes(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.attributes
            .iter()
            .filter(|a| !a.choices.is_empty())
            .map(|a| (a.name.as_str(), a.choices.as_slice()))
    }

    pub fn cardinality(&self, relationship: &str) -> Option<Cardinality> {
        self.relationship(relationship).map(|r| r.cardinality)
    }

    /// True when the name is an attribute or a relationship of this schema
    pub fn is_known_column(&self, name: &str) -> bool {
        self.attribute(name).is_some() || self.relationship(name).is_some()
    }
}
