//! Schema loader for Infrahub schema documents

use crate::model::{AttributeDefinition, Cardinality, RelationshipDefinition, Schema};
use crate::registry::SchemaRegistry;
use crate::{Error, Result};
use emma_ir::Value;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

/// Serializable schema document format
#[derive(Debug, Deserialize)]
struct SchemaDocument {
    #[serde(default)]
    nodes: Vec<NodeFile>,
    #[serde(default)]
    generics: Vec<serde_yaml::Value>,
}

#[derive(Debug, Deserialize)]
struct NodeFile {
    name: String,
    #[serde(default)]
    namespace: String,
    /// Explicit kind; otherwise namespace followed by name
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    attributes: Vec<AttributeFile>,
    #[serde(default)]
    relationships: Vec<RelationshipFile>,
}

#[derive(Debug, Deserialize)]
struct AttributeFile {
    name: String,
    #[serde(default = "default_attribute_kind")]
    kind: String,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    default_value: Option<Value>,
    #[serde(default)]
    choices: Vec<ChoiceFile>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ChoiceFile {
    Named { name: Option<String> },
    Plain(String),
}

#[derive(Debug, Deserialize)]
struct RelationshipFile {
    name: String,
    peer: String,
    #[serde(default)]
    cardinality: Cardinality,
    #[serde(default = "default_relationship_optional")]
    optional: bool,
}

fn default_attribute_kind() -> String {
    "Text".to_string()
}

fn default_relationship_optional() -> bool {
    true
}

/// Loads schema documents from strings, files or search paths
#[derive(Debug, Clone, Default)]
pub struct SchemaLoader {
    schema_paths: Vec<PathBuf>,
}

impl SchemaLoader {
    /// Create a new schema loader with the given search paths
    pub fn new(schema_paths: Vec<PathBuf>) -> Self {
        Self { schema_paths }
    }

    /// Add a search path
    pub fn add_path(&mut self, path: PathBuf) {
        self.schema_paths.push(path);
    }

    /// Load every schema from a file; YAML for `.yaml`/`.yml`, JSON otherwise
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be read or is not a valid
    /// schema document.
    pub fn load_from_file(&self, path: &Path) -> Result<Vec<Schema>> {
        trace!("Loading schema from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;

        if path
            .extension()
            .is_some_and(|e| e == "yaml" || e == "yml")
        {
            self.load_from_yaml(&content)
        } else {
            self.load_from_json(&content)
        }
    }

    /// Load schemas from a JSON document
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for malformed documents.
    pub fn load_from_json(&self, json: &str) -> Result<Vec<Schema>> {
        let document: SchemaDocument = serde_json::from_str(json)
            .map_err(|e| Error::InvalidFormat(format!("JSON parse error: {e}")))?;

        convert_document(document)
    }

    /// Load schemas from a YAML document
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for malformed documents.
    pub fn load_from_yaml(&self, yaml: &str) -> Result<Vec<Schema>> {
        let document: SchemaDocument = serde_yaml::from_str(yaml)
            .map_err(|e| Error::InvalidFormat(format!("YAML parse error: {e}")))?;

        convert_document(document)
    }

    /// Load a file into a registry keyed by kind
    ///
    /// # Errors
    ///
    /// Same as [`SchemaLoader::load_from_file`].
    pub fn load_registry_from_file(&self, path: &Path) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();
        for schema in self.load_from_file(path)? {
            registry.register(schema);
        }
        Ok(registry)
    }

    /// Load every schema document found in the search paths
    ///
    /// # Errors
    ///
    /// Returns an error when a directory cannot be listed or a document in
    /// it is invalid.
    pub fn load_all(&self) -> Result<SchemaRegistry> {
        let mut registry = SchemaRegistry::new();

        for dir in &self.schema_paths {
            let mut files: Vec<PathBuf> = std::fs::read_dir(dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| {
                    p.extension()
                        .is_some_and(|e| e == "json" || e == "yaml" || e == "yml")
                })
                .collect();
            files.sort();

            for file in files {
                for schema in self.load_from_file(&file)? {
                    debug!(kind = schema.kind(), file = %file.display(), "Registered schema");
                    registry.register(schema);
                }
            }
        }

        info!("Loaded {} schema(s)", registry.len());
        Ok(registry)
    }

    /// Load the schema of one kind from the search paths
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when no document declares the kind.
    pub fn load(&self, kind: &str) -> Result<Schema> {
        let registry = self.load_all()?;
        registry.get(kind).cloned().ok_or_else(|| {
            Error::NotFound(format!(
                "Schema {kind} not found in search paths: {:?}",
                self.schema_paths
            ))
        })
    }
}

fn convert_document(document: SchemaDocument) -> Result<Vec<Schema>> {
    if !document.generics.is_empty() {
        debug!("Ignoring {} generic schema(s)", document.generics.len());
    }

    let mut seen = HashSet::new();
    let mut schemas = Vec::with_capacity(document.nodes.len());
    for node in document.nodes {
        let schema = convert_node(node)?;
        if !seen.insert(schema.kind().to_string()) {
            return Err(Error::InvalidFormat(format!(
                "Duplicate schema kind: {}",
                schema.kind()
            )));
        }
        schemas.push(schema);
    }
    Ok(schemas)
}

fn convert_node(node: NodeFile) -> Result<Schema> {
    let kind = node
        .kind
        .unwrap_or_else(|| format!("{}{}", node.namespace, node.name));
    if kind.is_empty() {
        return Err(Error::InvalidFormat("Schema node without a name".to_string()));
    }

    let attributes = node
        .attributes
        .into_iter()
        .map(|a| AttributeDefinition {
            name: a.name,
            kind: a.kind,
            optional: a.optional,
            default_value: a.default_value.filter(|v| !v.is_null()),
            choices: a
                .choices
                .into_iter()
                .filter_map(|c| match c {
                    ChoiceFile::Named { name } => name,
                    ChoiceFile::Plain(name) => Some(name),
                })
                .collect(),
        })
        .collect();

    let relationships = node
        .relationships
        .into_iter()
        .map(|r| RelationshipDefinition {
            name: r.name,
            peer: r.peer,
            cardinality: r.cardinality,
            optional: r.optional,
        })
        .collect();

    trace!("Converted schema node: {}", kind);
    Ok(Schema::new(kind, attributes, relationships))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VLAN_YAML: &str = r#"
version: "1.0"
nodes:
  - name: Vlan
    namespace: Infra
    attributes:
      - name: name
        kind: Text
      - name: vlan_id
        kind: Number
      - name: description
        optional: true
      - name: status
        kind: Dropdown
        default_value: active
        choices:
          - name: active
          - name: provisioning
          - name: null
    relationships:
      - name: site
        peer: LocationSite
        cardinality: one
        optional: false
      - name: tags
        peer: BuiltinTag
"#;

    #[test]
    fn test_load_from_yaml() {
        let schemas = SchemaLoader::default().load_from_yaml(VLAN_YAML).unwrap();
        assert_eq!(schemas.len(), 1);

        let vlan = &schemas[0];
        assert_eq!(vlan.kind(), "InfraVlan");
        assert_eq!(vlan.mandatory_names(), ["name", "vlan_id", "site"]);
        assert_eq!(vlan.choices("status").unwrap(), ["active", "provisioning"]);
        assert_eq!(vlan.attribute("status").unwrap().default_value, Some(Value::from("active")));
        assert_eq!(vlan.attribute("description").unwrap().kind, "Text");
        assert_eq!(vlan.cardinality("tags"), Some(Cardinality::Many));
        assert!(vlan.relationship("tags").unwrap().optional);
    }

    #[test]
    fn test_load_from_json_with_explicit_kind() {
        let json = r#"{
            "nodes": [
                {"name": "Device", "namespace": "Infra", "kind": "InfraDevice",
                 "attributes": [{"name": "name", "kind": "Text", "optional": false},
                                {"name": "mtu", "kind": "Number", "optional": false, "default_value": 1500},
                                {"name": "role", "kind": "Dropdown", "choices": ["core", "edge"]}]}
            ],
            "generics": [{"name": "Interface", "namespace": "Infra"}]
        }"#;

        let schemas = SchemaLoader::default().load_from_json(json).unwrap();
        let device = &schemas[0];

        assert_eq!(device.kind(), "InfraDevice");
        assert_eq!(device.mandatory_names(), ["name", "role"]);
        assert_eq!(device.choices("role").unwrap(), ["core", "edge"]);
    }

    #[test]
    fn test_load_invalid_documents() {
        let loader = SchemaLoader::default();

        assert!(matches!(loader.load_from_json("{not json"), Err(Error::InvalidFormat(_))));
        assert!(matches!(
            loader.load_from_yaml("nodes:\n  - name: [1, 2]\n"),
            Err(Error::InvalidFormat(_))
        ));

        let duplicate = "nodes:\n  - {name: Vlan, namespace: Infra}\n  - {name: Vlan, namespace: Infra}\n";
        let err = loader.load_from_yaml(duplicate).unwrap_err();
        assert!(err.to_string().contains("InfraVlan"));
    }

    #[test]
    fn test_load_from_missing_file() {
        let err = SchemaLoader::default()
            .load_from_file(Path::new("/nonexistent/schema.yaml"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
