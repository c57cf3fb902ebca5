//! Upload of record sets to the external store

use crate::node_ref::NodeRef;
use crate::store::RecordStore;
use emma_ir::RecordSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, info, warn};

/// Where uploaded records are linked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadOptions {
    /// Kind of the owning node (default: `InfraDevice`)
    pub owner_kind: String,
    /// Relationship of the record that points at its owner (default: `in_config`)
    pub relationship: String,
    /// Branch records are written to (default: `main`)
    pub branch: String,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            owner_kind: "InfraDevice".to_string(),
            relationship: "in_config".to_string(),
            branch: "main".to_string(),
        }
    }
}

impl UploadOptions {
    #[must_use]
    pub fn with_owner_kind(mut self, kind: impl Into<String>) -> Self {
        self.owner_kind = kind.into();
        self
    }

    #[must_use]
    pub fn with_relationship(mut self, relationship: impl Into<String>) -> Self {
        self.relationship = relationship.into();
        self
    }

    #[must_use]
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }
}

/// Step of a row upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStage {
    Payload,
    Upsert,
    Lookup,
    Link,
}

impl fmt::Display for UploadStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Payload => "payload",
            Self::Upsert => "upsert",
            Self::Lookup => "lookup",
            Self::Link => "link",
        };
        f.write_str(label)
    }
}

/// A row that did not make it into the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowFailure {
    /// Zero-based row index
    pub row: usize,
    pub stage: UploadStage,
    pub message: String,
}

/// Outcome of one upload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct UploadReport {
    /// Rows processed
    pub attempted: usize,
    /// Rows stored and linked to their owner
    pub created: usize,
    pub failures: Vec<RowFailure>,
}

impl UploadReport {
    /// Number of rows that failed
    pub fn error_count(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Add another report's counts and failures
    pub fn merge(&mut self, other: UploadReport) {
        self.attempted += other.attempted;
        self.created += other.created;
        self.failures.extend(other.failures);
    }
}

/// Writes record sets row by row.
///
/// Each row is stripped of nulls, upserted, then linked to the owning
/// node. A failing row is recorded and the next row is processed.
#[derive(Debug)]
pub struct UploadCoordinator<'a, S: RecordStore + ?Sized> {
    store: &'a S,
    options: UploadOptions,
}

impl<'a, S: RecordStore + ?Sized> UploadCoordinator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            options: UploadOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: UploadOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &UploadOptions {
        &self.options
    }

    /// Upload every row as a `kind` record owned by `owner`
    pub async fn upload(&self, records: &RecordSet, kind: &str, owner: &str) -> UploadReport {
        let owner_ref = NodeRef::parse(owner);
        let mut report = UploadReport::default();
        info!(kind, owner, rows = records.len(), branch = %self.options.branch, "Uploading records");

        for row in 0..records.len() {
            report.attempted += 1;
            match self.upload_row(records, row, kind, &owner_ref).await {
                Ok(id) => {
                    debug!(row, %id, "Uploaded row");
                    report.created += 1;
                }
                Err((stage, message)) => {
                    warn!(row, %stage, error = %message, "Failed to upload row");
                    report.failures.push(RowFailure { row, stage, message });
                }
            }
        }

        info!(
            kind,
            owner,
            created = report.created,
            errors = report.error_count(),
            "Finished upload"
        );
        report
    }

    async fn upload_row(
        &self,
        records: &RecordSet,
        row: usize,
        kind: &str,
        owner: &NodeRef,
    ) -> std::result::Result<String, (UploadStage, String)> {
        let branch = self.options.branch.as_str();
        let payload = records
            .row_values(row)
            .map_err(|e| (UploadStage::Payload, e.to_string()))?;
        let id = self
            .store
            .upsert(kind, branch, &payload)
            .await
            .map_err(|e| (UploadStage::Upsert, e.to_string()))?;
        let owner_id = self
            .store
            .lookup(&self.options.owner_kind, branch, owner)
            .await
            .map_err(|e| (UploadStage::Lookup, e.to_string()))?;
        self.store
            .add_relationship(kind, branch, &id, &self.options.relationship, &[owner_id])
            .await
            .map_err(|e| (UploadStage::Link, e.to_string()))?;
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use emma_ir::Value;
    use indexmap::IndexMap;

    async fn store_with_device(name: &str) -> MemoryStore {
        let store = MemoryStore::new();
        let device = IndexMap::from([("name".to_string(), Value::from(name))]);
        store.upsert("InfraDevice", "main", &device).await.unwrap();
        store
    }

    fn vlans() -> RecordSet {
        let mut records = RecordSet::new(["name", "vlan_id", "description"]);
        records
            .push_row(vec![Value::from("users"), Value::from(10_i64), Value::Null])
            .unwrap();
        records
            .push_row(vec![Value::from("voice"), Value::from(20_i64), Value::from("phones")])
            .unwrap();
        records
    }

    #[tokio::test]
    async fn test_rows_are_stored_and_linked() {
        let store = store_with_device("r1").await;
        let report = UploadCoordinator::new(&store).upload(&vlans(), "InfraVlan", "r1").await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.created, 2);
        assert!(report.is_success());

        let device_id = store.records("InfraDevice", "main").await[0].id.clone();
        let stored = store.records("InfraVlan", "main").await;
        assert!(!stored[0].data.contains_key("description"));
        assert_eq!(stored[1].relationships["in_config"], [device_id]);
    }

    #[tokio::test]
    async fn test_unknown_owner_fails_every_row() {
        let store = store_with_device("r1").await;
        let report = UploadCoordinator::new(&store).upload(&vlans(), "InfraVlan", "r2").await;

        assert_eq!(report.attempted, 2);
        assert_eq!(report.error_count(), 2);
        assert!(report.failures.iter().all(|f| f.stage == UploadStage::Lookup));
    }

    #[tokio::test]
    async fn test_custom_options() {
        let store = MemoryStore::new();
        let owner = IndexMap::from([("name".to_string(), Value::from("dc1"))]);
        store.upsert("LocationSite", "lab", &owner).await.unwrap();

        let options = UploadOptions::default()
            .with_owner_kind("LocationSite")
            .with_relationship("site")
            .with_branch("lab");
        let report = UploadCoordinator::new(&store)
            .with_options(options)
            .upload(&vlans(), "InfraVlan", "dc1")
            .await;

        assert!(report.is_success());
        let stored = store.records("InfraVlan", "lab").await;
        assert!(stored.iter().all(|r| r.relationships.contains_key("site")));
    }

    #[test]
    fn test_merge_reports() {
        let mut total = UploadReport {
            attempted: 2,
            created: 2,
            failures: Vec::new(),
        };
        total.merge(UploadReport {
            attempted: 3,
            created: 1,
            failures: vec![
                RowFailure {
                    row: 0,
                    stage: UploadStage::Upsert,
                    message: "rejected".to_string(),
                },
                RowFailure {
                    row: 2,
                    stage: UploadStage::Link,
                    message: "rejected".to_string(),
                },
            ],
        });

        assert_eq!(total.attempted, 5);
        assert_eq!(total.created, 3);
        assert_eq!(total.error_count(), 2);
    }
}
