//! Record store seam and an in-memory implementation

use crate::node_ref::NodeRef;
use crate::{Error, Result};
use async_trait::async_trait;
use emma_ir::Value;
use indexmap::IndexMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::trace;
use uuid::Uuid;

/// Field values of one record, nulls already removed
pub type Payload = IndexMap<String, Value>;

/// External store that persists records.
///
/// Every call is scoped to a record kind and a branch.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create the record, or update the one it identifies; returns its id
    async fn upsert(&self, kind: &str, branch: &str, payload: &Payload) -> Result<String>;

    /// Resolve a node reference to an id
    async fn lookup(&self, kind: &str, branch: &str, node: &NodeRef) -> Result<String>;

    /// Add peers to a relationship of the record `id`
    async fn add_relationship(
        &self,
        kind: &str,
        branch: &str,
        id: &str,
        relationship: &str,
        peers: &[String],
    ) -> Result<()>;
}

/// A record held by [`MemoryStore`]
#[derive(Debug, Clone, PartialEq)]
pub struct StoredRecord {
    pub id: String,
    pub kind: String,
    pub branch: String,
    pub data: Payload,
    pub relationships: IndexMap<String, Vec<String>>,
}

impl StoredRecord {
    fn name(&self) -> Option<&str> {
        self.data.get("name").and_then(Value::as_str)
    }
}

/// Store kept in memory.
///
/// Records are identified by their `name` field: an upsert with a known
/// name updates that record. HFIDs resolve against `name` with the
/// components joined by `__`.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<Mutex<Vec<StoredRecord>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of a kind on a branch, in creation order
    pub async fn records(&self, kind: &str, branch: &str) -> Vec<StoredRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| r.kind == kind && r.branch == branch)
            .cloned()
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.records.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn upsert(&self, kind: &str, branch: &str, payload: &Payload) -> Result<String> {
        let mut records = self.records.lock().await;
        let name = payload.get("name").and_then(Value::as_str);

        let existing = name.and_then(|name| {
            records
                .iter_mut()
                .find(|r| r.kind == kind && r.branch == branch && r.name() == Some(name))
        });
        if let Some(record) = existing {
            record.data.extend(payload.clone());
            trace!(kind, id = %record.id, "Updated record");
            return Ok(record.id.clone());
        }

        let id = Uuid::new_v4().to_string();
        records.push(StoredRecord {
            id: id.clone(),
            kind: kind.to_string(),
            branch: branch.to_string(),
            data: payload.clone(),
            relationships: IndexMap::new(),
        });
        trace!(kind, %id, "Created record");
        Ok(id)
    }

    async fn lookup(&self, kind: &str, branch: &str, node: &NodeRef) -> Result<String> {
        let records = self.records.lock().await;
        let found = records.iter().find(|r| {
            r.kind == kind
                && r.branch == branch
                && match node {
                    NodeRef::Id(id) => r.id == id.to_string(),
                    NodeRef::Hfid(_) => r.name() == Some(node.to_string().as_str()),
                }
        });
        found
            .map(|r| r.id.clone())
            .ok_or_else(|| Error::store("lookup", kind, format!("no node '{node}'")))
    }

    async fn add_relationship(
        &self,
        kind: &str,
        branch: &str,
        id: &str,
        relationship: &str,
        peers: &[String],
    ) -> Result<()> {
        let mut records = self.records.lock().await;
        let record = records
            .iter_mut()
            .find(|r| r.kind == kind && r.branch == branch && r.id == id)
            .ok_or_else(|| Error::store("add_relationship", kind, format!("no record '{id}'")))?;

        let linked = record.relationships.entry(relationship.to_string()).or_default();
        for peer in peers {
            if !linked.contains(peer) {
                linked.push(peer.clone());
            }
        }
        Ok(())
    }
}
