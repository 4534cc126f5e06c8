//! ClusterSnapshot — the materialized node and allocation lists.
//!
//! A snapshot is what the data-fetching layer hands to the dashboard.
//! It is read-only; a refresh produces a new snapshot.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StateError, StateResult};
use crate::types::*;

/// Convert any `Display` error into a `StateError` variant via a closure factory.
macro_rules! map_err {
    ($variant:ident) => {
        |e| StateError::$variant(e.to_string())
    };
}

/// Nodes and allocations observed at one point in time.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ClusterSnapshot {
    pub nodes: Vec<NodeRecord>,
    pub allocations: Vec<AllocationRecord>,
}

impl ClusterSnapshot {
    pub fn new(nodes: Vec<NodeRecord>, allocations: Vec<AllocationRecord>) -> Self {
        Self { nodes, allocations }
    }

    /// Parse a snapshot from a JSON document.
    ///
    /// Both `nodes` and `allocations` must be present and be lists.
    pub fn from_json(json: &str) -> StateResult<Self> {
        let snapshot: ClusterSnapshot =
            serde_json::from_str(json).map_err(map_err!(Deserialize))?;
        debug!(
            nodes = snapshot.nodes.len(),
            allocations = snapshot.allocations.len(),
            "snapshot parsed"
        );
        Ok(snapshot)
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: &Path) -> StateResult<Self> {
        let content = std::fs::read_to_string(path).map_err(map_err!(Read))?;
        let snapshot = Self::from_json(&content)?;
        debug!(?path, "snapshot loaded");
        Ok(snapshot)
    }

    /// Write the snapshot as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> StateResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(map_err!(Serialize))?;
        std::fs::write(path, json).map_err(map_err!(Write))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "nodes": [
            {"id": "node-0", "datacenter": "dc1", "resources": {"cpu": 100, "memory": 250}},
            {"id": "node-1", "datacenter": "dc2"}
        ],
        "allocations": [
            {
                "id": "alloc-0",
                "node_id": "node-0",
                "job_id": "job0",
                "task_group_name": "one",
                "allocated_resources": {"cpu": 50, "memory": 25},
                "client_status": "running"
            }
        ]
    }"#;

    #[test]
    fn parses_sample_snapshot() {
        let snapshot = ClusterSnapshot::from_json(SAMPLE).unwrap();

        assert_eq!(snapshot.nodes.len(), 2);
        assert_eq!(snapshot.allocations.len(), 1);
        assert_eq!(snapshot.nodes[0].resources, Resources::new(100, 250));
        assert_eq!(snapshot.nodes[1].resources.cpu, None);
        assert_eq!(snapshot.allocations[0].client_status, ClientStatus::Running);
    }

    #[test]
    fn rejects_non_list_nodes() {
        let json = r#"{"nodes": {"id": "node-0"}, "allocations": []}"#;
        let err = ClusterSnapshot::from_json(json).unwrap_err();
        assert!(matches!(err, StateError::Deserialize(_)));
    }

    #[test]
    fn rejects_null_allocations() {
        let json = r#"{"nodes": [], "allocations": null}"#;
        assert!(ClusterSnapshot::from_json(json).is_err());
    }

    #[test]
    fn rejects_allocation_without_node_reference() {
        let json = r#"{
            "nodes": [],
            "allocations": [{"id": "a", "job_id": "j", "task_group_name": "g", "client_status": "running"}]
        }"#;
        assert!(ClusterSnapshot::from_json(json).is_err());
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");

        let snapshot = ClusterSnapshot::from_json(SAMPLE).unwrap();
        snapshot.write_to(&path).unwrap();

        let loaded = ClusterSnapshot::from_file(&path).unwrap();
        assert_eq!(loaded, snapshot);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ClusterSnapshot::from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StateError::Read(_)));
    }
}
