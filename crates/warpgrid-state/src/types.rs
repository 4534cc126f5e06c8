//! Domain types for WarpGrid cluster snapshots.
//!
//! These types mirror what the cluster API reports for nodes and
//! allocations. They are plain data: no derived values, no back
//! references. All types are serializable to/from JSON.

use serde::{Deserialize, Serialize};

/// Unique identifier for a node in the cluster.
pub type NodeId = String;

/// Unique identifier for an allocation.
pub type AllocationId = String;

/// Identifier of the job an allocation belongs to.
pub type JobId = String;

// ── Resources ─────────────────────────────────────────────────────

/// CPU (MHz) and memory (MiB) amounts.
///
/// Either field may be absent: nodes running an old agent report no
/// capacity, and some allocations report no allocated resources.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Resources {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<u64>,
}

impl Resources {
    pub fn new(cpu: u64, memory: u64) -> Self {
        Self {
            cpu: Some(cpu),
            memory: Some(memory),
        }
    }
}

// ── Node ──────────────────────────────────────────────────────────

/// A worker node as reported by the cluster.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeRecord {
    pub id: NodeId,
    /// Human-readable name; falls back to the id when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub datacenter: String,
    /// Total schedulable capacity.
    #[serde(default)]
    pub resources: Resources,
    #[serde(default)]
    pub status: NodeStatus,
    /// Whether the node is draining its allocations.
    #[serde(default)]
    pub draining: bool,
}

impl NodeRecord {
    /// Name to show for this node.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Client status of a node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeStatus {
    #[default]
    Ready,
    Initializing,
    Down,
    Disconnected,
}

// ── Allocation ────────────────────────────────────────────────────

/// A scheduled instance of a job's task group, bound to a node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AllocationRecord {
    pub id: AllocationId,
    /// Node this allocation runs on. May reference a node that is not
    /// part of the snapshot.
    pub node_id: NodeId,
    pub job_id: JobId,
    pub task_group_name: String,
    #[serde(default)]
    pub allocated_resources: Resources,
    pub client_status: ClientStatus,
}

impl AllocationRecord {
    /// Pending and running allocations hold resources on their node.
    pub fn is_scheduled(&self) -> bool {
        self.client_status.is_scheduled()
    }
}

/// Client-side lifecycle status of an allocation.
///
/// Variant order is the order status buckets are displayed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Running,
    Pending,
    Failed,
    Lost,
    Unknown,
    Complete,
}

impl ClientStatus {
    /// All statuses in display order.
    pub const ALL: [ClientStatus; 6] = [
        ClientStatus::Running,
        ClientStatus::Pending,
        ClientStatus::Failed,
        ClientStatus::Lost,
        ClientStatus::Unknown,
        ClientStatus::Complete,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Running => "running",
            ClientStatus::Pending => "pending",
            ClientStatus::Failed => "failed",
            ClientStatus::Lost => "lost",
            ClientStatus::Unknown => "unknown",
            ClientStatus::Complete => "complete",
        }
    }

    pub fn is_scheduled(&self) -> bool {
        matches!(self, ClientStatus::Running | ClientStatus::Pending)
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
