//! Cluster and task-group summaries for the topology info panel.

use serde::Serialize;
use warpgrid_state::NodeId;

use crate::topology::{GroupKey, Topology};

/// Capacity across all nodes vs. resources held by scheduled allocations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterUtilization {
    pub total_cpu: u64,
    pub total_memory: u64,
    pub reserved_cpu: u64,
    pub reserved_memory: u64,
    /// `reserved_cpu / total_cpu`, or 0 when either is zero.
    pub reserved_cpu_percent: f64,
    /// `reserved_memory / total_memory`, or 0 when either is zero.
    pub reserved_memory_percent: f64,
}

impl ClusterUtilization {
    pub fn from_topology(topology: &Topology) -> Self {
        let (total_cpu, total_memory) = topology.nodes().fold((0u64, 0u64), |(cpu, mem), n| {
            let res = &n.node.resources;
            (
                cpu.saturating_add(res.cpu.unwrap_or(0)),
                mem.saturating_add(res.memory.unwrap_or(0)),
            )
        });
        let (reserved_cpu, reserved_memory) =
            topology.nodes().fold((0u64, 0u64), |(cpu, mem), n| {
                let reserved = n.reserved();
                (
                    cpu.saturating_add(reserved.cpu.unwrap_or(0)),
                    mem.saturating_add(reserved.memory.unwrap_or(0)),
                )
            });

        Self {
            total_cpu,
            total_memory,
            reserved_cpu,
            reserved_memory,
            reserved_cpu_percent: ratio(reserved_cpu, total_cpu),
            reserved_memory_percent: ratio(reserved_memory, total_memory),
        }
    }
}

fn ratio(part: u64, whole: u64) -> f64 {
    if part == 0 || whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

/// Where a task group's allocations are placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary {
    pub key: GroupKey,
    pub allocation_count: usize,
    /// Distinct nodes, in first-seen order of the group's allocations.
    pub node_ids: Vec<NodeId>,
    /// Distinct datacenters, in first-seen order of the group's allocations.
    pub datacenters: Vec<String>,
}

impl GroupSummary {
    /// Summarize a task group. `None` when no allocation of the group
    /// was placed on a known node.
    pub fn for_group(topology: &Topology, key: &GroupKey) -> Option<Self> {
        let siblings = topology.siblings(key);
        if siblings.is_empty() {
            return None;
        }

        let mut node_ids: Vec<NodeId> = Vec::new();
        let mut datacenters: Vec<String> = Vec::new();
        for entry in siblings {
            let node_id = entry.node_id();
            if node_ids.iter().any(|id| id == node_id) {
                continue;
            }
            node_ids.push(node_id.to_string());
            let Some(node) = topology.node(node_id) else {
                continue;
            };
            if !datacenters.contains(&node.node.datacenter) {
                datacenters.push(node.node.datacenter.clone());
            }
        }

        Some(Self {
            key: key.clone(),
            allocation_count: siblings.len(),
            node_ids,
            datacenters,
        })
    }
}
