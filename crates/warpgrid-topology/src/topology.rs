//! Topology — the hierarchical scene model of a cluster.
//!
//! Groups nodes by datacenter and allocations by node, computing each
//! allocation's utilization once at build time. A secondary index keyed
//! by `(job_id, task_group_name)` gives constant-time access to all
//! allocations of a task group, wherever they run.
//!
//! A `Topology` is a snapshot. When the inputs change, build a new one.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use warpgrid_state::{AllocationRecord, ClusterSnapshot, NodeId, NodeRecord, Resources};

use crate::utilization::percent_of;

/// Identity of a task group across the cluster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupKey {
    pub job_id: String,
    pub task_group_name: String,
}

impl GroupKey {
    pub fn new(job_id: impl Into<String>, task_group_name: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            task_group_name: task_group_name.into(),
        }
    }

    pub fn of(allocation: &AllocationRecord) -> Self {
        Self::new(&allocation.job_id, &allocation.task_group_name)
    }
}

impl std::fmt::Display for GroupKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.job_id, self.task_group_name)
    }
}

/// An allocation placed in the scene, with its share of the node.
#[derive(Debug, Clone, PartialEq)]
pub struct AllocationEntry {
    pub allocation: AllocationRecord,
    /// Allocated CPU over node CPU capacity. NaN/inf when unknown.
    pub cpu_percent: f64,
    /// Allocated memory over node memory capacity. NaN/inf when unknown.
    pub memory_percent: f64,
}

impl AllocationEntry {
    fn new(allocation: AllocationRecord, capacity: &Resources) -> Self {
        let cpu_percent = percent_of(allocation.allocated_resources.cpu, capacity.cpu);
        let memory_percent = percent_of(allocation.allocated_resources.memory, capacity.memory);
        Self {
            allocation,
            cpu_percent,
            memory_percent,
        }
    }

    pub fn key(&self) -> GroupKey {
        GroupKey::of(&self.allocation)
    }

    pub fn node_id(&self) -> &str {
        &self.allocation.node_id
    }

    /// Gap between the memory and CPU shares.
    pub fn drift(&self) -> f64 {
        (self.memory_percent - self.cpu_percent).abs()
    }
}

/// A node and the allocations bound to it, in input order.
#[derive(Debug, Clone)]
pub struct NodeEntry {
    pub node: NodeRecord,
    pub allocations: Vec<Arc<AllocationEntry>>,
}

impl NodeEntry {
    fn new(node: NodeRecord) -> Self {
        Self {
            node,
            allocations: Vec::new(),
        }
    }

    /// Allocations ordered for drawing: smallest CPU/memory drift first,
    /// so an allocation's CPU and memory bars stay aligned. Unknown
    /// drift sorts last; ties keep input order.
    pub fn drawing_order(&self) -> Vec<&Arc<AllocationEntry>> {
        let mut ordered: Vec<&Arc<AllocationEntry>> = self.allocations.iter().collect();
        ordered.sort_by(|a, b| a.drift().total_cmp(&b.drift()));
        ordered
    }

    /// Resources held by the node's scheduled allocations.
    pub fn reserved(&self) -> Resources {
        let scheduled = self
            .allocations
            .iter()
            .filter(|a| a.allocation.is_scheduled());
        let (cpu, memory) = scheduled.fold((0u64, 0u64), |(cpu, mem), a| {
            let res = &a.allocation.allocated_resources;
            (
                cpu.saturating_add(res.cpu.unwrap_or(0)),
                mem.saturating_add(res.memory.unwrap_or(0)),
            )
        });
        Resources::new(cpu, memory)
    }
}

/// A named group of nodes, in input order.
#[derive(Debug, Clone)]
pub struct Datacenter {
    pub name: String,
    pub nodes: Vec<NodeEntry>,
}

/// Scene model: datacenters → nodes → allocations, plus the task-group index.
#[derive(Debug, Clone, Default)]
pub struct Topology {
    /// Datacenters in first-seen order of the node list.
    pub datacenters: Vec<Datacenter>,
    /// Allocations by task group, in input order within each bucket.
    pub allocation_index: HashMap<GroupKey, Vec<Arc<AllocationEntry>>>,
    /// Node id → (datacenter position, node position).
    node_index: HashMap<NodeId, (usize, usize)>,
}

impl Topology {
    /// Build a topology from a snapshot. See [`build`].
    pub fn from_snapshot(snapshot: &ClusterSnapshot) -> Self {
        build(&snapshot.nodes, &snapshot.allocations)
    }

    pub fn node_count(&self) -> usize {
        self.datacenters.iter().map(|dc| dc.nodes.len()).sum()
    }

    /// Number of allocations placed on a known node.
    pub fn allocation_count(&self) -> usize {
        self.nodes().map(|n| n.allocations.len()).sum()
    }

    /// Node count per datacenter, in datacenter order.
    pub fn node_counts(&self) -> Vec<usize> {
        self.datacenters.iter().map(|dc| dc.nodes.len()).collect()
    }

    /// All node entries, datacenter by datacenter.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeEntry> {
        self.datacenters.iter().flat_map(|dc| dc.nodes.iter())
    }

    /// All placed allocations, node by node.
    pub fn allocations(&self) -> impl Iterator<Item = &Arc<AllocationEntry>> {
        self.nodes().flat_map(|n| n.allocations.iter())
    }

    /// Look up a node entry by id.
    pub fn node(&self, id: &str) -> Option<&NodeEntry> {
        let &(dc, node) = self.node_index.get(id)?;
        self.datacenters.get(dc)?.nodes.get(node)
    }

    /// Every allocation of the given task group; empty when unknown.
    pub fn siblings(&self, key: &GroupKey) -> &[Arc<AllocationEntry>] {
        self.allocation_index
            .get(key)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Build the scene model from flat node and allocation lists.
///
/// One pass over each input. Allocations whose `node_id` matches no node
/// are dropped from both the node lists and the index. If a node id
/// appears twice, both nodes are kept and allocations bind to the first.
pub fn build(nodes: &[NodeRecord], allocations: &[AllocationRecord]) -> Topology {
    let mut datacenters: Vec<Datacenter> = Vec::new();
    let mut dc_positions: HashMap<&str, usize> = HashMap::new();
    let mut node_positions: HashMap<&str, (usize, usize)> = HashMap::with_capacity(nodes.len());

    for node in nodes {
        let dc_idx = *dc_positions
            .entry(node.datacenter.as_str())
            .or_insert_with(|| {
                datacenters.push(Datacenter {
                    name: node.datacenter.clone(),
                    nodes: Vec::new(),
                });
                datacenters.len() - 1
            });

        let dc = &mut datacenters[dc_idx];
        dc.nodes.push(NodeEntry::new(node.clone()));
        let position = (dc_idx, dc.nodes.len() - 1);

        match node_positions.entry(node.id.as_str()) {
            Entry::Vacant(slot) => {
                slot.insert(position);
            }
            Entry::Occupied(_) => {
                warn!(node = %node.id, "duplicate node id in snapshot");
            }
        }
    }

    let mut allocation_index: HashMap<GroupKey, Vec<Arc<AllocationEntry>>> = HashMap::new();
    let mut dropped = 0usize;

    for allocation in allocations {
        let Some(&(dc_idx, node_idx)) = node_positions.get(allocation.node_id.as_str()) else {
            dropped += 1;
            continue;
        };

        let node_entry = &mut datacenters[dc_idx].nodes[node_idx];
        let entry = Arc::new(AllocationEntry::new(
            allocation.clone(),
            &node_entry.node.resources,
        ));
        node_entry.allocations.push(Arc::clone(&entry));
        allocation_index.entry(entry.key()).or_default().push(entry);
    }

    debug!(
        datacenters = datacenters.len(),
        nodes = nodes.len(),
        allocations = allocations.len() - dropped,
        dropped,
        groups = allocation_index.len(),
        "topology built"
    );

    let node_index = node_positions
        .into_iter()
        .map(|(id, position)| (id.to_string(), position))
        .collect();

    Topology {
        datacenters,
        allocation_index,
        node_index,
    }
}
