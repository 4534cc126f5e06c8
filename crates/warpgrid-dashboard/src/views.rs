//! View types for the topology visualization.
//!
//! These types are purpose-built for the renderer: they carry
//! pre-formatted strings and display fallbacks so the client side stays
//! simple. Raw utilization ratios can be NaN or infinite when a node
//! reports no capacity; views expose them as `None` and show "n/a".

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Serialize;
use warpgrid_state::{ClientStatus, NodeStatus};
use warpgrid_topology::{
    AllocationEntry, BlockGroup, ClusterUtilization, ColumnStrategy, Datacenter, GroupSummary,
    HeightScale, NodeEntry, SummaryBlock, Topology,
};

// ── Topology ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct TopologyView {
    pub node_count: usize,
    pub allocation_count: usize,
    pub columns: ColumnStrategy,
    pub utilization: UtilizationView,
    pub datacenters: Vec<DatacenterView>,
}

impl TopologyView {
    pub fn build(topology: &Topology, columns: ColumnStrategy, scale: &HeightScale) -> Self {
        Self {
            node_count: topology.node_count(),
            allocation_count: topology.allocation_count(),
            columns,
            utilization: UtilizationView::from_summary(&ClusterUtilization::from_topology(
                topology,
            )),
            datacenters: topology
                .datacenters
                .iter()
                .map(|dc| DatacenterView::from_datacenter(dc, scale))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UtilizationView {
    pub cpu: ResourceBar,
    pub memory: ResourceBar,
}

impl UtilizationView {
    pub fn from_summary(summary: &ClusterUtilization) -> Self {
        Self {
            cpu: ResourceBar::cpu(summary.reserved_cpu, summary.total_cpu),
            memory: ResourceBar::memory(summary.reserved_memory, summary.total_memory),
        }
    }
}

// ── Datacenter / Node ───────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct DatacenterView {
    pub name: String,
    pub node_count: usize,
    pub allocation_count: usize,
    pub nodes: Vec<NodeView>,
}

impl DatacenterView {
    pub fn from_datacenter(dc: &Datacenter, scale: &HeightScale) -> Self {
        Self {
            name: dc.name.clone(),
            node_count: dc.nodes.len(),
            allocation_count: dc.nodes.iter().map(|n| n.allocations.len()).sum(),
            nodes: dc
                .nodes
                .iter()
                .map(|n| NodeView::from_entry(n, scale))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NodeView {
    pub id: String,
    pub name: String,
    pub status: &'static str,
    pub status_color: &'static str,
    pub draining: bool,
    /// Row height in pixels, scaled by memory capacity.
    pub height: f64,
    pub cpu: ResourceBar,
    pub memory: ResourceBar,
    /// Allocations in drawing order.
    pub allocations: Vec<AllocationView>,
}

impl NodeView {
    pub fn from_entry(entry: &NodeEntry, scale: &HeightScale) -> Self {
        let node = &entry.node;
        let reserved = entry.reserved();
        let (status, status_color) = node_status_display(node.status, node.draining);
        Self {
            id: node.id.clone(),
            name: node.display_name().to_string(),
            status,
            status_color,
            draining: node.draining,
            height: scale.height(node.resources.memory),
            cpu: ResourceBar::cpu(
                reserved.cpu.unwrap_or(0),
                node.resources.cpu.unwrap_or(0),
            ),
            memory: ResourceBar::memory(
                reserved.memory.unwrap_or(0),
                node.resources.memory.unwrap_or(0),
            ),
            allocations: entry
                .drawing_order()
                .into_iter()
                .map(|a| AllocationView::from_entry(a))
                .collect(),
        }
    }
}

// ── Allocation ──────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct AllocationView {
    pub id: String,
    pub node_id: String,
    pub job_id: String,
    pub task_group: String,
    pub status: &'static str,
    pub status_color: &'static str,
    /// `None` when the share is not a finite number.
    pub cpu_percent: Option<f64>,
    pub memory_percent: Option<f64>,
    pub cpu_display: String,
    pub memory_display: String,
}

impl AllocationView {
    pub fn from_entry(entry: &AllocationEntry) -> Self {
        let alloc = &entry.allocation;
        Self {
            id: alloc.id.clone(),
            node_id: alloc.node_id.clone(),
            job_id: alloc.job_id.clone(),
            task_group: alloc.task_group_name.clone(),
            status: alloc.client_status.as_str(),
            status_color: client_status_color(alloc.client_status),
            cpu_percent: finite(entry.cpu_percent),
            memory_percent: finite(entry.memory_percent),
            cpu_display: format_ratio(entry.cpu_percent),
            memory_display: format_ratio(entry.memory_percent),
        }
    }
}

// ── Task Group ──────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct GroupView {
    pub summary: GroupSummary,
    pub allocations: Vec<AllocationView>,
}

impl GroupView {
    pub fn build(summary: GroupSummary, siblings: &[Arc<AllocationEntry>]) -> Self {
        Self {
            summary,
            allocations: siblings
                .iter()
                .map(|a| AllocationView::from_entry(a))
                .collect(),
        }
    }
}

// ── Allocation Blocks ───────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct BlockRowView {
    pub width: f64,
    pub buckets: Vec<BlockBucketView>,
}

#[derive(Debug, Serialize)]
pub struct BlockBucketView {
    pub status: &'static str,
    pub status_color: &'static str,
    pub total: usize,
    pub shown: Vec<AllocationView>,
    pub summary: Option<SummaryBlock>,
}

impl BlockRowView {
    pub fn build(
        width: f64,
        layout: &BTreeMap<ClientStatus, BlockGroup<Arc<AllocationEntry>>>,
    ) -> Self {
        let buckets = layout
            .iter()
            .map(|(status, group)| BlockBucketView {
                status: status.as_str(),
                status_color: client_status_color(*status),
                total: group.total(),
                shown: group
                    .shown
                    .iter()
                    .map(|a| AllocationView::from_entry(a))
                    .collect(),
                summary: group.summary(),
            })
            .collect();
        Self { width, buckets }
    }
}

// ── Resource Bar ────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ResourceBar {
    pub used: u64,
    pub total: u64,
    pub percent: f64,
    pub percent_display: String,
    pub used_display: String,
    pub total_display: String,
    pub bar_color: &'static str,
}

impl ResourceBar {
    /// Memory bar; amounts in MiB.
    pub fn memory(used: u64, total: u64) -> Self {
        Self::new(used, total, format_mib(used), format_mib(total))
    }

    /// CPU bar; amounts in MHz.
    pub fn cpu(used: u64, total: u64) -> Self {
        Self::new(used, total, format_mhz(used), format_mhz(total))
    }

    fn new(used: u64, total: u64, used_display: String, total_display: String) -> Self {
        let percent = if total > 0 {
            (used as f64 / total as f64) * 100.0
        } else {
            0.0
        };
        let bar_color = if percent > 90.0 {
            "bg-grid-danger"
        } else if percent > 70.0 {
            "bg-grid-warn"
        } else {
            "bg-grid-accent"
        };
        Self {
            used,
            total,
            percent,
            percent_display: format!("{:.1}", percent),
            used_display,
            total_display,
            bar_color,
        }
    }
}

// ── Format Helpers ──────────────────────────────────────────────

fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

/// Format a 0..1 ratio as a percentage, "n/a" when unknown.
pub fn format_ratio(ratio: f64) -> String {
    if ratio.is_finite() {
        format!("{:.0}%", ratio * 100.0)
    } else {
        "n/a".to_string()
    }
}

pub fn format_mib(mib: u64) -> String {
    const GIB: u64 = 1024;
    const TIB: u64 = 1024 * GIB;

    if mib >= TIB {
        format!("{:.1} TiB", mib as f64 / TIB as f64)
    } else if mib >= GIB {
        format!("{:.1} GiB", mib as f64 / GIB as f64)
    } else {
        format!("{mib} MiB")
    }
}

pub fn format_mhz(mhz: u64) -> String {
    if mhz >= 1000 {
        format!("{:.1} GHz", mhz as f64 / 1000.0)
    } else {
        format!("{mhz} MHz")
    }
}

pub fn client_status_color(status: ClientStatus) -> &'static str {
    match status {
        ClientStatus::Running => "bg-emerald-400",
        ClientStatus::Pending => "bg-sky-400",
        ClientStatus::Failed => "bg-rose-400",
        ClientStatus::Lost => "bg-amber-400",
        ClientStatus::Unknown => "bg-slate-400",
        ClientStatus::Complete => "bg-slate-500",
    }
}

fn node_status_display(status: NodeStatus, draining: bool) -> (&'static str, &'static str) {
    match (status, draining) {
        (NodeStatus::Ready, true) => ("Draining", "text-amber-400"),
        (NodeStatus::Ready, false) => ("Ready", "text-emerald-400"),
        (NodeStatus::Initializing, _) => ("Initializing", "text-sky-400"),
        (NodeStatus::Down, _) => ("Down", "text-rose-400"),
        (NodeStatus::Disconnected, _) => ("Disconnected", "text-slate-400"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warpgrid_state::{AllocationRecord, NodeRecord, Resources};
    use warpgrid_topology::{ColumnConfig, ScaleConfig, build, compute_column_strategy};

    fn make_node(id: &str, dc: &str, resources: Resources) -> NodeRecord {
        NodeRecord {
            id: id.to_string(),
            name: Some(format!("{id}.example")),
            datacenter: dc.to_string(),
            resources,
            status: NodeStatus::Ready,
            draining: false,
        }
    }

    fn make_alloc(id: &str, node: &str, cpu: u64, memory: u64) -> AllocationRecord {
        AllocationRecord {
            id: id.to_string(),
            node_id: node.to_string(),
            job_id: "api".to_string(),
            task_group_name: "web".to_string(),
            allocated_resources: Resources::new(cpu, memory),
            client_status: ClientStatus::Running,
        }
    }

    #[test]
    fn format_ratio_handles_non_finite() {
        assert_eq!(format_ratio(0.5), "50%");
        assert_eq!(format_ratio(f64::NAN), "n/a");
        assert_eq!(format_ratio(f64::INFINITY), "n/a");
    }

    #[test]
    fn format_units() {
        assert_eq!(format_mib(512), "512 MiB");
        assert_eq!(format_mib(2048), "2.0 GiB");
        assert_eq!(format_mhz(800), "800 MHz");
        assert_eq!(format_mhz(2500), "2.5 GHz");
    }

    #[test]
    fn resource_bar_color_thresholds() {
        assert_eq!(ResourceBar::cpu(95, 100).bar_color, "bg-grid-danger");
        assert_eq!(ResourceBar::cpu(75, 100).bar_color, "bg-grid-warn");
        assert_eq!(ResourceBar::cpu(10, 100).bar_color, "bg-grid-accent");
        assert_eq!(ResourceBar::memory(10, 0).percent, 0.0);
    }

    #[test]
    fn allocation_view_hides_unknown_percent() {
        let nodes = vec![make_node("n0", "dc1", Resources::default())];
        let topology = build(&nodes, &[make_alloc("a0", "n0", 100, 256)]);
        let view = AllocationView::from_entry(&topology.node("n0").unwrap().allocations[0]);

        assert_eq!(view.cpu_percent, None);
        assert_eq!(view.memory_display, "n/a");
    }

    #[test]
    fn topology_view_mirrors_scene() {
        let nodes = vec![
            make_node("n0", "dc1", Resources::new(1000, 1024)),
            make_node("n1", "dc2", Resources::new(1000, 2048)),
        ];
        let allocs = vec![make_alloc("a0", "n0", 500, 512), make_alloc("a1", "n1", 100, 256)];
        let topology = build(&nodes, &allocs);
        let columns = compute_column_strategy(&topology, &ColumnConfig::default());
        let scale = HeightScale::for_topology(&topology, &ScaleConfig::default());

        let view = TopologyView::build(&topology, columns, &scale);

        assert_eq!(view.node_count, 2);
        assert_eq!(view.datacenters.len(), 2);
        assert_eq!(view.datacenters[0].nodes[0].name, "n0.example");
        assert_eq!(view.datacenters[0].nodes[0].cpu.percent_display, "50.0");
        assert_eq!(view.datacenters[0].nodes[0].allocations[0].cpu_display, "50%");
        assert_eq!(view.datacenters[1].nodes[0].height, 40.0);
        assert!(!view.columns.is_single_column);
        assert_eq!(view.utilization.cpu.used, 600);
    }

    #[test]
    fn draining_node_status() {
        assert_eq!(node_status_display(NodeStatus::Ready, true).0, "Draining");
        assert_eq!(node_status_display(NodeStatus::Down, true).0, "Down");
    }
}
