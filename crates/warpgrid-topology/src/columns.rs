//! Column strategy — how datacenters are arranged in the cluster view.
//!
//! Side-by-side datacenter columns look balanced only when datacenters
//! are of similar size. When node counts are skewed (coefficient of
//! variation above `skew_threshold`), the datacenters stack in a single
//! column instead.
//!
//! Within a datacenter, nodes render in one internal column unless the
//! datacenters are stacked and the cluster is large enough that two
//! columns of nodes are needed for density:
//!
//! ```text
//! is_single_column            = datacenters <= 1 || cv(node counts) > skew_threshold
//! datacenter_is_single_column = !is_single_column || total nodes <= dense_node_threshold
//! ```

use serde::Serialize;
use tracing::debug;

use crate::config::ColumnConfig;
use crate::stats::coefficient_of_variation;
use crate::topology::Topology;

/// Column layout flags for the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnStrategy {
    /// Datacenters stack vertically in one column.
    pub is_single_column: bool,
    /// Nodes inside each datacenter render in one column.
    pub datacenter_is_single_column: bool,
}

impl ColumnStrategy {
    /// Decide the strategy from node counts per datacenter.
    pub fn from_counts(node_counts: &[usize], config: &ColumnConfig) -> Self {
        let is_single_column = if node_counts.len() <= 1 {
            true
        } else {
            let counts: Vec<f64> = node_counts.iter().map(|&c| c as f64).collect();
            // An all-empty set has no meaningful skew; treat it as balanced.
            coefficient_of_variation(&counts).is_some_and(|cv| cv > config.skew_threshold)
        };

        let total: usize = node_counts.iter().sum();
        let datacenter_is_single_column =
            !is_single_column || total <= config.dense_node_threshold;

        Self {
            is_single_column,
            datacenter_is_single_column,
        }
    }
}

/// Compute the column strategy for a built topology.
pub fn compute_column_strategy(topology: &Topology, config: &ColumnConfig) -> ColumnStrategy {
    let counts = topology.node_counts();
    let strategy = ColumnStrategy::from_counts(&counts, config);
    debug!(
        datacenters = counts.len(),
        nodes = counts.iter().sum::<usize>(),
        single_column = strategy.is_single_column,
        datacenter_single_column = strategy.datacenter_is_single_column,
        "column strategy computed"
    );
    strategy
}
