//! warpgrid-dashboard — cluster topology views for WarpGrid.
//!
//! Provides axum route handlers that serve the topology scene model as
//! JSON for the dashboard's cluster visualization. The renderer paints
//! these views; nothing here draws.
//!
//! # Routes
//!
//! | Route | Handler |
//! |---|---|
//! | `/topology` | Datacenters, nodes, allocations, column strategy |
//! | `/topology/groups/{job}/{group}` | Placement of one task group |
//! | `/topology/blocks?width=<px>` | Per-status allocation blocks for a row width |

pub mod pages;
pub mod views;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use tokio::sync::RwLock;
use tracing::info;
use warpgrid_state::ClusterSnapshot;
use warpgrid_topology::{LayoutConfig, Topology};

/// Shared state for dashboard handlers.
///
/// Holds the topology of the latest snapshot. A new snapshot replaces
/// the topology wholesale; handlers never mutate it.
#[derive(Clone)]
pub struct DashboardState {
    pub topology: Arc<RwLock<Arc<Topology>>>,
    pub config: Arc<LayoutConfig>,
}

impl DashboardState {
    pub fn new(snapshot: &ClusterSnapshot, config: LayoutConfig) -> Self {
        Self {
            topology: Arc::new(RwLock::new(Arc::new(Topology::from_snapshot(snapshot)))),
            config: Arc::new(config),
        }
    }

    /// Rebuild the topology from a fresh snapshot.
    pub async fn replace_snapshot(&self, snapshot: &ClusterSnapshot) {
        let topology = Arc::new(Topology::from_snapshot(snapshot));
        info!(
            nodes = topology.node_count(),
            allocations = topology.allocation_count(),
            "topology replaced"
        );
        *self.topology.write().await = topology;
    }

    /// The current topology.
    pub async fn current(&self) -> Arc<Topology> {
        Arc::clone(&*self.topology.read().await)
    }
}

/// Build the dashboard router.
pub fn dashboard_router(state: DashboardState) -> Router {
    Router::new()
        .route("/topology", get(pages::topology))
        .route("/topology/groups/{job}/{group}", get(pages::task_group))
        .route("/topology/blocks", get(pages::allocation_blocks))
        .with_state(state)
}
