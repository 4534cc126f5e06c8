//! WarpGrid cluster topology — the layout engine behind the dashboard's
//! cluster view.
//!
//! This crate turns a flat [`ClusterSnapshot`](warpgrid_state::ClusterSnapshot)
//! into a scene model the renderer can paint, and decides how that scene
//! is laid out. It does NOT render anything and does NOT fetch data.
//! Every operation is a pure function over an immutable snapshot; call
//! it again whenever the inputs change.
//!
//! # Components
//!
//! - **`utilization`** — Fraction of a node's capacity an allocation uses
//! - **`topology`** — Datacenter → node → allocation scene model plus a
//!   task-group index
//! - **`columns`** — Column strategy from node-count skew across datacenters
//! - **`blocks`** — Per-status allocation blocks vs. `+N` summary for a width
//! - **`scale`** — Node height scale by memory capacity
//! - **`summary`** — Cluster and task-group utilization summaries
//! - **`stats`** — Mean / deviation helpers used by the heuristics
//! - **`config`** — Tunable thresholds (`layout.toml`)

pub mod blocks;
pub mod columns;
pub mod config;
pub mod error;
pub mod scale;
pub mod stats;
pub mod summary;
pub mod topology;
pub mod utilization;

pub use blocks::{BlockGroup, BlockGrouper, SummaryBlock, bucket_by_status};
pub use columns::{ColumnStrategy, compute_column_strategy};
pub use config::{BlockConfig, ColumnConfig, LayoutConfig, ScaleConfig};
pub use error::{ConfigError, ConfigResult};
pub use scale::HeightScale;
pub use summary::{ClusterUtilization, GroupSummary};
pub use topology::{AllocationEntry, Datacenter, GroupKey, NodeEntry, Topology, build};
pub use utilization::percent_of;
