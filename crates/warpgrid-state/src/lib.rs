//! warpgrid-state — cluster snapshot types for WarpGrid.
//!
//! Holds the plain records the dashboard receives from the cluster API:
//! worker nodes, the allocations scheduled onto them, and the
//! [`ClusterSnapshot`] that bundles both lists.
//!
//! # Architecture
//!
//! Records are read-only inputs. Capacity and allocated resources are
//! optional because older agents do not report them, and an allocation's
//! `node_id` may reference a node that is no longer in the node list.
//! Consumers are expected to tolerate both.
//!
//! Snapshots are loaded from JSON (`{"nodes": [...], "allocations": [...]}`);
//! malformed documents fail with [`StateError::Deserialize`].

pub mod error;
pub mod snapshot;
pub mod types;

pub use error::{StateError, StateResult};
pub use snapshot::ClusterSnapshot;
pub use types::*;
