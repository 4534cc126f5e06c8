//! Node height scale — taller nodes for more memory.

use crate::config::ScaleConfig;
use crate::topology::Topology;

/// Linear map from `[0, max node memory]` to `[min_height, max_height]`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeightScale {
    pub max_memory: u64,
    pub min_height: f64,
    pub max_height: f64,
}

impl HeightScale {
    pub fn for_topology(topology: &Topology, config: &ScaleConfig) -> Self {
        let max_memory = topology
            .nodes()
            .filter_map(|n| n.node.resources.memory)
            .max()
            .unwrap_or(0);
        Self {
            max_memory,
            min_height: config.min_node_height,
            max_height: config.max_node_height,
        }
    }

    /// Height in pixels for a node with the given memory capacity.
    /// Unknown memory maps to the minimum height.
    pub fn height(&self, memory: Option<u64>) -> f64 {
        match memory {
            Some(mem) if self.max_memory > 0 => {
                let ratio = (mem as f64 / self.max_memory as f64).min(1.0);
                self.min_height + ratio * (self.max_height - self.min_height)
            }
            _ => self.min_height,
        }
    }
}
