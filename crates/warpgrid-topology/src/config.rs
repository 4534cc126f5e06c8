//! layout.toml — tunable thresholds for the layout heuristics.
//!
//! Every field has a default, so an empty file (or no file) is valid.
//!
//! ```toml
//! [columns]
//! skew_threshold = 0.5
//! dense_node_threshold = 20
//!
//! [blocks]
//! block_width = 32.0
//! block_gap = 10.0
//! summary_width = 50.0
//! summary_gap = 10.0
//! min_shown_blocks = 4
//!
//! [scale]
//! min_node_height = 15.0
//! max_node_height = 40.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub columns: ColumnConfig,
    pub blocks: BlockConfig,
    pub scale: ScaleConfig,
}

/// Thresholds for the datacenter column strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Coefficient of variation of per-datacenter node counts above which
    /// datacenters stack in a single column.
    pub skew_threshold: f64,
    /// Total node count at or below which stacked datacenters still lay
    /// their nodes out in one internal column.
    pub dense_node_threshold: usize,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            skew_threshold: 0.5,
            dense_node_threshold: 20,
        }
    }
}

/// Pixel footprint of allocation blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub block_width: f64,
    pub block_gap: f64,
    /// Width reserved for the `+N` summary block.
    pub summary_width: f64,
    pub summary_gap: f64,
    /// A bucket that can show fewer individual blocks than this shows
    /// only the summary block.
    pub min_shown_blocks: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            block_width: 32.0,
            block_gap: 10.0,
            summary_width: 50.0,
            summary_gap: 10.0,
            min_shown_blocks: 4,
        }
    }
}

impl BlockConfig {
    /// Horizontal space consumed by one block and its trailing gap.
    pub fn pitch(&self) -> f64 {
        self.block_width + self.block_gap
    }

    /// Horizontal space consumed by the summary block and its gap.
    pub fn summary_footprint(&self) -> f64 {
        self.summary_width + self.summary_gap
    }
}

/// Pixel range for node heights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub min_node_height: f64,
    pub max_node_height: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        Self {
            min_node_height: 15.0,
            max_node_height: 40.0,
        }
    }
}

impl LayoutConfig {
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate a config document.
    pub fn from_toml_str(content: &str) -> ConfigResult<Self> {
        let config: LayoutConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let non_negative = |name: &str, value: f64| {
            if value.is_finite() && value >= 0.0 {
                Ok(())
            } else {
                Err(ConfigError::Invalid(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )))
            }
        };

        non_negative("columns.skew_threshold", self.columns.skew_threshold)?;
        non_negative("blocks.block_width", self.blocks.block_width)?;
        non_negative("blocks.block_gap", self.blocks.block_gap)?;
        non_negative("blocks.summary_width", self.blocks.summary_width)?;
        non_negative("blocks.summary_gap", self.blocks.summary_gap)?;
        non_negative("scale.min_node_height", self.scale.min_node_height)?;
        non_negative("scale.max_node_height", self.scale.max_node_height)?;

        if self.blocks.pitch() <= 0.0 {
            return Err(ConfigError::Invalid(
                "blocks.block_width + blocks.block_gap must be positive".to_string(),
            ));
        }
        if self.scale.min_node_height > self.scale.max_node_height {
            return Err(ConfigError::Invalid(format!(
                "scale.min_node_height ({}) exceeds scale.max_node_height ({})",
                self.scale.min_node_height, self.scale.max_node_height
            )));
        }
        Ok(())
    }
}
