//! Error types for layout configuration.
//!
//! The layout engine itself never fails; only loading and validating
//! its tunables can.

use thiserror::Error;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read layout config: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse layout config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize layout config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid layout config: {0}")]
    Invalid(String),
}
