//! Error types for configuration loading

use thiserror::Error;

use super::ConfigVariable;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading the container configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    #[error("Missing required environment variable: {0}")]
    MissingVariable(ConfigVariable),
}
