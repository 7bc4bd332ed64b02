//! Error types for configuration and simulation runs.

use thiserror::Error;

/// Errors produced while parsing or validating a simulation configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Input for a numeric field was not an integer.
    #[error("{field} must be a valid integer, got `{value}`")]
    Malformed {
        /// Field being parsed.
        field: &'static str,
        /// Raw input.
        value: String,
    },
    /// Input for a numeric field does not fit in a 64-bit integer.
    #[error("{field} value too large: `{value}`")]
    TooLarge {
        /// Field being parsed.
        field: &'static str,
        /// Raw input.
        value: String,
    },
    /// A well-formed value violated a configuration rule.
    #[error("invalid configuration: {0}")]
    Validation(String),
    /// Configuration document could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors produced by the simulation coordinator.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Configuration was rejected before the run started.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An OS thread could not be spawned.
    #[error("failed to spawn {task}: {source}")]
    Spawn {
        /// Name of the task that failed to start.
        task: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A task panicked before it could report back.
    #[error("task {0} panicked")]
    TaskPanicked(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
