//! Error types for engine configuration

use thiserror::Error;

/// Errors produced by configuration validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The debug mirror suffix must be non-empty
    #[error("debug mirror suffix must not be empty")]
    EmptyDebugSuffix,

    /// The event broadcast channel needs room for at least one event
    #[error("invalid event capacity: {0}")]
    InvalidEventCapacity(usize),
}
