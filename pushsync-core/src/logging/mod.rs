//! Logging subsystem
//!
//! Unified logging setup built on the `tracing` crate. Engine code logs
//! through the `tracing` macros; this module only configures the subscriber.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod error;
mod level;

pub use error::LoggingError;
pub use level::LogLevel;

/// Configuration for the logging subsystem
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Minimum log level to display
    pub level: LogLevel,
    /// Include timestamps
    pub with_timestamp: bool,
    /// Include target module information
    pub with_target: bool,
    /// Use JSON formatting
    pub json_format: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: LogLevel::Info, with_timestamp: true, with_target: true, json_format: false }
    }
}

impl LogConfig {
    /// Create a new LogConfig with the given level
    pub fn new(level: LogLevel) -> Self {
        Self { level, ..Default::default() }
    }

    /// Set whether to include timestamps
    pub fn with_timestamp(mut self, enabled: bool) -> Self {
        self.with_timestamp = enabled;
        self
    }

    /// Set whether to include target information
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Set whether to use JSON formatting
    pub fn json_format(mut self, enabled: bool) -> Self {
        self.json_format = enabled;
        self
    }
}

/// Initialize logging with the default configuration
pub fn init_logging() -> Result<(), LoggingError> {
    init_logging_with_config(LogConfig::default())
}

/// Initialize logging with a custom configuration
///
/// `RUST_LOG` takes precedence over the configured level when set.
pub fn init_logging_with_config(config: LogConfig) -> Result<(), LoggingError> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.level.as_str()));

    let fmt_layer = fmt::layer().with_target(config.with_target);

    // The layer's type changes with each formatting choice, so every
    // combination initializes its own subscriber
    match (config.json_format, config.with_timestamp) {
        (true, true) => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json())
            .try_init(),
        (true, false) => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.json().without_time())
            .try_init(),
        (false, true) => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init(),
        (false, false) => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer.without_time())
            .try_init(),
    }
    .map_err(|e| LoggingError::InitializationFailed(e.to_string()))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_config_default() {
        let config = LogConfig::default();
        assert!(matches!(config.level, LogLevel::Info));
        assert!(config.with_timestamp);
        assert!(config.with_target);
        assert!(!config.json_format);
    }

    #[test]
    fn test_log_config_builder() {
        let config = LogConfig::new(LogLevel::Debug)
            .with_timestamp(false)
            .with_target(false)
            .json_format(true);

        assert!(matches!(config.level, LogLevel::Debug));
        assert!(!config.with_timestamp);
        assert!(!config.with_target);
        assert!(config.json_format);
    }
}
