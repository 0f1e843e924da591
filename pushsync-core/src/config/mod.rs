//! Configuration for the push registration engine

use serde::{Deserialize, Serialize};

mod error;

pub use error::ConfigError;

/// Suffix appended to channel names for debug mirror subscriptions
pub const DEFAULT_DEBUG_SUFFIX: &str = "-pndebug";

/// Default capacity of the event broadcast channel
pub const DEFAULT_EVENT_CAPACITY: usize = 100;

/// Engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Suffix for debug mirror channel names
    pub debug_suffix: String,

    /// Buffered capacity of the event broadcast stream
    pub event_capacity: usize,

    /// Well-known channels a fresh session subscribes to
    pub default_channels: Vec<String>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            debug_suffix: DEFAULT_DEBUG_SUFFIX.to_string(),
            event_capacity: DEFAULT_EVENT_CAPACITY,
            default_channels: vec!["chat".to_string(), "color".to_string()],
        }
    }
}

impl EngineConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.debug_suffix.is_empty() {
            return Err(ConfigError::EmptyDebugSuffix);
        }
        if self.event_capacity == 0 {
            return Err(ConfigError::InvalidEventCapacity(self.event_capacity));
        }
        Ok(())
    }

    /// Set the debug mirror suffix
    pub fn with_debug_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.debug_suffix = suffix.into();
        self
    }

    /// Set the event broadcast capacity
    pub fn with_event_capacity(mut self, capacity: usize) -> Self {
        self.event_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.debug_suffix, "-pndebug");
        assert_eq!(config.default_channels, vec!["chat", "color"]);
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let config = EngineConfig::default().with_debug_suffix("");
        assert!(matches!(config.validate(), Err(ConfigError::EmptyDebugSuffix)));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = EngineConfig::default().with_event_capacity(0);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidEventCapacity(0))
        ));
    }

    #[test]
    fn test_config_serialization() {
        let config = EngineConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.debug_suffix, config.debug_suffix);
        assert_eq!(parsed.event_capacity, config.event_capacity);
    }
}
