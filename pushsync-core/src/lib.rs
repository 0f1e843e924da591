//! pushsync-core
//!
//! A UI-free push-registration reconciliation engine for pub-sub channels.
//! Given a changing device push token and a changing set of subscribed
//! channels, the engine computes the minimal set of registration and
//! deregistration calls against a remote push gateway, keeps an optional
//! "-pndebug" mirror subscription in sync, and reports every gateway outcome
//! to an event sink and a broadcast stream.
//!
//! The remote service and the event store are ports (`PushGateway`,
//! `EventSink`); in-memory adapters for both live in `core_push::adapters`.

pub mod config;
pub mod core_diff;
pub mod core_push;
pub mod logging;
pub mod metrics;

pub use config::EngineConfig;
pub use core_diff::{diff_channels, diff_token, ChannelTransition, TokenTransition};
pub use core_push::{
    DeviceToken, ChannelSet, EventBroadcaster, EventSink, PushEvent, PushGateway, PushReconciler,
    RegistrationOutcome, RegistrationState, SessionIdentity,
};
pub use logging::{init_logging, init_logging_with_config, LogConfig, LogLevel};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Ensure the main exports are accessible
        let _ = LogLevel::Info;
        let _ = EngineConfig::default();
        let _ = ChannelSet::new();
    }
}
