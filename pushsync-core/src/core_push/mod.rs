//! Push registration engine
//!
//! Reconciles a device's push registrations against a remote pub-sub gateway
//! as the push token, channel membership, and debug-mirror flag change.

pub mod adapters;
pub mod debug_mirror;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod reconciler;
pub mod types;

#[cfg(test)]
mod tests;

// Re-exports
pub use errors::{GatewayError, ReconcilerError};
pub use events::{EventBroadcaster, EventSink, NullSink, PushEvent};
pub use gateway::{GatewayResult, PushGateway};
pub use reconciler::PushReconciler;
pub use types::{
    ChannelSet, DeviceToken, PushOperation, RegistrationOutcome, RegistrationState,
    SessionIdentity,
};
