//! PushGateway trait - port onto the remote push-notification service
//!
//! The engine never talks to the wire directly; it issues calls through this
//! trait. A production adapter wraps the real pub-sub client, and
//! `adapters::MockGateway` backs tests and the demo CLI.
//!
//! ```text
//! PushReconciler
//!       |
//!       v
//! PushGateway (trait)
//!       |
//!       +---> remote pub-sub client adapter
//!       |
//!       +---> MockGateway (tests, CLI)
//! ```

use crate::core_push::errors::GatewayError;
use crate::core_push::types::DeviceToken;
use async_trait::async_trait;

/// Result type for gateway calls
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Remote push gateway operations
///
/// Push-registration calls return a result the reconciler records as an
/// outcome. The subscribe-path calls mirror the channel-presence API of the
/// remote client: fire-and-forget, any failure is the transport's problem.
#[async_trait]
pub trait PushGateway: Send + Sync {
    /// Register `channels` for push delivery to `token`
    async fn add_push(&self, channels: &[String], token: &DeviceToken) -> GatewayResult<()>;

    /// Deregister `channels` from push delivery to `token`
    async fn remove_push(&self, channels: &[String], token: &DeviceToken) -> GatewayResult<()>;

    /// Drop every push registration held by `token`
    async fn remove_all_push(&self, token: &DeviceToken) -> GatewayResult<()>;

    /// Query the channels currently push-enabled for `token`
    async fn list_push(&self, token: &DeviceToken) -> GatewayResult<Vec<String>>;

    /// Subscribe to channels on the live connection
    async fn subscribe(&self, channels: &[String], presence: bool);

    /// Unsubscribe from channels on the live connection
    async fn unsubscribe(&self, channels: &[String], presence: bool);

    /// Drop every live subscription
    async fn unsubscribe_all(&self);

    /// Whether an active subscription connection exists
    fn is_connected(&self) -> bool;
}
