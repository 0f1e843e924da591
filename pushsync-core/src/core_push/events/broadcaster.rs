//! Event broadcasting for reconciler activity
//!
//! Uses tokio broadcast channels so UI layers, loggers, and tests can observe
//! outcomes and state changes without registering callbacks on the engine.

use crate::core_push::types::RegistrationOutcome;
use tokio::sync::broadcast;

/// Events emitted by the reconciler
#[derive(Debug, Clone)]
pub enum PushEvent {
    /// A gateway call finished
    Outcome(RegistrationOutcome),
    /// The registration triple changed
    StateChanged {
        /// Whether a token is currently held
        token_present: bool,
        /// Number of channels currently registered
        channel_count: usize,
        /// Whether the debug mirror flag is on
        debug_mirror: bool,
    },
}

/// Broadcast stream of `PushEvent`s
#[derive(Clone)]
pub struct EventBroadcaster {
    tx: broadcast::Sender<PushEvent>,
}

impl EventBroadcaster {
    /// Create a broadcaster with room for `capacity` buffered events
    pub fn new(capacity: usize) -> Self {
        let (tx, _rx) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Emit an event to all subscribers
    ///
    /// Returns the number of active subscribers that received it; zero when
    /// nobody is listening (not an error).
    pub fn emit(&self, event: PushEvent) -> usize {
        match self.tx.send(event) {
            Ok(count) => count,
            Err(_) => 0,
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> broadcast::Receiver<PushEvent> {
        self.tx.subscribe()
    }

    /// Number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl Default for EventBroadcaster {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_EVENT_CAPACITY)
    }
}
