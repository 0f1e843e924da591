//! EventSink trait - boundary onto the embedder's event log

use crate::core_push::types::{RegistrationOutcome, SessionIdentity};

/// Consumer of registration outcomes
///
/// `record` is fire-and-forget and must not block: the reconciler calls it
/// inline between gateway calls. A persisting implementation should hand the
/// outcome to its own queue and return.
pub trait EventSink: Send + Sync {
    /// Record one gateway outcome under the acting identity
    fn record(&self, outcome: &RegistrationOutcome, actor: Option<&SessionIdentity>);
}

/// Sink that drops everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn record(&self, _outcome: &RegistrationOutcome, _actor: Option<&SessionIdentity>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_push::types::PushOperation;

    #[test]
    fn test_null_sink_accepts_records() {
        let sink = NullSink;
        let outcome = RegistrationOutcome::new(PushOperation::RemoveAllPush, vec![], None, Ok(()));
        sink.record(&outcome, None);
        sink.record(&outcome, Some(&SessionIdentity::generate()));
    }
}
