//! In-memory EventSink for asserting recorded outcome history

use crate::core_push::events::EventSink;
use crate::core_push::types::{RegistrationOutcome, SessionIdentity};
use std::sync::{Arc, Mutex};

/// EventSink that appends every record to a shared vector
#[derive(Clone, Default)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<(RegistrationOutcome, Option<SessionIdentity>)>>>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded (outcome, actor) pairs, in recording order
    pub fn records(&self) -> Vec<(RegistrationOutcome, Option<SessionIdentity>)> {
        self.records.lock().unwrap().clone()
    }

    /// Just the outcomes, in recording order
    pub fn outcomes(&self) -> Vec<RegistrationOutcome> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|(outcome, _)| outcome.clone())
            .collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

impl EventSink for MemorySink {
    fn record(&self, outcome: &RegistrationOutcome, actor: Option<&SessionIdentity>) {
        self.records
            .lock()
            .unwrap()
            .push((outcome.clone(), actor.cloned()));
    }
}
