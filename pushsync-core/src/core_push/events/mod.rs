//! Event delivery: sink port and broadcast stream
//!
//! Every gateway outcome goes two ways: to the `EventSink` collaborator
//! (the embedder's event log) and onto a broadcast stream any number of
//! subscribers can watch.

pub mod broadcaster;
pub mod sink;

pub use broadcaster::{EventBroadcaster, PushEvent};
pub use sink::{EventSink, NullSink};
