//! In-memory adapters for the gateway and event-sink ports
//!
//! Used by unit tests, property tests, and the demo CLI; no network involved.

pub mod memory_sink;
pub mod mock_gateway;

pub use memory_sink::MemorySink;
pub use mock_gateway::{GatewayCall, MockGateway};
