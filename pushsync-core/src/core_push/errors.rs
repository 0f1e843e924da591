//! Error types for the push registration engine

use thiserror::Error;

/// Failure reported by the remote push gateway
///
/// Surfaced inside a `RegistrationOutcome`, never thrown at the caller of the
/// reconciler entry points. The engine does not retry; retry policy belongs
/// to the embedder.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum GatewayError {
    /// Transport-level failure reaching the service
    #[error("transport error: {0}")]
    Transport(String),

    /// The service rejected the credentials
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The service understood the request and refused it
    #[error("request rejected: {0}")]
    Rejected(String),
}

/// Internal reconciler inconsistencies; logged, never returned to callers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReconcilerError {
    /// A channel plan was executed after the token it captured was replaced
    #[error("channel plan references token {planned} but current token is {current}")]
    StateInconsistency {
        /// Token the plan was computed against (hex)
        planned: String,
        /// Token held when the plan ran (hex, or "none")
        current: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gateway_error_display() {
        let err = GatewayError::Transport("connection reset".to_string());
        assert_eq!(err.to_string(), "transport error: connection reset");

        let err = GatewayError::Auth("bad subscribe key".to_string());
        assert!(err.to_string().contains("authentication rejected"));
    }

    #[test]
    fn test_state_inconsistency_display() {
        let err = ReconcilerError::StateInconsistency {
            planned: "01ff".to_string(),
            current: "none".to_string(),
        };
        assert!(err.to_string().contains("01ff"));
        assert!(err.to_string().contains("none"));
    }
}
