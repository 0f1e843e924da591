//! Metrics for the push registration engine
//!
//! Counters are emitted through the `metrics` facade; installing a recorder
//! (and exporting) is the embedder's responsibility.

use metrics::describe_counter;

/// Register metric descriptions with the installed recorder
pub fn init_metrics() {
    describe_counter!("push.gateway.calls", "Push gateway calls issued");
    describe_counter!("push.gateway.failures", "Push gateway calls that failed");
    describe_counter!("push.transitions.token", "Token transitions processed");
    describe_counter!(
        "push.transitions.channels",
        "Channel-set transitions processed"
    );
    describe_counter!("push.mirror.subscribes", "Debug mirror subscribe calls");
    describe_counter!("push.mirror.unsubscribes", "Debug mirror unsubscribe calls");
    describe_counter!("push.events.recorded", "Registration outcomes recorded");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_metrics_is_idempotent() {
        // Describing twice must not panic even without a recorder installed
        init_metrics();
        init_metrics();
    }
}
