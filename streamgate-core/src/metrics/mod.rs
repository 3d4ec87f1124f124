//! Metrics for access decisions
//!
//! Everything goes through the `metrics` facade. Without an installed
//! recorder the calls are no-ops, so the library never requires one.

use crate::policy::Action;
use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::time::Instant;

/// Initialize metrics with descriptions
pub fn init_metrics() {
    describe_counter!(
        "policy.decisions.total",
        "Access decisions, labelled by action and outcome"
    );
    describe_counter!(
        "policy.check.failures",
        "Access checks that failed on a bad reference or a read-model error"
    );
    describe_histogram!(
        "policy.decision.duration_us",
        "Time spent evaluating one access check in microseconds"
    );
}

/// Count one decision
pub fn record_decision(action: Action, allowed: bool) {
    let outcome = if allowed { "allowed" } else { "denied" };
    counter!("policy.decisions.total", "action" => action.as_str(), "outcome" => outcome)
        .increment(1);
}

/// Count one failed check
pub fn record_check_failure(action: Action) {
    counter!("policy.check.failures", "action" => action.as_str()).increment(1);
}

/// Timer for measuring how long a check takes
pub struct Timer {
    action: Action,
    start: Instant,
}

impl Timer {
    pub fn start(action: Action) -> Self {
        Self {
            action,
            start: Instant::now(),
        }
    }

    /// Stop the timer and record the duration
    pub fn stop(self) {
        let micros = self.start.elapsed().as_secs_f64() * 1_000_000.0;
        histogram!("policy.decision.duration_us", "action" => self.action.as_str()).record(micros);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_init() {
        init_metrics();
        // No recorder installed; just ensure nothing panics
    }

    #[test]
    fn test_record_without_recorder() {
        for action in Action::ALL {
            record_decision(action, true);
            record_decision(action, false);
            record_check_failure(action);
            Timer::start(action).stop();
        }
    }
}
