use std::sync::Arc;
use std::time::Instant;

use tracing::{info, warn};

use super::checker::Checker;
use super::matcher::responses_match;
use super::types::{Check, CheckOutcome};
use crate::error::{CheckFailure, describe_chain};
use crate::notify::Notifier;

/// Monitoring executor - runs one check: probe, match, notify on failure
pub struct MonitoringExecutor {
    checker: Arc<dyn Checker>,
    notifier: Arc<Notifier>,
}

impl MonitoringExecutor {
    pub fn new(checker: Arc<dyn Checker>, notifier: Arc<Notifier>) -> Self {
        Self { checker, notifier }
    }

    /// Execute a single check and report its outcome
    pub async fn execute_check(&self, check: &Check) -> CheckOutcome {
        info!(service = %check.service, "Calling service: {}...", check.service);

        let outcome = CheckOutcome::new(check.service.clone());
        let start = Instant::now();
        let probe = self.checker.call(&check.request, check.capture_header()).await;
        let latency_ms = start.elapsed().as_millis() as u64;

        let (observed, failure) = match probe {
            Ok(observed) if responses_match(&check.expected, &observed) => {
                info!(service = %check.service, latency_ms, "SUCCESS: {}", check.service);
                return outcome.healthy(observed, latency_ms);
            }
            Ok(observed) => (Some(observed), CheckFailure::Mismatch),
            Err(e) => (None, CheckFailure::Probe(e)),
        };

        let notified = match self.notifier.notify(check, observed.as_ref(), &failure).await {
            Ok(()) => true,
            Err(e) => {
                warn!(service = %check.service, "Alert for {} was not delivered: {}", check.service, describe_chain(&e));
                false
            }
        };

        outcome.failing(observed, latency_ms, describe_chain(&failure)).with_notified(notified)
    }
}
