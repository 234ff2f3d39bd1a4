use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{MissedTickBehavior, interval};
use tracing::{error, info};

use super::executor::MonitoringExecutor;
use super::types::{Check, CheckOutcome};

/// Outcomes of one complete cycle over all configured checks
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Cycle number, starting at 1
    pub cycle: u64,
    pub outcomes: Vec<CheckOutcome>,
}

impl CycleReport {
    pub fn healthy_count(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_healthy()).count()
    }

    pub fn failing_count(&self) -> usize {
        self.outcomes.len() - self.healthy_count()
    }
}

/// Monitoring scheduler - runs every check once per tick, one cycle at a time
pub struct MonitoringScheduler {
    executor: Arc<MonitoringExecutor>,
    checks: Arc<[Check]>,
    interval: Duration,
    cycle: u64,
}

impl MonitoringScheduler {
    pub fn new(executor: Arc<MonitoringExecutor>, checks: Vec<Check>, interval: Duration) -> Self {
        Self { executor, checks: checks.into(), interval, cycle: 0 }
    }

    pub fn checks(&self) -> &[Check] {
        &self.checks
    }

    /// Run every check concurrently and wait until all of them are done
    pub async fn run_cycle(&mut self) -> CycleReport {
        self.cycle += 1;
        info!(cycle = self.cycle, checks = self.checks.len(), "Starting loop...");

        let handles: Vec<JoinHandle<CheckOutcome>> = (0..self.checks.len())
            .map(|index| {
                let executor = self.executor.clone();
                let checks = self.checks.clone();
                tokio::spawn(async move { executor.execute_check(&checks[index]).await })
            })
            .collect();

        let outcomes = join_all(handles)
            .await
            .into_iter()
            .zip(self.checks.iter())
            .map(|(joined, check)| {
                joined.unwrap_or_else(|e| {
                    error!(service = %check.service, "Check task for {} aborted: {}", check.service, e);
                    CheckOutcome::new(check.service.clone()).failing(None, 0, format!("check task aborted: {e}"))
                })
            })
            .collect();

        let report = CycleReport { cycle: self.cycle, outcomes };
        info!(
            cycle = report.cycle,
            healthy = report.healthy_count(),
            failing = report.failing_count(),
            "Loop finished."
        );
        report
    }

    /// Start the periodic loop. The first cycle runs immediately.
    ///
    /// Dropping the returned handle stops the loop as well.
    pub fn start(mut self) -> SchedulerHandle {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        let task = tokio::spawn(async move {
            let mut timer = interval(self.interval);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    biased;
                    _ = stop_rx.changed() => break,
                    _ = timer.tick() => {
                        self.run_cycle().await;
                    }
                }
            }

            info!(cycles = self.cycle, "Scheduler stopped");
        });

        SchedulerHandle { stop_tx, task }
    }
}

/// Handle to a running scheduler loop
pub struct SchedulerHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SchedulerHandle {
    /// Ask the loop to stop. A cycle already running is allowed to finish.
    pub fn stop(&self) {
        // The loop may already be gone, nothing left to stop then
        let _ = self.stop_tx.send(true);
    }

    /// Stop the loop and wait for the in-flight cycle to finish
    pub async fn shutdown(self) {
        self.stop();
        if let Err(e) = self.task.await {
            error!("Scheduler task ended abnormally: {}", e);
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}
