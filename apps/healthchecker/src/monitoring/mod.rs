/// Monitoring engine module - probes the configured services
///
/// This module is responsible for:
/// - Executing HTTP/HTTPS probes (`checker`)
/// - Matching observed responses against expectations (`matcher`)
/// - Running one check and alerting on failure (`executor`)
/// - Scheduling fixed-interval cycles over all checks (`scheduler`)
pub mod checker;
pub mod executor;
pub mod matcher;
pub mod scheduler;
pub mod types;

pub use checker::{Checker, HttpChecker};
pub use executor::MonitoringExecutor;
pub use matcher::responses_match;
pub use scheduler::{CycleReport, MonitoringScheduler, SchedulerHandle};
pub use types::{Check, CheckOutcome, CheckStatus, ExpectedResponse, HeaderPair, ObservedResponse, RequestTemplate};
