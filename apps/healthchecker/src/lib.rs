//! Periodic HTTP health checker.
//!
//! Every cycle probes all configured services concurrently, matches the
//! responses against their expected patterns and posts a templated alert
//! to the notification endpoint for each failing service.

pub mod config;
pub mod error;
pub mod monitoring;
pub mod notify;

pub use config::{Config, ConfigError};
pub use error::{CheckFailure, NotifyError, ProbeError};
