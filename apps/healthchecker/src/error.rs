use std::time::Duration;

use thiserror::Error;

/// Failure of a single outbound call (probe or notification)
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The request could not be built, nothing was sent
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("probe failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("probe failed: no response within {0:?}")]
    Timeout(Duration),

    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

impl ProbeError {
    /// Map a reqwest error, telling elapsed timeouts apart from other transport failures
    pub(crate) fn from_reqwest(error: reqwest::Error, timeout: Duration) -> Self {
        if error.is_timeout() {
            ProbeError::Timeout(timeout)
        } else if error.is_builder() {
            ProbeError::InvalidRequest(error.to_string())
        } else {
            ProbeError::Transport(error)
        }
    }
}

/// Render an error with its whole `source()` chain, `outer: inner: root`.
///
/// Links whose text is already part of the rendered message are skipped,
/// so wrappers that repeat their source are printed once.
pub fn describe_chain(error: &dyn std::error::Error) -> String {
    let mut description = error.to_string();
    let mut source = error.source();

    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !description.contains(&text) {
            description.push_str(": ");
            description.push_str(&text);
        }
        source = cause.source();
    }

    description
}

/// Reason a check is reported to the notifier
#[derive(Debug, Error)]
pub enum CheckFailure {
    #[error(transparent)]
    Probe(#[from] ProbeError),

    #[error("responses do not match")]
    Mismatch,
}

/// Failure of the notification channel itself. Logged, never escalated.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification dispatch failed: {0}")]
    Dispatch(#[from] ProbeError),

    #[error("notification endpoint answered with status {0}")]
    UnexpectedStatus(u16),
}
