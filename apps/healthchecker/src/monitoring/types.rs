use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::time::SystemTime;

/// Outbound request description, used for probes and for the notification
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RequestTemplate {
    /// Target URL
    pub endpoint: String,

    /// HTTP method, empty means GET
    pub method: String,

    /// Request headers, one value per name
    pub header: HashMap<String, String>,

    /// Request body, may be empty
    pub body: String,
}

impl RequestTemplate {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), ..Self::default() }
    }

    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.header.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }
}

/// A single header name/value pair. An empty key means "don't care".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HeaderPair {
    pub key: String,
    pub value: String,
}

impl HeaderPair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { key: key.into(), value: value.into() }
    }
}

/// Partial response specification a probe result is matched against
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExpectedResponse {
    /// Expected status code, 0 means "don't care"
    pub code: u16,

    /// Expected header, empty key means "don't care"
    pub header: HeaderPair,
}

impl ExpectedResponse {
    pub fn code(code: u16) -> Self {
        Self { code, ..Self::default() }
    }

    pub fn header(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self { header: HeaderPair::new(key, value), ..Self::default() }
    }
}

impl fmt::Display for ExpectedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            0 => write!(f, "code=any")?,
            code => write!(f, "code={code}")?,
        }
        if self.header.key.is_empty() {
            write!(f, " header=any")
        } else {
            write!(f, " header={}:{:?}", self.header.key, self.header.value)
        }
    }
}

/// What a probe actually saw: the status code and the one header the check asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObservedResponse {
    pub code: u16,

    /// Captured header. The key is the name requested by the caller, the
    /// value is empty when the response did not carry it.
    pub header: HeaderPair,
}

impl fmt::Display for ObservedResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code={}", self.code)?;
        if !self.header.key.is_empty() {
            write!(f, " header={}:{:?}", self.header.key, self.header.value)?;
        }
        Ok(())
    }
}

/// One configured service probe definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Check {
    pub service: String,
    pub request: RequestTemplate,
    pub expected: ExpectedResponse,
}

impl Check {
    pub fn new(service: impl Into<String>, request: RequestTemplate, expected: ExpectedResponse) -> Self {
        Self { service: service.into(), request, expected }
    }

    /// Name of the response header the probe has to capture for matching
    pub fn capture_header(&self) -> &str {
        &self.expected.header.key
    }
}

/// Health of a service after one check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Healthy,
    Failing,
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckStatus::Healthy => write!(f, "healthy"),
            CheckStatus::Failing => write!(f, "failing"),
        }
    }
}

/// Result of running one check within a cycle
#[derive(Debug, Clone)]
pub struct CheckOutcome {
    pub service: String,

    /// Timestamp when the check started
    pub timestamp: SystemTime,

    pub status: CheckStatus,

    /// Probe result, `None` when the call itself failed
    pub observed: Option<ObservedResponse>,

    /// Duration of the probe in milliseconds
    pub latency_ms: u64,

    /// Failure description (if check failed)
    pub error_message: Option<String>,

    /// Whether the notification endpoint accepted the alert
    pub notified: bool,
}

impl CheckOutcome {
    pub fn new(service: String) -> Self {
        Self {
            service,
            timestamp: SystemTime::now(),
            status: CheckStatus::Failing,
            observed: None,
            latency_ms: 0,
            error_message: None,
            notified: false,
        }
    }

    pub fn healthy(mut self, observed: ObservedResponse, latency_ms: u64) -> Self {
        self.status = CheckStatus::Healthy;
        self.observed = Some(observed);
        self.latency_ms = latency_ms;
        self
    }

    pub fn failing(mut self, observed: Option<ObservedResponse>, latency_ms: u64, error: String) -> Self {
        self.status = CheckStatus::Failing;
        self.observed = observed;
        self.latency_ms = latency_ms;
        self.error_message = Some(error);
        self
    }

    pub fn with_notified(mut self, notified: bool) -> Self {
        self.notified = notified;
        self
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }
}
