use std::collections::HashSet;
use std::time::Duration;
use std::{fmt, fs, path};

use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use thiserror::Error;
use tracing::warn;
use url::Url;

use crate::monitoring::checker::parse_method;
use crate::monitoring::types::{Check, ExpectedResponse, RequestTemplate};

/// Per-call timeout used when the file does not set one
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
const MIN_TIMEOUT_MS: u64 = 100;
const MAX_TIMEOUT_MS: u64 = 300_000;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file {path}: {source}")]
    Read {
        path: path::PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot parse config file: {0}")]
    Parse(String),

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Yaml,
}

impl ConfigFormat {
    /// Pick the format from the file extension, YAML unless it is `.toml`
    pub fn from_path(path: &path::Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Time between two cycles, in milliseconds
    pub interval: u64,

    /// Bound for every outbound call, in milliseconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Request sent when a check fails
    pub notify: RequestTemplate,

    #[serde(default)]
    pub checks: Vec<CheckEntry>,
}

/// One `checks` entry as written in the file
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckEntry {
    pub service: String,

    #[serde(default)]
    pub request: RequestTemplate,

    #[serde(default)]
    pub response: ResponseSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ResponseSection {
    #[serde(default)]
    pub ok: ExpectedResponse,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_MS
}

impl From<CheckEntry> for Check {
    fn from(entry: CheckEntry) -> Self {
        Check::new(entry.service, entry.request, entry.response.ok)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let write_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str, value: &dyn fmt::Display| {
                writeln!(f, "  {:indent$}{}: {}", "", label, value, indent = level * 2)
            }
        };
        let write_title_indented = |level: usize| {
            move |f: &mut fmt::Formatter<'_>, label: &str| {
                writeln!(f, "{:indent$}{}", "", label, indent = level * 2)
            }
        };

        let write_title_1 = write_title_indented(1);
        let write_title_2 = write_title_indented(2);
        let write_1 = write_indented(1);
        let write_2 = write_indented(2);

        writeln!(f, "Health checker configuration:")?;
        write_1(f, "Interval (ms)", &self.interval)?;
        write_1(f, "Timeout (ms)", &self.timeout)?;
        write_title_1(f, "Notify")?;
        write_2(f, "Endpoint", &self.notify.endpoint)?;
        write_2(f, "Method", &method_label(&self.notify.method))?;
        write_2(f, "Headers", &self.notify.header.len())?;
        write_title_1(f, "Checks")?;
        for entry in &self.checks {
            write_title_2(f, &entry.service)?;
            write_2(f, "Endpoint", &entry.request.endpoint)?;
            write_2(f, "Method", &method_label(&entry.request.method))?;
            write_2(f, "Expect", &entry.response.ok)?;
        }

        Ok(())
    }
}

fn method_label(method: &str) -> &str {
    if method.is_empty() { "GET" } else { method }
}

impl Config {
    /// Read, parse and validate a configuration file
    ///
    /// ```rust,ignore
    /// let cfg = config::Config::from_path("healthchecker.yaml")?;
    /// println!("{}", cfg);
    /// ```
    pub fn from_path(path: impl AsRef<path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;

        Self::parse(&raw, ConfigFormat::from_path(path))
    }

    /// Parse and validate configuration text
    pub fn parse(raw: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let config: Config = match format {
            ConfigFormat::Toml => toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?,
            ConfigFormat::Yaml => serde_yaml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// The configured checks, in file order
    pub fn checks(&self) -> Vec<Check> {
        self.checks.iter().cloned().map(Check::from).collect()
    }

    /// Reject configurations the loop cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.interval == 0 {
            return Err(ConfigError::Invalid("interval must be greater than 0".into()));
        }

        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout) {
            return Err(ConfigError::Invalid(format!(
                "timeout must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS} ms, got {}",
                self.timeout
            )));
        }

        validate_request("notify", &self.notify)?;

        let mut services = HashSet::new();
        for entry in &self.checks {
            if entry.service.trim().is_empty() {
                return Err(ConfigError::Invalid("check with an empty service name".into()));
            }
            if !services.insert(entry.service.as_str()) {
                return Err(ConfigError::Invalid(format!("duplicate service name: {}", entry.service)));
            }
            validate_request(&entry.service, &entry.request)?;

            let expected_key = &entry.response.ok.header.key;
            if !expected_key.is_empty() && HeaderName::from_bytes(expected_key.as_bytes()).is_err() {
                return Err(ConfigError::Invalid(format!(
                    "{}: invalid expected header name {expected_key:?}",
                    entry.service
                )));
            }
        }

        if self.checks.is_empty() {
            warn!("No checks configured, every cycle will be empty");
        }

        Ok(())
    }
}

fn validate_request(owner: &str, request: &RequestTemplate) -> Result<(), ConfigError> {
    let url = Url::parse(&request.endpoint)
        .map_err(|e| ConfigError::Invalid(format!("{owner}: invalid endpoint {:?}: {e}", request.endpoint)))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(ConfigError::Invalid(format!("{owner}: unsupported scheme {other}"))),
    }

    parse_method(&request.method).map_err(|e| ConfigError::Invalid(format!("{owner}: {e}")))?;

    for (key, value) in &request.header {
        HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| ConfigError::Invalid(format!("{owner}: invalid header name {key:?}")))?;
        HeaderValue::from_str(value)
            .map_err(|_| ConfigError::Invalid(format!("{owner}: invalid value for header {key:?}")))?;
    }

    Ok(())
}
