use std::time::Duration;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::debug;

use super::types::{HeaderPair, ObservedResponse, RequestTemplate};
use crate::error::ProbeError;

/// Issues one outbound call and reduces the answer to an `ObservedResponse`.
///
/// Used both for service probes and for notification dispatch.
#[async_trait::async_trait]
pub trait Checker: Send + Sync {
    /// Send `request` and capture the status code plus the value of
    /// `capture_header` (no header is captured when it is empty)
    async fn call(&self, request: &RequestTemplate, capture_header: &str) -> Result<ObservedResponse, ProbeError>;
}

/// HTTP/HTTPS checker
pub struct HttpChecker {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpChecker {
    pub fn new(timeout: Duration) -> Result<Self, ProbeError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("healthchecker/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ProbeError::Client)?;

        Ok(Self { client, timeout })
    }
}

#[async_trait::async_trait]
impl Checker for HttpChecker {
    async fn call(&self, request: &RequestTemplate, capture_header: &str) -> Result<ObservedResponse, ProbeError> {
        let method = parse_method(&request.method)?;
        let headers = build_headers(request)?;

        debug!("{} {}", method, request.endpoint);

        let response = self
            .client
            .request(method, &request.endpoint)
            .headers(headers)
            .body(request.body.clone())
            .send()
            .await
            .map_err(|e| ProbeError::from_reqwest(e, self.timeout))?;

        let mut observed = ObservedResponse { code: response.status().as_u16(), ..Default::default() };

        if !capture_header.is_empty() {
            let value = response
                .headers()
                .get(capture_header)
                .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
                .unwrap_or_default();
            observed.header = HeaderPair::new(capture_header, value);
        }

        Ok(observed)
    }
}

/// Parse a configured method name, an empty name means GET
pub fn parse_method(method: &str) -> Result<Method, ProbeError> {
    if method.is_empty() {
        return Ok(Method::GET);
    }

    Method::from_bytes(method.to_uppercase().as_bytes())
        .map_err(|_| ProbeError::InvalidRequest(format!("unsupported HTTP method: {method}")))
}

fn build_headers(request: &RequestTemplate) -> Result<HeaderMap, ProbeError> {
    let mut headers = HeaderMap::with_capacity(request.header.len());

    for (key, value) in &request.header {
        let name = HeaderName::from_bytes(key.as_bytes())
            .map_err(|_| ProbeError::InvalidRequest(format!("invalid header name: {key}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| ProbeError::InvalidRequest(format!("invalid value for header {key}")))?;
        headers.insert(name, value);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_method() {
        assert_eq!(parse_method("").unwrap(), Method::GET);
        assert_eq!(parse_method("post").unwrap(), Method::POST);
        assert_eq!(parse_method("DELETE").unwrap(), Method::DELETE);
        assert!(matches!(parse_method("NOT A METHOD"), Err(ProbeError::InvalidRequest(_))));
    }

    #[test]
    fn test_build_headers() {
        let request = RequestTemplate::new("http://localhost")
            .with_header("authorization", "Bearer XXXX")
            .with_header("content-type", "application/json");
        let headers = build_headers(&request).unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["authorization"], "Bearer XXXX");
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let request = RequestTemplate::new("http://localhost").with_header("bad header", "x");
        assert!(matches!(build_headers(&request), Err(ProbeError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let checker = HttpChecker::new(Duration::from_secs(2)).unwrap();
        // Port 1 on loopback refuses connections.
        let result = checker.call(&RequestTemplate::new("http://127.0.0.1:1/check"), "").await;
        assert!(matches!(result, Err(ProbeError::Transport(_) | ProbeError::Timeout(_))));
    }

    #[tokio::test]
    async fn test_malformed_endpoint_is_invalid_request() {
        let checker = HttpChecker::new(Duration::from_secs(10)).unwrap();
        let result = checker.call(&RequestTemplate::new("not a url"), "").await;
        assert!(matches!(result, Err(ProbeError::InvalidRequest(_))));
    }
}
