//! Network transport abstraction.
//!
//! The interceptor is a decorator over an injected [`Transport`] rather than
//! a monkey-patched global, so callers receive the wrapped client through
//! dependency injection and tests can substitute a mock. [`HttpTransport`]
//! is the real reqwest-backed primitive.

use crate::{InkpilotError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Request timeout (reqwest defaults are ~30s, we set explicitly)
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// An outgoing request to the upstream API.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    /// Full target URL
    pub url: String,
    /// JSON request body
    pub body: Value,
    /// Additional headers (name, value)
    pub headers: Vec<(String, String)>,
}

impl OutboundRequest {
    pub fn new(url: impl Into<String>, body: Value) -> Self {
        Self {
            url: url.into(),
            body,
            headers: Vec::new(),
        }
    }

    pub fn with_bearer(mut self, token: &str) -> Self {
        self.headers
            .push(("Authorization".to_string(), format!("Bearer {token}")));
        self
    }
}

/// A fully buffered upstream response.
///
/// The body is owned bytes: the single-use network stream has already been
/// drained, so the only way a second reader (the interceptor's diagnostic
/// path) gets at the content is an explicit duplication of the bytes. The
/// instance handed back to the caller is never touched.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Decode the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decode the body as UTF-8 text (lossy).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The injected network primitive.
///
/// Implementors must buffer the full body before returning so that response
/// duplication is a plain byte copy. A non-2xx status is not an error at
/// this layer: the caller sees exactly what the upstream sent. Only genuine
/// transport failures (DNS, connect, timeout) return `Err`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse>;
}

/// Real HTTP transport backed by reqwest.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("inkpilot/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client }
    }

    fn map_reqwest_error(e: reqwest::Error) -> InkpilotError {
        if e.is_timeout() {
            InkpilotError::Transport(format!("timeout: {e}"))
        } else if e.is_connect() {
            InkpilotError::Transport(format!("network: {e}"))
        } else {
            InkpilotError::Transport(e.to_string())
        }
    }
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<RawResponse> {
        debug!("POST {}", request.url);

        let mut req_builder = self
            .client
            .post(&request.url)
            .header("Content-Type", "application/json");

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name.as_str(), value.as_str());
        }

        let response = req_builder
            .json(&request.body)
            .send()
            .await
            .map_err(Self::map_reqwest_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.to_string(),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                )
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(Self::map_reqwest_error)?
            .to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn bearer_header_is_appended() {
        let request = OutboundRequest::new("http://example.com", json!({})).with_bearer("sk-test");
        assert_eq!(
            request.headers,
            vec![("Authorization".to_string(), "Bearer sk-test".to_string())]
        );
    }

    #[test]
    fn raw_response_json_decodes_body() {
        let response = RawResponse {
            status: 200,
            headers: Vec::new(),
            body: br#"{"response":"ok"}"#.to_vec(),
        };
        let value = response.json().unwrap();
        assert_eq!(value["response"], "ok");
        assert!(response.is_success());
    }

    #[test]
    fn raw_response_json_rejects_invalid_body() {
        let response = RawResponse {
            status: 200,
            headers: Vec::new(),
            body: b"<html>not json</html>".to_vec(),
        };
        assert!(response.json().is_err());
        assert_eq!(response.text(), "<html>not json</html>");
    }

    #[test]
    fn non_success_status_is_not_an_error() {
        let response = RawResponse {
            status: 429,
            headers: Vec::new(),
            body: Vec::new(),
        };
        assert!(!response.is_success());
    }
}
