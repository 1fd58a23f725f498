//! HTTP Transport Port - the wire under the provider client.
//!
//! Keeping the transport behind a trait lets tests count calls and script
//! responses without a network.

use async_trait::async_trait;
use secrecy::Secret;
use serde_json::Value;

/// HTTP methods used by the provider API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A header whose value must never be logged.
#[derive(Debug, Clone)]
pub struct SecretHeader {
    pub name: &'static str,
    pub value: Secret<String>,
}

/// An outgoing request. JSON bodies only.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub auth: Option<SecretHeader>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            auth: None,
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            auth: None,
            body: Some(body),
        }
    }

    pub fn with_auth(mut self, name: &'static str, value: &str) -> Self {
        self.auth = Some(SecretHeader {
            name,
            value: Secret::new(value.to_string()),
        });
        self
    }
}

/// A received response with its raw body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport-level failures: nothing came back.
#[derive(Debug, Clone, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out after {timeout_secs}s")]
    Timeout { timeout_secs: u64 },

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("transport error: {0}")]
    Other(String),
}

/// Port for sending HTTP requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_header_is_redacted_in_debug() {
        let request = HttpRequest::get("https://example.com").with_auth("x-api-key", "k-123");
        assert!(!format!("{:?}", request).contains("k-123"));
    }

    #[test]
    fn only_2xx_is_success() {
        assert!(HttpResponse::new(201, "").is_success());
        assert!(!HttpResponse::new(302, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }
}
