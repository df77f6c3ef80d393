//! Wire transport.
//!
//! Adapters build a [`WireRequest`] and hand it to a [`Transport`]. The
//! production transport is [`HttpTransport`] (reqwest); tests substitute a
//! scripted one.

use std::future::Future;
use std::time::Duration;

use fulfillment_core::Params;
use thiserror::Error;
use tracing::instrument;

use crate::logging::truncate;

/// Request timeout for provider calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP status a provider returns when it is temporarily overloaded.
pub const SERVICE_UNAVAILABLE: u16 = 503;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
        }
    }
}

/// A fully built outgoing request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl WireRequest {
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    #[must_use]
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Look up a header value by case-insensitive name.
    #[must_use]
    pub fn header_value(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Failure below the provider protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// The provider answered with a non-2xx status.
    #[error("HTTP {status} {reason}")]
    Status {
        status: u16,
        reason: String,
        body: String,
    },

    /// No HTTP response was received.
    #[error("Connection failed: {0}")]
    Connection(String),
}

impl TransportError {
    /// Create a status error with the standard reason phrase.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        let reason = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self::Status {
            status,
            reason,
            body: body.into(),
        }
    }

    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Connection(_) => None,
        }
    }

    /// Whether this is the one failure worth retrying.
    #[must_use]
    pub const fn is_service_unavailable(&self) -> bool {
        matches!(self.status_code(), Some(SERVICE_UNAVAILABLE))
    }

    /// Short human-readable summary: the reason phrase, or the connection error.
    #[must_use]
    pub fn summary(&self) -> String {
        match self {
            Self::Status { status, reason, .. } if reason.is_empty() => status.to_string(),
            Self::Status { reason, .. } => reason.clone(),
            Self::Connection(message) => message.clone(),
        }
    }

    /// `http_code`, `http_message` and a truncated `http_body` for a status
    /// error; `response_comment` for a connection error.
    #[must_use]
    pub fn diagnostic_params(&self, max_log_size: usize) -> Params {
        let mut params = Params::new();
        match self {
            Self::Status { status, reason, body } => {
                params.insert("http_code", status.to_string());
                params.insert("http_message", reason.as_str());
                params.insert("http_body", truncate(body, max_log_size).into_owned());
            }
            Self::Connection(message) => params.insert("response_comment", message.as_str()),
        }
        params
    }
}

/// Sends a request and returns the response body.
pub trait Transport: Send + Sync {
    /// Execute one request.
    ///
    /// Resolves to the body on a 2xx response, or a `TransportError`
    /// carrying status, reason and body otherwise.
    fn execute(
        &self,
        request: WireRequest,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}

/// HTTPS transport backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl Default for HttpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpTransport {
    /// Create a transport with a 30 second request timeout.
    ///
    /// Falls back to a default client if the configured one cannot be built.
    #[must_use]
    pub fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self { client }
    }

    /// Wrap an existing client (shared connection pool, custom TLS, proxies).
    #[must_use]
    pub const fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.url))]
    async fn execute(&self, request: WireRequest) -> Result<String, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            })
        }
    }
}
