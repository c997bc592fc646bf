//! # Backend Transport
//!
//! The seam between the workbench and the SmartCompile backend. The
//! [`Transport`] trait posts a JSON body to an endpoint path and hands back the
//! raw status and body; [`HttpTransport`] is the reqwest implementation.

use async_trait::async_trait;
use reqwest::Url;
use std::error::Error as StdError;
use std::time::Duration;
use thiserror::Error;

/// Failures surfaced by a remote operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// Non-2xx status on an endpoint that checks status before parsing
    #[error("HTTP error! status: {0}")]
    Status(u16),
    /// The request never produced a response (connection refused, DNS, TLS...)
    #[error("{0}")]
    Transport(String),
    /// The response body did not match the expected JSON shape
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("failed to encode request: {0}")]
    Encode(String),
    #[error("invalid backend URL: {0}")]
    InvalidUrl(String),
}

/// Raw HTTP response as seen by the dispatcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Check if the status indicates success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Something that can POST a JSON document to a backend endpoint
#[async_trait]
pub trait Transport: Send + Sync {
    /// POST `body` to `path` (e.g. `/run`) with `Content-Type: application/json`
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<TransportResponse, BackendError>;
}

/// reqwest-backed transport talking to a single backend host
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpTransport {
    /// Create a transport for `base_url`, optionally bounding every request by `timeout`
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, BackendError> {
        let base_url = normalize_base_url(base_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| describe_error(&e))?;

        tracing::info!("HTTP transport created for {}", base_url);
        Ok(Self { client, base_url })
    }

    /// Resolve an endpoint path against the base URL
    pub fn endpoint_url(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| BackendError::InvalidUrl(format!("{}{path}: {e}", self.base_url)))
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<TransportResponse, BackendError> {
        let url = self.endpoint_url(path)?;
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                let error = describe_error(&e);
                tracing::error!("Backend request failed: {error}");
                error
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| describe_error(&e))?;
        tracing::debug!("Backend responded with status {} ({} bytes)", status, body.len());

        Ok(TransportResponse { status, body })
    }
}

/// Parse a base URL and make sure it ends with `/` so endpoint paths append
fn normalize_base_url(base_url: &str) -> Result<Url, BackendError> {
    let trimmed = base_url.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash).map_err(|e| BackendError::InvalidUrl(format!("{trimmed}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(BackendError::InvalidUrl(format!(
            "{trimmed}: unsupported scheme '{scheme}'"
        ))),
    }
}

/// Flatten a reqwest error and its causes into one transport error
fn describe_error(error: &reqwest::Error) -> BackendError {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(&format!("\n  Caused by: {cause}"));
        source = cause.source();
    }
    BackendError::Transport(message)
}
