//! HTTP transport to the decision service.
//!
//! [`DecisionClient`] is the seam the gate dispatches through; the native
//! implementation, [`HttpDecisionClient`], is a thin wrapper over a pooled
//! [`reqwest::Client`]. It sends exactly one POST per call. There are no
//! retries and no timeout beyond the transport default.

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;

use crate::error::{GateError, Result};

/// Status and body of a decision-service response, not yet interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawDecision {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text. Never empty.
    pub body: String,
}

/// Transport used to reach the decision service.
#[async_trait]
pub trait DecisionClient: Send + Sync {
    /// POST `body` as JSON to `base_url` joined with `path`.
    ///
    /// A non-2xx status with a body is a normal result. Network and I/O
    /// failures, and a response with no body, are errors.
    async fn send(&self, base_url: &str, path: &str, body: Vec<u8>) -> Result<RawDecision>;
}

/// Join a base URL and a policy path with exactly one `/` between them.
pub fn decision_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// [`DecisionClient`] backed by [`reqwest`].
///
/// Cloning is cheap and clones share the connection pool, so one client
/// should serve every concurrent save.
#[derive(Debug, Clone, Default)]
pub struct HttpDecisionClient {
    http: reqwest::Client,
}

impl HttpDecisionClient {
    /// Create a client with reqwest's default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an already configured reqwest client (proxies, TLS roots, ...).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl DecisionClient for HttpDecisionClient {
    async fn send(&self, base_url: &str, path: &str, body: Vec<u8>) -> Result<RawDecision> {
        let url = decision_url(base_url, path);
        debug!(url = %url, bytes = body.len(), "sending decision request");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json; charset=utf-8")
            .body(body)
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;
        if text.is_empty() {
            return Err(GateError::EmptyResponse);
        }

        debug!(status, body = %text, "decision response received");
        Ok(RawDecision { status, body: text })
    }
}
