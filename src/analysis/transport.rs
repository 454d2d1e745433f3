//! The network seam: one request in, one raw response out.

use std::time::Instant;

use async_trait::async_trait;

use crate::analysis::request::AnalysisRequest;
use crate::error::TransportError;

/// Status line and body text of a response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
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

/// Issues an analysis request against the remote service.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    async fn fetch(&self, request: &AnalysisRequest) -> Result<RawResponse, TransportError>;
}

/// HTTP transport over `reqwest`.
pub struct HttpTransport {
    endpoint: String,
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(endpoint, reqwest::Client::new())
    }

    pub fn with_client(endpoint: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            endpoint: endpoint.into(),
            client,
        }
    }
}

#[async_trait]
impl AnalysisTransport for HttpTransport {
    async fn fetch(&self, request: &AnalysisRequest) -> Result<RawResponse, TransportError> {
        let started = Instant::now();

        let resp = self
            .client
            .get(&self.endpoint)
            .query(&request.query_pairs())
            .bearer_auth(request.bearer_token())
            .send()
            .await?;

        let status = resp.status().as_u16();
        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Body(e.to_string()))?;

        tracing::debug!(
            status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Analysis response received"
        );

        Ok(RawResponse { status, body })
    }
}
