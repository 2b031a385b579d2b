//! HTTP transport for feedback submissions.
//!
//! DESIGN
//! ======
//! `FeedbackTransport` is the only network seam: one JSON POST, one response.
//! The transport never interprets the status code; the submission pipeline
//! decides what counts as success so a mock transport exercises the same
//! rules as the real one.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use serde::Serialize;

use crate::submit::SubmitError;
use crate::types::Metadata;

const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// WIRE TYPES
// =============================================================================

/// JSON body of a submission. Absent fields are omitted, never sent empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

/// Status and raw body of the endpoint's reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackResponse {
    pub status: u16,
    pub body: String,
}

impl FeedbackResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

// =============================================================================
// TRAIT
// =============================================================================

#[async_trait]
pub trait FeedbackTransport: Send + Sync {
    /// POST `body` as JSON to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::Request`] when no response could be obtained.
    async fn post_json(&self, endpoint: &str, body: &FeedbackBody) -> Result<FeedbackResponse, SubmitError>;
}

// =============================================================================
// REQWEST IMPLEMENTATION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for TransportTimeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

impl TransportTimeouts {
    /// Read `BOOP_REQUEST_TIMEOUT_SECS` / `BOOP_CONNECT_TIMEOUT_SECS`,
    /// keeping the defaults for unset or unparsable values.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            request_secs: env_parse_u64("BOOP_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("BOOP_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

pub struct HttpTransport {
    http: reqwest::Client,
}

impl HttpTransport {
    /// # Errors
    ///
    /// Returns [`SubmitError::HttpClientBuild`] if the client cannot be built.
    pub fn new(timeouts: TransportTimeouts) -> Result<Self, SubmitError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeouts.request_secs))
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .build()
            .map_err(|e| SubmitError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http })
    }

    /// # Errors
    ///
    /// Returns [`SubmitError::HttpClientBuild`] if the client cannot be built.
    pub fn from_env() -> Result<Self, SubmitError> {
        Self::new(TransportTimeouts::from_env())
    }
}

#[async_trait]
impl FeedbackTransport for HttpTransport {
    async fn post_json(&self, endpoint: &str, body: &FeedbackBody) -> Result<FeedbackResponse, SubmitError> {
        let response = self
            .http
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| SubmitError::Request(e.to_string()))?;

        let status = response.status();
        // A failed reply must keep its status even when the body is unreadable.
        let body = if status.is_success() {
            response.text().await.map_err(|e| SubmitError::Request(e.to_string()))?
        } else {
            response.text().await.unwrap_or_default()
        };
        let status = status.as_u16();

        Ok(FeedbackResponse { status, body })
    }
}

#[cfg(test)]
#[path = "transport_test.rs"]
mod tests;
