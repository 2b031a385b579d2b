//! Submission pipeline: validate, enrich, POST once, report.
//!
//! DESIGN
//! ======
//! Callback order is fixed: either a single validation error (terminal,
//! nothing sent), or submit-start followed by exactly one of submit-success /
//! submit-error. Every failure after validation is reported through the
//! callback AND returned, so callers can rely on either signal.
//!
//! There are no retries and no cancellation; a caller that no longer cares
//! about the result simply ignores it.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::ConfigError;
use crate::diagnostics::DiagnosticsService;
use crate::transport::{FeedbackBody, FeedbackResponse, FeedbackTransport, HttpTransport};
use crate::types::{Callbacks, FieldName, Metadata, SubmitPayload, UrlResolver};
use crate::url::default_url_resolver;

pub const MESSAGE_REQUIRED: &str = "Please add a feedback message.";
pub const EMAIL_INVALID: &str = "Please provide a valid email address.";

/// Metadata key under which the diagnostics snapshot is attached.
pub const STACK_METADATA_KEY: &str = "stack";

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    /// A field failed client-side validation; nothing was sent.
    #[error("{message}")]
    Validation { field: FieldName, message: String },

    /// The request could not be sent or its response could not be read.
    #[error("Request failed: {0}")]
    Request(String),

    /// The endpoint answered with a non-2xx status.
    #[error("Request failed with status {status}")]
    Status { status: u16 },

    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// The options in effect at submit time no longer resolve; nothing was sent.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl SubmitError {
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }
}

// =============================================================================
// VALIDATION
// =============================================================================

fn email_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").ok()).as_ref()
}

/// Permissive shape check. An empty address is valid (the field is optional).
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    email.is_empty() || email_pattern().is_some_and(|re| re.is_match(email))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Trim the user-entered fields and check them, message first.
///
/// # Errors
///
/// Returns [`SubmitError::Validation`] for a blank message or a malformed email.
pub fn validate(payload: &SubmitPayload) -> Result<SubmitPayload, SubmitError> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(SubmitError::Validation { field: FieldName::Message, message: MESSAGE_REQUIRED.to_string() });
    }
    let email = non_blank(payload.email.as_deref());
    if !is_valid_email(email.as_deref().unwrap_or("")) {
        return Err(SubmitError::Validation { field: FieldName::Email, message: EMAIL_INVALID.to_string() });
    }
    Ok(SubmitPayload {
        name: non_blank(payload.name.as_deref()),
        email,
        message: message.to_string(),
        url: payload.url.clone(),
        metadata: payload.metadata.clone(),
    })
}

// =============================================================================
// PIPELINE
// =============================================================================

/// One submission, with everything already resolved except the URL.
pub struct SubmitRequest<'a> {
    pub endpoint: &'a str,
    pub payload: SubmitPayload,
    pub callbacks: Option<&'a Callbacks>,
    /// Host-level metadata; `payload.metadata` wins per key.
    pub metadata: Option<&'a Metadata>,
    pub url_resolver: Option<&'a UrlResolver>,
    pub include_stack_trace: bool,
}

impl<'a> SubmitRequest<'a> {
    pub fn new(endpoint: &'a str, payload: SubmitPayload) -> Self {
        Self { endpoint, payload, callbacks: None, metadata: None, url_resolver: None, include_stack_trace: false }
    }
}

/// Sends submissions through a transport, attaching diagnostics on request.
#[derive(Clone)]
pub struct FeedbackClient {
    transport: Arc<dyn FeedbackTransport>,
    diagnostics: Arc<DiagnosticsService>,
}

impl std::fmt::Debug for FeedbackClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackClient").finish_non_exhaustive()
    }
}

impl FeedbackClient {
    pub fn new(transport: Arc<dyn FeedbackTransport>, diagnostics: Arc<DiagnosticsService>) -> Self {
        Self { transport, diagnostics }
    }

    /// HTTP transport configured from env, process-wide diagnostics.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn from_env() -> Result<Self, SubmitError> {
        Ok(Self::new(Arc::new(HttpTransport::from_env()?), DiagnosticsService::global()))
    }

    #[must_use]
    pub fn diagnostics(&self) -> &Arc<DiagnosticsService> {
        &self.diagnostics
    }

    /// Validate and send one submission.
    ///
    /// # Errors
    ///
    /// - [`SubmitError::Validation`] before anything is sent
    /// - [`SubmitError::Request`] when the transport fails
    /// - [`SubmitError::Status`] for a non-2xx reply
    pub async fn submit(&self, request: SubmitRequest<'_>) -> Result<FeedbackResponse, SubmitError> {
        let empty = Callbacks::default();
        let callbacks = request.callbacks.unwrap_or(&empty);

        let payload = match validate(&request.payload) {
            Ok(payload) => payload,
            Err(err) => {
                if let SubmitError::Validation { field, message } = &err {
                    debug!(%field, "feedback validation failed");
                    callbacks.emit_validation_error(*field, message);
                }
                return Err(err);
            }
        };

        callbacks.emit_submit_start();

        let metadata = self.resolve_metadata(request.metadata, payload.metadata.as_ref(), request.include_stack_trace);
        let url = payload
            .url
            .clone()
            .or_else(|| request.url_resolver.and_then(UrlResolver::resolve))
            .or_else(default_url_resolver);

        let body = FeedbackBody { url, name: payload.name, email: payload.email, message: payload.message, metadata };
        debug!(endpoint = request.endpoint, "sending feedback");

        match self.send(request.endpoint, &body).await {
            Ok(response) => {
                info!(endpoint = request.endpoint, status = response.status, "feedback submitted");
                callbacks.emit_submit_success(&response);
                Ok(response)
            }
            Err(err) => {
                warn!(endpoint = request.endpoint, error = %err, "feedback submission failed");
                callbacks.emit_submit_error(&err);
                Err(err)
            }
        }
    }

    async fn send(&self, endpoint: &str, body: &FeedbackBody) -> Result<FeedbackResponse, SubmitError> {
        let response = self.transport.post_json(endpoint, body).await?;
        if !response.is_success() {
            return Err(SubmitError::Status { status: response.status });
        }
        Ok(response)
    }

    fn resolve_metadata(
        &self,
        host: Option<&Metadata>,
        payload: Option<&Metadata>,
        include_stack_trace: bool,
    ) -> Option<Metadata> {
        let mut merged = crate::options::merge_metadata(host, payload);
        if !include_stack_trace {
            return merged;
        }

        self.diagnostics.ensure_installed();
        let Some(snapshot) = self.diagnostics.snapshot() else {
            return merged;
        };
        if merged.as_ref().is_some_and(|m| m.contains_key(STACK_METADATA_KEY)) {
            return merged;
        }
        match serde_json::to_value(&snapshot) {
            Ok(value) => {
                merged.get_or_insert_with(Metadata::new).insert(STACK_METADATA_KEY.to_string(), value);
            }
            Err(e) => warn!(error = %e, "diagnostics snapshot not serializable"),
        }
        merged
    }
}

#[cfg(test)]
#[path = "submit_test.rs"]
mod tests;
