//! Shared options context for every widget under one host scope.
//!
//! DESIGN
//! ======
//! `BoopProvider` owns one mutable, still-partial options tree. Updates are
//! layered with [`combine`] (never resolved) so later updates can keep
//! overriding; `reset_options` restores the snapshot taken at construction.
//! Every mutation bumps a revision counter so widgets can tell their
//! resolved copy is stale without comparing trees.
//!
//! The handle is cheap to clone (`Arc` inner). Code running inside
//! [`BoopProvider::scope`] can reach it with [`use_boop`]; reaching for it
//! outside any scope is a programming error and panics immediately.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::config::ConfigError;
use crate::options::{Layer, combine, resolve};
use crate::submit::{FeedbackClient, SubmitError, SubmitRequest};
use crate::transport::FeedbackResponse;
use crate::types::{BoopOptions, FieldName, FieldValues, SubmitPayload};

const OUTSIDE_PROVIDER: &str = "use_boop must be used within a BoopProvider.";

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Submit(#[from] SubmitError),
}

struct ProviderInner {
    defaults: BoopOptions,
    options: RwLock<BoopOptions>,
    revision: AtomicU64,
    client: FeedbackClient,
}

#[derive(Clone)]
pub struct BoopProvider {
    inner: Arc<ProviderInner>,
}

impl std::fmt::Debug for BoopProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoopProvider").field("options", &self.options()).finish_non_exhaustive()
    }
}

impl BoopProvider {
    /// `default_options` is snapshotted; later changes to the caller's copy
    /// have no effect on [`reset_options`](Self::reset_options).
    pub fn new(default_options: Option<BoopOptions>, client: FeedbackClient) -> Self {
        let defaults = default_options.unwrap_or_default();
        let provider = Self {
            inner: Arc::new(ProviderInner {
                options: RwLock::new(defaults.clone()),
                revision: AtomicU64::new(0),
                defaults,
                client,
            }),
        };
        provider.sync_capture();
        provider
    }

    /// Provider over the HTTP transport configured from env.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitError::HttpClientBuild`] if the HTTP client cannot be built.
    pub fn from_env(default_options: Option<BoopOptions>) -> Result<Self, SubmitError> {
        Ok(Self::new(default_options, FeedbackClient::from_env()?))
    }

    #[must_use]
    pub fn client(&self) -> &FeedbackClient {
        &self.inner.client
    }

    /// Current options tree (a copy; mutate through the provider).
    #[must_use]
    pub fn options(&self) -> BoopOptions {
        self.inner.options.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Bumped by every mutation; starts at 0.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::Acquire)
    }

    /// Replace the whole tree.
    pub fn set_options(&self, options: BoopOptions) {
        self.modify(|current| *current = options);
    }

    /// Layer `updates` over the current tree.
    pub fn update_options(&self, updates: &BoopOptions) {
        self.modify(|current| *current = current.layer(updates));
    }

    /// Restore the construction-time snapshot.
    pub fn reset_options(&self) {
        let defaults = self.inner.defaults.clone();
        self.modify(|current| *current = defaults);
    }

    pub fn set_field_value(&self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        self.modify(|current| current.field_values.set(field, value));
    }

    /// Merge the given values; unset fields keep their current value.
    pub fn set_field_values(&self, values: &FieldValues) {
        self.modify(|current| current.field_values = current.field_values.layer(values));
    }

    /// Submit with the current tree plus `overrides`, resolved at call time
    /// so a provider-level project id derives the endpoint.
    ///
    /// # Errors
    ///
    /// - [`ProviderError::Config`] when the layered options do not resolve
    /// - [`ProviderError::Submit`] for validation or transport failures
    pub async fn submit_feedback(
        &self,
        payload: SubmitPayload,
        overrides: Option<&BoopOptions>,
    ) -> Result<FeedbackResponse, ProviderError> {
        let current = self.options();
        let resolved = resolve(Some(&combine(Some(&current), overrides)))?;
        debug!(endpoint = %resolved.endpoint, "provider submitting feedback");

        let response = self
            .inner
            .client
            .submit(SubmitRequest {
                endpoint: &resolved.endpoint,
                payload,
                callbacks: Some(&resolved.callbacks),
                metadata: resolved.metadata.as_ref(),
                url_resolver: resolved.url_resolver.as_ref(),
                include_stack_trace: resolved.include_stack_trace,
            })
            .await?;
        Ok(response)
    }

    /// Run `future` with this provider as the ambient context.
    pub fn scope<F: Future>(&self, future: F) -> impl Future<Output = F::Output> {
        CURRENT.scope(self.clone(), future)
    }

    /// Run `f` synchronously with this provider as the ambient context.
    pub fn sync_scope<R>(&self, f: impl FnOnce() -> R) -> R {
        CURRENT.sync_scope(self.clone(), f)
    }

    fn modify(&self, f: impl FnOnce(&mut BoopOptions)) {
        {
            let mut options = self.inner.options.write().unwrap_or_else(PoisonError::into_inner);
            f(&mut options);
            self.inner.revision.fetch_add(1, Ordering::AcqRel);
        }
        self.sync_capture();
    }

    fn sync_capture(&self) {
        let wants_capture = self.inner.options.read().unwrap_or_else(PoisonError::into_inner).include_stack_trace;
        if wants_capture == Some(true) {
            self.inner.client.diagnostics().ensure_installed();
        }
    }
}

// =============================================================================
// AMBIENT CONTEXT
// =============================================================================

tokio::task_local! {
    static CURRENT: BoopProvider;
}

/// The provider of the enclosing [`BoopProvider::scope`], if any.
#[must_use]
pub fn try_use_boop() -> Option<BoopProvider> {
    CURRENT.try_with(Clone::clone).ok()
}

/// The provider of the enclosing [`BoopProvider::scope`].
///
/// # Panics
///
/// Panics when called outside of any provider scope.
#[must_use]
pub fn use_boop() -> BoopProvider {
    try_use_boop().unwrap_or_else(|| panic!("{OUTSIDE_PROVIDER}"))
}

#[cfg(test)]
#[path = "provider_test.rs"]
mod tests;
