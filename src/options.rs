//! Option layering (`combine`) and default filling (`resolve`).
//!
//! DESIGN
//! ======
//! Layers stack as defaults -> provider -> instance -> explicit overrides.
//! `combine` is partial-in, partial-out so it can be applied repeatedly (the
//! provider folds every `update_options` call through it). `resolve` runs
//! once per render/request and produces a tree with no unset fields.
//!
//! MERGE RULES
//! ===========
//! - Scalars: the override wins when set; an unset override never erases.
//! - Variant trees (labels, placeholders, button, panel), style trees
//!   (class names, per-slot overrides, theme), animation trees (widget,
//!   sidebar), behavior, backdrop, callbacks, slots, field values, metadata:
//!   merged key-by-key, override wins on collision.
//! - `endpoint`: an override equal to the default sentinel does not displace
//!   a base that names a custom endpoint.
//! - `projectId`: the innermost non-blank value wins.

use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ConfigError;
use crate::styles::{StyleMap, StyleSlot, Theme};
use crate::types::*;

/// Hosted collection service. Requests go to `{DEFAULT_ENDPOINT}/{projectId}`
/// unless an explicit endpoint is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.boop.dev/v1/feedback";

pub const DEFAULT_ANIMATION_DURATION_MS: u64 = 220;
pub const DEFAULT_EASING: &str = "cubic-bezier(0.22, 1, 0.36, 1)";
pub const DEFAULT_WIDGET_SLIDE_DISTANCE: f64 = 12.0;
pub const DEFAULT_WIDGET_SCALE: f64 = 0.98;
pub const DEFAULT_SIDEBAR_SLIDE_DISTANCE: &str = "100%";

const DEFAULT_TITLE: &str = "Send feedback";
const DEFAULT_BUTTON_LABEL: &str = "Feedback";
const DEFAULT_SUCCESS_MESSAGE: &str = "Thanks for the feedback!";
const DEFAULT_ERROR_MESSAGE: &str = "Unable to submit feedback.";
/// Submit button text when no `labels.submit` is configured and nothing is in flight.
pub const DEFAULT_SUBMIT_LABEL: &str = "Send feedback";

// =============================================================================
// LAYERING
// =============================================================================

/// A sub-tree that knows how to place an override layer on top of itself.
pub trait Layer {
    #[must_use]
    fn layer(&self, overrides: &Self) -> Self;
}

fn pick<T: Clone>(base: &Option<T>, overrides: &Option<T>) -> Option<T> {
    overrides.clone().or_else(|| base.clone())
}

fn merge_maps<K: Ord + Clone, V: Clone>(base: &BTreeMap<K, V>, overrides: &BTreeMap<K, V>) -> BTreeMap<K, V> {
    let mut merged = base.clone();
    merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    merged
}

impl Layer for FixedOffset {
    fn layer(&self, o: &Self) -> Self {
        Self {
            top: o.top.or(self.top),
            right: o.right.or(self.right),
            bottom: o.bottom.or(self.bottom),
            left: o.left.or(self.left),
        }
    }
}

impl Layer for Labels {
    fn layer(&self, o: &Self) -> Self {
        Self {
            name: pick(&self.name, &o.name),
            email: pick(&self.email, &o.email),
            message: pick(&self.message, &o.message),
            submit: pick(&self.submit, &o.submit),
            close: pick(&self.close, &o.close),
        }
    }
}

impl Layer for Placeholders {
    fn layer(&self, o: &Self) -> Self {
        Self {
            name: pick(&self.name, &o.name),
            email: pick(&self.email, &o.email),
            message: pick(&self.message, &o.message),
        }
    }
}

impl Layer for ButtonOptions {
    fn layer(&self, o: &Self) -> Self {
        Self {
            label: pick(&self.label, &o.label),
            placement: o.placement.or(self.placement),
            fixed_offset: o.fixed_offset.or(self.fixed_offset),
        }
    }
}

impl Layer for PanelOptions {
    fn layer(&self, o: &Self) -> Self {
        Self {
            placement: o.placement.or(self.placement),
            fixed_offset: o.fixed_offset.or(self.fixed_offset),
            width: pick(&self.width, &o.width),
            max_height: pick(&self.max_height, &o.max_height),
        }
    }
}

impl Layer for VariantOptions {
    fn layer(&self, o: &Self) -> Self {
        Self {
            title: pick(&self.title, &o.title),
            labels: self.labels.layer(&o.labels),
            placeholders: self.placeholders.layer(&o.placeholders),
            button: self.button.layer(&o.button),
            panel: self.panel.layer(&o.panel),
            success_message: pick(&self.success_message, &o.success_message),
            error_message: pick(&self.error_message, &o.error_message),
        }
    }
}

impl Layer for BehaviorOptions {
    fn layer(&self, o: &Self) -> Self {
        Self {
            auto_open: o.auto_open.or(self.auto_open),
            close_on_submit: o.close_on_submit.or(self.close_on_submit),
        }
    }
}

impl Layer for WidgetAnimation {
    fn layer(&self, o: &Self) -> Self {
        Self {
            fade: o.fade.or(self.fade),
            slide: o.slide.or(self.slide),
            grow: o.grow.or(self.grow),
            slide_distance: o.slide_distance.or(self.slide_distance),
            scale: o.scale.or(self.scale),
        }
    }
}

impl Layer for SidebarAnimation {
    fn layer(&self, o: &Self) -> Self {
        Self { slide: o.slide.or(self.slide), slide_distance: pick(&self.slide_distance, &o.slide_distance) }
    }
}

impl Layer for AnimationOptions {
    fn layer(&self, o: &Self) -> Self {
        Self {
            enabled: o.enabled.or(self.enabled),
            duration_ms: o.duration_ms.or(self.duration_ms),
            easing: pick(&self.easing, &o.easing),
            widget: self.widget.layer(&o.widget),
            sidebar: self.sidebar.layer(&o.sidebar),
        }
    }
}

impl Layer for BackdropOptions {
    fn layer(&self, o: &Self) -> Self {
        Self { enabled: o.enabled.or(self.enabled), fade: o.fade.or(self.fade) }
    }
}

impl Layer for StyleOptions {
    fn layer(&self, o: &Self) -> Self {
        Self {
            class_names: merge_maps(&self.class_names, &o.class_names),
            style_overrides: merge_maps(&self.style_overrides, &o.style_overrides),
            theme: merge_maps(&self.theme, &o.theme),
            use_default_styles: o.use_default_styles.or(self.use_default_styles),
        }
    }
}

impl Layer for Callbacks {
    fn layer(&self, o: &Self) -> Self {
        Self {
            on_open: pick(&self.on_open, &o.on_open),
            on_close: pick(&self.on_close, &o.on_close),
            on_submit_start: pick(&self.on_submit_start, &o.on_submit_start),
            on_validation_error: pick(&self.on_validation_error, &o.on_validation_error),
            on_field_change: pick(&self.on_field_change, &o.on_field_change),
            on_submit_success: pick(&self.on_submit_success, &o.on_submit_success),
            on_submit_error: pick(&self.on_submit_error, &o.on_submit_error),
        }
    }
}

impl Layer for Slots {
    fn layer(&self, o: &Self) -> Self {
        Self { footer: pick(&self.footer, &o.footer) }
    }
}

impl Layer for FieldValues {
    fn layer(&self, o: &Self) -> Self {
        Self {
            name: pick(&self.name, &o.name),
            email: pick(&self.email, &o.email),
            message: pick(&self.message, &o.message),
        }
    }
}

/// Shallow-merge two metadata bags; `None` only when both are absent.
#[must_use]
pub fn merge_metadata(base: Option<&Metadata>, overrides: Option<&Metadata>) -> Option<Metadata> {
    if base.is_none() && overrides.is_none() {
        return None;
    }
    let mut merged = base.cloned().unwrap_or_default();
    if let Some(overrides) = overrides {
        merged.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    }
    Some(merged)
}

/// True when `endpoint` names the built-in collection service.
#[must_use]
pub fn is_default_endpoint(endpoint: &str) -> bool {
    endpoint.trim_end_matches('/') == DEFAULT_ENDPOINT.trim_end_matches('/')
}

fn pick_endpoint(base: Option<&String>, overrides: Option<&String>) -> Option<String> {
    match (base, overrides) {
        (Some(b), Some(o)) if is_default_endpoint(o) && !is_default_endpoint(b) => Some(b.clone()),
        (b, o) => o.or(b).cloned(),
    }
}

fn pick_project_id(base: Option<&String>, overrides: Option<&String>) -> Option<String> {
    match overrides {
        Some(o) if !o.trim().is_empty() => Some(o.clone()),
        _ => base.or(overrides).cloned(),
    }
}

impl Layer for BoopOptions {
    fn layer(&self, o: &Self) -> Self {
        Self {
            project_id: pick_project_id(self.project_id.as_ref(), o.project_id.as_ref()),
            endpoint: pick_endpoint(self.endpoint.as_ref(), o.endpoint.as_ref()),
            dark_mode: o.dark_mode.or(self.dark_mode),
            mode: o.mode.or(self.mode),
            widget_options: self.widget_options.layer(&o.widget_options),
            sidebar_options: self.sidebar_options.layer(&o.sidebar_options),
            behavior: self.behavior.layer(&o.behavior),
            callbacks: self.callbacks.layer(&o.callbacks),
            style: self.style.layer(&o.style),
            animation: self.animation.layer(&o.animation),
            backdrop: self.backdrop.layer(&o.backdrop),
            url_resolver: pick(&self.url_resolver, &o.url_resolver),
            include_stack_trace: o.include_stack_trace.or(self.include_stack_trace),
            on_success_renderer: pick(&self.on_success_renderer, &o.on_success_renderer),
            metadata: merge_metadata(self.metadata.as_ref(), o.metadata.as_ref()),
            slots: self.slots.layer(&o.slots),
            attribution: Some(o.attribution.or(self.attribution).unwrap_or(true)),
            field_values: self.field_values.layer(&o.field_values),
            field_values_mode: o.field_values_mode.or(self.field_values_mode),
        }
    }
}

/// Layer `overrides` on top of `base`. Either side may be absent.
#[must_use]
pub fn combine(base: Option<&BoopOptions>, overrides: Option<&BoopOptions>) -> BoopOptions {
    let empty = BoopOptions::default();
    base.unwrap_or(&empty).layer(overrides.unwrap_or(&empty))
}

// =============================================================================
// RESOLVED TREE
// =============================================================================

/// Labels with every field filled. `submit` stays optional so the renderer
/// can show a progress label while a submission is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLabels {
    pub name: String,
    pub email: String,
    pub message: String,
    pub submit: Option<String>,
    pub close: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPlaceholders {
    pub name: String,
    pub email: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedButton {
    pub label: String,
    pub placement: ButtonPlacement,
    pub fixed_offset: Option<FixedOffset>,
}

/// One variant with defaults applied. `panel` is kept as configured: its
/// placement is resolved by [`crate::positioning`] because the default
/// depends on the button.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedVariant {
    pub title: String,
    pub labels: ResolvedLabels,
    pub placeholders: ResolvedPlaceholders,
    pub button: ResolvedButton,
    pub panel: PanelOptions,
    pub success_message: String,
    pub error_message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedBehavior {
    pub auto_open: bool,
    pub close_on_submit: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    pub class_names: BTreeMap<StyleSlot, String>,
    pub style_overrides: BTreeMap<StyleSlot, StyleMap>,
    pub theme: Theme,
    pub use_default_styles: bool,
}

/// Fully-defaulted configuration used directly by rendering and submission.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub endpoint: String,
    /// Trimmed project id; informational when an explicit endpoint is set.
    pub project_id: Option<String>,
    pub dark_mode: bool,
    pub mode: PanelVariant,
    pub widget_options: ResolvedVariant,
    pub sidebar_options: ResolvedVariant,
    pub behavior: ResolvedBehavior,
    /// Animation options with every default filled in.
    pub animation: AnimationOptions,
    pub backdrop: BackdropOptions,
    pub callbacks: Callbacks,
    pub style: ResolvedStyle,
    pub url_resolver: Option<UrlResolver>,
    pub include_stack_trace: bool,
    pub on_success_renderer: Option<SuccessRenderer>,
    pub metadata: Option<Metadata>,
    pub slots: Slots,
    pub attribution: bool,
    pub field_values: FieldValues,
    pub field_values_mode: FieldValuesMode,
}

impl ResolvedOptions {
    /// The variant selected by `mode`.
    #[must_use]
    pub fn variant(&self) -> &ResolvedVariant {
        match self.mode {
            PanelVariant::Widget => &self.widget_options,
            PanelVariant::Sidebar => &self.sidebar_options,
        }
    }
}

fn or_default(value: Option<&String>, default: &str) -> String {
    value.cloned().unwrap_or_else(|| default.to_string())
}

fn resolve_variant(v: &VariantOptions) -> ResolvedVariant {
    ResolvedVariant {
        title: or_default(v.title.as_ref(), DEFAULT_TITLE),
        labels: ResolvedLabels {
            name: or_default(v.labels.name.as_ref(), "Name"),
            email: or_default(v.labels.email.as_ref(), "Email"),
            message: or_default(v.labels.message.as_ref(), "Message"),
            submit: v.labels.submit.clone(),
            close: or_default(v.labels.close.as_ref(), "Close feedback"),
        },
        placeholders: ResolvedPlaceholders {
            name: or_default(v.placeholders.name.as_ref(), "Your name"),
            email: or_default(v.placeholders.email.as_ref(), "you@example.com"),
            message: or_default(v.placeholders.message.as_ref(), "What would you like to share?"),
        },
        button: ResolvedButton {
            label: or_default(v.button.label.as_ref(), DEFAULT_BUTTON_LABEL),
            placement: v.button.placement.unwrap_or_default(),
            fixed_offset: v.button.fixed_offset,
        },
        panel: v.panel.clone(),
        success_message: or_default(v.success_message.as_ref(), DEFAULT_SUCCESS_MESSAGE),
        error_message: or_default(v.error_message.as_ref(), DEFAULT_ERROR_MESSAGE),
    }
}

/// The built-in animation tree, every field set.
#[must_use]
pub fn default_animation_options() -> AnimationOptions {
    AnimationOptions {
        enabled: Some(true),
        duration_ms: Some(DEFAULT_ANIMATION_DURATION_MS),
        easing: Some(DEFAULT_EASING.to_string()),
        widget: WidgetAnimation {
            fade: Some(true),
            slide: Some(true),
            grow: Some(true),
            slide_distance: Some(DEFAULT_WIDGET_SLIDE_DISTANCE),
            scale: Some(DEFAULT_WIDGET_SCALE),
        },
        sidebar: SidebarAnimation {
            slide: Some(true),
            slide_distance: Some(Length::Css(DEFAULT_SIDEBAR_SLIDE_DISTANCE.to_string())),
        },
    }
}

fn resolve_endpoint(endpoint: Option<&str>, project_id: Option<&str>) -> Result<String, ConfigError> {
    let endpoint = endpoint.unwrap_or(DEFAULT_ENDPOINT);
    if !is_default_endpoint(endpoint) {
        return Ok(endpoint.to_string());
    }
    let project_id = project_id.ok_or(ConfigError::MissingProjectId)?;
    Ok(format!("{}/{project_id}", DEFAULT_ENDPOINT.trim_end_matches('/')))
}

/// Fill every unset field with its default and derive the endpoint.
///
/// # Errors
///
/// Returns [`ConfigError::MissingProjectId`] when the default endpoint is in
/// use and no non-blank `projectId` is configured. An explicit endpoint
/// bypasses the requirement.
pub fn resolve(options: Option<&BoopOptions>) -> Result<ResolvedOptions, ConfigError> {
    let empty = BoopOptions::default();
    let o = options.unwrap_or(&empty);

    let project_id = o
        .project_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);
    let endpoint = resolve_endpoint(o.endpoint.as_deref(), project_id.as_deref())?;
    debug!(%endpoint, project_id = project_id.as_deref().unwrap_or(""), "resolved options endpoint");

    Ok(ResolvedOptions {
        endpoint,
        project_id,
        dark_mode: o.dark_mode.unwrap_or(false),
        mode: o.mode.unwrap_or_default(),
        widget_options: resolve_variant(&o.widget_options),
        sidebar_options: resolve_variant(&o.sidebar_options),
        behavior: ResolvedBehavior {
            auto_open: o.behavior.auto_open.unwrap_or(false),
            close_on_submit: o.behavior.close_on_submit.unwrap_or(false),
        },
        animation: default_animation_options().layer(&o.animation),
        backdrop: BackdropOptions { enabled: Some(true), fade: Some(true) }.layer(&o.backdrop),
        callbacks: o.callbacks.clone(),
        style: ResolvedStyle {
            class_names: o.style.class_names.clone(),
            style_overrides: o.style.style_overrides.clone(),
            theme: o.style.theme.clone(),
            use_default_styles: o.style.use_default_styles.unwrap_or(true),
        },
        url_resolver: o.url_resolver.clone(),
        include_stack_trace: o.include_stack_trace.unwrap_or(false),
        on_success_renderer: o.on_success_renderer.clone(),
        metadata: o.metadata.clone(),
        slots: o.slots.clone(),
        attribution: o.attribution.unwrap_or(true),
        field_values: o.field_values.clone(),
        field_values_mode: o.field_values_mode.unwrap_or_default(),
    })
}

#[cfg(test)]
#[path = "options_test.rs"]
mod tests;
