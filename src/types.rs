//! Options tree: the partial, layered configuration a host hands the widget.
//!
//! DESIGN
//! ======
//! Every leaf is an `Option` so a layer can say "no opinion". Nested sub-trees
//! are plain structs (all-`None` by default) so merge rules can recurse
//! without unwrapping. Function-valued fields are wrapped in `Arc` newtypes so
//! the tree stays `Clone + Send + Sync` and can be shared with a provider.
//!
//! Serde reads the camelCase JSON shape; function-valued fields are skipped.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::styles::{StyleMap, StyleSlot, Theme};
use crate::submit::SubmitError;
use crate::transport::FeedbackResponse;
use crate::widget::SuccessHelpers;

/// Arbitrary key/value bag attached to every submission.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Opaque markup fragment handed back to the host renderer.
pub type RenderNode = String;

// =============================================================================
// ENUMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelVariant {
    #[default]
    Sidebar,
    Widget,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonPlacement {
    #[default]
    Inline,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PanelPlacement {
    #[default]
    Center,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Name,
    Email,
    Message,
}

impl FieldName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether externally supplied field values seed the form once or are forced
/// on every options update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldValuesMode {
    #[default]
    Initial,
    Controlled,
}

/// A CSS length: bare numbers are pixels, strings pass through (`"100%"`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Length {
    Px(f64),
    Css(String),
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Px(px) => write!(f, "{px}px"),
            Self::Css(raw) => f.write_str(raw),
        }
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// Pixel distances from the viewport edges. Absent sides stay absent.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedOffset {
    pub top: Option<f64>,
    pub right: Option<f64>,
    pub bottom: Option<f64>,
    pub left: Option<f64>,
}

impl FixedOffset {
    /// Present sides as `(property, value)` CSS pairs.
    #[must_use]
    pub fn to_declarations(&self) -> Vec<(&'static str, String)> {
        [("top", self.top), ("right", self.right), ("bottom", self.bottom), ("left", self.left)]
            .into_iter()
            .filter_map(|(side, value)| value.map(|v| (side, format!("{v}px"))))
            .collect()
    }
}

// =============================================================================
// VARIANT SUB-TREES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ButtonOptions {
    pub label: Option<String>,
    pub placement: Option<ButtonPlacement>,
    pub fixed_offset: Option<FixedOffset>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PanelOptions {
    pub placement: Option<PanelPlacement>,
    pub fixed_offset: Option<FixedOffset>,
    pub width: Option<Length>,
    pub max_height: Option<Length>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Labels {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub submit: Option<String>,
    pub close: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Placeholders {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

/// Text and placement for one panel variant (sidebar or widget).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VariantOptions {
    pub title: Option<String>,
    pub labels: Labels,
    pub placeholders: Placeholders,
    pub button: ButtonOptions,
    pub panel: PanelOptions,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

// =============================================================================
// BEHAVIOR / ANIMATION / BACKDROP
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BehaviorOptions {
    pub auto_open: Option<bool>,
    pub close_on_submit: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WidgetAnimation {
    pub fade: Option<bool>,
    pub slide: Option<bool>,
    pub grow: Option<bool>,
    pub slide_distance: Option<f64>,
    pub scale: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SidebarAnimation {
    pub slide: Option<bool>,
    pub slide_distance: Option<Length>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AnimationOptions {
    pub enabled: Option<bool>,
    pub duration_ms: Option<u64>,
    pub easing: Option<String>,
    pub widget: WidgetAnimation,
    pub sidebar: SidebarAnimation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BackdropOptions {
    pub enabled: Option<bool>,
    pub fade: Option<bool>,
}

// =============================================================================
// STYLE / SLOTS / FIELD VALUES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOptions {
    pub class_names: BTreeMap<StyleSlot, String>,
    pub style_overrides: BTreeMap<StyleSlot, StyleMap>,
    pub theme: Theme,
    pub use_default_styles: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Slots {
    pub footer: Option<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldValues {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

impl FieldValues {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.message.is_none()
    }

    pub fn set(&mut self, field: FieldName, value: impl Into<String>) {
        let slot = match field {
            FieldName::Name => &mut self.name,
            FieldName::Email => &mut self.email,
            FieldName::Message => &mut self.message,
        };
        *slot = Some(value.into());
    }
}

// =============================================================================
// CALLBACKS
// =============================================================================

type Hook = Arc<dyn Fn() + Send + Sync>;
type FieldHook = Arc<dyn Fn(FieldName, &str) + Send + Sync>;
type SuccessHook = Arc<dyn Fn(&FeedbackResponse) + Send + Sync>;
type ErrorHook = Arc<dyn Fn(&SubmitError) + Send + Sync>;

/// Lifecycle hooks. Each layer may set any subset; later layers win per hook.
#[derive(Clone, Default)]
pub struct Callbacks {
    pub on_open: Option<Hook>,
    pub on_close: Option<Hook>,
    pub on_submit_start: Option<Hook>,
    pub on_validation_error: Option<FieldHook>,
    pub on_field_change: Option<FieldHook>,
    pub on_submit_success: Option<SuccessHook>,
    pub on_submit_error: Option<ErrorHook>,
}

impl Callbacks {
    #[must_use]
    pub fn with_on_open(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_open = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_on_close(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_close = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_on_submit_start(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.on_submit_start = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_on_validation_error(mut self, f: impl Fn(FieldName, &str) + Send + Sync + 'static) -> Self {
        self.on_validation_error = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_on_field_change(mut self, f: impl Fn(FieldName, &str) + Send + Sync + 'static) -> Self {
        self.on_field_change = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_on_submit_success(mut self, f: impl Fn(&FeedbackResponse) + Send + Sync + 'static) -> Self {
        self.on_submit_success = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn with_on_submit_error(mut self, f: impl Fn(&SubmitError) + Send + Sync + 'static) -> Self {
        self.on_submit_error = Some(Arc::new(f));
        self
    }

    pub(crate) fn emit_open(&self) {
        if let Some(f) = &self.on_open {
            f();
        }
    }

    pub(crate) fn emit_close(&self) {
        if let Some(f) = &self.on_close {
            f();
        }
    }

    pub(crate) fn emit_submit_start(&self) {
        if let Some(f) = &self.on_submit_start {
            f();
        }
    }

    pub(crate) fn emit_validation_error(&self, field: FieldName, message: &str) {
        if let Some(f) = &self.on_validation_error {
            f(field, message);
        }
    }

    pub(crate) fn emit_field_change(&self, field: FieldName, value: &str) {
        if let Some(f) = &self.on_field_change {
            f(field, value);
        }
    }

    pub(crate) fn emit_submit_success(&self, response: &FeedbackResponse) {
        if let Some(f) = &self.on_submit_success {
            f(response);
        }
    }

    pub(crate) fn emit_submit_error(&self, error: &SubmitError) {
        if let Some(f) = &self.on_submit_error {
            f(error);
        }
    }
}

impl fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Callbacks")
            .field("on_open", &self.on_open.is_some())
            .field("on_close", &self.on_close.is_some())
            .field("on_submit_start", &self.on_submit_start.is_some())
            .field("on_validation_error", &self.on_validation_error.is_some())
            .field("on_field_change", &self.on_field_change.is_some())
            .field("on_submit_success", &self.on_submit_success.is_some())
            .field("on_submit_error", &self.on_submit_error.is_some())
            .finish()
    }
}

// =============================================================================
// FUNCTION-VALUED OPTIONS
// =============================================================================

/// Produces the "current page" URL attached to submissions.
#[derive(Clone)]
pub struct UrlResolver(Arc<dyn Fn() -> Option<String> + Send + Sync>);

impl UrlResolver {
    pub fn new(f: impl Fn() -> Option<String> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn resolve(&self) -> Option<String> {
        (self.0)()
    }
}

impl fmt::Debug for UrlResolver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UrlResolver(..)")
    }
}

/// Custom success view, given the submitted payload and `close`/`reset` helpers.
#[derive(Clone)]
pub struct SuccessRenderer(Arc<dyn Fn(&SubmitPayload, &SuccessHelpers) -> RenderNode + Send + Sync>);

impl SuccessRenderer {
    pub fn new(f: impl Fn(&SubmitPayload, &SuccessHelpers) -> RenderNode + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    #[must_use]
    pub fn render(&self, payload: &SubmitPayload, helpers: &SuccessHelpers) -> RenderNode {
        (self.0)(payload, helpers)
    }
}

impl fmt::Debug for SuccessRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SuccessRenderer(..)")
    }
}

// =============================================================================
// OPTIONS TREE
// =============================================================================

/// The partial options tree. Combine layers with [`crate::options::combine`]
/// and fill defaults with [`crate::options::resolve`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoopOptions {
    pub project_id: Option<String>,
    pub endpoint: Option<String>,
    pub dark_mode: Option<bool>,
    pub mode: Option<PanelVariant>,
    pub widget_options: VariantOptions,
    pub sidebar_options: VariantOptions,
    pub behavior: BehaviorOptions,
    #[serde(skip)]
    pub callbacks: Callbacks,
    pub style: StyleOptions,
    pub animation: AnimationOptions,
    pub backdrop: BackdropOptions,
    #[serde(skip)]
    pub url_resolver: Option<UrlResolver>,
    pub include_stack_trace: Option<bool>,
    #[serde(skip)]
    pub on_success_renderer: Option<SuccessRenderer>,
    pub metadata: Option<Metadata>,
    pub slots: Slots,
    pub attribution: Option<bool>,
    pub field_values: FieldValues,
    pub field_values_mode: Option<FieldValuesMode>,
}

// =============================================================================
// SUBMISSION PAYLOAD
// =============================================================================

/// What the user submitted. `message` is mandatory; the rest is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SubmitPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl SubmitPayload {
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), ..Self::default() }
    }
}
