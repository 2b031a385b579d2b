//! Headless feedback widget: form state, submit status, visibility and a
//! render descriptor. No DOM; a host renderer draws whatever `view()` says.
//!
//! DESIGN
//! ======
//! Options are resolved at construction, so a configuration error stops the
//! widget from existing at all. Inside a provider the resolved copy is
//! re-derived whenever the provider's revision moves: checked on every event,
//! `view()` and `submit()`. After that the widget is driven by:
//!
//! - [`UiEvent`]s from the host (clicks, keys, input)
//! - [`FeedbackWidget::submit`] (async, one request per call)
//! - [`FeedbackWidget::complete_task`] when a scheduled visibility task fires
//! - [`FeedbackWidget::refresh`] after provider options change
//!
//! Success-view helpers (`close`, `reset`) only queue actions; the widget
//! applies them on the next event or [`FeedbackWidget::apply_actions`] call,
//! so a renderer callback never re-enters the widget.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, warn};

use crate::animation::{AnimationState, MotionInput, MotionStyles, build_motion_styles, resolve_animation_state};
use crate::config::ConfigError;
use crate::options::{DEFAULT_SUBMIT_LABEL, ResolvedOptions, combine, resolve};
use crate::positioning::{PanelPlacementInput, resolve_panel_fixed_offset, resolve_panel_placement};
use crate::provider::BoopProvider;
use crate::styles::{StyleLookup, StyleMap, StyleSlot, default_theme, merge_class_names};
use crate::submit::{FeedbackClient, SubmitError, SubmitRequest};
use crate::transport::FeedbackResponse;
use crate::types::{
    BoopOptions, ButtonPlacement, FieldName, FieldValues, FieldValuesMode, FixedOffset, PanelPlacement, PanelVariant,
    RenderNode, SubmitPayload,
};
use crate::visibility::{Scheduler, TaskId, VisibilityController, VisibilityPhase, VisibilityTiming};

pub const SENDING_LABEL: &str = "Sending...";
pub const ATTRIBUTION_URL: &str = "https://shtbox.io";

const FIXED_BUTTON_Z_INDEX: &str = "10010";

// =============================================================================
// STATE TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitStatus {
    Idle,
    Submitting,
    Success(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WidgetAction {
    Close,
    Reset,
}

/// Handed to a custom success renderer. Calls are queued, not applied.
#[derive(Debug, Clone, Default)]
pub struct SuccessHelpers {
    queue: Arc<Mutex<Vec<WidgetAction>>>,
}

impl SuccessHelpers {
    pub fn close(&self) {
        self.push(WidgetAction::Close);
    }

    pub fn reset(&self) {
        self.push(WidgetAction::Reset);
    }

    fn push(&self, action: WidgetAction) {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).push(action);
    }

    fn drain(&self) -> Vec<WidgetAction> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

/// Input from the host's event source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    ButtonClick,
    CloseClick,
    OverlayClick,
    PanelPointerDown,
    KeyDown(String),
    FieldInput(FieldName, String),
    ResetSuccess,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Fields {
    name: String,
    email: String,
    message: String,
}

impl Fields {
    fn get(&self, field: FieldName) -> &str {
        match field {
            FieldName::Name => &self.name,
            FieldName::Email => &self.email,
            FieldName::Message => &self.message,
        }
    }

    fn slot(&mut self, field: FieldName) -> &mut String {
        match field {
            FieldName::Name => &mut self.name,
            FieldName::Email => &mut self.email,
            FieldName::Message => &mut self.message,
        }
    }
}

// =============================================================================
// VIEW DESCRIPTOR
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementView {
    pub class_name: String,
    pub style: StyleMap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonView {
    pub element: ElementView,
    pub label: String,
    pub placement: ButtonPlacement,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldView {
    pub field: FieldName,
    pub label: String,
    pub placeholder: String,
    pub value: String,
    pub container: ElementView,
    pub input: ElementView,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub element: ElementView,
    pub fields: Vec<FieldView>,
    pub submit: ElementView,
    pub submit_label: String,
    pub disabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuccessView {
    pub element: ElementView,
    /// Built-in text, shown only without a custom renderer.
    pub message: Option<String>,
    pub custom: Option<RenderNode>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelContent {
    Form(FormView),
    Success(SuccessView),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorView {
    pub container: ElementView,
    pub message: ElementView,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributionView {
    pub element: ElementView,
    pub href: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PanelView {
    pub visible: bool,
    pub placement: PanelPlacement,
    pub fixed_offset: Option<FixedOffset>,
    pub overlay: ElementView,
    pub panel: ElementView,
    pub header: ElementView,
    pub title: String,
    pub close: ElementView,
    pub close_label: String,
    pub content: PanelContent,
    pub footer: ElementView,
    pub error: Option<ErrorView>,
    pub footer_slot: Option<RenderNode>,
    pub attribution: Option<AttributionView>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WidgetView {
    pub dark_mode: bool,
    /// `"dark"` or `"light"`, for a `data-theme` attribute.
    pub theme: &'static str,
    pub root: ElementView,
    pub button: ButtonView,
    /// Present while the panel is mounted.
    pub panel: Option<PanelView>,
}

// =============================================================================
// WIDGET
// =============================================================================

pub struct FeedbackWidget<S: Scheduler> {
    provider: Option<BoopProvider>,
    instance: BoopOptions,
    resolved: ResolvedOptions,
    animation: AnimationState,
    client: FeedbackClient,
    visibility: VisibilityController<S>,
    fields: Fields,
    status: SubmitStatus,
    last_success: Option<SubmitPayload>,
    helpers: SuccessHelpers,
    panel_pointer_down: bool,
    provider_revision: u64,
}

impl<S: Scheduler> std::fmt::Debug for FeedbackWidget<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedbackWidget")
            .field("endpoint", &self.resolved.endpoint)
            .field("phase", &self.visibility.phase())
            .field("status", &self.status)
            .finish_non_exhaustive()
    }
}

impl<S: Scheduler> FeedbackWidget<S> {
    /// Layer `options` over the provider's tree (if any) and resolve.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingProjectId`] when the default endpoint is
    /// in use without a project id.
    pub fn new(
        provider: Option<BoopProvider>,
        options: Option<BoopOptions>,
        client: FeedbackClient,
        scheduler: S,
    ) -> Result<Self, ConfigError> {
        let instance = options.unwrap_or_default();
        let provider_revision = revision_of(provider.as_ref());
        let resolved = resolve_layers(provider.as_ref(), &instance)?;
        let animation = resolve_animation_state(Some(&resolved.animation), Some(&resolved.backdrop));
        let visibility =
            VisibilityController::new(scheduler, VisibilityTiming::from_state(&animation), resolved.callbacks.clone());

        let mut widget = Self {
            provider,
            instance,
            resolved,
            animation,
            client,
            visibility,
            fields: Fields::default(),
            status: SubmitStatus::Idle,
            last_success: None,
            helpers: SuccessHelpers::default(),
            panel_pointer_down: false,
            provider_revision,
        };
        widget.sync_capture();
        let seed = widget.resolved.field_values.clone();
        widget.set_field_values(&seed);
        if widget.resolved.behavior.auto_open {
            widget.open();
        }
        debug!(endpoint = %widget.resolved.endpoint, mode = ?widget.resolved.mode, "feedback widget ready");
        Ok(widget)
    }

    /// Widget sharing the provider's options and submission client.
    ///
    /// # Errors
    ///
    /// See [`FeedbackWidget::new`].
    pub fn within(provider: &BoopProvider, options: Option<BoopOptions>, scheduler: S) -> Result<Self, ConfigError> {
        Self::new(Some(provider.clone()), options, provider.client().clone(), scheduler)
    }

    // -------------------------------------------------------------------------
    // accessors
    // -------------------------------------------------------------------------

    #[must_use]
    pub fn options(&self) -> &ResolvedOptions {
        &self.resolved
    }

    #[must_use]
    pub fn status(&self) -> &SubmitStatus {
        &self.status
    }

    #[must_use]
    pub fn field_value(&self, field: FieldName) -> &str {
        self.fields.get(field)
    }

    #[must_use]
    pub fn last_success(&self) -> Option<&SubmitPayload> {
        self.last_success.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> VisibilityPhase {
        self.visibility.phase()
    }

    #[must_use]
    pub fn is_rendered(&self) -> bool {
        self.visibility.is_rendered()
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn scheduler(&self) -> &S {
        self.visibility.scheduler()
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        self.visibility.scheduler_mut()
    }

    #[must_use]
    pub fn helpers(&self) -> &SuccessHelpers {
        &self.helpers
    }

    // -------------------------------------------------------------------------
    // options
    // -------------------------------------------------------------------------

    /// Replace this instance's options and re-resolve.
    ///
    /// # Errors
    ///
    /// On a configuration error the previous options stay in effect.
    pub fn set_options(&mut self, options: BoopOptions) -> Result<(), ConfigError> {
        let revision = revision_of(self.provider.as_ref());
        let resolved = resolve_layers(self.provider.as_ref(), &options)?;
        self.instance = options;
        self.provider_revision = revision;
        self.apply_resolved(resolved);
        Ok(())
    }

    /// Re-read the provider's options. Controlled field values are re-applied.
    ///
    /// # Errors
    ///
    /// On a configuration error the previous options stay in effect.
    pub fn refresh(&mut self) -> Result<(), ConfigError> {
        let revision = revision_of(self.provider.as_ref());
        let resolved = resolve_layers(self.provider.as_ref(), &self.instance)?;
        self.provider_revision = revision;
        self.apply_resolved(resolved);
        Ok(())
    }

    /// Re-resolve only when the provider changed since the last resolution.
    /// A failed resolution leaves the revision unrecorded so the next call retries.
    fn sync_provider(&mut self) -> Result<(), ConfigError> {
        let revision = revision_of(self.provider.as_ref());
        if revision == self.provider_revision {
            return Ok(());
        }
        let resolved = resolve_layers(self.provider.as_ref(), &self.instance)?;
        debug!(revision, "widget picked up provider options");
        self.provider_revision = revision;
        self.apply_resolved(resolved);
        Ok(())
    }

    fn sync_or_keep(&mut self) {
        if let Err(err) = self.sync_provider() {
            warn!(error = %err, "provider options no longer resolve; keeping previous options");
        }
    }

    fn apply_resolved(&mut self, resolved: ResolvedOptions) {
        self.resolved = resolved;
        self.animation = resolve_animation_state(Some(&self.resolved.animation), Some(&self.resolved.backdrop));
        self.visibility.set_timing(VisibilityTiming::from_state(&self.animation));
        self.visibility.set_callbacks(self.resolved.callbacks.clone());
        self.sync_capture();
        if self.resolved.field_values_mode == FieldValuesMode::Controlled {
            let values = self.resolved.field_values.clone();
            self.set_field_values(&values);
        }
    }

    fn sync_capture(&self) {
        if self.resolved.include_stack_trace {
            self.client.diagnostics().ensure_installed();
        }
    }

    // -------------------------------------------------------------------------
    // fields
    // -------------------------------------------------------------------------

    pub fn set_field_value(&mut self, field: FieldName, value: impl Into<String>) {
        let value = value.into();
        self.resolved.callbacks.emit_field_change(field, &value);
        *self.fields.slot(field) = value;
    }

    /// Set every field present in `values`, in name/email/message order.
    pub fn set_field_values(&mut self, values: &FieldValues) {
        let present = [
            (FieldName::Name, &values.name),
            (FieldName::Email, &values.email),
            (FieldName::Message, &values.message),
        ];
        for (field, value) in present {
            if let Some(value) = value {
                self.set_field_value(field, value.clone());
            }
        }
    }

    // -------------------------------------------------------------------------
    // visibility
    // -------------------------------------------------------------------------

    /// Open the panel on the form (any previous status is cleared).
    pub fn open(&mut self) {
        self.sync_or_keep();
        self.status = SubmitStatus::Idle;
        self.visibility.open();
    }

    pub fn close(&mut self) {
        self.sync_or_keep();
        self.visibility.close();
    }

    /// Return from the success view to the form.
    pub fn reset_success(&mut self) {
        self.status = SubmitStatus::Idle;
    }

    /// Feed back a fired scheduler task.
    pub fn complete_task(&mut self, task: TaskId) -> bool {
        self.visibility.complete(task)
    }

    /// Apply actions queued through [`SuccessHelpers`].
    pub fn apply_actions(&mut self) {
        for action in self.helpers.drain() {
            match action {
                WidgetAction::Close => self.close(),
                WidgetAction::Reset => self.reset_success(),
            }
        }
    }

    pub fn handle_event(&mut self, event: UiEvent) {
        self.sync_or_keep();
        self.apply_actions();
        match event {
            UiEvent::ButtonClick => self.open(),
            UiEvent::CloseClick => self.close(),
            UiEvent::OverlayClick => {
                // A drag that started inside the panel and ended on the overlay is not a dismiss.
                if std::mem::take(&mut self.panel_pointer_down) {
                    return;
                }
                self.close();
            }
            UiEvent::PanelPointerDown => self.panel_pointer_down = true,
            UiEvent::KeyDown(key) => {
                self.visibility.handle_key(&key);
            }
            UiEvent::FieldInput(field, value) => self.set_field_value(field, value),
            UiEvent::ResetSuccess => self.reset_success(),
        }
    }

    // -------------------------------------------------------------------------
    // submit
    // -------------------------------------------------------------------------

    /// Submit the current field values.
    ///
    /// On success the message field is cleared (name/email kept) and the
    /// panel either closes or shows the success view. On failure every field
    /// is kept and the status carries the error text.
    ///
    /// # Errors
    ///
    /// Propagates the pipeline's [`SubmitError`] after recording it in the
    /// status. [`SubmitError::Config`] when the provider's current options no
    /// longer resolve; nothing is sent in that case.
    pub async fn submit(&mut self) -> Result<FeedbackResponse, SubmitError> {
        if let Err(err) = self.sync_provider() {
            let err = SubmitError::from(err);
            self.status = SubmitStatus::Error(err.to_string());
            return Err(err);
        }
        self.apply_actions();
        self.status = SubmitStatus::Submitting;
        let payload = SubmitPayload {
            name: non_blank(&self.fields.name),
            email: non_blank(&self.fields.email),
            message: self.fields.message.trim().to_string(),
            url: None,
            metadata: None,
        };

        let result = self
            .client
            .submit(SubmitRequest {
                endpoint: &self.resolved.endpoint,
                payload: payload.clone(),
                callbacks: Some(&self.resolved.callbacks),
                metadata: self.resolved.metadata.as_ref(),
                url_resolver: self.resolved.url_resolver.as_ref(),
                include_stack_trace: self.resolved.include_stack_trace,
            })
            .await;

        match result {
            Ok(response) => {
                self.status = SubmitStatus::Success(self.resolved.variant().success_message.clone());
                self.last_success = Some(payload);
                self.fields.message.clear();
                if self.resolved.behavior.close_on_submit {
                    self.close();
                }
                Ok(response)
            }
            Err(err) => {
                let text = err.to_string();
                let text = if text.is_empty() { self.resolved.variant().error_message.clone() } else { text };
                self.status = SubmitStatus::Error(text);
                Err(err)
            }
        }
    }

    // -------------------------------------------------------------------------
    // view
    // -------------------------------------------------------------------------

    fn shows_success(&self) -> bool {
        matches!(self.status, SubmitStatus::Success(_)) && !self.resolved.behavior.close_on_submit
    }

    fn panel_placement(&self) -> PanelPlacement {
        let variant = self.resolved.variant();
        resolve_panel_placement(PanelPlacementInput {
            mode: self.resolved.mode,
            raw_panel_placement: variant.panel.placement,
            raw_panel_fixed_offset: variant.panel.fixed_offset,
            button_placement: variant.button.placement,
        })
    }

    fn element(&self, slot: StyleSlot, lookup: &StyleLookup) -> ElementView {
        self.element_as(slot, slot.css_class(), lookup.get(slot))
    }

    fn element_as(&self, class_slot: StyleSlot, base_class: &str, style: StyleMap) -> ElementView {
        let custom = self.resolved.style.class_names.get(&class_slot).map(String::as_str);
        ElementView { class_name: merge_class_names(base_class, custom), style }
    }

    /// Everything a renderer needs for the current state, picking up any
    /// provider change first.
    pub fn view(&mut self) -> WidgetView {
        self.sync_or_keep();
        self.build_view()
    }

    fn build_view(&self) -> WidgetView {
        let r = &self.resolved;
        let variant = r.variant();
        let lookup = StyleLookup::new(r.dark_mode, r.style.use_default_styles, r.style.style_overrides.clone());

        let mut theme = default_theme(r.dark_mode);
        theme.extend(r.style.theme.iter().map(|(k, v)| (k.clone(), v.clone())));
        let mut root_style = lookup.get(StyleSlot::Root);
        root_style.extend(theme);
        let root_class = if r.dark_mode { "boop-root boop-dark" } else { "boop-root" };

        let mut button_style = lookup.get(StyleSlot::Button);
        if variant.button.placement == ButtonPlacement::Fixed {
            if r.style.use_default_styles {
                button_style.extend(lookup.get(StyleSlot::ButtonFixed));
            } else if variant.button.fixed_offset.is_some() {
                button_style.insert("position".into(), "fixed".into());
                button_style.insert("z-index".into(), FIXED_BUTTON_Z_INDEX.into());
            }
            if let Some(offset) = variant.button.fixed_offset {
                button_style.extend(offset.to_declarations().into_iter().map(|(k, v)| (k.to_string(), v)));
            }
        }

        WidgetView {
            dark_mode: r.dark_mode,
            theme: if r.dark_mode { "dark" } else { "light" },
            root: self.element_as(StyleSlot::Root, root_class, root_style),
            button: ButtonView {
                element: self.element_as(StyleSlot::Button, StyleSlot::Button.css_class(), button_style),
                label: variant.button.label.clone(),
                placement: variant.button.placement,
            },
            panel: self.is_rendered().then(|| self.panel_view(&lookup)),
        }
    }

    fn panel_view(&self, lookup: &StyleLookup) -> PanelView {
        let r = &self.resolved;
        let variant = r.variant();
        let widget_mode = r.mode == PanelVariant::Widget;
        let placement = self.panel_placement();
        let fixed_offset = (widget_mode && placement == PanelPlacement::Fixed)
            .then(|| resolve_panel_fixed_offset(variant.panel.fixed_offset, variant.button.fixed_offset));

        let motion: MotionStyles = build_motion_styles(MotionInput {
            mode: r.mode,
            panel_placement: placement,
            is_visible: self.is_visible(),
            animation_state: &self.animation,
            style_lookup: |slot| lookup.get(slot),
        });

        let mut overlay_style = motion.overlay_base_style;
        overlay_style.extend(motion.overlay_backdrop_style);
        overlay_style.extend(motion.overlay_transition_style);

        let mut panel_style = lookup.get(if widget_mode { StyleSlot::PanelWidget } else { StyleSlot::Panel });
        if let Some(offset) = fixed_offset {
            panel_style.insert("position".into(), "fixed".into());
            panel_style.extend(offset.to_declarations().into_iter().map(|(k, v)| (k.to_string(), v)));
        }
        if let Some(width) = &variant.panel.width {
            panel_style.insert("max-width".into(), width.to_string());
        }
        if let Some(max_height) = &variant.panel.max_height {
            panel_style.insert("max-height".into(), max_height.to_string());
        }
        panel_style.extend(motion.panel_transition_style);
        panel_style.extend(motion.panel_motion_style);

        let error = match &self.status {
            SubmitStatus::Error(text) => Some(ErrorView {
                container: self.element(StyleSlot::ErrorMessageContainer, lookup),
                message: self.element(StyleSlot::ErrorMessage, lookup),
                text: text.clone(),
            }),
            _ => None,
        };

        PanelView {
            visible: self.is_visible(),
            placement,
            fixed_offset,
            overlay: self.element_as(StyleSlot::Overlay, StyleSlot::Overlay.css_class(), overlay_style),
            panel: self.element_as(StyleSlot::Panel, StyleSlot::Panel.css_class(), panel_style),
            header: self.element(StyleSlot::Header, lookup),
            title: variant.title.clone(),
            close: self.element(StyleSlot::Close, lookup),
            close_label: variant.labels.close.clone(),
            content: if self.shows_success() { self.success_view(lookup) } else { self.form_view(lookup) },
            footer: self.element(StyleSlot::Footer, lookup),
            error,
            footer_slot: r.slots.footer.clone(),
            attribution: r.attribution.then(|| AttributionView {
                element: self.element(StyleSlot::Attribution, lookup),
                href: ATTRIBUTION_URL,
            }),
        }
    }

    fn success_view(&self, lookup: &StyleLookup) -> PanelContent {
        let r = &self.resolved;
        let custom = match (&r.on_success_renderer, &self.last_success) {
            (Some(renderer), Some(payload)) => Some(renderer.render(payload, &self.helpers)),
            _ => None,
        };
        PanelContent::Success(SuccessView {
            element: self.element_as(StyleSlot::Form, "boop-success", lookup.get(StyleSlot::Form)),
            message: r.on_success_renderer.is_none().then(|| r.variant().success_message.clone()),
            custom,
        })
    }

    fn form_view(&self, lookup: &StyleLookup) -> PanelContent {
        let variant = self.resolved.variant();
        let submitting = self.status == SubmitStatus::Submitting;
        let field = |field: FieldName, label: &str, placeholder: &str| {
            let input = if field == FieldName::Message {
                let mut style = lookup.get(StyleSlot::Input);
                style.extend(lookup.get(StyleSlot::Textarea));
                self.element_as(StyleSlot::Textarea, StyleSlot::Textarea.css_class(), style)
            } else {
                ElementView { class_name: String::new(), style: lookup.get(StyleSlot::Input) }
            };
            FieldView {
                field,
                label: label.to_string(),
                placeholder: placeholder.to_string(),
                value: self.fields.get(field).to_string(),
                container: self.element(StyleSlot::Field, lookup),
                input,
            }
        };
        let labels = &variant.labels;
        let placeholders = &variant.placeholders;
        let submit_label = labels.submit.clone().unwrap_or_else(|| {
            if submitting { SENDING_LABEL.to_string() } else { DEFAULT_SUBMIT_LABEL.to_string() }
        });

        PanelContent::Form(FormView {
            element: self.element(StyleSlot::Form, lookup),
            fields: vec![
                field(FieldName::Name, &labels.name, &placeholders.name),
                field(FieldName::Email, &labels.email, &placeholders.email),
                field(FieldName::Message, &labels.message, &placeholders.message),
            ],
            submit: self.element(StyleSlot::Submit, lookup),
            submit_label,
            disabled: submitting,
        })
    }
}

fn resolve_layers(provider: Option<&BoopProvider>, instance: &BoopOptions) -> Result<ResolvedOptions, ConfigError> {
    let shared = provider.map(BoopProvider::options);
    resolve(Some(&combine(shared.as_ref(), Some(instance))))
}

fn revision_of(provider: Option<&BoopProvider>) -> u64 {
    provider.map_or(0, BoopProvider::revision)
}

fn non_blank(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
#[path = "widget_test.rs"]
mod tests;
