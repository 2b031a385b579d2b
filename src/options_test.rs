use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use serde_json::json;

use super::*;

fn metadata(value: serde_json::Value) -> Metadata {
    value.as_object().cloned().unwrap()
}

// =============================================================
// resolve: endpoint derivation
// =============================================================

#[test]
fn resolve_without_project_id_on_default_endpoint_errors() {
    let err = resolve(None).unwrap_err();
    assert!(matches!(err, ConfigError::MissingProjectId));

    let blank = BoopOptions { project_id: Some("   ".into()), ..BoopOptions::default() };
    assert!(matches!(resolve(Some(&blank)), Err(ConfigError::MissingProjectId)));
}

#[test]
fn resolve_trims_project_id_and_appends_it() {
    let options = BoopOptions { project_id: Some("  abc  ".into()), ..BoopOptions::default() };
    let resolved = resolve(Some(&options)).unwrap();
    assert_eq!(resolved.project_id.as_deref(), Some("abc"));
    assert_eq!(resolved.endpoint, format!("{DEFAULT_ENDPOINT}/abc"));
}

#[test]
fn resolve_explicit_default_endpoint_with_trailing_slash_still_derives() {
    let options = BoopOptions {
        project_id: Some("p1".into()),
        endpoint: Some(format!("{DEFAULT_ENDPOINT}/")),
        ..BoopOptions::default()
    };
    let resolved = resolve(Some(&options)).unwrap();
    assert_eq!(resolved.endpoint, format!("{DEFAULT_ENDPOINT}/p1"));
}

#[test]
fn resolve_custom_endpoint_needs_no_project_id() {
    let options = BoopOptions { endpoint: Some("https://x/y".into()), ..BoopOptions::default() };
    let resolved = resolve(Some(&options)).unwrap();
    assert_eq!(resolved.endpoint, "https://x/y");
    assert!(resolved.project_id.is_none());
}

#[test]
fn resolve_custom_endpoint_keeps_project_id_informational() {
    let options = BoopOptions {
        endpoint: Some("https://x/y".into()),
        project_id: Some("p9".into()),
        ..BoopOptions::default()
    };
    let resolved = resolve(Some(&options)).unwrap();
    assert_eq!(resolved.endpoint, "https://x/y");
    assert_eq!(resolved.project_id.as_deref(), Some("p9"));
}

// =============================================================
// resolve: defaults
// =============================================================

#[test]
fn resolve_fills_defaults() {
    let options = BoopOptions { project_id: Some("p".into()), ..BoopOptions::default() };
    let resolved = resolve(Some(&options)).unwrap();

    assert!(!resolved.dark_mode);
    assert_eq!(resolved.mode, PanelVariant::Sidebar);
    assert!(!resolved.behavior.auto_open);
    assert!(!resolved.behavior.close_on_submit);
    assert!(resolved.attribution);
    assert!(!resolved.include_stack_trace);
    assert!(resolved.style.use_default_styles);
    assert_eq!(resolved.field_values_mode, FieldValuesMode::Initial);
    assert_eq!(resolved.animation.duration_ms, Some(DEFAULT_ANIMATION_DURATION_MS));
    assert_eq!(resolved.animation.widget.scale, Some(DEFAULT_WIDGET_SCALE));
    assert_eq!(resolved.backdrop, BackdropOptions { enabled: Some(true), fade: Some(true) });

    let variant = resolved.variant();
    assert_eq!(variant.title, "Send feedback");
    assert_eq!(variant.labels.name, "Name");
    assert!(variant.labels.submit.is_none());
    assert_eq!(variant.placeholders.email, "you@example.com");
    assert_eq!(variant.button.label, "Feedback");
    assert_eq!(variant.button.placement, ButtonPlacement::Inline);
    assert!(variant.panel.placement.is_none());
    assert_eq!(variant.success_message, "Thanks for the feedback!");
}

#[test]
fn resolve_partial_animation_keeps_sibling_defaults() {
    let mut options = BoopOptions { project_id: Some("p".into()), ..BoopOptions::default() };
    options.animation.widget.fade = Some(false);
    let resolved = resolve(Some(&options)).unwrap();

    assert_eq!(resolved.animation.widget.fade, Some(false));
    assert_eq!(resolved.animation.widget.slide, Some(true));
    assert_eq!(resolved.animation.widget.slide_distance, Some(DEFAULT_WIDGET_SLIDE_DISTANCE));
}

#[test]
fn resolve_selects_variant_by_mode() {
    let mut options = BoopOptions {
        project_id: Some("p".into()),
        mode: Some(PanelVariant::Widget),
        ..BoopOptions::default()
    };
    options.widget_options.title = Some("Widget title".into());
    options.sidebar_options.title = Some("Sidebar title".into());

    let resolved = resolve(Some(&options)).unwrap();
    assert_eq!(resolved.variant().title, "Widget title");
}

// =============================================================
// combine
// =============================================================

#[test]
fn combine_variant_overrides_do_not_erase_siblings() {
    let mut base = BoopOptions::default();
    base.widget_options.labels.name = Some("Your name".into());
    base.widget_options.labels.email = Some("Your email".into());
    base.widget_options.button.label = Some("Talk to us".into());
    base.widget_options.panel.width = Some(Length::Px(300.0));

    let mut overrides = BoopOptions::default();
    overrides.widget_options.labels.email = Some("Reply-to".into());
    overrides.widget_options.button.placement = Some(ButtonPlacement::Fixed);
    overrides.widget_options.title = Some("Hi".into());

    let combined = combine(Some(&base), Some(&overrides));
    let widget = &combined.widget_options;
    assert_eq!(widget.labels.name.as_deref(), Some("Your name"));
    assert_eq!(widget.labels.email.as_deref(), Some("Reply-to"));
    assert_eq!(widget.button.label.as_deref(), Some("Talk to us"));
    assert_eq!(widget.button.placement, Some(ButtonPlacement::Fixed));
    assert_eq!(widget.panel.width, Some(Length::Px(300.0)));
    assert_eq!(widget.title.as_deref(), Some("Hi"));
}

#[test]
fn combine_then_resolve_keeps_fields_from_either_side() {
    let mut a = BoopOptions { project_id: Some("p".into()), ..BoopOptions::default() };
    a.style.class_names.insert(StyleSlot::Panel, "a-panel".into());
    a.style.theme.insert("--boop-panel".into(), "#111".into());
    a.animation.sidebar.slide = Some(false);
    a.sidebar_options.placeholders.name = Some("Who?".into());

    let mut b = BoopOptions::default();
    b.style.class_names.insert(StyleSlot::Button, "b-button".into());
    b.style
        .style_overrides
        .insert(StyleSlot::Submit, StyleMap::from([("color".to_string(), "red".to_string())]));
    b.animation.widget.grow = Some(false);
    b.sidebar_options.labels.message = Some("Thoughts".into());

    let resolved = resolve(Some(&combine(Some(&a), Some(&b)))).unwrap();
    assert_eq!(resolved.style.class_names.len(), 2);
    assert_eq!(resolved.style.theme.get("--boop-panel").map(String::as_str), Some("#111"));
    assert!(resolved.style.style_overrides.contains_key(&StyleSlot::Submit));
    assert_eq!(resolved.animation.sidebar.slide, Some(false));
    assert_eq!(resolved.animation.widget.grow, Some(false));
    assert_eq!(resolved.sidebar_options.placeholders.name, "Who?");
    assert_eq!(resolved.sidebar_options.labels.message, "Thoughts");
}

#[test]
fn combine_metadata_is_additive_with_override_winning() {
    let base = BoopOptions { metadata: Some(metadata(json!({ "a": 1, "shared": "base" }))), ..BoopOptions::default() };
    let overrides =
        BoopOptions { metadata: Some(metadata(json!({ "b": 2, "shared": "override" }))), ..BoopOptions::default() };

    let combined = combine(Some(&base), Some(&overrides));
    assert_eq!(combined.metadata, Some(metadata(json!({ "a": 1, "b": 2, "shared": "override" }))));
    assert!(combine(None, None).metadata.is_none());
}

#[test]
fn combine_attribution_override_wins_then_base_then_true() {
    let off = BoopOptions { attribution: Some(false), ..BoopOptions::default() };
    let on = BoopOptions { attribution: Some(true), ..BoopOptions::default() };

    assert_eq!(combine(Some(&on), Some(&off)).attribution, Some(false));
    assert_eq!(combine(Some(&off), None).attribution, Some(false));
    assert_eq!(combine(None, None).attribution, Some(true));
}

#[test]
fn combine_unset_scalars_do_not_override() {
    let base = BoopOptions {
        dark_mode: Some(true),
        mode: Some(PanelVariant::Widget),
        include_stack_trace: Some(true),
        ..BoopOptions::default()
    };
    let combined = combine(Some(&base), Some(&BoopOptions::default()));
    assert_eq!(combined.dark_mode, Some(true));
    assert_eq!(combined.mode, Some(PanelVariant::Widget));
    assert_eq!(combined.include_stack_trace, Some(true));
}

#[test]
fn combine_callbacks_merge_per_hook() {
    let opens = Arc::new(AtomicUsize::new(0));
    let closes = Arc::new(AtomicUsize::new(0));
    let base_opens = opens.clone();
    let base_closes = closes.clone();
    let base = BoopOptions {
        callbacks: Callbacks::default()
            .with_on_open(move || {
                base_opens.fetch_add(1, Ordering::SeqCst);
            })
            .with_on_close(move || {
                base_closes.fetch_add(100, Ordering::SeqCst);
            }),
        ..BoopOptions::default()
    };
    let override_closes = closes.clone();
    let overrides = BoopOptions {
        callbacks: Callbacks::default().with_on_close(move || {
            override_closes.fetch_add(1, Ordering::SeqCst);
        }),
        ..BoopOptions::default()
    };

    let combined = combine(Some(&base), Some(&overrides));
    combined.callbacks.emit_open();
    combined.callbacks.emit_close();
    assert_eq!(opens.load(Ordering::SeqCst), 1);
    assert_eq!(closes.load(Ordering::SeqCst), 1);
}

#[test]
fn combine_url_resolver_override_wins_else_base() {
    let base = BoopOptions { url_resolver: Some(UrlResolver::new(|| Some("base".into()))), ..BoopOptions::default() };
    let overrides =
        BoopOptions { url_resolver: Some(UrlResolver::new(|| Some("override".into()))), ..BoopOptions::default() };

    let both = combine(Some(&base), Some(&overrides));
    assert_eq!(both.url_resolver.and_then(|r| r.resolve()).as_deref(), Some("override"));
    let base_only = combine(Some(&base), None);
    assert_eq!(base_only.url_resolver.and_then(|r| r.resolve()).as_deref(), Some("base"));
}

#[test]
fn combine_innermost_custom_endpoint_wins() {
    let provider = BoopOptions { endpoint: Some("https://provider/feedback".into()), ..BoopOptions::default() };
    let instance = BoopOptions { endpoint: Some("https://instance/feedback".into()), ..BoopOptions::default() };
    let combined = combine(Some(&provider), Some(&instance));
    assert_eq!(combined.endpoint.as_deref(), Some("https://instance/feedback"));
}

#[test]
fn combine_default_sentinel_does_not_displace_custom_endpoint() {
    let provider = BoopOptions { endpoint: Some("https://provider/feedback".into()), ..BoopOptions::default() };
    let instance = BoopOptions { endpoint: Some(DEFAULT_ENDPOINT.into()), ..BoopOptions::default() };
    let combined = combine(Some(&provider), Some(&instance));
    assert_eq!(combined.endpoint.as_deref(), Some("https://provider/feedback"));
}

#[test]
fn combine_innermost_non_blank_project_id_wins() {
    let provider = BoopOptions { project_id: Some("outer".into()), ..BoopOptions::default() };
    let blank = BoopOptions { project_id: Some("  ".into()), ..BoopOptions::default() };
    let inner = BoopOptions { project_id: Some("inner".into()), ..BoopOptions::default() };

    assert_eq!(combine(Some(&provider), Some(&blank)).project_id.as_deref(), Some("outer"));
    assert_eq!(combine(Some(&provider), Some(&inner)).project_id.as_deref(), Some("inner"));
}

#[test]
fn combine_field_values_merge_per_field() {
    let mut base = BoopOptions::default();
    base.field_values.name = Some("Ada".into());
    let mut overrides = BoopOptions::default();
    overrides.field_values.email = Some("ada@example.com".into());

    let combined = combine(Some(&base), Some(&overrides));
    assert_eq!(combined.field_values.name.as_deref(), Some("Ada"));
    assert_eq!(combined.field_values.email.as_deref(), Some("ada@example.com"));
}

#[test]
fn merge_metadata_handles_one_sided_inputs() {
    let only = metadata(json!({ "k": "v" }));
    assert_eq!(merge_metadata(Some(&only), None), Some(only.clone()));
    assert_eq!(merge_metadata(None, Some(&only)), Some(only));
    assert_eq!(merge_metadata(None, None), None);
}
