use super::*;

#[test]
fn default_theme_switches_palette() {
    let light = default_theme(false);
    let dark = default_theme(true);
    assert_eq!(light.get("--boop-panel").map(String::as_str), Some("#ffffff"));
    assert_eq!(dark.get("--boop-panel").map(String::as_str), Some("#0f172a"));
    assert_eq!(light.len(), dark.len());
}

#[test]
fn default_styles_cover_every_classed_slot() {
    let styles = default_styles(false);
    for slot in StyleSlot::CLASSED {
        assert!(styles.contains_key(&slot), "missing default style for {slot:?}");
    }
}

#[test]
fn overlay_background_references_theme_variable() {
    let styles = default_styles(true);
    let overlay = &styles[&StyleSlot::Overlay];
    assert_eq!(
        overlay.get("background-color").map(String::as_str),
        Some("var(--boop-overlay, rgba(15, 23, 42, 0.7))")
    );
}

#[test]
fn lookup_layers_overrides_on_defaults() {
    let mut overrides = BTreeMap::new();
    overrides.insert(StyleSlot::Button, StyleMap::from([("padding".to_string(), "4px".to_string())]));
    let lookup = StyleLookup::new(false, true, overrides);

    let button = lookup.get(StyleSlot::Button);
    assert_eq!(button.get("padding").map(String::as_str), Some("4px"));
    assert_eq!(button.get("cursor").map(String::as_str), Some("pointer"));
}

#[test]
fn lookup_without_defaults_returns_only_overrides() {
    let mut overrides = BTreeMap::new();
    overrides.insert(StyleSlot::Panel, StyleMap::from([("color".to_string(), "red".to_string())]));
    let lookup = StyleLookup::new(false, false, overrides);

    assert_eq!(lookup.get(StyleSlot::Panel).len(), 1);
    assert!(lookup.get(StyleSlot::Overlay).is_empty());
}

#[test]
fn merge_class_names_skips_missing_and_empty() {
    assert_eq!(merge_class_names("boop-root", None), "boop-root");
    assert_eq!(merge_class_names("boop-root", Some("")), "boop-root");
    assert_eq!(merge_class_names("boop-root", Some("mine")), "boop-root mine");
}

#[test]
fn style_slot_deserializes_from_camel_case_key() {
    let map: BTreeMap<StyleSlot, String> =
        serde_json::from_str(r#"{"errorMessageContainer":"x","buttonFixed":"y"}"#).unwrap();
    assert_eq!(map.get(&StyleSlot::ErrorMessageContainer).map(String::as_str), Some("x"));
    assert_eq!(map.get(&StyleSlot::ButtonFixed).map(String::as_str), Some("y"));
}
