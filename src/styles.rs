//! Semantic style slots, default theme variables, and style lookup.
//!
//! DESIGN
//! ======
//! The renderer owns layout; this module only owns the *data*: which slots
//! exist, what CSS declarations each slot gets by default, and how caller
//! overrides are layered on top. Declarations reference `--boop-*` theme
//! variables so hosts can restyle through `style.theme` alone.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// CSS declarations keyed by property name (`background-color`, `z-index`, ...).
pub type StyleMap = BTreeMap<String, String>;

/// Theme variables keyed by custom property name (`--boop-panel`, ...).
pub type Theme = BTreeMap<String, String>;

// =============================================================================
// SLOTS
// =============================================================================

/// A semantic element of the widget that can be styled or given a class name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StyleSlot {
    Root,
    Button,
    ButtonFixed,
    Overlay,
    OverlayCenter,
    Panel,
    PanelWidget,
    Header,
    Form,
    Field,
    Input,
    Textarea,
    Submit,
    Close,
    Footer,
    Attribution,
    ErrorMessageContainer,
    ErrorMessage,
}

impl StyleSlot {
    /// Slots that carry a built-in `boop-*` class name.
    pub const CLASSED: [Self; 14] = [
        Self::Root,
        Self::Button,
        Self::Overlay,
        Self::Panel,
        Self::Header,
        Self::Form,
        Self::Field,
        Self::Textarea,
        Self::Submit,
        Self::Close,
        Self::Footer,
        Self::Attribution,
        Self::ErrorMessageContainer,
        Self::ErrorMessage,
    ];

    /// Built-in class name for this slot, e.g. `boop-error-message`.
    #[must_use]
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Root => "boop-root",
            Self::Button => "boop-button",
            Self::ButtonFixed => "boop-button-fixed",
            Self::Overlay => "boop-overlay",
            Self::OverlayCenter => "boop-overlay-center",
            Self::Panel => "boop-panel",
            Self::PanelWidget => "boop-panel-widget",
            Self::Header => "boop-header",
            Self::Form => "boop-form",
            Self::Field => "boop-field",
            Self::Input => "boop-input",
            Self::Textarea => "boop-textarea",
            Self::Submit => "boop-submit",
            Self::Close => "boop-close",
            Self::Footer => "boop-footer",
            Self::Attribution => "boop-attribution",
            Self::ErrorMessageContainer => "boop-error-message-container",
            Self::ErrorMessage => "boop-error-message",
        }
    }
}

// =============================================================================
// THEME
// =============================================================================

const LIGHT_THEME: [(&str, &str); 9] = [
    ("--boop-background", "#ffffff"),
    ("--boop-panel", "#ffffff"),
    ("--boop-text", "#0f172a"),
    ("--boop-muted-text", "#475569"),
    ("--boop-border", "#e2e8f0"),
    ("--boop-button", "#16a34a"),
    ("--boop-button-text", "#ffffff"),
    ("--boop-overlay", "rgba(15, 23, 42, 0.35)"),
    ("--boop-input-bg", "#ffffff"),
];

const DARK_THEME: [(&str, &str); 9] = [
    ("--boop-background", "#111827"),
    ("--boop-panel", "#0f172a"),
    ("--boop-text", "#e2e8f0"),
    ("--boop-muted-text", "#94a3b8"),
    ("--boop-border", "#1f2937"),
    ("--boop-button", "#22c55e"),
    ("--boop-button-text", "#0b1220"),
    ("--boop-overlay", "rgba(15, 23, 42, 0.7)"),
    ("--boop-input-bg", "#0b1220"),
];

/// Default `--boop-*` variables for the light or dark palette.
#[must_use]
pub fn default_theme(dark_mode: bool) -> Theme {
    let palette = if dark_mode { DARK_THEME } else { LIGHT_THEME };
    palette.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
}

fn css_var(theme: &Theme, name: &str) -> String {
    let fallback = theme.get(name).map_or("initial", String::as_str);
    format!("var({name}, {fallback})")
}

fn declarations(pairs: &[(&str, String)]) -> StyleMap {
    pairs.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
}

// =============================================================================
// DEFAULT STYLES
// =============================================================================

/// Built-in declarations for every slot.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn default_styles(dark_mode: bool) -> BTreeMap<StyleSlot, StyleMap> {
    let theme = default_theme(dark_mode);
    let text = css_var(&theme, "--boop-text");
    let muted = css_var(&theme, "--boop-muted-text");
    let panel = css_var(&theme, "--boop-panel");
    let border = css_var(&theme, "--boop-border");
    let button = css_var(&theme, "--boop-button");
    let button_text = css_var(&theme, "--boop-button-text");
    let overlay = css_var(&theme, "--boop-overlay");
    let input_bg = css_var(&theme, "--boop-input-bg");

    let mut styles = BTreeMap::new();
    styles.insert(
        StyleSlot::Root,
        declarations(&[
            (
                "font-family",
                "-apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif".into(),
            ),
            ("color", text.clone()),
        ]),
    );
    styles.insert(
        StyleSlot::Button,
        declarations(&[
            ("background", button.clone()),
            ("color", button_text.clone()),
            ("border", "none".into()),
            ("border-radius", "999px".into()),
            ("padding", "10px 18px".into()),
            ("font-size", "14px".into()),
            ("cursor", "pointer".into()),
        ]),
    );
    styles.insert(
        StyleSlot::ButtonFixed,
        declarations(&[
            ("position", "fixed".into()),
            ("right", "24px".into()),
            ("bottom", "24px".into()),
            ("z-index", "10010".into()),
        ]),
    );
    styles.insert(
        StyleSlot::Overlay,
        declarations(&[
            ("position", "fixed".into()),
            ("inset", "0".into()),
            ("background-color", overlay.clone()),
            ("display", "flex".into()),
            ("justify-content", "flex-end".into()),
            ("z-index", "10000".into()),
        ]),
    );
    styles.insert(
        StyleSlot::OverlayCenter,
        declarations(&[
            ("position", "fixed".into()),
            ("inset", "0".into()),
            ("background-color", overlay),
            ("display", "flex".into()),
            ("align-items", "center".into()),
            ("justify-content", "center".into()),
            ("z-index", "10000".into()),
        ]),
    );
    styles.insert(
        StyleSlot::Panel,
        declarations(&[
            ("background", panel.clone()),
            ("width", "100%".into()),
            ("max-width", "420px".into()),
            ("height", "100%".into()),
            ("border-left", format!("1px solid {border}")),
            ("padding", "24px".into()),
            ("box-sizing", "border-box".into()),
        ]),
    );
    styles.insert(
        StyleSlot::PanelWidget,
        declarations(&[
            ("background", panel),
            ("width", "100%".into()),
            ("max-width", "380px".into()),
            ("border", format!("1px solid {border}")),
            ("border-radius", "16px".into()),
            ("padding", "20px".into()),
            ("box-sizing", "border-box".into()),
        ]),
    );
    styles.insert(
        StyleSlot::Header,
        declarations(&[
            ("display", "flex".into()),
            ("align-items", "center".into()),
            ("justify-content", "space-between".into()),
            ("margin-bottom", "16px".into()),
        ]),
    );
    styles.insert(
        StyleSlot::Form,
        declarations(&[("display", "flex".into()), ("flex-direction", "column".into()), ("gap", "12px".into())]),
    );
    styles.insert(
        StyleSlot::Field,
        declarations(&[
            ("display", "flex".into()),
            ("flex-direction", "column".into()),
            ("gap", "6px".into()),
            ("font-size", "13px".into()),
            ("color", muted.clone()),
        ]),
    );
    let input = declarations(&[
        ("background", input_bg),
        ("color", text.clone()),
        ("border", format!("1px solid {border}")),
        ("border-radius", "8px".into()),
        ("padding", "8px 10px".into()),
        ("font-size", "14px".into()),
    ]);
    let mut textarea = input.clone();
    textarea.insert("min-height".into(), "120px".into());
    textarea.insert("resize".into(), "vertical".into());
    styles.insert(StyleSlot::Input, input);
    styles.insert(StyleSlot::Textarea, textarea);
    styles.insert(
        StyleSlot::Submit,
        declarations(&[
            ("background", button),
            ("color", button_text),
            ("border", "none".into()),
            ("border-radius", "8px".into()),
            ("padding", "10px 14px".into()),
            ("cursor", "pointer".into()),
        ]),
    );
    styles.insert(
        StyleSlot::Close,
        declarations(&[
            ("background", "transparent".into()),
            ("border", "none".into()),
            ("color", muted.clone()),
            ("font-size", "20px".into()),
            ("cursor", "pointer".into()),
        ]),
    );
    styles.insert(StyleSlot::Footer, declarations(&[("margin-top", "16px".into()), ("color", muted.clone())]));
    styles.insert(
        StyleSlot::Attribution,
        declarations(&[("font-size", "11px".into()), ("color", muted), ("text-align", "center".into())]),
    );
    styles.insert(
        StyleSlot::ErrorMessageContainer,
        declarations(&[("margin-top", "8px".into())]),
    );
    styles.insert(
        StyleSlot::ErrorMessage,
        declarations(&[("color", "#dc2626".into()), ("font-size", "13px".into())]),
    );
    styles
}

// =============================================================================
// LOOKUP
// =============================================================================

/// Resolves the effective declarations for a slot: defaults (when enabled)
/// overlaid by per-slot caller overrides.
#[derive(Debug, Clone)]
pub struct StyleLookup {
    defaults: BTreeMap<StyleSlot, StyleMap>,
    overrides: BTreeMap<StyleSlot, StyleMap>,
}

impl StyleLookup {
    #[must_use]
    pub fn new(dark_mode: bool, use_default_styles: bool, overrides: BTreeMap<StyleSlot, StyleMap>) -> Self {
        let defaults = if use_default_styles { default_styles(dark_mode) } else { BTreeMap::new() };
        Self { defaults, overrides }
    }

    #[must_use]
    pub fn get(&self, slot: StyleSlot) -> StyleMap {
        let mut style = self.defaults.get(&slot).cloned().unwrap_or_default();
        if let Some(custom) = self.overrides.get(&slot) {
            style.extend(custom.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        style
    }
}

/// Join a built-in class name with an optional caller-supplied one.
#[must_use]
pub fn merge_class_names(base: &str, custom: Option<&str>) -> String {
    [Some(base), custom]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "styles_test.rs"]
mod tests;
