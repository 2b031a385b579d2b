//! Animation normalization and motion style descriptors.
//!
//! DESIGN
//! ======
//! `resolve_animation_state` turns the partial animation/backdrop options into
//! concrete timings and motion parameters. `build_motion_styles` then derives
//! the CSS declarations for the panel and overlay at a given visibility. Both
//! are pure; nothing here touches a document.

use crate::options::{
    DEFAULT_ANIMATION_DURATION_MS, DEFAULT_EASING, DEFAULT_SIDEBAR_SLIDE_DISTANCE, DEFAULT_WIDGET_SCALE,
    DEFAULT_WIDGET_SLIDE_DISTANCE,
};
use crate::styles::{StyleMap, StyleSlot};
use crate::types::{AnimationOptions, BackdropOptions, Length, PanelPlacement, PanelVariant};

// =============================================================================
// STATE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedWidgetAnimation {
    pub fade: bool,
    pub slide: bool,
    pub grow: bool,
    pub slide_distance: f64,
    pub scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSidebarAnimation {
    pub slide: bool,
    pub slide_distance: Length,
}

/// Concrete animation parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationState {
    /// False when animation is disabled or the duration is zero.
    pub should_animate: bool,
    pub duration_ms: u64,
    pub easing: String,
    pub widget: ResolvedWidgetAnimation,
    pub sidebar: ResolvedSidebarAnimation,
    pub backdrop_enabled: bool,
    pub backdrop_fade: bool,
}

#[must_use]
pub fn resolve_animation_state(animation: Option<&AnimationOptions>, backdrop: Option<&BackdropOptions>) -> AnimationState {
    let default_animation = AnimationOptions::default();
    let animation = animation.unwrap_or(&default_animation);
    let backdrop = backdrop.copied().unwrap_or_default();

    let enabled = animation.enabled.unwrap_or(true);
    let duration_ms = animation.duration_ms.unwrap_or(DEFAULT_ANIMATION_DURATION_MS);
    let w = &animation.widget;
    let s = &animation.sidebar;

    AnimationState {
        should_animate: enabled && duration_ms > 0,
        duration_ms,
        easing: animation.easing.clone().unwrap_or_else(|| DEFAULT_EASING.to_string()),
        widget: ResolvedWidgetAnimation {
            fade: w.fade.unwrap_or(true),
            slide: w.slide.unwrap_or(true),
            grow: w.grow.unwrap_or(true),
            slide_distance: w.slide_distance.unwrap_or(DEFAULT_WIDGET_SLIDE_DISTANCE),
            scale: w.scale.unwrap_or(DEFAULT_WIDGET_SCALE),
        },
        sidebar: ResolvedSidebarAnimation {
            slide: s.slide.unwrap_or(true),
            slide_distance: s
                .slide_distance
                .clone()
                .unwrap_or_else(|| Length::Css(DEFAULT_SIDEBAR_SLIDE_DISTANCE.to_string())),
        },
        backdrop_enabled: backdrop.enabled.unwrap_or(true),
        backdrop_fade: backdrop.fade.unwrap_or(true),
    }
}

// =============================================================================
// MOTION STYLES
// =============================================================================

/// Declarations to spread onto the panel and overlay elements.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MotionStyles {
    pub panel_motion_style: StyleMap,
    pub panel_transition_style: StyleMap,
    pub overlay_base_style: StyleMap,
    pub overlay_backdrop_style: StyleMap,
    pub overlay_transition_style: StyleMap,
}

pub struct MotionInput<'a, F>
where
    F: Fn(StyleSlot) -> StyleMap,
{
    pub mode: PanelVariant,
    pub panel_placement: PanelPlacement,
    pub is_visible: bool,
    pub animation_state: &'a AnimationState,
    pub style_lookup: F,
}

const TRANSPARENT: &str = "transparent";

fn style(pairs: impl IntoIterator<Item = (&'static str, String)>) -> StyleMap {
    pairs.into_iter().map(|(k, v)| (k.to_string(), v)).collect()
}

fn panel_transition(mode: PanelVariant, state: &AnimationState) -> Option<String> {
    if !state.should_animate {
        return None;
    }
    let widget = mode == PanelVariant::Widget;
    let timing = format!("{}ms {}", state.duration_ms, state.easing);
    let mut parts = Vec::new();
    if (widget && (state.widget.slide || state.widget.grow)) || (!widget && state.sidebar.slide) {
        parts.push(format!("transform {timing}"));
    }
    if widget && state.widget.fade {
        parts.push(format!("opacity {timing}"));
    }
    if parts.is_empty() { None } else { Some(parts.join(", ")) }
}

fn panel_motion(mode: PanelVariant, is_visible: bool, state: &AnimationState) -> StyleMap {
    let mut motion = StyleMap::new();
    match mode {
        PanelVariant::Widget => {
            let w = &state.widget;
            if w.fade {
                motion.insert("opacity".into(), if is_visible { "1" } else { "0" }.into());
            }
            let mut transform = Vec::new();
            if w.slide {
                let distance = if is_visible { 0.0 } else { w.slide_distance };
                transform.push(format!("translateY({})", Length::Px(distance)));
            }
            if w.grow {
                let scale = if is_visible { 1.0 } else { w.scale };
                transform.push(format!("scale({scale})"));
            }
            if !transform.is_empty() {
                motion.insert("transform".into(), transform.join(" "));
            }
        }
        PanelVariant::Sidebar => {
            if state.sidebar.slide {
                let distance = if is_visible { "0".to_string() } else { state.sidebar.slide_distance.to_string() };
                motion.insert("transform".into(), format!("translateX({distance})"));
            }
        }
    }
    motion
}

/// Derive panel/overlay declarations for one visibility state.
#[must_use]
pub fn build_motion_styles<F>(input: MotionInput<'_, F>) -> MotionStyles
where
    F: Fn(StyleSlot) -> StyleMap,
{
    let MotionInput { mode, panel_placement, is_visible, animation_state: state, style_lookup } = input;

    let panel_transition_style = match panel_transition(mode, state) {
        Some(transition) => style([("transition", transition), ("will-change", "transform, opacity".to_string())]),
        None => StyleMap::new(),
    };

    let overlay_slot = if mode == PanelVariant::Widget && panel_placement == PanelPlacement::Center {
        StyleSlot::OverlayCenter
    } else {
        StyleSlot::Overlay
    };
    let overlay_base_style = style_lookup(overlay_slot);
    let overlay_background = overlay_base_style
        .get("background-color")
        .or_else(|| overlay_base_style.get("background"))
        .cloned()
        .unwrap_or_else(|| TRANSPARENT.to_string());

    let fading_in = state.should_animate && state.backdrop_fade && !is_visible;
    let backdrop_color = if !state.backdrop_enabled || fading_in {
        TRANSPARENT.to_string()
    } else {
        overlay_background
    };

    let overlay_transition_style = if state.should_animate && state.backdrop_enabled && state.backdrop_fade {
        style([("transition", format!("background-color {}ms {}", state.duration_ms, state.easing))])
    } else {
        StyleMap::new()
    };

    MotionStyles {
        panel_motion_style: panel_motion(mode, is_visible, state),
        panel_transition_style,
        overlay_base_style,
        overlay_backdrop_style: style([("background-color", backdrop_color)]),
        overlay_transition_style,
    }
}

#[cfg(test)]
#[path = "animation_test.rs"]
mod tests;
