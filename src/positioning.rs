//! Panel placement policy relative to the launcher button.

use crate::types::{ButtonPlacement, FixedOffset, PanelPlacement, PanelVariant};

/// Where a fixed button sits when no offset is configured.
pub const DEFAULT_BUTTON_FIXED_OFFSET: FixedOffset =
    FixedOffset { top: None, right: Some(24.0), bottom: Some(24.0), left: None };

/// Distance between a fixed button and the widget panel anchored next to it.
pub const DEFAULT_WIDGET_GAP: f64 = 56.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelPlacementInput {
    pub mode: PanelVariant,
    pub raw_panel_placement: Option<PanelPlacement>,
    pub raw_panel_fixed_offset: Option<FixedOffset>,
    pub button_placement: ButtonPlacement,
}

/// Decide whether the panel is centered or anchored.
///
/// A configured placement always wins. Only widget mode infers `Fixed` from
/// an explicit panel offset or a fixed button.
#[must_use]
pub fn resolve_panel_placement(input: PanelPlacementInput) -> PanelPlacement {
    if let Some(placement) = input.raw_panel_placement {
        return placement;
    }
    if input.mode != PanelVariant::Widget {
        return PanelPlacement::Center;
    }
    if input.raw_panel_fixed_offset.is_some() || input.button_placement == ButtonPlacement::Fixed {
        PanelPlacement::Fixed
    } else {
        PanelPlacement::Center
    }
}

fn add_offset_gap(offset: FixedOffset, gap: f64) -> FixedOffset {
    FixedOffset {
        top: offset.top.map(|v| v + gap),
        right: offset.right.map(|v| v + gap),
        bottom: offset.bottom.map(|v| v + gap),
        left: offset.left.map(|v| v + gap),
    }
}

fn base_button_offset(offset: Option<FixedOffset>) -> FixedOffset {
    let Some(offset) = offset else {
        return DEFAULT_BUTTON_FIXED_OFFSET;
    };
    FixedOffset {
        top: offset.top.or(DEFAULT_BUTTON_FIXED_OFFSET.top),
        right: offset.right.or(DEFAULT_BUTTON_FIXED_OFFSET.right),
        bottom: offset.bottom.or(DEFAULT_BUTTON_FIXED_OFFSET.bottom),
        left: offset.left.or(DEFAULT_BUTTON_FIXED_OFFSET.left),
    }
}

/// The panel's anchored offset: the configured one verbatim, otherwise the
/// button's offset pushed outward by [`DEFAULT_WIDGET_GAP`] on each present side.
#[must_use]
pub fn resolve_panel_fixed_offset(panel_offset: Option<FixedOffset>, button_offset: Option<FixedOffset>) -> FixedOffset {
    panel_offset.unwrap_or_else(|| add_offset_gap(base_button_offset(button_offset), DEFAULT_WIDGET_GAP))
}

#[cfg(test)]
#[path = "positioning_test.rs"]
mod tests;
