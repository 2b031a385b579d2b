use super::*;

fn input(mode: PanelVariant, button_placement: ButtonPlacement) -> PanelPlacementInput {
    PanelPlacementInput { mode, raw_panel_placement: None, raw_panel_fixed_offset: None, button_placement }
}

#[test]
fn widget_with_fixed_button_anchors_panel() {
    let placement = resolve_panel_placement(input(PanelVariant::Widget, ButtonPlacement::Fixed));
    assert_eq!(placement, PanelPlacement::Fixed);
}

#[test]
fn widget_with_inline_button_centers_panel() {
    let placement = resolve_panel_placement(input(PanelVariant::Widget, ButtonPlacement::Inline));
    assert_eq!(placement, PanelPlacement::Center);
}

#[test]
fn widget_with_explicit_panel_offset_anchors_panel() {
    let mut i = input(PanelVariant::Widget, ButtonPlacement::Inline);
    i.raw_panel_fixed_offset = Some(FixedOffset { top: Some(10.0), ..FixedOffset::default() });
    assert_eq!(resolve_panel_placement(i), PanelPlacement::Fixed);
}

#[test]
fn widget_explicit_placement_wins_over_inference() {
    let mut i = input(PanelVariant::Widget, ButtonPlacement::Fixed);
    i.raw_panel_placement = Some(PanelPlacement::Center);
    assert_eq!(resolve_panel_placement(i), PanelPlacement::Center);
}

#[test]
fn sidebar_passes_raw_placement_through() {
    let mut i = input(PanelVariant::Sidebar, ButtonPlacement::Inline);
    i.raw_panel_placement = Some(PanelPlacement::Fixed);
    assert_eq!(resolve_panel_placement(i), PanelPlacement::Fixed);
}

#[test]
fn sidebar_never_infers_fixed_from_button() {
    let placement = resolve_panel_placement(input(PanelVariant::Sidebar, ButtonPlacement::Fixed));
    assert_eq!(placement, PanelPlacement::Center);
}

#[test]
fn panel_offset_derives_from_button_offset_per_side() {
    let offset =
        resolve_panel_fixed_offset(None, Some(FixedOffset { right: Some(10.0), bottom: Some(10.0), ..FixedOffset::default() }));
    assert_eq!(offset.right, Some(10.0 + DEFAULT_WIDGET_GAP));
    assert_eq!(offset.bottom, Some(10.0 + DEFAULT_WIDGET_GAP));
    assert!(offset.top.is_none());
    assert!(offset.left.is_none());
}

#[test]
fn panel_offset_defaults_from_base_button_offset() {
    let offset = resolve_panel_fixed_offset(None, None);
    assert_eq!(offset.right, DEFAULT_BUTTON_FIXED_OFFSET.right.map(|v| v + DEFAULT_WIDGET_GAP));
    assert_eq!(offset.bottom, DEFAULT_BUTTON_FIXED_OFFSET.bottom.map(|v| v + DEFAULT_WIDGET_GAP));
}

#[test]
fn panel_offset_partial_button_offset_fills_missing_defaults() {
    let offset = resolve_panel_fixed_offset(None, Some(FixedOffset { top: Some(5.0), ..FixedOffset::default() }));
    assert_eq!(offset.top, Some(5.0 + DEFAULT_WIDGET_GAP));
    assert_eq!(offset.right, Some(24.0 + DEFAULT_WIDGET_GAP));
}

#[test]
fn explicit_panel_offset_is_returned_verbatim() {
    let panel = FixedOffset { left: Some(3.0), ..FixedOffset::default() };
    let offset = resolve_panel_fixed_offset(Some(panel), Some(FixedOffset { right: Some(99.0), ..FixedOffset::default() }));
    assert_eq!(offset, panel);
}
