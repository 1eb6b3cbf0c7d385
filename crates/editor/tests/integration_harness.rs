//! Integration tests for pointer-driven editing through the harness.

use std::time::Duration;

use brickyard_lib::harness::TestHarness;
use brickyard_lib::state::{
    ActionButtons, CursorMode, EditorEvent, EditorSettings, PointerHit, PointerInput, IDLE_STATUS,
    READY_STATUS,
};
use glam::DVec2;

#[test]
fn test_arm_click_build_flow() {
    let mut h = TestHarness::new();
    h.arm("square", 1).unwrap();
    assert_eq!(h.state.cursor(), CursorMode::Placing);
    assert_eq!(h.status(), "Click ground to place Square (Six) - 6x6.");

    h.click_ground(7.3, -2.6);
    assert_eq!(h.instance_count(), 1);
    assert_eq!(h.status(), "Building Square...");
    assert_eq!(h.state.cursor(), CursorMode::Default);

    h.finish_animations();
    assert_eq!(h.status(), READY_STATUS);
    let snap = h.snapshot();
    assert_eq!(snap.instances[0].position.x, 7.0);
    assert_eq!(snap.instances[0].position.z, -3.0);
}

#[test]
fn test_clicks_ignored_while_animating() {
    let mut h = TestHarness::new();
    let a = h.place_built("square", 0.0, 0.0);
    h.place("square", 0, 10.0, 0.0).unwrap();

    h.click_instance(&a);
    assert!(h.selected().is_none());
    assert!(h.arm("square", 0).is_err());

    h.finish_animations();
    h.click_instance(&a);
    assert_eq!(h.selected(), Some(&a));
}

#[test]
fn test_single_selection_across_clicks() {
    let mut h = TestHarness::new();
    let ids: Vec<_> = (0..4)
        .map(|i| h.place_built("square", f64::from(i) * 10.0, 0.0))
        .collect();

    for id in ids.iter().chain(ids.iter().rev()) {
        h.click_instance(id);
        assert_eq!(h.selected(), Some(id));
        assert_eq!(h.state.scene().selected_count(), 1);
        h.assert_valid();
    }

    h.click_ground(0.0, 50.0);
    assert!(h.selected().is_none());
    assert_eq!(h.status(), IDLE_STATUS);
    h.assert_valid();
}

#[test]
fn test_arming_template_drops_selection() {
    let mut h = TestHarness::new();
    let a = h.place_built("square", 0.0, 0.0);
    h.click_instance(&a);
    h.events();

    h.arm("long", 0).unwrap();
    assert!(h.selected().is_none());
    assert!(!h.instance(&a).is_selected());
    let events = h.events();
    assert!(events.contains(&EditorEvent::SelectionChanged(None)));
    assert!(events.contains(&EditorEvent::Highlight(None)));
    h.assert_valid();
}

#[test]
fn test_buttons_follow_selection() {
    let mut h = TestHarness::new();
    assert_eq!(h.state.action_buttons(), ActionButtons::default());

    let a = h.place_built("square", 0.0, 0.0);
    h.click_instance(&a);
    let buttons = h.state.action_buttons();
    assert!(buttons.rotate_visible && buttons.rotate_enabled);
    assert!(buttons.unbuild_visible && buttons.unbuild_enabled);
    assert!(!buttons.cancel_visible);

    h.state.rotate_clicked();
    assert!(!h.state.action_buttons().rotate_enabled);
    h.finish_animations();
    assert!(h.state.action_buttons().rotate_enabled);
}

#[test]
fn test_drag_moves_selected_instance() {
    let mut h = TestHarness::new();
    let a = h.place_built("square", 0.0, 0.0);
    h.click_instance(&a);

    h.drag(&a, &[(3.0, 0.0), (8.0, 0.2), (12.4, 5.6)]);
    h.finish_animations();
    assert_eq!(h.position(&a), DVec2::new(12.0, 6.0));
    assert_eq!(h.selected(), Some(&a));
    assert_eq!(
        h.status(),
        "Selected Square (Four). Drag to move, Rotate, or Unbuild."
    );
    h.assert_valid();
}

#[test]
fn test_drag_uses_last_ghost_only() {
    let mut h = TestHarness::new();
    let a = h.place_built("square", 0.0, 0.0);
    let b = h.place_built("square", 20.0, 0.0);
    h.click_instance(&a);

    // last sample lands on b
    h.drag(&a, &[(10.0, 0.0), (19.0, 0.0)]);
    assert!(!h.state.any_animating());
    assert_eq!(h.position(&a), DVec2::ZERO);
    assert_eq!(h.position(&b), DVec2::new(20.0, 0.0));
    assert!(h.status().starts_with("Move cancelled (invalid location)."));
}

#[test]
fn test_unselected_press_selects_instead_of_dragging() {
    let mut h = TestHarness::new();
    let a = h.place_built("square", 0.0, 0.0);
    h.drag(&a, &[(10.0, 0.0)]);
    assert_eq!(h.position(&a), DVec2::ZERO);
    assert_eq!(h.selected(), Some(&a));
}

#[test]
fn test_touch_drag_throttle_uses_setting() {
    let settings = EditorSettings {
        touch_drag_interval_ms: 50,
        ..EditorSettings::default()
    };
    let mut h = TestHarness::with_settings(Vec::new(), settings);
    let a = h.place_built("square", 0.0, 0.0);
    h.click_instance(&a);

    // samples 20 ms apart: only the first, the 4th (60 ms later) survive
    h.touch_drag(
        &a,
        &[(5.0, 0.0), (6.0, 0.0), (7.0, 0.0), (8.0, 0.0), (9.0, 0.0)],
        Duration::from_millis(20),
    );
    h.finish_animations();
    assert_eq!(h.position(&a), DVec2::new(8.0, 0.0));
}

#[test]
fn test_press_on_other_instance_abandons_drag() {
    let mut h = TestHarness::new();
    let a = h.place_built("square", 0.0, 0.0);
    let b = h.place_built("square", 20.0, 0.0);
    h.click_instance(&a);

    h.state
        .pointer_down(&PointerInput::mouse(PointerHit::Instance(a.clone())));
    assert!(h.state.drag().is_dragging());
    h.state
        .pointer_down(&PointerInput::mouse(PointerHit::Instance(b.clone())));
    assert_eq!(h.selected(), Some(&b));
    assert!(!h.state.drag().is_dragging());
    assert_eq!(h.state.cursor(), CursorMode::Default);

    h.state
        .pointer_move(&PointerInput::mouse(PointerHit::Ground(DVec2::new(-20.0, 0.0))));
    h.state.pointer_up();

    assert!(!h.state.any_animating());
    assert_eq!(h.position(&a), DVec2::ZERO);
    assert_eq!(h.position(&b), DVec2::new(20.0, 0.0));
    assert_eq!(h.selected(), Some(&b));
    h.assert_valid();
}
