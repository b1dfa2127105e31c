mod common;

use cgmath::{InnerSpace, Point3};
use yurt_scene::{controls::PointerButton, input::Stage};

use crate::common::test_utils::{assembled, default_viewport};

// Inside the moon x slider row of a 1280 wide viewport.
const PANEL_X: f32 = 1150.0;
const PANEL_Y: f32 = 74.0;

fn stage() -> Stage {
    let (_, assembly) = assembled();
    Stage::new(assembly, default_viewport())
}

fn assert_unmoved(stage: &Stage, before: Point3<f32>) {
    let moved = (stage.camera.position - before).magnitude();
    assert!(moved < 1e-4, "camera moved by {moved}");
}

#[test]
fn presses_over_the_panel_never_reach_the_controls() {
    let mut stage = stage();
    let camera = stage.camera.position;
    let target = stage.controls.target;

    for button in [PointerButton::Secondary, PointerButton::Middle] {
        stage.pointer_moved(PANEL_X, PANEL_Y);
        stage.pointer_button(button, true);
        assert!(!stage.controls.is_dragging());
        stage.pointer_moved(PANEL_X - 400.0, PANEL_Y + 200.0);
        stage.pointer_button(button, false);
    }
    assert!(!stage.update());
    assert_unmoved(&stage, camera);
    assert_eq!(stage.controls.target, target);
}

#[test]
fn primary_press_over_the_panel_drags_the_slider_not_the_camera() {
    let mut stage = stage();
    let camera = stage.camera.position;
    let scene = stage.scene.clone();

    stage.pointer_moved(PANEL_X, PANEL_Y);
    stage.pointer_button(PointerButton::Primary, true);
    assert!(!stage.controls.is_dragging());
    assert_ne!(stage.scene, scene);

    // dragging off the panel keeps moving the slider
    stage.pointer_moved(10.0, 300.0);
    stage.pointer_button(PointerButton::Primary, false);
    assert_eq!(stage.panel.value(&stage.scene, 2), Some(-5.0));
    assert!(!stage.update());
    assert_unmoved(&stage, camera);
}

#[test]
fn wheel_over_the_panel_is_ignored() {
    let mut stage = stage();
    let camera = stage.camera.position;

    stage.pointer_moved(PANEL_X, PANEL_Y);
    stage.wheel(3.0);
    assert!(!stage.update());
    assert_unmoved(&stage, camera);

    stage.pointer_moved(200.0, 300.0);
    stage.wheel(3.0);
    assert!(stage.update());
    assert_ne!(stage.camera.position, camera);
}

#[test]
fn presses_away_from_the_panel_orbit_the_camera() {
    let mut stage = stage();
    let camera = stage.camera.position;

    stage.pointer_moved(200.0, 300.0);
    stage.pointer_button(PointerButton::Primary, true);
    assert!(stage.controls.is_dragging());
    stage.pointer_moved(260.0, 300.0);
    stage.pointer_left();
    assert!(!stage.controls.is_dragging());
    assert_eq!(stage.cursor(), None);

    assert!(stage.update());
    assert_ne!(stage.camera.position, camera);
}

#[test]
fn hidden_panel_lets_input_through() {
    let mut stage = stage();
    stage.toggle_panel();

    stage.pointer_moved(PANEL_X, PANEL_Y);
    stage.pointer_button(PointerButton::Secondary, true);
    assert!(stage.controls.is_dragging());
    stage.pointer_button(PointerButton::Secondary, false);

    let camera = stage.camera.position;
    stage.wheel(1.0);
    assert!(stage.update());
    assert_ne!(stage.camera.position, camera);
}

#[test]
fn buttons_without_a_cursor_are_dropped() {
    let mut stage = stage();
    stage.pointer_button(PointerButton::Primary, true);
    assert!(!stage.controls.is_dragging());
    assert_eq!(stage.cursor(), None);
}
