mod common;

use std::f32::consts::PI;

use cgmath::{InnerSpace, Point3, Vector3};
use yurt_scene::{
    camera::PerspectiveCamera,
    controls::{OrbitControls, PointerButton, Spherical},
    yurt,
};

use crate::common::test_utils::{assert_close, default_viewport};

fn offset(camera: &PerspectiveCamera, controls: &OrbitControls) -> Vector3<f32> {
    camera.position - controls.target
}

/// Polar angle measured with atan2, which stays accurate next to the poles.
fn polar_angle(v: Vector3<f32>) -> f32 {
    v.x.hypot(v.z).atan2(v.y)
}

#[test]
fn damped_rotation_converges_to_requested_angle() {
    let mut camera = yurt::build_camera(default_viewport().aspect());
    let mut controls = yurt::build_controls(&default_viewport());
    let start = Spherical::from_vector(offset(&camera, &controls));

    controls.rotate_left(0.5);
    assert!(controls.update(&mut camera));
    let first = Spherical::from_vector(offset(&camera, &controls));
    // only the damping fraction is applied in the first frame
    assert_close(first.theta, start.theta - 0.5 * 0.05);

    for _ in 0..400 {
        controls.update(&mut camera);
    }
    let end = Spherical::from_vector(offset(&camera, &controls));
    assert_close(end.theta, start.theta - 0.5);
    assert_close(end.phi, start.phi);
    assert_close(end.radius, start.radius);
    assert!(!controls.update(&mut camera));
}

#[test]
fn camera_keeps_looking_at_target() {
    let mut camera = yurt::build_camera(1.0);
    let mut controls = yurt::build_controls(&default_viewport());
    controls.rotate_left(1.0);
    controls.rotate_up(0.3);
    for _ in 0..10 {
        controls.update(&mut camera);
        assert_eq!(camera.target, controls.target);
    }
}

#[test]
fn distance_is_kept_unless_zoomed() {
    let mut camera = yurt::build_camera(1.0);
    let mut controls = yurt::build_controls(&default_viewport());
    let radius = offset(&camera, &controls).magnitude();

    controls.rotate_left(2.0);
    controls.rotate_up(-0.4);
    for _ in 0..50 {
        controls.update(&mut camera);
        assert_close(offset(&camera, &controls).magnitude(), radius);
    }

    controls.wheel(1.0);
    controls.update(&mut camera);
    assert_close(offset(&camera, &controls).magnitude(), radius * 0.95);

    controls.wheel(-1.0);
    controls.update(&mut camera);
    assert_close(offset(&camera, &controls).magnitude(), radius);

    controls.wheel(0.0);
    controls.update(&mut camera);
    assert_close(offset(&camera, &controls).magnitude(), radius);
}

#[test]
fn zoom_respects_distance_limits() {
    let mut camera = yurt::build_camera(1.0);
    let mut controls = OrbitControls::new(Point3::new(0.0, 0.0, 0.0));
    controls.min_distance = 5.0;
    controls.max_distance = 8.0;

    for _ in 0..100 {
        controls.wheel(1.0);
        controls.update(&mut camera);
    }
    assert_close(offset(&camera, &controls).magnitude(), 5.0);

    for _ in 0..100 {
        controls.wheel(-1.0);
        controls.update(&mut camera);
    }
    assert_close(offset(&camera, &controls).magnitude(), 8.0);
}

#[test]
fn polar_angle_stays_off_the_poles() {
    let mut camera = yurt::build_camera(1.0);
    let mut controls = yurt::build_controls(&default_viewport());

    controls.rotate_up(20.0);
    for _ in 0..200 {
        controls.update(&mut camera);
        let phi = polar_angle(offset(&camera, &controls));
        assert!(phi > 0.0 && phi < PI, "phi {phi}");
    }

    controls.rotate_up(-40.0);
    for _ in 0..200 {
        controls.update(&mut camera);
        let phi = polar_angle(offset(&camera, &controls));
        assert!(phi > 0.0 && phi < PI, "phi {phi}");
        assert!(camera.view_matrix().x.x.is_finite());
    }
}

#[test]
fn primary_drag_rotates_without_damping() {
    let mut camera = yurt::build_camera(1.0);
    let mut controls = OrbitControls::new(Point3::new(0.0, 0.0, 0.0));
    controls.set_viewport_height(720.0);
    let start = Spherical::from_vector(offset(&camera, &controls));

    controls.pointer_down(PointerButton::Primary, 100.0, 100.0);
    assert!(controls.is_dragging());
    controls.pointer_move(190.0, 100.0, &camera);
    controls.pointer_up();
    assert!(!controls.is_dragging());

    assert!(controls.update(&mut camera));
    let end = Spherical::from_vector(offset(&camera, &controls));
    assert_close(end.theta, start.theta - 2.0 * PI * 90.0 / 720.0);
    assert!(!controls.update(&mut camera));

    // moves without a pressed button are ignored
    controls.pointer_move(400.0, 400.0, &camera);
    assert!(!controls.update(&mut camera));
}

#[test]
fn secondary_drag_pans_target_and_camera_together() {
    let mut camera = yurt::build_camera(1.0);
    let mut controls = OrbitControls::new(Point3::new(0.0, 0.0, 0.0));
    controls.set_viewport_height(720.0);
    let before = offset(&camera, &controls);

    controls.pointer_down(PointerButton::Secondary, 300.0, 300.0);
    controls.pointer_move(360.0, 330.0, &camera);
    controls.pointer_up();
    controls.update(&mut camera);

    assert_ne!(controls.target, Point3::new(0.0, 0.0, 0.0));
    let after = offset(&camera, &controls);
    assert!((after - before).magnitude() < 1e-4);
}

#[test]
fn spherical_round_trips_through_vectors() {
    let v = Vector3::new(4.0, 2.0, 5.0);
    let s = Spherical::from_vector(v);
    assert_close(s.radius, v.magnitude());
    assert_close(s.theta, 4.0f32.atan2(5.0));
    assert!((s.to_vector() - v).magnitude() < 1e-4);

    let mut pole = Spherical::from_vector(Vector3::new(0.0, 3.0, 0.0));
    assert_eq!(pole.phi, 0.0);
    pole.make_safe();
    assert!(pole.phi > 0.0);
    assert_eq!(Spherical::from_vector(Vector3::new(0.0, 0.0, 0.0)), Spherical::default());
}
