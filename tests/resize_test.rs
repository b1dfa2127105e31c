mod common;

use yurt_scene::{
    Settings,
    viewport::{OutputSize, Viewport, apply_resize, clamp_pixel_ratio},
    yurt,
};

use crate::common::test_utils::assert_close;

#[test]
fn resize_updates_camera_and_output() {
    let max = Settings::default().max_pixel_ratio;
    let mut camera = yurt::build_camera(1280.0 / 720.0);
    let mut output = OutputSize::default();

    let applied = apply_resize(&Viewport::new(1024, 768, 1.0), &mut camera, &mut output, max);

    assert!(applied);
    assert_close(camera.aspect, 1024.0 / 768.0);
    assert_eq!((output.width, output.height), (1024, 768));
    assert_eq!(output.pixel_ratio, 1.0);
    assert_eq!(output.drawing_buffer(), (1024, 768));
}

#[test]
fn pixel_ratio_is_capped_at_two() {
    let mut camera = yurt::build_camera(1.0);
    let mut output = OutputSize::default();

    apply_resize(&Viewport::new(1024, 768, 3.0), &mut camera, &mut output, 2.0);
    assert_eq!(output.pixel_ratio, 2.0);
    assert_eq!(output.drawing_buffer(), (2048, 1536));

    apply_resize(&Viewport::new(1024, 768, 1.5), &mut camera, &mut output, 2.0);
    assert_eq!(output.pixel_ratio, 1.5);
    assert_eq!(output.drawing_buffer(), (1536, 1152));

    assert_eq!(clamp_pixel_ratio(2.625, 2.0), 2.0);
    assert_eq!(clamp_pixel_ratio(1.0, 2.0), 1.0);
}

#[test]
fn projection_follows_aspect() {
    let mut camera = yurt::build_camera(1.0);
    let square = camera.projection_matrix();
    let mut output = OutputSize::default();

    apply_resize(&Viewport::new(1600, 800, 1.0), &mut camera, &mut output, 2.0);

    let wide = camera.projection_matrix();
    assert_close(wide.y.y, square.y.y);
    assert_close(wide.x.x, square.x.x / 2.0);
}

#[test]
fn empty_viewport_is_ignored() {
    let mut camera = yurt::build_camera(4.0 / 3.0);
    let mut output = OutputSize::default();
    apply_resize(&Viewport::new(800, 600, 1.0), &mut camera, &mut output, 2.0);

    assert!(!apply_resize(&Viewport::new(0, 600, 1.0), &mut camera, &mut output, 2.0));
    assert!(!apply_resize(&Viewport::new(800, 0, 1.0), &mut camera, &mut output, 2.0));
    assert_close(camera.aspect, 800.0 / 600.0);
    assert_eq!((output.width, output.height), (800, 600));
}

#[test]
fn physical_sizes_convert_to_logical() {
    let viewport = Viewport::from_physical(winit::dpi::PhysicalSize::new(2048, 1536), 2.0);
    assert_eq!(viewport, Viewport::new(1024, 768, 2.0));
    assert_close(viewport.aspect(), 1024.0 / 768.0);
    assert!(Viewport::new(0, 0, 1.0).is_empty());
}

#[test]
fn drawing_buffer_never_collapses() {
    let output = OutputSize {
        width: 1,
        height: 1,
        pixel_ratio: 0.25,
    };
    assert_eq!(output.drawing_buffer(), (1, 1));
}
