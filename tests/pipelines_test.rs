mod common;

use cgmath::{InnerSpace, Vector3};
use yurt_scene::{
    data_structures::{
        light::{Color, Light},
        material::StandardMaterial,
        scene_graph::{Scene, SceneNode},
    },
    debug::{PanelQuad, Rect},
    pipelines::{
        gui::{self, VERTICES_PER_QUAD},
        light::{LightUniform, MAX_DIRECTIONAL_LIGHTS, MAX_POINT_LIGHTS},
        standard::MaterialUniform,
    },
    viewport::Viewport,
    yurt,
};

use crate::common::test_utils::{assembled, assert_close, default_viewport};

fn assert_vec_close(actual: [f32; 3], expected: [f32; 3]) {
    for (a, e) in actual.into_iter().zip(expected) {
        assert_close(a, e);
    }
}

#[test]
fn yurt_lights_pack_into_uniform() {
    let (_, assembly) = assembled();
    let uniform = LightUniform::from_scene(&assembly.scene);

    assert_eq!(uniform.counts, [1, 1, 0, 0]);
    assert_vec_close(
        [uniform.ambient[0], uniform.ambient[1], uniform.ambient[2]],
        [0.7, 0.7, 0.7],
    );

    let moon = uniform.directional[0];
    let towards_moon = Vector3::new(4.0f32, 5.0, -2.0).normalize();
    assert_vec_close(moon.direction, towards_moon.into());
    assert_vec_close(moon.color, Color::hex(0xb9d5ff).scaled(0.5));

    let lantern = uniform.point[0];
    assert_vec_close(lantern.position, [0.0, 2.2, 2.7]);
    assert_eq!(lantern.distance, 7.0);
    assert_eq!(lantern.decay, 2.0);
    assert_vec_close(lantern.color, Color::hex(0xff7d46).to_array());
}

#[test]
fn panel_edits_show_up_in_the_uniform() {
    let (_, mut assembly) = assembled();
    let before = LightUniform::from_scene(&assembly.scene);

    assembly.panel.set(&mut assembly.scene, 0, 0.2);
    assembly.panel.set(&mut assembly.scene, 2, -4.0);
    let after = LightUniform::from_scene(&assembly.scene);

    assert_ne!(before, after);
    assert_close(after.ambient[0], 0.2);
    let towards_moon = Vector3::new(-4.0f32, 5.0, -2.0).normalize();
    assert_vec_close(after.directional[0].direction, towards_moon.into());
}

#[test]
fn lights_beyond_the_limits_are_dropped() {
    let mut scene = Scene::new();
    for i in 0..MAX_DIRECTIONAL_LIGHTS + 2 {
        scene.add(
            SceneNode::light(&format!("sun{i}"), Light::directional(Color::WHITE, 1.0))
                .with_position(0.0, 1.0, 0.0),
        );
    }
    for i in 0..MAX_POINT_LIGHTS + 1 {
        scene.add(SceneNode::light(
            &format!("lamp{i}"),
            Light::point(Color::WHITE, 1.0, 0.0),
        ));
    }
    scene.add(SceneNode::light("fill", Light::ambient(Color::WHITE, 0.25)));
    scene.add(SceneNode::light("bounce", Light::ambient(Color::hex(0xff0000), 0.5)));

    let uniform = LightUniform::from_scene(&scene);
    assert_eq!(
        uniform.counts,
        [MAX_DIRECTIONAL_LIGHTS as u32, MAX_POINT_LIGHTS as u32, 0, 0]
    );
    // ambient lights add up
    assert_eq!(uniform.ambient, [0.75, 0.25, 0.25, 1.0]);
    assert_eq!(uniform.directional[1].direction, [0.0, 1.0, 0.0]);
}

#[test]
fn light_on_its_target_points_up() {
    let mut scene = Scene::new();
    scene.add(SceneNode::light("sun", Light::directional(Color::WHITE, 1.0)));
    let uniform = LightUniform::from_scene(&scene);
    assert_eq!(uniform.directional[0].direction, [0.0, 1.0, 0.0]);
}

#[test]
fn floor_material_tiles_every_map() {
    let (registry, assembly) = assembled();
    let floor = assembly
        .scene
        .find(yurt::FLOOR)
        .and_then(|n| n.as_mesh())
        .expect("floor");
    let uniform = MaterialUniform::new(&floor.material, &registry);

    assert_eq!(uniform.map_repeat, [8.0; 4]);
    assert_eq!(uniform.normal_repeat, [8.0; 4]);
    assert_eq!(uniform.color, [1.0, 1.0, 1.0, 1.0]);
    // roughness, metalness, normal scale, ao intensity
    assert_eq!(uniform.params, [1.0, 0.0, 1.0, 1.0]);
}

#[test]
fn untiled_and_missing_maps_repeat_once() {
    let (registry, assembly) = assembled();
    let walls = assembly
        .scene
        .find(yurt::WALLS)
        .and_then(|n| n.as_mesh())
        .expect("walls");
    let uniform = MaterialUniform::new(&walls.material, &registry);
    assert_eq!(uniform.map_repeat, [1.0; 4]);
    assert_eq!(uniform.normal_repeat, [1.0; 4]);

    let plain = MaterialUniform::new(&StandardMaterial::default(), &registry);
    assert_eq!(plain.map_repeat, [1.0; 4]);
    assert_eq!(plain.normal_repeat, [1.0; 4]);
}

#[test]
fn quads_map_to_clip_space() {
    let viewport = Viewport::new(200, 100, 1.0);
    let quad = PanelQuad {
        rect: Rect {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
        },
        color: [1.0, 0.5, 0.25, 1.0],
    };
    let vertices = gui::quad_vertices(&[quad], &viewport);
    assert_eq!(vertices.len(), VERTICES_PER_QUAD);

    let positions: Vec<[f32; 2]> = vertices.iter().map(|v| v.position).collect();
    assert_eq!(
        positions,
        vec![
            [-1.0, 1.0],
            [-1.0, 0.0],
            [0.0, 0.0],
            [-1.0, 1.0],
            [0.0, 0.0],
            [0.0, 1.0],
        ]
    );
    assert!(vertices.iter().all(|v| v.color == quad.color));

    // counter-clockwise in clip space
    for tri in positions.chunks(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let cross = (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0]);
        assert!(cross > 0.0);
    }

    assert!(gui::quad_vertices(&[quad], &Viewport::new(0, 0, 1.0)).is_empty());
}

#[test]
fn panel_vertices_fit_the_reserved_buffer() {
    let (_, assembly) = assembled();
    let viewport = default_viewport();
    let quads = assembly.panel.quads(&assembly.scene, &viewport);
    let vertices = gui::quad_vertices(&quads, &viewport);

    assert_eq!(vertices.len(), quads.len() * VERTICES_PER_QUAD);
    assert!(vertices.len() <= assembly.panel.max_quads() * VERTICES_PER_QUAD);
    for vertex in &vertices {
        assert!((-1.0..=1.0).contains(&vertex.position[0]));
        assert!((-1.0..=1.0).contains(&vertex.position[1]));
    }
}
