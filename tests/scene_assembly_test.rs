mod common;

use std::f32::consts::PI;

use cgmath::{Euler, InnerSpace, Vector3};
use yurt_scene::{
    data_structures::{
        geometry::Geometry,
        light::{Color, LightKind},
    },
    resources::texture::{LoadState, Wrapping},
    yurt,
};

use crate::common::test_utils::{assembled, assert_close};

#[test]
fn scene_has_expected_lights_and_meshes() {
    let (_, assembly) = assembled();
    let scene = &assembly.scene;

    let ambient = scene.lights_of(|k| matches!(k, LightKind::Ambient));
    let directional = scene.lights_of(|k| matches!(k, LightKind::Directional { .. }));
    let point = scene.lights_of(|k| matches!(k, LightKind::Point { .. }));
    assert_eq!(ambient.len(), 1);
    assert_eq!(directional.len(), 1);
    assert_eq!(point.len(), 1);
    assert!(directional[0].item.casts_shadow());

    // floor plus the four yurt parts
    assert_eq!(scene.meshes().len(), 5);
    let floor = scene.find(yurt::FLOOR).and_then(|n| n.as_mesh());
    assert!(floor.is_some_and(|m| m.receive_shadow));

    let group = scene.find(yurt::YURT).expect("yurt group");
    assert!(group.is_group());
    let children: Vec<&str> = group.children.iter().map(|c| c.name.as_str()).collect();
    for name in [yurt::WALLS, yurt::DOOR, yurt::ROOF, yurt::TABALDYRYQ] {
        assert!(children.contains(&name), "{name} missing from {children:?}");
    }
}

#[test]
fn yurt_parts_use_their_primitives() {
    let (_, assembly) = assembled();
    let geometry = |name: &str| {
        assembly
            .scene
            .find(name)
            .and_then(|n| n.as_mesh())
            .map(|m| m.geometry.clone())
    };

    assert_eq!(geometry(yurt::WALLS), Some(Geometry::sphere(4.0, 16, 12)));
    assert_eq!(geometry(yurt::DOOR), Some(Geometry::plane(1.5, 2.0)));
    assert_eq!(geometry(yurt::ROOF), Some(Geometry::cylinder(1.0, 1.0, 2.0, 32)));
    assert_eq!(
        geometry(yurt::TABALDYRYQ),
        Some(Geometry::cylinder(6.0, 1.0, 2.0, 32))
    );
    assert_eq!(geometry(yurt::FLOOR), Some(Geometry::plane(20.0, 20.0)));
}

#[test]
fn floor_lies_flat_with_tiled_grass() {
    let (registry, assembly) = assembled();
    let floor = assembly.scene.find(yurt::FLOOR).expect("floor");

    let euler = Euler::from(floor.transform.rotation);
    assert_close(euler.x.0, -PI * 0.5);
    let normal = floor.transform.rotation * Vector3::unit_z();
    assert!((normal - Vector3::unit_y()).magnitude() < 1e-5);

    for handle in assembly.textures.grass() {
        let settings = registry.settings(handle).expect("grass settings");
        assert_eq!(settings.repeat, cgmath::Vector2::new(8.0, 8.0));
        assert_eq!(settings.wrap_s, Wrapping::Repeat);
        assert_eq!(settings.wrap_t, Wrapping::Repeat);
    }

    let material = &floor.as_mesh().expect("floor mesh").material;
    assert_eq!(material.map, Some(assembly.textures.grass_color));
    assert_eq!(
        material.ao_map,
        Some(assembly.textures.grass_ambient_occlusion)
    );
    assert_eq!(material.normal_map, Some(assembly.textures.grass_normal));
    assert_eq!(
        material.roughness_map,
        Some(assembly.textures.grass_roughness)
    );
}

#[test]
fn door_light_matches_lantern() {
    let (_, assembly) = assembled();
    let node = assembly.scene.find(yurt::DOOR_LIGHT).expect("door light");
    let light = node.as_light().expect("a light");

    assert_eq!(light.intensity, 1.0);
    assert_eq!(light.color, Color::hex(0xff7d46));
    assert_eq!(light.color, "#ff7d46".parse::<Color>().expect("colour"));
    assert!(matches!(
        light.kind,
        LightKind::Point { distance, .. } if distance == 7.0
    ));
    let shadow = light.shadow.expect("door light casts shadows");
    assert_eq!((shadow.map_width, shadow.map_height), (256, 256));
    assert_eq!(shadow.camera_far, 7.0);
    assert_eq!(node.transform.position, Vector3::new(0.0, 2.2, 2.7));
}

#[test]
fn moon_light_defaults() {
    let (_, assembly) = assembled();
    let node = assembly.scene.find(yurt::MOON_LIGHT).expect("moon light");
    let light = node.as_light().expect("a light");

    assert_eq!(light.intensity, 0.5);
    assert_eq!(light.color, Color::hex(0xb9d5ff));
    assert_eq!(node.transform.position, Vector3::new(4.0, 5.0, -2.0));
    let shadow = light.shadow.expect("moon light casts shadows");
    assert_eq!(shadow.map_width, 256);
    assert_eq!(shadow.camera_far, 15.0);

    let ambient = assembly
        .scene
        .find(yurt::AMBIENT_LIGHT)
        .and_then(|n| n.as_light())
        .expect("ambient light");
    assert_eq!(ambient.intensity, 0.7);
}

#[test]
fn shared_texture_paths_are_requested_once() {
    let (mut registry, assembly) = assembled();

    assert_eq!(registry.len(), 9);
    let requests = registry.take_requests();
    assert_eq!(requests.len(), 9);
    assert!(registry.take_requests().is_empty());

    // the walls use one texture for all four maps
    let walls = assembly
        .scene
        .find(yurt::WALLS)
        .and_then(|n| n.as_mesh())
        .expect("walls");
    let bricks = assembly.textures.bricks_roughness;
    assert_eq!(walls.material.textures().count(), 4);
    assert!(walls.material.textures().all(|h| h == bricks));

    // requesting the same path again hands out the existing handle
    assert_eq!(registry.load(yurt::DOOR_TEXTURE), assembly.textures.door);
    assert_eq!(registry.len(), 9);
    assert!(registry.take_requests().is_empty());
}

#[test]
fn sun_battery_is_requested_but_unbound() {
    let (registry, assembly) = assembled();
    let sun = assembly.textures.sun_battery;

    assert_eq!(registry.path(sun), Some(yurt::SUN_BATTERY_TEXTURE));
    assert_eq!(registry.state(sun), Some(LoadState::Pending));
    assert!(
        assembly
            .scene
            .meshes()
            .iter()
            .all(|placed| !placed.item.material.uses(sun))
    );
}

#[test]
fn yurt_parts_inherit_group_transform() {
    let (_, assembly) = assembled();
    let mut roof_world = None;
    assembly.scene.walk(&mut |node, world| {
        if node.name == yurt::ROOF {
            roof_world = Some(world.position);
        }
    });
    assert_eq!(roof_world, Some(Vector3::new(0.0, 4.0, 0.0)));
}

#[test]
fn camera_and_panel_start_from_defaults() {
    let (_, assembly) = assembled();
    let camera = &assembly.camera;

    assert_eq!(camera.fovy, cgmath::Deg(75.0));
    assert_eq!((camera.znear, camera.zfar), (0.1, 100.0));
    assert_eq!(camera.position, cgmath::Point3::new(4.0, 2.0, 5.0));
    assert_close(camera.aspect, 1280.0 / 720.0);
    assert!(assembly.controls.enable_damping);

    let labels: Vec<&str> = assembly
        .panel
        .bindings()
        .iter()
        .map(|b| b.label.as_str())
        .collect();
    assert_eq!(
        labels,
        [
            "ambient_light.intensity",
            "moon_light.intensity",
            "moon_light.position.x",
            "moon_light.position.y",
            "moon_light.position.z",
        ]
    );
}
