//! The yurt scene.
//!
//! Everything the application shows is assembled here: the textures it
//! requests, the scene graph (walls, door, roof, pedestal, floor and three
//! lights), the camera with its orbit controls and the debug panel bindings.
//! Assembly is synchronous; materials hold texture handles whose images arrive
//! later.

use std::f32::consts::PI;

use cgmath::{Deg, Point3, Rad};

use crate::{
    camera::PerspectiveCamera,
    controls::OrbitControls,
    data_structures::{
        geometry::Geometry,
        light::{Color, Light, ShadowConfig},
        material::StandardMaterial,
        scene_graph::{Scene, SceneNode},
        transform::Transform,
    },
    debug::{Binding, DebugPanel, Field},
    resources::texture::{TextureHandle, TextureRegistry, Wrapping},
    viewport::Viewport,
};

pub const DOOR_TEXTURE: &str = "textures/door/door.jpg";
pub const BRICKS_ROUGHNESS_TEXTURE: &str = "textures/bricks/roughness.jpg";
pub const ROOF_TEXTURE: &str = "textures/roof/roof.png";
pub const SUN_BATTERY_TEXTURE: &str = "textures/sunBattery/sunBatteryTexture.jpg";
pub const TABALDYRYQ_TEXTURE: &str = "textures/tabaldyryq/grayTexture.jpg";
pub const GRASS_COLOR_TEXTURE: &str = "textures/grass/color.jpg";
pub const GRASS_AMBIENT_OCCLUSION_TEXTURE: &str = "textures/grass/ambientOcclusion.jpg";
pub const GRASS_NORMAL_TEXTURE: &str = "textures/grass/normal.jpg";
pub const GRASS_ROUGHNESS_TEXTURE: &str = "textures/grass/roughness.jpg";

pub const YURT: &str = "yurt";
pub const WALLS: &str = "walls";
pub const DOOR: &str = "door";
pub const ROOF: &str = "roof";
pub const TABALDYRYQ: &str = "tabaldyryq";
pub const DOOR_LIGHT: &str = "door_light";
pub const FLOOR: &str = "floor";
pub const AMBIENT_LIGHT: &str = "ambient_light";
pub const MOON_LIGHT: &str = "moon_light";

/// How often the grass textures tile across the floor, per axis.
pub const GRASS_REPEAT: f32 = 8.0;

/// Handles of every texture the scene requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct YurtTextures {
    pub door: TextureHandle,
    pub bricks_roughness: TextureHandle,
    pub roof: TextureHandle,
    /// Requested with the rest but not bound to any material yet.
    pub sun_battery: TextureHandle,
    pub tabaldyryq: TextureHandle,
    pub grass_color: TextureHandle,
    pub grass_ambient_occlusion: TextureHandle,
    pub grass_normal: TextureHandle,
    pub grass_roughness: TextureHandle,
}

impl YurtTextures {
    pub fn request(registry: &mut TextureRegistry) -> Self {
        let textures = Self {
            door: registry.load(DOOR_TEXTURE),
            bricks_roughness: registry.load(BRICKS_ROUGHNESS_TEXTURE),
            roof: registry.load(ROOF_TEXTURE),
            sun_battery: registry.load(SUN_BATTERY_TEXTURE),
            tabaldyryq: registry.load(TABALDYRYQ_TEXTURE),
            grass_color: registry.load(GRASS_COLOR_TEXTURE),
            grass_ambient_occlusion: registry.load(GRASS_AMBIENT_OCCLUSION_TEXTURE),
            grass_normal: registry.load(GRASS_NORMAL_TEXTURE),
            grass_roughness: registry.load(GRASS_ROUGHNESS_TEXTURE),
        };
        for grass in textures.grass() {
            registry.set_repeat(grass, GRASS_REPEAT, GRASS_REPEAT);
            registry.set_wrapping(grass, Wrapping::Repeat, Wrapping::Repeat);
        }
        textures
    }

    pub fn grass(&self) -> [TextureHandle; 4] {
        [
            self.grass_color,
            self.grass_ambient_occlusion,
            self.grass_normal,
            self.grass_roughness,
        ]
    }
}

fn shadow(map_size: u32, camera_far: f32) -> ShadowConfig {
    ShadowConfig {
        map_width: map_size,
        map_height: map_size,
        camera_far,
        ..Default::default()
    }
}

pub fn build_scene(textures: &YurtTextures) -> Scene {
    let mut scene = Scene::new();

    let mut yurt = SceneNode::group(YURT);

    // The bricks texture doubles as every map of the walls.
    let bricks = textures.bricks_roughness;
    yurt.add_child(
        SceneNode::mesh(
            WALLS,
            Geometry::sphere(4.0, 16, 12),
            StandardMaterial {
                map: Some(bricks),
                ao_map: Some(bricks),
                normal_map: Some(bricks),
                roughness_map: Some(bricks),
                ..Default::default()
            },
        )
        .with_position(0.0, 1.0, 0.0),
    );
    yurt.add_child(
        SceneNode::mesh(
            DOOR,
            Geometry::plane(1.5, 2.0),
            StandardMaterial::textured(textures.door),
        )
        .with_position(0.0, 1.5, 4.0),
    );
    yurt.add_child(
        SceneNode::mesh(
            ROOF,
            Geometry::cylinder(1.0, 1.0, 2.0, 32),
            StandardMaterial::textured(textures.roof),
        )
        .with_position(0.0, 4.0, 0.0),
    );
    yurt.add_child(
        SceneNode::mesh(
            TABALDYRYQ,
            Geometry::cylinder(6.0, 1.0, 2.0, 32),
            StandardMaterial::textured(textures.tabaldyryq),
        )
        .with_position(0.0, -0.9, 0.0),
    );
    yurt.add_child(
        SceneNode::light(
            DOOR_LIGHT,
            Light::point(Color::hex(0xff7d46), 1.0, 7.0).with_shadow(shadow(256, 7.0)),
        )
        .with_position(0.0, 2.2, 2.7),
    );
    scene.add(yurt);

    scene.add(
        SceneNode::mesh(
            FLOOR,
            Geometry::plane(20.0, 20.0),
            StandardMaterial {
                map: Some(textures.grass_color),
                ao_map: Some(textures.grass_ambient_occlusion),
                normal_map: Some(textures.grass_normal),
                roughness_map: Some(textures.grass_roughness),
                ..Default::default()
            },
        )
        .with_transform(Transform::new().with_rotation_x(Rad(-PI * 0.5)))
        .receiving_shadow(),
    );

    scene.add(SceneNode::light(
        AMBIENT_LIGHT,
        Light::ambient(Color::hex(0xffffff), 0.7),
    ));
    scene.add(
        SceneNode::light(
            MOON_LIGHT,
            Light::directional(Color::hex(0xb9d5ff), 0.5).with_shadow(shadow(256, 15.0)),
        )
        .with_position(4.0, 5.0, -2.0),
    );

    scene
}

pub fn build_camera(aspect: f32) -> PerspectiveCamera {
    let mut camera = PerspectiveCamera::new(Deg(75.0), aspect, 0.1, 100.0);
    camera.position = Point3::new(4.0, 2.0, 5.0);
    camera.look_at(Point3::new(0.0, 0.0, 0.0));
    camera
}

pub fn build_controls(viewport: &Viewport) -> OrbitControls {
    let mut controls = OrbitControls::new(Point3::new(0.0, 0.0, 0.0));
    controls.enable_damping = true;
    controls.set_viewport_height(viewport.height as f32);
    controls
}

pub fn build_debug_panel() -> DebugPanel {
    let mut panel = DebugPanel::new();
    panel.add(Binding::new(AMBIENT_LIGHT, Field::Intensity, 0.0, 1.0, 0.001));
    panel.add(Binding::new(MOON_LIGHT, Field::Intensity, 0.0, 1.0, 0.001));
    panel.add(Binding::new(MOON_LIGHT, Field::PositionX, -5.0, 5.0, 0.001));
    panel.add(Binding::new(MOON_LIGHT, Field::PositionY, -5.0, 5.0, 0.001));
    panel.add(Binding::new(MOON_LIGHT, Field::PositionZ, -5.0, 5.0, 0.001));
    panel
}

/// Everything that is built before the first frame.
#[derive(Debug)]
pub struct Assembly {
    pub textures: YurtTextures,
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub panel: DebugPanel,
}

pub fn assemble(registry: &mut TextureRegistry, viewport: &Viewport) -> Assembly {
    let textures = YurtTextures::request(registry);
    let scene = build_scene(&textures);
    let camera = build_camera(viewport.aspect());
    let controls = build_controls(viewport);
    let panel = build_debug_panel();
    log::info!(
        "scene assembled: {} meshes, {} lights, {} textures requested",
        scene.meshes().len(),
        scene.lights().len(),
        registry.len()
    );
    Assembly {
        textures,
        scene,
        camera,
        controls,
        panel,
    }
}
