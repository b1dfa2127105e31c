//! yurt-scene
//!
//! A small 3D scene of a yurt rendered with wgpu on native windows and in
//! the browser (WebGL through wasm). The scene is a retained scene graph of
//! textured meshes and lights, viewed through an orbit camera, with a debug
//! panel for tweaking the lights while it runs.
//!
//! High-level modules
//! - `yurt`: assembles the scene, camera, controls and debug panel
//! - `camera`: perspective camera and its uniform
//! - `controls`: orbit controls with damping
//! - `viewport`: window sizes, pixel ratio and resize handling
//! - `debug`: debug panel bindings, layout and pointer input
//! - `input`: routes pointer input between the panel and the orbit controls
//! - `context`: GPU context owning surface, device and queue
//! - `data_structures`: scene graph, geometry, materials, lights, textures
//! - `pipelines`: render pipelines and shaders (standard, gui, light)
//! - `resources`: texture registry and asynchronous asset loading
//! - `render`: draws the scene graph and the panel
//! - `flow`: frame loop, winit application handler and `run`
//! - `config`: runtime settings
//!

pub mod camera;
pub mod config;
pub mod context;
pub mod controls;
pub mod data_structures;
pub mod debug;
pub mod flow;
pub mod input;
pub mod pipelines;
pub mod render;
pub mod resources;
pub mod viewport;
pub mod yurt;

pub use config::Settings;
pub use flow::run;
