//! Scene data structures: scene graph, geometry, materials, lights and textures.
//!
//! - `scene_graph` holds the node tree and resolves world transforms
//! - `transform` is a node's position, rotation and scale plus its GPU layout
//! - `geometry` generates sphere, plane and cylinder meshes
//! - `model` contains vertex formats and GPU mesh buffers
//! - `material` is the physically based surface description
//! - `light` covers light kinds, colours and shadow settings
//! - `texture` wraps GPU textures and samplers

pub mod geometry;
pub mod light;
pub mod material;
pub mod model;
pub mod scene_graph;
pub mod texture;
pub mod transform;
