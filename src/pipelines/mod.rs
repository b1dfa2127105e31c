//! Render pipelines and their GPU-side uniforms.
//!
//! - `standard` draws lit, textured meshes
//! - `light` packs the scene lights into a uniform buffer
//! - `gui` draws the debug panel overlay

pub mod gui;
pub mod light;
pub mod standard;
