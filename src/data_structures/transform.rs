//! Node transforms and their GPU representation.
//!
//! Every scene node carries a local [`Transform`]. World transforms are the
//! product of all parent transforms with the local one, so composing
//! `parent * local` is the only operation the scene graph needs.

use std::ops::Mul;

use cgmath::{One, Rad, Rotation3};

use crate::data_structures::model;

/// Position, rotation (as quaternion) and scale of a scene node.
#[derive(Clone, Debug, PartialEq)]
pub struct Transform {
    pub position: cgmath::Vector3<f32>,
    pub rotation: cgmath::Quaternion<f32>,
    pub scale: cgmath::Vector3<f32>,
}

impl Transform {
    /// Identity transform (no move, rotate, or scale).
    pub fn new() -> Self {
        Self {
            position: cgmath::Vector3::new(0.0, 0.0, 0.0),
            // `Quaternion::one()` is the identity quaternion (no rotation)
            rotation: cgmath::Quaternion::one(),
            scale: cgmath::Vector3::new(1.0, 1.0, 1.0),
        }
    }

    /// Rotates around the X axis by `angle`, replacing any previous rotation.
    pub fn with_rotation_x(mut self, angle: Rad<f32>) -> Self {
        self.rotation = cgmath::Quaternion::from_angle_x(angle);
        self
    }

    pub fn to_matrix(&self) -> cgmath::Matrix4<f32> {
        cgmath::Matrix4::from_translation(self.position)
            * cgmath::Matrix4::from(self.rotation)
            * cgmath::Matrix4::from_nonuniform_scale(self.scale.x, self.scale.y, self.scale.z)
    }

    pub fn to_raw(&self) -> TransformRaw {
        TransformRaw {
            model: self.to_matrix().into(),
            normal: cgmath::Matrix3::from(self.rotation).into(),
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, 'b> Mul<&'b Transform> for &'a Transform {
    type Output = Transform;

    fn mul(self, rhs: &'b Transform) -> Self::Output {
        let new_rotation = self.rotation * rhs.rotation;

        let new_scale = cgmath::Vector3::new(
            self.scale.x * rhs.scale.x,
            self.scale.y * rhs.scale.y,
            self.scale.z * rhs.scale.z,
        );
        let scaled_rhs_pos = cgmath::Vector3::new(
            self.scale.x * rhs.position.x,
            self.scale.y * rhs.position.y,
            self.scale.z * rhs.position.z,
        );
        let new_position = self.position + (self.rotation * scaled_rhs_pos);

        Transform {
            position: new_position,
            rotation: new_rotation,
            scale: new_scale,
        }
    }
}

impl Mul<Transform> for Transform {
    type Output = Self;

    fn mul(self, rhs: Transform) -> Self::Output {
        &self * &rhs
    }
}

/**
 * The raw transform is the actual data stored on the GPU, one per drawn mesh.
 */
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct TransformRaw {
    model: [[f32; 4]; 4],
    normal: [[f32; 3]; 3],
}

/**
 * Stride layout here: the model matrix as four vec4 slots followed by the
 * normal matrix as three vec3 slots. The buffer advances per instance.
 */
impl model::Vertex for TransformRaw {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<TransformRaw>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 5,
                    format: wgpu::VertexFormat::Float32x4,
                },
                // A mat4 takes up 4 vertex slots as it is technically 4 vec4s.
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 4]>() as wgpu::BufferAddress,
                    shader_location: 6,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 8]>() as wgpu::BufferAddress,
                    shader_location: 7,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 12]>() as wgpu::BufferAddress,
                    shader_location: 8,
                    format: wgpu::VertexFormat::Float32x4,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 16]>() as wgpu::BufferAddress,
                    shader_location: 9,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 19]>() as wgpu::BufferAddress,
                    shader_location: 10,
                    format: wgpu::VertexFormat::Float32x3,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 22]>() as wgpu::BufferAddress,
                    shader_location: 11,
                    format: wgpu::VertexFormat::Float32x3,
                },
            ],
        }
    }
}
