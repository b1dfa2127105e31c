//! Light uniform: every light of the scene packed into one buffer.

use cgmath::{EuclideanSpace, InnerSpace, Point3};
use wgpu::util::DeviceExt;

use crate::data_structures::{
    light::LightKind,
    scene_graph::Scene,
};

pub const MAX_DIRECTIONAL_LIGHTS: usize = 2;
pub const MAX_POINT_LIGHTS: usize = 4;

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DirectionalLightRaw {
    /// Points from the target towards the light.
    pub direction: [f32; 3],
    // Due to uniforms requiring 16 byte (4 float) spacing, we need to use a padding field here
    _padding: u32,
    pub color: [f32; 3],
    _padding2: u32,
}

#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightRaw {
    pub position: [f32; 3],
    pub distance: f32,
    pub color: [f32; 3],
    pub decay: f32,
}

/// Light colours are premultiplied with their intensity.
#[repr(C)]
#[derive(Debug, Default, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightUniform {
    pub ambient: [f32; 4],
    pub directional: [DirectionalLightRaw; MAX_DIRECTIONAL_LIGHTS],
    pub point: [PointLightRaw; MAX_POINT_LIGHTS],
    /// x: directional count, y: point count
    pub counts: [u32; 4],
}

impl LightUniform {
    /// Collects the lights of `scene` at their world positions.
    ///
    /// Lights beyond the per-kind limit are dropped with a warning.
    pub fn from_scene(scene: &Scene) -> Self {
        let mut uniform = Self::default();
        let mut ambient = [0.0f32; 3];
        let mut directional = 0usize;
        let mut point = 0usize;

        for placed in scene.lights() {
            let light = placed.item;
            let color = light.color.scaled(light.intensity);
            let position = Point3::from_vec(placed.world.position);
            match light.kind {
                LightKind::Ambient => {
                    for (sum, c) in ambient.iter_mut().zip(color) {
                        *sum += c;
                    }
                }
                LightKind::Directional { target } => {
                    if directional == MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("ignoring directional light {:?}", placed.node.name);
                        continue;
                    }
                    let direction = position - target;
                    let direction = if direction.magnitude2() > 0.0 {
                        direction.normalize()
                    } else {
                        cgmath::Vector3::unit_y()
                    };
                    uniform.directional[directional] = DirectionalLightRaw {
                        direction: direction.into(),
                        color,
                        ..Default::default()
                    };
                    directional += 1;
                }
                LightKind::Point { distance, decay } => {
                    if point == MAX_POINT_LIGHTS {
                        log::warn!("ignoring point light {:?}", placed.node.name);
                        continue;
                    }
                    uniform.point[point] = PointLightRaw {
                        position: position.into(),
                        distance,
                        color,
                        decay,
                    };
                    point += 1;
                }
            }
        }

        uniform.ambient = [ambient[0], ambient[1], ambient[2], 1.0];
        uniform.counts = [directional as u32, point as u32, 0, 0];
        uniform
    }
}

#[derive(Debug)]
pub struct LightResources {
    pub uniform: LightUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl LightResources {
    pub fn new(device: &wgpu::Device, scene: &Scene) -> Self {
        let uniform = LightUniform::from_scene(scene);
        let buffer = mk_buffer(device, uniform);
        let bind_group_layout = mk_bind_group_layout(device);
        let bind_group = mk_bind_group(device, &bind_group_layout, &buffer);
        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    /// Re-reads the lights; the debug panel may have moved or dimmed them.
    pub fn write(&mut self, queue: &wgpu::Queue, scene: &Scene) {
        let uniform = LightUniform::from_scene(scene);
        if uniform != self.uniform {
            self.uniform = uniform;
            queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
        }
    }
}

pub fn mk_buffer(device: &wgpu::Device, light_uniform: LightUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Light Buffer"),
        contents: bytemuck::cast_slice(&[light_uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

pub fn mk_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        }],
        label: Some("light_bind_group_layout"),
    })
}

pub fn mk_bind_group(
    device: &wgpu::Device,
    bind_group_layout: &wgpu::BindGroupLayout,
    light_buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout: bind_group_layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: light_buffer.as_entire_binding(),
        }],
        label: Some("light_bind_group"),
    })
}
