//! Physically based surface pipeline.
//!
//! Bind groups: 0 = material (four texture/sampler pairs plus [`MaterialUniform`]),
//! 1 = camera, 2 = lights. Vertex slot 0 carries
//! [`ModelVertex`](crate::data_structures::model::ModelVertex), slot 1 the
//! per-mesh [`TransformRaw`](crate::data_structures::transform::TransformRaw).

use wgpu::util::DeviceExt;

use crate::{
    data_structures::{
        material::StandardMaterial,
        model::{self, Vertex},
        texture::Texture,
        transform::TransformRaw,
    },
    resources::texture::{TextureHandle, TextureRegistry},
};

/// Texture slots of a material, in binding order.
pub const MATERIAL_SLOTS: usize = 4;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniform {
    pub color: [f32; 4],
    /// roughness, metalness, normal scale, ao intensity
    pub params: [f32; 4],
    /// Repeat of the colour map (xy) and the ao map (zw).
    pub map_repeat: [f32; 4],
    /// Repeat of the normal map (xy) and the roughness map (zw).
    pub normal_repeat: [f32; 4],
}

impl MaterialUniform {
    pub fn new(material: &StandardMaterial, textures: &TextureRegistry) -> Self {
        let repeat = |handle: Option<TextureHandle>| -> [f32; 2] {
            handle
                .and_then(|h| textures.settings(h))
                .map(|s| s.repeat.into())
                .unwrap_or([1.0, 1.0])
        };
        let [mx, my] = repeat(material.map);
        let [ax, ay] = repeat(material.ao_map);
        let [nx, ny] = repeat(material.normal_map);
        let [rx, ry] = repeat(material.roughness_map);
        let c = material.color;
        Self {
            color: [c.r, c.g, c.b, 1.0],
            params: [
                material.roughness,
                material.metalness,
                material.normal_scale,
                material.ao_map_intensity,
            ],
            map_repeat: [mx, my, ax, ay],
            normal_repeat: [nx, ny, rx, ry],
        }
    }
}

pub fn mk_material_bind_group_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
    let mut entries = Vec::with_capacity(MATERIAL_SLOTS * 2 + 1);
    for slot in 0..MATERIAL_SLOTS as u32 {
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: slot * 2,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                multisampled: false,
                view_dimension: wgpu::TextureViewDimension::D2,
                sample_type: wgpu::TextureSampleType::Float { filterable: true },
            },
            count: None,
        });
        entries.push(wgpu::BindGroupLayoutEntry {
            binding: slot * 2 + 1,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
            count: None,
        });
    }
    entries.push(wgpu::BindGroupLayoutEntry {
        binding: MATERIAL_SLOTS as u32 * 2,
        visibility: wgpu::ShaderStages::FRAGMENT,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Uniform,
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    });

    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        entries: &entries,
        label: Some("material_bind_group_layout"),
    })
}

pub fn mk_material_buffer(device: &wgpu::Device, name: &str, uniform: MaterialUniform) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(&format!("{:?} Material Buffer", name)),
        contents: bytemuck::cast_slice(&[uniform]),
        usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
    })
}

/// `textures` are in slot order: colour, ambient occlusion, normal, roughness.
/// Every texture must carry a sampler.
pub fn mk_material_bind_group(
    device: &wgpu::Device,
    layout: &wgpu::BindGroupLayout,
    name: &str,
    textures: [&Texture; MATERIAL_SLOTS],
    uniform_buffer: &wgpu::Buffer,
) -> anyhow::Result<wgpu::BindGroup> {
    let mut entries = Vec::with_capacity(MATERIAL_SLOTS * 2 + 1);
    for (slot, texture) in textures.iter().enumerate() {
        let sampler = texture
            .sampler
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("material {name:?}: texture in slot {slot} has no sampler"))?;
        entries.push(wgpu::BindGroupEntry {
            binding: slot as u32 * 2,
            resource: wgpu::BindingResource::TextureView(&texture.view),
        });
        entries.push(wgpu::BindGroupEntry {
            binding: slot as u32 * 2 + 1,
            resource: wgpu::BindingResource::Sampler(sampler),
        });
    }
    entries.push(wgpu::BindGroupEntry {
        binding: MATERIAL_SLOTS as u32 * 2,
        resource: uniform_buffer.as_entire_binding(),
    });

    Ok(device.create_bind_group(&wgpu::BindGroupDescriptor {
        layout,
        entries: &entries,
        label: Some(&format!("{:?} material_bind_group", name)),
    }))
}

pub fn mk_standard_pipeline(
    device: &wgpu::Device,
    color_format: wgpu::TextureFormat,
    material_bind_group_layout: &wgpu::BindGroupLayout,
    camera_bind_group_layout: &wgpu::BindGroupLayout,
    light_bind_group_layout: &wgpu::BindGroupLayout,
) -> wgpu::RenderPipeline {
    let render_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Standard Pipeline Layout"),
        bind_group_layouts: &[
            material_bind_group_layout,
            camera_bind_group_layout,
            light_bind_group_layout,
        ],
        push_constant_ranges: &[],
    });

    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Standard Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("standard.wgsl").into()),
    };

    mk_render_pipeline(
        device,
        &render_pipeline_layout,
        color_format,
        Some(wgpu::BlendState {
            alpha: wgpu::BlendComponent::REPLACE,
            color: wgpu::BlendComponent::REPLACE,
        }),
        Some(Texture::DEPTH_FORMAT),
        &[model::ModelVertex::desc(), TransformRaw::desc()],
        shader,
    )
}

pub fn mk_render_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    color_format: wgpu::TextureFormat,
    blend: Option<wgpu::BlendState>,
    depth_format: Option<wgpu::TextureFormat>,
    vertex_layouts: &[wgpu::VertexBufferLayout],
    shader: wgpu::ShaderModuleDescriptor,
) -> wgpu::RenderPipeline {
    let label = shader.label.map(|l| format!("{l} Pipeline"));
    let shader = device.create_shader_module(shader);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        cache: None,
        label: label.as_deref(),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: &shader,
            entry_point: Some("vs_main"),
            buffers: vertex_layouts,
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: &shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: color_format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: Some(wgpu::Face::Back),
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: depth_format.map(|format| wgpu::DepthStencilState {
            format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState {
            count: 1,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        multiview: None,
    })
}
