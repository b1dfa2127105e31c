//! Flat overlay pipeline for the debug panel.
//!
//! Panel rectangles are converted into coloured triangles in normalized device
//! coordinates and drawn on top of the scene without depth testing.

use crate::{debug::PanelQuad, viewport::Viewport};

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        use std::mem;
        wgpu::VertexBufferLayout {
            array_stride: mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

pub const VERTICES_PER_QUAD: usize = 6;

/// Two counter-clockwise triangles per quad. Coordinates are logical pixels of
/// `viewport`, origin top-left.
pub fn quad_vertices(quads: &[PanelQuad], viewport: &Viewport) -> Vec<Vertex> {
    if viewport.is_empty() {
        return Vec::new();
    }
    let (w, h) = (viewport.width as f32, viewport.height as f32);
    let ndc = |x: f32, y: f32| [x / w * 2.0 - 1.0, 1.0 - y / h * 2.0];

    let mut vertices = Vec::with_capacity(quads.len() * VERTICES_PER_QUAD);
    for quad in quads {
        let r = quad.rect;
        let top_left = ndc(r.x, r.y);
        let bottom_left = ndc(r.x, r.y + r.height);
        let bottom_right = ndc(r.x + r.width, r.y + r.height);
        let top_right = ndc(r.x + r.width, r.y);
        for position in [top_left, bottom_left, bottom_right, top_left, bottom_right, top_right] {
            vertices.push(Vertex {
                position,
                color: quad.color,
            });
        }
    }
    vertices
}

/// GPU buffer holding the overlay triangles; grows when the panel does.
#[derive(Debug)]
pub struct GuiResources {
    pub pipeline: wgpu::RenderPipeline,
    vertex_buffer: wgpu::Buffer,
    capacity: usize,
    vertex_count: u32,
}

impl GuiResources {
    pub fn new(device: &wgpu::Device, color_format: wgpu::TextureFormat, capacity: usize) -> Self {
        let capacity = capacity.max(VERTICES_PER_QUAD);
        Self {
            pipeline: mk_gui_pipeline(device, color_format),
            vertex_buffer: mk_vertex_buffer(device, capacity),
            capacity,
            vertex_count: 0,
        }
    }

    pub fn update(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, vertices: &[Vertex]) {
        if vertices.len() > self.capacity {
            self.capacity = vertices.len().next_power_of_two();
            self.vertex_buffer = mk_vertex_buffer(device, self.capacity);
        }
        if !vertices.is_empty() {
            queue.write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        self.vertex_count = vertices.len() as u32;
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>) {
        if self.vertex_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        render_pass.draw(0..self.vertex_count, 0..1);
    }
}

fn mk_vertex_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Panel Vertex Buffer"),
        size: (capacity * std::mem::size_of::<Vertex>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn mk_pipeline_layout(device: &wgpu::Device) -> wgpu::PipelineLayout {
    device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
        label: Some("Panel Render Pipeline Layout"),
        bind_group_layouts: &[],
        push_constant_ranges: &[],
    })
}

pub fn mk_gui_pipeline(device: &wgpu::Device, color_format: wgpu::TextureFormat) -> wgpu::RenderPipeline {
    let shader = wgpu::ShaderModuleDescriptor {
        label: Some("Panel Shader"),
        source: wgpu::ShaderSource::Wgsl(include_str!("gui.wgsl").into()),
    };
    let layout = mk_pipeline_layout(device);
    super::standard::mk_render_pipeline(
        device,
        &layout,
        color_format,
        Some(wgpu::BlendState::ALPHA_BLENDING),
        None,
        &[Vertex::desc()],
        shader,
    )
}
