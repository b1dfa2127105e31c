//! Scene renderer.
//!
//! [`Renderer`] owns every GPU resource derived from the scene: one vertex and
//! index buffer per mesh node, its transform and material buffers, the material
//! bind group and the uploaded textures. Geometry and materials are fixed once
//! the scene is assembled, while transforms, lights and the camera are re-read
//! every frame.
//!
//! Each frame is drawn in two passes: the lit scene with depth testing, then
//! the debug panel on top of it.

use std::{collections::HashMap, iter};

use wgpu::util::DeviceExt;

use crate::{
    camera::{CameraResources, PerspectiveCamera},
    context::Context,
    data_structures::{
        material::StandardMaterial,
        model::{DrawModel, Mesh},
        scene_graph::Scene,
        texture::Texture,
    },
    pipelines::{
        gui::{self, GuiResources},
        light::LightResources,
        standard::{self, MaterialUniform},
    },
    resources::texture::{TextureHandle, TextureRegistry},
    viewport::OutputSize,
};

/// Stand-ins for textures that are missing, still loading or failed to load.
#[derive(Debug)]
struct Placeholders {
    white: Texture,
    normal: Texture,
}

/// GPU state of one mesh node, matched to the scene by node name.
#[derive(Debug)]
struct DrawableMesh {
    node: String,
    mesh: Mesh,
    transform_buffer: wgpu::Buffer,
    material: StandardMaterial,
    material_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

#[derive(Debug)]
pub struct Renderer {
    pipeline: wgpu::RenderPipeline,
    material_layout: wgpu::BindGroupLayout,
    camera: CameraResources,
    lights: LightResources,
    gui: GuiResources,
    placeholders: Placeholders,
    textures: HashMap<TextureHandle, Texture>,
    meshes: Vec<DrawableMesh>,
    pub output: OutputSize,
    pub clear_colour: wgpu::Color,
}

impl Renderer {
    pub fn new(
        ctx: &Context,
        scene: &Scene,
        camera: &PerspectiveCamera,
        registry: &TextureRegistry,
        panel_vertices: usize,
        clear_colour: wgpu::Color,
    ) -> anyhow::Result<Self> {
        let device = &ctx.device;
        let camera_resources = CameraResources::new(device, camera);
        let lights = LightResources::new(device, scene);
        let material_layout = standard::mk_material_bind_group_layout(device);
        let pipeline = standard::mk_standard_pipeline(
            device,
            ctx.config.format,
            &material_layout,
            &camera_resources.bind_group_layout,
            &lights.bind_group_layout,
        );
        let gui = GuiResources::new(device, ctx.config.format, panel_vertices);
        let placeholders = Placeholders {
            white: Texture::create_solid([255, 255, 255, 255], "placeholder", device, &ctx.queue),
            normal: Texture::create_default_normal_map(device, &ctx.queue),
        };

        let mut renderer = Self {
            pipeline,
            material_layout,
            camera: camera_resources,
            lights,
            gui,
            placeholders,
            textures: HashMap::new(),
            meshes: Vec::new(),
            output: OutputSize::default(),
            clear_colour,
        };

        for placed in scene.meshes() {
            let name = placed.node.name.as_str();
            let data = placed.item.geometry.build();
            let mesh = Mesh::from_data(device, name, &data);
            let transform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{:?} Transform Buffer", name)),
                contents: bytemuck::cast_slice(&[placed.world.to_raw()]),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            });
            let material = placed.item.material.clone();
            let material_buffer = standard::mk_material_buffer(
                device,
                name,
                MaterialUniform::new(&material, registry),
            );
            let bind_group = renderer.material_bind_group(device, name, &material, &material_buffer)?;
            log::debug!("{name}: {} triangles", data.triangle_count());
            renderer.meshes.push(DrawableMesh {
                node: name.to_string(),
                mesh,
                transform_buffer,
                material,
                material_buffer,
                bind_group,
            });
        }

        Ok(renderer)
    }

    fn slot_texture<'a>(&'a self, handle: Option<TextureHandle>, fallback: &'a Texture) -> &'a Texture {
        handle
            .and_then(|h| self.textures.get(&h))
            .unwrap_or(fallback)
    }

    fn material_bind_group(
        &self,
        device: &wgpu::Device,
        name: &str,
        material: &StandardMaterial,
        material_buffer: &wgpu::Buffer,
    ) -> anyhow::Result<wgpu::BindGroup> {
        let white = &self.placeholders.white;
        standard::mk_material_bind_group(
            device,
            &self.material_layout,
            name,
            [
                self.slot_texture(material.map, white),
                self.slot_texture(material.ao_map, white),
                self.slot_texture(material.normal_map, &self.placeholders.normal),
                self.slot_texture(material.roughness_map, white),
            ],
            material_buffer,
        )
    }

    pub fn has_texture(&self, handle: TextureHandle) -> bool {
        self.textures.contains_key(&handle)
    }

    /// Uploads the decoded image of `handle` and rebinds every material using it.
    pub fn upload_texture(
        &mut self,
        ctx: &Context,
        registry: &mut TextureRegistry,
        handle: TextureHandle,
    ) -> anyhow::Result<()> {
        let settings = registry.settings(handle).unwrap_or_default();
        let label = registry.path(handle).map(str::to_string);
        let Some(image) = registry.take_image(handle) else {
            anyhow::bail!("texture {:?} has no decoded image", label);
        };
        let texture = Texture::from_image(&ctx.device, &ctx.queue, &image, label.as_deref(), &settings)?;
        self.textures.insert(handle, texture);

        for index in 0..self.meshes.len() {
            let drawable = &self.meshes[index];
            if !drawable.material.uses(handle) {
                continue;
            }
            let bind_group = self.material_bind_group(
                &ctx.device,
                &drawable.node,
                &drawable.material,
                &drawable.material_buffer,
            )?;
            self.meshes[index].bind_group = bind_group;
        }
        Ok(())
    }

    pub fn render(
        &mut self,
        ctx: &Context,
        scene: &Scene,
        camera: &PerspectiveCamera,
        panel: &[gui::Vertex],
    ) -> Result<(), wgpu::SurfaceError> {
        self.camera.write(&ctx.queue, camera);
        self.lights.write(&ctx.queue, scene);
        for placed in scene.meshes() {
            if let Some(drawable) = self.meshes.iter().find(|m| m.node == placed.node.name) {
                ctx.queue.write_buffer(
                    &drawable.transform_buffer,
                    0,
                    bytemuck::cast_slice(&[placed.world.to_raw()]),
                );
            }
        }
        self.gui.update(&ctx.device, &ctx.queue, panel);

        let output = ctx.surface.get_current_texture()?;
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.clear_colour),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_texture.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_pipeline(&self.pipeline);
            for drawable in &self.meshes {
                render_pass.draw_mesh(
                    &drawable.mesh,
                    &drawable.transform_buffer,
                    &drawable.bind_group,
                    &self.camera.bind_group,
                    &self.lights.bind_group,
                );
            }
        }
        {
            let mut overlay_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Panel Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Load,
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            self.gui.draw(&mut overlay_pass);
        }

        ctx.queue.submit(iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
