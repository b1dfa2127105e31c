//! GPU context: window, surface, device, queue and depth buffer.

use std::sync::Arc;

use anyhow::Context as _;
use winit::window::Window;

use crate::data_structures::texture;

#[derive(Debug)]
pub struct Context {
    pub(crate) window: Arc<Window>,
    pub(crate) depth_texture: texture::Texture,
    pub surface: wgpu::Surface<'static>,
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub config: wgpu::SurfaceConfiguration,
}

impl Context {
    pub async fn new(window: Arc<Window>) -> anyhow::Result<Self> {
        let size = window.inner_size();

        // The instance is a handle to our GPU
        // BackendBit::PRIMARY => Vulkan + Metal + DX12 + Browser WebGPU
        log::info!("WGPU setup");
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            #[cfg(not(target_arch = "wasm32"))]
            backends: wgpu::Backends::PRIMARY,
            #[cfg(target_arch = "wasm32")]
            backends: wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("creating the window surface")?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .context("no graphics adapter can present to this window")?;

        log::info!("device and queue");
        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: None,
                required_features: wgpu::Features::empty(),
                // WebGL doesn't support all of wgpu's features, so if
                // we're building for the web we'll have to disable some.
                required_limits: if cfg!(target_arch = "wasm32") {
                    wgpu::Limits::downlevel_webgl2_defaults()
                } else {
                    wgpu::Limits::default()
                },
                ..Default::default()
            })
            .await
            .context("requesting a device")?;

        let surface_caps = surface.get_capabilities(&adapter);
        // Shading writes linear values straight to the output, so prefer a
        // surface that does not re-encode them as sRGB.
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("the surface reports no texture formats")?;
        let present_mode = surface_caps
            .present_modes
            .first()
            .copied()
            .unwrap_or(wgpu::PresentMode::Fifo);
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);
        log::info!("surface format {:?}", surface_format);

        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: size.width.max(1),
            height: size.height.max(1),
            present_mode,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };

        let depth_texture = texture::Texture::create_depth_texture(
            &device,
            [config.width, config.height],
            "depth_texture",
        );

        Ok(Self {
            window,
            depth_texture,
            surface,
            device,
            queue,
            config,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Resizes the drawing buffer to `width` x `height` physical pixels.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.config.width = width;
        self.config.height = height;
        self.configure();
        self.depth_texture = texture::Texture::create_depth_texture(
            &self.device,
            [self.config.width, self.config.height],
            "depth_texture",
        );
    }

    /// Applies the current configuration; also recovers a lost or outdated surface.
    pub fn configure(&self) {
        self.surface.configure(&self.device, &self.config);
    }
}
