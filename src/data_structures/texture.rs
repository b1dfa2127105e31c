//! GPU textures and texture creation utilities.
//!
//! This module provides [`Texture`], a wrapper around WGPU GPU texture resources,
//! and helper methods for creating depth textures, placeholder textures, and
//! uploading decoded images.

use anyhow::*;

use crate::resources::texture::TextureSettings;

/// A GPU texture with a view and optional sampler.
#[derive(Clone, Debug)]
pub struct Texture {
    #[allow(unused)]
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: Option<wgpu::Sampler>,
}

impl Texture {
    /// Standard depth buffer texture format (32-bit float).
    pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Colour data is stored without sRGB decoding; shading happens on the raw values.
    pub const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    /// Create a depth texture for depth-testing during rendering.
    ///
    /// # Arguments
    ///
    /// * `size` is [width, height] of the texture in pixels
    /// * `label` is used as a debug label for the GPU resource
    pub fn create_depth_texture(device: &wgpu::Device, size: [u32; 2], label: &str) -> Self {
        let size = wgpu::Extent3d {
            width: size[0].max(1),
            height: size[1].max(1),
            depth_or_array_layers: 1,
        };
        let desc = wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
            view_formats: &[Self::DEPTH_FORMAT],
        };
        let texture = device.create_texture(&desc);
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            sampler: None,
        }
    }

    /// Create a 1x1 texture of a single colour.
    ///
    /// Used in place of maps that are absent or still loading so the material
    /// layout never has to change.
    pub fn create_solid(
        rgba: [u8; 4],
        label: &str,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> Texture {
        let size = wgpu::Extent3d {
            width: 1,
            height: 1,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(label),
            size,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                aspect: wgpu::TextureAspect::All,
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(4),
                rows_per_image: Some(1),
            },
            size,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(create_sampler(device, &TextureSettings::default()));
        Texture {
            texture,
            view,
            sampler,
        }
    }

    /// Create a default normal map (neutral blue, representing no deformation).
    pub fn create_default_normal_map(device: &wgpu::Device, queue: &wgpu::Queue) -> Texture {
        // The blue/purple-ish colour that represents the default for normal maps
        Self::create_solid([127, 127, 255, 255], "default normal map", device, queue)
    }

    /// Upload a decoded image with a full mip chain, sampling it according to
    /// `settings`. Images larger than the device allows are scaled down first.
    pub fn from_image(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        rgba: &image::RgbaImage,
        label: Option<&str>,
        settings: &TextureSettings,
    ) -> Result<Self> {
        if rgba.width() == 0 || rgba.height() == 0 {
            bail!("texture {:?} has no pixels", label);
        }

        let max_dimension = device.limits().max_texture_dimension_2d;
        let levels = mip_chain(rgba, max_dimension);
        let (width, height) = levels[0].dimensions();
        if (width, height) != rgba.dimensions() {
            log::warn!(
                "texture {:?} is {}x{}, scaled down to {}x{}",
                label,
                rgba.width(),
                rgba.height(),
                width,
                height
            );
        }

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label,
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: levels.len() as u32,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::COLOR_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (mip_level, level) in levels.iter().enumerate() {
            let (width, height) = level.dimensions();
            queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    aspect: wgpu::TextureAspect::All,
                    texture: &texture,
                    mip_level: mip_level as u32,
                    origin: wgpu::Origin3d::ZERO,
                },
                level,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(4 * width),
                    rows_per_image: Some(height),
                },
                wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
            );
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let sampler = Some(create_sampler(device, settings));

        Ok(Self {
            texture,
            view,
            sampler,
        })
    }
}

/// Largest size with the same aspect ratio whose sides are at most
/// `max_dimension`. Sizes already inside the limit are returned unchanged.
pub fn fit_within(width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_dimension || max_dimension == 0 {
        return (width, height);
    }
    let scale = max_dimension as f64 / longest as f64;
    let shrink = |side: u32| ((side as f64 * scale).round() as u32).clamp(1, max_dimension);
    (shrink(width), shrink(height))
}

/// Number of mip levels down to 1x1 for a texture of the given size.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// The base image fitted to `max_dimension`, followed by each halved level
/// down to 1x1.
pub fn mip_chain(rgba: &image::RgbaImage, max_dimension: u32) -> Vec<image::RgbaImage> {
    use image::imageops::{self, FilterType};

    let (width, height) = fit_within(rgba.width(), rgba.height(), max_dimension);
    let base = if (width, height) == rgba.dimensions() {
        rgba.clone()
    } else {
        imageops::resize(rgba, width, height, FilterType::Triangle)
    };

    let count = mip_level_count(width, height);
    let mut levels = Vec::with_capacity(count as usize);
    levels.push(base);
    for level in 1..count {
        let width = (width >> level).max(1);
        let height = (height >> level).max(1);
        let next = imageops::resize(&levels[levels.len() - 1], width, height, FilterType::Triangle);
        levels.push(next);
    }
    levels
}

pub fn create_sampler(device: &wgpu::Device, settings: &TextureSettings) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        address_mode_u: settings.wrap_s.into(),
        address_mode_v: settings.wrap_t.into(),
        address_mode_w: wgpu::AddressMode::ClampToEdge,
        mag_filter: wgpu::FilterMode::Linear,
        min_filter: wgpu::FilterMode::Linear,
        mipmap_filter: wgpu::FilterMode::Linear,
        ..Default::default()
    })
}
