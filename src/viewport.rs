//! Window size bookkeeping and resize handling.
//!
//! Sizes come in two units: logical pixels (what the page layout or window
//! manager reports) and physical pixels of the drawing buffer. The renderer
//! output is sized in logical pixels and multiplied with a pixel ratio that is
//! capped, so high-density displays don't multiply the fill-rate cost without bound.

use winit::dpi::PhysicalSize;

use crate::camera::PerspectiveCamera;

/// Current window dimensions in logical pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// winit reports physical sizes; convert back to logical pixels.
    pub fn from_physical(size: PhysicalSize<u32>, scale_factor: f64) -> Self {
        let logical = size.to_logical::<f64>(scale_factor);
        Self {
            width: logical.width.round() as u32,
            height: logical.height.round() as u32,
            device_pixel_ratio: scale_factor,
        }
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Size of the renderer output.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OutputSize {
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f64,
}

impl OutputSize {
    pub fn set_size(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    pub fn set_pixel_ratio(&mut self, pixel_ratio: f64) {
        self.pixel_ratio = pixel_ratio;
    }

    /// Physical size of the drawing buffer, never smaller than 1x1.
    pub fn drawing_buffer(&self) -> (u32, u32) {
        let scale = |v: u32| ((v as f64 * self.pixel_ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }
}

impl Default for OutputSize {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
            pixel_ratio: 1.0,
        }
    }
}

pub fn clamp_pixel_ratio(device_pixel_ratio: f64, max_pixel_ratio: f64) -> f64 {
    device_pixel_ratio.min(max_pixel_ratio)
}

/// Reconfigures camera and renderer output for a new viewport.
///
/// Returns `false` (and changes nothing) for an empty viewport, e.g. while the
/// window is minimised.
pub fn apply_resize(
    viewport: &Viewport,
    camera: &mut PerspectiveCamera,
    output: &mut OutputSize,
    max_pixel_ratio: f64,
) -> bool {
    if viewport.is_empty() {
        return false;
    }
    camera.aspect = viewport.aspect();
    camera.update_projection_matrix();

    output.set_size(viewport.width, viewport.height);
    output.set_pixel_ratio(clamp_pixel_ratio(
        viewport.device_pixel_ratio,
        max_pixel_ratio,
    ));
    true
}
