//! Light emitters and colours.
//!
//! A [`Light`] only describes the emitter. Where it sits in the world is the
//! transform of the scene node that owns it.

use std::str::FromStr;

use anyhow::{Context, bail};

/// Linear RGB colour with components in `[0, 1]`.
///
/// Hex colours are taken as-is, without any sRGB decoding.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::hex(0xffffff);

    /// Builds a colour from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xff) as f32 / 255.0,
            g: ((rgb >> 8) & 0xff) as f32 / 255.0,
            b: (rgb & 0xff) as f32 / 255.0,
        }
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn scaled(self, factor: f32) -> [f32; 3] {
        [self.r * factor, self.g * factor, self.b * factor]
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    /// Parses `#rrggbb` (the leading `#` is optional).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 {
            bail!("expected a colour of the form #rrggbb, got {s:?}");
        }
        let rgb = u32::from_str_radix(digits, 16)
            .with_context(|| format!("invalid hex colour {s:?}"))?;
        Ok(Color::hex(rgb))
    }
}

/// Shadow-map configuration of a shadow-casting light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowConfig {
    pub map_width: u32,
    pub map_height: u32,
    pub camera_near: f32,
    pub camera_far: f32,
}

impl Default for ShadowConfig {
    fn default() -> Self {
        Self {
            map_width: 512,
            map_height: 512,
            camera_near: 0.5,
            camera_far: 500.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LightKind {
    /// Lights every surface evenly from all directions.
    Ambient,
    /// Parallel rays shining from the node position towards `target`.
    Directional { target: cgmath::Point3<f32> },
    /// Emits in all directions from the node position.
    ///
    /// `distance` is the cut-off range (`0` means unlimited) and `decay` the
    /// exponent of the inverse-distance falloff.
    Point { distance: f32, decay: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Light {
    pub kind: LightKind,
    pub color: Color,
    pub intensity: f32,
    /// `Some` when the light casts shadows.
    pub shadow: Option<ShadowConfig>,
}

impl Light {
    pub fn ambient(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Ambient,
            color,
            intensity,
            shadow: None,
        }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            kind: LightKind::Directional {
                target: cgmath::Point3::new(0.0, 0.0, 0.0),
            },
            color,
            intensity,
            shadow: None,
        }
    }

    pub fn point(color: Color, intensity: f32, distance: f32) -> Self {
        Self {
            kind: LightKind::Point {
                distance,
                decay: 2.0,
            },
            color,
            intensity,
            shadow: None,
        }
    }

    pub fn with_shadow(mut self, shadow: ShadowConfig) -> Self {
        self.shadow = Some(shadow);
        self
    }

    pub fn casts_shadow(&self) -> bool {
        self.shadow.is_some()
    }
}
