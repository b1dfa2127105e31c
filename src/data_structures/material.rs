//! Surface materials.

use crate::{data_structures::light::Color, resources::texture::TextureHandle};

/// Physically based surface description.
///
/// Texture maps are shared handles into the
/// [`TextureRegistry`](crate::resources::texture::TextureRegistry); a material
/// may reference the same texture in several slots.
#[derive(Clone, Debug, PartialEq)]
pub struct StandardMaterial {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
    pub map: Option<TextureHandle>,
    pub ao_map: Option<TextureHandle>,
    pub ao_map_intensity: f32,
    pub normal_map: Option<TextureHandle>,
    pub normal_scale: f32,
    /// Only the green channel is read, multiplied with `roughness`.
    pub roughness_map: Option<TextureHandle>,
}

impl StandardMaterial {
    pub fn textured(map: TextureHandle) -> Self {
        Self {
            map: Some(map),
            ..Default::default()
        }
    }

    /// Every texture handle the material references, duplicates included.
    pub fn textures(&self) -> impl Iterator<Item = TextureHandle> + '_ {
        [self.map, self.ao_map, self.normal_map, self.roughness_map]
            .into_iter()
            .flatten()
    }

    pub fn uses(&self, handle: TextureHandle) -> bool {
        self.textures().any(|h| h == handle)
    }
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            roughness: 1.0,
            metalness: 0.0,
            map: None,
            ao_map: None,
            ao_map_intensity: 1.0,
            normal_map: None,
            normal_scale: 1.0,
            roughness_map: None,
        }
    }
}
