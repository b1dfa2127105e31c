//! Texture registry: handles, sampling parameters and load state.
//!
//! Requesting a texture returns a [`TextureHandle`] immediately; the image is
//! fetched in the background and reported back through
//! [`TextureRegistry::finish`]. Materials only ever store handles, so they can
//! be built before any image data exists.

use std::collections::HashMap;

/// Shared reference to a texture in the [`TextureRegistry`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(usize);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadState {
    Pending,
    Ready,
    Failed,
}

/// How texture coordinates outside `[0, 1]` are resolved.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Wrapping {
    #[default]
    ClampToEdge,
    Repeat,
    MirroredRepeat,
}

impl From<Wrapping> for wgpu::AddressMode {
    fn from(wrapping: Wrapping) -> Self {
        match wrapping {
            Wrapping::ClampToEdge => wgpu::AddressMode::ClampToEdge,
            Wrapping::Repeat => wgpu::AddressMode::Repeat,
            Wrapping::MirroredRepeat => wgpu::AddressMode::MirrorRepeat,
        }
    }
}

/// Sampling parameters of one texture.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextureSettings {
    pub wrap_s: Wrapping,
    pub wrap_t: Wrapping,
    pub repeat: cgmath::Vector2<f32>,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            wrap_s: Wrapping::ClampToEdge,
            wrap_t: Wrapping::ClampToEdge,
            repeat: cgmath::Vector2::new(1.0, 1.0),
        }
    }
}

#[derive(Debug)]
struct Entry {
    path: String,
    settings: TextureSettings,
    state: LoadState,
    image: Option<image::RgbaImage>,
}

/// Owns every texture of the application, keyed by asset path.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    entries: Vec<Entry>,
    by_path: HashMap<String, TextureHandle>,
    requests: Vec<TextureHandle>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the handle for `path`, queueing a load the first time it is seen.
    pub fn load(&mut self, path: &str) -> TextureHandle {
        if let Some(handle) = self.by_path.get(path) {
            return *handle;
        }
        let handle = TextureHandle(self.entries.len());
        self.entries.push(Entry {
            path: path.to_string(),
            settings: TextureSettings::default(),
            state: LoadState::Pending,
            image: None,
        });
        self.by_path.insert(path.to_string(), handle);
        self.requests.push(handle);
        handle
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self, handle: TextureHandle) -> Option<&str> {
        self.entries.get(handle.0).map(|e| e.path.as_str())
    }

    pub fn state(&self, handle: TextureHandle) -> Option<LoadState> {
        self.entries.get(handle.0).map(|e| e.state)
    }

    pub fn settings(&self, handle: TextureHandle) -> Option<TextureSettings> {
        self.entries.get(handle.0).map(|e| e.settings)
    }

    pub fn set_repeat(&mut self, handle: TextureHandle, x: f32, y: f32) {
        if let Some(entry) = self.entries.get_mut(handle.0) {
            entry.settings.repeat = cgmath::Vector2::new(x, y);
        }
    }

    pub fn set_wrapping(&mut self, handle: TextureHandle, wrap_s: Wrapping, wrap_t: Wrapping) {
        if let Some(entry) = self.entries.get_mut(handle.0) {
            entry.settings.wrap_s = wrap_s;
            entry.settings.wrap_t = wrap_t;
        }
    }

    /// Loads that were requested but not yet handed out to a loader.
    pub fn take_requests(&mut self) -> Vec<(TextureHandle, String)> {
        self.requests
            .drain(..)
            .filter_map(|handle| {
                self.entries
                    .get(handle.0)
                    .map(|entry| (handle, entry.path.clone()))
            })
            .collect()
    }

    /// Records the outcome of a load. Only a pending texture changes state;
    /// the returned value is the state after the call.
    pub fn finish(
        &mut self,
        handle: TextureHandle,
        result: anyhow::Result<image::RgbaImage>,
    ) -> Option<LoadState> {
        let entry = self.entries.get_mut(handle.0)?;
        if entry.state != LoadState::Pending {
            log::warn!("texture {} finished loading twice, ignoring", entry.path);
            return Some(entry.state);
        }
        match result {
            Ok(image) => {
                log::info!(
                    "loaded texture {} ({}x{})",
                    entry.path,
                    image.width(),
                    image.height()
                );
                entry.image = Some(image);
                entry.state = LoadState::Ready;
            }
            Err(e) => {
                log::warn!("texture {} could not be loaded: {:#}", entry.path, e);
                entry.state = LoadState::Failed;
            }
        }
        Some(entry.state)
    }

    /// Hands the decoded pixels over for upload; the registry keeps the state.
    pub fn take_image(&mut self, handle: TextureHandle) -> Option<image::RgbaImage> {
        self.entries.get_mut(handle.0)?.image.take()
    }

    pub fn handles(&self) -> impl Iterator<Item = TextureHandle> {
        (0..self.entries.len()).map(TextureHandle)
    }
}
