//! Runtime settings.

/// Environment variable overriding [`Settings::asset_root`] on native targets.
pub const ASSETS_ENV: &str = "YURT_ASSETS";

#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    /// CSS selector of the canvas to draw into on the web.
    pub canvas_selector: String,
    /// Directory (native) or URL path below the page origin (web) holding `textures/`.
    pub asset_root: String,
    /// Upper bound for the device pixel ratio used by the renderer.
    pub max_pixel_ratio: f64,
    pub clear_colour: wgpu::Color,
    pub title: String,
    /// Logical window size used before the first resize arrives.
    pub initial_size: (u32, u32),
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            canvas_selector: "canvas.webgl".to_string(),
            asset_root: "assets".to_string(),
            max_pixel_ratio: 2.0,
            clear_colour: wgpu::Color::BLACK,
            title: "Yurt".to_string(),
            initial_size: (1280, 720),
        }
    }
}

impl Settings {
    /// Defaults, with the asset root taken from [`ASSETS_ENV`] when it is set.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        #[cfg(not(target_arch = "wasm32"))]
        if let Ok(root) = std::env::var(ASSETS_ENV) {
            if !root.trim().is_empty() {
                settings.asset_root = root;
            }
        }
        settings
    }
}
