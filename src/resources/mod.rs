//! Asset loading.
//!
//! Images are read from the asset root (a directory natively, a path below the
//! page origin on the web), decoded off the render loop and handed back to the
//! event loop as [`AppEvent::TextureLoaded`].

use anyhow::Context as _;
use winit::event_loop::EventLoopProxy;

use crate::{flow::AppEvent, resources::texture::TextureHandle};

pub mod texture;

#[cfg(target_arch = "wasm32")]
fn format_url(asset_root: &str, file_name: &str) -> anyhow::Result<reqwest::Url> {
    let window = web_sys::window().context("no browser window")?;
    let origin = window
        .location()
        .origin()
        .map_err(|_| anyhow::anyhow!("page origin is not readable"))?;
    let root = asset_root.trim_matches('/');
    let base = if root.is_empty() {
        format!("{}/", origin)
    } else {
        format!("{}/{}/", origin, root)
    };
    let base = reqwest::Url::parse(&base)?;
    Ok(base.join(file_name.trim_start_matches('/'))?)
}

pub async fn load_binary(asset_root: &str, file_name: &str) -> anyhow::Result<Vec<u8>> {
    #[cfg(target_arch = "wasm32")]
    let data = {
        let url = format_url(asset_root, file_name)?;
        reqwest::get(url).await?.error_for_status()?.bytes().await?.to_vec()
    };
    #[cfg(not(target_arch = "wasm32"))]
    let data = {
        let path = std::path::Path::new(asset_root).join(file_name.trim_start_matches('/'));
        tokio::fs::read(&path)
            .await
            .with_context(|| format!("reading {}", path.display()))?
    };

    Ok(data)
}

/// Reads and decodes an image; the format is guessed from its content.
pub async fn load_image(asset_root: &str, file_name: &str) -> anyhow::Result<image::RgbaImage> {
    let bytes = load_binary(asset_root, file_name).await?;
    let img = image::load_from_memory(&bytes).with_context(|| format!("decoding {file_name}"))?;
    Ok(img.to_rgba8())
}

/// Starts one background load per request. Completion is reported through `proxy`;
/// nothing here waits for the result.
pub fn spawn_texture_loads(
    #[cfg(not(target_arch = "wasm32"))] async_runtime: &tokio::runtime::Runtime,
    requests: Vec<(TextureHandle, String)>,
    asset_root: &str,
    proxy: EventLoopProxy<AppEvent>,
) {
    for (handle, path) in requests {
        let proxy = proxy.clone();
        let asset_root = asset_root.to_string();
        let fut = async move {
            let result = load_image(&asset_root, &path).await;
            if proxy
                .send_event(AppEvent::TextureLoaded { handle, result })
                .is_err()
            {
                log::debug!("event loop closed before {} finished loading", path);
            }
        };

        #[cfg(not(target_arch = "wasm32"))]
        {
            async_runtime.spawn(fut);
        }

        #[cfg(target_arch = "wasm32")]
        {
            wasm_bindgen_futures::spawn_local(fut);
        }
    }
}
