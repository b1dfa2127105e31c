//! Frame loop and application event loop.
//!
//! [`FrameLoop`] is the per-frame driver: every step advances the orbit
//! controls, draws one frame and requests the next one, until its
//! [`StopSignal`] is set. It talks to the application through the
//! [`FrameHost`] trait only.
//!
//! [`App`] is the winit [`ApplicationHandler`]. It owns the GPU state, the
//! scene, the camera with its controls, the debug panel and the texture
//! registry, and routes window events to them:
//!
//! 1. `resumed` creates the window, assembles the scene and starts the
//!    texture loads. GPU setup finishes synchronously natively and through an
//!    [`AppEvent::Initialized`] user event on the web.
//! 2. Resizes reconfigure camera, renderer output and surface.
//! 3. Pointer input goes to the [`Stage`], which hands it to the debug panel
//!    first and to the orbit controls if the panel does not capture it.
//! 4. `RedrawRequested` runs one [`FrameLoop::step`].
//! 5. [`AppEvent::TextureLoaded`] uploads finished textures.

use std::{
    fmt::Debug,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
};

use anyhow::Context as _;
use instant::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use crate::{
    config::Settings,
    context::Context,
    controls::PointerButton,
    input::Stage,
    pipelines::gui::{self, VERTICES_PER_QUAD},
    render::Renderer,
    resources::{
        self,
        texture::{LoadState, TextureHandle, TextureRegistry},
    },
    viewport::{Viewport, apply_resize},
    yurt::{self, Assembly},
};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

/// Shared flag that ends the frame loop. Clones observe the same flag.
#[derive(Clone, Debug, Default)]
pub struct StopSignal(Arc<AtomicBool>);

impl StopSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// A frame was drawn and the next one requested.
    Continue,
    Stopped,
}

/// What a frame step needs from the application.
pub trait FrameHost {
    /// Advances the damped camera controls. `elapsed` is the time since the loop started.
    fn update_controls(&mut self, elapsed: Duration);

    /// Draws the scene once.
    fn render(&mut self);

    /// Schedules exactly one further frame.
    fn request_frame(&mut self);
}

#[derive(Debug)]
pub struct FrameLoop {
    clock: Instant,
    stop: StopSignal,
    frames: u64,
}

impl FrameLoop {
    pub fn new(stop: StopSignal) -> Self {
        Self {
            clock: Instant::now(),
            stop,
            frames: 0,
        }
    }

    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> Duration {
        self.clock.elapsed()
    }

    /// Runs one frame: update controls, render, re-arm.
    ///
    /// Once stopped, a step does nothing. A stop raised while rendering (e.g.
    /// the device ran out of memory) suppresses the re-arm of that step.
    pub fn step(&mut self, host: &mut impl FrameHost) -> Step {
        if self.stop.is_stopped() {
            return Step::Stopped;
        }
        host.update_controls(self.elapsed());
        host.render();
        self.frames += 1;
        if self.stop.is_stopped() {
            return Step::Stopped;
        }
        host.request_frame();
        Step::Continue
    }
}

impl Default for FrameLoop {
    fn default() -> Self {
        Self::new(StopSignal::new())
    }
}

pub enum AppEvent {
    /// A background texture load finished.
    TextureLoaded {
        handle: TextureHandle,
        result: anyhow::Result<image::RgbaImage>,
    },
    /// GPU setup finished; sent from `spawn_local` on the web.
    #[allow(dead_code)]
    Initialized(anyhow::Result<Context>),
}

impl Debug for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TextureLoaded { handle, result } => f
                .debug_struct("TextureLoaded")
                .field("handle", handle)
                .field("ok", &result.is_ok())
                .finish(),
            Self::Initialized(result) => f
                .debug_tuple("Initialized")
                .field(&result.is_ok())
                .finish(),
        }
    }
}

/// Everything that exists once the GPU is ready.
#[derive(Debug)]
pub struct AppState {
    ctx: Context,
    renderer: Renderer,
    stage: Stage,
    stop: StopSignal,
}

impl AppState {
    fn new(
        ctx: Context,
        assembly: Assembly,
        registry: &TextureRegistry,
        settings: &Settings,
        stop: StopSignal,
    ) -> anyhow::Result<Self> {
        let renderer = Renderer::new(
            &ctx,
            &assembly.scene,
            &assembly.camera,
            registry,
            assembly.panel.max_quads() * VERTICES_PER_QUAD,
            settings.clear_colour,
        )?;
        let viewport = Viewport::from_physical(ctx.window().inner_size(), ctx.window().scale_factor());
        Ok(Self {
            ctx,
            renderer,
            stage: Stage::new(assembly, viewport),
            stop,
        })
    }

    fn resize(&mut self, viewport: Viewport, max_pixel_ratio: f64) {
        if !apply_resize(
            &viewport,
            &mut self.stage.camera,
            &mut self.renderer.output,
            max_pixel_ratio,
        ) {
            return;
        }
        self.stage.set_viewport(viewport);
        #[cfg(target_arch = "wasm32")]
        let (width, height) = self.renderer.output.drawing_buffer();
        // Native surfaces must match the window's physical size.
        #[cfg(not(target_arch = "wasm32"))]
        let (width, height) = {
            let size = self.ctx.window().inner_size();
            (size.width, size.height)
        };
        self.ctx.resize(width, height);
        log::debug!(
            "resized to {}x{} (pixel ratio {})",
            viewport.width,
            viewport.height,
            self.renderer.output.pixel_ratio
        );
    }

    fn upload_texture(&mut self, registry: &mut TextureRegistry, handle: TextureHandle) {
        if let Err(e) = self.renderer.upload_texture(&self.ctx, registry, handle) {
            log::warn!("texture {:?} could not be uploaded: {:#}", registry.path(handle), e);
        }
    }
}

impl FrameHost for AppState {
    fn update_controls(&mut self, _elapsed: Duration) {
        self.stage.update();
    }

    fn render(&mut self) {
        let stage = &self.stage;
        let quads = stage.panel.quads(&stage.scene, &stage.viewport);
        let panel = gui::quad_vertices(&quads, &stage.viewport);
        match self
            .renderer
            .render(&self.ctx, &stage.scene, &stage.camera, &panel)
        {
            Ok(()) => {}
            // Reconfigure the surface if it's lost or outdated
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => self.ctx.configure(),
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("out of GPU memory, stopping");
                self.stop.stop();
            }
            Err(e) => log::error!("Unable to render {}", e),
        }
    }

    fn request_frame(&mut self) {
        self.ctx.window().request_redraw();
    }
}

pub struct App {
    #[cfg(not(target_arch = "wasm32"))]
    async_runtime: tokio::runtime::Runtime,
    proxy: EventLoopProxy<AppEvent>,
    settings: Settings,
    registry: TextureRegistry,
    frame_loop: FrameLoop,
    // Built in `resumed`, moved into the state once the GPU is ready.
    assembly: Option<Assembly>,
    state: Option<AppState>,
}

impl App {
    fn new(event_loop: &EventLoop<AppEvent>, settings: Settings) -> anyhow::Result<Self> {
        let proxy = event_loop.create_proxy();
        #[cfg(not(target_arch = "wasm32"))]
        let async_runtime = tokio::runtime::Runtime::new().context("starting the async runtime")?;
        Ok(Self {
            #[cfg(not(target_arch = "wasm32"))]
            async_runtime,
            proxy,
            settings,
            registry: TextureRegistry::new(),
            frame_loop: FrameLoop::default(),
            assembly: None,
            state: None,
        })
    }

    fn stop(&self, event_loop: &ActiveEventLoop) {
        self.frame_loop.stop_signal().stop();
        event_loop.exit();
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop, ctx: anyhow::Result<Context>) {
        let Some(assembly) = self.assembly.take() else {
            log::warn!("GPU context arrived twice");
            return;
        };
        let state = ctx.and_then(|ctx| {
            AppState::new(
                ctx,
                assembly,
                &self.registry,
                &self.settings,
                self.frame_loop.stop_signal(),
            )
        });
        let mut state = match state {
            Ok(state) => state,
            Err(e) => {
                log::error!("App initialization failed: {:#}", e);
                self.stop(event_loop);
                return;
            }
        };

        let viewport = state.stage.viewport;
        state.resize(viewport, self.settings.max_pixel_ratio);

        // Textures that finished before the GPU was ready.
        let ready: Vec<_> = self
            .registry
            .handles()
            .filter(|h| self.registry.state(*h) == Some(LoadState::Ready))
            .filter(|h| !state.renderer.has_texture(*h))
            .collect();
        for handle in ready {
            state.upload_texture(&mut self.registry, handle);
        }

        state.ctx.window().request_redraw();
        self.state = Some(state);
    }
}

impl ApplicationHandler<AppEvent> for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.assembly.is_some() || self.state.is_some() {
            return;
        }

        let (width, height) = self.settings.initial_size;
        #[allow(unused_mut)]
        let mut window_attributes = Window::default_attributes()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(width, height));

        #[cfg(target_arch = "wasm32")]
        {
            use wasm_bindgen::JsCast;
            use winit::platform::web::WindowAttributesExtWebSys;

            let canvas = web_sys::window()
                .and_then(|window| window.document())
                .and_then(|document| {
                    document
                        .query_selector(&self.settings.canvas_selector)
                        .ok()
                        .flatten()
                })
                .and_then(|element| element.dyn_into::<web_sys::HtmlCanvasElement>().ok());
            match canvas {
                Some(canvas) => window_attributes = window_attributes.with_canvas(Some(canvas)),
                None => {
                    log::error!("no canvas matches {:?}", self.settings.canvas_selector);
                    self.stop(event_loop);
                    return;
                }
            }
        }

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                log::error!("Unable to create a window: {}", e);
                self.stop(event_loop);
                return;
            }
        };

        let mut viewport = Viewport::from_physical(window.inner_size(), window.scale_factor());
        if viewport.is_empty() {
            viewport = Viewport::new(width, height, window.scale_factor());
        }
        self.assembly = Some(yurt::assemble(&mut self.registry, &viewport));

        resources::spawn_texture_loads(
            #[cfg(not(target_arch = "wasm32"))]
            &self.async_runtime,
            self.registry.take_requests(),
            &self.settings.asset_root,
            self.proxy.clone(),
        );

        #[cfg(not(target_arch = "wasm32"))]
        {
            let ctx = self.async_runtime.block_on(Context::new(window));
            self.initialize(event_loop, ctx);
        }

        #[cfg(target_arch = "wasm32")]
        {
            let proxy = self.proxy.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let ctx = Context::new(window).await;
                if proxy.send_event(AppEvent::Initialized(ctx)).is_err() {
                    log::error!("event loop closed before the GPU was ready");
                }
            });
        }
    }

    fn user_event(&mut self, event_loop: &ActiveEventLoop, event: AppEvent) {
        match event {
            AppEvent::TextureLoaded { handle, result } => {
                let was_pending = self.registry.state(handle) == Some(LoadState::Pending);
                let state = self.registry.finish(handle, result);
                if was_pending && state == Some(LoadState::Ready) {
                    if let Some(app_state) = &mut self.state {
                        app_state.upload_texture(&mut self.registry, handle);
                    }
                }
            }
            AppEvent::Initialized(ctx) => self.initialize(event_loop, ctx),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: winit::window::WindowId,
        event: WindowEvent,
    ) {
        if let WindowEvent::CloseRequested = event {
            self.stop(event_loop);
            return;
        }

        let Some(state) = &mut self.state else {
            return;
        };

        match event {
            WindowEvent::Resized(size) => {
                let viewport = Viewport::from_physical(size, state.ctx.window().scale_factor());
                state.resize(viewport, self.settings.max_pixel_ratio);
            }
            WindowEvent::ScaleFactorChanged { scale_factor, .. } => {
                let viewport = Viewport::from_physical(state.ctx.window().inner_size(), scale_factor);
                state.resize(viewport, self.settings.max_pixel_ratio);
            }
            WindowEvent::RedrawRequested => {
                if self.frame_loop.step(state) == Step::Stopped {
                    event_loop.exit();
                }
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if event.state == ElementState::Pressed
                    && !event.repeat
                    && event.physical_key == PhysicalKey::Code(KeyCode::KeyH)
                {
                    state.stage.toggle_panel();
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(state.ctx.window().scale_factor());
                state.stage.pointer_moved(logical.x, logical.y);
            }
            WindowEvent::CursorLeft { .. } => {
                state.stage.pointer_left();
            }
            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } => {
                let button = match button {
                    MouseButton::Left => PointerButton::Primary,
                    MouseButton::Right => PointerButton::Secondary,
                    MouseButton::Middle => PointerButton::Middle,
                    _ => return,
                };
                state.stage.pointer_button(button, button_state.is_pressed());
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(position) => position.y as f32,
                };
                state.stage.wheel(delta);
            }
            _ => {}
        }
    }
}

/// Opens the window and runs the scene until the window is closed.
pub fn run(settings: Settings) -> anyhow::Result<()> {
    #[cfg(not(target_arch = "wasm32"))]
    {
        if let Err(e) = env_logger::try_init() {
            println!("Warning: Could not initialize logger: {}", e);
        };
    }

    #[cfg(target_arch = "wasm32")]
    {
        console_log::init_with_level(log::Level::Info).context("initializing the console logger")?;
    }

    log::info!("assets from {:?}", settings.asset_root);
    let event_loop: EventLoop<AppEvent> = EventLoop::with_user_event().build()?;
    let mut app = App::new(&event_loop, settings)?;

    event_loop.run_app(&mut app)?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn run_web() -> Result<(), JsValue> {
    run(Settings::from_env()).map_err(|e| JsValue::from_str(&format!("{e:#}")))
}
