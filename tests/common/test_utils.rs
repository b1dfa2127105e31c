#![allow(dead_code)]

use std::time::Duration;

use yurt_scene::{
    flow::{FrameHost, StopSignal},
    resources::texture::TextureRegistry,
    viewport::Viewport,
    yurt::{self, Assembly},
};

/// Records how often the frame loop calls into it.
#[derive(Default)]
pub(crate) struct CountingHost {
    update_invocations: u32,
    render_invocations: u32,
    frame_requests: u32,
    last_elapsed: Option<Duration>,
    /// Raised from inside `render` once this many frames were drawn.
    stop_after: Option<(u32, StopSignal)>,
}

impl CountingHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stopping_after(frames: u32, stop: StopSignal) -> Self {
        Self {
            stop_after: Some((frames, stop)),
            ..Self::default()
        }
    }

    pub fn update_invocations(&self) -> u32 {
        self.update_invocations
    }

    pub fn render_invocations(&self) -> u32 {
        self.render_invocations
    }

    pub fn frame_requests(&self) -> u32 {
        self.frame_requests
    }

    pub fn last_elapsed(&self) -> Option<Duration> {
        self.last_elapsed
    }
}

impl FrameHost for CountingHost {
    fn update_controls(&mut self, elapsed: Duration) {
        self.update_invocations += 1;
        self.last_elapsed = Some(elapsed);
    }

    fn render(&mut self) {
        self.render_invocations += 1;
        if let Some((frames, stop)) = &self.stop_after {
            if self.render_invocations >= *frames {
                stop.stop();
            }
        }
    }

    fn request_frame(&mut self) {
        self.frame_requests += 1;
    }
}

pub(crate) fn default_viewport() -> Viewport {
    Viewport::new(1280, 720, 1.0)
}

pub(crate) fn assembled() -> (TextureRegistry, Assembly) {
    let mut registry = TextureRegistry::new();
    let assembly = yurt::assemble(&mut registry, &default_viewport());
    (registry, assembly)
}

pub(crate) fn assert_close(actual: f32, expected: f32) {
    assert!(
        (actual - expected).abs() < 1e-4,
        "expected {expected}, got {actual}"
    );
}
