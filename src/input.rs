//! Pointer and keyboard routing between the debug panel and the orbit controls.
//!
//! [`Stage`] holds the scene together with everything the user can steer:
//! the camera, its orbit controls and the debug panel. It needs no GPU, the
//! application hands it window input already converted to logical pixels.
//!
//! The panel sees input first. A press that lands on the panel never reaches
//! the orbit controls, whatever the button, and the wheel does nothing while
//! the cursor is over the panel.

use crate::{
    camera::PerspectiveCamera,
    controls::{OrbitControls, PointerButton},
    data_structures::scene_graph::Scene,
    debug::DebugPanel,
    viewport::Viewport,
    yurt::Assembly,
};

#[derive(Debug)]
pub struct Stage {
    pub scene: Scene,
    pub camera: PerspectiveCamera,
    pub controls: OrbitControls,
    pub panel: DebugPanel,
    pub viewport: Viewport,
    cursor: Option<(f32, f32)>,
}

impl Stage {
    pub fn new(assembly: Assembly, viewport: Viewport) -> Self {
        let Assembly {
            scene,
            camera,
            mut controls,
            panel,
            ..
        } = assembly;
        controls.set_viewport_height(viewport.height as f32);
        Self {
            scene,
            camera,
            controls,
            panel,
            viewport,
            cursor: None,
        }
    }

    pub fn cursor(&self) -> Option<(f32, f32)> {
        self.cursor
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.controls.set_viewport_height(viewport.height as f32);
    }

    pub fn pointer_moved(&mut self, x: f32, y: f32) {
        self.cursor = Some((x, y));
        if self.panel.pointer_move(&mut self.scene, &self.viewport, x) {
            return;
        }
        self.controls.pointer_move(x, y, &self.camera);
    }

    pub fn pointer_button(&mut self, button: PointerButton, pressed: bool) {
        let Some((x, y)) = self.cursor else {
            return;
        };
        if !pressed {
            self.panel.pointer_up();
            self.controls.pointer_up();
            return;
        }
        if self.panel.contains(&self.viewport, x, y) {
            if button == PointerButton::Primary {
                self.panel.pointer_down(&mut self.scene, &self.viewport, x, y);
            }
            return;
        }
        self.controls.pointer_down(button, x, y);
    }

    pub fn pointer_left(&mut self) {
        self.panel.pointer_up();
        self.controls.pointer_up();
        self.cursor = None;
    }

    pub fn wheel(&mut self, delta: f32) {
        if let Some((x, y)) = self.cursor {
            if self.panel.contains(&self.viewport, x, y) {
                return;
            }
        }
        self.controls.wheel(delta);
    }

    pub fn toggle_panel(&mut self) {
        self.panel.toggle_visibility();
    }

    /// Advances the orbit controls by one frame. Returns `true` if the camera
    /// moved.
    pub fn update(&mut self) -> bool {
        self.controls.update(&mut self.camera)
    }
}
