//! Debug panel for live-tweaking scene values.
//!
//! Each slider is backed by a [`Binding`]: the name of a scene node, the
//! [`Field`] of that node to edit, and a range with a step size. Writing goes
//! through [`Binding::write`] only, so every mutation of the live scene made by
//! the panel can be found from here.
//!
//! The panel is an overlay anchored to the top-right corner of the viewport.
//! Coordinates are logical pixels with the origin in the top-left corner.

use crate::{data_structures::scene_graph::Scene, viewport::Viewport};

/// Editable field of a scene node.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Field {
    /// Intensity of a light node.
    Intensity,
    PositionX,
    PositionY,
    PositionZ,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Binding {
    pub target: String,
    pub field: Field,
    pub label: String,
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl Binding {
    pub fn new(target: &str, field: Field, min: f32, max: f32, step: f32) -> Self {
        let label = match field {
            Field::Intensity => format!("{target}.intensity"),
            Field::PositionX => format!("{target}.position.x"),
            Field::PositionY => format!("{target}.position.y"),
            Field::PositionZ => format!("{target}.position.z"),
        };
        Self {
            target: target.to_string(),
            field,
            label,
            min,
            max,
            step,
        }
    }

    /// Clamps `value` into the range and snaps it onto the step grid.
    /// Infinities clamp to the nearest end, NaN falls back to `min`.
    pub fn constrain(&self, value: f32) -> f32 {
        if value.is_nan() {
            return self.min;
        }
        let mut value = value.clamp(self.min, self.max);
        if self.step > 0.0 {
            value = snap(value, self.step);
        }
        value.clamp(self.min, self.max)
    }

    /// `label = value` with as many decimals as the step has.
    pub fn readout(&self, value: f32) -> String {
        let decimals = if self.step > 0.0 { step_decimals(self.step) } else { 3 };
        format!("{} = {:.*}", self.label, decimals as usize, value)
    }

    /// Position of `value` inside the range, in `[0, 1]`.
    pub fn fraction(&self, value: f32) -> f32 {
        if self.max <= self.min {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }

    pub fn read(&self, scene: &Scene) -> Option<f32> {
        let node = scene.find(&self.target)?;
        match self.field {
            Field::Intensity => node.as_light().map(|light| light.intensity),
            Field::PositionX => Some(node.transform.position.x),
            Field::PositionY => Some(node.transform.position.y),
            Field::PositionZ => Some(node.transform.position.z),
        }
    }

    /// Writes the constrained value into the scene and returns it, or `None`
    /// if the target does not exist or has no such field.
    pub fn write(&self, scene: &mut Scene, value: f32) -> Option<f32> {
        let value = self.constrain(value);
        let node = scene.find_mut(&self.target)?;
        match self.field {
            Field::Intensity => node.as_light_mut()?.intensity = value,
            Field::PositionX => node.transform.position.x = value,
            Field::PositionY => node.transform.position.y = value,
            Field::PositionZ => node.transform.position.z = value,
        }
        Some(value)
    }
}

/// Decimal places of `step` as written, so `0.001` has three.
fn step_decimals(step: f32) -> i32 {
    let written = step.to_string();
    match written.split_once('.') {
        Some((_, fraction)) => fraction.len().min(9) as i32,
        None => 0,
    }
}

/// Rounds to the nearest multiple of `step`, then to the step's decimal
/// places so values already on the grid come back unchanged.
fn snap(value: f32, step: f32) -> f32 {
    let step_wide = step as f64;
    let snapped = (value as f64 / step_wide).round() * step_wide;
    let scale = 10f64.powi(step_decimals(step));
    ((snapped * scale).round() / scale) as f32
}

/// Axis-aligned rectangle in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// A filled rectangle to draw, colour in linear RGBA.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelQuad {
    pub rect: Rect,
    pub color: [f32; 4],
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelLayout {
    pub width: f32,
    pub title_height: f32,
    pub row_height: f32,
    pub padding: f32,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            width: 245.0,
            title_height: 8.0,
            row_height: 24.0,
            padding: 6.0,
        }
    }
}

const BACKGROUND: [f32; 4] = [0.12, 0.12, 0.12, 0.9];
const TITLE: [f32; 4] = [0.07, 0.07, 0.07, 0.95];
const TRACK: [f32; 4] = [0.26, 0.26, 0.26, 1.0];
const FILL: [f32; 4] = [0.17, 0.79, 1.0, 1.0];

#[derive(Clone, Debug, Default)]
pub struct DebugPanel {
    bindings: Vec<Binding>,
    layout: PanelLayout,
    hidden: bool,
    dragging: Option<usize>,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a slider and returns its index.
    pub fn add(&mut self, binding: Binding) -> usize {
        self.bindings.push(binding);
        self.bindings.len() - 1
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    pub fn is_visible(&self) -> bool {
        !self.hidden
    }

    pub fn toggle_visibility(&mut self) {
        self.hidden = !self.hidden;
        self.dragging = None;
    }

    pub fn value(&self, scene: &Scene, index: usize) -> Option<f32> {
        self.bindings.get(index)?.read(scene)
    }

    /// Sets slider `index`; the stored value is clamped and snapped.
    pub fn set(&self, scene: &mut Scene, index: usize, value: f32) -> Option<f32> {
        let binding = self.bindings.get(index)?;
        let previous = binding.read(scene);
        let applied = binding.write(scene, value)?;
        if previous != Some(applied) {
            log::info!("{}", binding.readout(applied));
        }
        Some(applied)
    }

    fn bounds(&self, viewport: &Viewport) -> Rect {
        let l = &self.layout;
        Rect {
            x: viewport.width as f32 - l.width,
            y: 0.0,
            width: l.width,
            height: l.title_height + l.padding + self.bindings.len() as f32 * l.row_height,
        }
    }

    fn row(&self, viewport: &Viewport, index: usize) -> Rect {
        let bounds = self.bounds(viewport);
        let l = &self.layout;
        Rect {
            x: bounds.x,
            y: l.title_height + l.padding + index as f32 * l.row_height,
            width: l.width,
            height: l.row_height,
        }
    }

    fn track(&self, viewport: &Viewport, index: usize) -> Rect {
        let row = self.row(viewport, index);
        let l = &self.layout;
        Rect {
            x: row.x + l.padding,
            y: row.y + l.padding,
            width: row.width - 2.0 * l.padding,
            height: row.height - 2.0 * l.padding,
        }
    }

    pub fn contains(&self, viewport: &Viewport, x: f32, y: f32) -> bool {
        self.is_visible() && self.bounds(viewport).contains(x, y)
    }

    fn set_from_pointer(&self, scene: &mut Scene, viewport: &Viewport, index: usize, x: f32) {
        let track = self.track(viewport, index);
        let fraction = ((x - track.x) / track.width).clamp(0.0, 1.0);
        if let Some(binding) = self.bindings.get(index) {
            let value = binding.min + fraction * (binding.max - binding.min);
            self.set(scene, index, value);
        }
    }

    /// Returns `true` when the press landed on the panel and must not reach
    /// anything behind it.
    pub fn pointer_down(&mut self, scene: &mut Scene, viewport: &Viewport, x: f32, y: f32) -> bool {
        if !self.contains(viewport, x, y) {
            return false;
        }
        let hit = (0..self.bindings.len()).find(|&i| self.row(viewport, i).contains(x, y));
        if let Some(index) = hit {
            self.dragging = Some(index);
            self.set_from_pointer(scene, viewport, index, x);
        }
        true
    }

    /// Returns `true` while a slider is being dragged.
    pub fn pointer_move(&mut self, scene: &mut Scene, viewport: &Viewport, x: f32) -> bool {
        match self.dragging {
            Some(index) => {
                self.set_from_pointer(scene, viewport, index, x);
                true
            }
            None => false,
        }
    }

    pub fn pointer_up(&mut self) -> bool {
        self.dragging.take().is_some()
    }

    /// Rectangles for the current values, back to front.
    pub fn quads(&self, scene: &Scene, viewport: &Viewport) -> Vec<PanelQuad> {
        if !self.is_visible() || viewport.is_empty() {
            return Vec::new();
        }
        let bounds = self.bounds(viewport);
        let mut quads = vec![
            PanelQuad {
                rect: bounds,
                color: BACKGROUND,
            },
            PanelQuad {
                rect: Rect {
                    height: self.layout.title_height,
                    ..bounds
                },
                color: TITLE,
            },
        ];
        for (index, binding) in self.bindings.iter().enumerate() {
            let track = self.track(viewport, index);
            quads.push(PanelQuad {
                rect: track,
                color: TRACK,
            });
            let fraction = binding
                .read(scene)
                .map(|value| binding.fraction(value))
                .unwrap_or(0.0);
            if fraction > 0.0 {
                quads.push(PanelQuad {
                    rect: Rect {
                        width: track.width * fraction,
                        ..track
                    },
                    color: FILL,
                });
            }
        }
        quads
    }

    /// Upper bound of [`quads`](Self::quads) for the current bindings.
    pub fn max_quads(&self) -> usize {
        2 + 2 * self.bindings.len()
    }
}
