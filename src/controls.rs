//! Orbit camera control.
//!
//! Pointer input is accumulated into spherical deltas (rotation), a pan offset
//! and a zoom scale. [`OrbitControls::update`] applies them to the camera once
//! per frame. With damping enabled only a fraction of the accumulated motion is
//! applied each frame and the remainder decays exponentially, so the camera keeps
//! gliding after the pointer is released.

use std::f32::consts::PI;

use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3};

use crate::camera::PerspectiveCamera;

const EPS: f32 = 1e-6;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Drag {
    Rotate,
    Pan,
}

/// Radius, polar angle `phi` (from +Y) and azimuth `theta` (around Y, from +Z).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_vector(v: Vector3<f32>) -> Self {
        let radius = v.magnitude();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_vector(self) -> Vector3<f32> {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vector3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keeps `phi` away from the poles where the view direction degenerates.
    pub fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, PI - EPS);
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub target: Point3<f32>,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    spherical_delta: Spherical,
    pan_offset: Vector3<f32>,
    scale: f32,
    drag: Option<Drag>,
    last_pointer: Option<(f32, f32)>,
    viewport_height: f32,
}

impl OrbitControls {
    pub fn new(target: Point3<f32>) -> Self {
        Self {
            target,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            spherical_delta: Spherical::default(),
            pan_offset: Vector3::new(0.0, 0.0, 0.0),
            scale: 1.0,
            drag: None,
            last_pointer: None,
            viewport_height: 1.0,
        }
    }

    /// Height of the input surface, in the same unit as pointer positions.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(1.0);
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    pub fn dolly_in(&mut self, scale: f32) {
        self.scale *= scale;
    }

    pub fn dolly_out(&mut self, scale: f32) {
        self.scale /= scale;
    }

    fn zoom_scale(&self) -> f32 {
        0.95f32.powf(self.zoom_speed)
    }

    pub fn pointer_down(&mut self, button: PointerButton, x: f32, y: f32) {
        self.drag = match button {
            PointerButton::Primary => Some(Drag::Rotate),
            PointerButton::Secondary | PointerButton::Middle => Some(Drag::Pan),
        };
        self.last_pointer = Some((x, y));
    }

    /// `camera` is needed for panning, which moves along the camera's screen axes.
    pub fn pointer_move(&mut self, x: f32, y: f32, camera: &PerspectiveCamera) {
        let Some(drag) = self.drag else {
            return;
        };
        let (last_x, last_y) = self.last_pointer.unwrap_or((x, y));
        self.last_pointer = Some((x, y));
        let (dx, dy) = (x - last_x, y - last_y);
        match drag {
            Drag::Rotate => {
                let dx = dx * self.rotate_speed;
                let dy = dy * self.rotate_speed;
                self.rotate_left(2.0 * PI * dx / self.viewport_height);
                self.rotate_up(2.0 * PI * dy / self.viewport_height);
            }
            Drag::Pan => self.pan(dx * self.pan_speed, dy * self.pan_speed, camera),
        }
    }

    pub fn pointer_up(&mut self) {
        self.drag = None;
        self.last_pointer = None;
    }

    /// Positive `delta` scrolls away from the user and zooms in.
    pub fn wheel(&mut self, delta: f32) {
        if delta > 0.0 {
            self.dolly_in(self.zoom_scale());
        } else if delta < 0.0 {
            self.dolly_out(self.zoom_scale());
        }
    }

    fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera) {
        let offset = camera.position - self.target;
        // half of the fov is center to top of screen
        let half_fov = cgmath::Rad::from(camera.fovy).0 / 2.0;
        let target_distance = offset.magnitude() * half_fov.tan();

        let forward = (camera.target - camera.position).normalize();
        let right = forward.cross(camera.up).normalize();
        let up = right.cross(forward);

        self.pan_offset += right * (-2.0 * dx * target_distance / self.viewport_height);
        self.pan_offset += up * (2.0 * dy * target_distance / self.viewport_height);
    }

    /// Applies accumulated input to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let previous = camera.position;
        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_vector(offset);

        if self.enable_damping {
            spherical.theta += self.spherical_delta.theta * self.damping_factor;
            spherical.phi += self.spherical_delta.phi * self.damping_factor;
        } else {
            spherical.theta += self.spherical_delta.theta;
            spherical.phi += self.spherical_delta.phi;
        }

        spherical.phi = spherical
            .phi
            .clamp(self.min_polar_angle, self.max_polar_angle);
        spherical.make_safe();

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.position = self.target + spherical.to_vector();
        camera.look_at(self.target);

        if self.enable_damping {
            self.spherical_delta.theta *= 1.0 - self.damping_factor;
            self.spherical_delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vector3::new(0.0, 0.0, 0.0);
        }
        self.scale = 1.0;

        (camera.position - previous).magnitude2() > EPS
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Point3::origin())
    }
}
