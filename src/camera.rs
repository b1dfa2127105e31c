//! Perspective camera and its GPU uniform.

use cgmath::{EuclideanSpace, Matrix4, Point3, Vector3};
use wgpu::util::DeviceExt;

/// cgmath builds OpenGL clip space (z in [-1, 1]); wgpu expects z in [0, 1].
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// A perspective camera looking at `target`.
///
/// The projection matrix is cached: after changing `fovy`, `aspect`, `znear`
/// or `zfar`, call [`update_projection_matrix`](Self::update_projection_matrix).
#[derive(Clone, Debug)]
pub struct PerspectiveCamera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fovy: cgmath::Deg<f32>,
    pub aspect: f32,
    pub znear: f32,
    pub zfar: f32,
    projection: Matrix4<f32>,
}

impl PerspectiveCamera {
    pub fn new(fovy: cgmath::Deg<f32>, aspect: f32, znear: f32, zfar: f32) -> Self {
        let mut camera = Self {
            position: Point3::origin(),
            target: Point3::new(0.0, 0.0, -1.0),
            up: Vector3::unit_y(),
            fovy,
            aspect,
            znear,
            zfar,
            projection: Matrix4::from_scale(1.0),
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn update_projection_matrix(&mut self) {
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 {
            self.aspect
        } else {
            1.0
        };
        self.projection = cgmath::perspective(self.fovy, aspect, self.znear, self.zfar);
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn look_at(&mut self, target: Point3<f32>) {
        self.target = target;
    }

    pub fn view_proj(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * self.projection * self.view_matrix()
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: cgmath::Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &PerspectiveCamera) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = camera.view_proj().into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// GPU side of the camera: uniform buffer and bind group.
#[derive(Debug)]
pub struct CameraResources {
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}

impl CameraResources {
    pub fn new(device: &wgpu::Device, camera: &PerspectiveCamera) -> Self {
        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(camera);

        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Camera Buffer"),
            contents: bytemuck::cast_slice(&[uniform]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("camera_bind_group_layout"),
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("camera_bind_group"),
        });

        Self {
            uniform,
            buffer,
            bind_group,
            bind_group_layout,
        }
    }

    pub fn write(&mut self, queue: &wgpu::Queue, camera: &PerspectiveCamera) {
        self.uniform.update_view_proj(camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }
}
