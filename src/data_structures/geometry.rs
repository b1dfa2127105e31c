//! Primitive shape descriptors and their triangulation.
//!
//! A [`Geometry`] is an immutable description (primitive type plus
//! parameters). [`Geometry::build`] turns it into a [`MeshData`] with
//! positions, normals, texture coordinates and tangent frames.
//!
//! Texture coordinates are generated with the origin in the bottom-left corner
//! (`v` pointing up) and then flipped once into wgpu's top-left convention.

use std::f32::consts::PI;

use cgmath::{InnerSpace, Vector2, Vector3};

use crate::data_structures::model::{MeshData, ModelVertex};

#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// UV sphere centred on the origin.
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Rectangle in the XY plane facing +Z.
    Plane { width: f32, height: f32 },
    /// Capped cylinder (or cone frustum) along the Y axis.
    Cylinder {
        radius_top: f32,
        radius_bottom: f32,
        height: f32,
        radial_segments: u32,
    },
}

impl Geometry {
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        Geometry::Sphere {
            radius,
            width_segments: width_segments.max(3),
            height_segments: height_segments.max(2),
        }
    }

    pub fn plane(width: f32, height: f32) -> Self {
        Geometry::Plane { width, height }
    }

    pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Self {
        Geometry::Cylinder {
            radius_top,
            radius_bottom,
            height,
            radial_segments: radial_segments.max(3),
        }
    }

    pub fn build(&self) -> MeshData {
        let mut data = match *self {
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments, height_segments),
            Geometry::Plane { width, height } => plane(width, height),
            Geometry::Cylinder {
                radius_top,
                radius_bottom,
                height,
                radial_segments,
            } => cylinder(radius_top, radius_bottom, height, radial_segments),
        };
        compute_tangents(&mut data);
        data
    }
}

fn vertex(position: Vector3<f32>, normal: Vector3<f32>, u: f32, v: f32) -> ModelVertex {
    ModelVertex {
        position: position.into(),
        // flip v into the top-left texture origin used by wgpu
        tex_coords: [u, 1.0 - v],
        normal: normal.into(),
        // We'll calculate these later
        tangent: [0.0; 3],
        bitangent: [0.0; 3],
    }
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut data = MeshData::default();
    let mut grid: Vec<Vec<u32>> = Vec::with_capacity(height_segments as usize + 1);
    let mut index = 0;

    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        // Poles get their u shifted half a segment so each pole triangle is centred.
        let u_offset = if iy == 0 {
            0.5 / width_segments as f32
        } else if iy == height_segments {
            -0.5 / width_segments as f32
        } else {
            0.0
        };
        let mut row = Vec::with_capacity(width_segments as usize + 1);
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let phi = u * 2.0 * PI;
            let theta = v * PI;
            let position = Vector3::new(
                -radius * phi.cos() * theta.sin(),
                radius * theta.cos(),
                radius * phi.sin() * theta.sin(),
            );
            let normal = if position.magnitude2() > 0.0 {
                position.normalize()
            } else {
                Vector3::unit_y()
            };
            data.vertices.push(vertex(position, normal, u + u_offset, 1.0 - v));
            row.push(index);
            index += 1;
        }
        grid.push(row);
    }

    for iy in 0..height_segments as usize {
        for ix in 0..width_segments as usize {
            let a = grid[iy][ix + 1];
            let b = grid[iy][ix];
            let c = grid[iy + 1][ix];
            let d = grid[iy + 1][ix + 1];
            // the pole rows collapse into single triangles
            if iy != 0 {
                data.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments as usize - 1 {
                data.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    data
}

fn plane(width: f32, height: f32) -> MeshData {
    let mut data = MeshData::default();
    let half_width = width / 2.0;
    let half_height = height / 2.0;

    for iy in 0..=1u32 {
        let y = iy as f32 * height - half_height;
        for ix in 0..=1u32 {
            let x = ix as f32 * width - half_width;
            data.vertices.push(vertex(
                Vector3::new(x, -y, 0.0),
                Vector3::unit_z(),
                ix as f32,
                1.0 - iy as f32,
            ));
        }
    }

    let (a, b, c, d) = (0, 2, 3, 1);
    data.indices.extend_from_slice(&[a, b, d, b, c, d]);
    data
}

fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> MeshData {
    let mut data = MeshData::default();
    let half_height = height / 2.0;
    let slope = (radius_bottom - radius_top) / height;

    // side wall, a single height segment
    let mut rows: Vec<Vec<u32>> = Vec::with_capacity(2);
    for y in 0..=1u32 {
        let v = y as f32;
        let radius = v * (radius_bottom - radius_top) + radius_top;
        let mut row = Vec::with_capacity(radial_segments as usize + 1);
        for x in 0..=radial_segments {
            let u = x as f32 / radial_segments as f32;
            let theta = u * 2.0 * PI;
            let (sin_theta, cos_theta) = theta.sin_cos();
            let position = Vector3::new(
                radius * sin_theta,
                -v * height + half_height,
                radius * cos_theta,
            );
            let normal = Vector3::new(sin_theta, slope, cos_theta).normalize();
            row.push(data.vertices.len() as u32);
            data.vertices.push(vertex(position, normal, u, 1.0 - v));
        }
        rows.push(row);
    }
    for x in 0..radial_segments as usize {
        let a = rows[0][x];
        let b = rows[1][x];
        let c = rows[1][x + 1];
        let d = rows[0][x + 1];
        data.indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    if radius_top > 0.0 {
        cylinder_cap(&mut data, true, radius_top, half_height, radial_segments);
    }
    if radius_bottom > 0.0 {
        cylinder_cap(&mut data, false, radius_bottom, half_height, radial_segments);
    }
    data
}

fn cylinder_cap(data: &mut MeshData, top: bool, radius: f32, half_height: f32, radial_segments: u32) {
    let sign = if top { 1.0 } else { -1.0 };
    let normal = Vector3::new(0.0, sign, 0.0);

    // one centre vertex per segment so every fan triangle gets its own uv
    let center_start = data.vertices.len() as u32;
    for _ in 0..radial_segments {
        data.vertices.push(vertex(
            Vector3::new(0.0, half_height * sign, 0.0),
            normal,
            0.5,
            0.5,
        ));
    }

    let rim_start = data.vertices.len() as u32;
    for x in 0..=radial_segments {
        let u = x as f32 / radial_segments as f32;
        let theta = u * 2.0 * PI;
        let (sin_theta, cos_theta) = theta.sin_cos();
        data.vertices.push(vertex(
            Vector3::new(radius * sin_theta, half_height * sign, radius * cos_theta),
            normal,
            cos_theta * 0.5 + 0.5,
            sin_theta * 0.5 * sign + 0.5,
        ));
    }

    for x in 0..radial_segments {
        let c = center_start + x;
        let i = rim_start + x;
        if top {
            data.indices.extend_from_slice(&[i, i + 1, c]);
        } else {
            data.indices.extend_from_slice(&[i + 1, i, c]);
        }
    }
}

/**
 * Generated primitives don't come with tangents and bitangents so they have to be
 * calculated for normal maps to work correctly.
 *
 * Triangles with a degenerate uv mapping (the sphere poles) are skipped and any
 * vertex left without a tangent gets an arbitrary frame perpendicular to its normal.
 */
pub fn compute_tangents(data: &mut MeshData) {
    let vertices = &mut data.vertices;
    let mut triangles_included = vec![0u32; vertices.len()];

    for c in data.indices.chunks(3) {
        if c.len() < 3 {
            continue;
        }
        let v0 = vertices[c[0] as usize];
        let v1 = vertices[c[1] as usize];
        let v2 = vertices[c[2] as usize];

        let pos0: Vector3<f32> = v0.position.into();
        let pos1: Vector3<f32> = v1.position.into();
        let pos2: Vector3<f32> = v2.position.into();

        let uv0: Vector2<f32> = v0.tex_coords.into();
        let uv1: Vector2<f32> = v1.tex_coords.into();
        let uv2: Vector2<f32> = v2.tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // Solving
        //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() < f32::EPSILON {
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // We flip the bitangent to enable right-handed normal
        // maps with wgpu texture coordinate system
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for &i in c {
            let v = &mut vertices[i as usize];
            v.tangent = (tangent + Vector3::from(v.tangent)).into();
            v.bitangent = (bitangent + Vector3::from(v.bitangent)).into();
            triangles_included[i as usize] += 1;
        }
    }

    // Average the tangents/bitangents
    for (v, n) in vertices.iter_mut().zip(triangles_included) {
        let normal = Vector3::from(v.normal);
        if n == 0 {
            let (tangent, bitangent) = fallback_frame(normal);
            v.tangent = tangent.into();
            v.bitangent = bitangent.into();
            continue;
        }
        let denom = 1.0 / n as f32;
        v.tangent = (Vector3::from(v.tangent) * denom).into();
        v.bitangent = (Vector3::from(v.bitangent) * denom).into();
    }
}

fn fallback_frame(normal: Vector3<f32>) -> (Vector3<f32>, Vector3<f32>) {
    let helper = if normal.x.abs() < 0.9 {
        Vector3::unit_x()
    } else {
        Vector3::unit_y()
    };
    let tangent = helper.cross(normal).normalize();
    let bitangent = normal.cross(tangent);
    (tangent, bitangent)
}
