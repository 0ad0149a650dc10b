//! Procedural primitives for tests, benches and smoke runs.
//!
//! These generators produce [`RawPrimitive`] values that go through the
//! same assembler path as primitives read from a scene file.

use std::f32::consts::PI;

use super::bounds::Bounds;
use super::data::RawPrimitive;

/// Generate a UV sphere.
///
/// # Arguments
///
/// * `radius` - Sphere radius
/// * `segments` - Number of longitudinal segments (around the equator)
/// * `rings` - Number of latitudinal rings (from pole to pole)
pub fn generate_sphere(radius: f32, segments: u32, rings: u32) -> RawPrimitive {
    let vertex_count = ((rings + 1) * (segments + 1)) as usize;
    let mut positions = Vec::with_capacity(vertex_count);
    let mut normals = Vec::with_capacity(vertex_count);
    let mut tex_coords = Vec::with_capacity(vertex_count);
    let mut indices = Vec::with_capacity((rings * segments * 6) as usize);

    for ring in 0..=rings {
        let theta = ring as f32 * PI / rings as f32;
        let (sin_theta, cos_theta) = theta.sin_cos();

        for segment in 0..=segments {
            let phi = segment as f32 * 2.0 * PI / segments as f32;
            let (sin_phi, cos_phi) = phi.sin_cos();

            let normal = [sin_theta * cos_phi, cos_theta, sin_theta * sin_phi];
            positions.push(normal.map(|c| c * radius));
            normals.push(normal);
            tex_coords.push([segment as f32 / segments as f32, ring as f32 / rings as f32]);
        }
    }

    for ring in 0..rings {
        for segment in 0..segments {
            let current = ring * (segments + 1) + segment;
            let next = current + segments + 1;
            indices.extend_from_slice(&[current, next, current + 1]);
            indices.extend_from_slice(&[current + 1, next, next + 1]);
        }
    }

    RawPrimitive {
        indices,
        positions,
        normals,
        tex_coords,
        declared_bounds: Some(Bounds::from_min_max([-radius; 3], [radius; 3])),
        ..Default::default()
    }
}

/// Generate a quad on the XY plane facing +Z.
///
/// UV coordinates go from (0,0) at top-left to (1,1) at bottom-right.
pub fn generate_quad(half_width: f32, half_height: f32) -> RawPrimitive {
    RawPrimitive {
        indices: vec![0, 1, 2, 2, 3, 0],
        positions: vec![
            [-half_width, -half_height, 0.0],
            [half_width, -half_height, 0.0],
            [half_width, half_height, 0.0],
            [-half_width, half_height, 0.0],
        ],
        normals: vec![[0.0, 0.0, 1.0]; 4],
        tex_coords: vec![[0.0, 1.0], [1.0, 1.0], [1.0, 0.0], [0.0, 0.0]],
        ..Default::default()
    }
}
