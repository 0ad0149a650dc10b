//! Per-vertex tangent synthesis from position and texture-coordinate deltas.

use crate::math::{Vec3, any_orthogonal, try_normalize};

use super::error::PrimitiveError;
use super::vertex::Vertex;

/// Counts of degenerate input met while producing tangents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TangentReport {
    /// Triangles whose texture mapping has a zero determinant. They
    /// contribute nothing to the vertex averages.
    pub degenerate_triangles: usize,
    /// Vertices that received a fallback tangent orthogonal to the normal.
    pub fallback_vertices: usize,
}

/// Compute a tangent for every vertex of an indexed triangle list.
///
/// Each triangle solves the 2x2 system relating its position edges to its
/// texture-coordinate edges. The per-triangle tangent is summed into its three
/// vertices; the vertex tangent is the arithmetic mean, renormalized.
pub fn generate_tangents(
    indices: &[u32],
    vertices: &mut [Vertex],
) -> Result<TangentReport, PrimitiveError> {
    if indices.len() % 3 != 0 {
        return Err(PrimitiveError::IndexCountNotTriangles(indices.len()));
    }

    let vertex_count = vertices.len();
    let mut sums = vec![Vec3::zeros(); vertex_count];
    let mut counts = vec![0u32; vertex_count];
    let mut report = TangentReport::default();

    for triangle in indices.chunks_exact(3) {
        let mut corners = [Vertex::default(); 3];
        for (corner, &index) in corners.iter_mut().zip(triangle) {
            *corner = *vertices
                .get(index as usize)
                .ok_or(PrimitiveError::IndexOutOfRange {
                    index,
                    vertex_count,
                })?;
        }
        let [v0, v1, v2] = corners;

        let e1 = Vec3::from(v1.position) - Vec3::from(v0.position);
        let e2 = Vec3::from(v2.position) - Vec3::from(v0.position);
        let d1 = [
            v1.tex_coord[0] - v0.tex_coord[0],
            v1.tex_coord[1] - v0.tex_coord[1],
        ];
        let d2 = [
            v2.tex_coord[0] - v0.tex_coord[0],
            v2.tex_coord[1] - v0.tex_coord[1],
        ];

        let r = 1.0 / (d1[0] * d2[1] - d1[1] * d2[0]);
        let tangent = (e1 * d2[1] - e2 * d1[1]) * r;

        if !tangent.iter().all(|c| c.is_finite()) {
            report.degenerate_triangles += 1;
            continue;
        }

        for &index in triangle {
            sums[index as usize] += tangent;
            counts[index as usize] += 1;
        }
    }

    for ((vertex, sum), count) in vertices.iter_mut().zip(&sums).zip(&counts) {
        let mean = if *count > 0 {
            sum / *count as f32
        } else {
            Vec3::zeros()
        };
        vertex.tangent = resolve_tangent(&mean, vertex, &mut report).into();
    }

    Ok(report)
}

/// Renormalize tangents supplied by the source data.
///
/// Zero-length or non-finite tangents get the same fallback as synthesized
/// ones.
pub fn normalize_tangents(vertices: &mut [Vertex]) -> TangentReport {
    let mut report = TangentReport::default();
    for vertex in vertices.iter_mut() {
        let tangent = Vec3::from(vertex.tangent);
        vertex.tangent = resolve_tangent(&tangent, vertex, &mut report).into();
    }
    report
}

fn resolve_tangent(tangent: &Vec3, vertex: &Vertex, report: &mut TangentReport) -> Vec3 {
    try_normalize(tangent).unwrap_or_else(|| {
        report.fallback_vertices += 1;
        any_orthogonal(&Vec3::from(vertex.normal))
    })
}
