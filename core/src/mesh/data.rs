//! Primitive and mesh data structures.
//!
//! This module provides:
//! - [`RawPrimitive`] - Extracted, unprocessed attribute arrays
//! - [`Primitive`] - Immutable packed output of the assembler
//! - [`Mesh`] - Primitives of one source mesh plus skip diagnostics

use super::bounds::Bounds;
use super::error::{PackWarning, PrimitiveError};
use super::vertex::{PackedVertex, Vertex};

/// Attribute arrays of one source primitive, as read from the scene.
///
/// All per-vertex arrays are parallel and have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawPrimitive {
    /// Triangle-list indices, widened to u32.
    pub indices: Vec<u32>,
    pub positions: Vec<[f32; 3]>,
    pub normals: Vec<[f32; 3]>,
    /// First texture coordinate set, converted to float.
    pub tex_coords: Vec<[f32; 2]>,
    /// Tangents supplied by the source, if any (xyz only).
    pub tangents: Option<Vec<[f32; 3]>>,
    /// Bounds declared by the source (accessor min/max), if any.
    pub declared_bounds: Option<Bounds>,
    /// Material index in the source document.
    pub material: Option<usize>,
}

impl RawPrimitive {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Check that every attribute array matches the POSITION count.
    pub fn check_counts(&self) -> Result<(), PrimitiveError> {
        let expected = self.positions.len();
        check_count("NORMAL", expected, self.normals.len())?;
        check_count("TEXCOORD_0", expected, self.tex_coords.len())?;
        if let Some(tangents) = &self.tangents {
            check_count("TANGENT", expected, tangents.len())?;
        }
        Ok(())
    }

    /// Interleave the attribute arrays into working vertices.
    ///
    /// Tangents are copied when present and left zero otherwise.
    pub fn vertices(&self) -> Result<Vec<Vertex>, PrimitiveError> {
        self.check_counts()?;
        let expected = self.positions.len();
        let vertices = (0..expected)
            .map(|i| Vertex {
                position: self.positions[i],
                normal: self.normals[i],
                tangent: self.tangents.as_ref().map_or([0.0; 3], |t| t[i]),
                tex_coord: self.tex_coords[i],
            })
            .collect();
        Ok(vertices)
    }
}

fn check_count(
    attribute: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), PrimitiveError> {
    if expected == actual {
        Ok(())
    } else {
        Err(PrimitiveError::CountMismatch {
            attribute,
            expected,
            actual,
        })
    }
}

/// A packed, optimized primitive ready for upload.
///
/// Immutable once assembled. An empty primitive (no indices, no vertices) is
/// the placeholder left in place of a skipped source primitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Primitive {
    indices: Vec<u32>,
    vertices: Vec<PackedVertex>,
    bounds: Bounds,
    material: Option<usize>,
    warnings: Vec<PackWarning>,
    source_vertex_count: usize,
}

impl Primitive {
    pub(crate) fn new(
        indices: Vec<u32>,
        vertices: Vec<PackedVertex>,
        bounds: Bounds,
        material: Option<usize>,
        warnings: Vec<PackWarning>,
    ) -> Self {
        Self {
            source_vertex_count: vertices.len(),
            indices,
            vertices,
            bounds,
            material,
            warnings,
        }
    }

    /// Record the vertex count before deduplication.
    pub(crate) fn with_source_vertex_count(mut self, count: usize) -> Self {
        self.source_vertex_count = count;
        self
    }

    /// Empty stand-in for a primitive that failed to process.
    pub fn placeholder(material: Option<usize>) -> Self {
        Self {
            material,
            ..Default::default()
        }
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertices(&self) -> &[PackedVertex] {
        &self.vertices
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn material(&self) -> Option<usize> {
        self.material
    }

    /// Recoverable degeneracies handled while packing.
    pub fn warnings(&self) -> &[PackWarning] {
        &self.warnings
    }

    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Vertex count of the source primitive, before deduplication.
    pub fn source_vertex_count(&self) -> usize {
        self.source_vertex_count
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Index buffer payload, u32 little-endian.
    pub fn index_bytes(&self) -> Vec<u8> {
        self.indices.iter().flat_map(|i| i.to_le_bytes()).collect()
    }

    /// Vertex buffer payload in the packed layout.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        self.vertices.iter().flat_map(|v| v.to_le_bytes()).collect()
    }
}

/// Record of a source primitive that was replaced by a placeholder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPrimitive {
    /// Position of the primitive within its mesh.
    pub index: usize,
    pub error: PrimitiveError,
}

/// All primitives of one source mesh.
///
/// `primitives` has one slot per source primitive, in source order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
    pub skipped: Vec<SkippedPrimitive>,
}

impl Mesh {
    /// Union of the bounds of all non-empty primitives.
    pub fn bounds(&self) -> Option<Bounds> {
        self.primitives
            .iter()
            .filter(|p| !p.is_empty())
            .map(|p| p.bounds)
            .reduce(|a, b| a.union(&b))
    }

    /// Why primitive `index` was replaced by a placeholder, if it was.
    pub fn skip_reason(&self, index: usize) -> Option<&PrimitiveError> {
        self.skipped
            .iter()
            .find(|s| s.index == index)
            .map(|s| &s.error)
    }
}
