//! Primitive-level errors and recoverable packing warnings.

use thiserror::Error;

/// A primitive could not be processed and is skipped.
///
/// These never abort the owning mesh: the assembler replaces the primitive
/// with an empty placeholder and records the error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PrimitiveError {
    /// A required attribute (POSITION, NORMAL, TEXCOORD_0) is absent.
    #[error("missing required attribute {0}")]
    MissingAttribute(&'static str),
    /// Attribute or index data uses a component type the extractor does not read.
    #[error("unsupported component type for {attribute}: {found}")]
    UnsupportedComponentType {
        attribute: &'static str,
        found: String,
    },
    /// Only triangle lists are processed.
    #[error("unsupported topology: {0}")]
    UnsupportedTopology(String),
    /// An attribute has a different element count than POSITION.
    #[error("{attribute} has {actual} elements, expected {expected}")]
    CountMismatch {
        attribute: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Index count is not a multiple of three.
    #[error("index count {0} is not a multiple of 3")]
    IndexCountNotTriangles(usize),
    /// An index references a vertex past the end of the vertex arrays.
    #[error("index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    /// Accessor data could not be read from its buffer.
    #[error("accessor error: {0}")]
    Accessor(String),
}

/// Numeric degeneracy that was handled with a fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackWarning {
    /// A bounds axis has zero (or invalid) extent; it was not quantized.
    DegenerateAxis { axis: usize },
    /// Triangles with a zero texture-space determinant were ignored.
    DegenerateTangentTriangles { triangles: usize },
    /// Vertices received a fallback tangent orthogonal to their normal.
    FallbackTangents { vertices: usize },
    /// Vertices with a negative texture coordinate; their offset and
    /// fraction were clamped to zero.
    NegativeTexCoord { vertices: usize },
    /// Vertices whose integer texture offset exceeded 15 and was clamped.
    TexCoordOffsetClamped { vertices: usize },
}

impl std::fmt::Display for PackWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DegenerateAxis { axis } => {
                write!(f, "bounds axis {axis} has zero extent, left unquantized")
            }
            Self::DegenerateTangentTriangles { triangles } => {
                write!(f, "{triangles} triangles with degenerate texture mapping")
            }
            Self::FallbackTangents { vertices } => {
                write!(f, "{vertices} vertices use a fallback tangent")
            }
            Self::NegativeTexCoord { vertices } => {
                write!(f, "{vertices} vertices have negative texture coordinates")
            }
            Self::TexCoordOffsetClamped { vertices } => {
                write!(f, "{vertices} vertices have texture offsets clamped to 15")
            }
        }
    }
}
