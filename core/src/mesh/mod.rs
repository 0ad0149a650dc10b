//! CPU-side mesh preprocessing.
//!
//! This module turns raw attribute streams into packed, optimized primitives:
//!
//! - [`RawPrimitive`] - Extracted attribute arrays for one primitive
//! - [`generate_tangents`] - Per-vertex tangent synthesis
//! - [`Bounds`] - Axis-aligned bounds (offset + size)
//! - [`encoding`] - Octahedral and unorm quantization
//! - [`TopologyOptimizer`] - Remap, vertex cache and vertex fetch reordering
//! - [`MeshAssembler`] - Runs the pipeline and produces [`Primitive`]s
//! - Generators for common shapes (sphere, quad)

mod assemble;
mod bounds;
mod data;
pub mod encoding;
mod error;
pub mod generators;
mod optimize;
mod tangent;
mod vertex;

pub use assemble::{MeshAssembler, PreprocessConfig};
pub use bounds::Bounds;
pub use data::{Mesh, Primitive, RawPrimitive, SkippedPrimitive};
pub use error::{PackWarning, PrimitiveError};
pub use optimize::{MeshoptOptimizer, ReferenceOptimizer, TopologyOptimizer};
pub use tangent::{TangentReport, generate_tangents, normalize_tangents};
pub use vertex::{
    PACKED_VERTEX_ATTRIBUTES, PackedAttribute, PackedAttributeFormat, PackedAttributeSemantic,
    PackedVertex, Vertex,
};
