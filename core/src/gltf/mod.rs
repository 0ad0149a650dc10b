//! glTF 2.0 scene loader.
//!
//! Loads `.gltf`/`.glb` files, extracts the attributes of every triangle
//! primitive and runs them through a [`MeshAssembler`], producing a
//! [`Scene`] of packed primitives plus the node hierarchy.
//!
//! # Failure model
//!
//! Resource-level problems (unparseable document, missing or unreadable
//! buffers) fail the whole load with a [`GltfError`]. Primitive-level
//! problems (missing NORMAL, unsupported component type, non-triangle
//! topology, bad indices) skip that primitive: it is replaced by an empty
//! placeholder and listed in [`Mesh::skipped`](crate::mesh::Mesh::skipped).
//!
//! # Example
//!
//! ```no_run
//! use meshprep_core::gltf::load_gltf_file;
//!
//! let scene = load_gltf_file("model.glb")?;
//! for mesh in &scene.meshes {
//!     for primitive in &mesh.primitives {
//!         println!("{} vertices", primitive.vertex_count());
//!     }
//! }
//! # Ok::<(), meshprep_core::gltf::GltfError>(())
//! ```

mod accessor;
mod error;
mod loader;
#[cfg(test)]
mod tests;

pub use error::GltfError;

use std::path::Path;

use crate::mesh::MeshAssembler;
use crate::scene::Scene;

/// Load a scene from `.glb` or `.gltf` bytes with the default pipeline.
///
/// External buffer URIs are not resolvable from bytes alone; use
/// [`load_gltf_file`] for those.
pub fn load_gltf(data: &[u8]) -> Result<Scene, GltfError> {
    load_gltf_with(data, None, &MeshAssembler::default())
}

/// Load a scene from bytes with a caller-configured assembler.
///
/// `base_dir` is the directory external buffer URIs are resolved against.
pub fn load_gltf_with(
    data: &[u8],
    base_dir: Option<&Path>,
    assembler: &MeshAssembler,
) -> Result<Scene, GltfError> {
    let gltf_dep::Gltf { document, blob } = gltf_dep::Gltf::from_slice(data)?;
    let buffers = loader::resolve_buffers(&document, blob, base_dir)?;
    let ctx = loader::LoadContext::new(document, buffers);
    Ok(ctx.load_scene(assembler))
}

/// Load a scene from a file with the default pipeline.
pub fn load_gltf_file(path: impl AsRef<Path>) -> Result<Scene, GltfError> {
    load_gltf_file_with(path, &MeshAssembler::default())
}

/// Load a scene from a file with a caller-configured assembler.
pub fn load_gltf_file_with(
    path: impl AsRef<Path>,
    assembler: &MeshAssembler,
) -> Result<Scene, GltfError> {
    let path = path.as_ref();
    let data = std::fs::read(path).map_err(|source| GltfError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load_gltf_with(&data, path.parent(), assembler)
}
