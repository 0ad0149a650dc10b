//! Error types for glTF loading.

use std::path::PathBuf;

use thiserror::Error;

/// Resource-level failures. Any of these aborts the whole load.
///
/// Problems confined to a single primitive are reported as
/// [`PrimitiveError`](crate::mesh::PrimitiveError) on the owning mesh instead.
#[derive(Debug, Error)]
pub enum GltfError {
    /// Failed to parse or validate the glTF document.
    #[error("glTF parse error: {0}")]
    Parse(#[from] gltf_dep::Error),
    /// Failed to read the document or one of its external buffers.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A buffer could not be resolved to bytes.
    #[error("buffer error: {0}")]
    BufferError(String),
}
