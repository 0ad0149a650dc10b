//! Internal glTF loading logic.
//!
//! The [`LoadContext`] holds the parsed document and its resolved buffer
//! data while meshes and nodes are built.

use std::path::Path;

use log::{debug, info};

use crate::math::mat4_from_cols_array_2d;
use crate::mesh::{Mesh, MeshAssembler};
use crate::profile_scope;
use crate::scene::{Scene, SceneNode};

use super::accessor;
use super::error::GltfError;

/// Internal loading context that holds resolved data during loading.
pub(crate) struct LoadContext {
    /// The parsed glTF document.
    document: gltf_dep::Document,
    /// Resolved buffer data (one Vec<u8> per glTF buffer).
    buffers: Vec<Vec<u8>>,
}

impl LoadContext {
    pub fn new(document: gltf_dep::Document, buffers: Vec<Vec<u8>>) -> Self {
        Self { document, buffers }
    }

    /// Extract and assemble every mesh, in document order.
    ///
    /// Primitive failures are contained to their mesh; this never fails.
    pub fn load_meshes(&self, assembler: &MeshAssembler) -> Vec<Mesh> {
        profile_scope!("load_meshes");

        self.document
            .meshes()
            .map(|mesh| {
                let raw = mesh
                    .primitives()
                    .map(|primitive| accessor::extract_primitive(&primitive, &self.buffers))
                    .collect();
                let assembled = assembler.assemble_mesh(mesh.name().map(String::from), raw);
                debug!(
                    "mesh {} ({}): {} primitives, {} skipped",
                    mesh.index(),
                    mesh.name().unwrap_or("<unnamed>"),
                    assembled.primitives.len(),
                    assembled.skipped.len()
                );
                assembled
            })
            .collect()
    }

    /// All nodes in document order, children referenced by index.
    pub fn load_nodes(&self) -> Vec<SceneNode> {
        self.document
            .nodes()
            .map(|node| SceneNode {
                name: node.name().map(String::from),
                mesh: node.mesh().map(|m| m.index()),
                transform: mat4_from_cols_array_2d(&node.transform().matrix()),
                children: node.children().map(|c| c.index()).collect(),
            })
            .collect()
    }

    /// Root nodes of the default scene, or of the first scene.
    ///
    /// Documents without scenes use every node that is nobody's child.
    pub fn roots(&self) -> Vec<usize> {
        if let Some(scene) = self
            .document
            .default_scene()
            .or_else(|| self.document.scenes().next())
        {
            return scene.nodes().map(|n| n.index()).collect();
        }

        let mut is_child = vec![false; self.document.nodes().len()];
        for node in self.document.nodes() {
            for child in node.children() {
                is_child[child.index()] = true;
            }
        }
        (0..is_child.len()).filter(|&i| !is_child[i]).collect()
    }

    pub fn load_scene(&self, assembler: &MeshAssembler) -> Scene {
        let scene = Scene {
            meshes: self.load_meshes(assembler),
            nodes: self.load_nodes(),
            roots: self.roots(),
        };
        info!(
            "loaded glTF: {} meshes, {} primitives ({} skipped), {} nodes",
            scene.meshes.len(),
            scene.primitive_count(),
            scene.skipped_count(),
            scene.nodes.len()
        );
        scene
    }
}

// -- Helper functions --

/// Parse a data URI (e.g., `data:application/octet-stream;base64,...`) and
/// return the decoded bytes.
fn parse_data_uri(uri: &str) -> Option<Vec<u8>> {
    let rest = uri.strip_prefix("data:")?;
    let base64_start = rest.find(";base64,")?;
    base64_decode(&rest[base64_start + 8..])
}

/// Simple base64 decoder.
fn base64_decode(input: &str) -> Option<Vec<u8>> {
    const TABLE: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789+/";

    fn decode_char(c: u8) -> Option<u8> {
        TABLE.iter().position(|&b| b == c).map(|p| p as u8)
    }

    let input: Vec<u8> = input.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    let mut result = Vec::with_capacity(input.len() * 3 / 4);

    for chunk in input.chunks(4) {
        if chunk.len() < 2 {
            return None;
        }
        let mut buf = [0u8; 4];
        let mut pad = 4 - chunk.len();

        for (i, &byte) in chunk.iter().enumerate() {
            if byte == b'=' {
                pad += 1;
            } else {
                buf[i] = decode_char(byte)?;
            }
        }

        result.push((buf[0] << 2) | (buf[1] >> 4));
        if pad < 2 {
            result.push((buf[1] << 4) | (buf[2] >> 2));
        }
        if pad < 1 {
            result.push((buf[2] << 6) | buf[3]);
        }
    }

    Some(result)
}

/// Resolve all buffer data from the glTF document.
///
/// For binary glTF (.glb) the `BIN` buffer is the embedded blob. Data URIs
/// are decoded in place; other URIs are read relative to `base_dir`.
pub(crate) fn resolve_buffers(
    document: &gltf_dep::Document,
    mut blob: Option<Vec<u8>>,
    base_dir: Option<&Path>,
) -> Result<Vec<Vec<u8>>, GltfError> {
    let mut buffers = Vec::new();

    for buffer in document.buffers() {
        let data = match buffer.source() {
            gltf_dep::buffer::Source::Bin => blob.take().ok_or_else(|| {
                GltfError::BufferError("binary buffer referenced but no blob present".into())
            })?,
            gltf_dep::buffer::Source::Uri(uri) if uri.starts_with("data:") => parse_data_uri(uri)
                .ok_or_else(|| {
                    GltfError::BufferError(format!("buffer {}: malformed data URI", buffer.index()))
                })?,
            gltf_dep::buffer::Source::Uri(uri) => {
                let base_dir = base_dir.ok_or_else(|| {
                    GltfError::BufferError(format!(
                        "external buffer {uri} needs a base directory; use load_gltf_file"
                    ))
                })?;
                let path = base_dir.join(uri);
                std::fs::read(&path).map_err(|source| GltfError::Io { path, source })?
            }
        };

        if data.len() < buffer.length() {
            return Err(GltfError::BufferError(format!(
                "buffer {} holds {} bytes, declared {}",
                buffer.index(),
                data.len(),
                buffer.length()
            )));
        }
        buffers.push(data);
    }

    Ok(buffers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_decode() {
        let encoded = "SGVsbG8gV29ybGQ=";
        let decoded = base64_decode(encoded).unwrap();
        assert_eq!(decoded, b"Hello World");
    }

    #[test]
    fn test_base64_decode_padding() {
        assert_eq!(base64_decode("YQ==").unwrap(), b"a");
        assert_eq!(base64_decode("YWI=").unwrap(), b"ab");
        assert_eq!(base64_decode("YQ").unwrap(), b"a");
    }

    #[test]
    fn test_base64_decode_invalid() {
        assert!(base64_decode("YW*=").is_none());
        assert!(base64_decode("YWJjZ").is_none());
    }

    #[test]
    fn test_parse_data_uri() {
        let uri = "data:application/octet-stream;base64,AQID";
        let data = parse_data_uri(uri).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
    }

    #[test]
    fn test_parse_data_uri_not_data() {
        assert!(parse_data_uri("file://some/path").is_none());
        assert!(parse_data_uri("data:text/plain,hello").is_none());
    }
}
