//! Load statistics.

use meshprep_core::mesh::{Bounds, PackWarning, PackedVertex, PrimitiveError};
use meshprep_core::scene::Scene;

/// Statistics for one primitive slot.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveReport {
    pub mesh: usize,
    pub primitive: usize,
    pub source_vertices: usize,
    pub vertices: usize,
    pub indices: usize,
    pub bounds: Bounds,
    pub warnings: Vec<PackWarning>,
    /// Set when the primitive was replaced by a placeholder.
    pub skipped: Option<PrimitiveError>,
}

impl PrimitiveReport {
    /// Vertices removed by deduplication.
    pub fn vertices_merged(&self) -> usize {
        self.source_vertices.saturating_sub(self.vertices)
    }
}

/// Per-primitive statistics and totals for a loaded scene.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneReport {
    pub meshes: usize,
    pub nodes: usize,
    pub primitives: Vec<PrimitiveReport>,
}

impl SceneReport {
    pub fn new(scene: &Scene) -> Self {
        let mut primitives = Vec::with_capacity(scene.primitive_count());
        for (mesh_index, mesh) in scene.meshes.iter().enumerate() {
            for (index, primitive) in mesh.primitives.iter().enumerate() {
                let skipped = mesh.skip_reason(index).cloned();
                primitives.push(PrimitiveReport {
                    mesh: mesh_index,
                    primitive: index,
                    source_vertices: primitive.source_vertex_count(),
                    vertices: primitive.vertex_count(),
                    indices: primitive.index_count(),
                    bounds: *primitive.bounds(),
                    warnings: primitive.warnings().to_vec(),
                    skipped,
                });
            }
        }

        Self {
            meshes: scene.meshes.len(),
            nodes: scene.nodes.len(),
            primitives,
        }
    }

    pub fn total_vertices(&self) -> usize {
        self.primitives.iter().map(|p| p.vertices).sum()
    }

    pub fn total_indices(&self) -> usize {
        self.primitives.iter().map(|p| p.indices).sum()
    }

    pub fn skipped_count(&self) -> usize {
        self.primitives
            .iter()
            .filter(|p| p.skipped.is_some())
            .count()
    }

    pub fn warning_count(&self) -> usize {
        self.primitives.iter().map(|p| p.warnings.len()).sum()
    }

    /// Packed size of all vertex and index data.
    pub fn packed_bytes(&self) -> usize {
        self.total_vertices() * std::mem::size_of::<PackedVertex>()
            + self.total_indices() * std::mem::size_of::<u32>()
    }

    /// Write the report to the log.
    pub fn log(&self) {
        for p in &self.primitives {
            if let Some(error) = &p.skipped {
                log::warn!(
                    "mesh {} primitive {}: skipped: {}",
                    p.mesh,
                    p.primitive,
                    error
                );
                continue;
            }
            log::info!(
                "mesh {} primitive {}: {} -> {} vertices, {} indices, bounds offset {:?} size {:?}",
                p.mesh,
                p.primitive,
                p.source_vertices,
                p.vertices,
                p.indices,
                p.bounds.offset,
                p.bounds.size
            );
            for warning in &p.warnings {
                log::warn!("mesh {} primitive {}: {}", p.mesh, p.primitive, warning);
            }
        }

        log::info!(
            "{} meshes, {} nodes, {} primitives ({} skipped, {} warnings): {} vertices, {} indices, {} bytes packed",
            self.meshes,
            self.nodes,
            self.primitives.len(),
            self.skipped_count(),
            self.warning_count(),
            self.total_vertices(),
            self.total_indices(),
            self.packed_bytes()
        );
    }
}
