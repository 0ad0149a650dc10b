//! Vertex deduplication and vertex cache / fetch reordering.
//!
//! [`TopologyOptimizer`] is the seam between the assembler and whatever does
//! the reordering. [`MeshoptOptimizer`] delegates to meshoptimizer;
//! [`ReferenceOptimizer`] is a small pure-Rust implementation with
//! predictable output, useful for debugging packed data.

use std::cmp::Reverse;
use std::collections::{HashMap, VecDeque};

use super::vertex::Vertex;

/// Entries in the FIFO cache simulated by [`ReferenceOptimizer`].
const REFERENCE_CACHE_SIZE: usize = 16;

/// Remap, vertex cache and vertex fetch optimization of an indexed
/// triangle list.
///
/// Implementations must preserve the rendered triangle set: every output
/// triangle references the same vertex attributes, with the same winding,
/// as some input triangle.
pub trait TopologyOptimizer: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Merge bit-identical vertices. Returns the reindexed index buffer and
    /// the deduplicated vertex buffer. Unreferenced vertices may be dropped.
    fn remap(&self, indices: &[u32], vertices: &[Vertex]) -> (Vec<u32>, Vec<Vertex>);

    /// Reorder triangles for post-transform cache reuse.
    fn optimize_vertex_cache(&self, indices: &[u32], vertex_count: usize) -> Vec<u32>;

    /// Reorder vertices for fetch locality, rewriting `indices` in place.
    fn optimize_vertex_fetch(&self, indices: &mut [u32], vertices: &[Vertex]) -> Vec<Vertex>;

    /// Run remap, vertex cache and vertex fetch, in that order, once each.
    fn optimize(&self, indices: &[u32], vertices: &[Vertex]) -> (Vec<u32>, Vec<Vertex>) {
        let (indices, vertices) = self.remap(indices, vertices);
        let mut indices = self.optimize_vertex_cache(&indices, vertices.len());
        let vertices = self.optimize_vertex_fetch(&mut indices, &vertices);
        (indices, vertices)
    }
}

/// meshoptimizer-backed optimizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshoptOptimizer;

impl TopologyOptimizer for MeshoptOptimizer {
    fn name(&self) -> &'static str {
        "meshopt"
    }

    fn remap(&self, indices: &[u32], vertices: &[Vertex]) -> (Vec<u32>, Vec<Vertex>) {
        let (unique_count, remap) = meshopt::generate_vertex_remap(vertices, Some(indices));
        let indices = meshopt::remap_index_buffer(Some(indices), vertices.len(), &remap);
        let vertices = meshopt::remap_vertex_buffer(vertices, unique_count, &remap);
        (indices, vertices)
    }

    fn optimize_vertex_cache(&self, indices: &[u32], vertex_count: usize) -> Vec<u32> {
        meshopt::optimize_vertex_cache(indices, vertex_count)
    }

    fn optimize_vertex_fetch(&self, indices: &mut [u32], vertices: &[Vertex]) -> Vec<Vertex> {
        meshopt::optimize_vertex_fetch(indices, vertices)
    }
}

/// Pure-Rust optimizer.
///
/// Remap hashes the vertex bit pattern. The vertex cache pass simulates a
/// 16-entry FIFO cache and greedily emits the pending triangle with the most
/// cached corners, falling back to input order when no cached vertex has a
/// pending triangle. The fetch pass orders vertices by first use.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReferenceOptimizer;

impl TopologyOptimizer for ReferenceOptimizer {
    fn name(&self) -> &'static str {
        "reference"
    }

    fn remap(&self, indices: &[u32], vertices: &[Vertex]) -> (Vec<u32>, Vec<Vertex>) {
        let mut slots: HashMap<[u32; 11], u32> = HashMap::with_capacity(vertices.len());
        let mut unique = Vec::new();
        let remapped = indices
            .iter()
            .map(|&index| {
                let vertex = vertices[index as usize];
                *slots.entry(vertex.bits()).or_insert_with(|| {
                    unique.push(vertex);
                    (unique.len() - 1) as u32
                })
            })
            .collect();
        (remapped, unique)
    }

    fn optimize_vertex_cache(&self, indices: &[u32], vertex_count: usize) -> Vec<u32> {
        let triangles: Vec<&[u32]> = indices.chunks_exact(3).collect();
        let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
        for (t, triangle) in triangles.iter().enumerate() {
            for &v in *triangle {
                if let Some(list) = adjacency.get_mut(v as usize) {
                    list.push(t);
                }
            }
        }

        let mut emitted = vec![false; triangles.len()];
        let mut cache: VecDeque<u32> = VecDeque::with_capacity(REFERENCE_CACHE_SIZE + 1);
        let mut output = Vec::with_capacity(triangles.len() * 3);
        let mut next_in_order = 0;

        for _ in 0..triangles.len() {
            let cached = |t: usize| triangles[t].iter().filter(|&&v| cache.contains(&v)).count();
            let best = cache
                .iter()
                .filter_map(|&v| adjacency.get(v as usize))
                .flatten()
                .copied()
                .filter(|&t| !emitted[t])
                .max_by_key(|&t| (cached(t), Reverse(t)));
            let t = match best {
                Some(t) => t,
                None => {
                    while emitted[next_in_order] {
                        next_in_order += 1;
                    }
                    next_in_order
                }
            };

            emitted[t] = true;
            output.extend_from_slice(triangles[t]);
            for &v in triangles[t] {
                if !cache.contains(&v) {
                    cache.push_back(v);
                    if cache.len() > REFERENCE_CACHE_SIZE {
                        cache.pop_front();
                    }
                }
            }
        }
        output
    }

    fn optimize_vertex_fetch(&self, indices: &mut [u32], vertices: &[Vertex]) -> Vec<Vertex> {
        let mut order = vec![u32::MAX; vertices.len()];
        let mut fetched = Vec::with_capacity(vertices.len());
        for index in indices.iter_mut() {
            let slot = &mut order[*index as usize];
            if *slot == u32::MAX {
                *slot = fetched.len() as u32;
                fetched.push(vertices[*index as usize]);
            }
            *index = *slot;
        }
        fetched
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::generators::{generate_quad, generate_sphere};
    use rstest::rstest;
    use std::sync::Mutex;

    type Triangle = [[u32; 11]; 3];

    /// Triangles as attribute bit patterns, rotated so the smallest corner
    /// comes first (winding preserved), sorted.
    fn triangle_set(indices: &[u32], vertices: &[Vertex]) -> Vec<Triangle> {
        let mut set: Vec<Triangle> = indices
            .chunks_exact(3)
            .map(|t| {
                let mut tri = [
                    vertices[t[0] as usize].bits(),
                    vertices[t[1] as usize].bits(),
                    vertices[t[2] as usize].bits(),
                ];
                let first = (0..3).min_by_key(|&i| tri[i]).unwrap_or(0);
                tri.rotate_left(first);
                tri
            })
            .collect();
        set.sort();
        set
    }

    fn sphere() -> (Vec<u32>, Vec<Vertex>) {
        let raw = generate_sphere(1.0, 16, 8);
        let vertices = raw.vertices().unwrap();
        (raw.indices, vertices)
    }

    /// Quad as a non-indexed list: six vertices, four distinct.
    fn unrolled_quad() -> (Vec<u32>, Vec<Vertex>) {
        let raw = generate_quad(1.0, 1.0);
        let vertices = raw.vertices().unwrap();
        let unrolled: Vec<Vertex> = raw.indices.iter().map(|&i| vertices[i as usize]).collect();
        ((0..unrolled.len() as u32).collect(), unrolled)
    }

    #[rstest]
    #[case::meshopt(&MeshoptOptimizer)]
    #[case::reference(&ReferenceOptimizer)]
    fn test_optimize_preserves_triangles(#[case] optimizer: &dyn TopologyOptimizer) {
        let (indices, vertices) = sphere();
        let (out_indices, out_vertices) = optimizer.optimize(&indices, &vertices);

        assert_eq!(out_indices.len(), indices.len());
        let vertex_count = out_vertices.len();
        assert!(out_indices.iter().all(|&i| (i as usize) < vertex_count));
        assert_eq!(
            triangle_set(&out_indices, &out_vertices),
            triangle_set(&indices, &vertices)
        );
    }

    #[rstest]
    #[case::meshopt(&MeshoptOptimizer)]
    #[case::reference(&ReferenceOptimizer)]
    fn test_remap_unique_vertices(#[case] optimizer: &dyn TopologyOptimizer) {
        let (indices, vertices) = sphere();
        let (_, remapped) = optimizer.remap(&indices, &vertices);
        assert!(remapped.len() <= vertices.len());
    }

    #[rstest]
    #[case::meshopt(&MeshoptOptimizer)]
    #[case::reference(&ReferenceOptimizer)]
    fn test_remap_merges_duplicates(#[case] optimizer: &dyn TopologyOptimizer) {
        let (indices, vertices) = unrolled_quad();
        let (out_indices, out_vertices) = optimizer.optimize(&indices, &vertices);

        assert_eq!(vertices.len(), 6);
        assert_eq!(out_vertices.len(), 4);
        assert_eq!(
            triangle_set(&out_indices, &out_vertices),
            triangle_set(&indices, &vertices)
        );
    }

    #[rstest]
    #[case::meshopt(&MeshoptOptimizer)]
    #[case::reference(&ReferenceOptimizer)]
    fn test_vertex_cache_keeps_triangles(#[case] optimizer: &dyn TopologyOptimizer) {
        let (indices, vertices) = sphere();
        let reordered = optimizer.optimize_vertex_cache(&indices, vertices.len());
        assert_eq!(
            triangle_set(&reordered, &vertices),
            triangle_set(&indices, &vertices)
        );
    }

    /// Misses of a FIFO cache replaying `indices`.
    fn fifo_misses(indices: &[u32], size: usize) -> usize {
        let mut cache = VecDeque::new();
        let mut misses = 0;
        for &v in indices {
            if !cache.contains(&v) {
                misses += 1;
                cache.push_back(v);
                if cache.len() > size {
                    cache.pop_front();
                }
            }
        }
        misses
    }

    fn sorted_triangles(indices: &[u32]) -> Vec<[u32; 3]> {
        let mut set: Vec<[u32; 3]> = indices
            .chunks_exact(3)
            .map(|t| {
                let mut tri = [t[0], t[1], t[2]];
                let first = (0..3).min_by_key(|&i| tri[i]).unwrap_or(0);
                tri.rotate_left(first);
                tri
            })
            .collect();
        set.sort();
        set
    }

    #[test]
    fn test_reference_cache_reorders_scattered_grid() {
        // 16x16 quad grid, triangles emitted in a scattered order.
        let mut grid = Vec::new();
        for y in 0..16u32 {
            for x in 0..16u32 {
                let a = y * 17 + x;
                let c = a + 17;
                grid.push([a, a + 1, c + 1]);
                grid.push([a, c + 1, c]);
            }
        }
        let scattered: Vec<u32> = (0..grid.len())
            .flat_map(|k| grid[(k * 97) % grid.len()])
            .collect();

        let reordered = ReferenceOptimizer.optimize_vertex_cache(&scattered, 17 * 17);
        let before = fifo_misses(&scattered, 16);
        let after = fifo_misses(&reordered, 16);
        println!("FIFO misses: {} -> {}", before, after);

        assert_eq!(sorted_triangles(&reordered), sorted_triangles(&scattered));
        assert!(after < before);
        // Second triangle is picked for its cached corners.
        assert!(reordered[3..6].iter().any(|v| reordered[..3].contains(v)));
    }

    #[test]
    fn test_reference_fetch_orders_by_first_use() {
        let vertices: Vec<Vertex> = (0..4)
            .map(|i| Vertex {
                position: [i as f32, 0.0, 0.0],
                ..Default::default()
            })
            .collect();
        let mut indices = vec![3, 1, 2, 3, 2, 1];
        let fetched = ReferenceOptimizer.optimize_vertex_fetch(&mut indices, &vertices);

        assert_eq!(indices, vec![0, 1, 2, 0, 2, 1]);
        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[0].position[0], 3.0);
        assert_eq!(fetched[1].position[0], 1.0);
    }

    /// Records the order in which the pipeline stages run.
    #[derive(Default)]
    struct Recording {
        calls: Mutex<Vec<&'static str>>,
    }

    impl Recording {
        fn record(&self, stage: &'static str) {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(stage);
            }
        }
    }

    impl TopologyOptimizer for Recording {
        fn name(&self) -> &'static str {
            "recording"
        }

        fn remap(&self, indices: &[u32], vertices: &[Vertex]) -> (Vec<u32>, Vec<Vertex>) {
            self.record("remap");
            (indices.to_vec(), vertices.to_vec())
        }

        fn optimize_vertex_cache(&self, indices: &[u32], _vertex_count: usize) -> Vec<u32> {
            self.record("cache");
            indices.to_vec()
        }

        fn optimize_vertex_fetch(&self, _indices: &mut [u32], vertices: &[Vertex]) -> Vec<Vertex> {
            self.record("fetch");
            vertices.to_vec()
        }
    }

    #[test]
    fn test_stage_order() {
        let (indices, vertices) = unrolled_quad();
        let recording = Recording::default();
        recording.optimize(&indices, &vertices);
        assert_eq!(
            *recording.calls.lock().unwrap(),
            vec!["remap", "cache", "fetch"]
        );
    }
}
