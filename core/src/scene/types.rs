//! Scene graph data types.

use crate::math::Mat4;
use crate::mesh::Mesh;

/// A node in the scene graph.
///
/// Nodes live in the flat [`Scene::nodes`] list; `children` and `mesh` are
/// indices into the owning scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneNode {
    /// Node name, if any.
    pub name: Option<String>,
    /// Index into [`Scene::meshes`], if this node carries a mesh.
    pub mesh: Option<usize>,
    /// Local transform relative to the parent, column-major.
    pub transform: Mat4,
    /// Indices into [`Scene::nodes`].
    pub children: Vec<usize>,
}

impl SceneNode {
    /// Creates a node with identity transform and no attachments.
    pub fn new() -> Self {
        Self {
            name: None,
            mesh: None,
            transform: Mat4::identity(),
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: usize) -> Self {
        self.mesh = Some(mesh);
        self
    }

    #[must_use]
    pub fn with_transform(mut self, transform: Mat4) -> Self {
        self.transform = transform;
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: Vec<usize>) -> Self {
        self.children = children;
        self
    }
}

impl Default for SceneNode {
    fn default() -> Self {
        Self::new()
    }
}

/// Preprocessed meshes plus the node hierarchy that places them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Scene {
    /// One entry per source mesh, in document order.
    pub meshes: Vec<Mesh>,
    /// All nodes, in document order.
    pub nodes: Vec<SceneNode>,
    /// Root nodes of the displayed scene.
    pub roots: Vec<usize>,
}

impl Scene {
    /// Total number of primitive slots, placeholders included.
    pub fn primitive_count(&self) -> usize {
        self.meshes.iter().map(|m| m.primitives.len()).sum()
    }

    /// Number of primitives replaced by placeholders.
    pub fn skipped_count(&self) -> usize {
        self.meshes.iter().map(|m| m.skipped.len()).sum()
    }

    /// World transform of every node reachable from [`Scene::roots`].
    ///
    /// Unreachable nodes keep the identity. Each node is visited at most
    /// once, so malformed hierarchies with shared children or cycles
    /// terminate.
    pub fn world_transforms(&self) -> Vec<Mat4> {
        let mut world = vec![Mat4::identity(); self.nodes.len()];
        let mut visited = vec![false; self.nodes.len()];
        let mut stack: Vec<(usize, Mat4)> = self
            .roots
            .iter()
            .map(|&root| (root, Mat4::identity()))
            .collect();

        while let Some((index, parent)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if std::mem::replace(&mut visited[index], true) {
                continue;
            }
            let transform = parent * node.transform;
            world[index] = transform;
            stack.extend(node.children.iter().map(|&child| (child, transform)));
        }

        world
    }

    /// `(node, mesh)` pairs for every reachable node that carries a mesh.
    pub fn mesh_instances(&self) -> Vec<(usize, usize)> {
        let mut reachable = vec![false; self.nodes.len()];
        let mut stack = self.roots.clone();
        while let Some(index) = stack.pop() {
            match reachable.get_mut(index) {
                Some(seen) if !*seen => {
                    *seen = true;
                    stack.extend(&self.nodes[index].children);
                }
                _ => {}
            }
        }

        self.nodes
            .iter()
            .enumerate()
            .filter(|(index, _)| reachable[*index])
            .filter_map(|(index, node)| node.mesh.map(|mesh| (index, mesh)))
            .collect()
    }
}
