//! Scene graph types for loaded scenes.
//!
//! - [`Scene`] - Preprocessed meshes and the node list
//! - [`SceneNode`] - A node with a local transform, optional mesh and children

mod types;

pub use types::{Scene, SceneNode};
