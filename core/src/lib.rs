//! # meshprep core
//!
//! Converts scene meshes into GPU-ready primitives: attribute extraction,
//! tangent synthesis, bounds, octahedral/unorm quantization and vertex
//! cache/fetch optimization.

#[cfg(feature = "gltf")]
pub mod gltf;
pub mod math;
pub mod mesh;
pub mod profiling;
pub mod scene;

/// Core library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Start profiling (when enabled) and log the library banner.
pub fn init() {
    profiling::start();
    log::info!("meshprep core v{} initialized", VERSION);
}
