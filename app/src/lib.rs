//! # meshprep app
//!
//! Command line front end for `meshprep-core`: loads a glTF scene through
//! the preprocessing pipeline and logs what came out of it.
//!
//! - [`AppArgs`] - Parsed command line options
//! - [`App`] - Runs one load and reports it
//! - [`SceneReport`] - Per-mesh and per-primitive statistics

mod app;
mod args;
mod report;

pub use app::App;
pub use args::{AppArgs, CliOptimizer};
pub use report::{PrimitiveReport, SceneReport};

/// App library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the app subsystem.
pub fn init() {
    log::info!("meshprep app v{} initialized", VERSION);
}
