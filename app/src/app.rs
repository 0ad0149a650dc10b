//! Application entry point.

use std::process::ExitCode;

use meshprep_core::gltf::{GltfError, load_gltf_file_with};
use meshprep_core::scene::Scene;

use crate::args::AppArgs;
use crate::report::SceneReport;

/// Runs one preprocessing pass over a glTF file.
pub struct App {
    args: AppArgs,
}

impl App {
    pub fn new(args: AppArgs) -> Self {
        Self { args }
    }

    /// Initialize logging, load the file and report it.
    ///
    /// Exits with failure when the file itself cannot be loaded. Skipped
    /// primitives are reported but do not fail the run.
    pub fn run(args: AppArgs) -> ExitCode {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

        meshprep_core::init();
        crate::init();

        let app = Self::new(args);
        match app.load() {
            Ok(scene) => {
                SceneReport::new(&scene).log();
                ExitCode::SUCCESS
            }
            Err(e) => {
                log::error!("{}", e);
                ExitCode::FAILURE
            }
        }
    }

    /// Load the scene with the configured pipeline.
    pub fn load(&self) -> Result<Scene, GltfError> {
        let assembler = self.args.assembler();
        log::info!(
            "Loading {} ({:?}, optimizer: {})",
            self.args.path().display(),
            assembler.config(),
            assembler.optimizer().name()
        );
        load_gltf_file_with(self.args.path(), &assembler)
    }
}
