//! Command line arguments.
//!
//! Uses clap for CLI parsing with:
//! - Help text (`--help`)
//! - Validation and clear error messages
//! - Warnings for flag combinations that have no effect

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use clap::Parser;
use meshprep_core::mesh::{MeshAssembler, MeshoptOptimizer, PreprocessConfig, ReferenceOptimizer};

/// Topology optimizer selection for CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CliOptimizer {
    /// meshoptimizer: deduplication, vertex cache and vertex fetch passes.
    #[default]
    Meshopt,
    /// Deterministic in-crate implementation.
    /// Exact deduplication and a greedy FIFO-cache triangle order; useful for diffing output.
    Reference,
}

/// meshprep command line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "meshprep",
    about = "Preprocess glTF meshes into packed GPU vertex buffers",
    long_about = "Loads a .gltf or .glb scene, generates missing tangents, computes \
        per-primitive bounds, optimizes topology and packs every vertex into \
        16 bytes. Per-primitive statistics are logged; set RUST_LOG=debug for \
        per-stage output.\n\n\
        EXAMPLES:\n\
          # Default pipeline\n\
          meshprep model.glb\n\
        \n\
          # Ignore accessor min/max and source tangents\n\
          meshprep model.gltf --compute-bounds --generate-tangents\n\
        \n\
          # Deterministic output without meshoptimizer\n\
          meshprep model.glb --optimizer reference",
    version
)]
struct ClapArgs {
    /// Path to a .gltf or .glb file.
    path: PathBuf,

    /// Compute bounds from positions instead of trusting POSITION min/max.
    #[arg(long)]
    compute_bounds: bool,

    /// Generate tangents even when the file provides TANGENT.
    #[arg(long)]
    generate_tangents: bool,

    /// Skip deduplication and cache/fetch optimization.
    #[arg(long)]
    no_optimize: bool,

    /// Topology optimizer to use.
    #[arg(long, default_value = "meshopt", value_enum)]
    optimizer: CliOptimizer,
}

/// Parsed command line options.
#[derive(Debug, Clone)]
pub struct AppArgs {
    path: PathBuf,
    config: PreprocessConfig,
    optimizer: CliOptimizer,
}

impl AppArgs {
    /// Parse the process arguments, exiting with usage on error.
    pub fn parse() -> Self {
        ClapArgs::parse().into()
    }

    /// Parse from an explicit argument list.
    pub fn try_parse_from<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        ClapArgs::try_parse_from(args).map(Into::into)
    }

    /// Options for a file with the default pipeline.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: PreprocessConfig::default(),
            optimizer: CliOptimizer::default(),
        }
    }

    pub fn with_config(mut self, config: PreprocessConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_optimizer(mut self, optimizer: CliOptimizer) -> Self {
        self.optimizer = optimizer;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    pub fn optimizer(&self) -> CliOptimizer {
        self.optimizer
    }

    /// Build the assembler these options describe.
    pub fn assembler(&self) -> MeshAssembler {
        let assembler = MeshAssembler::new(self.config);
        match self.optimizer {
            CliOptimizer::Meshopt => assembler.with_optimizer(MeshoptOptimizer),
            CliOptimizer::Reference => assembler.with_optimizer(ReferenceOptimizer),
        }
    }
}

impl From<ClapArgs> for AppArgs {
    fn from(args: ClapArgs) -> Self {
        if args.no_optimize && args.optimizer != CliOptimizer::default() {
            log::warn!(
                "--optimizer {:?} has no effect with --no-optimize",
                args.optimizer
            );
        }

        let config = PreprocessConfig::new()
            .with_trust_accessor_bounds(!args.compute_bounds)
            .with_use_source_tangents(!args.generate_tangents)
            .with_optimize(!args.no_optimize);

        Self {
            path: args.path,
            config,
            optimizer: args.optimizer,
        }
    }
}
