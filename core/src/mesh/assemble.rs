//! Per-primitive preprocessing pipeline.
//!
//! For each source primitive the assembler runs, in order: index
//! validation, tangent synthesis (or source tangent normalization), bounds,
//! topology optimization and packing. Failures are contained to the
//! primitive; [`MeshAssembler::assemble_mesh`] replaces a failed primitive
//! with an empty placeholder and keeps going.

use log::{debug, warn};

use crate::{profile_function, profile_message, profile_plot, profile_scope};

use super::bounds::Bounds;
use super::data::{Mesh, Primitive, RawPrimitive, SkippedPrimitive};
use super::encoding::{degenerate_axes, pack_vertex};
use super::error::{PackWarning, PrimitiveError};
use super::optimize::{MeshoptOptimizer, TopologyOptimizer};
use super::tangent::{TangentReport, generate_tangents, normalize_tangents};

/// Options controlling the preprocessing pipeline.
///
/// # Example
///
/// ```
/// use meshprep_core::mesh::PreprocessConfig;
///
/// let config = PreprocessConfig::new()
///     .with_trust_accessor_bounds(false)
///     .with_optimize(false);
/// assert!(config.use_source_tangents);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreprocessConfig {
    /// Use min/max declared by the source instead of scanning positions.
    pub trust_accessor_bounds: bool,
    /// Use source tangents when present instead of synthesizing them.
    pub use_source_tangents: bool,
    /// Run the topology optimizer.
    pub optimize: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            trust_accessor_bounds: true,
            use_source_tangents: true,
            optimize: true,
        }
    }
}

impl PreprocessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_trust_accessor_bounds(mut self, trust: bool) -> Self {
        self.trust_accessor_bounds = trust;
        self
    }

    pub fn with_use_source_tangents(mut self, use_source: bool) -> Self {
        self.use_source_tangents = use_source;
        self
    }

    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }
}

/// Turns [`RawPrimitive`]s into packed [`Primitive`]s.
///
/// Holds no mutable state; a single assembler can be shared across threads.
pub struct MeshAssembler {
    config: PreprocessConfig,
    optimizer: Box<dyn TopologyOptimizer>,
}

impl Default for MeshAssembler {
    fn default() -> Self {
        Self::new(PreprocessConfig::default())
    }
}

impl std::fmt::Debug for MeshAssembler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MeshAssembler")
            .field("config", &self.config)
            .field("optimizer", &self.optimizer.name())
            .finish()
    }
}

impl MeshAssembler {
    /// Create an assembler using the meshoptimizer backend.
    pub fn new(config: PreprocessConfig) -> Self {
        Self {
            config,
            optimizer: Box::new(MeshoptOptimizer),
        }
    }

    /// Replace the topology optimizer.
    pub fn with_optimizer(mut self, optimizer: impl TopologyOptimizer + 'static) -> Self {
        self.optimizer = Box::new(optimizer);
        self
    }

    pub fn config(&self) -> &PreprocessConfig {
        &self.config
    }

    pub fn optimizer(&self) -> &dyn TopologyOptimizer {
        self.optimizer.as_ref()
    }

    /// Run the full pipeline on one primitive.
    pub fn assemble_primitive(&self, raw: &RawPrimitive) -> Result<Primitive, PrimitiveError> {
        profile_function!();

        if raw.indices.len() % 3 != 0 {
            return Err(PrimitiveError::IndexCountNotTriangles(raw.indices.len()));
        }
        let mut vertices = raw.vertices()?;
        let vertex_count = vertices.len();
        if let Some(&index) = raw.indices.iter().find(|&&i| i as usize >= vertex_count) {
            return Err(PrimitiveError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }

        let tangent_report = {
            profile_scope!("tangents");
            match &raw.tangents {
                Some(_) if self.config.use_source_tangents => normalize_tangents(&mut vertices),
                _ => generate_tangents(&raw.indices, &mut vertices)?,
            }
        };

        let bounds = match raw.declared_bounds {
            Some(declared) if self.config.trust_accessor_bounds => declared,
            _ => Bounds::from_positions(&raw.positions),
        };

        let (indices, vertices) = if self.config.optimize {
            profile_scope!("optimize");
            self.optimizer.optimize(&raw.indices, &vertices)
        } else {
            (raw.indices.clone(), vertices)
        };
        profile_plot!("vertices_in", vertex_count);
        profile_plot!("vertices_out", vertices.len());

        let mut negative_tex_coords = 0;
        let mut clamped_tex_coords = 0;
        let packed = {
            profile_scope!("pack");
            vertices
                .iter()
                .map(|vertex| {
                    let (packed, flags) = pack_vertex(vertex, &bounds);
                    negative_tex_coords += flags.negative as usize;
                    clamped_tex_coords += flags.clamped as usize;
                    packed
                })
                .collect::<Vec<_>>()
        };

        let warnings = collect_warnings(
            &bounds,
            tangent_report,
            negative_tex_coords,
            clamped_tex_coords,
        );
        for warning in &warnings {
            debug!("{}", warning);
        }

        debug!(
            "assembled primitive: {} -> {} vertices, {} indices, optimizer {}",
            vertex_count,
            packed.len(),
            indices.len(),
            if self.config.optimize {
                self.optimizer.name()
            } else {
                "off"
            }
        );

        let primitive = Primitive::new(indices, packed, bounds, raw.material, warnings);
        Ok(primitive.with_source_vertex_count(vertex_count))
    }

    /// Assemble every primitive of a mesh.
    ///
    /// The output has one primitive per input slot. Inputs that failed
    /// extraction, or fail assembly, become placeholders and are listed in
    /// [`Mesh::skipped`].
    pub fn assemble_mesh(
        &self,
        name: Option<String>,
        primitives: Vec<Result<RawPrimitive, PrimitiveError>>,
    ) -> Mesh {
        profile_function!();

        let mut mesh = Mesh {
            name,
            primitives: Vec::with_capacity(primitives.len()),
            skipped: Vec::new(),
        };

        for (index, source) in primitives.into_iter().enumerate() {
            let assembled = match source {
                Ok(raw) => self
                    .assemble_primitive(&raw)
                    .map_err(|error| (error, raw.material)),
                Err(error) => Err((error, None)),
            };

            match assembled {
                Ok(primitive) => mesh.primitives.push(primitive),
                Err((error, material)) => {
                    warn!(
                        "mesh {}: skipping primitive {}: {}",
                        mesh.name.as_deref().unwrap_or("<unnamed>"),
                        index,
                        error
                    );
                    profile_message!("primitive skipped");
                    mesh.primitives.push(Primitive::placeholder(material));
                    mesh.skipped.push(SkippedPrimitive { index, error });
                }
            }
        }

        mesh
    }
}

fn collect_warnings(
    bounds: &Bounds,
    tangents: TangentReport,
    negative_tex_coords: usize,
    clamped_tex_coords: usize,
) -> Vec<PackWarning> {
    let mut warnings: Vec<PackWarning> = degenerate_axes(bounds)
        .iter()
        .enumerate()
        .filter(|(_, degenerate)| **degenerate)
        .map(|(axis, _)| PackWarning::DegenerateAxis { axis })
        .collect();

    if tangents.degenerate_triangles > 0 {
        warnings.push(PackWarning::DegenerateTangentTriangles {
            triangles: tangents.degenerate_triangles,
        });
    }
    if tangents.fallback_vertices > 0 {
        warnings.push(PackWarning::FallbackTangents {
            vertices: tangents.fallback_vertices,
        });
    }
    if negative_tex_coords > 0 {
        warnings.push(PackWarning::NegativeTexCoord {
            vertices: negative_tex_coords,
        });
    }
    if clamped_tex_coords > 0 {
        warnings.push(PackWarning::TexCoordOffsetClamped {
            vertices: clamped_tex_coords,
        });
    }
    warnings
}

static_assertions::assert_impl_all!(MeshAssembler: Send, Sync);
