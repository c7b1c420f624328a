//! Soap-film relaxation: an approximate minimal surface spanning a closed curve.
//!
//! A hexagonal fan spanning six samples of the boundary is refined
//! `refinements` times. After every refinement pass the interior vertices
//! are Laplacian-smoothed `smoothing_steps` times while border vertices stay
//! exactly on the curve. Smoothing the coarse levels first removes the
//! large-scale undulation cheaply; the finer levels then only need to settle
//! locally.

mod boundary;
mod mesh;

pub use boundary::{BoundaryCurve, Circle, ClosedPolygon, WavyRing};
pub use mesh::{EdgeMidpoints, FilmMesh, BOOTSTRAP_SAMPLES};

use tracing::debug;

use crate::error::Result;
use crate::mesh::{Generator, MeshBuilder, TriangleOptions};

/// Upper end of the interactive refinement range. Not enforced.
pub const MAX_REFINEMENTS: usize = 8;

/// Upper end of the interactive smoothing range. Not enforced.
pub const MAX_SMOOTHING_STEPS: usize = 10;

/// Iteration counts for a relaxation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilmParams {
    /// Number of four-way refinement passes.
    pub refinements: usize,
    /// Smoothing steps run after each refinement pass.
    pub smoothing_steps: usize,
}

impl Default for FilmParams {
    fn default() -> Self {
        Self {
            refinements: 4,
            smoothing_steps: 4,
        }
    }
}

impl FilmParams {
    /// Returns a copy with both counts clamped to the interactive ranges.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            refinements: self.refinements.min(MAX_REFINEMENTS),
            smoothing_steps: self.smoothing_steps.min(MAX_SMOOTHING_STEPS),
        }
    }

    /// Number of triangles the relaxed film will have.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        u32::try_from(self.refinements).map_or(usize::MAX, |r| {
            BOOTSTRAP_SAMPLES.saturating_mul(4usize.saturating_pow(r))
        })
    }
}

/// Generator for a relaxed soap film spanning `boundary`.
///
/// ```
/// use lamina::film::{FilmParams, SoapFilm, WavyRing};
/// use lamina::Generator;
///
/// let saddle = WavyRing { radius: 1.0, amplitude: 0.3, waves: 2 };
/// let film = SoapFilm::new(saddle, FilmParams { refinements: 3, smoothing_steps: 5 });
/// let mesh = film.build()?;
/// assert_eq!(mesh.triangle_count(), 6 * 4 * 4 * 4);
/// # Ok::<(), lamina::LaminaError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SoapFilm<B> {
    boundary: B,
    params: FilmParams,
    options: TriangleOptions,
}

impl<B: BoundaryCurve> SoapFilm<B> {
    /// Creates a film over `boundary` with the given iteration counts.
    #[must_use]
    pub fn new(boundary: B, params: FilmParams) -> Self {
        Self {
            boundary,
            params,
            options: TriangleOptions::default(),
        }
    }

    /// Sets the material slot and inversion of the emitted faces.
    #[must_use]
    pub fn with_options(mut self, options: TriangleOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the iteration counts.
    #[must_use]
    pub fn params(&self) -> FilmParams {
        self.params
    }

    /// Returns the boundary curve.
    #[must_use]
    pub fn boundary(&self) -> &B {
        &self.boundary
    }

    /// Runs the relaxation and returns the final working mesh.
    #[must_use]
    pub fn relax_mesh(&self) -> FilmMesh {
        let mut film = FilmMesh::bootstrap(&self.boundary);
        for pass in 1..=self.params.refinements {
            film.refine(&self.boundary);
            for _ in 0..self.params.smoothing_steps {
                film.smooth();
            }
            debug!(
                pass,
                vertices = film.positions().len(),
                triangles = film.triangles().len(),
                "soap film refinement pass"
            );
        }
        film
    }
}

impl<B: BoundaryCurve> Generator for SoapFilm<B> {
    fn generate(&self, builder: &mut MeshBuilder) -> Result<()> {
        self.relax_mesh().emit(builder, self.options)
    }
}

/// Creates a soap-film generator over `boundary`.
///
/// With zero refinements the result is the bootstrap fan regardless of
/// `smoothing_steps`.
#[must_use]
pub fn relax<B: BoundaryCurve>(boundary: B, refinements: usize, smoothing_steps: usize) -> SoapFilm<B> {
    SoapFilm::new(
        boundary,
        FilmParams {
            refinements,
            smoothing_steps,
        },
    )
}
