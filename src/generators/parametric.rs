use crate::error::{GeneratorError, Result};
use crate::mesh::{Generator, MeshBuilder, TriangleOptions};

use super::{GridVertex, QuadGrid};

/// A surface given by a mapping `(u, v) -> vertex`, sampled on a uniform grid.
///
/// ```
/// use lamina::generators::{GridVertex, ParametricSurface};
/// use lamina::math::Point3;
/// use lamina::Generator;
///
/// let sheet = ParametricSurface::new(
///     |u, v| GridVertex::new(Point3::new(u, v, 0.0)),
///     (0.0, 1.0),
///     (0.0, 1.0),
///     4,
///     3,
/// );
/// let mesh = sheet.build()?;
/// assert_eq!(mesh.triangle_count(), 24);
/// # Ok::<(), lamina::LaminaError>(())
/// ```
pub struct ParametricSurface<F> {
    map: F,
    u_range: (f64, f64),
    v_range: (f64, f64),
    u_cells: usize,
    v_cells: usize,
    options: TriangleOptions,
}

impl<F> ParametricSurface<F>
where
    F: Fn(f64, f64) -> GridVertex,
{
    /// Creates a surface over `u_range × v_range` split into
    /// `u_cells × v_cells` quads.
    #[must_use]
    pub fn new(
        map: F,
        u_range: (f64, f64),
        v_range: (f64, f64),
        u_cells: usize,
        v_cells: usize,
    ) -> Self {
        Self {
            map,
            u_range,
            v_range,
            u_cells,
            v_cells,
            options: TriangleOptions::default(),
        }
    }

    /// Sets the material slot and inversion of the emitted faces.
    #[must_use]
    pub fn with_options(mut self, options: TriangleOptions) -> Self {
        self.options = options;
        self
    }
}

impl<F> Generator for ParametricSurface<F>
where
    F: Fn(f64, f64) -> GridVertex,
{
    fn generate(&self, builder: &mut MeshBuilder) -> Result<()> {
        if self.u_cells == 0 || self.v_cells == 0 {
            return Err(GeneratorError::InvalidParameters(format!(
                "parametric surface needs at least one cell per direction, got {}x{}",
                self.u_cells, self.v_cells
            ))
            .into());
        }

        let us = uniform_samples(self.u_range, self.u_cells);
        let vs = uniform_samples(self.v_range, self.v_cells);
        QuadGrid::new(&us, &vs)
            .with_options(self.options)
            .emit(builder, |u, v| (self.map)(u, v))
    }
}

/// Returns `cells + 1` evenly spaced values covering `range`, endpoints exact.
#[allow(clippy::cast_precision_loss)]
fn uniform_samples((start, end): (f64, f64), cells: usize) -> Vec<f64> {
    (0..=cells)
        .map(|i| {
            if i == cells {
                end
            } else {
                start + (end - start) * i as f64 / cells as f64
            }
        })
        .collect()
}
