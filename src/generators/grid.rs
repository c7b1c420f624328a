use crate::error::Result;
use crate::mesh::{MeshBuilder, TriangleOptions};

use super::GridVertex;

/// Quadrangulates a rectangular grid of parameter values.
///
/// For coordinate sequences of lengths `m` and `n`, emits `m * n` vertices in
/// row-major order (outer `us`, inner `vs`) and `(m - 1) * (n - 1)`
/// quadrangles. Each quad is wound so that `∂p/∂u × ∂p/∂v` of the mapping
/// is its front side.
#[derive(Debug, Clone, Copy)]
pub struct QuadGrid<'a> {
    us: &'a [f64],
    vs: &'a [f64],
    options: TriangleOptions,
}

impl<'a> QuadGrid<'a> {
    /// Creates a grid over `us × vs`, emitting into material slot 0.
    #[must_use]
    pub fn new(us: &'a [f64], vs: &'a [f64]) -> Self {
        Self {
            us,
            vs,
            options: TriangleOptions::default(),
        }
    }

    /// Sets the material slot and inversion used for every quad.
    #[must_use]
    pub fn with_options(mut self, options: TriangleOptions) -> Self {
        self.options = options;
        self
    }

    /// Walks the grid, mapping each `(u, v)` to a vertex through `map`.
    ///
    /// # Errors
    ///
    /// Propagates builder errors; none occur for a fresh or consistent builder.
    pub fn emit(
        &self,
        builder: &mut MeshBuilder,
        mut map: impl FnMut(f64, f64) -> GridVertex,
    ) -> Result<()> {
        let mut prev: Vec<u32> = Vec::with_capacity(self.vs.len());
        let mut cur: Vec<u32> = Vec::with_capacity(self.vs.len());

        for (i, &u) in self.us.iter().enumerate() {
            cur.clear();
            for (j, &v) in self.vs.iter().enumerate() {
                let vertex = map(u, v);
                let index = builder.add_vertex(vertex.position, vertex.options());
                if i > 0 && j > 0 {
                    builder.add_quadrangle(prev[j - 1], cur[j - 1], index, prev[j], self.options)?;
                }
                cur.push(index);
            }
            std::mem::swap(&mut prev, &mut cur);
        }

        Ok(())
    }
}
