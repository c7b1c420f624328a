use crate::error::Result;
use crate::mesh::{MeshBuilder, TriangleOptions};

/// Walks the triangular lattice of a triangle subdivided `n` times per side.
///
/// Lattice points are named by integer barycentric indices `[i, j, k]` with
/// `i + j + k = n`; the corners are `[n, 0, 0]`, `[0, n, 0]` and `[0, 0, n]`.
/// Row `r` (for `r` in `0..=n`) holds the points `[n - r, r - c, c]` for `c` in
/// `0..=r`. Every emitted triangle has the winding of the corner triangle, and
/// `n * n` triangles are produced in total.
#[derive(Debug, Clone, Copy)]
pub struct TriangleLattice {
    subdivisions: usize,
    options: TriangleOptions,
}

impl TriangleLattice {
    /// Creates a lattice with `subdivisions` segments per side.
    #[must_use]
    pub fn new(subdivisions: usize) -> Self {
        Self {
            subdivisions,
            options: TriangleOptions::default(),
        }
    }

    /// Sets the material slot and inversion used for every triangle.
    #[must_use]
    pub fn with_options(mut self, options: TriangleOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the number of segments per side.
    #[must_use]
    pub fn subdivisions(&self) -> usize {
        self.subdivisions
    }

    /// Visits every lattice point once, row by row, and triangulates between rows.
    ///
    /// `vertex` receives the builder and the point's `[i, j, k]` indices and
    /// returns the vertex index to use for that point. With zero subdivisions
    /// nothing is visited or emitted.
    ///
    /// # Errors
    ///
    /// Propagates errors from `vertex` and from the builder.
    pub fn emit(
        &self,
        builder: &mut MeshBuilder,
        mut vertex: impl FnMut(&mut MeshBuilder, [usize; 3]) -> Result<u32>,
    ) -> Result<()> {
        let n = self.subdivisions;
        if n == 0 {
            return Ok(());
        }

        let mut prev: Vec<u32> = Vec::with_capacity(n + 1);
        let mut cur: Vec<u32> = Vec::with_capacity(n + 1);

        for r in 0..=n {
            cur.clear();
            for c in 0..=r {
                cur.push(vertex(builder, [n - r, r - c, c])?);
            }
            for c in 0..r {
                builder.add_triangle(prev[c], cur[c], cur[c + 1], self.options)?;
                if c + 1 < r {
                    builder.add_triangle(prev[c], cur[c + 1], prev[c + 1], self.options)?;
                }
            }
            std::mem::swap(&mut prev, &mut cur);
        }

        Ok(())
    }
}
