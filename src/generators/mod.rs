//! Surface generators and the grid/lattice helpers they are built from.

mod grid;
mod lattice;
mod parametric;
mod spherical;

pub use grid::QuadGrid;
pub use lattice::TriangleLattice;
pub use parametric::ParametricSurface;
pub use spherical::SphericalTriangle;

use crate::math::{Point3, Vector3};
use crate::mesh::VertexOptions;

/// A vertex produced by a grid mapping function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridVertex {
    /// Vertex position.
    pub position: Point3,
    /// Explicit normal, if the mapping knows it.
    pub normal: Option<Vector3>,
}

impl GridVertex {
    /// A vertex whose normal is left to the builder.
    #[must_use]
    pub fn new(position: Point3) -> Self {
        Self {
            position,
            normal: None,
        }
    }

    /// A vertex with an explicit normal.
    #[must_use]
    pub fn with_normal(position: Point3, normal: Vector3) -> Self {
        Self {
            position,
            normal: Some(normal),
        }
    }

    fn options(&self) -> VertexOptions {
        VertexOptions {
            normal: self.normal,
        }
    }
}
