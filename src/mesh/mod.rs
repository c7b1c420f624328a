mod builder;
mod indexed;

pub use builder::{BuildOptions, MeshBuilder, TriangleOptions, VertexOptions};
pub use indexed::{IndexedMesh, MaterialGroup};

use crate::error::Result;

/// A routine that describes a surface by emitting into a [`MeshBuilder`].
///
/// All output happens through the builder; implementors hold only their own
/// parameters.
pub trait Generator {
    /// Emits this generator's vertices and triangles into `builder`.
    ///
    /// # Errors
    ///
    /// Returns an error if the generator's parameters are unusable or it
    /// references a vertex the builder does not hold.
    fn generate(&self, builder: &mut MeshBuilder) -> Result<()>;

    /// Runs [`generate`](Self::generate) on a fresh builder and finishes it.
    ///
    /// # Errors
    ///
    /// Propagates any error from [`generate`](Self::generate).
    fn build(&self) -> Result<IndexedMesh> {
        let mut builder = MeshBuilder::new();
        self.generate(&mut builder)?;
        Ok(builder.finish())
    }
}
