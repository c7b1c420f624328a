use std::collections::BTreeMap;

use tracing::warn;

use crate::error::{BuildError, Result};
use crate::math::{face_normal, Point3, Vector3, TOLERANCE};

use super::{IndexedMesh, MaterialGroup};

/// Options controlling how [`MeshBuilder::finish`] resolves normals.
#[derive(Debug, Clone, Copy)]
pub struct BuildOptions {
    /// Compute area-weighted vertex normals when explicit normals were not
    /// supplied for every vertex. When `false`, such meshes carry no normals.
    pub compute_normals: bool,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            compute_normals: true,
        }
    }
}

/// Per-vertex options for [`MeshBuilder::add_vertex`].
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexOptions {
    /// Explicit vertex normal.
    pub normal: Option<Vector3>,
}

impl VertexOptions {
    /// Options carrying an explicit normal.
    #[must_use]
    pub fn with_normal(normal: Vector3) -> Self {
        Self {
            normal: Some(normal),
        }
    }
}

/// Per-face options for [`MeshBuilder::add_triangle`] and
/// [`MeshBuilder::add_quadrangle`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TriangleOptions {
    /// Material slot the face is grouped under.
    pub material: u32,
    /// Reverse the vertex order before storing, flipping the front side.
    pub invert: bool,
}

impl TriangleOptions {
    /// Options for material slot `material`, not inverted.
    #[must_use]
    pub fn material(material: u32) -> Self {
        Self {
            material,
            invert: false,
        }
    }

    /// Returns a copy with `invert` set.
    #[must_use]
    pub fn inverted(self) -> Self {
        Self {
            invert: true,
            ..self
        }
    }
}

/// Whether vertices so far have been given explicit normals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NormalSupply {
    Empty,
    Explicit,
    Absent,
    Mixed,
}

/// Accumulates vertices and material-grouped triangles for one mesh.
///
/// Vertices are addressed only by the index [`add_vertex`](Self::add_vertex)
/// returns. A builder is single-use: [`finish`](Self::finish) consumes it.
#[derive(Debug)]
pub struct MeshBuilder {
    options: BuildOptions,
    positions: Vec<Point3>,
    normals: Vec<Option<Vector3>>,
    supply: NormalSupply,
    groups: BTreeMap<u32, Vec<[u32; 3]>>,
}

impl Default for MeshBuilder {
    fn default() -> Self {
        Self::with_options(BuildOptions::default())
    }
}

impl MeshBuilder {
    /// Creates an empty builder with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty builder with the given options.
    #[must_use]
    pub fn with_options(options: BuildOptions) -> Self {
        Self {
            options,
            positions: Vec::new(),
            normals: Vec::new(),
            supply: NormalSupply::Empty,
            groups: BTreeMap::new(),
        }
    }

    /// Appends a vertex and returns its index.
    ///
    /// Supplying a normal for some vertices but not others is tolerated with
    /// a warning; the finished mesh then uses computed normals.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add_vertex(&mut self, position: Point3, options: VertexOptions) -> u32 {
        let has_normal = options.normal.is_some();
        self.supply = match (self.supply, has_normal) {
            (NormalSupply::Empty, true) => NormalSupply::Explicit,
            (NormalSupply::Empty, false) => NormalSupply::Absent,
            (NormalSupply::Explicit, false) | (NormalSupply::Absent, true) => {
                warn!(
                    vertex = self.positions.len(),
                    "inconsistent normal supply; falling back to computed normals"
                );
                NormalSupply::Mixed
            }
            (supply, _) => supply,
        };

        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(options.normal);
        index
    }

    /// Returns the position of a previously added vertex.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::VertexOutOfRange`] if `index` was never returned
    /// by [`add_vertex`](Self::add_vertex).
    pub fn vertex_position(&self, index: u32) -> Result<Point3> {
        self.check_index(index)?;
        Ok(self.positions[index as usize])
    }

    /// Returns the explicit normal of a previously added vertex, if one was given.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::VertexOutOfRange`] if `index` was never returned
    /// by [`add_vertex`](Self::add_vertex).
    pub fn vertex_normal(&self, index: u32) -> Result<Option<Vector3>> {
        self.check_index(index)?;
        Ok(self.normals[index as usize])
    }

    /// Appends triangle `(a, b, c)` to the options' material slot.
    ///
    /// With `invert` set the triangle is stored as `(c, b, a)`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::VertexOutOfRange`] if any index is unknown; nothing
    /// is appended in that case.
    pub fn add_triangle(&mut self, a: u32, b: u32, c: u32, options: TriangleOptions) -> Result<()> {
        for index in [a, b, c] {
            self.check_index(index)?;
        }
        self.push_triangle(a, b, c, options);
        Ok(())
    }

    /// Appends quadrangle `(a, b, c, d)` as triangles `(a, b, c)` and `(a, c, d)`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::VertexOutOfRange`] if any index is unknown; nothing
    /// is appended in that case.
    pub fn add_quadrangle(
        &mut self,
        a: u32,
        b: u32,
        c: u32,
        d: u32,
        options: TriangleOptions,
    ) -> Result<()> {
        for index in [a, b, c, d] {
            self.check_index(index)?;
        }
        self.push_triangle(a, b, c, options);
        self.push_triangle(a, c, d, options);
        Ok(())
    }

    /// Returns the triangles emitted so far into `material`.
    #[must_use]
    pub fn triangles(&self, material: u32) -> &[[u32; 3]] {
        self.groups
            .get(&material)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Returns the number of vertices added so far.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles added so far across all materials.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Finalizes the builder into an [`IndexedMesh`].
    ///
    /// Material groups are laid out in ascending slot order. Normals are the
    /// explicit ones if every vertex supplied one, otherwise (unless disabled
    /// by [`BuildOptions::compute_normals`]) the normalized sum of the
    /// adjacent faces' area-weighted normals. Vertices without a usable
    /// normal get the zero vector.
    ///
    /// The builder is consumed, so it cannot be finished twice:
    ///
    /// ```compile_fail
    /// use lamina::MeshBuilder;
    ///
    /// let builder = MeshBuilder::new();
    /// let first = builder.finish();
    /// let second = builder.finish();
    /// ```
    #[must_use]
    pub fn finish(self) -> IndexedMesh {
        let mut indices = Vec::with_capacity(self.triangle_count());
        let mut groups = Vec::with_capacity(self.groups.len());
        for (material, triangles) in self.groups {
            groups.push(MaterialGroup {
                material,
                first_triangle: indices.len(),
                triangle_count: triangles.len(),
            });
            indices.extend(triangles);
        }

        let normals = if self.supply == NormalSupply::Explicit {
            Some(self.normals.into_iter().flatten().collect())
        } else if self.options.compute_normals {
            Some(compute_vertex_normals(&self.positions, &indices))
        } else {
            None
        };

        IndexedMesh {
            positions: self.positions,
            normals,
            indices,
            groups,
        }
    }

    fn check_index(&self, index: u32) -> std::result::Result<(), BuildError> {
        if (index as usize) < self.positions.len() {
            Ok(())
        } else {
            Err(BuildError::VertexOutOfRange {
                index,
                count: self.positions.len(),
            })
        }
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32, options: TriangleOptions) {
        let triangle = if options.invert { [c, b, a] } else { [a, b, c] };
        self.groups.entry(options.material).or_default().push(triangle);
    }
}

/// Averages adjacent face normals per vertex, weighted by face area.
fn compute_vertex_normals(positions: &[Point3], indices: &[[u32; 3]]) -> Vec<Vector3> {
    let mut sums = vec![Vector3::zeros(); positions.len()];
    for &[a, b, c] in indices {
        let n = face_normal(
            &positions[a as usize],
            &positions[b as usize],
            &positions[c as usize],
        );
        sums[a as usize] += n;
        sums[b as usize] += n;
        sums[c as usize] += n;
    }

    let mut degenerate = 0usize;
    let normals = sums
        .into_iter()
        .map(|sum| {
            sum.try_normalize(TOLERANCE).unwrap_or_else(|| {
                degenerate += 1;
                Vector3::zeros()
            })
        })
        .collect();
    if degenerate > 0 {
        warn!(degenerate, "vertices without adjacent faces keep a zero normal");
    }
    normals
}
