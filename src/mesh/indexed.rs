use crate::math::{triangle_area, Point3, Vector3, TOLERANCE};

/// A contiguous run of triangles in [`IndexedMesh::indices`] sharing one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaterialGroup {
    /// Material slot the triangles were emitted with.
    pub material: u32,
    /// Index of the group's first triangle in `indices`.
    pub first_triangle: usize,
    /// Number of triangles in the group.
    pub triangle_count: usize,
}

impl MaterialGroup {
    /// Offset of the group's first index in the flattened index buffer.
    #[must_use]
    pub fn first_index(&self) -> usize {
        self.first_triangle * 3
    }

    /// Number of entries the group spans in the flattened index buffer.
    #[must_use]
    pub fn index_count(&self) -> usize {
        self.triangle_count * 3
    }
}

/// A finished, renderer-agnostic triangle mesh.
///
/// Produced by [`MeshBuilder::finish`](super::MeshBuilder::finish). Groups
/// cover `indices` contiguously in ascending material order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IndexedMesh {
    /// Vertex positions.
    pub positions: Vec<Point3>,
    /// Per-vertex normals, parallel to `positions` when present.
    pub normals: Option<Vec<Vector3>>,
    /// Triangle indices (each triple defines a triangle).
    pub indices: Vec<[u32; 3]>,
    /// Material groups over `indices`.
    pub groups: Vec<MaterialGroup>,
}

impl IndexedMesh {
    /// Returns the number of vertices.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Returns the number of triangles across all groups.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Returns the group for `material`, if any triangle used it.
    #[must_use]
    pub fn group(&self, material: u32) -> Option<&MaterialGroup> {
        self.groups.iter().find(|g| g.material == material)
    }

    /// Returns the triangles belonging to `group`.
    #[must_use]
    pub fn group_triangles(&self, group: &MaterialGroup) -> &[[u32; 3]] {
        &self.indices[group.first_triangle..group.first_triangle + group.triangle_count]
    }

    /// Positions flattened to `[x0, y0, z0, x1, ...]` single-precision floats.
    #[must_use]
    pub fn flat_positions(&self) -> Vec<f32> {
        flatten(self.positions.iter().map(|p| p.coords))
    }

    /// Normals flattened like [`flat_positions`](Self::flat_positions).
    #[must_use]
    pub fn flat_normals(&self) -> Option<Vec<f32>> {
        self.normals.as_ref().map(|n| flatten(n.iter().copied()))
    }

    /// Triangle indices flattened in group order.
    #[must_use]
    pub fn flat_indices(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }

    /// Returns the axis-aligned bounding box as `(min, max)`.
    #[must_use]
    pub fn bounding_box(&self) -> Option<(Point3, Point3)> {
        let first = self.positions.first()?;
        let bounds = self.positions.iter().fold((*first, *first), |(lo, hi), p| {
            (lo.inf(p), hi.sup(p))
        });
        Some(bounds)
    }

    /// Returns the total area of all triangles.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.indices
            .iter()
            .map(|&[a, b, c]| {
                triangle_area(
                    &self.positions[a as usize],
                    &self.positions[b as usize],
                    &self.positions[c as usize],
                )
            })
            .sum()
    }

    /// Returns the largest distance of any vertex from the plane through
    /// `origin` with normal `normal`.
    ///
    /// Returns `0.0` for an empty mesh or a zero-length normal.
    #[must_use]
    pub fn max_distance_from_plane(&self, origin: &Point3, normal: &Vector3) -> f64 {
        let len = normal.norm();
        if len < TOLERANCE {
            return 0.0;
        }
        let unit = normal / len;
        self.positions
            .iter()
            .map(|p| (p - origin).dot(&unit).abs())
            .fold(0.0, f64::max)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn flatten(vectors: impl Iterator<Item = Vector3>) -> Vec<f32> {
    vectors
        .flat_map(|v| [v.x as f32, v.y as f32, v.z as f32])
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square() -> IndexedMesh {
        IndexedMesh {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.5),
                Point3::new(0.0, 1.0, 0.0),
            ],
            normals: None,
            indices: vec![[0, 1, 2], [0, 2, 3]],
            groups: vec![
                MaterialGroup { material: 0, first_triangle: 0, triangle_count: 1 },
                MaterialGroup { material: 3, first_triangle: 1, triangle_count: 1 },
            ],
        }
    }

    #[test]
    fn flattened_buffers_have_expected_lengths() {
        let mesh = unit_square();
        assert_eq!(mesh.flat_positions().len(), 12);
        assert_eq!(mesh.flat_indices(), vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.flat_normals().is_none());
    }

    #[test]
    fn group_lookup_and_offsets() {
        let mesh = unit_square();
        let g = mesh.group(3).unwrap();
        assert_eq!(g.first_index(), 3);
        assert_eq!(g.index_count(), 3);
        assert_eq!(mesh.group_triangles(g), &[[0, 2, 3]]);
        assert!(mesh.group(1).is_none());
    }

    #[test]
    fn bounding_box_spans_all_vertices() {
        let (lo, hi) = unit_square().bounding_box().unwrap();
        assert_relative_eq!(lo, Point3::new(0.0, 0.0, 0.0));
        assert_relative_eq!(hi, Point3::new(1.0, 1.0, 0.5));
        assert!(IndexedMesh::default().bounding_box().is_none());
    }

    #[test]
    fn distance_from_xy_plane() {
        let d = unit_square().max_distance_from_plane(&Point3::origin(), &Vector3::z());
        assert_relative_eq!(d, 0.5);
    }

    #[test]
    fn flat_mesh_area() {
        let mut mesh = unit_square();
        mesh.positions[2].z = 0.0;
        assert_relative_eq!(mesh.surface_area(), 1.0);
    }
}
