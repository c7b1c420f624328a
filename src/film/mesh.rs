use std::collections::HashMap;

use crate::error::Result;
use crate::math::{centroid, Point3, Vector3};
use crate::mesh::{MeshBuilder, TriangleOptions, VertexOptions};

use super::BoundaryCurve;

/// Number of boundary samples in the initial fan.
pub const BOOTSTRAP_SAMPLES: usize = 6;

/// Midpoint vertices created during one refinement pass, keyed by edge.
///
/// Keys are unordered vertex pairs stored smaller index first, so the two
/// triangles sharing an edge resolve to the same midpoint.
#[derive(Debug, Default)]
pub struct EdgeMidpoints {
    midpoints: HashMap<(u32, u32), u32>,
}

impl EdgeMidpoints {
    /// Returns the midpoint recorded for edge `(a, b)` in either direction.
    #[must_use]
    pub fn get(&self, a: u32, b: u32) -> Option<u32> {
        self.midpoints.get(&edge_key(a, b)).copied()
    }

    /// Returns the midpoint of `(a, b)`, calling `create` only on first sight.
    pub fn get_or_insert_with(&mut self, a: u32, b: u32, create: impl FnOnce() -> u32) -> u32 {
        *self.midpoints.entry(edge_key(a, b)).or_insert_with(create)
    }

    /// Returns the number of distinct edges seen.
    #[must_use]
    pub fn len(&self) -> usize {
        self.midpoints.len()
    }

    /// Returns `true` if no edge has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.midpoints.is_empty()
    }
}

const fn edge_key(a: u32, b: u32) -> (u32, u32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Average of two boundary parameters along the shorter arc between them,
/// wrapped into `[0, 1)`.
fn arc_midpoint(a: f64, b: f64) -> f64 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    let mid = if hi - lo > 0.5 {
        (lo + 1.0 + hi) * 0.5
    } else {
        (lo + hi) * 0.5
    };
    if mid >= 1.0 {
        mid - 1.0
    } else {
        mid
    }
}

/// The mutable working mesh of a soap-film relaxation.
///
/// Border vertices carry their boundary parameter and sit exactly on the
/// boundary curve; interior vertices are free. Vertices are only ever
/// appended, so indices stay valid across passes.
#[derive(Debug, Clone, PartialEq)]
pub struct FilmMesh {
    positions: Vec<Point3>,
    triangles: Vec<[u32; 3]>,
    border: Vec<Option<f64>>,
}

impl FilmMesh {
    /// Builds the initial fan: six border samples at parameters `k / 6`
    /// around their centroid, which is vertex `6`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    pub fn bootstrap<B: BoundaryCurve + ?Sized>(boundary: &B) -> Self {
        let mut border: Vec<Option<f64>> = (0..BOOTSTRAP_SAMPLES)
            .map(|k| Some(k as f64 / BOOTSTRAP_SAMPLES as f64))
            .collect();
        let mut positions: Vec<Point3> = border
            .iter()
            .flatten()
            .map(|&t| boundary.evaluate(t))
            .collect();

        let center = centroid(&positions).unwrap_or_else(Point3::origin);
        let hub = positions.len() as u32;
        positions.push(center);
        border.push(None);

        let ring = BOOTSTRAP_SAMPLES as u32;
        let triangles = (0..ring).map(|k| [hub, k, (k + 1) % ring]).collect();

        Self {
            positions,
            triangles,
            border,
        }
    }

    /// Splits every triangle into four through its edge midpoints.
    ///
    /// Midpoints of border–border edges are evaluated on `boundary` at the
    /// shorter-arc parameter average; all others are straight midpoints. The
    /// centre triangle takes the split triangle's slot and the three corner triangles
    /// are appended, so the triangle count grows exactly fourfold.
    pub fn refine<B: BoundaryCurve + ?Sized>(&mut self, boundary: &B) {
        let mut midpoints = EdgeMidpoints::default();
        let count = self.triangles.len();
        self.triangles.reserve(count * 3);

        for t in 0..count {
            let [a, b, c] = self.triangles[t];
            let ab = midpoints.get_or_insert_with(a, b, || self.push_midpoint(boundary, a, b));
            let bc = midpoints.get_or_insert_with(b, c, || self.push_midpoint(boundary, b, c));
            let ca = midpoints.get_or_insert_with(c, a, || self.push_midpoint(boundary, c, a));

            self.triangles[t] = [ab, bc, ca];
            self.triangles.push([a, ab, ca]);
            self.triangles.push([b, bc, ab]);
            self.triangles.push([c, ca, bc]);
        }
    }

    /// Moves every interior vertex to the mean of its edge neighbours.
    ///
    /// Neighbours are gathered by scanning all triangles, so a vertex sees
    /// each neighbour once per shared triangle. All means are computed from
    /// the positions before the step. Border vertices do not move.
    pub fn smooth(&mut self) {
        let mut sums = vec![Vector3::zeros(); self.positions.len()];
        let mut counts = vec![0u32; self.positions.len()];

        for &[a, b, c] in &self.triangles {
            for (from, to) in [(a, b), (b, c), (c, a)] {
                let (from, to) = (from as usize, to as usize);
                sums[from] += self.positions[to].coords;
                sums[to] += self.positions[from].coords;
                counts[from] += 1;
                counts[to] += 1;
            }
        }

        for (i, position) in self.positions.iter_mut().enumerate() {
            if self.border[i].is_none() && counts[i] > 0 {
                *position = Point3::from(sums[i] / f64::from(counts[i]));
            }
        }
    }

    /// Vertex positions in index order.
    #[must_use]
    pub fn positions(&self) -> &[Point3] {
        &self.positions
    }

    /// Triangles as vertex-index triples.
    #[must_use]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// Returns the boundary parameter of vertex `index`, or `None` for
    /// interior (or unknown) vertices.
    #[must_use]
    pub fn border_parameter(&self, index: usize) -> Option<f64> {
        self.border.get(index).copied().flatten()
    }

    /// Iterates `(index, parameter)` over the border vertices.
    pub fn border_vertices(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.border
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.map(|t| (i, t)))
    }

    /// Replays the mesh into `builder`, one vertex per position in order and
    /// one triangle per face. Indices are offset by the builder's existing
    /// vertex count.
    ///
    /// # Errors
    ///
    /// Propagates builder errors; none occur for a well-formed film.
    #[allow(clippy::cast_possible_truncation)]
    pub fn emit(&self, builder: &mut MeshBuilder, options: TriangleOptions) -> Result<()> {
        let base = builder.vertex_count() as u32;
        for position in &self.positions {
            builder.add_vertex(*position, VertexOptions::default());
        }
        for &[a, b, c] in &self.triangles {
            builder.add_triangle(base + a, base + b, base + c, options)?;
        }
        Ok(())
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push_midpoint<B: BoundaryCurve + ?Sized>(&mut self, boundary: &B, a: u32, b: u32) -> u32 {
        let (a, b) = (a as usize, b as usize);
        let (position, parameter) = match (self.border[a], self.border[b]) {
            (Some(ta), Some(tb)) => {
                let t = arc_midpoint(ta, tb);
                (boundary.evaluate(t), Some(t))
            }
            _ => (nalgebra::center(&self.positions[a], &self.positions[b]), None),
        };
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.border.push(parameter);
        index
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::film::{Circle, ClosedPolygon, WavyRing};
    use approx::assert_relative_eq;

    /// Counts how many triangles use each undirected edge.
    fn edge_usage(mesh: &FilmMesh) -> HashMap<(u32, u32), usize> {
        let mut usage = HashMap::new();
        for &[a, b, c] in mesh.triangles() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *usage.entry(edge_key(u, v)).or_insert(0) += 1;
            }
        }
        usage
    }

    fn assert_border_pinned<B: BoundaryCurve>(mesh: &FilmMesh, boundary: &B) {
        for (i, t) in mesh.border_vertices() {
            assert_eq!(mesh.positions()[i], boundary.evaluate(t), "border vertex {i} drifted");
        }
    }

    #[test]
    fn edge_key_is_order_independent() {
        let mut cache = EdgeMidpoints::default();
        let first = cache.get_or_insert_with(7, 3, || 10);
        let second = cache.get_or_insert_with(3, 7, || 11);
        assert_eq!(first, 10);
        assert_eq!(second, 10);
        assert_eq!(cache.get(7, 3), Some(10));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn arc_midpoint_takes_shorter_arc() {
        assert_relative_eq!(arc_midpoint(0.0, 1.0 / 6.0), 1.0 / 12.0);
        assert_relative_eq!(arc_midpoint(5.0 / 6.0, 0.0), 11.0 / 12.0);
        assert_relative_eq!(arc_midpoint(0.0, 5.0 / 6.0), 11.0 / 12.0);
        assert_relative_eq!(arc_midpoint(0.9, 0.2), 0.05, epsilon = 1e-12);
        assert_eq!(arc_midpoint(0.3, 0.1), arc_midpoint(0.1, 0.3));
    }

    #[test]
    fn bootstrap_is_hexagonal_fan() {
        let mesh = FilmMesh::bootstrap(&Circle::unit());
        assert_eq!(mesh.positions().len(), 7);
        assert_eq!(mesh.triangles().len(), 6);
        assert_eq!(mesh.border_vertices().count(), 6);
        assert_eq!(mesh.border_parameter(6), None);
        assert_eq!(mesh.triangles()[5], [6, 5, 0]);
        assert_relative_eq!(mesh.positions()[6], Point3::origin(), epsilon = 1e-12);
    }

    #[test]
    fn one_pass_on_fan_gives_24_triangles_19_vertices() {
        let circle = Circle::unit();
        let mut mesh = FilmMesh::bootstrap(&circle);
        mesh.refine(&circle);
        assert_eq!(mesh.triangles().len(), 24);
        assert_eq!(mesh.positions().len(), 19);
        assert_eq!(mesh.border_vertices().count(), 12);
    }

    #[test]
    fn refinement_multiplies_triangles_by_four() {
        let circle = Circle::unit();
        let mut mesh = FilmMesh::bootstrap(&circle);
        for _ in 0..4 {
            let before = mesh.triangles().len();
            mesh.refine(&circle);
            assert_eq!(mesh.triangles().len(), before * 4);
        }
    }

    #[test]
    fn shared_edges_get_one_midpoint() {
        let circle = Circle::unit();
        let mut mesh = FilmMesh::bootstrap(&circle);
        for pass in 1..=3u32 {
            mesh.refine(&circle);
            let usage = edge_usage(&mesh);
            let open = usage.values().filter(|&&n| n == 1).count();
            assert!(usage.values().all(|&n| n <= 2));
            // a duplicated midpoint would tear an interior edge open
            assert_eq!(open, 6 * 2usize.pow(pass));
            // disk: V - E + F = 1
            let (v, e, f) = (mesh.positions().len(), usage.len(), mesh.triangles().len());
            assert_eq!(v + f, e + 1);
        }
    }

    #[test]
    fn border_midpoints_lie_on_curve_not_chord() {
        let circle = Circle::unit();
        let mut mesh = FilmMesh::bootstrap(&circle);
        mesh.refine(&circle);
        for (i, _) in mesh.border_vertices() {
            assert_relative_eq!(mesh.positions()[i].coords.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn border_stays_pinned_through_refine_and_smooth() {
        let ring = WavyRing {
            radius: 1.0,
            amplitude: 0.4,
            waves: 3,
        };
        let mut mesh = FilmMesh::bootstrap(&ring);
        assert_border_pinned(&mesh, &ring);
        for _ in 0..3 {
            mesh.refine(&ring);
            assert_border_pinned(&mesh, &ring);
            for _ in 0..4 {
                mesh.smooth();
                assert_border_pinned(&mesh, &ring);
            }
        }
    }

    #[test]
    fn hexagon_centroid_is_a_fixed_point() {
        let hexagon = ClosedPolygon::regular(6, 1.5).unwrap();
        let mut mesh = FilmMesh::bootstrap(&hexagon);
        let before = mesh.positions()[6];
        mesh.smooth();
        assert_relative_eq!(mesh.positions()[6], before, epsilon = 1e-12);
    }

    #[test]
    fn smoothing_reads_previous_positions() {
        // A path 0 - 1 - 2 - 3 with only 0 and 3 pinned: Jacobi moves 1 and 2
        // using each other's old positions.
        let mut mesh = FilmMesh {
            positions: vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 3.0, 0.0),
                Point3::new(2.0, -3.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
            ],
            triangles: vec![[0, 1, 2], [1, 3, 2]],
            border: vec![Some(0.0), None, None, Some(0.5)],
        };
        mesh.smooth();
        // vertex 1 neighbours: 0, 2 (tri 0) and 3, 2 (tri 1)
        let expected_1 = Point3::new((0.0 + 2.0 + 3.0 + 2.0) / 4.0, (0.0 - 3.0 + 0.0 - 3.0) / 4.0, 0.0);
        // vertex 2 neighbours: 1, 0 (tri 0) and 3, 1 (tri 1)
        let expected_2 = Point3::new((1.0 + 0.0 + 1.0 + 3.0) / 4.0, (3.0 + 0.0 + 3.0 + 0.0) / 4.0, 0.0);
        assert_relative_eq!(mesh.positions()[1], expected_1);
        assert_relative_eq!(mesh.positions()[2], expected_2);
        assert_eq!(mesh.positions()[0], Point3::new(0.0, 0.0, 0.0));
    }

    #[test]
    fn interior_height_stays_within_boundary_range() {
        let ring = WavyRing {
            radius: 1.0,
            amplitude: 0.5,
            waves: 2,
        };
        let mut mesh = FilmMesh::bootstrap(&ring);
        for _ in 0..3 {
            mesh.refine(&ring);
            for _ in 0..5 {
                mesh.smooth();
            }
        }
        for p in mesh.positions() {
            assert!(p.z.abs() <= 0.5 + 1e-12);
        }
    }

    #[test]
    fn emit_offsets_into_non_empty_builder() {
        let circle = Circle::unit();
        let mesh = FilmMesh::bootstrap(&circle);
        let mut builder = MeshBuilder::new();
        builder.add_vertex(Point3::new(9.0, 9.0, 9.0), VertexOptions::default());
        mesh.emit(&mut builder, TriangleOptions::material(1)).unwrap();
        assert_eq!(builder.vertex_count(), 8);
        assert_eq!(builder.triangles(1)[0], [7, 1, 2]);
    }
}
