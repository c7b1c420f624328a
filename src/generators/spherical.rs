use crate::error::{GeneratorError, Result};
use crate::math::{Point3, Vector3, TOLERANCE};
use crate::mesh::{Generator, MeshBuilder, TriangleOptions, VertexOptions};

use super::TriangleLattice;

/// A spherical triangle patch, as used for rounded box corners.
///
/// The patch spans three corner directions on a sphere. Lattice points of a
/// [`TriangleLattice`] are blended between the corner directions and
/// projected back onto the sphere, each carrying its radial normal. The
/// front side faces away from the centre when the corners wind
/// counter-clockwise seen from outside.
#[derive(Debug, Clone)]
pub struct SphericalTriangle {
    center: Point3,
    radius: f64,
    corners: [Vector3; 3],
    subdivisions: usize,
    options: TriangleOptions,
}

impl SphericalTriangle {
    /// Creates a patch spanning `corners` (directions from `center`).
    #[must_use]
    pub fn new(center: Point3, radius: f64, corners: [Vector3; 3], subdivisions: usize) -> Self {
        Self {
            center,
            radius,
            corners,
            subdivisions,
            options: TriangleOptions::default(),
        }
    }

    /// The `+X +Y +Z` octant of a sphere.
    #[must_use]
    pub fn octant(center: Point3, radius: f64, subdivisions: usize) -> Self {
        Self::new(
            center,
            radius,
            [Vector3::x(), Vector3::y(), Vector3::z()],
            subdivisions,
        )
    }

    /// Sets the material slot and inversion of the emitted faces.
    ///
    /// Inverting also flips the emitted normals so they stay on the front side.
    #[must_use]
    pub fn with_options(mut self, options: TriangleOptions) -> Self {
        self.options = options;
        self
    }
}

impl Generator for SphericalTriangle {
    #[allow(clippy::cast_precision_loss)]
    fn generate(&self, builder: &mut MeshBuilder) -> Result<()> {
        if self.radius < TOLERANCE {
            return Err(
                GeneratorError::InvalidParameters("sphere radius must be positive".into()).into(),
            );
        }
        if self.corners.iter().any(|c| c.norm() < TOLERANCE) {
            return Err(GeneratorError::InvalidParameters(
                "corner directions must be non-zero".into(),
            )
            .into());
        }

        let corners = self.corners.map(|c| c.normalize());
        let n = self.subdivisions as f64;
        let sign = if self.options.invert { -1.0 } else { 1.0 };

        TriangleLattice::new(self.subdivisions)
            .with_options(self.options)
            .emit(builder, |builder, [i, j, k]| {
                let blend = corners[0] * (i as f64 / n)
                    + corners[1] * (j as f64 / n)
                    + corners[2] * (k as f64 / n);
                let dir = blend.try_normalize(TOLERANCE).ok_or_else(|| {
                    GeneratorError::InvalidParameters(
                        "corner directions span a degenerate patch".into(),
                    )
                })?;
                Ok(builder.add_vertex(
                    self.center + dir * self.radius,
                    VertexOptions::with_normal(dir * sign),
                ))
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::face_normal;
    use approx::assert_relative_eq;

    #[test]
    fn octant_counts() {
        let mesh = SphericalTriangle::octant(Point3::origin(), 1.0, 3).build().unwrap();
        assert_eq!(mesh.triangle_count(), 9);
        assert_eq!(mesh.vertex_count(), 10);
    }

    #[test]
    fn vertices_lie_on_sphere() {
        let center = Point3::new(1.0, -2.0, 0.5);
        let mesh = SphericalTriangle::octant(center, 0.25, 4).build().unwrap();
        for p in &mesh.positions {
            assert_relative_eq!((p - center).norm(), 0.25, epsilon = 1e-12);
        }
    }

    #[test]
    fn faces_and_normals_point_outward() {
        let mesh = SphericalTriangle::octant(Point3::origin(), 1.0, 4).build().unwrap();
        let normals = mesh.normals.as_ref().unwrap();
        for &[a, b, c] in &mesh.indices {
            let pa = mesh.positions[a as usize];
            let n = face_normal(&pa, &mesh.positions[b as usize], &mesh.positions[c as usize]);
            assert!(n.dot(&pa.coords) > 0.0);
            assert!(normals[a as usize].dot(&pa.coords) > 0.0);
        }
    }

    #[test]
    fn inverted_patch_flips_normals() {
        let mesh = SphericalTriangle::octant(Point3::origin(), 1.0, 2)
            .with_options(TriangleOptions::default().inverted())
            .build()
            .unwrap();
        let normals = mesh.normals.unwrap();
        for (p, n) in mesh.positions.iter().zip(&normals) {
            assert!(n.dot(&p.coords) < 0.0);
        }
    }

    #[test]
    fn zero_subdivisions_emit_nothing() {
        let mesh = SphericalTriangle::octant(Point3::origin(), 1.0, 0).build().unwrap();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn antipodal_corners_are_rejected() {
        let patch = SphericalTriangle::new(
            Point3::origin(),
            1.0,
            [Vector3::x(), -Vector3::x(), Vector3::z()],
            2,
        );
        assert!(patch.build().is_err());
    }

    #[test]
    fn zero_radius_is_rejected() {
        assert!(SphericalTriangle::octant(Point3::origin(), 0.0, 2).build().is_err());
    }
}
