use super::{Point3, Vector3};

/// Returns the area-weighted normal of triangle `(a, b, c)`.
///
/// The result is `(b - a) × (c - a)`: its direction follows the right-hand
/// rule over the winding and its length is twice the triangle area. It is
/// left unnormalized so that summing over adjacent faces weights each face
/// by its area.
#[must_use]
pub fn face_normal(a: &Point3, b: &Point3, c: &Point3) -> Vector3 {
    (b - a).cross(&(c - a))
}

/// Returns the area of triangle `(a, b, c)`.
#[must_use]
pub fn triangle_area(a: &Point3, b: &Point3, c: &Point3) -> f64 {
    face_normal(a, b, c).norm() * 0.5
}

/// Returns the arithmetic mean of `points`, or `None` if the slice is empty.
#[must_use]
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    #[allow(clippy::cast_precision_loss)]
    let n = points.len() as f64;
    Some(Point3::from(sum / n))
}
