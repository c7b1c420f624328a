use std::f64::consts::TAU;

use crate::error::{GeneratorError, Result};
use crate::math::{Point3, Vector3};

/// A closed curve parameterized over `[0, 1)`.
///
/// Implementations must be deterministic: evaluating the same parameter twice
/// yields the same point bit for bit, since border vertices are identified
/// by their parameter alone.
pub trait BoundaryCurve {
    /// Returns the point at parameter `t`.
    fn evaluate(&self, t: f64) -> Point3;
}

impl<F> BoundaryCurve for F
where
    F: Fn(f64) -> Point3,
{
    fn evaluate(&self, t: f64) -> Point3 {
        self(t)
    }
}

/// A circle in a plane parallel to XY.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    center: Point3,
    radius: f64,
}

impl Circle {
    /// Creates a circle around `center`, traversed counter-clockwise seen from `+Z`.
    #[must_use]
    pub fn new(center: Point3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// The unit circle in the XY plane.
    #[must_use]
    pub fn unit() -> Self {
        Self::new(Point3::origin(), 1.0)
    }
}

impl BoundaryCurve for Circle {
    fn evaluate(&self, t: f64) -> Point3 {
        let angle = TAU * t;
        self.center + Vector3::new(angle.cos(), angle.sin(), 0.0) * self.radius
    }
}

/// A closed polygon whose edges each take an equal share of the parameter range.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosedPolygon {
    corners: Vec<Point3>,
}

impl ClosedPolygon {
    /// Creates a polygon through `corners`, closing back to the first.
    ///
    /// # Errors
    ///
    /// Returns an error if fewer than three corners are given.
    pub fn new(corners: Vec<Point3>) -> Result<Self> {
        if corners.len() < 3 {
            return Err(GeneratorError::InvalidParameters(format!(
                "closed polygon needs at least 3 corners, got {}",
                corners.len()
            ))
            .into());
        }
        Ok(Self { corners })
    }

    /// A regular `sides`-gon of circumradius `radius` in the XY plane, first
    /// corner on `+X`.
    ///
    /// # Errors
    ///
    /// Returns an error if `sides < 3`.
    #[allow(clippy::cast_precision_loss)]
    pub fn regular(sides: usize, radius: f64) -> Result<Self> {
        let corners = (0..sides)
            .map(|k| {
                let angle = TAU * k as f64 / sides as f64;
                Point3::new(radius * angle.cos(), radius * angle.sin(), 0.0)
            })
            .collect();
        Self::new(corners)
    }

    /// Returns the polygon corners.
    #[must_use]
    pub fn corners(&self) -> &[Point3] {
        &self.corners
    }
}

impl BoundaryCurve for ClosedPolygon {
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn evaluate(&self, t: f64) -> Point3 {
        let n = self.corners.len();
        let scaled = t.rem_euclid(1.0) * n as f64;
        let i = (scaled.floor() as usize).min(n - 1);
        let frac = scaled - i as f64;
        let start = self.corners[i];
        let end = self.corners[(i + 1) % n];
        start + (end - start) * frac
    }
}

/// A circle in XY whose height oscillates `waves` times around the loop.
///
/// Two waves give the classic saddle-shaped soap film.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WavyRing {
    /// Radius of the ring's projection onto XY.
    pub radius: f64,
    /// Peak height above and below the XY plane.
    pub amplitude: f64,
    /// Number of full oscillations per loop.
    pub waves: u32,
}

impl BoundaryCurve for WavyRing {
    fn evaluate(&self, t: f64) -> Point3 {
        let angle = TAU * t;
        Point3::new(
            self.radius * angle.cos(),
            self.radius * angle.sin(),
            self.amplitude * (f64::from(self.waves) * angle).sin(),
        )
    }
}
