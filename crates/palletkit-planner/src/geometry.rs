//! Straight travel segments and their horizontal intersection tests.
//!
//! Every quantity here is computed on the horizontal projection of a segment
//! (obstacles are vertical columns), except the height helpers. Degenerate
//! inputs yield `None` instead of NaN.

use nalgebra::Vector2;
use palletkit_core::CartesianCoordinate;

/// Threshold under which a squared length or a height difference is zero.
pub const GEOMETRY_EPSILON: f64 = 1e-9;

fn horizontal(p: &CartesianCoordinate) -> Vector2<f64> {
    Vector2::new(p.x, p.y)
}

/// Directed segment from `a` to `b`, parameterized by `t` in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: CartesianCoordinate,
    pub b: CartesianCoordinate,
}

impl Line {
    pub fn new(a: CartesianCoordinate, b: CartesianCoordinate) -> Self {
        Self { a, b }
    }

    /// Position at parameter `t` (extrapolates outside `[0, 1]`)
    pub fn at(&self, t: f64) -> CartesianCoordinate {
        self.a + (self.b - self.a) * t
    }

    /// Horizontal displacement from `a` to `b`
    pub fn horizontal_delta(&self) -> Vector2<f64> {
        horizontal(&self.b) - horizontal(&self.a)
    }

    pub fn horizontal_length(&self) -> f64 {
        self.horizontal_delta().norm()
    }

    /// Both ends share a column (within `tolerance`)
    pub fn is_vertical(&self, tolerance: f64) -> bool {
        self.horizontal_length() <= tolerance
    }

    /// The segment moves upward (toward home)
    pub fn is_ascending(&self) -> bool {
        self.a.z > self.b.z + GEOMETRY_EPSILON
    }

    pub fn is_descending(&self) -> bool {
        self.b.z > self.a.z + GEOMETRY_EPSILON
    }

    /// Parameter at which the segment crosses height `z`
    pub fn t_at_z(&self, z: f64) -> Option<f64> {
        let dz = self.b.z - self.a.z;
        if dz.abs() < GEOMETRY_EPSILON {
            return None;
        }
        Some((z - self.a.z) / dz)
    }

    /// Parameters `(s0, s1)`, `s0 <= s1`, where the horizontal projection
    /// of the infinite line crosses the circle of `radius` around `center`.
    pub fn circle_crossings(
        &self,
        center: &CartesianCoordinate,
        radius: f64,
    ) -> Option<(f64, f64)> {
        let d = self.horizontal_delta();
        let f = horizontal(&self.a) - horizontal(center);

        let qa = d.dot(&d);
        if qa < GEOMETRY_EPSILON {
            return None;
        }
        let qb = 2.0 * f.dot(&d);
        let qc = f.dot(&f) - radius * radius;

        let discriminant = qb * qb - 4.0 * qa * qc;
        if discriminant < 0.0 {
            return None;
        }
        let root = discriminant.sqrt();
        let s0 = (-qb - root) / (2.0 * qa);
        let s1 = (-qb + root) / (2.0 * qa);
        Some((s0, s1))
    }

    /// Parameter in `[0, 1]` of the point horizontally closest to `center`
    pub fn closest_horizontal_t(&self, center: &CartesianCoordinate) -> f64 {
        let d = self.horizontal_delta();
        let qa = d.dot(&d);
        if qa < GEOMETRY_EPSILON {
            return 0.0;
        }
        let f = horizontal(center) - horizontal(&self.a);
        (f.dot(&d) / qa).clamp(0.0, 1.0)
    }

    /// Smallest horizontal distance between the segment and `center`
    pub fn closest_horizontal_approach(&self, center: &CartesianCoordinate) -> f64 {
        let t = self.closest_horizontal_t(center);
        self.at(t).horizontal_distance_to(center)
    }
}
