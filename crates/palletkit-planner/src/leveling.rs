//! Path leveling: removal of redundant waypoints.
//!
//! A pass drops duplicates, straight-through middle points and everything
//! between the first and last visit of the home plane. Passes repeat until
//! nothing changes, so leveling a leveled path returns it unchanged.

use nalgebra::Vector3;
use palletkit_core::{CartesianCoordinate, POSITION_TOLERANCE};

fn vector(p: &CartesianCoordinate) -> Vector3<f64> {
    Vector3::new(p.x, p.y, p.z)
}

/// Remove redundant points from `points`; the first and last are kept.
pub fn level_path(points: &[CartesianCoordinate]) -> Vec<CartesianCoordinate> {
    let mut current = points.to_vec();
    loop {
        let next = collapse_home_plane(&drop_straight_points(&drop_duplicates(&current)));
        if next.len() == current.len() {
            return next;
        }
        current = next;
    }
}

fn drop_duplicates(points: &[CartesianCoordinate]) -> Vec<CartesianCoordinate> {
    let Some((&last, rest)) = points.split_last() else {
        return Vec::new();
    };
    let mut out: Vec<CartesianCoordinate> = Vec::with_capacity(points.len());
    for &p in rest {
        match out.last() {
            Some(prev) if prev.approx_eq(&p, POSITION_TOLERANCE) => {}
            _ => out.push(p),
        }
    }
    // The real last point replaces a duplicate predecessor, never the first.
    if out.len() > 1 {
        if let Some(prev) = out.last() {
            if prev.approx_eq(&last, POSITION_TOLERANCE) {
                out.pop();
            }
        }
    }
    out.push(last);
    out
}

fn is_redundant(a: &CartesianCoordinate, b: &CartesianCoordinate, c: &CartesianCoordinate) -> bool {
    let vertical = a.same_column(b, POSITION_TOLERANCE)
        && b.same_column(c, POSITION_TOLERANCE)
        && (b.z - a.z) * (c.z - b.z) >= 0.0;
    if vertical {
        return true;
    }

    let ab = vector(b) - vector(a);
    let bc = vector(c) - vector(b);
    let ac = vector(c) - vector(a);
    let length = ac.norm();
    if length <= POSITION_TOLERANCE {
        return false;
    }
    let offset = ab.cross(&ac).norm() / length;
    offset <= POSITION_TOLERANCE && ab.dot(&bc) >= 0.0
}

fn drop_straight_points(points: &[CartesianCoordinate]) -> Vec<CartesianCoordinate> {
    if points.len() < 3 {
        return points.to_vec();
    }
    let mut out = vec![points[0]];
    for window in points.windows(2).skip(1) {
        let (b, c) = (window[0], window[1]);
        let a = out[out.len() - 1];
        if !is_redundant(&a, &b, &c) {
            out.push(b);
        }
    }
    out.push(points[points.len() - 1]);
    out
}

fn collapse_home_plane(points: &[CartesianCoordinate]) -> Vec<CartesianCoordinate> {
    let on_home = |p: &CartesianCoordinate| p.z.abs() <= POSITION_TOLERANCE;
    let first = points.iter().position(on_home);
    let last = points.iter().rposition(on_home);
    match (first, last) {
        (Some(first), Some(last)) if last > first + 1 => points[..=first]
            .iter()
            .chain(&points[last..])
            .copied()
            .collect(),
        _ => points.to_vec(),
    }
}
