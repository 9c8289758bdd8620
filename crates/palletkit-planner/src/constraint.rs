//! Projection of an obstacle cylinder onto a travel segment.
//!
//! The projection answers "does this segment enter the protected region of
//! this obstacle, and by how much". A segment that only touches the top plane
//! or grazes the disc is left alone.

use crate::geometry::{Line, GEOMETRY_EPSILON};
use palletkit_core::{CartesianCoordinate, ObstacleCylinder};

/// Height slack below which touching an obstacle top counts as clear (mm).
pub const TOP_TOLERANCE: f64 = 1e-6;

/// Default share of the reach under which a violation is ignored.
pub const DEFAULT_NEGLIGIBLE_FRACTION: f64 = 0.1;

/// The part of a segment that runs inside an obstacle's protected region.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EffectiveConstraint {
    /// Where the segment crosses the top plane, clamped into the violation
    pub center: CartesianCoordinate,
    /// Horizontal span of the violating part of the segment
    pub radius: f64,
    /// Segment parameter where the violation starts
    pub t_enter: f64,
    /// Segment parameter where the violation ends
    pub t_exit: f64,
    /// Obstacle radius grown by the payload clearance radius
    pub reach: f64,
    pub obstacle: ObstacleCylinder,
    /// The segment moves upward while crossing
    pub ascending: bool,
}

impl EffectiveConstraint {
    /// Height of the protected region's top
    pub fn top(&self) -> f64 {
        self.obstacle.z
    }
}

/// Project `obstacle` onto `line` for a payload of clearance radius
/// `box_radius`.
///
/// Returns `None` when the segment stays clear, when the geometry is
/// degenerate (a purely vertical segment never enters a column it does not
/// start in), or when the violation is shorter than
/// `negligible_fraction × reach`.
pub fn project_constraint(
    line: &Line,
    obstacle: &ObstacleCylinder,
    box_radius: f64,
    negligible_fraction: f64,
) -> Option<EffectiveConstraint> {
    let top = obstacle.z;
    if line.a.z.max(line.b.z) <= top + TOP_TOLERANCE {
        return None;
    }

    let center = obstacle.center();
    let reach = obstacle.radius + box_radius;
    if line.closest_horizontal_approach(&center) >= reach {
        return None;
    }

    let (s0, s1) = line.circle_crossings(&center, reach)?;

    let ascending = line.is_ascending();
    let t_top = line.t_at_z(top);
    let (band_start, band_end) = match t_top {
        Some(t) if ascending => (f64::NEG_INFINITY, t),
        Some(t) => (t, f64::INFINITY),
        // Horizontal and below the top along its whole length
        None => (f64::NEG_INFINITY, f64::INFINITY),
    };

    let t_enter = s0.max(band_start).max(0.0);
    let t_exit = s1.min(band_end).min(1.0);
    if t_exit - t_enter <= GEOMETRY_EPSILON {
        return None;
    }

    let t_center = match t_top {
        Some(t) => t.clamp(t_enter, t_exit),
        None => (t_enter + t_exit) / 2.0,
    };
    let radius = line.at(t_enter).horizontal_distance_to(&line.at(t_exit));
    if radius < negligible_fraction * reach {
        return None;
    }

    Some(EffectiveConstraint {
        center: line.at(t_center).with_z(top),
        radius,
        t_enter,
        t_exit,
        reach,
        obstacle: *obstacle,
        ascending,
    })
}
