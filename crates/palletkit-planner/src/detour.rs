//! Detour synthesis around a single violated obstacle.
//!
//! Policies are tried from the cheapest to the most conservative; the first
//! one whose new sub-segments clear the obstacle wins. The square plateau is
//! always clear and closes the list.

use crate::constraint::{project_constraint, EffectiveConstraint};
use crate::geometry::{Line, GEOMETRY_EPSILON};
use palletkit_core::{CartesianCoordinate, POSITION_TOLERANCE};

/// Default vertical clearance kept above an obstacle top (mm).
pub const DEFAULT_CLEARANCE_MARGIN: f64 = 50.0;

/// Default growth of the reach used to place hop points.
pub const DEFAULT_ERROR_RADIUS_FACTOR: f64 = 1.1;

/// Waypoints inserted between the two ends of a violating segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Detour {
    /// Vertical segment, nothing to insert
    PassThrough,
    /// Single hop point beside the obstacle, lifted over its top
    RaiseOver(CartesianCoordinate),
    /// Vertical lift at the start, then the hop point
    Triangle {
        lift: Option<CartesianCoordinate>,
        hop: CartesianCoordinate,
    },
    /// Plateau above both ends
    Square {
        above_start: Option<CartesianCoordinate>,
        above_end: Option<CartesianCoordinate>,
    },
}

impl Detour {
    /// Points to splice between the segment ends, in travel order
    pub fn waypoints(&self) -> Vec<CartesianCoordinate> {
        match *self {
            Detour::PassThrough => Vec::new(),
            Detour::RaiseOver(hop) => vec![hop],
            Detour::Triangle { lift, hop } => lift.into_iter().chain([hop]).collect(),
            Detour::Square {
                above_start,
                above_end,
            } => above_start.into_iter().chain(above_end).collect(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Detour::PassThrough => "pass-through",
            Detour::RaiseOver(_) => "raise-over",
            Detour::Triangle { .. } => "triangle",
            Detour::Square { .. } => "square",
        }
    }
}

/// Tuning shared by every detour of one route.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetourContext {
    /// Clearance radius of the carried payload
    pub box_radius: f64,
    pub clearance_margin: f64,
    pub error_radius_factor: f64,
    pub negligible_fraction: f64,
    /// Whether the segment start may be left at an angle. False for the first
    /// leg of a route, which must leave its pick, drop or home point vertically.
    pub may_rise: bool,
}

/// Choose the detour that takes `line` around `constraint`.
pub fn synthesize_detour(
    line: &Line,
    constraint: &EffectiveConstraint,
    context: &DetourContext,
) -> Detour {
    if line.is_vertical(POSITION_TOLERANCE) {
        return Detour::PassThrough;
    }

    let clear_z = (constraint.top() - context.clearance_margin).max(0.0);

    if let Some(hop) = hop_point(line, constraint, context, clear_z) {
        if context.may_rise {
            let detour = Detour::RaiseOver(hop);
            if clears(line, &detour, constraint, context) {
                return detour;
            }
        }

        let lift = (line.a.z > clear_z + POSITION_TOLERANCE).then(|| line.a.with_z(clear_z));
        let detour = Detour::Triangle { lift, hop };
        if clears(line, &detour, constraint, context) {
            return detour;
        }
    }

    square(line, clear_z)
}

/// Crossing of the travel track with the safety circle on the deep side of
/// the violation, lifted to `clear_z` when it lies lower.
fn hop_point(
    line: &Line,
    constraint: &EffectiveConstraint,
    context: &DetourContext,
    clear_z: f64,
) -> Option<CartesianCoordinate> {
    let safe_radius = constraint.reach * context.error_radius_factor;
    let (s0, s1) = line.circle_crossings(&constraint.obstacle.center(), safe_radius)?;
    let s = if constraint.ascending { s0 } else { s1 };
    if s <= GEOMETRY_EPSILON || s >= 1.0 - GEOMETRY_EPSILON {
        return None;
    }
    let on_track = line.at(s);
    Some(on_track.with_z(on_track.z.min(clear_z)))
}

fn square(line: &Line, clear_z: f64) -> Detour {
    let plateau = clear_z.min(line.a.z).min(line.b.z).max(0.0);
    let above = |p: CartesianCoordinate| {
        let q = p.with_z(plateau);
        (!q.approx_eq(&p, POSITION_TOLERANCE)).then_some(q)
    };
    Detour::Square {
        above_start: above(line.a),
        above_end: above(line.b),
    }
}

fn clears(
    line: &Line,
    detour: &Detour,
    constraint: &EffectiveConstraint,
    context: &DetourContext,
) -> bool {
    let mut points = vec![line.a];
    points.extend(detour.waypoints());
    points.push(line.b);
    points.windows(2).all(|pair| {
        project_constraint(
            &Line::new(pair[0], pair[1]),
            &constraint.obstacle,
            context.box_radius,
            context.negligible_fraction,
        )
        .is_none()
    })
}
