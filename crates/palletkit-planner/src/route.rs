//! Collision-free routing of one stroke between two fixed points.
//!
//! The router keeps the resolved prefix of the route and a queue of pending
//! waypoints. The segment from the last resolved point to the head of the
//! queue is checked against the obstacle set; on the first violation the
//! chosen detour's waypoints are pushed onto the front of the queue and the
//! (now shorter) segment is checked again.

use crate::constraint::{project_constraint, EffectiveConstraint};
use crate::detour::{synthesize_detour, DetourContext};
use crate::geometry::Line;
use crate::leveling::level_path;
use palletkit_core::{CartesianCoordinate, ObstacleCylinder, ObstacleOrigin};
use std::collections::VecDeque;
use tracing::{debug, warn};

/// Default upper bound on detours inserted into a single route.
pub const DEFAULT_MAX_DETOURS: usize = 64;

/// A leveled stroke from start to end, both included.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub points: Vec<CartesianCoordinate>,
    /// Number of detours spliced into the route
    pub detours: usize,
    /// The detour budget ran out and the home-plane plateau was used
    pub fell_back: bool,
}

/// Routes strokes around a fixed set of obstacles for one payload.
#[derive(Debug, Clone)]
pub struct PathRouter {
    obstacles: Vec<ObstacleCylinder>,
    context: DetourContext,
    max_detours: usize,
}

impl PathRouter {
    /// Build a router for a payload of `payload_height`.
    ///
    /// The obstacles are raised by the payload height and ordered from the
    /// highest top to the lowest. `context.box_radius` is the payload's
    /// clearance radius; `context.may_rise` is managed per segment.
    pub fn new(
        obstacles: &[ObstacleCylinder],
        payload_height: f64,
        context: DetourContext,
        max_detours: usize,
    ) -> Self {
        let mut obstacles: Vec<ObstacleCylinder> = obstacles
            .iter()
            .map(|o| o.raised_by(payload_height))
            .collect();
        obstacles.sort_by(|a, b| a.z.total_cmp(&b.z));
        Self {
            obstacles,
            context,
            max_detours,
        }
    }

    /// Inflated obstacles in checking order
    pub fn obstacles(&self) -> &[ObstacleCylinder] {
        &self.obstacles
    }

    pub fn origins(&self) -> Vec<ObstacleOrigin> {
        self.obstacles.iter().map(|o| o.origin).collect()
    }

    /// First obstacle violated by `line`, in checking order
    pub fn first_violation(&self, line: &Line) -> Option<EffectiveConstraint> {
        self.obstacles.iter().find_map(|obstacle| {
            project_constraint(
                line,
                obstacle,
                self.context.box_radius,
                self.context.negligible_fraction,
            )
        })
    }

    /// Route from `start` to `end`
    pub fn route(&self, start: CartesianCoordinate, end: CartesianCoordinate) -> Route {
        let mut resolved = vec![start];
        let mut pending = VecDeque::from([end]);
        let mut detours = 0;

        while let Some(&next) = pending.front() {
            let current = resolved[resolved.len() - 1];
            let line = Line::new(current, next);

            let Some(constraint) = self.first_violation(&line) else {
                resolved.push(next);
                pending.pop_front();
                continue;
            };

            let context = DetourContext {
                may_rise: resolved.len() > 1,
                ..self.context
            };
            let detour = synthesize_detour(&line, &constraint, &context);
            let waypoints = detour.waypoints();
            if waypoints.is_empty() {
                resolved.push(next);
                pending.pop_front();
                continue;
            }

            detours += 1;
            if detours > self.max_detours {
                warn!(
                    "Detour budget of {} exhausted between {} and {}, falling back to the home plane",
                    self.max_detours, start, end
                );
                return Route {
                    points: level_path(&[start, start.with_z(0.0), end.with_z(0.0), end]),
                    detours: detours - 1,
                    fell_back: true,
                };
            }

            debug!(
                "Inserting {} detour around {} (top {:.1}) on {} -> {}",
                detour.name(),
                constraint.obstacle.origin,
                constraint.top(),
                current,
                next
            );
            for waypoint in waypoints.into_iter().rev() {
                pending.push_front(waypoint);
            }
        }

        Route {
            points: level_path(&resolved),
            detours,
            fell_back: false,
        }
    }
}
