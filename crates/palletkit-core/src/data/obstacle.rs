//! Vertical no-fly columns.

use super::CartesianCoordinate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What an obstacle cylinder was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ObstacleOrigin {
    /// Footprint of the pallet at this index
    Pallet(usize),
    /// Top of the box at this position in the job's transfer list
    PlacedBox(usize),
}

impl fmt::Display for ObstacleOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pallet(i) => write!(f, "pallet #{i}"),
            Self::PlacedBox(i) => write!(f, "box #{i}"),
        }
    }
}

/// A vertical column of horizontal `radius` around `(x, y)`.
///
/// The protected region is everything inside the disc at or below `z`
/// (remember z grows downward), down to the floor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObstacleCylinder {
    pub x: f64,
    pub y: f64,
    /// Height of the obstacle's top surface
    pub z: f64,
    pub radius: f64,
    pub origin: ObstacleOrigin,
}

impl ObstacleCylinder {
    pub fn new(center: CartesianCoordinate, radius: f64, origin: ObstacleOrigin) -> Self {
        debug_assert!(
            radius.is_finite() && radius >= 0.0,
            "obstacle radius must be non-negative and finite, got {radius}"
        );
        Self {
            x: center.x,
            y: center.y,
            z: center.z,
            radius,
            origin,
        }
    }

    /// Center of the top surface
    pub fn center(&self) -> CartesianCoordinate {
        CartesianCoordinate::new(self.x, self.y, self.z)
    }

    /// Copy with the top moved up by `height`.
    ///
    /// Used when the gripper carries a payload: the gripper must stay
    /// `height` above the real top for the payload's underside to clear it.
    pub fn raised_by(&self, height: f64) -> Self {
        Self {
            z: self.z - height,
            ..*self
        }
    }

    /// Whether a point lies inside the protected region, with `clearance`
    /// added to the radius
    pub fn contains(&self, point: &CartesianCoordinate, clearance: f64) -> bool {
        point.z > self.z && point.horizontal_distance_to(&self.center()) < self.radius + clearance
    }
}
