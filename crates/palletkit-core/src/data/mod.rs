//! Data models for machine-frame coordinates, boxes and pallets
//!
//! This module provides:
//! - Cartesian coordinates with the vector algebra the planner needs
//! - Oriented coordinates (position plus gripper rotation)
//! - Box dimensions
//! - Pallet geometry, box transfers and the saved job configuration
//! - Obstacle cylinders derived from pallets and placed boxes
//!
//! All lengths are millimeters in the machine frame. The z axis points
//! *downward*: `z = 0` is the fully retracted home height, so a smaller z is
//! higher up.

pub mod obstacle;
pub mod pallet;

pub use obstacle::{ObstacleCylinder, ObstacleOrigin};
pub use pallet::{
    BoxTransfer, PalletConfiguration, PalletGeometry, SavedPalletConfiguration,
};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Tolerance used when comparing machine positions (mm).
pub const POSITION_TOLERANCE: f64 = 1e-3;

/// A point (or displacement) in the machine frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CartesianCoordinate {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position, increasing downward
    pub z: f64,
}

impl CartesianCoordinate {
    /// Create a coordinate from its three components
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite(),
            "coordinate components must be finite: x={x}, y={y}, z={z}"
        );
        Self { x, y, z }
    }

    /// The home position, top of the reachable volume
    pub fn home() -> Self {
        Self::default()
    }

    /// Dot product of two vectors
    pub fn dot(&self, other: &Self) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean length
    pub fn norm(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// Length of the horizontal (x, y) projection
    pub fn norm_2d(&self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: &Self) -> f64 {
        (*self - *other).norm()
    }

    /// Distance between the horizontal projections of two points
    pub fn horizontal_distance_to(&self, other: &Self) -> f64 {
        (*self - *other).norm_2d()
    }

    /// Whether both points share the same horizontal position
    pub fn same_column(&self, other: &Self, tolerance: f64) -> bool {
        self.horizontal_distance_to(other) <= tolerance
    }

    /// Whether both points coincide within `tolerance`
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.distance_to(other) <= tolerance
    }

    /// Copy of this point moved to height `z`
    pub fn with_z(&self, z: f64) -> Self {
        Self { z, ..*self }
    }

    /// Unit vector in the same direction, or `None` for a zero vector
    pub fn unit(&self) -> Option<Self> {
        let norm = self.norm();
        if norm <= f64::EPSILON {
            return None;
        }
        Some(*self * (1.0 / norm))
    }
}

impl Add for CartesianCoordinate {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
            z: self.z + rhs.z,
        }
    }
}

impl Sub for CartesianCoordinate {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
            z: self.z - rhs.z,
        }
    }
}

impl Mul<f64> for CartesianCoordinate {
    type Output = Self;

    fn mul(self, alpha: f64) -> Self {
        Self {
            x: self.x * alpha,
            y: self.y * alpha,
            z: self.z * alpha,
        }
    }
}

impl Neg for CartesianCoordinate {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.0
    }
}

impl fmt::Display for CartesianCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// A machine position plus the gripper rotation.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Coordinate {
    /// X-axis position
    pub x: f64,
    /// Y-axis position
    pub y: f64,
    /// Z-axis position, increasing downward
    pub z: f64,
    /// Rotation of the box long axis in degrees (0 or 90 in practice)
    #[serde(rename = "θ", alias = "theta", default)]
    pub theta: f64,
}

impl Coordinate {
    /// Create an oriented coordinate
    pub fn new(x: f64, y: f64, z: f64, theta: f64) -> Self {
        debug_assert!(
            x.is_finite() && y.is_finite() && z.is_finite() && theta.is_finite(),
            "coordinate components must be finite: x={x}, y={y}, z={z}, θ={theta}"
        );
        Self { x, y, z, theta }
    }

    /// Attach an orientation to a cartesian position
    pub fn from_cartesian(position: CartesianCoordinate, theta: f64) -> Self {
        Self {
            x: position.x,
            y: position.y,
            z: position.z,
            theta,
        }
    }

    /// Position without the orientation
    pub fn cartesian(&self) -> CartesianCoordinate {
        CartesianCoordinate {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

impl From<Coordinate> for CartesianCoordinate {
    fn from(c: Coordinate) -> Self {
        c.cartesian()
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.3}, {:.3}, {:.3}, θ={:.1})",
            self.x, self.y, self.z, self.theta
        )
    }
}

/// Outer dimensions of a box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxDimensions {
    pub width: f64,
    pub length: f64,
    pub height: f64,
}

impl BoxDimensions {
    pub fn new(width: f64, length: f64, height: f64) -> Self {
        Self {
            width,
            length,
            height,
        }
    }

    /// Radius of the circle circumscribing the box footprint
    pub fn footprint_radius(&self) -> f64 {
        self.width.hypot(self.length) / 2.0
    }
}
