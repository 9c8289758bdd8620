//! Pallet geometry, box transfers and the saved job configuration.
//!
//! These structures are produced by the teach/configuration subsystem and
//! deserialized from its JSON (camelCase keys). The planner treats them as
//! immutable.

use super::{BoxDimensions, CartesianCoordinate, Coordinate, ObstacleCylinder, ObstacleOrigin};
use crate::error::ConfigurationError;
use crate::path::IoPin;
use serde::{Deserialize, Serialize};

/// Three corners of a pallet deck; `corner2` is adjacent to both others.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PalletGeometry {
    pub corner1: Coordinate,
    pub corner2: Coordinate,
    pub corner3: Coordinate,
}

impl PalletGeometry {
    pub fn new(corner1: Coordinate, corner2: Coordinate, corner3: Coordinate) -> Self {
        Self {
            corner1,
            corner2,
            corner3,
        }
    }

    /// Edge from `corner2` to `corner3`
    pub fn x_edge(&self) -> CartesianCoordinate {
        self.corner3.cartesian() - self.corner2.cartesian()
    }

    /// Edge from `corner2` to `corner1`
    pub fn y_edge(&self) -> CartesianCoordinate {
        self.corner1.cartesian() - self.corner2.cartesian()
    }

    /// Diagonal from `corner2` to the opposite corner
    pub fn diagonal(&self) -> CartesianCoordinate {
        self.x_edge() + self.y_edge()
    }

    /// Deck height: the highest corner (home is z = 0, so the minimum z)
    pub fn deck_height(&self) -> f64 {
        self.corner1
            .z
            .min(self.corner2.z)
            .min(self.corner3.z)
    }

    /// Center of the deck at deck height
    pub fn center(&self) -> CartesianCoordinate {
        let center = self.corner2.cartesian() + self.diagonal() * 0.5;
        center.with_z(self.deck_height())
    }

    /// Bounding cylinder covering the whole deck footprint
    pub fn obstacle(&self, pallet_index: usize) -> ObstacleCylinder {
        let radius = self.x_edge().norm_2d().hypot(self.y_edge().norm_2d()) / 2.0;
        ObstacleCylinder::new(self.center(), radius, ObstacleOrigin::Pallet(pallet_index))
    }
}

/// One box to move from its pick location to its drop location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxTransfer {
    pub pick_location: Coordinate,
    /// Gripper position when the box rests in place (top of the box)
    pub drop_location: Coordinate,
    pub dimensions: BoxDimensions,
    pub pallet_index: usize,
    pub stack_index: usize,
    #[serde(default)]
    pub box_index: usize,
    /// Precomputed pick to drop distance
    pub linear_path_distance: f64,
    /// Inputs sampled to confirm a box is waiting at the pick location
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub box_detection: Vec<IoPin>,
}

impl BoxTransfer {
    pub fn new(
        pick_location: Coordinate,
        drop_location: Coordinate,
        dimensions: BoxDimensions,
        pallet_index: usize,
        stack_index: usize,
    ) -> Self {
        let linear_path_distance = pick_location
            .cartesian()
            .distance_to(&drop_location.cartesian());
        Self {
            pick_location,
            drop_location,
            dimensions,
            pallet_index,
            stack_index,
            box_index: 0,
            linear_path_distance,
            box_detection: Vec::new(),
        }
    }

    pub fn with_box_index(mut self, box_index: usize) -> Self {
        self.box_index = box_index;
        self
    }

    pub fn with_box_detection(mut self, pins: Vec<IoPin>) -> Self {
        self.box_detection = pins;
        self
    }

    /// Top-footprint cylinder of this box once it rests at its drop location.
    ///
    /// The drop location is the gripper position on the box's top face, so
    /// the cylinder's top is the drop height.
    pub fn top_obstacle(&self, transfer_index: usize) -> ObstacleCylinder {
        ObstacleCylinder::new(
            self.drop_location.cartesian(),
            self.dimensions.footprint_radius(),
            ObstacleOrigin::PlacedBox(transfer_index),
        )
    }
}

/// Named set of pallets.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PalletConfiguration {
    pub name: String,
    pub pallets: Vec<PalletGeometry>,
}

/// A complete, resolved palletizing job.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPalletConfiguration {
    pub box_coordinates: Vec<BoxTransfer>,
    pub config: PalletConfiguration,
    #[serde(default)]
    pub complete: bool,
}

impl SavedPalletConfiguration {
    pub fn new(name: impl Into<String>, pallets: Vec<PalletGeometry>) -> Self {
        Self {
            box_coordinates: Vec::new(),
            config: PalletConfiguration {
                name: name.into(),
                pallets,
            },
            complete: true,
        }
    }

    pub fn with_transfers(mut self, transfers: Vec<BoxTransfer>) -> Self {
        self.box_coordinates = transfers;
        self
    }

    pub fn pallets(&self) -> &[PalletGeometry] {
        &self.config.pallets
    }

    /// Check the references the planner relies on
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let pallet_count = self.config.pallets.len();
        for (transfer_index, transfer) in self.box_coordinates.iter().enumerate() {
            if transfer.pallet_index >= pallet_count {
                return Err(ConfigurationError::UnknownPallet {
                    transfer_index,
                    pallet_index: transfer.pallet_index,
                    pallet_count,
                });
            }
        }
        Ok(())
    }
}
