//! # PalletKit Core
//!
//! Core types shared by every PalletKit crate.
//! Provides the machine-frame data model (coordinates, boxes, pallets and
//! obstacle cylinders), the motion program handed to the executor, and the
//! common error types.

pub mod data;
pub mod error;
pub mod path;

pub use data::{
    BoxDimensions, BoxTransfer, CartesianCoordinate, Coordinate, ObstacleCylinder,
    ObstacleOrigin, PalletConfiguration, PalletGeometry, SavedPalletConfiguration,
    POSITION_TOLERANCE,
};

pub use error::{ConfigurationError, Error, Result};

pub use path::{drop_coordinates, ActionTag, BoxPath, IoPin, SpeedClass, Waypoint};
