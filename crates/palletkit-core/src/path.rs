//! Motion program types handed to the motion executor.
//!
//! A job is a `Vec<BoxPath>`; each [`BoxPath`] is one continuous stroke made
//! of [`Waypoint`]s that the executor visits in order.

use crate::data::{CartesianCoordinate, Coordinate};
use crate::error::ConfigurationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Discrete action performed once a waypoint is reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionTag {
    #[default]
    None,
    /// Close the gripper on the box
    Pick,
    /// Release the box
    Drop,
    /// Sample the box detection inputs before picking
    DetectBox,
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Pick => write!(f, "pick"),
            Self::Drop => write!(f, "drop"),
            Self::DetectBox => write!(f, "detect"),
        }
    }
}

/// Speed profile used to reach a waypoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpeedClass {
    /// Unladen drive speed
    #[default]
    Fast,
    /// Freight speed, used while carrying a box
    Slow,
}

/// A digital input sampled by the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IoPin {
    pub machine_motion_index: u32,
    pub network_id: u32,
    pub pin: u32,
    /// Expected value when a box is present
    pub pin_val: bool,
}

/// One target of a stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Waypoint {
    #[serde(flatten)]
    pub position: Coordinate,
    pub action: ActionTag,
    pub speed: SpeedClass,
    /// Block until the motion has physically completed
    pub wait_for_completion: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub box_detection: Vec<IoPin>,
}

impl Waypoint {
    /// Plain travel waypoint
    pub fn new(position: Coordinate, speed: SpeedClass) -> Self {
        Self {
            position,
            action: ActionTag::None,
            speed,
            wait_for_completion: true,
            box_detection: Vec::new(),
        }
    }

    pub fn with_action(mut self, action: ActionTag) -> Self {
        self.action = action;
        self
    }

    pub fn with_wait(mut self, wait: bool) -> Self {
        self.wait_for_completion = wait;
        self
    }

    pub fn with_box_detection(mut self, pins: Vec<IoPin>) -> Self {
        self.box_detection = pins;
        self
    }

    pub fn cartesian(&self) -> CartesianCoordinate {
        self.position.cartesian()
    }
}

/// One continuous stroke; never empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Waypoint>", into = "Vec<Waypoint>")]
pub struct BoxPath {
    waypoints: Vec<Waypoint>,
}

impl BoxPath {
    pub fn new(waypoints: Vec<Waypoint>) -> Result<Self, ConfigurationError> {
        if waypoints.is_empty() {
            return Err(ConfigurationError::EmptyPath);
        }
        Ok(Self { waypoints })
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    /// Whether the stroke has no waypoints
    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Waypoint> {
        self.waypoints.iter()
    }

    pub fn first(&self) -> &Waypoint {
        &self.waypoints[0]
    }

    pub fn last(&self) -> &Waypoint {
        &self.waypoints[self.waypoints.len() - 1]
    }

    /// Whether any waypoint carries `action`
    pub fn contains_action(&self, action: ActionTag) -> bool {
        self.waypoints.iter().any(|w| w.action == action)
    }

    /// Travel length of the stroke starting from `from`
    pub fn length_from(&self, from: CartesianCoordinate) -> f64 {
        let mut previous = from;
        let mut total = 0.0;
        for waypoint in &self.waypoints {
            let position = waypoint.cartesian();
            total += previous.distance_to(&position);
            previous = position;
        }
        total
    }
}

impl TryFrom<Vec<Waypoint>> for BoxPath {
    type Error = ConfigurationError;

    fn try_from(waypoints: Vec<Waypoint>) -> Result<Self, Self::Error> {
        Self::new(waypoints)
    }
}

impl From<BoxPath> for Vec<Waypoint> {
    fn from(path: BoxPath) -> Self {
        path.waypoints
    }
}

impl<'a> IntoIterator for &'a BoxPath {
    type Item = &'a Waypoint;
    type IntoIter = std::slice::Iter<'a, Waypoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.waypoints.iter()
    }
}

/// Every position where a box is released, in execution order.
pub fn drop_coordinates(paths: &[BoxPath]) -> Vec<Coordinate> {
    paths
        .iter()
        .flat_map(|path| path.iter())
        .filter(|w| w.action == ActionTag::Drop)
        .map(|w| w.position)
        .collect()
}
