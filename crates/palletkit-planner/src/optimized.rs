//! Optimized strategy: obstacle-aware job sequencing.
//!
//! Transfers are processed layer by layer (a layer is one stack index shared
//! by every pallet), longest transfer first, in batches. Every box gets an
//! unladen approach stroke to its pick location followed by a laden stroke to
//! its drop location, both routed around the pallets and the boxes placed by
//! earlier batches. The job ends with a stroke back to home.

use crate::constraint::DEFAULT_NEGLIGIBLE_FRACTION;
use crate::detour::{DetourContext, DEFAULT_CLEARANCE_MARGIN, DEFAULT_ERROR_RADIUS_FACTOR};
use crate::error::{ParameterError, ParameterResult, PlannerResult};
use crate::route::{PathRouter, Route, DEFAULT_MAX_DETOURS};
use crate::PathStrategy;
use palletkit_core::{
    ActionTag, BoxDimensions, BoxPath, BoxTransfer, CartesianCoordinate, Coordinate, ObstacleCylinder,
    ObstacleOrigin, SavedPalletConfiguration, SpeedClass, Waypoint, POSITION_TOLERANCE,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Default number of boxes planned before their footprints become obstacles.
pub const DEFAULT_BATCH_SIZE: usize = 20;

/// Clearance radius assumed for a carried box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoxRadiusMode {
    /// The payload is treated as a point; only its height is accounted for
    #[default]
    Zero,
    /// Half the footprint diagonal of the carried box
    Footprint,
}

impl BoxRadiusMode {
    pub fn radius(&self, dimensions: &BoxDimensions) -> f64 {
        match self {
            BoxRadiusMode::Zero => 0.0,
            BoxRadiusMode::Footprint => dimensions.footprint_radius(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            BoxRadiusMode::Zero => "zero",
            BoxRadiusMode::Footprint => "footprint",
        }
    }
}

/// Parameters for the optimized strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OptimizerParameters {
    /// Clearance radius used for laden strokes
    pub box_radius_mode: BoxRadiusMode,
    /// Height kept above an obstacle top when hopping over it (mm)
    pub clearance_margin: f64,
    /// Boxes planned before their footprints are added to the obstacles
    pub batch_size: usize,
    /// Violations spanning less than this share of the reach are ignored
    pub negligible_fraction: f64,
    /// Growth of the reach used to place hop points
    pub error_radius_factor: f64,
    /// Detours allowed per stroke before falling back to the home plane
    pub max_detours: usize,
    /// Where the job starts and ends
    pub home: Coordinate,
}

impl Default for OptimizerParameters {
    fn default() -> Self {
        Self {
            box_radius_mode: BoxRadiusMode::Zero,
            clearance_margin: DEFAULT_CLEARANCE_MARGIN,
            batch_size: DEFAULT_BATCH_SIZE,
            negligible_fraction: DEFAULT_NEGLIGIBLE_FRACTION,
            error_radius_factor: DEFAULT_ERROR_RADIUS_FACTOR,
            max_detours: DEFAULT_MAX_DETOURS,
            home: Coordinate::default(),
        }
    }
}

impl OptimizerParameters {
    pub fn validate(&self) -> ParameterResult<()> {
        ParameterError::check_range("clearance_margin", self.clearance_margin, 0.0, 10_000.0)?;
        ParameterError::check_range("batch_size", self.batch_size as f64, 1.0, 100_000.0)?;
        ParameterError::check_range("negligible_fraction", self.negligible_fraction, 0.0, 1.0)?;
        ParameterError::check_range("error_radius_factor", self.error_radius_factor, 1.0, 10.0)?;
        if self.home.z.is_nan() || self.home.z < 0.0 {
            return Err(ParameterError::InvalidValue {
                name: "home".to_string(),
                reason: format!("z must be at or below the home plane, got {}", self.home.z),
            });
        }
        Ok(())
    }

    fn detour_context(&self, box_radius: f64) -> DetourContext {
        DetourContext {
            box_radius,
            clearance_margin: self.clearance_margin,
            error_radius_factor: self.error_radius_factor,
            negligible_fraction: self.negligible_fraction,
            may_rise: true,
        }
    }
}

/// What happened while planning one box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPlanTrace {
    /// Position of the transfer in the job
    pub transfer_index: usize,
    pub box_index: usize,
    pub pallet_index: usize,
    pub stack_index: usize,
    /// Obstacles active while the laden stroke was routed
    pub obstacles: Vec<ObstacleOrigin>,
    /// Detours inserted into the approach and laden strokes
    pub detours: usize,
    /// A stroke ran out of detour budget
    pub fell_back: bool,
}

/// Motion program plus the per-box trace.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedPlan {
    pub paths: Vec<BoxPath>,
    pub trace: Vec<BoxPlanTrace>,
}

impl OptimizedPlan {
    pub fn total_detours(&self) -> usize {
        self.trace.iter().map(|t| t.detours).sum()
    }
}

/// Generator for obstacle-aware palletizing paths
pub struct OptimizedPathGenerator {
    params: OptimizerParameters,
}

impl OptimizedPathGenerator {
    pub fn new(params: OptimizerParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &OptimizerParameters {
        &self.params
    }

    /// Generate the motion program for `config`
    pub fn generate(&self, config: &SavedPalletConfiguration) -> PlannerResult<Vec<BoxPath>> {
        Ok(self.plan(config)?.paths)
    }

    /// Generate the motion program together with the per-box trace
    pub fn plan(&self, config: &SavedPalletConfiguration) -> PlannerResult<OptimizedPlan> {
        self.params.validate()?;
        config.validate()?;

        let transfers = &config.box_coordinates;
        let mut plan = OptimizedPlan {
            paths: Vec::with_capacity(transfers.len() * 2 + 1),
            trace: Vec::with_capacity(transfers.len()),
        };
        if transfers.is_empty() {
            info!("Job '{}' has no boxes, nothing to plan", config.config.name);
            return Ok(plan);
        }

        let mut obstacles: Vec<ObstacleCylinder> = config
            .pallets()
            .iter()
            .enumerate()
            .map(|(i, pallet)| pallet.obstacle(i))
            .collect();

        let mut cursor = self.params.home;
        // Layers without boxes are skipped rather than ending the job.
        let layers: BTreeSet<usize> = transfers.iter().map(|t| t.stack_index).collect();

        for stack_index in layers {
            let mut layer: Vec<usize> = (0..transfers.len())
                .filter(|&i| transfers[i].stack_index == stack_index)
                .collect();
            layer.sort_by(|&a, &b| {
                transfers[b]
                    .linear_path_distance
                    .total_cmp(&transfers[a].linear_path_distance)
            });

            for batch in layer.chunks(self.params.batch_size) {
                for &index in batch {
                    cursor = self.plan_box(index, &transfers[index], cursor, &obstacles, &mut plan)?;
                }
                obstacles.extend(batch.iter().map(|&i| transfers[i].top_obstacle(i)));
            }
        }

        let home = self.params.home;
        let router = PathRouter::new(
            &obstacles,
            0.0,
            self.params.detour_context(0.0),
            self.params.max_detours,
        );
        let route = router.route(cursor.cartesian(), home.cartesian());
        let mut waypoints = intermediate(&route)
            .iter()
            .map(|&p| Waypoint::new(Coordinate::from_cartesian(p, cursor.theta), SpeedClass::Fast))
            .collect::<Vec<_>>();
        waypoints.push(Waypoint::new(home, SpeedClass::Fast));
        plan.paths.push(BoxPath::new(waypoints)?);

        info!(
            "Planned job '{}': {} boxes, {} strokes, {} detours, {} obstacles",
            config.config.name,
            plan.trace.len(),
            plan.paths.len(),
            plan.total_detours(),
            obstacles.len()
        );
        Ok(plan)
    }

    /// Plan the approach and laden strokes of one box; returns the new cursor
    fn plan_box(
        &self,
        index: usize,
        transfer: &BoxTransfer,
        cursor: Coordinate,
        obstacles: &[ObstacleCylinder],
        plan: &mut OptimizedPlan,
    ) -> PlannerResult<Coordinate> {
        let pick = transfer.pick_location;
        let drop = transfer.drop_location;

        let unladen = PathRouter::new(
            obstacles,
            0.0,
            self.params.detour_context(0.0),
            self.params.max_detours,
        );
        let approach = unladen.route(cursor.cartesian(), pick.cartesian());
        let mut waypoints: Vec<Waypoint> = intermediate(&approach)
            .iter()
            .map(|&p| Waypoint::new(Coordinate::from_cartesian(p, cursor.theta), SpeedClass::Fast))
            .collect();
        waypoints.push(
            Waypoint::new(pick, SpeedClass::Fast)
                .with_action(ActionTag::DetectBox)
                .with_box_detection(transfer.box_detection.clone()),
        );
        waypoints.push(Waypoint::new(pick, SpeedClass::Slow).with_action(ActionTag::Pick));
        plan.paths.push(BoxPath::new(waypoints)?);

        let box_radius = self.params.box_radius_mode.radius(&transfer.dimensions);
        let laden = PathRouter::new(
            obstacles,
            transfer.dimensions.height,
            self.params.detour_context(box_radius),
            self.params.max_detours,
        );
        let carry = laden.route(pick.cartesian(), drop.cartesian());
        let mut rotated = false;
        let mut waypoints: Vec<Waypoint> = intermediate(&carry)
            .iter()
            .map(|&p| {
                rotated = rotated || !p.same_column(&pick.cartesian(), POSITION_TOLERANCE);
                let theta = if rotated { drop.theta } else { pick.theta };
                Waypoint::new(Coordinate::from_cartesian(p, theta), SpeedClass::Slow)
            })
            .collect();
        waypoints.push(Waypoint::new(drop, SpeedClass::Slow).with_action(ActionTag::Drop));
        plan.paths.push(BoxPath::new(waypoints)?);

        debug!(
            "Box {} (transfer {}, pallet {}, stack {}): {} approach and {} laden waypoint(s), {} detour(s)",
            transfer.box_index,
            index,
            transfer.pallet_index,
            transfer.stack_index,
            approach.points.len() - 1,
            carry.points.len() - 1,
            approach.detours + carry.detours
        );

        plan.trace.push(BoxPlanTrace {
            transfer_index: index,
            box_index: transfer.box_index,
            pallet_index: transfer.pallet_index,
            stack_index: transfer.stack_index,
            obstacles: laden.origins(),
            detours: approach.detours + carry.detours,
            fell_back: approach.fell_back || carry.fell_back,
        });
        Ok(drop)
    }
}

impl PathStrategy for OptimizedPathGenerator {
    fn name(&self) -> &'static str {
        "optimized"
    }

    fn generate(&self, config: &SavedPalletConfiguration) -> PlannerResult<Vec<BoxPath>> {
        OptimizedPathGenerator::generate(self, config)
    }
}

/// Route points strictly between the start and the end
fn intermediate(route: &Route) -> &[CartesianCoordinate] {
    let n = route.points.len();
    if n < 2 {
        return &[];
    }
    &route.points[1..n - 1]
}
