//! # PalletKit Planner
//!
//! Path synthesis and collision avoidance for gantry palletizing robots.
//!
//! Given a resolved job (every box's pick and drop location plus the pallet
//! geometry), the planner produces the ordered motion program the executor
//! runs, one [`BoxPath`] stroke at a time.
//!
//! ## Strategies
//!
//! - **Optimized**: routes every stroke around the pallets and the boxes
//!   already placed, inserting detours where a straight move would collide
//! - **Standard**: fixed-shape paths at a transit height over a grid
//!   placement order, without obstacle math
//!
//! ## Building blocks
//!
//! - **Geometry**: travel segments and their line-circle intersections
//! - **Constraint projection**: the part of a segment inside an obstacle
//! - **Detours and routing**: worklist routing with a bounded detour count
//! - **Leveling**: removal of redundant waypoints

pub mod constraint;
pub mod detour;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod leveling;
pub mod optimized;
pub mod route;

pub use constraint::{project_constraint, EffectiveConstraint};
pub use detour::{synthesize_detour, Detour, DetourContext};
pub use error::{ParameterError, ParameterResult, PlannerError, PlannerResult};
pub use geometry::Line;
pub use grid::{GridParameters, GridPathGenerator};
pub use leveling::level_path;
pub use optimized::{
    BoxPlanTrace, BoxRadiusMode, OptimizedPathGenerator, OptimizedPlan, OptimizerParameters,
};
pub use route::{PathRouter, Route};

use palletkit_core::{BoxPath, SavedPalletConfiguration};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A way of turning a job into a motion program.
pub trait PathStrategy {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    /// Generate the ordered strokes for `config`
    fn generate(&self, config: &SavedPalletConfiguration) -> PlannerResult<Vec<BoxPath>>;
}

/// Selectable strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Optimized,
    Standard,
}

impl StrategyKind {
    /// Build the strategy with its parameters
    pub fn build(
        self,
        optimizer: &OptimizerParameters,
        grid: &GridParameters,
    ) -> Box<dyn PathStrategy> {
        match self {
            StrategyKind::Optimized => Box::new(OptimizedPathGenerator::new(optimizer.clone())),
            StrategyKind::Standard => Box::new(GridPathGenerator::new(grid.clone())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            StrategyKind::Optimized => "optimized",
            StrategyKind::Standard => "standard",
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for StrategyKind {
    type Err = ParameterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "optimized" => Ok(StrategyKind::Optimized),
            "standard" | "grid" => Ok(StrategyKind::Standard),
            other => Err(ParameterError::InvalidValue {
                name: "strategy".to_string(),
                reason: format!("unknown strategy '{other}', expected 'optimized' or 'standard'"),
            }),
        }
    }
}
