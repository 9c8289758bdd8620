//! # PalletKit
//!
//! Collision-avoiding path planner for gantry palletizing robots.
//!
//! Given a job (pallets plus the boxes to move onto them) PalletKit produces
//! the ordered motion program the robot executes: one stroke per move, each a
//! list of waypoints tagged with the gripper action and speed class.
//!
//! ## Architecture
//!
//! PalletKit is organized as a workspace with multiple crates:
//!
//! 1. **palletkit-core** - Coordinates, job model, waypoints and box paths
//! 2. **palletkit-planner** - Geometry, obstacle avoidance, both strategies
//! 3. **palletkit-settings** - Planner configuration persistence
//! 4. **palletkit** - Main binary that integrates all crates
//!
//! ## Strategies
//!
//! - **optimized**: layer by layer, batched, with detours around placed boxes
//! - **standard**: banded grid order with a fixed transit height

use anyhow::Context;
use std::fs;
use std::path::Path;

pub use palletkit_core::{
    drop_coordinates, ActionTag, BoxPath, BoxTransfer, ConfigurationError, Coordinate,
    PalletGeometry, SavedPalletConfiguration, SpeedClass, Waypoint,
};

pub use palletkit_planner::{
    GridParameters, GridPathGenerator, OptimizedPathGenerator, OptimizerParameters,
    PathStrategy, PlannerError, PlannerResult, StrategyKind,
};

pub use palletkit_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, so stdout stays free for the motion program
/// - RUST_LOG environment variable support
pub fn init_logging() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_thread_ids(true)
        .with_line_number(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .context("failed to install the tracing subscriber")?;

    Ok(())
}

/// Read a saved pallet configuration from a JSON file
pub fn load_job(path: &Path) -> anyhow::Result<SavedPalletConfiguration> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read job file {}", path.display()))?;
    let job: SavedPalletConfiguration = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse job file {}", path.display()))?;
    Ok(job)
}

/// Plan `job` with `strategy`, or the strategy configured in `settings`
pub fn plan_job(
    job: &SavedPalletConfiguration,
    settings: &Config,
    strategy: Option<StrategyKind>,
) -> PlannerResult<Vec<BoxPath>> {
    let strategy = settings.strategy(strategy);
    tracing::debug!(
        "Planning '{}' with the {} strategy",
        job.config.name,
        strategy.name()
    );
    strategy.generate(job)
}

/// Write the motion program as pretty JSON to `output`, or stdout
pub fn write_paths(paths: &[BoxPath], output: Option<&Path>) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(paths).context("failed to serialize box paths")?;
    match output {
        Some(path) => fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
