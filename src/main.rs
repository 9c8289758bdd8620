use anyhow::Context;
use clap::Parser;
use palletkit::{drop_coordinates, init_logging, load_job, plan_job, write_paths, Config, StrategyKind};
use std::path::PathBuf;
use tracing::info;

/// Plan the motion program for a palletizing job
#[derive(Parser, Debug)]
#[command(name = "palletkit", version, about)]
struct Cli {
    /// Saved pallet configuration (JSON)
    input: PathBuf,

    /// Path strategy: optimized or standard (defaults to the configured one)
    #[arg(short, long)]
    strategy: Option<StrategyKind>,

    /// Planner configuration file (.toml or .json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the motion program here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    init_logging()?;
    let cli = Cli::parse();

    let settings = Config::load_or_default(cli.config.as_deref())
        .context("failed to load planner configuration")?;
    let job = load_job(&cli.input)?;

    let paths = plan_job(&job, &settings, cli.strategy)
        .with_context(|| format!("failed to plan {}", cli.input.display()))?;

    info!(
        "Planned '{}': {} strokes, {} drops",
        job.config.name,
        paths.len(),
        drop_coordinates(&paths).len()
    );

    write_paths(&paths, cli.output.as_deref())
}
