use std::{
    fs::File,
    path::{Path, PathBuf},
    sync::Mutex,
};

use anyhow::{Context, Result};
use clap::Parser;
use grid_snake::game::GameConfig;
use grid_snake::modes::PlayMode;
use tracing::info;

#[derive(Parser)]
#[command(name = "grid_snake")]
#[command(version, about = "Classic snake on a bordered grid")]
struct Cli {
    /// Drawing surface width; the grid is this divided by the cell size
    #[arg(long)]
    width: Option<u32>,

    /// Drawing surface height
    #[arg(long)]
    height: Option<u32>,

    /// JSON file overriding the default game configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for reproducible apple placement
    #[arg(long)]
    seed: Option<u64>,

    /// Write logs to this file (filtered by RUST_LOG)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_tracing(path: &Path) -> Result<()> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("Failed to install log subscriber")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The terminal belongs to the game, so logs only go to a file when asked
    if let Some(path) = &cli.log_file {
        init_tracing(path)?;
    }

    let mut config = match &cli.config {
        Some(path) => GameConfig::from_json_file(path)?,
        None => GameConfig::default(),
    };
    if let Some(width) = cli.width {
        config.surface_width = width;
    }
    if let Some(height) = cli.height {
        config.surface_height = height;
    }
    config.validate().context("Invalid game configuration")?;

    info!(?config, seed = ?cli.seed, "Launching");

    let mut play = PlayMode::new(config, cli.seed);
    play.run().await?;

    Ok(())
}
