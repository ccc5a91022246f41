use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;
use wrap_snake::game::GameConfig;
use wrap_snake::modes::HumanMode;

#[derive(Parser)]
#[command(name = "wrap_snake")]
#[command(version, about = "Snake on a wrap-around or walled grid")]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Side length of the square grid, in cells
    #[arg(long)]
    grid_size: Option<usize>,

    /// End the game when the head leaves the grid
    #[arg(long)]
    hard_walls: bool,

    /// Enable debug key bindings (Space drops the food)
    #[arg(long)]
    debug: bool,

    /// Simulation frames per second
    #[arg(long)]
    tick_rate: Option<f64>,

    /// Seed for food placement
    #[arg(long)]
    seed: Option<u64>,

    /// Terminal characters per grid cell
    #[arg(long)]
    cell_width: Option<u16>,

    /// Write logs to this file (the terminal is taken by the game)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn game_config(&self) -> Result<GameConfig> {
        let mut config = match &self.config {
            Some(path) => GameConfig::from_json_file(path)?,
            None => GameConfig::default(),
        };

        if let Some(grid_size) = self.grid_size {
            config.grid_size = grid_size;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate_hz = tick_rate;
        }
        if let Some(cell_width) = self.cell_width {
            config.cell_width = cell_width;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        config.hard_walls |= self.hard_walls;
        config.debug |= self.debug;

        Ok(config)
    }
}

fn init_tracing(log_file: Option<&Path>) -> Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };

    let file = File::create(path)
        .with_context(|| format!("Failed to create log file {:?}", path))?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow::anyhow!("Failed to install tracing subscriber: {err}"))?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_file.as_deref())?;

    let config = cli.game_config()?;

    let mut human_mode = HumanMode::new(config)?;
    human_mode.run().await?;

    Ok(())
}
