use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use super::state::Position;

/// Reasons a configuration or a prepared board cannot start a game
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("grid size must be at least {min}, got {got}")]
    GridTooSmall { min: usize, got: usize },
    #[error("grid size must be at most {max}, got {got}")]
    GridTooLarge { max: usize, got: usize },
    #[error("start cell ({x}, {y}) lies outside a {size}x{size} grid")]
    StartOutOfBounds { x: i32, y: i32, size: usize },
    #[error("tick rate must be a positive number of frames per second, got {0}")]
    InvalidTickRate(f64),
    #[error("cell width must be at least one character")]
    InvalidCellWidth,
    #[error("a snake needs at least a head segment")]
    EmptySnake,
    #[error("segment {index} at ({x}, {y}) lies outside the grid")]
    SegmentOutOfBounds { index: usize, x: i32, y: i32 },
    #[error("food at ({x}, {y}) lies outside the grid")]
    FoodOutOfBounds { x: i32, y: i32 },
}

/// RGB colors used when drawing the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Palette {
    pub head: [u8; 3],
    pub body: [u8; 3],
    pub food: [u8; 3],
    pub background: [u8; 3],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            head: [0, 255, 0],
            body: [0, 255, 0],
            food: [255, 0, 0],
            background: [0, 0, 0],
        }
    }
}

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid, in cells
    pub grid_size: usize,
    /// End the run when the head leaves the grid instead of wrapping it
    pub hard_walls: bool,
    /// Enables the force-clear-food key
    pub debug: bool,
    /// Simulation frames per second driven by the terminal loop
    pub tick_rate_hz: f64,
    /// Terminal characters per grid cell, horizontally
    pub cell_width: u16,
    /// Head cell at game start; the grid center when unset
    pub start: Option<Position>,
    /// Fixed seed for food placement; drawn from entropy when unset
    pub seed: Option<u64>,
    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 41,
            hard_walls: false,
            debug: false,
            tick_rate_hz: 15.0,
            cell_width: 2,
            start: None,
            seed: None,
            palette: Palette::default(),
        }
    }
}

impl GameConfig {
    pub const MIN_GRID_SIZE: usize = 2;
    /// Keeps the board width within a terminal's u16 column range
    pub const MAX_GRID_SIZE: usize = 1024;

    /// Create a new configuration with custom grid size and wall policy
    pub fn new(grid_size: usize, hard_walls: bool) -> Self {
        Self {
            grid_size,
            hard_walls,
            ..Default::default()
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, false)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Head cell at game start
    pub fn start(&self) -> Position {
        self.start.unwrap_or_else(|| {
            let center = (self.grid_size / 2) as i32;
            Position::new(center, center)
        })
    }

    /// Grid side as a coordinate value
    pub fn side(&self) -> i32 {
        self.grid_size as i32
    }

    pub fn contains(&self, pos: Position) -> bool {
        let side = self.side();
        (0..side).contains(&pos.x) && (0..side).contains(&pos.y)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size < Self::MIN_GRID_SIZE {
            return Err(ConfigError::GridTooSmall {
                min: Self::MIN_GRID_SIZE,
                got: self.grid_size,
            });
        }

        if self.grid_size > Self::MAX_GRID_SIZE {
            return Err(ConfigError::GridTooLarge {
                max: Self::MAX_GRID_SIZE,
                got: self.grid_size,
            });
        }

        let start = self.start();
        if !self.contains(start) {
            return Err(ConfigError::StartOutOfBounds {
                x: start.x,
                y: start.y,
                size: self.grid_size,
            });
        }

        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(ConfigError::InvalidTickRate(self.tick_rate_hz));
        }

        if self.cell_width == 0 {
            return Err(ConfigError::InvalidCellWidth);
        }

        Ok(())
    }

    /// Load a configuration from a JSON file; missing fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {:?}", path))?;
        Ok(config)
    }
}
