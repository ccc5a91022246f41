//! Core game logic module for Snake
//!
//! This module contains all the simulation logic without any I/O or rendering
//! dependencies. A driver calls [`SimulationEngine::tick`] once per frame and
//! draws the returned [`Snapshot`].

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Direction, Velocity};
pub use config::{ConfigError, GameConfig, Palette};
pub use engine::SimulationEngine;
pub use state::{same_cell, Food, GameOverCause, Position, Segment, Snapshot};
