//! Wrap Snake - a terminal Snake game on a wrap-around or walled grid
//!
//! This library provides:
//! - Core simulation (game module), free of any I/O
//! - Key translation and per-frame input draining (input module)
//! - TUI rendering of snapshots (render module)
//! - The terminal driver loop (modes module)

pub mod game;
pub mod input;
pub mod modes;
pub mod render;
