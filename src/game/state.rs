use serde::{Deserialize, Serialize};

use super::action::Velocity;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn advanced(&self, velocity: Velocity) -> Self {
        self.moved_by(velocity.dx, velocity.dy)
    }

    pub fn retreated(&self, velocity: Velocity) -> Self {
        self.moved_by(-velocity.dx, -velocity.dy)
    }

    /// Wraps each axis that left `[0, side - 1]` onto the opposite edge
    pub fn wrapped(&self, side: i32) -> Self {
        Self {
            x: wrap_axis(self.x, side),
            y: wrap_axis(self.y, side),
        }
    }
}

// Velocities are unit steps, so a coordinate is at most one cell past an edge.
fn wrap_axis(value: i32, side: i32) -> i32 {
    if value < 0 {
        side - 1
    } else if value > side - 1 {
        0
    } else {
        value
    }
}

/// Returns true if both positions name the same grid cell
pub fn same_cell(a: Position, b: Position) -> bool {
    a.x == b.x && a.y == b.y
}

/// One body unit of the snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub position: Position,
    pub velocity: Velocity,
}

impl Segment {
    pub fn new(position: Position, velocity: Velocity) -> Self {
        Self { position, velocity }
    }

    /// A segment that has not started moving
    pub fn at_rest(position: Position) -> Self {
        Self::new(position, Velocity::ZERO)
    }

    pub fn step(&mut self) {
        self.position = self.position.advanced(self.velocity);
    }
}

/// The single food item; absent until the next tick spawns it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Food {
    pub position: Position,
    pub exists: bool,
}

impl Food {
    pub fn at(position: Position) -> Self {
        Self {
            position,
            exists: true,
        }
    }

    pub fn absent() -> Self {
        Self::default()
    }
}

/// Why a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOverCause {
    /// The head left the grid with hard walls enabled
    Wall,
    /// The head ran into the body
    SelfCollision,
}

/// Read-only view of the board handed to the renderer after each tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Segment cells, head first
    pub segments: Vec<Position>,
    pub food: Position,
    pub food_exists: bool,
    pub game_over: bool,
}

impl Snapshot {
    pub fn head(&self) -> Option<Position> {
        self.segments.first().copied()
    }

    /// Check if position is covered by any non-head segment
    pub fn is_body(&self, pos: Position) -> bool {
        self.segments
            .iter()
            .skip(1)
            .any(|segment| same_cell(*segment, pos))
    }

    pub fn has_food_at(&self, pos: Position) -> bool {
        self.food_exists && same_cell(self.food, pos)
    }
}
