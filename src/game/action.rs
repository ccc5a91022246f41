use serde::{Deserialize, Serialize};

/// Per-tick displacement of a segment, one grid cell at most on each axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Velocity {
    pub dx: i32,
    pub dy: i32,
}

impl Velocity {
    pub const ZERO: Velocity = Velocity { dx: 0, dy: 0 };

    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }

    pub fn is_zero(&self) -> bool {
        self.dx == 0 && self.dy == 0
    }

    /// Returns true if other points exactly the other way along the same axis
    pub fn is_reverse_of(&self, other: Velocity) -> bool {
        !self.is_zero() && self.dx == -other.dx && self.dy == -other.dy
    }
}

/// Direction the player can steer the head in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    pub fn velocity(&self) -> Velocity {
        let (dx, dy) = self.delta();
        Velocity::new(dx, dy)
    }
}
