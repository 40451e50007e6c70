use serde::{Deserialize, Serialize};

use super::direction::Direction;

/// One discrete unit of the grid, addressed by column and row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// The neighbouring cell one unit away in `direction`
    pub fn step(&self, direction: Direction) -> Self {
        let (dc, dr) = direction.delta();
        Self {
            col: self.col + dc,
            row: self.row + dr,
        }
    }
}
