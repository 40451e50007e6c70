use rand::Rng;

use super::{cell::Cell, grid::Grid};

/// The apple: a single cell the snake grows by eating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Food {
    position: Cell,
}

impl Food {
    pub fn at(position: Cell) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Cell {
        self.position
    }

    pub fn is_at(&self, cell: Cell) -> bool {
        self.position == cell
    }

    /// Move to a random cell strictly inside the border, other than the current one.
    ///
    /// The snake's body is not avoided. The grid must have at least one interior cell;
    /// with exactly one the apple stays put.
    pub fn relocate<R: Rng + ?Sized>(&mut self, grid: &Grid, rng: &mut R) {
        let single_cell = grid.interior_cols().count() * grid.interior_rows().count() <= 1;
        loop {
            let col = rng.gen_range(grid.interior_cols());
            let row = rng.gen_range(grid.interior_rows());
            let candidate = Cell::new(col, row);
            if candidate != self.position || single_cell {
                self.position = candidate;
                return;
            }
        }
    }
}
