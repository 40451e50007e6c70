use std::ops::RangeInclusive;

use super::cell::Cell;

/// Playable area measured in cells; the outermost ring of cells is the border
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
}

impl Grid {
    pub fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Derive the grid from a drawing surface and the size of one cell on it.
    ///
    /// Cell counts beyond `i32::MAX` saturate.
    pub fn from_surface(surface_width: u32, surface_height: u32, cell_size: u32) -> Self {
        let cells = |extent: u32| i32::try_from(extent / cell_size).unwrap_or(i32::MAX);
        Self::new(cells(surface_width), cells(surface_height))
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn contains(&self, cell: Cell) -> bool {
        (0..self.width).contains(&cell.col) && (0..self.height).contains(&cell.row)
    }

    /// True for cells on column 0, row 0, the last column or the last row
    pub fn is_border(&self, cell: Cell) -> bool {
        cell.col == 0 || cell.row == 0 || cell.col == self.width - 1 || cell.row == self.height - 1
    }

    pub fn interior_cols(&self) -> RangeInclusive<i32> {
        1..=self.width - 2
    }

    pub fn interior_rows(&self) -> RangeInclusive<i32> {
        1..=self.height - 2
    }

    pub fn has_interior(&self) -> bool {
        self.width >= 3 && self.height >= 3
    }
}
