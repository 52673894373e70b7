use core::fmt;
use smallvec::SmallVec;

use crate::NEUMANN_OFFSETS;

/// A coordinate on an [OccupancyGrid](crate::OccupancyGrid), addressed by row first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Cell {
        Cell { row, col }
    }

    /// Moves by a signed offset. Returns [None] if either coordinate would drop below zero;
    /// the upper bound is left to the grid.
    pub fn offset(&self, d_row: isize, d_col: isize) -> Option<Cell> {
        Some(Cell {
            row: self.row.checked_add_signed(d_row)?,
            col: self.col.checked_add_signed(d_col)?,
        })
    }

    /// The 4-connected neighbours in the fixed order of [NEUMANN_OFFSETS].
    pub fn neumann_neighborhood(&self) -> SmallVec<[Cell; 4]> {
        NEUMANN_OFFSETS
            .iter()
            .filter_map(|&(d_row, d_col)| self.offset(d_row, d_col))
            .collect()
    }

    pub fn manhattan_distance(&self, other: &Cell) -> usize {
        self.row.abs_diff(other.row) + self.col.abs_diff(other.col)
    }
}

impl From<(usize, usize)> for Cell {
    fn from((row, col): (usize, usize)) -> Cell {
        Cell { row, col }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
