//! # grid_astar
//!
//! Shortest paths on occupancy grids using the
//! [A* search algorithm](https://en.wikipedia.org/wiki/A*_search_algorithm). Movement is
//! 4-connected with unit step cost and the heuristic is the straight-line distance, so the
//! returned paths have the minimum number of steps. Searches are deterministic: neighbours are
//! generated in a fixed order and ties in the frontier are broken by insertion order.
//!
//! ```
//! use grid_astar::{Cell, CellState, OccupancyGrid, PathFinder};
//!
//! let grid = OccupancyGrid::new(1, 5, CellState::Free).unwrap();
//! let path = PathFinder::new()
//!     .find_path(&grid, Cell::new(0, 0), Cell::new(0, 4), &mut |_: &str| {})
//!     .unwrap();
//! assert_eq!(path.len(), 5);
//! ```
mod astar;
pub mod cell;
pub mod error;
pub mod heuristic;
pub mod occupancy_grid;
pub mod path_finder;
pub mod progress;

pub use crate::cell::Cell;
pub use crate::error::{Endpoint, GridError, PathError};
pub use crate::occupancy_grid::{CellState, OccupancyGrid};
pub use crate::path_finder::{CancelToken, PathFinder};
pub use crate::progress::{LogReporter, ProgressReporter};

use itertools::Itertools;

/// Cost of a single move between neighbouring cells.
pub const UNIT_STEP_COST: u32 = 1;
/// Row and column offsets of the 4-neighbourhood in expansion order: right, down, left, up.
pub const NEUMANN_OFFSETS: [(isize, isize); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

/// Checks that every consecutive pair of cells is one 4-connected step apart.
pub fn is_contiguous(path: &[Cell]) -> bool {
    path.iter()
        .tuple_windows()
        .all(|(a, b)| a.manhattan_distance(b) == 1)
}

/// Number of moves along a path.
pub fn path_steps(path: &[Cell]) -> usize {
    path.len().saturating_sub(1)
}
