use core::fmt;
use log::debug;
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::error::GridError;
use crate::Cell;

/// Whether a cell can be stepped on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum CellState {
    #[default]
    Free,
    Blocked,
}

impl CellState {
    pub fn is_free(self) -> bool {
        self == CellState::Free
    }
}

/// `true` marks an occupied cell.
impl From<bool> for CellState {
    fn from(blocked: bool) -> CellState {
        if blocked {
            CellState::Blocked
        } else {
            CellState::Free
        }
    }
}

/// [OccupancyGrid] stores a rectangular, row-major array of [CellState] values together with
/// information about 4-connected components kept in a [UnionFind] structure.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    height: usize,
    width: usize,
    cells: Vec<CellState>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl OccupancyGrid {
    /// A `height` by `width` grid where every cell has the given state.
    pub fn new(height: usize, width: usize, state: CellState) -> Result<OccupancyGrid, GridError> {
        if height == 0 {
            return Err(GridError::NoRows);
        }
        if width == 0 {
            return Err(GridError::NoColumns);
        }
        let size = Self::checked_size(height, width)?;
        let mut grid = OccupancyGrid {
            height,
            width,
            cells: vec![state; size],
            components: UnionFind::new(size),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    /// Number of cells, provided the cells and their union-find both fit in memory.
    fn checked_size(height: usize, width: usize) -> Result<usize, GridError> {
        let max_cells = isize::MAX as usize / (2 * std::mem::size_of::<usize>());
        height
            .checked_mul(width)
            .filter(|&size| size <= max_cells)
            .ok_or(GridError::TooLarge { height, width })
    }

    /// Builds a grid from rows of states, rejecting empty and jagged input.
    pub fn from_rows<R>(rows: &[R]) -> Result<OccupancyGrid, GridError>
    where
        R: AsRef<[CellState]>,
    {
        let width = rows.first().ok_or(GridError::NoRows)?.as_ref().len();
        if width == 0 {
            return Err(GridError::NoColumns);
        }
        let size = Self::checked_size(rows.len(), width)?;
        let mut cells = Vec::with_capacity(size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != width {
                return Err(GridError::JaggedRow {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            cells.extend_from_slice(values);
        }
        let mut grid = OccupancyGrid {
            height: rows.len(),
            width,
            cells,
            components: UnionFind::new(size),
            components_dirty: false,
        };
        grid.generate_components();
        Ok(grid)
    }

    /// Builds a grid from integer markers where `1` is traversable and `0` is an obstacle.
    pub fn from_markers<R>(rows: &[R]) -> Result<OccupancyGrid, GridError>
    where
        R: AsRef<[i64]>,
    {
        let states = rows
            .iter()
            .enumerate()
            .map(|(row, markers)| {
                markers
                    .as_ref()
                    .iter()
                    .enumerate()
                    .map(|(col, &marker)| match marker {
                        1 => Ok(CellState::Free),
                        0 => Ok(CellState::Blocked),
                        _ => Err(GridError::UnknownMarker {
                            cell: Cell::new(row, col),
                            marker,
                        }),
                    })
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        OccupancyGrid::from_rows(&states)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.height && cell.col < self.width
    }

    fn ix(&self, cell: Cell) -> usize {
        cell.row * self.width + cell.col
    }

    /// The state of `cell`, or [None] outside the grid.
    pub fn get(&self, cell: Cell) -> Option<CellState> {
        if self.in_bounds(cell) {
            Some(self.cells[self.ix(cell)])
        } else {
            None
        }
    }

    /// Whether `cell` is inside the grid and free.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.get(cell).is_some_and(CellState::is_free)
    }

    /// Changes the state of `cell` and returns what it was, or [None] without touching
    /// anything when `cell` lies outside the grid. Freeing a cell merges it with its free
    /// neighbours right away; blocking a free cell may split a region, so the components are
    /// only marked stale until the next [update](Self::update).
    pub fn set(&mut self, cell: Cell, state: CellState) -> Option<CellState> {
        let previous = self.get(cell)?;
        if state == CellState::Blocked {
            if previous.is_free() {
                self.components_dirty = true;
            }
        } else {
            let cell_ix = self.ix(cell);
            for n in self.free_neighbours(cell) {
                let n_ix = self.ix(n);
                self.components.union(cell_ix, n_ix);
            }
        }
        let ix = self.ix(cell);
        self.cells[ix] = state;
        Some(previous)
    }

    /// Free, in-bounds 4-connected neighbours of `cell` in the fixed expansion order.
    pub fn free_neighbours(&self, cell: Cell) -> SmallVec<[Cell; 4]> {
        cell.neumann_neighborhood()
            .into_iter()
            .filter(|n| self.is_free(*n))
            .collect()
    }

    /// Iterates over all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Cell, CellState)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(ix, state)| (Cell::new(ix / self.width, ix % self.width), *state))
    }

    /// Representative index of the region containing `cell`; two cells share a region
    /// exactly when their representatives are equal. Panics if `cell` is outside the grid.
    pub fn get_component(&self, cell: Cell) -> usize {
        self.components.find(self.ix(cell))
    }

    /// True when both cells are free and a chain of free 4-connected steps links them,
    /// according to the last component build. Cells outside the grid are never reachable.
    pub fn reachable(&self, start: Cell, goal: Cell) -> bool {
        self.is_free(start)
            && self.is_free(goal)
            && self.components.equiv(self.ix(start), self.ix(goal))
    }

    pub fn unreachable(&self, start: Cell, goal: Cell) -> bool {
        !self.reachable(start, goal)
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up free neighbours to the same components.
    pub fn generate_components(&mut self) {
        debug!(
            "Generating connected components for {}x{} grid",
            self.height, self.width
        );
        self.components = UnionFind::new(self.height * self.width);
        self.components_dirty = false;
        for row in 0..self.height {
            for col in 0..self.width {
                let cell = Cell::new(row, col);
                if !self.is_free(cell) {
                    continue;
                }
                // Looking right and down covers every edge once.
                for n in [Cell::new(row, col + 1), Cell::new(row + 1, col)] {
                    if self.is_free(n) {
                        let (cell_ix, n_ix) = (self.ix(cell), self.ix(n));
                        self.components.union(cell_ix, n_ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line = row
                .iter()
                .map(|s| if s.is_free() { '.' } else { '#' })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
