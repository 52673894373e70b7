use log::{debug, info, warn};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::astar::{astar, SearchOutcome};
use crate::error::{Endpoint, PathError};
use crate::heuristic::euclidean_distance;
use crate::progress::ProgressReporter;
use crate::{is_contiguous, Cell, OccupancyGrid, UNIT_STEP_COST};

pub const STATUS_PATH_FOUND: &str = "Path found!";
pub const STATUS_NO_PATH: &str = "No path found!";

/// Shared flag that lets another thread abandon a running search.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// A* on an [OccupancyGrid] with 4-connected unit-cost moves and a
/// [Euclidean](https://en.wikipedia.org/wiki/Euclidean_distance) heuristic.
#[derive(Clone, Debug)]
pub struct PathFinder {
    /// Scales the heuristic. Above 1.0 this is weighted A*, which expands fewer cells but
    /// may return longer paths.
    pub heuristic_factor: f64,
    /// Abandons the search once this many cells have been expanded.
    pub max_expansions: Option<usize>,
    pub cancel_token: Option<CancelToken>,
}

impl Default for PathFinder {
    fn default() -> PathFinder {
        PathFinder {
            heuristic_factor: 1.0,
            max_expansions: None,
            cancel_token: None,
        }
    }
}

impl PathFinder {
    pub fn new() -> PathFinder {
        PathFinder::default()
    }

    fn check_bounds(
        grid: &OccupancyGrid,
        cell: Cell,
        endpoint: Endpoint,
    ) -> Result<(), PathError> {
        if grid.in_bounds(cell) {
            Ok(())
        } else {
            Err(PathError::OutOfBounds {
                endpoint,
                cell,
                height: grid.height(),
                width: grid.width(),
            })
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel_token
            .as_ref()
            .is_some_and(CancelToken::is_cancelled)
    }

    fn heuristic(&self, cell: &Cell, goal: &Cell) -> f64 {
        euclidean_distance(cell, goal) * self.heuristic_factor
    }

    /// Computes a shortest 4-connected path from `start` to `goal`, both included.
    ///
    /// An empty path means the goal cannot be reached; this includes a blocked start or goal.
    /// If `start == goal` the single-cell path is returned without looking at the cell.
    /// Endpoints outside the grid are rejected before anything is reported. Otherwise the
    /// reporter hears about the start of the search and then exactly one of
    /// [STATUS_PATH_FOUND] or [STATUS_NO_PATH], unless the search is cancelled or runs into
    /// [max_expansions](Self::max_expansions).
    ///
    /// Among equally short paths, the one whose cells were discovered first wins: the frontier
    /// is ordered by estimated total cost, then by insertion order, and neighbours are
    /// generated right, down, left, up.
    pub fn find_path<R>(
        &self,
        grid: &OccupancyGrid,
        start: Cell,
        goal: Cell,
        reporter: &mut R,
    ) -> Result<Vec<Cell>, PathError>
    where
        R: ProgressReporter + ?Sized,
    {
        Self::check_bounds(grid, start, Endpoint::Start)?;
        Self::check_bounds(grid, goal, Endpoint::Goal)?;
        reporter.report(&format!("Start location is {}", start));

        if start == goal {
            reporter.report(STATUS_PATH_FOUND);
            return Ok(vec![start]);
        }
        if !grid.is_free(start) || !grid.is_free(goal) {
            debug!("Start {} or goal {} is blocked", start, goal);
            reporter.report(STATUS_NO_PATH);
            return Ok(Vec::new());
        }

        let outcome = astar(
            &start,
            |cell| {
                grid.free_neighbours(*cell)
                    .into_iter()
                    .map(|n| (n, UNIT_STEP_COST))
            },
            |cell| self.heuristic(cell, &goal),
            |cell| *cell == goal,
            |expanded| {
                self.is_cancelled() || self.max_expansions.is_some_and(|limit| expanded >= limit)
            },
        );

        match outcome {
            SearchOutcome::Found {
                path,
                cost,
                expanded,
            } => {
                debug_assert!(is_contiguous(&path));
                info!(
                    "Found path from {} to {} in {} steps after {} expansions",
                    start, goal, cost, expanded
                );
                debug!("Reconstructed path: {:?}", path);
                reporter.report(STATUS_PATH_FOUND);
                Ok(path)
            }
            SearchOutcome::Exhausted { expanded } => {
                info!(
                    "{} is not reachable from {} ({} expansions)",
                    goal, start, expanded
                );
                reporter.report(STATUS_NO_PATH);
                Ok(Vec::new())
            }
            SearchOutcome::Interrupted { expanded } => match self.max_expansions {
                Some(limit) if !self.is_cancelled() => {
                    warn!(
                        "Search from {} to {} hit the expansion limit of {}",
                        start, goal, limit
                    );
                    Err(PathError::ExpansionLimit { limit })
                }
                _ => {
                    warn!("Search from {} to {} cancelled", start, goal);
                    Err(PathError::Cancelled { expanded })
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellState::{self, Blocked as B, Free as F};

    fn open_grid(height: usize, width: usize) -> OccupancyGrid {
        OccupancyGrid::new(height, width, CellState::Free).unwrap()
    }

    fn run(
        finder: &PathFinder,
        grid: &OccupancyGrid,
        start: Cell,
        goal: Cell,
    ) -> (Result<Vec<Cell>, PathError>, Vec<String>) {
        let mut statuses = Vec::new();
        let result = finder.find_path(grid, start, goal, &mut |s: &str| {
            statuses.push(s.to_owned())
        });
        (result, statuses)
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        let grid = open_grid(1, 1);
        let start = Cell::new(0, 0);
        let (path, statuses) = run(&PathFinder::new(), &grid, start, start);
        assert_eq!(path.unwrap(), vec![start]);
        assert_eq!(statuses, vec!["Start location is (0, 0)", STATUS_PATH_FOUND]);
    }

    #[test]
    fn equal_start_goal_on_blocked_cell() {
        let grid = OccupancyGrid::from_rows(&[[B]]).unwrap();
        let cell = Cell::new(0, 0);
        let (path, _) = run(&PathFinder::new(), &grid, cell, cell);
        assert_eq!(path.unwrap(), vec![cell]);
    }

    /// Asserts that the optimal 4 step solution is found around an obstacle.
    #[test]
    fn solve_simple_problem() {
        //  S..
        //  .#.
        //  ..G
        let grid = OccupancyGrid::from_rows(&[[F, F, F], [F, B, F], [F, F, F]]).unwrap();
        let (path, _) = run(
            &PathFinder::new(),
            &grid,
            Cell::new(0, 0),
            Cell::new(2, 2),
        );
        let path = path.unwrap();
        assert_eq!(path.len(), 5);
        assert!(is_contiguous(&path));
        assert!(path.iter().all(|c| grid.is_free(*c)));
    }

    #[test]
    fn blocked_endpoints_give_empty_path() {
        let grid = OccupancyGrid::from_rows(&[[B, F, F], [F, F, B]]).unwrap();
        let finder = PathFinder::new();
        for (start, goal) in [
            (Cell::new(0, 0), Cell::new(1, 1)),
            (Cell::new(1, 1), Cell::new(1, 2)),
        ] {
            let (path, statuses) = run(&finder, &grid, start, goal);
            assert!(path.unwrap().is_empty());
            assert_eq!(statuses.len(), 2);
            assert_eq!(statuses[1], STATUS_NO_PATH);
        }
    }

    #[test]
    fn out_of_bounds_is_rejected_silently() {
        let grid = open_grid(2, 3);
        let (result, statuses) = run(
            &PathFinder::new(),
            &grid,
            Cell::new(0, 0),
            Cell::new(0, 3),
        );
        assert_eq!(
            result.unwrap_err(),
            PathError::OutOfBounds {
                endpoint: Endpoint::Goal,
                cell: Cell::new(0, 3),
                height: 2,
                width: 3
            }
        );
        assert!(statuses.is_empty());

        let (result, _) = run(
            &PathFinder::new(),
            &grid,
            Cell::new(2, 0),
            Cell::new(0, 0),
        );
        assert!(matches!(
            result,
            Err(PathError::OutOfBounds {
                endpoint: Endpoint::Start,
                ..
            })
        ));
    }

    #[test]
    fn enclosed_goal_reports_failure_once() {
        //  ....
        //  .###
        //  .#G#
        //  .###
        let grid = OccupancyGrid::from_rows(&[
            [F, F, F, F],
            [F, B, B, B],
            [F, B, F, B],
            [F, B, B, B],
        ])
        .unwrap();
        let (path, statuses) = run(
            &PathFinder::new(),
            &grid,
            Cell::new(0, 0),
            Cell::new(2, 2),
        );
        assert!(path.unwrap().is_empty());
        assert_eq!(
            statuses.iter().filter(|s| s.as_str() == STATUS_NO_PATH).count(),
            1
        );
        assert!(!statuses.iter().any(|s| s == STATUS_PATH_FOUND));
    }

    #[test]
    fn expansion_limit_interrupts() {
        let grid = open_grid(1, 5);
        let start = Cell::new(0, 0);
        let goal = Cell::new(0, 4);
        // Four expansions suffice on a single row; the goal itself is never expanded.
        let finder = PathFinder {
            max_expansions: Some(4),
            ..PathFinder::new()
        };
        assert_eq!(run(&finder, &grid, start, goal).0.unwrap().len(), 5);

        let finder = PathFinder {
            max_expansions: Some(3),
            ..PathFinder::new()
        };
        let (result, statuses) = run(&finder, &grid, start, goal);
        assert_eq!(result.unwrap_err(), PathError::ExpansionLimit { limit: 3 });
        assert_eq!(statuses.len(), 1);
    }

    #[test]
    fn cancelled_token_stops_search() {
        let token = CancelToken::new();
        let finder = PathFinder {
            cancel_token: Some(token.clone()),
            max_expansions: Some(100),
            ..PathFinder::new()
        };
        let grid = open_grid(4, 4);
        token.cancel();
        let (result, _) = run(&finder, &grid, Cell::new(0, 0), Cell::new(3, 3));
        assert_eq!(result.unwrap_err(), PathError::Cancelled { expanded: 0 });
    }

    /// Weighted A* still returns a valid path, though not necessarily a shortest one.
    #[test]
    fn heuristic_factor() {
        let grid = open_grid(12, 12);
        let finder = PathFinder {
            heuristic_factor: 1.5,
            ..PathFinder::new()
        };
        let (path, _) = run(&finder, &grid, Cell::new(0, 0), Cell::new(11, 7));
        let path = path.unwrap();
        assert!(is_contiguous(&path));
        assert_eq!(path.first(), Some(&Cell::new(0, 0)));
        assert_eq!(path.last(), Some(&Cell::new(11, 7)));
    }

    #[test]
    fn works_with_log_reporter() {
        let grid = open_grid(3, 3);
        let mut reporter = crate::LogReporter;
        let path = PathFinder::new()
            .find_path(&grid, Cell::new(2, 0), Cell::new(0, 2), &mut reporter)
            .unwrap();
        assert_eq!(path.len(), 5);
    }
}
