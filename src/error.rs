use core::fmt;
use thiserror::Error;

use crate::Cell;

/// Rejections raised while building an [OccupancyGrid](crate::OccupancyGrid).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid has no rows")]
    NoRows,
    #[error("grid has no columns")]
    NoColumns,
    #[error("row {row} has {found} columns, expected {expected}")]
    JaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("a {height}x{width} grid is too large to allocate")]
    TooLarge { height: usize, width: usize },
    #[error("unknown marker {marker} at {cell}, expected 1 (free) or 0 (blocked)")]
    UnknownMarker { cell: Cell, marker: i64 },
}

/// Which end of a search a [PathError::OutOfBounds] refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Failures of [PathFinder::find_path](crate::PathFinder::find_path). Not finding a path is
/// not one of them; that is an empty path.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("{endpoint} {cell} lies outside the {height}x{width} grid")]
    OutOfBounds {
        endpoint: Endpoint,
        cell: Cell,
        height: usize,
        width: usize,
    },
    #[error("search cancelled after {expanded} expansions")]
    Cancelled { expanded: usize },
    #[error("search hit the limit of {limit} expansions")]
    ExpansionLimit { limit: usize },
}
