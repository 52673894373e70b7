use grid_astar::{Cell, CellState, LogReporter, OccupancyGrid, PathFinder, ProgressReporter};

// In this example a path is found on a 3x3 grid with shape
//  ___
// |S  |
// | # |
// |  E|
//  ___
// where
// - # marks an obstacle
// - S marks the start
// - E marks the end
//
// Nodes have a 4-neighborhood. Status lines go to stdout and to the log facade.

struct Console;

impl ProgressReporter for Console {
    fn report(&mut self, status: &str) {
        println!("> {}", status);
        LogReporter.report(status);
    }
}

fn main() {
    let mut grid = OccupancyGrid::new(3, 3, CellState::Free).unwrap();
    grid.set(Cell::new(1, 1), CellState::Blocked);
    grid.update();
    println!("{}", grid);
    let start = Cell::new(0, 0);
    let end = Cell::new(2, 2);
    let path = PathFinder::new()
        .find_path(&grid, start, end, &mut Console)
        .unwrap();
    println!("Path:");
    for p in path {
        println!("{}", p);
    }
}
