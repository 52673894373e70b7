use crate::Cell;

/// Straight-line distance between two cells. Never exceeds the number of 4-connected steps
/// between them, so it is admissible (and consistent) for unit-cost grid search.
pub fn euclidean_distance(a: &Cell, b: &Cell) -> f64 {
    let d_row = a.row.abs_diff(b.row) as u128;
    let d_col = a.col.abs_diff(b.col) as u128;
    // Squares are summed exactly so cells at the same distance get bit-identical estimates.
    let squared = (d_row * d_row).saturating_add(d_col * d_col);
    (squared as f64).sqrt()
}
