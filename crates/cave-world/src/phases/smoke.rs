use super::pick_side;
use crate::grid::Grid;
use cave_core::Element;
use rand::Rng;

/// Smoke ages by one tick, then rises or drifts sideways into empty space.
pub fn apply_smoke<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let (rows, cols) = (grid.rows(), grid.cols());
    // Cells that received smoke drifting right; the scan would reach them again
    let mut drifted = vec![false; rows * cols];

    for row in 1..rows - 1 {
        for col in 1..cols - 1 {
            let i = grid.idx(row, col);
            if grid.at(row, col) != Element::Smoke || drifted[i] {
                continue;
            }

            let life = grid.smoke_life[i].saturating_sub(1);
            if life == 0 {
                grid.clear(row, col);
                continue;
            }
            grid.smoke_life[i] = life;

            if grid.at(row - 1, col) == Element::Empty {
                grid.relocate((row, col), (row - 1, col));
                continue;
            }

            let left_open = grid.at(row, col - 1) == Element::Empty;
            let right_open = grid.at(row, col + 1) == Element::Empty;
            if let Some(target) = pick_side(col, left_open, right_open, rng) {
                grid.relocate((row, col), (row, target));
                drifted[grid.idx(row, target)] = true;
            }
        }
    }
}
