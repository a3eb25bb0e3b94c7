use super::pick_side;
use crate::grid::Grid;
use cave_core::Element;
use rand::Rng;

/// Sand sinks through water, falls into empty space, else slides diagonally.
pub fn apply_sand<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R) {
    let (rows, cols) = (grid.rows(), grid.cols());

    for row in (1..rows - 1).rev() {
        for col in 1..cols - 1 {
            if grid.at(row, col) != Element::Sand {
                continue;
            }

            let below = row + 1;
            match grid.at(below, col) {
                // Swapping carries the water's volume up into the sand's old cell
                Element::Water => grid.swap((row, col), (below, col)),
                Element::Empty => grid.relocate((row, col), (below, col)),
                _ => {
                    let left_open = grid.at(below, col - 1) == Element::Empty;
                    let right_open = grid.at(below, col + 1) == Element::Empty;
                    if let Some(target) = pick_side(col, left_open, right_open, rng) {
                        grid.relocate((row, col), (below, target));
                    }
                }
            }
        }
    }
}
