use crate::grid::Grid;
use cave_core::Element;

/// Wood falls into empty space or floats up through water, then catches fire
/// if any neighbour of its new cell is burning.
pub fn apply_wood(grid: &mut Grid) {
    let (rows, cols) = (grid.rows(), grid.cols());
    // Cells that received floating wood this pass; the scan would reach them again
    let mut floated = vec![false; rows * cols];

    for row in (1..rows - 1).rev() {
        for col in 1..cols - 1 {
            if grid.at(row, col) != Element::Wood || floated[grid.idx(row, col)] {
                continue;
            }

            let mut at_row = row;
            if grid.at(row + 1, col) == Element::Empty {
                grid.relocate((row, col), (row + 1, col));
                at_row = row + 1;
            } else if grid.at(row - 1, col) == Element::Water {
                grid.swap((row, col), (row - 1, col));
                at_row = row - 1;
                floated[grid.idx(at_row, col)] = true;
            }

            if grid.neighbours_contain(at_row, col, Element::Fire) {
                grid.put(at_row, col, Element::Fire);
            }
        }
    }
}
