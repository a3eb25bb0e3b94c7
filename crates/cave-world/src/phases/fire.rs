use crate::grid::Grid;
use cave_core::Element;
use rand::seq::SliceRandom;
use rand::Rng;

/// Fire drops into empty space or consumes wood below it; with nowhere to go
/// it burns out into light smoke.
pub fn apply_fire<R: Rng + ?Sized>(grid: &mut Grid, rng: &mut R, smoke_life: u32) {
    let (rows, cols) = (grid.rows(), grid.cols());

    for row in (1..rows - 1).rev() {
        for col in 1..cols - 1 {
            if grid.at(row, col) != Element::Fire {
                continue;
            }

            let below = row + 1;
            let mut candidates = [col - 1, col, col + 1];
            candidates.shuffle(rng);

            let target = candidates
                .iter()
                .copied()
                .find(|&c| matches!(grid.at(below, c), Element::Empty | Element::Wood));

            match target {
                Some(c) if grid.at(below, c) == Element::Wood => {
                    grid.put_smoke(below, c, smoke_life, true);
                    grid.clear(row, col);
                }
                Some(c) => grid.relocate((row, col), (below, c)),
                None => grid.put_smoke(row, col, smoke_life, false),
            }
        }
    }
}
