//! Fill-fraction water flow.
//!
//! Flow is computed against a working copy of the volume array and committed
//! at the end of the pass. Eligibility of target cells uses the kinds as they
//! were when the pass started.

use crate::grid::Grid;
use cave_core::{Element, WATER_CAPACITY};

/// Committed volumes below this are treated as dry
const DRY_EPSILON: f64 = 1e-12;

pub fn apply_water(grid: &mut Grid) {
    let (rows, cols) = (grid.rows(), grid.cols());
    let mut volume = grid.water.clone();

    for row in (1..rows - 1).rev() {
        for col in 1..cols - 1 {
            let here = grid.idx(row, col);
            if volume[here] <= 0.0 {
                continue;
            }

            // Downward, limited by the room left below
            let below = grid.idx(row + 1, col);
            let below_open = grid.at(row + 1, col).accepts_water();
            if below_open {
                let room = WATER_CAPACITY - volume[below];
                if room > 0.0 {
                    let moved = volume[here].min(room);
                    volume[below] += moved;
                    volume[here] -= moved;
                }
            }

            // Sideways onto the diagonal-below cells
            if volume[here] > 0.0 && (!below_open || volume[below] >= WATER_CAPACITY) {
                spread_diagonally(grid, &mut volume, row, col);
            }

            // Overflow: one cell up, whatever does not fit is lost
            if volume[here] > WATER_CAPACITY {
                let excess = volume[here] - WATER_CAPACITY;
                volume[here] = WATER_CAPACITY;

                let above = grid.idx(row - 1, col);
                if grid.at(row - 1, col).accepts_water() {
                    let room = WATER_CAPACITY - volume[above];
                    if room > 0.0 {
                        volume[above] += excess.min(room);
                    }
                }
            }
        }
    }

    commit(grid, &volume);
}

fn spread_diagonally(grid: &Grid, volume: &mut [f64], row: usize, col: usize) {
    let here = grid.idx(row, col);
    let left = grid.idx(row + 1, col - 1);
    let right = grid.idx(row + 1, col + 1);

    let room = |i: usize| (WATER_CAPACITY - volume[i]).max(0.0);
    let left_room = room(left);
    let right_room = room(right);
    let left_open = grid.at(row + 1, col - 1).accepts_water() && left_room > 0.0;
    let right_open = grid.at(row + 1, col + 1).accepts_water() && right_room > 0.0;

    let remaining = volume[here];
    let (to_left, to_right) = match (left_open, right_open) {
        (true, true) => {
            let half = remaining / 2.0;
            (half.min(left_room), half.min(right_room))
        }
        (true, false) => (remaining.min(left_room), 0.0),
        (false, true) => (0.0, remaining.min(right_room)),
        (false, false) => return,
    };

    volume[left] += to_left;
    volume[right] += to_right;
    volume[here] -= to_left + to_right;
}

/// Write the working volumes back and settle cell kinds
fn commit(grid: &mut Grid, volume: &[f64]) {
    let (rows, cols) = (grid.rows(), grid.cols());

    for row in 1..rows - 1 {
        for col in 1..cols - 1 {
            let i = grid.idx(row, col);
            let mut settled = volume[i].clamp(0.0, WATER_CAPACITY);
            if settled < DRY_EPSILON {
                settled = 0.0;
            }

            grid.water[i] = settled;
            if settled > 0.0 {
                grid.kinds[i] = Element::Water;
            } else if grid.kinds[i] == Element::Water {
                grid.kinds[i] = Element::Empty;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::phases::test_support::*;

    fn set_volume(grid: &mut Grid, row: usize, col: usize, volume: f64) {
        let i = grid.idx(row, col);
        grid.kinds[i] = Element::Water;
        grid.water[i] = volume;
    }

    #[test]
    fn test_water_falls_into_empty_cell() {
        let mut grid = grid_from(&[
            "#####",
            "# o #",
            "#   #",
            "#####",
        ]);
        apply_water(&mut grid);

        assert_eq!(kind_at(&grid, 1, 2), Element::Empty);
        assert_eq!(volume_at(&grid, 1, 2), 0.0);
        assert_eq!(kind_at(&grid, 2, 2), Element::Water);
        assert_eq!(volume_at(&grid, 2, 2), 1.0);
    }

    #[test]
    fn test_downward_flow_is_capacity_limited() {
        let mut grid = grid_from(&[
            "#####",
            "# o #",
            "##o##",
            "#####",
        ]);
        set_volume(&mut grid, 1, 2, 0.5);
        set_volume(&mut grid, 2, 2, 0.8);

        apply_water(&mut grid);

        assert!((volume_at(&grid, 2, 2) - 1.0).abs() < 1e-12);
        assert!((volume_at(&grid, 1, 2) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_blocked_water_splits_to_diagonals() {
        let mut grid = grid_from(&[
            "#####",
            "# o #",
            "# # #",
            "#   #",
            "#####",
        ]);
        apply_water(&mut grid);

        assert_eq!(kind_at(&grid, 1, 2), Element::Empty);
        assert!((volume_at(&grid, 2, 1) - 0.5).abs() < 1e-12);
        assert!((volume_at(&grid, 2, 3) - 0.5).abs() < 1e-12);
        assert_eq!(kind_at(&grid, 2, 1), Element::Water);
        assert_eq!(kind_at(&grid, 2, 3), Element::Water);
    }

    #[test]
    fn test_split_respects_each_side_capacity() {
        let mut grid = grid_from(&[
            "#####",
            "# o #",
            "# # #",
            "#####",
        ]);
        set_volume(&mut grid, 2, 1, 0.8);
        set_volume(&mut grid, 2, 3, 0.1);

        apply_water(&mut grid);

        // Left only had room for 0.2, right took its full half
        assert!((volume_at(&grid, 2, 1) - 1.0).abs() < 1e-12);
        assert!((volume_at(&grid, 2, 3) - 0.6).abs() < 1e-12);
        assert!((volume_at(&grid, 1, 2) - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_full_diagonal_is_not_eligible() {
        let mut grid = grid_from(&[
            "#####",
            "# o #",
            "#o# #",
            "#####",
        ]);
        apply_water(&mut grid);

        // Left is saturated, so the whole remainder goes right
        assert_eq!(volume_at(&grid, 2, 1), 1.0);
        assert!((volume_at(&grid, 2, 3) - 1.0).abs() < 1e-12);
        assert_eq!(kind_at(&grid, 1, 2), Element::Empty);
    }

    #[test]
    fn test_water_stays_when_nowhere_to_go() {
        let mut grid = grid_from(&[
            "#####",
            "# o #",
            "#.#=#",
            "#####",
        ]);
        let before = grid.clone();
        apply_water(&mut grid);
        assert_eq!(grid, before);
    }

    #[test]
    fn test_overflow_under_wall_ceiling_discards_excess() {
        let mut grid = grid_from(&[
            "#####",
            "#   #",
            "#####",
        ]);
        set_volume(&mut grid, 1, 2, 1.2);
        let before = grid.census().total_water;

        apply_water(&mut grid);

        assert_eq!(volume_at(&grid, 1, 2), 1.0);
        let after = grid.census().total_water;
        assert!((before - after - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_overflow_fills_only_spare_capacity_above() {
        let mut grid = grid_from(&[
            "#####",
            "#   #",
            "## ##",
            "#####",
        ]);
        set_volume(&mut grid, 2, 2, 1.3);
        set_volume(&mut grid, 1, 2, 0.9);

        apply_water(&mut grid);

        // 0.3 excess: 0.1 fits above, 0.2 is discarded
        assert_eq!(volume_at(&grid, 2, 2), 1.0);
        assert!((volume_at(&grid, 1, 2) - 1.0).abs() < 1e-12);
        let total = grid.census().total_water;
        assert!((total - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_flow_conserves_volume_without_overflow() {
        let mut grid = grid_from(&[
            "#######",
            "# ooo #",
            "#  #  #",
            "#     #",
            "#######",
        ]);
        let before = grid.census().total_water;
        for _ in 0..10 {
            apply_water(&mut grid);
            let after = grid.census().total_water;
            assert!((before - after).abs() < 1e-9);
        }
    }

    #[test]
    fn test_commit_keeps_volume_and_kind_in_step() {
        let mut grid = grid_from(&[
            "#######",
            "# ooo #",
            "#  #  #",
            "#     #",
            "#######",
        ]);
        for _ in 0..5 {
            apply_water(&mut grid);
            for (_, cell) in grid.iter() {
                assert_eq!(cell.water_volume > 0.0, cell.kind == Element::Water);
                assert!(cell.water_volume <= WATER_CAPACITY);
            }
        }
    }
}
