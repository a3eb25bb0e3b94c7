//! Cave layout generation: random noise smoothed by a binary automaton.

use crate::grid::Grid;
use cave_core::{CaveConfig, Element, Result};
use rand::Rng;
use tracing::debug;

/// Wall cells survive a smoothing round with at least this many wall neighbours
const WALL_SURVIVAL_MIN: u8 = 2;
/// Empty cells turn to wall with at least this many wall neighbours
const WALL_BIRTH_MIN: u8 = 6;

#[derive(Debug, Clone)]
pub struct CaveGenerator {
    pub wall_probability: f64,
    pub smoothing_iterations: u32,
}

impl CaveGenerator {
    pub fn new(wall_probability: f64, smoothing_iterations: u32) -> Self {
        Self {
            wall_probability,
            smoothing_iterations,
        }
    }

    pub fn from_config(config: &CaveConfig) -> Self {
        Self::new(config.wall_probability, config.smoothing_iterations)
    }

    /// Seed the interior with walls and run the smoothing rounds
    pub fn generate<R: Rng + ?Sized>(&self, width: i32, height: i32, rng: &mut R) -> Result<Grid> {
        let mut grid = Grid::new(width, height)?;
        let (rows, cols) = (grid.rows(), grid.cols());

        for row in 1..rows - 1 {
            for col in 1..cols - 1 {
                if rng.gen::<f64>() < self.wall_probability {
                    grid.put(row, col, Element::Wall);
                }
            }
        }

        for _ in 0..self.smoothing_iterations {
            smooth(&mut grid);
        }

        debug!(
            width,
            height,
            walls = grid.census().count(Element::Wall),
            rounds = self.smoothing_iterations,
            "Generated cave"
        );

        Ok(grid)
    }
}

/// One smoothing round, reading from a full copy of the previous kinds
fn smooth(grid: &mut Grid) {
    let previous = grid.kinds.clone();
    let (rows, cols) = (grid.rows(), grid.cols());

    for row in 1..rows - 1 {
        for col in 1..cols - 1 {
            let walls = Grid::wall_neighbours(&previous, cols, row, col);
            let was_wall = previous[row * cols + col] == Element::Wall;
            let wall = if was_wall {
                walls >= WALL_SURVIVAL_MIN
            } else {
                walls >= WALL_BIRTH_MIN
            };
            grid.put(row, col, if wall { Element::Wall } else { Element::Empty });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cave_core::Position;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn border_is_wall(grid: &Grid) -> bool {
        grid.positions()
            .filter(|p| grid.is_border(*p))
            .all(|p| grid.kind(p) == Some(Element::Wall))
    }

    #[test]
    fn test_generation_is_deterministic() {
        let generator = CaveGenerator::new(0.45, 5);
        let a = generator
            .generate(40, 30, &mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();
        let b = generator
            .generate(40, 30, &mut ChaCha8Rng::seed_from_u64(42))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_only_walls_and_empty() {
        let generator = CaveGenerator::new(0.45, 5);
        let grid = generator
            .generate(40, 30, &mut ChaCha8Rng::seed_from_u64(7))
            .unwrap();

        assert!(border_is_wall(&grid));
        for (_, cell) in grid.iter() {
            assert!(matches!(cell.kind, Element::Wall | Element::Empty));
            assert_eq!(cell.water_volume, 0.0);
            assert_eq!(cell.smoke_life, 0);
            assert!(!cell.smoke_dark);
        }
    }

    #[test]
    fn test_zero_probability_gives_open_cave() {
        let generator = CaveGenerator::new(0.0, 5);
        let grid = generator
            .generate(12, 9, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();

        // Corners of the interior touch 5 border walls and stay open
        assert_eq!(grid.kind(Position::new(1, 1)), Some(Element::Empty));
        assert_eq!(grid.kind(Position::new(4, 5)), Some(Element::Empty));
        assert!(border_is_wall(&grid));
    }

    #[test]
    fn test_full_probability_gives_solid_rock() {
        let generator = CaveGenerator::new(1.0, 5);
        let grid = generator
            .generate(12, 9, &mut ChaCha8Rng::seed_from_u64(1))
            .unwrap();
        assert_eq!(grid.census().count(Element::Wall), 12 * 9);
    }

    #[test]
    fn test_smoothing_rules() {
        let mut grid = Grid::new(7, 7).unwrap();
        // Isolated wall with a single wall neighbour dies
        grid.put(3, 3, Element::Wall);
        grid.put(3, 4, Element::Wall);
        // Empty cell at (1, 1) touches five border walls: stays empty
        smooth(&mut grid);

        assert_eq!(grid.at(3, 3), Element::Empty);
        assert_eq!(grid.at(3, 4), Element::Empty);
        assert_eq!(grid.at(1, 1), Element::Empty);
    }

    #[test]
    fn test_smoothing_birth() {
        let mut grid = Grid::new(7, 7).unwrap();
        // (1, 1) has 5 border walls; one more interior wall makes 6
        grid.put(2, 2, Element::Wall);
        grid.put(2, 3, Element::Wall);
        smooth(&mut grid);

        assert_eq!(grid.at(1, 1), Element::Wall);
        // (2, 2) had one wall neighbour in the copy and dies
        assert_eq!(grid.at(2, 2), Element::Empty);
    }
}
