//! 2D cell grid with a permanent wall border.
//!
//! Cells are stored as parallel row-major arrays. Public accessors take a
//! [`Position`] and are bounds-checked; the phase passes use the crate-private
//! `(row, col)` helpers and only ever visit interior cells, so every neighbour
//! lookup stays inside the border.

use cave_core::{Cell, Census, Element, Position, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub(crate) kinds: Vec<Element>,
    pub(crate) water: Vec<f64>,
    pub(crate) smoke_life: Vec<u32>,
    pub(crate) smoke_dark: Vec<bool>,
}

impl Grid {
    /// Create a grid with an empty interior and a wall border
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let size = cave_core::cell_count(width, height)?;
        let mut grid = Self {
            width,
            height,
            kinds: vec![Element::Empty; size],
            water: vec![0.0; size],
            smoke_life: vec![0; size],
            smoke_dark: vec![false; size],
        };
        grid.seal_border();
        Ok(grid)
    }

    /// Force every border cell to wall
    pub(crate) fn seal_border(&mut self) {
        let (rows, cols) = (self.rows(), self.cols());
        for col in 0..cols {
            self.put(0, col, Element::Wall);
            self.put(rows - 1, col, Element::Wall);
        }
        for row in 0..rows {
            self.put(row, 0, Element::Wall);
            self.put(row, cols - 1, Element::Wall);
        }
    }

    /// Total number of cells, border included
    pub fn cell_count(&self) -> usize {
        self.kinds.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.row >= 0 && pos.col >= 0 && pos.row < self.height && pos.col < self.width
    }

    pub fn is_border(&self, pos: Position) -> bool {
        self.contains(pos)
            && (pos.row == 0
                || pos.col == 0
                || pos.row == self.height - 1
                || pos.col == self.width - 1)
    }

    pub fn is_interior(&self, pos: Position) -> bool {
        self.contains(pos) && !self.is_border(pos)
    }

    /// Full cell record at a position
    pub fn cell(&self, pos: Position) -> Option<Cell> {
        let i = self.checked_index(pos)?;
        Some(Cell {
            kind: self.kinds[i],
            water_volume: self.water[i],
            smoke_life: self.smoke_life[i],
            smoke_dark: self.smoke_dark[i],
        })
    }

    pub fn kind(&self, pos: Position) -> Option<Element> {
        self.checked_index(pos).map(|i| self.kinds[i])
    }

    pub fn water_volume(&self, pos: Position) -> Option<f64> {
        self.checked_index(pos).map(|i| self.water[i])
    }

    pub fn smoke_life(&self, pos: Position) -> Option<u32> {
        self.checked_index(pos).map(|i| self.smoke_life[i])
    }

    pub fn is_dark_smoke(&self, pos: Position) -> Option<bool> {
        self.checked_index(pos).map(|i| self.smoke_dark[i])
    }

    /// Overwrite an interior cell. Border and out-of-range writes are refused.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        if !self.is_interior(pos) {
            return false;
        }
        let i = self.index(pos);
        self.kinds[i] = cell.kind;
        self.water[i] = cell.water_volume;
        self.smoke_life[i] = cell.smoke_life;
        self.smoke_dark[i] = cell.smoke_dark;
        true
    }

    /// Count cells per element and total water
    pub fn census(&self) -> Census {
        let mut census = Census::new();
        for (kind, volume) in self.kinds.iter().zip(&self.water) {
            census.record(*kind, *volume);
        }
        census
    }

    /// Iterator over all positions, row-major
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.kinds.len()).map(move |i| self.index_to_pos(i))
    }

    /// Iterator over all cells with positions
    pub fn iter(&self) -> impl Iterator<Item = (Position, Cell)> + '_ {
        self.positions().filter_map(move |pos| self.cell(pos).map(|c| (pos, c)))
    }

    pub fn index_to_pos(&self, index: usize) -> Position {
        let col = (index as i32) % self.width;
        let row = (index as i32) / self.width;
        Position::new(row, col)
    }

    fn checked_index(&self, pos: Position) -> Option<usize> {
        self.contains(pos).then(|| self.index(pos))
    }

    fn index(&self, pos: Position) -> usize {
        (pos.row * self.width + pos.col) as usize
    }

    // Unchecked helpers used by the phase passes.

    pub(crate) fn rows(&self) -> usize {
        self.height as usize
    }

    pub(crate) fn cols(&self) -> usize {
        self.width as usize
    }

    #[inline]
    pub(crate) fn idx(&self, row: usize, col: usize) -> usize {
        row * self.cols() + col
    }

    #[inline]
    pub(crate) fn at(&self, row: usize, col: usize) -> Element {
        self.kinds[self.idx(row, col)]
    }

    /// Reset a cell to empty with all auxiliary fields zeroed
    pub(crate) fn clear(&mut self, row: usize, col: usize) {
        let i = self.idx(row, col);
        self.kinds[i] = Element::Empty;
        self.water[i] = 0.0;
        self.smoke_life[i] = 0;
        self.smoke_dark[i] = false;
    }

    /// Replace a cell's kind, zeroing auxiliary fields
    pub(crate) fn put(&mut self, row: usize, col: usize, kind: Element) {
        self.clear(row, col);
        let i = self.idx(row, col);
        self.kinds[i] = kind;
    }

    pub(crate) fn put_smoke(&mut self, row: usize, col: usize, life: u32, dark: bool) {
        self.put(row, col, Element::Smoke);
        let i = self.idx(row, col);
        self.smoke_life[i] = life;
        self.smoke_dark[i] = dark;
    }

    /// Move everything at `from` into `to`, leaving `from` empty
    pub(crate) fn relocate(&mut self, from: (usize, usize), to: (usize, usize)) {
        let (src, dst) = (self.idx(from.0, from.1), self.idx(to.0, to.1));
        self.kinds[dst] = self.kinds[src];
        self.water[dst] = self.water[src];
        self.smoke_life[dst] = self.smoke_life[src];
        self.smoke_dark[dst] = self.smoke_dark[src];
        self.clear(from.0, from.1);
    }

    /// Exchange the full records of two cells
    pub(crate) fn swap(&mut self, a: (usize, usize), b: (usize, usize)) {
        let (i, j) = (self.idx(a.0, a.1), self.idx(b.0, b.1));
        self.kinds.swap(i, j);
        self.water.swap(i, j);
        self.smoke_life.swap(i, j);
        self.smoke_dark.swap(i, j);
    }

    /// Whether any of the 8 neighbours of an interior cell holds `kind`
    pub(crate) fn neighbours_contain(&self, row: usize, col: usize, kind: Element) -> bool {
        cave_core::MOORE_OFFSETS.iter().any(|&(dr, dc)| {
            let r = (row as i32 + dr) as usize;
            let c = (col as i32 + dc) as usize;
            self.at(r, c) == kind
        })
    }

    /// Number of wall cells among the 8 neighbours of an interior cell
    pub(crate) fn wall_neighbours(kinds: &[Element], cols: usize, row: usize, col: usize) -> u8 {
        let mut count = 0;
        for &(dr, dc) in cave_core::MOORE_OFFSETS.iter() {
            let r = (row as i32 + dr) as usize;
            let c = (col as i32 + dc) as usize;
            if kinds[r * cols + c] == Element::Wall {
                count += 1;
            }
        }
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_creation() {
        let grid = Grid::new(10, 8).unwrap();
        assert_eq!(grid.width, 10);
        assert_eq!(grid.height, 8);
        assert_eq!(grid.kinds.len(), 80);

        let census = grid.census();
        // 2*10 + 2*6 border cells
        assert_eq!(census.count(Element::Wall), 32);
        assert_eq!(census.count(Element::Empty), 48);
    }

    #[test]
    fn test_rejects_degenerate_dimensions() {
        assert!(Grid::new(2, 10).is_err());
        assert!(Grid::new(10, 0).is_err());
        assert!(Grid::new(-4, -4).is_err());
        assert!(Grid::new(3, 3).is_ok());
    }

    #[test]
    fn test_rejects_oversized_dimensions() {
        assert!(matches!(
            Grid::new(50_000, 50_000),
            Err(cave_core::Error::InvalidConfig(_))
        ));
        assert!(Grid::new(i32::MAX, i32::MAX).is_err());
        assert_eq!(Grid::new(12, 9).unwrap().cell_count(), 108);
    }

    #[test]
    fn test_out_of_bounds_reads() {
        let grid = Grid::new(5, 5).unwrap();
        assert_eq!(grid.kind(Position::new(-1, 0)), None);
        assert_eq!(grid.kind(Position::new(0, 5)), None);
        assert_eq!(grid.cell(Position::new(5, 0)), None);
        assert_eq!(grid.kind(Position::new(0, 0)), Some(Element::Wall));
        assert_eq!(grid.kind(Position::new(2, 2)), Some(Element::Empty));
    }

    #[test]
    fn test_set_refuses_border_and_out_of_bounds() {
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(!grid.set(Position::new(0, 2), Cell::of(Element::Sand)));
        assert!(!grid.set(Position::new(2, 4), Cell::of(Element::Sand)));
        assert!(!grid.set(Position::new(9, 9), Cell::of(Element::Sand)));
        assert_eq!(grid.kind(Position::new(0, 2)), Some(Element::Wall));

        assert!(grid.set(Position::new(2, 2), Cell::water(0.4)));
        let cell = grid.cell(Position::new(2, 2)).unwrap();
        assert_eq!(cell.kind, Element::Water);
        assert_eq!(cell.water_volume, 0.4);
    }

    #[test]
    fn test_relocate_clears_source() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid.set(Position::new(2, 2), Cell::smoke(7, true));
        grid.relocate((2, 2), (1, 2));

        assert_eq!(grid.cell(Position::new(2, 2)), Some(Cell::default()));
        assert_eq!(
            grid.cell(Position::new(1, 2)),
            Some(Cell::smoke(7, true))
        );
    }

    #[test]
    fn test_neighbours_contain() {
        let mut grid = Grid::new(6, 6).unwrap();
        grid.set(Position::new(1, 1), Cell::of(Element::Fire));
        assert!(grid.neighbours_contain(2, 2, Element::Fire));
        assert!(!grid.neighbours_contain(3, 3, Element::Fire));
        // Border walls surround the corner cell
        assert!(grid.neighbours_contain(1, 1, Element::Wall));
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(7, 4).unwrap();
        for (i, pos) in grid.positions().enumerate() {
            assert_eq!(grid.index(pos), i);
        }
    }
}
