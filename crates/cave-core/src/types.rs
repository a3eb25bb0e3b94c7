//! Core type definitions for the simulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Nominal water capacity of a single cell
pub const WATER_CAPACITY: f64 = 1.0;

/// Offsets of the 8-neighbourhood as (row, col) deltas
pub const MOORE_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Element kind occupying a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Element {
    #[default]
    Empty,
    Sand,
    Wood,
    Fire,
    Smoke,
    Water,
    Wall,
}

impl Element {
    pub const ALL: [Element; 7] = [
        Element::Empty,
        Element::Sand,
        Element::Wood,
        Element::Fire,
        Element::Smoke,
        Element::Water,
        Element::Wall,
    ];

    /// Elements a user may drop onto the grid. Wall and Empty only come from generation.
    pub fn is_placeable(self) -> bool {
        matches!(
            self,
            Element::Sand | Element::Wood | Element::Fire | Element::Smoke | Element::Water
        )
    }

    /// Whether water may flow into a cell of this kind
    pub fn accepts_water(self) -> bool {
        matches!(self, Element::Empty | Element::Water)
    }

    /// Stable index into per-kind tables
    pub fn index(self) -> usize {
        self as usize
    }

    /// Single character used by text grids
    pub fn glyph(self) -> char {
        match self {
            Element::Empty => ' ',
            Element::Sand => '.',
            Element::Wood => '=',
            Element::Fire => '*',
            Element::Smoke => '~',
            Element::Water => 'o',
            Element::Wall => '#',
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Element::Empty => "empty",
            Element::Sand => "sand",
            Element::Wood => "wood",
            Element::Fire => "fire",
            Element::Smoke => "smoke",
            Element::Water => "water",
            Element::Wall => "wall",
        };
        f.write_str(name)
    }
}

/// Grid position, row 0 is the top of the cave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Read-only view of everything stored for one cell
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Cell {
    pub kind: Element,
    pub water_volume: f64,
    pub smoke_life: u32,
    pub smoke_dark: bool,
}

impl Cell {
    pub fn of(kind: Element) -> Self {
        Self {
            kind,
            ..Default::default()
        }
    }

    pub fn water(volume: f64) -> Self {
        Self {
            kind: Element::Water,
            water_volume: volume,
            ..Default::default()
        }
    }

    pub fn smoke(life: u32, dark: bool) -> Self {
        Self {
            kind: Element::Smoke,
            smoke_life: life,
            smoke_dark: dark,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeable_elements() {
        let placeable: Vec<Element> = Element::ALL
            .iter()
            .copied()
            .filter(|e| e.is_placeable())
            .collect();
        assert_eq!(
            placeable,
            vec![
                Element::Sand,
                Element::Wood,
                Element::Fire,
                Element::Smoke,
                Element::Water
            ]
        );
    }

    #[test]
    fn test_accepts_water() {
        assert!(Element::Empty.accepts_water());
        assert!(Element::Water.accepts_water());
        assert!(!Element::Wall.accepts_water());
        assert!(!Element::Sand.accepts_water());
    }

    #[test]
    fn test_element_index_matches_all() {
        for (i, element) in Element::ALL.iter().enumerate() {
            assert_eq!(element.index(), i);
        }
    }

    #[test]
    fn test_glyphs_are_distinct() {
        let glyphs: std::collections::HashSet<char> =
            Element::ALL.iter().map(|e| e.glyph()).collect();
        assert_eq!(glyphs.len(), Element::ALL.len());
        assert_eq!(Element::Wall.glyph(), '#');
    }

    #[test]
    fn test_position_display() {
        assert_eq!(Position::new(3, 4).to_string(), "(3, 4)");
    }

    #[test]
    fn test_element_serialization() {
        let json = serde_json::to_string(&Element::Water).unwrap();
        let back: Element = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Element::Water);
    }
}
