//! Population statistics for a grid.

use crate::Element;
use serde::{Deserialize, Serialize};

/// Cell counts per element plus total water volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Census {
    counts: [usize; 7],
    /// Sum of all water fill fractions
    pub total_water: f64,
}

impl Census {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, kind: Element, water_volume: f64) {
        self.counts[kind.index()] += 1;
        self.total_water += water_volume;
    }

    pub fn count(&self, kind: Element) -> usize {
        self.counts[kind.index()]
    }

    pub fn total_cells(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Cells holding something other than empty space or rock
    pub fn active_cells(&self) -> usize {
        self.total_cells() - self.count(Element::Empty) - self.count(Element::Wall)
    }
}
