//! Ordered per-tick element passes.
//!
//! Every pass is a full scan over the interior cells. Gravity-driven passes
//! walk rows bottom-to-top, smoke walks top-to-bottom; columns always run
//! left-to-right. The wall border keeps all neighbour lookups in range.

mod fire;
mod sand;
mod smoke;
mod water;
mod wood;

pub use fire::apply_fire;
pub use sand::apply_sand;
pub use smoke::apply_smoke;
pub use water::apply_water;
pub use wood::apply_wood;

use crate::grid::Grid;
use rand::Rng;
use std::fmt;
use tracing::trace;

/// One element pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Sand,
    Water,
    Wood,
    Fire,
    Smoke,
}

impl Phase {
    /// Execution order within a tick
    pub const ORDER: [Phase; 5] = [
        Phase::Sand,
        Phase::Water,
        Phase::Wood,
        Phase::Fire,
        Phase::Smoke,
    ];
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Sand => "sand",
            Phase::Water => "water",
            Phase::Wood => "wood",
            Phase::Fire => "fire",
            Phase::Smoke => "smoke",
        };
        f.write_str(name)
    }
}

/// Runs the five passes in order against a grid
#[derive(Debug, Clone)]
pub struct PhaseEngine {
    smoke_lifespan: u32,
}

impl PhaseEngine {
    pub fn new(smoke_lifespan: u32) -> Self {
        Self { smoke_lifespan }
    }

    pub fn smoke_lifespan(&self) -> u32 {
        self.smoke_lifespan
    }

    /// Run a single pass
    pub fn run_phase<R: Rng + ?Sized>(&self, phase: Phase, grid: &mut Grid, rng: &mut R) {
        match phase {
            Phase::Sand => apply_sand(grid, rng),
            Phase::Water => apply_water(grid),
            Phase::Wood => apply_wood(grid),
            Phase::Fire => apply_fire(grid, rng, self.smoke_lifespan),
            Phase::Smoke => apply_smoke(grid, rng),
        }
    }

    /// Run all passes for one tick
    pub fn run<R: Rng + ?Sized>(&self, grid: &mut Grid, rng: &mut R) {
        for phase in Phase::ORDER {
            self.run_phase(phase, grid, rng);
            trace!(%phase, "Phase complete");
        }
    }
}

/// Pick a sideways destination column. Both open: coin flip, left on heads.
pub(crate) fn pick_side<R: Rng + ?Sized>(
    col: usize,
    left_open: bool,
    right_open: bool,
    rng: &mut R,
) -> Option<usize> {
    match (left_open, right_open) {
        (true, true) => Some(if rng.gen_bool(0.5) { col - 1 } else { col + 1 }),
        (true, false) => Some(col - 1),
        (false, true) => Some(col + 1),
        (false, false) => None,
    }
}
