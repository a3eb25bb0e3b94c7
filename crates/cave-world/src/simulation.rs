//! Simulation clock: owns the grid and advances it one generation per tick.

use crate::generator::CaveGenerator;
use crate::grid::Grid;
use crate::phases::PhaseEngine;
use cave_core::{CaveConfig, Cell, Census, Element, Position, Result, WATER_CAPACITY};
use parking_lot::RwLock;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use tracing::{debug, info, instrument, trace};

/// Generations between summary log lines in `run`
const SUMMARY_INTERVAL: u64 = 100;

pub struct Simulation {
    grid: Arc<RwLock<Grid>>,
    engine: PhaseEngine,
    config: CaveConfig,
    rng: ChaCha8Rng,
    generation: u64,
}

impl Simulation {
    /// Validate the configuration and generate a fresh cave from its seed
    pub fn new(config: CaveConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = CaveGenerator::from_config(&config).generate(
            config.width,
            config.height,
            &mut rng,
        )?;

        info!(
            width = config.width,
            height = config.height,
            seed = config.seed,
            "Cave simulation created"
        );

        Ok(Self::assemble(config, grid, rng))
    }

    /// Start from an existing grid. The config's dimensions are taken from the grid.
    pub fn with_grid(mut config: CaveConfig, mut grid: Grid) -> Result<Self> {
        config.width = grid.width;
        config.height = grid.height;
        config.validate()?;
        grid.seal_border();

        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Ok(Self::assemble(config, grid, rng))
    }

    fn assemble(config: CaveConfig, grid: Grid, rng: ChaCha8Rng) -> Self {
        Self {
            grid: Arc::new(RwLock::new(grid)),
            engine: PhaseEngine::new(config.smoke_lifespan_ticks()),
            config,
            rng,
            generation: 0,
        }
    }

    /// Advance one generation: all five passes under a single write lock
    pub fn tick(&mut self) -> u64 {
        {
            let mut grid = self.grid.write();
            self.engine.run(&mut grid, &mut self.rng);
        }
        self.generation += 1;
        trace!(generation = self.generation, "Tick complete");
        self.generation
    }

    /// Advance `ticks` generations, logging a census periodically
    #[instrument(skip(self), fields(start = self.generation))]
    pub fn run(&mut self, ticks: u64) -> u64 {
        for _ in 0..ticks {
            let generation = self.tick();
            if generation % SUMMARY_INTERVAL == 0 {
                self.log_census();
            }
        }
        self.generation
    }

    /// Drop a user element onto an empty interior cell.
    ///
    /// Occupied, out-of-range, and non-placeable requests are ignored.
    pub fn place(&mut self, pos: Position, element: Element) -> bool {
        if !element.is_placeable() {
            trace!(%pos, %element, "Placement rejected: element not placeable");
            return false;
        }

        let mut grid = self.grid.write();
        match grid.kind(pos) {
            Some(Element::Empty) => {}
            Some(occupant) => {
                trace!(%pos, %element, %occupant, "Placement rejected: cell occupied");
                return false;
            }
            None => {
                trace!(%pos, %element, "Placement rejected: out of bounds");
                return false;
            }
        }

        let cell = match element {
            Element::Water => Cell::water(WATER_CAPACITY),
            Element::Smoke => Cell::smoke(self.engine.smoke_lifespan(), false),
            other => Cell::of(other),
        };
        grid.set(pos, cell)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn config(&self) -> &CaveConfig {
        &self.config
    }

    /// Shared handle for readers between ticks
    pub fn grid(&self) -> Arc<RwLock<Grid>> {
        self.grid.clone()
    }

    /// Consistent copy of the grid
    pub fn snapshot(&self) -> Grid {
        self.grid.read().clone()
    }

    pub fn cell(&self, pos: Position) -> Option<Cell> {
        self.grid.read().cell(pos)
    }

    pub fn kind(&self, pos: Position) -> Option<Element> {
        self.grid.read().kind(pos)
    }

    pub fn water_volume(&self, pos: Position) -> Option<f64> {
        self.grid.read().water_volume(pos)
    }

    pub fn smoke_life(&self, pos: Position) -> Option<u32> {
        self.grid.read().smoke_life(pos)
    }

    pub fn is_dark_smoke(&self, pos: Position) -> Option<bool> {
        self.grid.read().is_dark_smoke(pos)
    }

    pub fn census(&self) -> Census {
        self.grid.read().census()
    }

    fn log_census(&self) {
        let census = self.census();
        debug!(
            generation = self.generation,
            sand = census.count(Element::Sand),
            water_cells = census.count(Element::Water),
            water_volume = census.total_water,
            wood = census.count(Element::Wood),
            fire = census.count(Element::Fire),
            smoke = census.count(Element::Smoke),
            "Census"
        );
    }
}
