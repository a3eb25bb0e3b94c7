//! Configuration types for the simulation.

use crate::{Element, Error, Position, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Smallest grid that still has an interior inside the wall border
pub const MIN_DIMENSION: i32 = 3;

/// Largest number of cells a grid may hold
pub const MAX_CELLS: usize = 1 << 24;

/// Number of cells in a `width` x `height` grid, rejecting sizes that
/// overflow or exceed [`MAX_CELLS`]. Dimensions below [`MIN_DIMENSION`] are
/// rejected as well.
pub fn cell_count(width: i32, height: i32) -> Result<usize> {
    if width < MIN_DIMENSION || height < MIN_DIMENSION {
        return Err(Error::InvalidConfig(format!(
            "grid must be at least {min}x{min} to hold a wall border and an interior, got {}x{}",
            width,
            height,
            min = MIN_DIMENSION
        )));
    }

    (width as usize)
        .checked_mul(height as usize)
        .filter(|&cells| cells <= MAX_CELLS)
        .ok_or_else(|| {
            Error::InvalidConfig(format!(
                "grid of {}x{} exceeds the {} cell limit",
                width, height, MAX_CELLS
            ))
        })
}

/// Cave and physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Width of the grid in cells
    pub width: i32,
    /// Height of the grid in cells
    pub height: i32,
    /// Pixel size of a cell, only used by renderers
    pub cell_size: i32,
    /// Probability an interior cell starts as wall (0.0 to 1.0)
    pub wall_probability: f64,
    /// Number of smoothing rounds applied to the initial noise
    pub smoothing_iterations: u32,
    /// Ticks a freshly created smoke cell lives
    pub smoke_lifespan: i32,
    /// Milliseconds between ticks, owned by the external clock driver
    pub tick_interval_ms: u64,
    /// Random seed for reproducibility
    pub seed: u64,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 60,
            cell_size: 10,
            wall_probability: 0.45,
            smoothing_iterations: 5,
            smoke_lifespan: 20,
            tick_interval_ms: 100,
            seed: 0,
        }
    }
}

impl CaveConfig {
    /// Reject malformed values. Nothing is clamped.
    pub fn validate(&self) -> Result<()> {
        cell_count(self.width, self.height)?;

        if !(0.0..=1.0).contains(&self.wall_probability) {
            return Err(Error::InvalidConfig(format!(
                "wall_probability must be within [0, 1], got {}",
                self.wall_probability
            )));
        }

        if self.smoke_lifespan <= 0 {
            return Err(Error::InvalidConfig(format!(
                "smoke_lifespan must be positive, got {}",
                self.smoke_lifespan
            )));
        }

        if self.cell_size <= 0 {
            return Err(Error::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }

        if self.tick_interval_ms == 0 {
            return Err(Error::InvalidConfig(
                "tick_interval_ms must be non-zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Smoke lifespan as an unsigned tick count. Only meaningful after `validate`.
    pub fn smoke_lifespan_ticks(&self) -> u32 {
        self.smoke_lifespan.max(0) as u32
    }
}

/// A scripted placement repeated every `period` generations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Emitter {
    pub position: Position,
    pub element: Element,
    /// Generations between placements
    pub period: u64,
}

/// Headless driver configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Cave configuration
    pub cave: CaveConfig,
    /// Stop after this many generations (runs until interrupted if unset)
    pub max_generations: Option<u64>,
    /// Render every N generations (0 disables rendering)
    pub render_every: u64,
    /// Scripted placements standing in for user clicks. Omitted from a config
    /// file means none, since the built-in set is laid out for the default cave.
    #[serde(default)]
    pub emitters: Vec<Emitter>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        let cave = CaveConfig::default();
        let center = cave.width / 2;
        Self {
            cave,
            max_generations: Some(500),
            render_every: 10,
            emitters: vec![
                Emitter {
                    position: Position::new(1, center - 8),
                    element: Element::Sand,
                    period: 2,
                },
                Emitter {
                    position: Position::new(1, center),
                    element: Element::Water,
                    period: 3,
                },
                Emitter {
                    position: Position::new(1, center + 8),
                    element: Element::Wood,
                    period: 7,
                },
                Emitter {
                    position: Position::new(1, center + 9),
                    element: Element::Fire,
                    period: 25,
                },
            ],
        }
    }
}

impl DriverConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: DriverConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn validate(&self) -> Result<()> {
        self.cave.validate()?;

        for emitter in &self.emitters {
            let Position { row, col } = emitter.position;
            if row < 1 || col < 1 || row >= self.cave.height - 1 || col >= self.cave.width - 1 {
                return Err(Error::InvalidConfig(format!(
                    "emitter at {} lies outside the {}x{} cave interior",
                    emitter.position, self.cave.width, self.cave.height
                )));
            }
            if !emitter.element.is_placeable() {
                return Err(Error::InvalidConfig(format!(
                    "emitter at {} uses non-placeable element {}",
                    emitter.position, emitter.element
                )));
            }
            if emitter.period == 0 {
                return Err(Error::InvalidConfig(format!(
                    "emitter at {} has a zero period",
                    emitter.position
                )));
            }
        }

        Ok(())
    }
}
