//! Cave simulation engine.
//!
//! This crate implements the walled 2D grid, the cave generator, the ordered
//! element passes, and the clock that advances them one generation at a time.

pub mod generator;
pub mod grid;
pub mod phases;
pub mod simulation;

pub use generator::CaveGenerator;
pub use grid::Grid;
pub use phases::{Phase, PhaseEngine};
pub use simulation::Simulation;
