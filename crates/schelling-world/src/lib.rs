//! World simulation engine.
//!
//! This module implements the square grid world and the synchronized
//! relocation step of Schelling's segregation model.

pub mod grid;
pub mod simulation;

pub use grid::Grid;
pub use simulation::{classify, satisfaction_pass, RunSummary, Simulation, StepStats};
