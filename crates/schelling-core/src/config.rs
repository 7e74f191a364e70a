//! Configuration types for the simulation.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// World population parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Requested number of cells; adjusted down to the nearest perfect square
    pub total_cells: usize,
    /// Fraction of cells occupied by red actors (0.0 to 1.0)
    pub frac_red: f64,
    /// Fraction of cells occupied by blue actors (0.0 to 1.0)
    pub frac_blue: f64,
}

impl WorldConfig {
    /// Side length of the adjusted square world: `floor(sqrt(total_cells))`.
    pub fn side(&self) -> usize {
        (self.total_cells as f64).sqrt().floor() as usize
    }

    /// Target actor counts for the adjusted world, as `(red, blue)`.
    ///
    /// Counts are rounded half-up, `floor(x + 0.5)`. When both rounded counts
    /// together would exceed the cell count, the blue count is clamped to the
    /// remaining capacity.
    pub fn target_counts(&self) -> (usize, usize) {
        let cells = self.side() * self.side();
        let red = round_half_up(cells as f64 * self.frac_red);
        let blue = round_half_up(cells as f64 * self.frac_blue).min(cells - red);
        (red, blue)
    }

    /// Check the population invariants.
    pub fn validate(&self) -> Result<()> {
        for (name, frac) in [("frac_red", self.frac_red), ("frac_blue", self.frac_blue)] {
            if !frac.is_finite() || !(0.0..=1.0).contains(&frac) {
                return Err(Error::InvalidConfiguration(format!(
                    "{} must be within [0.0, 1.0], got {}",
                    name, frac
                )));
            }
        }

        if self.frac_red + self.frac_blue > 1.0 {
            return Err(Error::InvalidConfiguration(format!(
                "fractions sum to {}, must not exceed 1.0",
                self.frac_red + self.frac_blue
            )));
        }

        if self.side() == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "total_cells {} yields an empty world",
                self.total_cells
            )));
        }

        Ok(())
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            total_cells: 900,
            frac_red: 0.25,
            frac_blue: 0.25,
        }
    }
}

fn round_half_up(x: f64) -> usize {
    (x + 0.5).floor() as usize
}

/// Rendering parameters for the external viewer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Width of one rendered cell, in terminal columns
    pub cell_size: u32,
    /// Delay between driver ticks, in milliseconds
    pub interval_ms: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_size: 2,
            interval_ms: 450,
        }
    }
}

/// Simulation run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Maximum number of generations to run
    pub generations: u64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Minimum fraction of same-colored neighbors for an actor to stay put
    pub threshold: f64,
    /// World configuration
    pub world: WorldConfig,
    /// Render configuration
    pub render: RenderConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            generations: 1_000,
            seed: 0,
            threshold: 0.7,
            world: WorldConfig::default(),
            render: RenderConfig::default(),
        }
    }
}
