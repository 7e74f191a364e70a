//! Simulation engine advancing the world one synchronized generation at a time.

use crate::grid::Grid;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use schelling_core::{Error, Result, RunConfig, Satisfaction};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Classify a similarity value against the satisfaction threshold.
///
/// `None` is the empty-cell sentinel and maps to `NotApplicable` regardless
/// of the threshold.
pub fn classify(similarity: Option<f64>, threshold: f64) -> Satisfaction {
    match similarity {
        None => Satisfaction::NotApplicable,
        Some(s) if s >= threshold => Satisfaction::Satisfied,
        Some(_) => Satisfaction::Unsatisfied,
    }
}

/// Classify every cell of the grid, in row-major order.
///
/// The whole pass reads one stable grid; the result is a snapshot of the
/// pre-step world and is never updated while a step mutates the grid.
pub fn satisfaction_pass(grid: &Grid, threshold: f64) -> Vec<Satisfaction> {
    grid.positions()
        .map(|pos| classify(grid.similarity(pos), threshold))
        .collect()
}

/// Summary of a single synchronized generation
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StepStats {
    pub generation: u64,
    /// Actors classified unsatisfied at the start of the step
    pub unsatisfied: usize,
    /// Swaps actually performed
    pub relocated: usize,
}

/// Result of running a simulation to completion
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RunSummary {
    pub generations: u64,
    /// Whether every actor was satisfied when the run stopped
    pub settled: bool,
}

/// The segregation simulation: a grid of actors plus a seeded RNG
pub struct Simulation {
    grid: Grid,
    config: RunConfig,
    rng: ChaCha8Rng,
    generation: u64,
}

impl Simulation {
    /// Build a freshly populated world from configuration.
    pub fn new(config: RunConfig) -> Result<Self> {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let grid = Grid::from_config(&config.world, &mut rng)?;

        let (red, blue, empty) = grid.counts();
        info!(side = grid.side(), red, blue, empty, "World initialized");

        Ok(Self {
            grid,
            config,
            rng,
            generation: 0,
        })
    }

    /// Resume from an existing grid snapshot.
    pub fn with_grid(config: RunConfig, grid: Grid) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            grid,
            config,
            rng,
            generation: 0,
        }
    }

    /// Read-only view of the current world state, for renderers.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Rendered size of one cell, for renderers.
    pub fn cell_size(&self) -> u32 {
        self.config.render.cell_size
    }

    /// Advance the world by exactly one synchronized generation.
    ///
    /// Every cell is classified against the pre-step grid, then each
    /// unsatisfied actor swaps with a vacancy drawn uniformly from the same
    /// snapshot. Neither the satisfaction states nor the vacancy list are
    /// recomputed mid-pass, so earlier swaps do not change which cells count
    /// as movers or targets later in the same pass; two movers may draw the
    /// same vacancy, in which case the second simply swaps with whatever the
    /// first left there. Each relocation is a swap, so per-color counts are
    /// preserved.
    ///
    /// Fails with `NoAvailableTarget` before any mutation when actors want to
    /// move but the grid has no vacant cell, leaving the grid in its pre-step
    /// state.
    pub fn step(&mut self, threshold: f64) -> Result<StepStats> {
        let states = satisfaction_pass(&self.grid, threshold);

        let mut movers = Vec::new();
        let mut vacancies = Vec::new();
        for (index, state) in states.iter().enumerate() {
            match state {
                Satisfaction::Unsatisfied => movers.push(self.grid.index_to_pos(index)),
                Satisfaction::NotApplicable => vacancies.push(self.grid.index_to_pos(index)),
                Satisfaction::Satisfied => {}
            }
        }

        if !movers.is_empty() && vacancies.is_empty() {
            return Err(Error::NoAvailableTarget(format!(
                "{} unsatisfied actors but no vacant cell in the world",
                movers.len()
            )));
        }

        let mut relocated = 0;
        for &source in &movers {
            if let Some(&target) = vacancies.choose(&mut self.rng) {
                self.grid.swap(source, target);
                relocated += 1;
            }
        }

        self.generation += 1;
        let stats = StepStats {
            generation: self.generation,
            unsatisfied: movers.len(),
            relocated,
        };
        debug!(
            generation = stats.generation,
            unsatisfied = stats.unsatisfied,
            relocated = stats.relocated,
            "Generation advanced"
        );

        Ok(stats)
    }

    /// Step until every actor is satisfied or the generation budget is spent.
    pub fn run(&mut self) -> Result<RunSummary> {
        info!(
            "Starting simulation for up to {} generations",
            self.config.generations
        );

        let threshold = self.config.threshold;
        for _ in 0..self.config.generations {
            let stats = self.step(threshold)?;

            if stats.generation % 100 == 0 {
                info!(
                    generation = stats.generation,
                    unsatisfied = stats.unsatisfied,
                    "Simulation progress"
                );
            }

            if stats.unsatisfied == 0 {
                info!(generation = stats.generation, "All actors satisfied");
                return Ok(RunSummary {
                    generations: stats.generation,
                    settled: true,
                });
            }
        }

        Ok(RunSummary {
            generations: self.generation,
            settled: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use schelling_core::{Cell, Position, WorldConfig};

    fn run_config(world: WorldConfig, threshold: f64, seed: u64) -> RunConfig {
        RunConfig {
            threshold,
            seed,
            world,
            ..Default::default()
        }
    }

    /// The hand-checked 3x3 world: `[[R,R,E],[E,B,E],[R,E,B]]`
    fn test_world() -> Grid {
        let mut grid = Grid::new(3);
        grid.set(Position::new(0, 0), Cell::Red);
        grid.set(Position::new(0, 1), Cell::Red);
        grid.set(Position::new(1, 1), Cell::Blue);
        grid.set(Position::new(2, 0), Cell::Red);
        grid.set(Position::new(2, 2), Cell::Blue);
        grid
    }

    #[test]
    fn test_classify() {
        assert_eq!(classify(Some(0.8), 0.7), Satisfaction::Satisfied);
        assert_eq!(classify(Some(0.7), 0.7), Satisfaction::Satisfied);
        assert_eq!(classify(Some(0.69), 0.7), Satisfaction::Unsatisfied);
        assert_eq!(classify(None, 0.0), Satisfaction::NotApplicable);
        assert_eq!(classify(None, 1.0), Satisfaction::NotApplicable);
    }

    #[test]
    fn test_satisfaction_pass_hand_checked() {
        use Satisfaction::*;

        let grid = test_world();
        let states = satisfaction_pass(&grid, 0.5);

        // (0,0) 1/2, (0,1) 1/2, (1,1) 1/4, (2,0) 0/1, (2,2) 1/1
        assert_eq!(
            states,
            vec![
                Satisfied,
                Satisfied,
                NotApplicable,
                NotApplicable,
                Unsatisfied,
                NotApplicable,
                Unsatisfied,
                NotApplicable,
                Satisfied,
            ]
        );
    }

    #[test]
    fn test_lone_actor_is_vacuously_satisfied() {
        let mut grid = Grid::new(3);
        grid.set(Position::new(1, 1), Cell::Red);

        let states = satisfaction_pass(&grid, 1.0);
        assert_eq!(states[4], Satisfaction::Satisfied);
    }

    #[test]
    fn test_step_on_empty_world_is_noop() {
        let grid = Grid::new(4);
        let mut sim = Simulation::with_grid(
            run_config(WorldConfig::default(), 0.7, 1),
            grid.clone(),
        );

        let stats = sim.step(0.7).unwrap();
        assert_eq!(stats.unsatisfied, 0);
        assert_eq!(stats.relocated, 0);
        assert_eq!(sim.grid(), &grid);
    }

    #[test]
    fn test_satisfied_actors_never_move() {
        // A 2x2 red block keeps every red satisfied at threshold 0.5; the
        // lone blue in the far corner must relocate.
        let mut grid = Grid::new(3);
        for pos in [
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 0),
            Position::new(1, 1),
        ] {
            grid.set(pos, Cell::Red);
        }
        grid.set(Position::new(2, 2), Cell::Blue);

        let mut sim = Simulation::with_grid(run_config(WorldConfig::default(), 0.5, 3), grid);
        let stats = sim.step(0.5).unwrap();

        assert_eq!(stats.unsatisfied, 1);
        assert_eq!(stats.relocated, 1);
        for pos in [
            Position::new(0, 0),
            Position::new(0, 1),
            Position::new(1, 0),
            Position::new(1, 1),
        ] {
            assert_eq!(sim.grid().get(pos), Cell::Red);
        }
        assert_eq!(sim.grid().get(Position::new(2, 2)), Cell::Empty);
        assert_eq!(sim.grid().counts(), (4, 1, 4));
    }

    #[test]
    fn test_step_preserves_counts() {
        let config = run_config(
            WorldConfig {
                total_cells: 400,
                frac_red: 0.3,
                frac_blue: 0.3,
            },
            0.7,
            42,
        );

        let mut sim = Simulation::new(config).unwrap();
        let before = sim.grid().counts();

        for _ in 0..10 {
            sim.step(0.7).unwrap();
        }
        assert_eq!(sim.grid().counts(), before);
    }

    #[test]
    fn test_full_unsatisfied_world_fails_atomically() {
        // Checkerboard with no empties: at threshold 1.0 everyone wants to
        // move and nowhere is vacant.
        let mut grid = Grid::new(2);
        grid.set(Position::new(0, 0), Cell::Red);
        grid.set(Position::new(0, 1), Cell::Blue);
        grid.set(Position::new(1, 0), Cell::Blue);
        grid.set(Position::new(1, 1), Cell::Red);

        let mut sim = Simulation::with_grid(
            run_config(WorldConfig::default(), 1.0, 5),
            grid.clone(),
        );

        let err = sim.step(1.0).unwrap_err();
        assert!(matches!(err, Error::NoAvailableTarget(_)));
        assert_eq!(sim.grid(), &grid);
    }

    #[test]
    fn test_steps_are_reproducible() {
        let config = run_config(
            WorldConfig {
                total_cells: 100,
                frac_red: 0.4,
                frac_blue: 0.4,
            },
            0.6,
            99,
        );

        let mut first = Simulation::new(config.clone()).unwrap();
        let mut second = Simulation::new(config).unwrap();

        for _ in 0..5 {
            first.step(0.6).unwrap();
            second.step(0.6).unwrap();
        }
        assert_eq!(first.grid(), second.grid());
    }

    #[test]
    fn test_run_settles() {
        let config = RunConfig {
            generations: 500,
            seed: 11,
            threshold: 0.3,
            world: WorldConfig {
                total_cells: 100,
                frac_red: 0.2,
                frac_blue: 0.2,
            },
            ..Default::default()
        };

        let mut sim = Simulation::new(config).unwrap();
        let summary = sim.run().unwrap();
        assert!(summary.settled);

        // Settled means a further pass finds no unsatisfied actor.
        let states = satisfaction_pass(sim.grid(), 0.3);
        assert!(!states.contains(&Satisfaction::Unsatisfied));
    }

    proptest! {
        #[test]
        fn prop_initializer_counts_match_targets(
            seed in 0u64..500,
            total_cells in 1usize..600,
            frac_red in 0.0f64..0.5,
            frac_blue in 0.0f64..0.5,
        ) {
            let world = WorldConfig { total_cells, frac_red, frac_blue };
            let config = run_config(world.clone(), 0.7, seed);

            let sim = Simulation::new(config).unwrap();
            let (red, blue) = world.target_counts();
            prop_assert_eq!(sim.grid().len(), world.side() * world.side());
            prop_assert_eq!(sim.grid().count(Cell::Red), red);
            prop_assert_eq!(sim.grid().count(Cell::Blue), blue);
        }

        #[test]
        fn prop_step_preserves_counts(
            seed in 0u64..500,
            frac_red in 0.05f64..0.45,
            frac_blue in 0.05f64..0.45,
            threshold in 0.0f64..1.0,
        ) {
            let world = WorldConfig { total_cells: 225, frac_red, frac_blue };
            let config = run_config(world, threshold, seed);

            let mut sim = Simulation::new(config).unwrap();
            let before = sim.grid().counts();
            sim.step(threshold).unwrap();
            prop_assert_eq!(sim.grid().counts(), before);
        }
    }
}
