//! Terminal viewer driving the segregation simulation at a fixed cadence.

mod render;
mod telemetry;

use anyhow::Result;
use schelling_core::RunConfig;
use schelling_world::Simulation;
use std::io;
use std::thread;
use std::time::Duration;
use tracing::info;

fn main() -> Result<()> {
    // Load configuration
    let config = load_config()?;

    // Initialize telemetry
    telemetry::init_telemetry()?;

    info!(
        total_cells = config.world.total_cells,
        threshold = config.threshold,
        seed = config.seed,
        "Starting Schelling segregation viewer"
    );

    let mut simulation = Simulation::new(config.clone())?;
    let renderer = render::Renderer::new(simulation.cell_size());
    let interval = Duration::from_millis(config.render.interval_ms);
    let mut stdout = io::stdout();

    renderer.draw(simulation.grid(), &mut stdout)?;

    for _ in 0..config.generations {
        thread::sleep(interval);

        let stats = simulation.step(config.threshold)?;
        renderer.draw(simulation.grid(), &mut stdout)?;

        if stats.unsatisfied == 0 {
            info!(generation = stats.generation, "All actors satisfied");
            break;
        }
    }

    info!(generation = simulation.generation(), "Viewer finished");
    Ok(())
}

/// Read a `RunConfig` from the JSON file given as the first argument, or fall
/// back to the built-in defaults.
fn load_config() -> schelling_core::Result<RunConfig> {
    match std::env::args().nth(1) {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            Ok(serde_json::from_str::<RunConfig>(&raw)?)
        }
        None => Ok(RunConfig::default()),
    }
}
