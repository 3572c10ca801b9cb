//! Biosim Runner Binary
//!
//! Runs the homeostasis evolution experiment and reports per-generation
//! summaries through the log. Set `RUST_LOG=debug` for deaths and breeding.

mod config;

use std::fs::File;
use std::io::BufWriter;

use anyhow::{Context, Result};
use biosim_darwinian::EvolutionaryLoop;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::SimConfig;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Biosim v{}", biosim_common::VERSION);

    // Load configuration
    let config = SimConfig::load()?;
    let simulation = &config.simulation;
    info!(
        population = simulation.population_size,
        genome_size = simulation.genome_size,
        generations = simulation.total_generations,
        cycles = simulation.cycles_per_generation,
        seed = simulation.seed,
        "Loaded configuration"
    );

    let mut evolution = EvolutionaryLoop::from_config(config.simulation.clone())
        .context("Failed to build simulation")?;
    let history = evolution.run_simulation();

    let extinctions = history.extinctions().count();
    let leaps = history.iter().filter(|r| r.leap.is_some()).count();
    info!(
        generations = history.len(),
        extinctions, leaps, "Experiment finished"
    );
    match history.latest().and_then(|r| r.fittest.as_ref()) {
        Some(best) => info!(
            organism = %best.id,
            age = best.age,
            genome = %best.genome,
            "Final fittest survivor"
        ),
        None => warn!("No survivors in the final generation"),
    }

    if let Some(path) = &config.history_path {
        let file = File::create(path)
            .with_context(|| format!("Failed to create history file {}", path.display()))?;
        history.write_json_lines(BufWriter::new(file))?;
        info!(path = %path.display(), records = history.len(), "History written");
    }

    Ok(())
}
