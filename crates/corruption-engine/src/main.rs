//! Command-line runner for the corruption simulation.
//!
//! # Startup Sequence
//!
//! 1. Initialize structured logging (tracing)
//! 2. Load configuration from the path given as the first argument, else
//!    `corruption-config.yaml`, else defaults
//! 3. Run the simulation on a blocking thread, logging progress as rounds
//!    complete
//! 4. Print the metrics table
//! 5. Write the JSON output if `output_path` is configured

mod error;
mod progress;
mod report;

use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use corruption_core::{Simulation, SimulationConfig, SimulationOutput};

use crate::error::EngineError;
use crate::progress::ChannelCallback;

/// Default configuration file, relative to the working directory.
const DEFAULT_CONFIG: &str = "corruption-config.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration fails to load, the simulation cannot
/// start, or the output cannot be written.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Initialize structured logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("corruption-engine starting");

    // 2. Load configuration.
    let config = load_config(std::env::args().nth(1).map(PathBuf::from))?;
    info!(
        citizens = config.num_citizens,
        bureaucrats = config.num_bureaucrats,
        rounds = config.rounds,
        strategy = ?config.strategy,
        seed = ?config.seed,
        "Configuration loaded"
    );

    // 3. Run the simulation.
    let output_path = config.output_path.clone();
    let output = run(config).await?;

    // 4. Print the table.
    println!("{}", report::render_table(&output.log));

    // 5. Write JSON.
    if let Some(path) = output_path {
        write_output(Path::new(&path), &output)?;
        info!(path = %path, "Metrics written");
    }

    info!(
        rounds = output.log.len(),
        final_budget = %output.final_state.budget,
        "corruption-engine shutdown complete"
    );

    Ok(())
}

/// Load the simulation configuration.
///
/// An explicit path must exist. Without one, `corruption-config.yaml` in
/// the working directory is used if present, otherwise the defaults.
fn load_config(explicit: Option<PathBuf>) -> Result<SimulationConfig, EngineError> {
    if let Some(path) = explicit {
        return Ok(SimulationConfig::from_file(&path)?);
    }
    let config_path = Path::new(DEFAULT_CONFIG);
    if config_path.exists() {
        Ok(SimulationConfig::from_file(config_path)?)
    } else {
        info!("Config file not found, using defaults");
        let config = SimulationConfig::default();
        config.validate()?;
        Ok(config)
    }
}

/// Run the whole simulation off the async runtime, logging each round's
/// progress as it arrives.
async fn run(config: SimulationConfig) -> Result<SimulationOutput, EngineError> {
    let mut simulation = Simulation::new(config)?;
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut callback = ChannelCallback::new(simulation.total_rounds(), tx);

    let task = tokio::task::spawn_blocking(move || {
        simulation.run(&mut callback);
        simulation.finish()
    });

    while let Some(update) = rx.recv().await {
        info!(
            completed = update.completed,
            total = update.total,
            progress = update.fraction,
            budget = %update.budget,
            corruption_rate = %update.corruption_rate,
            "Progress"
        );
    }

    Ok(task.await?)
}

fn write_output(path: &Path, output: &SimulationOutput) -> Result<(), EngineError> {
    let json = serde_json::to_string_pretty(output)?;
    std::fs::write(path, json).map_err(|source| EngineError::Output {
        path: path.to_path_buf(),
        source,
    })
}
