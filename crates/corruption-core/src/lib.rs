//! Configuration, governance strategies, and the round driver for the
//! bureaucratic corruption simulation.
//!
//! This crate owns the fixed per-round stage order:
//! Interaction, Credibility, Salary, Investigation, Influence, then a
//! metrics snapshot.
//!
//! # Modules
//!
//! - [`config`] -- Configuration loading from `corruption-config.yaml` into
//!   a validated [`SimulationConfig`].
//! - [`investigation`] -- Budget-guarded investigation and confiscation.
//! - [`round`] -- A single round over the shared [`SimulationState`].
//! - [`runner`] -- [`Simulation`] for incremental runs and the one-shot
//!   [`run_simulation`] entry point.
//! - [`strategy`] -- [`GovernanceStrategy`] and the reference strategies.
//!
//! [`SimulationConfig`]: config::SimulationConfig
//! [`SimulationState`]: round::SimulationState
//! [`Simulation`]: runner::Simulation
//! [`run_simulation`]: runner::run_simulation
//! [`GovernanceStrategy`]: strategy::GovernanceStrategy

pub mod config;
pub mod investigation;
pub mod round;
pub mod runner;
pub mod strategy;

pub use config::{ConfigError, SimulationConfig};
pub use runner::{
    FinalState, NoOpCallback, RoundCallback, RunnerError, Simulation, SimulationOutput,
    run_simulation, run_simulation_with_strategy,
};
pub use strategy::{GovernanceStrategy, StrategyKind};
