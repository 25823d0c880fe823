//! The round driver.
//!
//! [`Simulation`] owns the state of one run and advances it a round at a
//! time, so a caller can drive it incrementally and report progress.
//! [`run_simulation`] is the one-shot entry point: it runs every
//! configured round and returns the full metrics log plus the final agent
//! pool and institution state.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::info;

use corruption_agents::{AgentPool, PoolError};
use corruption_ledger::Institution;
use corruption_types::{BudgetEntry, Bureaucrat, Citizen, RoundMetrics};

use crate::config::{ConfigError, SimulationConfig};
use crate::round::{self, SimulationState};
use crate::strategy::GovernanceStrategy;

/// Errors that can prevent a simulation from starting.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The configuration failed validation.
    #[error("invalid configuration: {source}")]
    Config {
        /// The underlying validation error.
        #[from]
        source: ConfigError,
    },

    /// The agent populations could not be initialized.
    #[error("population setup failed: {source}")]
    Pool {
        /// The underlying pool error.
        #[from]
        source: PoolError,
    },
}

/// Callback invoked after each round completes.
pub trait RoundCallback: Send {
    /// Called with the round's metrics and the fraction of the run done.
    fn on_round(&mut self, metrics: &RoundMetrics, progress: f64);
}

/// A callback that ignores every round.
pub struct NoOpCallback;

impl RoundCallback for NoOpCallback {
    fn on_round(&mut self, _metrics: &RoundMetrics, _progress: f64) {}
}

/// Agent and institution state at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FinalState {
    /// Every citizen, in id order.
    pub citizens: Vec<Citizen>,
    /// Every bureaucrat, in id order.
    pub bureaucrats: Vec<Bureaucrat>,
    /// Final institution budget.
    pub budget: Decimal,
    /// Final institutional credibility.
    pub credibility: Decimal,
    /// Every budget movement of the run, in order.
    pub budget_entries: Vec<BudgetEntry>,
}

/// Everything a finished run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationOutput {
    /// One metrics snapshot per round, in round order.
    pub log: Vec<RoundMetrics>,
    /// The state after the last round.
    pub final_state: FinalState,
}

/// A simulation run that can be advanced one round at a time.
pub struct Simulation {
    config: SimulationConfig,
    state: SimulationState,
    strategy: Box<dyn GovernanceStrategy>,
    log: Vec<RoundMetrics>,
}

impl Simulation {
    /// Validate `config` and build the initial state, using the strategy
    /// named in the configuration.
    pub fn new(config: SimulationConfig) -> Result<Self, RunnerError> {
        let strategy = config.strategy.build(&config);
        Self::with_strategy(config, strategy)
    }

    /// Validate `config` and build the initial state with a custom
    /// strategy. The configured strategy kind is ignored.
    pub fn with_strategy(
        config: SimulationConfig,
        strategy: Box<dyn GovernanceStrategy>,
    ) -> Result<Self, RunnerError> {
        config.validate()?;
        let state = SimulationState::new(&config)?;

        info!(
            citizens = config.num_citizens,
            bureaucrats = config.num_bureaucrats,
            rounds = config.rounds,
            strategy = strategy.name(),
            seed = ?config.seed,
            corrupt = state.pool.corrupt_count(),
            bribing = state.pool.bribe_offering_count(),
            "Simulation initialized"
        );

        Ok(Self {
            log: Vec::with_capacity(usize::try_from(config.rounds).unwrap_or(0)),
            config,
            state,
            strategy,
        })
    }

    /// Run the next round, append its metrics to the log, and return them.
    ///
    /// Returns `None` once every configured round has run.
    pub fn step(&mut self) -> Option<&RoundMetrics> {
        if self.is_finished() {
            return None;
        }
        let metrics = round::run_round(&mut self.state, &self.config, self.strategy.as_ref());
        self.log.push(metrics);
        self.log.last()
    }

    /// Run every remaining round, notifying `callback` after each one.
    pub fn run(&mut self, callback: &mut dyn RoundCallback) {
        while !self.is_finished() {
            let metrics = round::run_round(&mut self.state, &self.config, self.strategy.as_ref());
            self.log.push(metrics);
            let progress = self.progress();
            if let Some(latest) = self.log.last() {
                callback.on_round(latest, progress);
            }
        }
    }

    /// Whether every configured round has run.
    pub const fn is_finished(&self) -> bool {
        self.state.round >= self.config.rounds
    }

    /// Rounds completed so far.
    pub const fn completed_rounds(&self) -> u32 {
        self.state.round
    }

    /// Rounds configured for this run.
    pub const fn total_rounds(&self) -> u32 {
        self.config.rounds
    }

    /// Fraction of rounds completed, in `[0, 1]`. A zero-round run is
    /// complete from the start.
    pub fn progress(&self) -> f64 {
        if self.config.rounds == 0 {
            return 1.0;
        }
        f64::from(self.state.round) / f64::from(self.config.rounds)
    }

    /// The configuration this run was built from.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Current agent pool.
    pub const fn pool(&self) -> &AgentPool {
        &self.state.pool
    }

    /// Current institution.
    pub const fn institution(&self) -> &Institution {
        &self.state.institution
    }

    /// Metrics of every round completed so far.
    pub fn log(&self) -> &[RoundMetrics] {
        &self.log
    }

    /// Consume the run and produce its output. Rounds not yet run are
    /// skipped.
    pub fn finish(self) -> SimulationOutput {
        let (citizens, bureaucrats) = self.state.pool.into_parts();
        let institution = self.state.institution;

        info!(
            rounds = self.log.len(),
            budget = %institution.budget(),
            credibility = %institution.credibility(),
            "Simulation finished"
        );

        SimulationOutput {
            log: self.log,
            final_state: FinalState {
                citizens,
                bureaucrats,
                budget: institution.budget(),
                credibility: institution.credibility(),
                budget_entries: institution.entries().to_vec(),
            },
        }
    }
}

/// Run a whole simulation with the strategy named in `config`.
///
/// # Errors
///
/// Returns [`RunnerError`] if the configuration is invalid or the
/// populations cannot be set up. Once started, a run always completes.
pub fn run_simulation(config: &SimulationConfig) -> Result<SimulationOutput, RunnerError> {
    let mut simulation = Simulation::new(config.clone())?;
    simulation.run(&mut NoOpCallback);
    Ok(simulation.finish())
}

/// Run a whole simulation with a caller-supplied strategy.
///
/// # Errors
///
/// Returns [`RunnerError`] if the configuration is invalid or the
/// populations cannot be set up.
pub fn run_simulation_with_strategy(
    config: &SimulationConfig,
    strategy: Box<dyn GovernanceStrategy>,
) -> Result<SimulationOutput, RunnerError> {
    let mut simulation = Simulation::with_strategy(config.clone(), strategy)?;
    simulation.run(&mut NoOpCallback);
    Ok(simulation.finish())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    struct Recorder {
        rounds: Vec<u32>,
        progress: Vec<f64>,
    }

    impl RoundCallback for Recorder {
        fn on_round(&mut self, metrics: &RoundMetrics, progress: f64) {
            self.rounds.push(metrics.round);
            self.progress.push(progress);
        }
    }

    fn config(rounds: u32) -> SimulationConfig {
        SimulationConfig {
            num_citizens: 20,
            num_bureaucrats: 6,
            rounds,
            seed: Some(99),
            ..SimulationConfig::default()
        }
    }

    #[test]
    fn callback_sees_every_round_in_order() {
        let mut sim = Simulation::new(config(4)).unwrap();
        let mut recorder = Recorder {
            rounds: Vec::new(),
            progress: Vec::new(),
        };

        sim.run(&mut recorder);

        assert_eq!(recorder.rounds, vec![1, 2, 3, 4]);
        let last = recorder.progress.last().copied().unwrap();
        assert!((last - 1.0).abs() < f64::EPSILON);
        assert!(recorder
                .progress
                .windows(2)
                .all(|w| matches!(w, [a, b] if a < b)));
    }

    #[test]
    fn step_stops_after_configured_rounds() {
        let mut sim = Simulation::new(config(2)).unwrap();
        assert!(sim.step().is_some());
        assert!((sim.progress() - 0.5).abs() < f64::EPSILON);
        assert!(sim.step().is_some());
        assert!(sim.step().is_none());
        assert!(sim.is_finished());
        assert_eq!(sim.completed_rounds(), 2);
        assert_eq!(sim.log().len(), 2);
    }

    #[test]
    fn zero_rounds_is_finished_immediately() {
        let sim = Simulation::new(config(0)).unwrap();
        assert!(sim.is_finished());
        assert!((sim.progress() - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_config_is_rejected_before_start() {
        let bad = SimulationConfig {
            initial_corruption_bureaucrats: 2.0,
            ..config(3)
        };
        let result = run_simulation(&bad);
        assert!(matches!(result, Err(RunnerError::Config { .. })));
    }

    #[test]
    fn output_serializes_log_and_final_state() {
        let output = run_simulation(&config(2)).unwrap();
        let json = serde_json::to_value(&output).unwrap();
        assert_eq!(json["log"].as_array().unwrap().len(), 2);
        assert_eq!(json["final_state"]["citizens"].as_array().unwrap().len(), 20);
        assert_eq!(json["final_state"]["bureaucrats"].as_array().unwrap().len(), 6);
    }

    #[test]
    fn finish_reports_final_institution_state() {
        let mut sim = Simulation::new(config(3)).unwrap();
        sim.run(&mut NoOpCallback);
        let budget = sim.institution().budget();
        let entries = sim.institution().entries().len();

        let output = sim.finish();

        assert_eq!(output.final_state.budget, budget);
        assert_eq!(output.final_state.budget_entries.len(), entries);
        assert_eq!(output.log.last().unwrap().institution_budget, budget);
    }
}
