//! Configuration loading and validation for the corruption simulation.
//!
//! The canonical configuration lives in `corruption-config.yaml` at the
//! project root. Parameters are a flat set of named keys; behavioral
//! tunables sit under a nested `behavior` key. Every key has a default, so
//! an empty document is a valid configuration.
//!
//! [`SimulationConfig::validate`] runs before any simulation state is
//! created, so an invalid configuration never produces a partially
//! initialized run.

use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;

use corruption_agents::{BehaviorConfig, PopulationSpec};

use crate::strategy::StrategyKind;

/// Errors that can occur when loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A parameter holds a value outside its allowed range.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// The offending key.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Complete parameter set for one simulation run.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Number of citizens.
    #[serde(default = "default_num_citizens")]
    pub num_citizens: u32,

    /// Number of bureaucrats.
    #[serde(default = "default_num_bureaucrats")]
    pub num_bureaucrats: u32,

    /// Rounds to run. Zero is valid and produces an empty log.
    #[serde(default = "default_rounds")]
    pub rounds: u32,

    /// Salary paid to each bureaucrat per round.
    #[serde(default = "default_salary")]
    pub salary: Decimal,

    /// Tokens a corrupt bureaucrat receives per accepted bribe.
    #[serde(default = "default_bribe_amount")]
    pub bribe_amount: Decimal,

    /// Bureaucrats audited per round under the fixed-rate strategy.
    #[serde(default)]
    pub investigation_rate: u32,

    /// Cost of investigating one bureaucrat.
    #[serde(default = "default_investigation_cost")]
    pub investigation_cost: Decimal,

    /// Probability that each citizen starts out offering bribes.
    #[serde(default = "default_initial_corruption")]
    pub initial_corruption_citizens: f64,

    /// Probability that each bureaucrat starts out corrupt.
    #[serde(default = "default_initial_corruption")]
    pub initial_corruption_bureaucrats: f64,

    /// Institution budget at the start of the run.
    #[serde(default = "default_initial_budget")]
    pub initial_budget: Decimal,

    /// Random seed. Absent means a fresh OS-seeded run.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Which governance strategy selects bureaucrats to investigate.
    #[serde(default)]
    pub strategy: StrategyKind,

    /// How many top earners the pragmatic strategy investigates.
    #[serde(default = "default_pragmatic_top_k")]
    pub pragmatic_top_k: u32,

    /// Institutional credibility at the start of the run.
    #[serde(default = "default_initial_credibility")]
    pub initial_credibility: Decimal,

    /// Credibility below which the institution is in reactive mode.
    #[serde(default = "default_reactive_credibility_threshold")]
    pub reactive_credibility_threshold: Decimal,

    /// Corruption rate above which the firefighting strategy acts.
    #[serde(default = "default_reactive_corruption_threshold")]
    pub reactive_corruption_threshold: Decimal,

    /// Behavioral tunables for interaction and influence.
    #[serde(default)]
    pub behavior: BehaviorConfig,

    /// Where the engine writes the JSON metrics log, if anywhere.
    #[serde(default)]
    pub output_path: Option<String>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            num_citizens: default_num_citizens(),
            num_bureaucrats: default_num_bureaucrats(),
            rounds: default_rounds(),
            salary: default_salary(),
            bribe_amount: default_bribe_amount(),
            investigation_rate: 0,
            investigation_cost: default_investigation_cost(),
            initial_corruption_citizens: default_initial_corruption(),
            initial_corruption_bureaucrats: default_initial_corruption(),
            initial_budget: default_initial_budget(),
            seed: None,
            strategy: StrategyKind::default(),
            pragmatic_top_k: default_pragmatic_top_k(),
            initial_credibility: default_initial_credibility(),
            reactive_credibility_threshold: default_reactive_credibility_threshold(),
            reactive_corruption_threshold: default_reactive_corruption_threshold(),
            behavior: BehaviorConfig::default(),
            output_path: None,
        }
    }
}

impl SimulationConfig {
    /// Load and validate configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// An empty document yields the defaults.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check every parameter against its allowed range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_probability("initial_corruption_citizens", self.initial_corruption_citizens)?;
        check_probability(
            "initial_corruption_bureaucrats",
            self.initial_corruption_bureaucrats,
        )?;
        check_non_negative("salary", self.salary)?;
        check_non_negative("bribe_amount", self.bribe_amount)?;
        check_non_negative("investigation_cost", self.investigation_cost)?;
        check_non_negative("initial_budget", self.initial_budget)?;
        check_unit("initial_credibility", self.initial_credibility)?;
        check_unit(
            "reactive_credibility_threshold",
            self.reactive_credibility_threshold,
        )?;
        check_unit(
            "reactive_corruption_threshold",
            self.reactive_corruption_threshold,
        )?;
        check_non_negative(
            "behavior.investigation_pressure_ratio",
            self.behavior.investigation_pressure_ratio,
        )?;
        if self.behavior.delay_penalty < 0 {
            return Err(ConfigError::Invalid {
                field: "behavior.delay_penalty",
                reason: format!("must be non-negative, got {}", self.behavior.delay_penalty),
            });
        }
        Ok(())
    }

    /// Population sizes and initial corruption for the agent pool.
    pub const fn population_spec(&self) -> PopulationSpec {
        PopulationSpec {
            citizens: self.num_citizens,
            bureaucrats: self.num_bureaucrats,
            citizen_corruption: self.initial_corruption_citizens,
            bureaucrat_corruption: self.initial_corruption_bureaucrats,
            neighbor_cap: self.behavior.neighbor_cap,
        }
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("probability must be within [0, 1], got {value}"),
        })
    }
}

fn check_non_negative(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be non-negative, got {value}"),
        });
    }
    Ok(())
}

fn check_unit(field: &'static str, value: Decimal) -> Result<(), ConfigError> {
    if value < Decimal::ZERO || value > Decimal::ONE {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("must be within [0, 1], got {value}"),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

const fn default_num_citizens() -> u32 {
    100
}

const fn default_num_bureaucrats() -> u32 {
    20
}

const fn default_rounds() -> u32 {
    7
}

fn default_salary() -> Decimal {
    Decimal::from(5)
}

const fn default_bribe_amount() -> Decimal {
    Decimal::ONE
}

fn default_investigation_cost() -> Decimal {
    Decimal::from(3)
}

const fn default_initial_corruption() -> f64 {
    0.4
}

fn default_initial_budget() -> Decimal {
    Decimal::from(1000)
}

const fn default_pragmatic_top_k() -> u32 {
    3
}

const fn default_initial_credibility() -> Decimal {
    Decimal::ONE
}

const fn default_reactive_credibility_threshold() -> Decimal {
    Decimal::from_parts(4, 0, 0, false, 1)
}

const fn default_reactive_corruption_threshold() -> Decimal {
    Decimal::from_parts(3, 0, 0, false, 1)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corruption_types::ServiceDemand;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.num_citizens, 100);
        assert_eq!(config.num_bureaucrats, 20);
        assert_eq!(config.rounds, 7);
        assert_eq!(config.salary, Decimal::from(5));
        assert_eq!(config.investigation_rate, 0);
        assert_eq!(config.strategy, StrategyKind::FixedRate);
        assert_eq!(config.reactive_credibility_threshold, Decimal::new(4, 1));
        assert_eq!(config.reactive_corruption_threshold, Decimal::new(3, 1));
        assert_eq!(config.seed, None);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r"
num_citizens: 10
num_bureaucrats: 5
rounds: 3
salary: 50
bribe_amount: 2
investigation_rate: 4
investigation_cost: 10
initial_corruption_citizens: 0.25
initial_corruption_bureaucrats: 0.5
initial_budget: 1000
seed: 123
strategy: firefighting
pragmatic_top_k: 2
initial_credibility: 0.5
behavior:
  neighbor_cap: 4
  citizen_corruption_threshold: 2
  service_demand: once
  satisfaction_cap: 10
output_path: out.json
";

        let config = SimulationConfig::parse(yaml).unwrap();

        assert_eq!(config.num_citizens, 10);
        assert_eq!(config.num_bureaucrats, 5);
        assert_eq!(config.rounds, 3);
        assert_eq!(config.salary, Decimal::from(50));
        assert_eq!(config.investigation_rate, 4);
        assert_eq!(config.initial_budget, Decimal::from(1000));
        assert_eq!(config.seed, Some(123));
        assert_eq!(config.strategy, StrategyKind::Firefighting);
        assert_eq!(config.pragmatic_top_k, 2);
        assert_eq!(config.initial_credibility, Decimal::new(5, 1));
        assert_eq!(config.behavior.neighbor_cap, 4);
        assert_eq!(config.behavior.citizen_corruption_threshold, 2);
        assert_eq!(config.behavior.bureaucrat_corruption_threshold, 3);
        assert_eq!(config.behavior.service_demand, ServiceDemand::Once);
        assert_eq!(config.behavior.satisfaction_cap, Some(10));
        assert_eq!(config.output_path.as_deref(), Some("out.json"));
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("seed: 7\n").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.num_citizens, 100);
        assert_eq!(config.behavior, BehaviorConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn rejects_probability_out_of_range() {
        let result = SimulationConfig::parse("initial_corruption_citizens: 1.2\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "initial_corruption_citizens",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_money() {
        let result = SimulationConfig::parse("salary: -1\n");
        assert!(matches!(result, Err(ConfigError::Invalid { field: "salary", .. })));

        let result = SimulationConfig::parse("initial_budget: -100\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "initial_budget",
                ..
            })
        ));
    }

    #[test]
    fn rejects_negative_population_at_parse() {
        let result = SimulationConfig::parse("num_citizens: -5\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn rejects_negative_rounds_at_parse() {
        let result = SimulationConfig::parse("rounds: -1\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn rejects_credibility_out_of_range() {
        let result = SimulationConfig::parse("initial_credibility: 1.5\n");
        assert!(matches!(
            result,
            Err(ConfigError::Invalid {
                field: "initial_credibility",
                ..
            })
        ));
    }

    #[test]
    fn rejects_unknown_strategy() {
        let result = SimulationConfig::parse("strategy: bribe_everyone\n");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn population_spec_mirrors_config() {
        let config = SimulationConfig {
            num_citizens: 12,
            num_bureaucrats: 4,
            ..SimulationConfig::default()
        };
        let spec = config.population_spec();
        assert_eq!(spec.citizens, 12);
        assert_eq!(spec.bureaucrats, 4);
        assert_eq!(spec.neighbor_cap, 5);
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("corruption-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
