//! Governance strategies: which bureaucrats to investigate each round.
//!
//! A [`GovernanceStrategy`] only proposes a selection. The investigation
//! stage filters it to known ids, removes duplicates, and enforces the
//! budget, so a misbehaving strategy cannot break the round's invariants.

use rand::rngs::StdRng;
use rand::seq::index;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use corruption_agents::ratio;
use corruption_ledger::Institution;
use corruption_types::{Bureaucrat, BureaucratId};

use crate::config::SimulationConfig;

/// A pluggable policy choosing which bureaucrats to investigate.
///
/// The round driver calls [`select`] once per round, after salaries have
/// been paid and before any investigation happens.
///
/// [`select`]: GovernanceStrategy::select
pub trait GovernanceStrategy: Send {
    /// Short stable name, used in logs.
    fn name(&self) -> &'static str;

    /// Choose bureaucrats to investigate this round.
    ///
    /// Strategies may read the bureaucrats' state and the institution's
    /// budget and credibility. They never mutate either.
    fn select(
        &self,
        bureaucrats: &[Bureaucrat],
        institution: &Institution,
        rng: &mut StdRng,
    ) -> Vec<BureaucratId>;
}

/// The strategies that can be named in configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Audit `investigation_rate` bureaucrats chosen uniformly at random.
    #[default]
    FixedRate,
    /// Audit the top earners by token holdings.
    Pragmatic,
    /// Audit every currently corrupt bureaucrat.
    CorruptionMinimizing,
    /// Audit every corrupt bureaucrat, but only in a crisis.
    Firefighting,
}

impl StrategyKind {
    /// Build the configured strategy.
    pub fn build(self, config: &SimulationConfig) -> Box<dyn GovernanceStrategy> {
        match self {
            Self::FixedRate => Box::new(FixedRate {
                rate: config.investigation_rate,
            }),
            Self::Pragmatic => Box::new(Pragmatic {
                top_k: config.pragmatic_top_k,
            }),
            Self::CorruptionMinimizing => Box::new(CorruptionMinimizing),
            Self::Firefighting => Box::new(Firefighting {
                corruption_threshold: config.reactive_corruption_threshold,
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Reference strategies
// ---------------------------------------------------------------------------

/// Audit a uniform random sample of `rate` distinct bureaucrats.
///
/// When `rate` exceeds the population everyone is audited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRate {
    /// Bureaucrats to audit per round.
    pub rate: u32,
}

impl GovernanceStrategy for FixedRate {
    fn name(&self) -> &'static str {
        "fixed_rate"
    }

    fn select(
        &self,
        bureaucrats: &[Bureaucrat],
        _institution: &Institution,
        rng: &mut StdRng,
    ) -> Vec<BureaucratId> {
        let wanted = usize::try_from(self.rate).unwrap_or(usize::MAX);
        let amount = wanted.min(bureaucrats.len());
        index::sample(rng, bureaucrats.len(), amount)
            .into_iter()
            .filter_map(|i| bureaucrats.get(i).map(|b| b.id))
            .collect()
    }
}

/// Audit the `top_k` bureaucrats holding the most tokens.
///
/// Ties are broken by ascending id so the selection is deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pragmatic {
    /// How many top earners to audit.
    pub top_k: u32,
}

impl GovernanceStrategy for Pragmatic {
    fn name(&self) -> &'static str {
        "pragmatic"
    }

    fn select(
        &self,
        bureaucrats: &[Bureaucrat],
        _institution: &Institution,
        _rng: &mut StdRng,
    ) -> Vec<BureaucratId> {
        let mut ranked: Vec<(Decimal, BureaucratId)> =
            bureaucrats.iter().map(|b| (b.tokens, b.id)).collect();
        ranked.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        ranked
            .into_iter()
            .take(usize::try_from(self.top_k).unwrap_or(usize::MAX))
            .map(|(_, id)| id)
            .collect()
    }
}

/// Audit every bureaucrat that is corrupt right now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorruptionMinimizing;

impl GovernanceStrategy for CorruptionMinimizing {
    fn name(&self) -> &'static str {
        "corruption_minimizing"
    }

    fn select(
        &self,
        bureaucrats: &[Bureaucrat],
        _institution: &Institution,
        _rng: &mut StdRng,
    ) -> Vec<BureaucratId> {
        corrupt_ids(bureaucrats)
    }
}

/// Audit every corrupt bureaucrat when the institution is reactive or the
/// corruption rate exceeds `corruption_threshold`; otherwise audit nobody.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firefighting {
    /// Corruption rate above which the strategy acts.
    pub corruption_threshold: Decimal,
}

impl GovernanceStrategy for Firefighting {
    fn name(&self) -> &'static str {
        "firefighting"
    }

    fn select(
        &self,
        bureaucrats: &[Bureaucrat],
        institution: &Institution,
        _rng: &mut StdRng,
    ) -> Vec<BureaucratId> {
        let corrupt = corrupt_ids(bureaucrats);
        let rate = ratio(corrupt.len(), bureaucrats.len());
        if institution.reactive_mode() || rate > self.corruption_threshold {
            corrupt
        } else {
            Vec::new()
        }
    }
}

fn corrupt_ids(bureaucrats: &[Bureaucrat]) -> Vec<BureaucratId> {
    bureaucrats
        .iter()
        .filter(|b| b.is_corrupt())
        .map(|b| b.id)
        .collect()
}
