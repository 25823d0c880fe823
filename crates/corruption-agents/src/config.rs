//! Behavioral tunables for the interaction and influence stages.
//!
//! The round driver deserializes this from the `behavior` key of the
//! simulation configuration. Every field has a default so the section may
//! be omitted entirely.

use rust_decimal::Decimal;
use serde::Deserialize;

use corruption_types::ServiceDemand;

/// Parameters that shape how agents react to service outcomes and peers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Maximum neighbors per agent (default: 5).
    pub neighbor_cap: u32,

    /// Bribe-offering neighbors needed to turn a citizen (default: 3).
    pub citizen_corruption_threshold: u32,

    /// Corrupt neighbors needed to turn an honest bureaucrat (default: 3).
    pub bureaucrat_corruption_threshold: u32,

    /// Share of the bureaucrat population that must be investigated in a
    /// round to suppress bureaucrat contagion (default: 0.5).
    pub investigation_pressure_ratio: Decimal,

    /// Whether citizens want service every round or only once.
    pub service_demand: ServiceDemand,

    /// Upper bound on citizen satisfaction. `None` means unbounded.
    pub satisfaction_cap: Option<i64>,

    /// Satisfaction a citizen loses each time it is delayed (default: 0).
    pub delay_penalty: i64,
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            neighbor_cap: 5,
            citizen_corruption_threshold: 3,
            bureaucrat_corruption_threshold: 3,
            investigation_pressure_ratio: Decimal::new(5, 1),
            service_demand: ServiceDemand::EveryRound,
            satisfaction_cap: None,
            delay_penalty: 0,
        }
    }
}

impl BehaviorConfig {
    /// Apply one unit of positive service to a satisfaction score,
    /// respecting [`satisfaction_cap`](Self::satisfaction_cap).
    pub fn raise_satisfaction(&self, current: i64) -> i64 {
        let next = current.saturating_add(1);
        self.satisfaction_cap.map_or(next, |cap| next.min(cap))
    }

    /// Apply the delay penalty to a satisfaction score.
    pub const fn lower_satisfaction(&self, current: i64) -> i64 {
        current.saturating_sub(self.delay_penalty)
    }
}
