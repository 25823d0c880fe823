//! Enumeration types for the corruption simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Behavioral states
// ---------------------------------------------------------------------------

/// How a citizen approaches a bureaucrat when requesting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CitizenState {
    /// Requests service through the regular queue.
    Honest,
    /// Offers a bribe to skip the queue.
    BribeOffering,
}

/// Whether a bureaucrat accepts bribes and delays honest requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BureaucratState {
    /// Serves every citizen and refuses bribes.
    Honest,
    /// Accepts bribes and delays citizens who do not pay.
    Corrupt,
}

// ---------------------------------------------------------------------------
// Service demand
// ---------------------------------------------------------------------------

/// When a citizen's `needs_service` flag is raised again after being served.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceDemand {
    /// Every citizen needs service again at the start of every round.
    #[default]
    EveryRound,
    /// A citizen is served at most once per run.
    Once,
}

// ---------------------------------------------------------------------------
// Budget entries
// ---------------------------------------------------------------------------

/// The category of a movement on the institution's budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BudgetEntryKind {
    /// Salary outlay to the whole bureaucrat population (debit).
    Salary,
    /// Funding for one round of investigations (debit).
    InvestigationCost,
    /// Tokens seized from a corrupt bureaucrat (credit).
    Confiscation,
}

impl BudgetEntryKind {
    /// Returns `true` if entries of this kind add to the budget.
    pub const fn is_credit(self) -> bool {
        matches!(self, Self::Confiscation)
    }
}
