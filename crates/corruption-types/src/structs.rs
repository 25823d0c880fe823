//! Core records for the corruption simulation.
//!
//! Agents hold their neighbors as id references into their own class. A
//! neighbor is resolved through the owning pool at read time; no record ever
//! embeds a copy of another.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{BudgetEntryKind, BureaucratState, CitizenState};
use crate::ids::{BureaucratId, CitizenId};

// ---------------------------------------------------------------------------
// Citizen
// ---------------------------------------------------------------------------

/// A member of the public who requests service from bureaucrats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Citizen {
    /// Stable id, dense within the citizen population.
    pub id: CitizenId,
    /// Current behavioral state.
    pub state: CitizenState,
    /// Whether the citizen still wants service in the current cycle.
    pub needs_service: bool,
    /// Rounds this citizen has been delayed. Never decremented.
    pub waiting_time: u32,
    /// Whether the citizen was delayed during the current round.
    pub was_delayed_this_round: bool,
    /// Accumulated satisfaction from service outcomes.
    pub satisfaction: i64,
    /// Peer citizens whose behavior influences this one.
    pub neighbors: Vec<CitizenId>,
}

impl Citizen {
    /// Create a citizen that needs service and has no history.
    pub const fn new(id: CitizenId, state: CitizenState) -> Self {
        Self {
            id,
            state,
            needs_service: true,
            waiting_time: 0,
            was_delayed_this_round: false,
            satisfaction: 0,
            neighbors: Vec::new(),
        }
    }

    /// Returns `true` if the citizen offers bribes.
    pub const fn is_bribe_offering(&self) -> bool {
        matches!(self.state, CitizenState::BribeOffering)
    }
}

// ---------------------------------------------------------------------------
// Bureaucrat
// ---------------------------------------------------------------------------

/// An official who serves citizens and is paid by the institution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bureaucrat {
    /// Stable id, dense within the bureaucrat population.
    pub id: BureaucratId,
    /// Current behavioral state.
    pub state: BureaucratState,
    /// Earnings from salary and bribes. Zeroed on confiscation.
    pub tokens: Decimal,
    /// Times this bureaucrat has been investigated during the run.
    pub investigations: u32,
    /// Net service quality delivered. May go negative.
    pub satisfaction: i64,
    /// Peer bureaucrats whose behavior influences this one.
    pub neighbors: Vec<BureaucratId>,
}

impl Bureaucrat {
    /// Create a bureaucrat with no earnings and no investigations.
    pub const fn new(id: BureaucratId, state: BureaucratState) -> Self {
        Self {
            id,
            state,
            tokens: Decimal::ZERO,
            investigations: 0,
            satisfaction: 0,
            neighbors: Vec::new(),
        }
    }

    /// Returns `true` if the bureaucrat is corrupt.
    pub const fn is_corrupt(&self) -> bool {
        matches!(self.state, BureaucratState::Corrupt)
    }
}

// ---------------------------------------------------------------------------
// Budget entry
// ---------------------------------------------------------------------------

/// One movement on the institution's budget.
///
/// Entries are appended in the order the movements happen and never edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetEntry {
    /// The round the movement happened in (1-based).
    pub round: u32,
    /// Category of movement.
    pub kind: BudgetEntryKind,
    /// Strictly positive amount moved.
    pub amount: Decimal,
    /// The bureaucrat involved, for per-agent movements.
    pub bureaucrat: Option<BureaucratId>,
}

// ---------------------------------------------------------------------------
// Round metrics
// ---------------------------------------------------------------------------

/// Snapshot of aggregate indicators taken at the end of one round.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundMetrics {
    /// Round index (1-based).
    pub round: u32,
    /// Institution budget after all stages of the round.
    pub institution_budget: Decimal,
    /// Fraction of bureaucrats in the corrupt state (0 when there are none).
    pub corruption_rate: Decimal,
    /// Number of bureaucrats investigated this round.
    pub investigated_count: u32,
    /// Tokens confiscated this round.
    pub confiscated_tokens: Decimal,
    /// Mean accumulated citizen satisfaction (0 when there are no citizens).
    pub avg_citizen_satisfaction: Decimal,
    /// Total tokens held by all bureaucrats.
    pub bureaucrat_tokens: Decimal,
    /// Institutional credibility after this round's update.
    pub credibility: Decimal,
    /// Fraction of citizens offering bribes (0 when there are none).
    pub citizen_bribe_rate: Decimal,
    /// Whether salaries were paid this round.
    pub salaries_paid: bool,
    /// Amount spent funding investigations this round.
    pub investigation_spend: Decimal,
    /// Investigated bureaucrats that were found corrupt.
    pub corrupt_caught: u32,
    /// Citizens served this round, with or without a bribe.
    pub served_count: u32,
    /// Citizens delayed this round.
    pub delayed_count: u32,
    /// Bribes accepted this round.
    pub bribes_accepted: u32,
    /// Whether the budget reconciled against its entries after the round.
    pub ledger_balanced: bool,
}
