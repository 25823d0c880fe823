//! The investigation stage: budget-guarded audits and confiscation.
//!
//! The whole selection is funded up front. If the institution cannot pay
//! `investigation_cost * selected` in full, nobody is investigated this
//! round; there is no partial investigation. The cost is debited before any
//! confiscation is credited, so confiscated tokens never fund the audit
//! that found them.

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use tracing::{debug, warn};

use corruption_agents::AgentPool;
use corruption_ledger::Institution;
use corruption_types::{BudgetEntryKind, BureaucratId, BureaucratState};

/// What happened during one investigation stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvestigationOutcome {
    /// Bureaucrats actually investigated, in selection order.
    pub investigated: Vec<BureaucratId>,
    /// Tokens confiscated from corrupt bureaucrats.
    pub confiscated: Decimal,
    /// Amount debited to fund the investigations.
    pub cost: Decimal,
    /// Investigated bureaucrats that were corrupt.
    pub corrupt_caught: u32,
    /// Whether the selection could be funded. `true` for an empty selection.
    pub funded: bool,
}

/// Restrict a strategy's selection to bureaucrats in the pool, dropping
/// duplicates while keeping first-seen order.
pub fn sanitize_selection(pool: &AgentPool, selection: Vec<BureaucratId>) -> Vec<BureaucratId> {
    let proposed = selection.len();
    let mut seen = BTreeSet::new();
    let cleaned: Vec<BureaucratId> = selection
        .into_iter()
        .filter(|id| pool.bureaucrat(*id).is_some() && seen.insert(*id))
        .collect();

    if cleaned.len() != proposed {
        warn!(
            proposed,
            kept = cleaned.len(),
            "Strategy selected unknown or duplicate bureaucrats, dropping them"
        );
    }
    cleaned
}

/// Fund and run investigations of `selection`.
///
/// Each investigated bureaucrat has its `investigations` counter
/// incremented. A corrupt one has its tokens confiscated into the budget
/// and is reset to honest. Honest bureaucrats keep their tokens.
///
/// `selection` must already be sanitized.
pub fn run_investigations(
    round: u32,
    pool: &mut AgentPool,
    institution: &mut Institution,
    selection: &[BureaucratId],
    cost_per_investigation: Decimal,
) -> InvestigationOutcome {
    let cost = cost_per_investigation.saturating_mul(Decimal::from(selection.len()));

    if !institution.try_debit(round, BudgetEntryKind::InvestigationCost, cost) {
        debug!(
            round,
            selected = selection.len(),
            %cost,
            budget = %institution.budget(),
            "Investigations unaffordable, nobody investigated"
        );
        return InvestigationOutcome::default();
    }

    let mut outcome = InvestigationOutcome {
        cost,
        funded: true,
        ..InvestigationOutcome::default()
    };

    for id in selection {
        let Some(bureaucrat) = pool.bureaucrat_mut(*id) else {
            continue;
        };
        bureaucrat.investigations = bureaucrat.investigations.saturating_add(1);
        outcome.investigated.push(*id);

        if bureaucrat.state != BureaucratState::Corrupt {
            continue;
        }

        let seized = bureaucrat.tokens;
        bureaucrat.tokens = Decimal::ZERO;
        bureaucrat.state = BureaucratState::Honest;
        institution.credit_confiscation(round, *id, seized);

        outcome.confiscated = outcome.confiscated.saturating_add(seized);
        outcome.corrupt_caught = outcome.corrupt_caught.saturating_add(1);
        debug!(round, bureaucrat = %id, %seized, "Corrupt bureaucrat caught");
    }

    outcome
}
