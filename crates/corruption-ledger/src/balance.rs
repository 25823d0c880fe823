//! Budget reconciliation.
//!
//! After every round the institution's running budget must equal
//!
//! ```text
//! initial_budget + sum(credits) - sum(debits)
//! ```
//!
//! and must not be negative. Both hold by construction when every movement
//! goes through [`Institution`]; the check catches a movement that bypassed
//! the entry log.
//!
//! [`Institution`]: crate::Institution

use rust_decimal::Decimal;

use corruption_types::BudgetEntry;

use crate::BudgetAnomaly;

/// The result of reconciling the budget against its entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceCheck {
    /// The budget matches its entries and is non-negative.
    Balanced,
    /// The budget disagrees with its entries or is negative.
    Anomaly(BudgetAnomaly),
}

impl BalanceCheck {
    /// Returns `true` for [`BalanceCheck::Balanced`].
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Reconcile `actual` against `initial` and the recorded entries.
pub fn reconcile(initial: Decimal, actual: Decimal, entries: &[BudgetEntry]) -> BalanceCheck {
    let expected = entries.iter().fold(initial, |acc, entry| {
        if entry.kind.is_credit() {
            acc.saturating_add(entry.amount)
        } else {
            acc.saturating_sub(entry.amount)
        }
    });

    if expected == actual && !actual.is_sign_negative() {
        return BalanceCheck::Balanced;
    }

    BalanceCheck::Anomaly(BudgetAnomaly {
        round: entries.last().map_or(0, |e| e.round),
        expected,
        actual,
    })
}
