//! Institution budget, salaries, and credibility for the corruption
//! simulation.
//!
//! The institution is the only shared resource in a run. Every movement on
//! its budget is recorded as a [`BudgetEntry`] and the balance is
//! reconciled against those entries after every round.
//!
//! # Architecture
//!
//! - [`institution`] -- The [`Institution`]: budget, credibility, salary
//!   payment, investigation funding, and confiscation credits.
//! - [`balance`] -- Reconciliation of the budget against its entries.
//!
//! # Budget guard
//!
//! The budget never goes negative. Salary payment and investigation
//! funding are all-or-nothing: when the full amount is not available the
//! operation does nothing for that round. A shortfall is not an error.
//!
//! ```
//! use corruption_ledger::Institution;
//! use corruption_ledger::balance::BalanceCheck;
//! use rust_decimal::Decimal;
//!
//! let mut institution = Institution::new(Decimal::new(100, 0), Decimal::ONE);
//!
//! // 10 bureaucrats at 5 each is affordable; 10 at 50 is not.
//! assert!(institution.try_debit(1, corruption_types::BudgetEntryKind::Salary, Decimal::new(50, 0)));
//! assert!(!institution.try_debit(1, corruption_types::BudgetEntryKind::Salary, Decimal::new(500, 0)));
//!
//! assert_eq!(institution.budget(), Decimal::new(50, 0));
//! assert_eq!(institution.verify_balance(), BalanceCheck::Balanced);
//! ```
//!
//! [`BudgetEntry`]: corruption_types::BudgetEntry

pub mod balance;
pub mod institution;

// Re-export primary types at crate root.
pub use balance::BalanceCheck;
pub use institution::{Institution, SalaryPayment};

use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A budget reconciliation failure.
///
/// Produced when the running budget no longer equals the initial budget
/// plus credits minus debits, or when the budget has gone negative.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("budget anomaly after round {round}: expected {expected}, found {actual}")]
pub struct BudgetAnomaly {
    /// The last round with recorded entries.
    pub round: u32,
    /// Budget implied by the initial balance and the recorded entries.
    pub expected: Decimal,
    /// The institution's actual budget.
    pub actual: Decimal,
}
