//! The institution: pays salaries, funds investigations, and tracks its
//! own credibility.
//!
//! # Design
//!
//! - **Guarded**: a debit happens in full or not at all; the budget never
//!   goes below zero.
//! - **Append-only**: every non-zero movement produces a [`BudgetEntry`].
//! - **Precision**: all amounts use [`Decimal`].

use rust_decimal::Decimal;
use tracing::debug;

use corruption_types::{BudgetEntry, BudgetEntryKind, Bureaucrat, BureaucratId};

use crate::balance::{self, BalanceCheck};

/// Credibility below which the institution is in reactive mode (0.4).
fn default_reactive_threshold() -> Decimal {
    Decimal::new(4, 1)
}

/// Result of one salary payment attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryPayment {
    /// Whether the salaries were paid.
    pub paid: bool,
    /// The full outlay that was due (paid or not).
    pub total: Decimal,
}

/// The institution that employs, pays, and audits bureaucrats.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Institution {
    /// Budget at the start of the run.
    initial_budget: Decimal,
    /// Current budget. Never negative.
    budget: Decimal,
    /// Institutional credibility in `[0, 1]`.
    credibility: Decimal,
    /// Credibility below which [`Institution::reactive_mode`] holds.
    reactive_threshold: Decimal,
    /// Every movement on the budget, in order.
    entries: Vec<BudgetEntry>,
}

impl Institution {
    /// Create an institution with the given starting budget and credibility.
    ///
    /// A negative budget is floored at zero and credibility is clamped to
    /// `[0, 1]`.
    pub fn new(initial_budget: Decimal, credibility: Decimal) -> Self {
        let initial_budget = initial_budget.max(Decimal::ZERO);
        Self {
            initial_budget,
            budget: initial_budget,
            credibility: clamp_unit(credibility),
            reactive_threshold: default_reactive_threshold(),
            entries: Vec::new(),
        }
    }

    /// Override the reactive-mode credibility threshold.
    #[must_use]
    pub fn with_reactive_threshold(mut self, threshold: Decimal) -> Self {
        self.reactive_threshold = threshold;
        self
    }

    /// Current budget.
    pub const fn budget(&self) -> Decimal {
        self.budget
    }

    /// Budget at the start of the run.
    pub const fn initial_budget(&self) -> Decimal {
        self.initial_budget
    }

    /// Current credibility.
    pub const fn credibility(&self) -> Decimal {
        self.credibility
    }

    /// All recorded budget movements.
    pub fn entries(&self) -> &[BudgetEntry] {
        &self.entries
    }

    /// Whether credibility has dropped below the reactive threshold.
    pub fn reactive_mode(&self) -> bool {
        self.credibility < self.reactive_threshold
    }

    /// Whether `amount` could be debited right now.
    pub fn can_afford(&self, amount: Decimal) -> bool {
        !amount.is_sign_negative() && self.budget >= amount
    }

    /// Debit `amount` if the whole amount is available.
    ///
    /// Returns `false` and leaves the budget untouched when it is not, or
    /// when `amount` is negative. A zero amount always succeeds and records
    /// nothing.
    pub fn try_debit(&mut self, round: u32, kind: BudgetEntryKind, amount: Decimal) -> bool {
        if !self.can_afford(amount) {
            debug!(
                round,
                ?kind,
                %amount,
                budget = %self.budget,
                "Debit refused, insufficient budget"
            );
            return false;
        }
        if amount.is_zero() {
            return true;
        }
        self.budget = self.budget.saturating_sub(amount);
        self.entries.push(BudgetEntry {
            round,
            kind,
            amount,
            bureaucrat: None,
        });
        true
    }

    /// Credit confiscated tokens from one bureaucrat.
    ///
    /// Non-positive amounts are ignored.
    pub fn credit_confiscation(&mut self, round: u32, bureaucrat: BureaucratId, amount: Decimal) {
        if amount <= Decimal::ZERO {
            return;
        }
        self.budget = self.budget.saturating_add(amount);
        self.entries.push(BudgetEntry {
            round,
            kind: BudgetEntryKind::Confiscation,
            amount,
            bureaucrat: Some(bureaucrat),
        });
    }

    /// Pay `rate` to every bureaucrat, or nobody.
    ///
    /// The outlay is `rate * bureaucrats.len()`. If the budget cannot cover
    /// it the round's salaries are skipped entirely; there is no partial
    /// payment.
    pub fn pay_salaries(
        &mut self,
        round: u32,
        bureaucrats: &mut [Bureaucrat],
        rate: Decimal,
    ) -> SalaryPayment {
        let total = rate.saturating_mul(Decimal::from(bureaucrats.len()));

        if !self.try_debit(round, BudgetEntryKind::Salary, total) {
            debug!(round, %total, "Salaries skipped this round");
            return SalaryPayment { paid: false, total };
        }

        for bureaucrat in bureaucrats.iter_mut() {
            bureaucrat.tokens = bureaucrat.tokens.saturating_add(rate);
        }

        SalaryPayment { paid: true, total }
    }

    /// Fold this round's citizen outcome scores into credibility.
    ///
    /// The new credibility is the mean of the current value and the
    /// average score, clamped to `[0, 1]`. With no scores the update is
    /// skipped and `None` is returned.
    pub fn update_credibility(&mut self, scores: &[i64]) -> Option<Decimal> {
        if scores.is_empty() {
            return None;
        }
        let sum = scores.iter().fold(0_i64, |acc, s| acc.saturating_add(*s));
        let average = Decimal::from(sum).checked_div(Decimal::from(scores.len()))?;
        let blended = self
            .credibility
            .saturating_add(average)
            .checked_div(Decimal::TWO)?;
        self.credibility = clamp_unit(blended);
        Some(self.credibility)
    }

    /// Reconcile the budget against the recorded entries.
    pub fn verify_balance(&self) -> BalanceCheck {
        balance::reconcile(self.initial_budget, self.budget, &self.entries)
    }
}

fn clamp_unit(value: Decimal) -> Decimal {
    value.clamp(Decimal::ZERO, Decimal::ONE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use corruption_types::BureaucratState;

    use super::*;

    fn bureaucrats(n: u32) -> Vec<Bureaucrat> {
        (0..n)
            .map(|i| Bureaucrat::new(BureaucratId(i), BureaucratState::Honest))
            .collect()
    }

    #[test]
    fn salaries_paid_when_affordable() {
        let mut inst = Institution::new(Decimal::from(1000), Decimal::ONE);
        let mut staff = bureaucrats(5);

        let payment = inst.pay_salaries(1, &mut staff, Decimal::from(50));

        assert!(payment.paid);
        assert_eq!(payment.total, Decimal::from(250));
        assert_eq!(inst.budget(), Decimal::from(750));
        assert!(staff.iter().all(|b| b.tokens == Decimal::from(50)));
        assert_eq!(inst.entries().len(), 1);
        assert!(inst.verify_balance().is_balanced());
    }

    #[test]
    fn salaries_skipped_without_partial_payment() {
        let mut inst = Institution::new(Decimal::from(100), Decimal::ONE);
        let mut staff = bureaucrats(5);

        let payment = inst.pay_salaries(1, &mut staff, Decimal::from(50));

        assert!(!payment.paid);
        assert_eq!(inst.budget(), Decimal::from(100));
        assert!(staff.iter().all(|b| b.tokens == Decimal::ZERO));
        assert!(inst.entries().is_empty());
    }

    #[test]
    fn salary_exactly_equal_to_budget_is_paid() {
        let mut inst = Institution::new(Decimal::from(250), Decimal::ONE);
        let mut staff = bureaucrats(5);
        assert!(inst.pay_salaries(1, &mut staff, Decimal::from(50)).paid);
        assert_eq!(inst.budget(), Decimal::ZERO);
    }

    #[test]
    fn empty_staff_costs_nothing() {
        let mut inst = Institution::new(Decimal::from(10), Decimal::ONE);
        let payment = inst.pay_salaries(1, &mut [], Decimal::from(50));
        assert!(payment.paid);
        assert_eq!(inst.budget(), Decimal::from(10));
        assert!(inst.entries().is_empty());
    }

    #[test]
    fn negative_debit_is_refused() {
        let mut inst = Institution::new(Decimal::from(10), Decimal::ONE);
        assert!(!inst.try_debit(1, BudgetEntryKind::InvestigationCost, Decimal::from(-5)));
        assert_eq!(inst.budget(), Decimal::from(10));
    }

    #[test]
    fn confiscation_credits_budget() {
        let mut inst = Institution::new(Decimal::from(10), Decimal::ONE);
        inst.credit_confiscation(2, BureaucratId(4), Decimal::from(30));
        inst.credit_confiscation(2, BureaucratId(5), Decimal::ZERO);

        assert_eq!(inst.budget(), Decimal::from(40));
        assert_eq!(inst.entries().len(), 1);
        let entry = inst.entries().first().unwrap();
        assert_eq!(entry.kind, BudgetEntryKind::Confiscation);
        assert_eq!(entry.bureaucrat, Some(BureaucratId(4)));
        assert!(inst.verify_balance().is_balanced());
    }

    #[test]
    fn credibility_is_mean_of_current_and_average_score() {
        let mut inst = Institution::new(Decimal::ZERO, Decimal::ONE);
        // Average of [1, 0, 0, 1] is 0.5; mean with 1.0 is 0.75.
        let updated = inst.update_credibility(&[1, 0, 0, 1]);
        assert_eq!(updated, Some(Decimal::new(75, 2)));
        assert!(!inst.reactive_mode());
    }

    #[test]
    fn credibility_clamped_at_zero() {
        let mut inst = Institution::new(Decimal::ZERO, Decimal::new(2, 1));
        // Average -1; (0.2 + -1) / 2 = -0.4, clamped to 0.
        assert_eq!(inst.update_credibility(&[-1, -1]), Some(Decimal::ZERO));
        assert!(inst.reactive_mode());
    }

    #[test]
    fn credibility_unchanged_without_observations() {
        let mut inst = Institution::new(Decimal::ZERO, Decimal::new(6, 1));
        assert_eq!(inst.update_credibility(&[]), None);
        assert_eq!(inst.credibility(), Decimal::new(6, 1));
    }

    #[test]
    fn reactive_threshold_is_configurable() {
        let inst = Institution::new(Decimal::ZERO, Decimal::new(5, 1))
            .with_reactive_threshold(Decimal::new(6, 1));
        assert!(inst.reactive_mode());
    }

    #[test]
    fn constructor_clamps_inputs() {
        let inst = Institution::new(Decimal::from(-5), Decimal::from(3));
        assert_eq!(inst.budget(), Decimal::ZERO);
        assert_eq!(inst.credibility(), Decimal::ONE);
    }
}
