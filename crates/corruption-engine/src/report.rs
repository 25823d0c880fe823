//! Plain-text rendering of the metrics log.

use std::fmt::Write as _;

use corruption_types::RoundMetrics;

/// Render the metrics log as a fixed-width table, one row per round.
pub fn render_table(log: &[RoundMetrics]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>5} {:>12} {:>8} {:>8} {:>12} {:>12} {:>12} {:>12} {:>11}",
        "round",
        "budget",
        "corrupt",
        "bribing",
        "investigated",
        "confiscated",
        "satisfaction",
        "tokens",
        "credibility",
    );
    for m in log {
        let _ = writeln!(
            out,
            "{:>5} {:>12} {:>8} {:>8} {:>12} {:>12} {:>12} {:>12} {:>11}",
            m.round,
            m.institution_budget.round_dp(2),
            m.corruption_rate.round_dp(3),
            m.citizen_bribe_rate.round_dp(3),
            m.investigated_count,
            m.confiscated_tokens.round_dp(2),
            m.avg_citizen_satisfaction.round_dp(2),
            m.bureaucrat_tokens.round_dp(2),
            m.credibility.round_dp(3),
        );
    }
    out
}
