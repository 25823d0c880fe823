//! The influence stage: peer pressure between neighbors.
//!
//! Runs after interactions and investigations, so it sees this round's
//! delays and this round's investigation count. Neighbor states are read
//! from a snapshot taken before any agent switches, which makes the
//! result independent of iteration order.
//!
//! # Citizens
//!
//! An honest citizen starts offering bribes if at least
//! `citizen_corruption_threshold` of its neighbors offer bribes, or if it
//! was itself delayed this round. There is no rule that turns a
//! bribe-offering citizen honest again.
//!
//! # Bureaucrats
//!
//! When fewer than `investigation_pressure_ratio` of all bureaucrats were
//! investigated this round, an honest bureaucrat turns corrupt if at least
//! `bureaucrat_corruption_threshold` of its neighbors are corrupt. Under
//! sufficient pressure no bureaucrat turns. Reversion to honesty happens
//! only through investigation.

use rust_decimal::Decimal;
use tracing::debug;

use corruption_types::{BureaucratState, CitizenState};

use crate::config::BehaviorConfig;
use crate::pool::AgentPool;

/// Number of agents that switched state during one influence stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InfluenceOutcome {
    /// Citizens that started offering bribes.
    pub citizens_converted: u32,
    /// Honest bureaucrats that turned corrupt.
    pub bureaucrats_corrupted: u32,
    /// Whether investigation pressure was too low to hold off contagion.
    pub pressure_insufficient: bool,
}

/// Apply peer influence to every agent in the pool.
///
/// `investigated_this_round` is the number of bureaucrats actually
/// investigated in the current round (0 when the round's investigation
/// was unaffordable).
pub fn apply_influence(
    pool: &mut AgentPool,
    investigated_this_round: usize,
    config: &BehaviorConfig,
) -> InfluenceOutcome {
    let mut outcome = InfluenceOutcome::default();

    // --- Citizens ---
    let bribing: Vec<bool> = pool.citizens().iter().map(|c| c.is_bribe_offering()).collect();
    let (citizens, bureaucrats) = pool.split_mut();

    for citizen in citizens.iter_mut() {
        if citizen.state == CitizenState::BribeOffering {
            continue;
        }
        let peers = count_matching(citizen.neighbors.iter().map(|n| n.index()), &bribing);
        if meets_threshold(peers, config.citizen_corruption_threshold)
            || citizen.was_delayed_this_round
        {
            citizen.state = CitizenState::BribeOffering;
            outcome.citizens_converted = outcome.citizens_converted.saturating_add(1);
        }
    }

    // --- Bureaucrats ---
    let required = config
        .investigation_pressure_ratio
        .saturating_mul(Decimal::from(bureaucrats.len()));
    outcome.pressure_insufficient = Decimal::from(investigated_this_round) < required;

    if outcome.pressure_insufficient {
        let corrupt: Vec<bool> = bureaucrats.iter().map(|b| b.is_corrupt()).collect();
        for bureaucrat in bureaucrats.iter_mut() {
            if bureaucrat.state == BureaucratState::Corrupt {
                continue;
            }
            let peers = count_matching(bureaucrat.neighbors.iter().map(|n| n.index()), &corrupt);
            if meets_threshold(peers, config.bureaucrat_corruption_threshold) {
                bureaucrat.state = BureaucratState::Corrupt;
                outcome.bureaucrats_corrupted = outcome.bureaucrats_corrupted.saturating_add(1);
            }
        }
    }

    debug!(
        citizens_converted = outcome.citizens_converted,
        bureaucrats_corrupted = outcome.bureaucrats_corrupted,
        pressure_insufficient = outcome.pressure_insufficient,
        "Peer influence applied"
    );

    outcome
}

/// Count neighbor positions whose flag is set in `snapshot`.
///
/// Positions that do not resolve to an agent in the snapshot are skipped.
fn count_matching<I>(positions: I, snapshot: &[bool]) -> usize
where
    I: Iterator<Item = Option<usize>>,
{
    positions
        .filter_map(|p| snapshot.get(p?))
        .filter(|flag| **flag)
        .count()
}

fn meets_threshold(count: usize, threshold: u32) -> bool {
    u32::try_from(count).unwrap_or(u32::MAX) >= threshold
}
