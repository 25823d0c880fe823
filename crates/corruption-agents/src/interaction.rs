//! The interaction stage: citizens request service from bureaucrats.
//!
//! Each citizen that needs service is paired with one bureaucrat chosen
//! uniformly at random, with replacement across citizens, so a single
//! bureaucrat may serve any number of citizens in a round. The pairing is
//! resolved by a fixed decision table:
//!
//! | Citizen | Bureaucrat | Outcome |
//! |---|---|---|
//! | Honest | Honest | Served; both satisfactions +1 |
//! | Honest | Corrupt | Delayed; waiting time +1; bureaucrat satisfaction -1 |
//! | Bribe-offering | Corrupt | Bribe accepted; bureaucrat tokens += bribe; served |
//! | Bribe-offering | Honest | Bribe refused but served; both satisfactions +1 |
//!
//! An honest bureaucrat who refuses a bribe stays honest. Being approached
//! with a bribe does not change a bureaucrat's state.

use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;

use corruption_types::{Bureaucrat, BureaucratState, Citizen, CitizenState, ServiceDemand};

use crate::config::BehaviorConfig;
use crate::pool::AgentPool;

/// How a single citizen/bureaucrat pairing was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encounter {
    /// Honest citizen served by an honest bureaucrat.
    ServedHonestly,
    /// Honest citizen delayed by a corrupt bureaucrat.
    Delayed,
    /// Bribe paid to a corrupt bureaucrat; citizen served.
    BribeAccepted,
    /// Bribe refused by an honest bureaucrat; citizen served anyway.
    BribeRefused,
}

impl Encounter {
    /// The citizen's experience of the encounter: +1 for fair service,
    /// 0 for service bought with a bribe, -1 for a delay.
    pub const fn outcome_score(self) -> i64 {
        match self {
            Self::ServedHonestly | Self::BribeRefused => 1,
            Self::BribeAccepted => 0,
            Self::Delayed => -1,
        }
    }

    /// Whether the citizen received service.
    pub const fn served(self) -> bool {
        !matches!(self, Self::Delayed)
    }
}

/// Aggregate result of one interaction stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InteractionOutcome {
    /// Citizens served, with or without a bribe.
    pub served: u32,
    /// Citizens delayed.
    pub delayed: u32,
    /// Bribes accepted.
    pub bribes_accepted: u32,
    /// One [`Encounter::outcome_score`] per citizen that was paired.
    pub outcome_scores: Vec<i64>,
}

/// Run the interaction stage over the whole pool.
///
/// Resets `was_delayed_this_round` for every citizen before any pairing is
/// resolved. Under [`ServiceDemand::EveryRound`] every citizen needs
/// service again; under [`ServiceDemand::Once`] citizens served in an
/// earlier round are skipped. With no bureaucrats the stage is a no-op.
pub fn run_interactions<R: Rng + ?Sized>(
    pool: &mut AgentPool,
    bribe_amount: Decimal,
    config: &BehaviorConfig,
    rng: &mut R,
) -> InteractionOutcome {
    let (citizens, bureaucrats) = pool.split_mut();

    for citizen in citizens.iter_mut() {
        citizen.was_delayed_this_round = false;
        if config.service_demand == ServiceDemand::EveryRound {
            citizen.needs_service = true;
        }
    }

    let mut outcome = InteractionOutcome::default();

    if bureaucrats.is_empty() {
        debug!(
            citizens = citizens.len(),
            "No bureaucrats to serve citizens, skipping interactions"
        );
        return outcome;
    }

    let bureaucrat_count = bureaucrats.len();

    for citizen in citizens.iter_mut() {
        if !citizen.needs_service {
            continue;
        }

        let pick = rng.random_range(0..bureaucrat_count);
        let Some(bureaucrat) = bureaucrats.get_mut(pick) else {
            continue;
        };

        let encounter = resolve_encounter(citizen, bureaucrat, bribe_amount, config);

        match encounter {
            Encounter::Delayed => outcome.delayed = outcome.delayed.saturating_add(1),
            Encounter::BribeAccepted => {
                outcome.served = outcome.served.saturating_add(1);
                outcome.bribes_accepted = outcome.bribes_accepted.saturating_add(1);
            }
            Encounter::ServedHonestly | Encounter::BribeRefused => {
                outcome.served = outcome.served.saturating_add(1);
            }
        }
        outcome.outcome_scores.push(encounter.outcome_score());
    }

    debug!(
        served = outcome.served,
        delayed = outcome.delayed,
        bribes_accepted = outcome.bribes_accepted,
        "Interactions resolved"
    );

    outcome
}

/// Resolve one pairing according to the decision table.
pub fn resolve_encounter(
    citizen: &mut Citizen,
    bureaucrat: &mut Bureaucrat,
    bribe_amount: Decimal,
    config: &BehaviorConfig,
) -> Encounter {
    match (citizen.state, bureaucrat.state) {
        (CitizenState::Honest, BureaucratState::Honest) => {
            citizen.needs_service = false;
            citizen.satisfaction = config.raise_satisfaction(citizen.satisfaction);
            bureaucrat.satisfaction = bureaucrat.satisfaction.saturating_add(1);
            Encounter::ServedHonestly
        }
        (CitizenState::Honest, BureaucratState::Corrupt) => {
            citizen.waiting_time = citizen.waiting_time.saturating_add(1);
            citizen.was_delayed_this_round = true;
            citizen.satisfaction = config.lower_satisfaction(citizen.satisfaction);
            bureaucrat.satisfaction = bureaucrat.satisfaction.saturating_sub(1);
            Encounter::Delayed
        }
        (CitizenState::BribeOffering, BureaucratState::Corrupt) => {
            bureaucrat.tokens = bureaucrat.tokens.saturating_add(bribe_amount);
            citizen.needs_service = false;
            Encounter::BribeAccepted
        }
        (CitizenState::BribeOffering, BureaucratState::Honest) => {
            citizen.needs_service = false;
            citizen.satisfaction = config.raise_satisfaction(citizen.satisfaction);
            bureaucrat.satisfaction = bureaucrat.satisfaction.saturating_add(1);
            Encounter::BribeRefused
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use corruption_types::{BureaucratId, CitizenId};

    use super::*;

    fn citizen(id: u32, state: CitizenState) -> Citizen {
        Citizen::new(CitizenId(id), state)
    }

    fn bureaucrat(id: u32, state: BureaucratState) -> Bureaucrat {
        Bureaucrat::new(BureaucratId(id), state)
    }

    fn bribe() -> Decimal {
        Decimal::new(2, 0)
    }

    #[test]
    fn honest_meets_honest() {
        let cfg = BehaviorConfig::default();
        let mut c = citizen(0, CitizenState::Honest);
        let mut b = bureaucrat(0, BureaucratState::Honest);

        let e = resolve_encounter(&mut c, &mut b, bribe(), &cfg);

        assert_eq!(e, Encounter::ServedHonestly);
        assert!(!c.needs_service);
        assert_eq!(c.satisfaction, 1);
        assert_eq!(b.satisfaction, 1);
        assert_eq!(b.tokens, Decimal::ZERO);
    }

    #[test]
    fn honest_meets_corrupt_is_delayed() {
        let cfg = BehaviorConfig::default();
        let mut c = citizen(0, CitizenState::Honest);
        let mut b = bureaucrat(0, BureaucratState::Corrupt);

        let e = resolve_encounter(&mut c, &mut b, bribe(), &cfg);

        assert_eq!(e, Encounter::Delayed);
        assert!(c.needs_service, "delayed citizens are not served");
        assert_eq!(c.waiting_time, 1);
        assert!(c.was_delayed_this_round);
        assert_eq!(c.satisfaction, 0);
        assert_eq!(b.satisfaction, -1);
    }

    #[test]
    fn delay_penalty_applies_when_configured() {
        let cfg = BehaviorConfig {
            delay_penalty: 1,
            ..BehaviorConfig::default()
        };
        let mut c = citizen(0, CitizenState::Honest);
        let mut b = bureaucrat(0, BureaucratState::Corrupt);
        let _ = resolve_encounter(&mut c, &mut b, bribe(), &cfg);
        assert_eq!(c.satisfaction, -1);
    }

    #[test]
    fn briber_meets_corrupt_pays() {
        let cfg = BehaviorConfig::default();
        let mut c = citizen(0, CitizenState::BribeOffering);
        let mut b = bureaucrat(0, BureaucratState::Corrupt);

        let e = resolve_encounter(&mut c, &mut b, bribe(), &cfg);

        assert_eq!(e, Encounter::BribeAccepted);
        assert!(!c.needs_service);
        assert_eq!(c.satisfaction, 0);
        assert_eq!(b.tokens, bribe());
        assert_eq!(b.satisfaction, 0);
    }

    #[test]
    fn briber_meets_honest_is_served_and_bureaucrat_stays_honest() {
        let cfg = BehaviorConfig::default();
        let mut c = citizen(0, CitizenState::BribeOffering);
        let mut b = bureaucrat(0, BureaucratState::Honest);

        let e = resolve_encounter(&mut c, &mut b, bribe(), &cfg);

        assert_eq!(e, Encounter::BribeRefused);
        assert!(!c.needs_service);
        assert_eq!(c.satisfaction, 1);
        assert_eq!(b.satisfaction, 1);
        assert_eq!(b.state, BureaucratState::Honest);
        assert_eq!(b.tokens, Decimal::ZERO);
    }

    #[test]
    fn outcome_scores_follow_service_quality() {
        assert_eq!(Encounter::ServedHonestly.outcome_score(), 1);
        assert_eq!(Encounter::BribeRefused.outcome_score(), 1);
        assert_eq!(Encounter::BribeAccepted.outcome_score(), 0);
        assert_eq!(Encounter::Delayed.outcome_score(), -1);
        assert!(!Encounter::Delayed.served());
    }

    #[test]
    fn all_honest_round_serves_everyone() {
        let cfg = BehaviorConfig::default();
        let citizens = (0..10).map(|i| citizen(i, CitizenState::Honest)).collect();
        let bureaucrats = (0..5).map(|i| bureaucrat(i, BureaucratState::Honest)).collect();
        let mut pool = AgentPool::from_parts(citizens, bureaucrats).unwrap();
        let mut rng = StdRng::seed_from_u64(42);

        let outcome = run_interactions(&mut pool, bribe(), &cfg, &mut rng);

        assert_eq!(outcome.served, 10);
        assert_eq!(outcome.delayed, 0);
        assert_eq!(outcome.outcome_scores.len(), 10);
        assert!(pool.citizens().iter().all(|c| c.satisfaction == 1 && !c.needs_service));
        let bureaucrat_total: i64 = pool.bureaucrats().iter().map(|b| b.satisfaction).sum();
        assert_eq!(bureaucrat_total, 10);
    }

    #[test]
    fn delay_flag_is_reset_each_round() {
        let cfg = BehaviorConfig::default();
        let mut c = citizen(0, CitizenState::Honest);
        c.was_delayed_this_round = true;
        let mut pool =
            AgentPool::from_parts(vec![c], vec![bureaucrat(0, BureaucratState::Honest)]).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let _ = run_interactions(&mut pool, bribe(), &cfg, &mut rng);

        assert!(!pool.citizens().first().unwrap().was_delayed_this_round);
    }

    #[test]
    fn no_bureaucrats_is_a_no_op() {
        let cfg = BehaviorConfig::default();
        let mut pool =
            AgentPool::from_parts(vec![citizen(0, CitizenState::Honest)], Vec::new()).unwrap();
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = run_interactions(&mut pool, bribe(), &cfg, &mut rng);

        assert_eq!(outcome, InteractionOutcome::default());
        let c = pool.citizens().first().unwrap();
        assert_eq!(c.waiting_time, 0);
        assert_eq!(c.satisfaction, 0);
    }

    #[test]
    fn one_shot_demand_skips_served_citizens() {
        let cfg = BehaviorConfig {
            service_demand: ServiceDemand::Once,
            ..BehaviorConfig::default()
        };
        let mut pool = AgentPool::from_parts(
            vec![citizen(0, CitizenState::Honest)],
            vec![bureaucrat(0, BureaucratState::Honest)],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        let first = run_interactions(&mut pool, bribe(), &cfg, &mut rng);
        let second = run_interactions(&mut pool, bribe(), &cfg, &mut rng);

        assert_eq!(first.served, 1);
        assert_eq!(second.served, 0);
        assert!(second.outcome_scores.is_empty());
        assert_eq!(pool.citizens().first().unwrap().satisfaction, 1);
    }

    #[test]
    fn every_round_demand_serves_again() {
        let cfg = BehaviorConfig::default();
        let mut pool = AgentPool::from_parts(
            vec![citizen(0, CitizenState::Honest)],
            vec![bureaucrat(0, BureaucratState::Honest)],
        )
        .unwrap();
        let mut rng = StdRng::seed_from_u64(5);

        for _ in 0..3 {
            let _ = run_interactions(&mut pool, bribe(), &cfg, &mut rng);
        }

        assert_eq!(pool.citizens().first().unwrap().satisfaction, 3);
    }
}
