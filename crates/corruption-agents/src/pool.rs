//! The agent pool: owning collections of citizens and bureaucrats.
//!
//! Citizens and bureaucrats are stored in id order, so an id is also the
//! record's position. Neighbor lists hold ids only; every lookup goes
//! through [`AgentPool::citizen`] or [`AgentPool::bureaucrat`], which
//! return `None` for ids outside the pool instead of faulting.
//!
//! # Initialization
//!
//! [`AgentPool::initialize`] draws every agent's initial state
//! independently (corrupt with the class probability), then gives each
//! agent `min(neighbor_cap, class_size - 1)` neighbors sampled uniformly
//! without replacement from the rest of its own class. Neighbor relations
//! are not reciprocal.

use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;

use corruption_types::{
    Bureaucrat, BureaucratId, BureaucratState, Citizen, CitizenId, CitizenState,
};

use crate::error::PoolError;

// ---------------------------------------------------------------------------
// PopulationSpec
// ---------------------------------------------------------------------------

/// Sizes and initial corruption probabilities for both agent classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationSpec {
    /// Number of citizens to create.
    pub citizens: u32,
    /// Number of bureaucrats to create.
    pub bureaucrats: u32,
    /// Probability that each citizen starts out offering bribes.
    pub citizen_corruption: f64,
    /// Probability that each bureaucrat starts out corrupt.
    pub bureaucrat_corruption: f64,
    /// Maximum neighbors per agent.
    pub neighbor_cap: u32,
}

// ---------------------------------------------------------------------------
// AgentPool
// ---------------------------------------------------------------------------

/// Owning collection of every agent in a run.
///
/// The population is fixed for the lifetime of the pool. Stages borrow the
/// pool mutably one at a time; no stage holds references across rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgentPool {
    /// Citizens in id order.
    citizens: Vec<Citizen>,
    /// Bureaucrats in id order.
    bureaucrats: Vec<Bureaucrat>,
}

impl AgentPool {
    /// Create both populations and wire up their neighbor sets.
    ///
    /// A population of zero yields an empty collection; later stages treat
    /// it as a no-op.
    pub fn initialize<R: Rng + ?Sized>(
        spec: &PopulationSpec,
        rng: &mut R,
    ) -> Result<Self, PoolError> {
        check_probability("citizens", spec.citizen_corruption)?;
        check_probability("bureaucrats", spec.bureaucrat_corruption)?;

        let mut citizens: Vec<Citizen> = (0..spec.citizens)
            .map(|raw| {
                let state = if draw(rng, spec.citizen_corruption) {
                    CitizenState::BribeOffering
                } else {
                    CitizenState::Honest
                };
                Citizen::new(CitizenId(raw), state)
            })
            .collect();

        let mut bureaucrats: Vec<Bureaucrat> = (0..spec.bureaucrats)
            .map(|raw| {
                let state = if draw(rng, spec.bureaucrat_corruption) {
                    BureaucratState::Corrupt
                } else {
                    BureaucratState::Honest
                };
                Bureaucrat::new(BureaucratId(raw), state)
            })
            .collect();

        let cap = usize::try_from(spec.neighbor_cap).unwrap_or(usize::MAX);

        let citizen_count = citizens.len();
        for (position, citizen) in citizens.iter_mut().enumerate() {
            citizen.neighbors = sample_neighbors(rng, citizen_count, position, cap)
                .into_iter()
                .filter_map(CitizenId::from_index)
                .collect();
        }

        let bureaucrat_count = bureaucrats.len();
        for (position, bureaucrat) in bureaucrats.iter_mut().enumerate() {
            bureaucrat.neighbors = sample_neighbors(rng, bureaucrat_count, position, cap)
                .into_iter()
                .filter_map(BureaucratId::from_index)
                .collect();
        }

        let pool = Self {
            citizens,
            bureaucrats,
        };

        debug!(
            citizens = pool.citizens.len(),
            bureaucrats = pool.bureaucrats.len(),
            bribe_offering = pool.bribe_offering_count(),
            corrupt = pool.corrupt_count(),
            "Agent pool initialized"
        );

        Ok(pool)
    }

    /// Build a pool from existing records.
    ///
    /// Ids must be dense from 0 in each collection and no agent may list
    /// itself as a neighbor. Neighbor ids outside the pool are accepted;
    /// lookups skip them.
    pub fn from_parts(
        citizens: Vec<Citizen>,
        bureaucrats: Vec<Bureaucrat>,
    ) -> Result<Self, PoolError> {
        for (position, citizen) in citizens.iter().enumerate() {
            let expected = CitizenId::from_index(position).ok_or_else(|| {
                PoolError::PopulationTooLarge {
                    class: "citizens",
                    size: u64::try_from(citizens.len()).unwrap_or(u64::MAX),
                }
            })?;
            if citizen.id != expected {
                return Err(PoolError::CitizenIdMismatch {
                    position,
                    id: citizen.id,
                });
            }
            if citizen.neighbors.contains(&citizen.id) {
                return Err(PoolError::SelfNeighbor {
                    class: "citizen",
                    id: citizen.id.into_inner(),
                });
            }
        }

        for (position, bureaucrat) in bureaucrats.iter().enumerate() {
            let expected = BureaucratId::from_index(position).ok_or_else(|| {
                PoolError::PopulationTooLarge {
                    class: "bureaucrats",
                    size: u64::try_from(bureaucrats.len()).unwrap_or(u64::MAX),
                }
            })?;
            if bureaucrat.id != expected {
                return Err(PoolError::BureaucratIdMismatch {
                    position,
                    id: bureaucrat.id,
                });
            }
            if bureaucrat.neighbors.contains(&bureaucrat.id) {
                return Err(PoolError::SelfNeighbor {
                    class: "bureaucrat",
                    id: bureaucrat.id.into_inner(),
                });
            }
        }

        Ok(Self {
            citizens,
            bureaucrats,
        })
    }

    /// Consume the pool and return its collections.
    pub fn into_parts(self) -> (Vec<Citizen>, Vec<Bureaucrat>) {
        (self.citizens, self.bureaucrats)
    }

    /// All citizens in id order.
    pub fn citizens(&self) -> &[Citizen] {
        &self.citizens
    }

    /// All bureaucrats in id order.
    pub fn bureaucrats(&self) -> &[Bureaucrat] {
        &self.bureaucrats
    }

    /// Mutable access to all bureaucrats.
    pub fn bureaucrats_mut(&mut self) -> &mut [Bureaucrat] {
        &mut self.bureaucrats
    }

    /// Mutable access to both collections at once.
    ///
    /// The interaction stage needs to update a citizen and the bureaucrat
    /// it was paired with in the same step.
    pub fn split_mut(&mut self) -> (&mut [Citizen], &mut [Bureaucrat]) {
        (&mut self.citizens, &mut self.bureaucrats)
    }

    /// Look up a citizen by id.
    pub fn citizen(&self, id: CitizenId) -> Option<&Citizen> {
        self.citizens.get(id.index()?)
    }

    /// Look up a bureaucrat by id.
    pub fn bureaucrat(&self, id: BureaucratId) -> Option<&Bureaucrat> {
        self.bureaucrats.get(id.index()?)
    }

    /// Look up a bureaucrat by id for mutation.
    pub fn bureaucrat_mut(&mut self, id: BureaucratId) -> Option<&mut Bureaucrat> {
        self.bureaucrats.get_mut(id.index()?)
    }

    /// Number of bureaucrats currently corrupt.
    pub fn corrupt_count(&self) -> usize {
        self.bureaucrats.iter().filter(|b| b.is_corrupt()).count()
    }

    /// Number of citizens currently offering bribes.
    pub fn bribe_offering_count(&self) -> usize {
        self.citizens.iter().filter(|c| c.is_bribe_offering()).count()
    }

    /// Fraction of bureaucrats that are corrupt; 0 for an empty population.
    pub fn corruption_rate(&self) -> Decimal {
        ratio(self.corrupt_count(), self.bureaucrats.len())
    }

    /// Fraction of citizens offering bribes; 0 for an empty population.
    pub fn citizen_bribe_rate(&self) -> Decimal {
        ratio(self.bribe_offering_count(), self.citizens.len())
    }

    /// Mean accumulated citizen satisfaction; 0 for an empty population.
    pub fn average_citizen_satisfaction(&self) -> Decimal {
        let total = self
            .citizens
            .iter()
            .fold(0_i64, |acc, c| acc.saturating_add(c.satisfaction));
        mean(Decimal::from(total), self.citizens.len())
    }

    /// Sum of all bureaucrat token balances.
    pub fn total_bureaucrat_tokens(&self) -> Decimal {
        self.bureaucrats
            .iter()
            .fold(Decimal::ZERO, |acc, b| acc.saturating_add(b.tokens))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// `count / total` as a [`Decimal`], or 0 when `total` is 0.
pub fn ratio(count: usize, total: usize) -> Decimal {
    mean(Decimal::from(count), total)
}

/// `sum / count`, or 0 when `count` is 0.
fn mean(sum: Decimal, count: usize) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    sum.checked_div(Decimal::from(count))
        .unwrap_or(Decimal::ZERO)
}

fn check_probability(class: &'static str, value: f64) -> Result<(), PoolError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(PoolError::InvalidProbability { class, value })
    }
}

/// Bernoulli draw with success probability `p`.
fn draw<R: Rng + ?Sized>(rng: &mut R, p: f64) -> bool {
    rng.random::<f64>() < p
}

/// Sample up to `cap` distinct positions from `0..population`, excluding `own`.
fn sample_neighbors<R: Rng + ?Sized>(
    rng: &mut R,
    population: usize,
    own: usize,
    cap: usize,
) -> Vec<usize> {
    let candidates = population.saturating_sub(1);
    let amount = cap.min(candidates);
    rand::seq::index::sample(rng, candidates, amount)
        .into_iter()
        .map(|i| if i >= own { i.saturating_add(1) } else { i })
        .collect()
}
