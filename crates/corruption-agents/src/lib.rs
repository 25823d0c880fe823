//! Agent state, service interactions, and peer influence for the
//! corruption simulation.
//!
//! This crate contains every rule that mutates citizens and bureaucrats
//! without touching the institution's budget. It sits between
//! `corruption-types` (the records) and `corruption-core` (the round
//! driver that sequences the stages).
//!
//! # Modules
//!
//! - [`config`] -- Behavioral tunables ([`BehaviorConfig`])
//! - [`error`] -- Error types for pool construction ([`PoolError`])
//! - [`influence`] -- Neighbor-driven state switching after each round
//! - [`interaction`] -- Citizen/bureaucrat pairing and the service decision table
//! - [`pool`] -- The owning collection of agents ([`AgentPool`]) and initializer

pub mod config;
pub mod error;
pub mod influence;
pub mod interaction;
pub mod pool;

// Re-export primary types at crate root for convenience.
pub use config::BehaviorConfig;
pub use error::PoolError;
pub use influence::{InfluenceOutcome, apply_influence};
pub use interaction::{Encounter, InteractionOutcome, resolve_encounter, run_interactions};
pub use pool::{AgentPool, PopulationSpec, ratio};
