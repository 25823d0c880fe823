//! Shared type definitions for the bureaucratic corruption simulation.
//!
//! This crate is the single source of truth for the records passed between
//! the agent, ledger, and driver crates. It holds data only; every rule that
//! mutates these records lives downstream.
//!
//! # Modules
//!
//! - [`ids`] -- Dense integer identifiers for citizens and bureaucrats
//! - [`enums`] -- Behavioral states and budget entry kinds
//! - [`structs`] -- Agent records, budget entries, and per-round metrics

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{BudgetEntryKind, BureaucratState, CitizenState, ServiceDemand};
pub use ids::{BureaucratId, CitizenId};
pub use structs::{BudgetEntry, Bureaucrat, Citizen, RoundMetrics};
