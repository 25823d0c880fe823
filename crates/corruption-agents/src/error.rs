//! Error types for the corruption-agents crate.
//!
//! Only pool construction can fail. Once a pool exists, every stage that
//! operates on it is infallible and treats missing references as absent.

use corruption_types::{BureaucratId, CitizenId};

/// Errors that can occur while building an [`AgentPool`].
///
/// [`AgentPool`]: crate::pool::AgentPool
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    /// An initial-corruption probability was outside `[0, 1]` or not finite.
    #[error("initial corruption probability for {class} must be within [0, 1], got {value}")]
    InvalidProbability {
        /// Which agent class the probability applies to.
        class: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A population is too large to number with `u32` ids.
    #[error("population of {class} too large: {size}")]
    PopulationTooLarge {
        /// Which agent class overflowed.
        class: &'static str,
        /// The requested size.
        size: u64,
    },

    /// A citizen record's id does not match its position.
    #[error("citizen at position {position} has id {id}; ids must be dense from 0")]
    CitizenIdMismatch {
        /// Position in the supplied collection.
        position: usize,
        /// The id found there.
        id: CitizenId,
    },

    /// A bureaucrat record's id does not match its position.
    #[error("bureaucrat at position {position} has id {id}; ids must be dense from 0")]
    BureaucratIdMismatch {
        /// Position in the supplied collection.
        position: usize,
        /// The id found there.
        id: BureaucratId,
    },

    /// An agent lists itself as a neighbor.
    #[error("{class} {id} lists itself as a neighbor")]
    SelfNeighbor {
        /// Which agent class the record belongs to.
        class: &'static str,
        /// The offending agent's raw id.
        id: u32,
    },
}
