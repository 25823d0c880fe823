//! Dense integer identifiers for simulation agents.
//!
//! Citizens and bureaucrats live in separate id spaces; each class is
//! numbered `0..population` at initialization and never renumbered. The
//! newtypes keep the two spaces from being mixed at compile time.

use serde::{Deserialize, Serialize};

/// Generates a newtype wrapper around a `u32` index with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Return the raw integer value.
            pub const fn into_inner(self) -> u32 {
                self.0
            }

            /// Return the position this id occupies in its owning collection.
            ///
            /// Returns `None` only on targets where `usize` is narrower than
            /// `u32`, which callers treat the same as a missing agent.
            pub fn index(self) -> Option<usize> {
                usize::try_from(self.0).ok()
            }

            /// Build an id from a collection position.
            ///
            /// Returns `None` if the position does not fit in a `u32`.
            pub fn from_index(index: usize) -> Option<Self> {
                u32::try_from(index).ok().map(Self)
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for u32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for a citizen within the citizen population.
    CitizenId
}

define_id! {
    /// Unique identifier for a bureaucrat within the bureaucrat population.
    BureaucratId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_round_trips_through_usize() {
        let id = CitizenId(7);
        assert_eq!(id.index(), Some(7));
        assert_eq!(CitizenId::from_index(7), Some(id));
    }

    #[test]
    fn ids_order_numerically() {
        assert!(BureaucratId(2) < BureaucratId(10));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(BureaucratId(42).to_string(), "42");
    }
}
