//! Dense integer identifiers.
//!
//! Agents, nodes and edges are numbered from zero with no gaps, so every id
//! doubles as an index into the per-agent and per-edge vectors of a run.
//! The wrappers keep an `EdgeId` from being used where a `NodeId` is meant.

use std::fmt;

macro_rules! dense_id {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub u32);

        impl $name {
            /// Placeholder for "none", e.g. the edge of an agent that is not
            /// on the road.  Also the `Default`.
            pub const INVALID: $name = $name(u32::MAX);

            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }

            #[inline(always)]
            pub fn is_valid(self) -> bool {
                self.0 != u32::MAX
            }
        }

        impl Default for $name {
            #[inline(always)]
            fn default() -> Self {
                Self::INVALID
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;

            fn try_from(index: usize) -> Result<Self, Self::Error> {
                u32::try_from(index).map($name)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }
    };
}

dense_id! {
    /// Position of an agent in the population; outcome vectors use the same
    /// order.
    AgentId
}

dense_id! {
    /// A road junction.
    NodeId
}

dense_id! {
    /// A directed road segment; indexes density, speed and capacity.
    EdgeId
}
