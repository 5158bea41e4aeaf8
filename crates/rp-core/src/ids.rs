//! Dense `u32` identifiers.
//!
//! IDs are `Copy + Ord + Hash`.  The inner integer is `pub` so graph arrays
//! can be indexed with `id.index()`; the numeric value carries no meaning
//! beyond identity and the tie-break order used by the search frontier.
//! `Display` is a short prefixed form (`n3`, `e0`, `r1`) for logs and error
//! messages.

use std::fmt;

macro_rules! dense_id {
    ($(#[$attr:meta])* $name:ident, $prefix:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[cfg_attr(feature = "serde", serde(transparent))]
        pub struct $name(pub u32);

        impl $name {
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "{}"), self.0)
            }
        }

        /// Fails once a graph or response outgrows `u32`.
        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                u32::try_from(n).map($name)
            }
        }
    };
}

dense_id! {
    /// A step boundary in a route graph.
    NodeId, "n"
}

dense_id! {
    /// A directed edge, numbered in insertion order.
    EdgeId, "e"
}

dense_id! {
    /// Position of a candidate route in a directions response.
    RouteId, "r"
}
