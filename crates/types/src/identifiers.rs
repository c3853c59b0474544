//! Domain-specific identifier types.

use std::fmt;

/// Index of a node in the simulated network.
///
/// Nodes are numbered `0..num_nodes`; the index doubles as the node identity
/// used in share hashes and as the routing address for messages.
pub type NodeIndex = u32;

/// Share height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShareHeight(pub u64);

impl ShareHeight {
    /// Height of a share with no parent.
    pub const GENESIS: Self = ShareHeight(0);

    /// Get the next share height.
    pub fn next(self) -> Self {
        ShareHeight(self.0 + 1)
    }

    /// Distance from `other` up to `self`.
    ///
    /// Returns None when `other` is above `self`.
    pub fn distance_from(self, other: ShareHeight) -> Option<u64> {
        self.0.checked_sub(other.0)
    }
}

impl fmt::Display for ShareHeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
