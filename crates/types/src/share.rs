//! Share type.

use crate::{ShareHash, ShareHeight};

/// One unit of sharechain history.
///
/// A share is built once by the node that produced it and never mutated
/// afterwards; it is cloned when it crosses the network or is inserted into a
/// chain. The structure links to its parent by hash, never by ownership.
#[derive(Debug, Clone, PartialEq)]
pub struct Share {
    /// Unique identifier, used as the key in a chain.
    pub hash: ShareHash,

    /// Height in the chain (no parent = 0).
    pub height: ShareHeight,

    /// Simulated creation time, in seconds.
    pub timestamp: f64,

    /// Hash of the parent share, empty for a share with no parent.
    pub parent_hash: ShareHash,

    /// Sibling shares this share claims credit for, in order.
    pub uncles: Vec<ShareHash>,
}

impl Share {
    /// Create a new share.
    pub fn new(
        hash: ShareHash,
        height: ShareHeight,
        timestamp: f64,
        parent_hash: ShareHash,
        uncles: Vec<ShareHash>,
    ) -> Self {
        Self {
            hash,
            height,
            timestamp,
            parent_hash,
            uncles,
        }
    }

    /// Create a parentless share at height 0.
    pub fn genesis(hash: ShareHash, timestamp: f64) -> Self {
        Self::new(hash, ShareHeight::GENESIS, timestamp, ShareHash::EMPTY, vec![])
    }

    /// Check if this share links to a parent.
    pub fn has_parent(&self) -> bool {
        !self.parent_hash.is_empty()
    }

    /// Check if this share claims the given hash as an uncle.
    pub fn claims_uncle(&self, hash: &ShareHash) -> bool {
        self.uncles.iter().any(|uncle| uncle == hash)
    }
}
