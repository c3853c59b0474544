//! Share identifier type.

use std::fmt;

/// Identifier of a share within the sharechain.
///
/// Share hashes are opaque strings rather than digests: the simulator does no
/// proof-of-work, it only needs keys that are unique per
/// (node, sequence, time). The empty hash means "no parent".
///
/// Ordering is lexicographic and is what makes iteration over a chain
/// deterministic.
#[derive(Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShareHash(String);

impl ShareHash {
    /// Empty hash, used as the parent of a height-0 share.
    pub const EMPTY: Self = Self(String::new());

    /// Derive the hash of a freshly produced share.
    ///
    /// The node index, the node's local sequence number and the production
    /// time (six decimals) together make the hash globally unique.
    pub fn for_production(node: u32, sequence: u64, time_secs: f64) -> Self {
        Self(format!("share-{}-{}-{:.6}", node, sequence, time_secs))
    }

    /// Check if this is the empty hash.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the hash as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ShareHash {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ShareHash {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Debug for ShareHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShareHash({:?})", self.0)
    }
}

impl fmt::Display for ShareHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
