//! Local sharechain state.

use sharechain_types::{Share, ShareHash, ShareHeight};
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::{debug, trace};

/// Maximum height difference for an uncle reference to earn credit.
pub const UNCLE_WINDOW: u64 = 7;

/// Why a share was rejected as an orphan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrphanReason {
    /// The parent hash is not in the local chain.
    MissingParent { parent: ShareHash },

    /// The height does not follow from the parent.
    HeightMismatch {
        expected: ShareHeight,
        actual: ShareHeight,
    },
}

/// Result of offering a share to the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddShareOutcome {
    /// Stored. `valid_uncles` is how much `uncle_count` grew.
    Accepted { valid_uncles: u64 },

    /// Already present; nothing changed.
    Duplicate,

    /// Rejected; `orphan_count` grew by one.
    Orphan(OrphanReason),
}

impl AddShareOutcome {
    /// Check if the share was stored.
    pub fn is_accepted(&self) -> bool {
        matches!(self, AddShareOutcome::Accepted { .. })
    }

    /// Check if the share was rejected as an orphan.
    pub fn is_orphan(&self) -> bool {
        matches!(self, AddShareOutcome::Orphan(_))
    }
}

/// One node's view of accepted shares.
///
/// Shares are only ever added. Iteration follows ascending hash order, which
/// is what uncle selection relies on for reproducible runs.
#[derive(Debug, Default)]
pub struct Sharechain {
    /// Accepted shares by hash. Every key equals its value's `hash`.
    shares: BTreeMap<ShareHash, Share>,

    /// Every hash listed as an uncle by some stored share.
    claimed_uncles: HashSet<ShareHash>,

    /// Highest stored share; ties go to the smallest hash.
    tip: Option<ShareHash>,

    /// Uncle references that passed the validity check.
    uncle_count: u64,

    /// Shares rejected for a missing parent or a wrong height.
    orphan_count: u64,
}

impl Sharechain {
    /// Create an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Acceptance
    // ═══════════════════════════════════════════════════════════════════════════

    /// Offer a share to the chain.
    ///
    /// A share is accepted when it has no parent and height 0, or when its
    /// parent is stored and its height is exactly one above it. Accepted
    /// shares then earn one uncle credit per listed uncle that is stored and
    /// within [`UNCLE_WINDOW`]; uncle credit never affects acceptance.
    pub fn add_share(&mut self, share: Share, now: Duration) -> AddShareOutcome {
        if self.shares.contains_key(&share.hash) {
            trace!(hash = %share.hash, "Ignoring duplicate share");
            return AddShareOutcome::Duplicate;
        }

        let expected = if share.has_parent() {
            match self.shares.get(&share.parent_hash) {
                Some(parent) => parent.height.next(),
                None => {
                    return self.reject(
                        &share,
                        now,
                        OrphanReason::MissingParent {
                            parent: share.parent_hash.clone(),
                        },
                    );
                }
            }
        } else {
            ShareHeight::GENESIS
        };

        if share.height != expected {
            return self.reject(
                &share,
                now,
                OrphanReason::HeightMismatch {
                    expected,
                    actual: share.height,
                },
            );
        }

        let hash = share.hash.clone();
        let height = share.height;
        self.claimed_uncles.extend(share.uncles.iter().cloned());
        self.shares.insert(hash.clone(), share);
        self.update_tip(&hash, height);

        // Counted after insertion, as the share itself is now part of the view.
        let valid_uncles = self.shares[&hash]
            .uncles
            .iter()
            .filter(|uncle| self.is_uncle_valid(uncle, height))
            .count() as u64;
        self.uncle_count += valid_uncles;

        debug!(
            hash = %hash,
            height = height.0,
            valid_uncles,
            now = ?now,
            "Share accepted"
        );

        AddShareOutcome::Accepted { valid_uncles }
    }

    fn reject(&mut self, share: &Share, now: Duration, reason: OrphanReason) -> AddShareOutcome {
        self.orphan_count += 1;
        debug!(
            hash = %share.hash,
            height = share.height.0,
            parent = %share.parent_hash,
            reason = ?reason,
            now = ?now,
            "Share rejected as orphan"
        );
        AddShareOutcome::Orphan(reason)
    }

    /// Check whether `uncle` earns credit for a share at `height`.
    ///
    /// The uncle must be stored, not above `height`, and at most
    /// [`UNCLE_WINDOW`] below it.
    pub fn is_uncle_valid(&self, uncle: &ShareHash, height: ShareHeight) -> bool {
        self.shares
            .get(uncle)
            .and_then(|share| height.distance_from(share.height))
            .is_some_and(|distance| distance <= UNCLE_WINDOW)
    }

    fn update_tip(&mut self, hash: &ShareHash, height: ShareHeight) {
        let replace = match self.tip() {
            None => true,
            Some(tip) => height > tip.height || (height == tip.height && *hash < tip.hash),
        };
        if replace {
            self.tip = Some(hash.clone());
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Queries
    // ═══════════════════════════════════════════════════════════════════════════

    /// Highest stored share, ties broken by the smallest hash.
    pub fn tip(&self) -> Option<&Share> {
        self.tip.as_ref().and_then(|hash| self.shares.get(hash))
    }

    /// Find the tip by scanning every stored share.
    ///
    /// Always agrees with [`Sharechain::tip`]; kept as the reference the
    /// cached tip is checked against.
    pub fn scan_tip(&self) -> Option<&Share> {
        self.shares.values().max_by(|a, b| {
            a.height
                .cmp(&b.height)
                .then_with(|| b.hash.cmp(&a.hash))
        })
    }

    /// Check if any stored share lists `hash` as an uncle.
    pub fn is_claimed_uncle(&self, hash: &ShareHash) -> bool {
        self.claimed_uncles.contains(hash)
    }

    /// Same as [`Sharechain::is_claimed_uncle`], by scanning every stored
    /// share's uncle list.
    pub fn claimed_by_scan(&self, hash: &ShareHash) -> bool {
        self.shares.values().any(|share| share.claims_uncle(hash))
    }

    /// Get a stored share.
    pub fn get(&self, hash: &ShareHash) -> Option<&Share> {
        self.shares.get(hash)
    }

    /// Check if a share is stored.
    pub fn contains(&self, hash: &ShareHash) -> bool {
        self.shares.contains_key(hash)
    }

    /// Iterate stored shares in ascending hash order.
    pub fn iter(&self) -> impl Iterator<Item = &Share> {
        self.shares.values()
    }

    /// Iterate stored shares together with their keys.
    pub fn entries(&self) -> impl Iterator<Item = (&ShareHash, &Share)> {
        self.shares.iter()
    }

    /// Number of accepted shares.
    pub fn total_shares(&self) -> u64 {
        self.shares.len() as u64
    }

    /// Cumulative count of credited uncle references.
    pub fn uncle_count(&self) -> u64 {
        self.uncle_count
    }

    /// Cumulative count of rejected shares.
    pub fn orphan_count(&self) -> u64 {
        self.orphan_count
    }

    /// Check if no share has been accepted yet.
    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}
