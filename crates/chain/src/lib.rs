//! Sharechain acceptance and metrics engine.
//!
//! A [`Sharechain`] is one node's local, never-reconciled view of accepted
//! shares. It decides whether a share links correctly to its parent and keeps
//! the uncle and orphan counters the simulation reports on.
//!
//! Nothing here returns an error: duplicates, orphans and bad uncle
//! references are expected outcomes and end up in counters. The
//! [`AddShareOutcome`] returned by [`Sharechain::add_share`] is informational.

mod chain;

pub use chain::{AddShareOutcome, OrphanReason, Sharechain, UNCLE_WINDOW};
