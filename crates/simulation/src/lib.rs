//! Deterministic simulation runner.
//!
//! This crate drives a set of [`PeerNode`](sharechain_node::PeerNode)s in
//! simulated time. Given the same seed, it produces identical results every
//! run.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │                  SimulationRunner                       │
//! │                                                         │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Event Queue (BTreeMap<EventKey, Event>)        │ │
//! │  │     Ordered by: time, priority, node, sequence     │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     nodes: Vec<PeerNode>                           │ │
//! │  │     Each processes events sequentially             │ │
//! │  └────────────────────────┬───────────────────────────┘ │
//! │                           │                             │
//! │                           ▼                             │
//! │  ┌────────────────────────────────────────────────────┐ │
//! │  │     Actions → timers and delayed share delivery    │ │
//! │  └────────────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────┘
//! ```

mod error;
mod event_queue;
mod network;
mod random;
mod runner;

pub use error::SimulationError;
pub use event_queue::EventKey;
pub use network::{ring_mesh, NetworkConfig, SimulatedNetwork};
pub use random::DistributionSource;
pub use runner::{SimulationRunner, SimulationStats};

/// Re-exported for callers that only depend on this crate.
pub use sharechain_types::NodeIndex;
