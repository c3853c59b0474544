//! Inbound events processed by a node.

use sharechain_types::NodeIndex;

/// Timers a node can set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TimerId {
    /// Time to produce the next share.
    ShareProduction,
}

/// Events delivered to a node by the runner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The node has been started.
    Start,

    /// A timer set via `Action::SetTimer` fired.
    Timer(TimerId),

    /// An encoded share arrived from a peer.
    ShareReceived {
        /// The sending node.
        from: NodeIndex,
        /// Wire-encoded share.
        payload: Vec<u8>,
    },

    /// The node is being shut down.
    Stop,
}

impl Event {
    /// Ordering priority among events scheduled for the same instant.
    ///
    /// Lower runs first. Correctness never depends on this order; it only
    /// makes runs reproducible.
    pub fn priority(&self) -> u8 {
        match self {
            Event::Start => 0,
            Event::ShareReceived { .. } => 1,
            Event::Timer(_) => 2,
            Event::Stop => 3,
        }
    }

    /// Get a human-readable name for this event type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Event::Start => "Start",
            Event::Timer(_) => "Timer",
            Event::ShareReceived { .. } => "ShareReceived",
            Event::Stop => "Stop",
        }
    }
}
