//! Outbound actions requested by a node.

use crate::TimerId;
use sharechain_types::NodeIndex;
use std::time::Duration;

/// Actions a node asks the runner to perform.
///
/// The runner owns the clock and the network; these are the only two things
/// a node can ask of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Deliver `Event::Timer(id)` to this node after `duration`.
    SetTimer { id: TimerId, duration: Duration },

    /// Deliver an encoded share to `to` after `delay`.
    ///
    /// Fire and forget: no acknowledgment, no retry, no ordering guarantee.
    SendShare {
        to: NodeIndex,
        delay: Duration,
        payload: Vec<u8>,
    },
}

impl Action {
    /// Get a human-readable name for this action type.
    pub fn type_name(&self) -> &'static str {
        match self {
            Action::SetTimer { .. } => "SetTimer",
            Action::SendShare { .. } => "SendShare",
        }
    }
}
