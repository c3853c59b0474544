//! Ordered event queue.

use sharechain_core::Event;
use sharechain_types::NodeIndex;
use std::collections::BTreeMap;
use std::time::Duration;

/// Position of an event in the queue.
///
/// Events are ordered by time, then priority, then target node, then the
/// order in which they were scheduled, so ties are resolved the same way on
/// every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKey {
    /// Simulated time the event fires at.
    pub time: Duration,
    /// `Event::priority` of the event.
    pub priority: u8,
    /// Node the event is delivered to.
    pub node: NodeIndex,
    /// Scheduling order, unique per queue.
    pub sequence: u64,
}

/// Pending events for all nodes.
#[derive(Debug, Default)]
pub(crate) struct EventQueue {
    events: BTreeMap<EventKey, Event>,
    next_sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `event` for `node` at `time`.
    pub fn push(&mut self, time: Duration, node: NodeIndex, event: Event) -> EventKey {
        let key = EventKey {
            time,
            priority: event.priority(),
            node,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.events.insert(key, event);
        key
    }

    /// Remove the earliest event if it fires at or before `end`.
    pub fn pop_until(&mut self, end: Duration) -> Option<(EventKey, Event)> {
        let (key, _) = self.events.first_key_value()?;
        if key.time > end {
            return None;
        }
        self.events.pop_first()
    }

    /// Time of the earliest pending event.
    pub fn next_time(&self) -> Option<Duration> {
        self.events.first_key_value().map(|(key, _)| key.time)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
