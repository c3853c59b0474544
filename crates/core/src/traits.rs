//! Core traits for node state machines.

use crate::{Action, Event};
use std::time::Duration;

/// A state machine that processes events.
///
/// Every node is implemented as a state machine that is:
///
/// - **Synchronous**: No async, no `.await`
/// - **Deterministic**: Same state + event + random samples = same actions
/// - **Pure-ish**: Mutates self, but performs no I/O
///
/// # Example
///
/// ```ignore
/// impl StateMachine for PeerNode {
///     fn handle(&mut self, event: Event) -> Vec<Action> {
///         match event {
///             Event::Timer(TimerId::ShareProduction) => self.on_production_timer(),
///             Event::ShareReceived { from, payload } => {
///                 self.on_share_received(from, &payload)
///             }
///             // ... etc
///         }
///     }
///
///     fn set_time(&mut self, now: Duration) {
///         self.now = now;
///     }
/// }
/// ```
pub trait StateMachine {
    /// Process an event, returning actions to perform.
    ///
    /// # Guarantees
    ///
    /// - **Synchronous**: This method never blocks or awaits
    /// - **No I/O**: Timers and messages are performed by the runner via the
    ///   returned actions
    fn handle(&mut self, event: Event) -> Vec<Action>;

    /// Set the current time.
    ///
    /// Called by the runner before each `handle()` call with the current
    /// simulated time.
    fn set_time(&mut self, now: Duration);

    /// Get the current time.
    ///
    /// Returns the time that was last set via `set_time()`.
    fn now(&self) -> Duration;
}

/// Source of the two random quantities a node needs.
///
/// The concrete distributions are configuration; a node only knows it can
/// ask for a production gap and a per-message latency, both in seconds.
/// Implementations may return non-positive values; callers floor them.
pub trait RandomSource {
    /// Sample the gap until the next share is produced.
    fn sample_interval(&mut self) -> f64;

    /// Sample the delay of one message on one link.
    fn sample_latency(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn sample_interval(&mut self) -> f64 {
        (**self).sample_interval()
    }

    fn sample_latency(&mut self) -> f64 {
        (**self).sample_latency()
    }
}
