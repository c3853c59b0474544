//! Core abstractions shared by the node state machine and its runners.
//!
//! A node never touches the clock, the network or a random number generator
//! directly. The runner feeds it [`Event`]s, reads back [`Action`]s, and
//! supplies randomness through a [`RandomSource`].

mod action;
mod event;
mod traits;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use action::Action;
pub use event::{Event, TimerId};
pub use traits::{RandomSource, StateMachine};
