//! Peer node state machine.
//!
//! A [`PeerNode`] owns one [`Sharechain`](sharechain_chain::Sharechain) and
//! runs the share protocol on it:
//!
//! - `Event::Start` → schedule the first production timer
//! - `Event::Timer(ShareProduction)` → build a share on the tip, claim up to
//!   two uncles, store it, send it to every peer, reschedule
//! - `Event::ShareReceived` → decode and offer the share to the chain
//! - `Event::Stop` → stop producing and ignore further messages
//!
//! All I/O is performed by the runner via returned `Action`s.

mod config;
mod production;
mod state;

pub use config::NodeConfig;
pub use production::{floored_delay, select_uncles};
pub use state::PeerNode;
