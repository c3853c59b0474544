//! Core types for the sharechain simulator.
//!
//! These types are shared by the chain, codec, node and simulation crates.

mod hash;
mod identifiers;
mod share;

pub use hash::ShareHash;
pub use identifiers::{NodeIndex, ShareHeight};
pub use share::Share;
