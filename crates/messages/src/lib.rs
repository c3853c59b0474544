//! Network messages for share propagation.
//!
//! The only message on the wire is a single encoded share; see [`codec`] for
//! the format.

pub mod codec;

pub use codec::{decode_share, encode_share, CodecError, FIELD_DELIMITER};
