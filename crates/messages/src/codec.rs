//! Share encoding and decoding for network transport.
//!
//! # Wire Format
//!
//! A share is sent as UTF-8 text, fields joined by a single `|`:
//!
//! ```text
//! hash|height|timestamp|parent_hash[|uncle_1|uncle_2|...]
//! ```
//!
//! Height is decimal integer text, timestamp is decimal floating-point text.
//! There is no escaping: string fields must not contain the delimiter. Every
//! field after the fourth is an uncle hash, in order.

use sharechain_types::{Share, ShareHash, ShareHeight};
use thiserror::Error;

/// Field separator on the wire.
pub const FIELD_DELIMITER: char = '|';

/// Number of fixed fields preceding the uncle list.
const FIXED_FIELDS: usize = 4;

/// Errors that can occur while decoding a share.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    #[error("Message is not valid UTF-8")]
    InvalidUtf8,

    #[error("Expected at least {expected} fields, found {found}")]
    MissingFields { expected: usize, found: usize },

    #[error("Invalid height: {0:?}")]
    InvalidHeight(String),

    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}

/// Encode a share to wire format.
///
/// The timestamp uses the shortest representation that parses back to the
/// same `f64`, so `decode_share(&encode_share(s)) == Ok(s)` for any share
/// whose string fields are free of the delimiter.
pub fn encode_share(share: &Share) -> Vec<u8> {
    let mut out = format!(
        "{}{d}{}{d}{}{d}{}",
        share.hash,
        share.height.0,
        share.timestamp,
        share.parent_hash,
        d = FIELD_DELIMITER
    );
    for uncle in &share.uncles {
        out.push(FIELD_DELIMITER);
        out.push_str(uncle.as_str());
    }
    out.into_bytes()
}

/// Decode a share from wire format.
pub fn decode_share(data: &[u8]) -> Result<Share, CodecError> {
    let text = std::str::from_utf8(data).map_err(|_| CodecError::InvalidUtf8)?;
    let fields: Vec<&str> = text.split(FIELD_DELIMITER).collect();

    if fields.len() < FIXED_FIELDS {
        return Err(CodecError::MissingFields {
            expected: FIXED_FIELDS,
            found: fields.len(),
        });
    }

    let height = fields[1]
        .parse::<u64>()
        .map_err(|_| CodecError::InvalidHeight(fields[1].to_owned()))?;

    let timestamp = fields[2]
        .parse::<f64>()
        .ok()
        .filter(|t| t.is_finite())
        .ok_or_else(|| CodecError::InvalidTimestamp(fields[2].to_owned()))?;

    let uncles = fields[FIXED_FIELDS..]
        .iter()
        .map(|&uncle| ShareHash::from(uncle))
        .collect();

    Ok(Share::new(
        ShareHash::from(fields[0]),
        ShareHeight(height),
        timestamp,
        ShareHash::from(fields[3]),
        uncles,
    ))
}
