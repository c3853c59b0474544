//! Share production helpers.

use sharechain_chain::{Sharechain, UNCLE_WINDOW};
use sharechain_types::{ShareHash, ShareHeight};
use std::time::Duration;

/// Pick uncles for a new share at `height`.
///
/// Candidates are stored shares strictly below `height` and within
/// [`UNCLE_WINDOW`] of it that no stored share already lists as an uncle.
/// The parent itself is not excluded. Candidates are visited in ascending
/// hash order and the first `max_uncles` are taken.
pub fn select_uncles(chain: &Sharechain, height: ShareHeight, max_uncles: usize) -> Vec<ShareHash> {
    chain
        .iter()
        .filter(|share| {
            share.height < height
                && height
                    .distance_from(share.height)
                    .is_some_and(|distance| distance <= UNCLE_WINDOW)
        })
        .filter(|share| !chain.is_claimed_uncle(&share.hash))
        .map(|share| share.hash.clone())
        .take(max_uncles)
        .collect()
}

/// Convert a sampled delay in seconds to a `Duration`, floored at `floor`.
///
/// Negative, zero and NaN samples yield `floor`; samples too large to
/// represent saturate to `Duration::MAX`.
pub fn floored_delay(sample_secs: f64, floor: Duration) -> Duration {
    match Duration::try_from_secs_f64(sample_secs) {
        Ok(delay) => delay.max(floor),
        Err(_) if sample_secs > 0.0 => Duration::MAX,
        Err(_) => floor,
    }
}
