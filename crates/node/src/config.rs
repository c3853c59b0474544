//! Node configuration.

use std::time::Duration;

/// Protocol constants a node applies when producing and sending shares.
#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Lower bound on the gap between two produced shares.
    ///
    /// Sampled intervals below this (including zero or negative samples)
    /// are raised to it.
    pub min_production_delay: Duration,

    /// Lower bound on the delay of a single message.
    pub min_link_latency: Duration,

    /// Maximum number of uncles claimed by one share.
    pub max_uncles: usize,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            min_production_delay: Duration::from_millis(100),
            min_link_latency: Duration::from_millis(10),
            max_uncles: 2,
        }
    }
}
