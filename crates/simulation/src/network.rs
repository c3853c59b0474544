//! Simulated network: topology and message accounting.

use hdrhistogram::Histogram;
use sharechain_node::NodeConfig;
use sharechain_types::NodeIndex;
use std::time::Duration;

/// Configuration for the simulated network and its nodes.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    /// Number of nodes.
    pub num_nodes: u32,

    /// Successors each node links to in the ring mesh (see [`ring_mesh`]).
    pub peers_per_node: u32,

    /// Mean gap between two shares from the same node, in seconds
    /// (exponentially distributed).
    pub share_interval_mean: f64,

    /// Mean per-message latency, in seconds (normally distributed).
    pub latency_mean: f64,

    /// Standard deviation of per-message latency, in seconds.
    pub latency_std: f64,

    /// Protocol constants applied by every node.
    pub node: NodeConfig,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            num_nodes: 50,
            peers_per_node: 4,
            share_interval_mean: 10.0,
            latency_mean: 0.1,
            latency_std: 0.02,
            node: NodeConfig::default(),
        }
    }
}

/// Build the peer lists of a ring mesh.
///
/// With `k = min(peers_per_node, num_nodes - 1)`, node `i` is linked to
/// `(i + 1) % n ..= (i + k) % n` and every link is recorded at both ends, so
/// each node sends to its `k` successors and its `k` predecessors. In small
/// networks a node may appear more than once in a peer list; the duplicate
/// deliveries it causes are absorbed by the receiving chain.
pub fn ring_mesh(num_nodes: u32, peers_per_node: u32) -> Vec<Vec<NodeIndex>> {
    let n = num_nodes;
    let mut peers = vec![Vec::new(); n as usize];
    let k = peers_per_node.min(n.saturating_sub(1));

    for i in 0..n {
        for j in 1..=k {
            let peer = (i + j) % n;
            peers[i as usize].push(peer);
            peers[peer as usize].push(i);
        }
    }

    peers
}

/// Largest link delay the histogram tracks exactly, in microseconds (one
/// hour). Longer delays are recorded as this value.
const MAX_TRACKED_LATENCY_MICROS: u64 = 3_600_000_000;

/// Message accounting for the simulated network.
///
/// Delay is chosen by the sender; the network only counts traffic and keeps
/// a histogram of link delays.
#[derive(Debug, Clone)]
pub struct SimulatedNetwork {
    num_nodes: u32,
    messages_sent: u64,
    messages_delivered: u64,
    messages_undeliverable: u64,
    /// Link delays in microseconds.
    latency: Histogram<u64>,
}

impl SimulatedNetwork {
    /// Create a network connecting `num_nodes` nodes.
    pub fn new(num_nodes: u32) -> Self {
        Self {
            num_nodes,
            messages_sent: 0,
            messages_delivered: 0,
            messages_undeliverable: 0,
            latency: Histogram::new_with_bounds(1, MAX_TRACKED_LATENCY_MICROS, 3)
                .expect("static histogram bounds are valid"),
        }
    }

    /// Check whether `node` exists in this network.
    pub fn is_routable(&self, node: NodeIndex) -> bool {
        node < self.num_nodes
    }

    /// Record a message accepted for delivery after `delay`.
    pub fn record_send(&mut self, delay: Duration) {
        self.messages_sent += 1;
        let micros = u64::try_from(delay.as_micros()).unwrap_or(u64::MAX);
        self.latency.saturating_record(micros);
    }

    /// Record a message addressed to a node that does not exist.
    pub fn record_undeliverable(&mut self) {
        self.messages_undeliverable += 1;
    }

    /// Record a message handed to its recipient.
    pub fn record_delivery(&mut self) {
        self.messages_delivered += 1;
    }

    /// Messages scheduled for delivery.
    pub fn messages_sent(&self) -> u64 {
        self.messages_sent
    }

    /// Messages delivered so far.
    pub fn messages_delivered(&self) -> u64 {
        self.messages_delivered
    }

    /// Messages dropped because the recipient does not exist.
    pub fn messages_undeliverable(&self) -> u64 {
        self.messages_undeliverable
    }

    /// Link delay at the given percentile (0.0 to 100.0).
    pub fn latency_percentile(&self, percentile: f64) -> Option<Duration> {
        if self.latency.is_empty() {
            return None;
        }
        Some(Duration::from_micros(
            self.latency.value_at_percentile(percentile),
        ))
    }

    /// Mean link delay.
    pub fn latency_mean(&self) -> Option<Duration> {
        if self.latency.is_empty() {
            return None;
        }
        Some(Duration::from_secs_f64(self.latency.mean() / 1_000_000.0))
    }
}
