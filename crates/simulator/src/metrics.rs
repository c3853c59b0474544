//! Aggregated results of a simulation run.

use crate::config::SimulatorConfig;
use serde::Serialize;
use sharechain_simulation::SimulationRunner;
use std::fmt;
use std::time::Duration;

/// Totals collected across every node at the end of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    /// Number of nodes simulated.
    pub num_nodes: u32,
    /// Successors each node linked to.
    pub peers_per_node: u32,
    /// Mean link latency in seconds.
    pub latency_mean: f64,
    /// Link latency standard deviation in seconds.
    pub latency_std: f64,
    /// Mean share interval in seconds.
    pub share_mean: f64,
    /// Simulated run length in seconds.
    pub duration_secs: f64,
    /// Seed the run was started from.
    pub seed: u64,

    /// Shares stored, summed over all nodes.
    pub total_shares: u64,
    /// Valid uncle references counted, summed over all nodes.
    pub total_uncles: u64,
    /// Shares rejected as orphans, summed over all nodes.
    pub total_orphans: u64,
    /// `total_uncles / total_shares`, in percent.
    pub uncle_percentage: f64,
    /// `total_orphans / total_shares`, in percent.
    pub orphan_percentage: f64,

    /// Shares produced locally, summed over all nodes.
    pub shares_produced: u64,
    /// Share messages put on the wire.
    pub messages_sent: u64,
    /// Share messages handed to their receiver.
    pub messages_delivered: u64,
    /// Received payloads that failed to decode.
    pub messages_dropped: u64,
    /// Mean one-way delay in milliseconds.
    pub latency_mean_ms: Option<f64>,
    /// Median one-way delay in milliseconds.
    pub latency_p50_ms: Option<f64>,
    /// 99th percentile one-way delay in milliseconds.
    pub latency_p99_ms: Option<f64>,
}

impl SimulationReport {
    /// Collect totals from a finished runner.
    pub fn collect(config: &SimulatorConfig, runner: &SimulationRunner) -> Self {
        let mut total_shares = 0;
        let mut total_uncles = 0;
        let mut total_orphans = 0;
        let mut shares_produced = 0;
        let mut messages_dropped = 0;

        for node in runner.nodes() {
            let chain = node.chain();
            total_shares += chain.total_shares();
            total_uncles += chain.uncle_count();
            total_orphans += chain.orphan_count();
            shares_produced += node.shares_produced();
            messages_dropped += node.dropped_messages();
        }

        let network = runner.network();
        let to_ms = |d: Duration| d.as_secs_f64() * 1000.0;

        Self {
            num_nodes: config.num_nodes,
            peers_per_node: config.peers_per_node,
            latency_mean: config.latency_mean,
            latency_std: config.latency_std,
            share_mean: config.share_mean,
            duration_secs: config.duration.as_secs_f64(),
            seed: config.seed,
            total_shares,
            total_uncles,
            total_orphans,
            uncle_percentage: percentage(total_uncles, total_shares),
            orphan_percentage: percentage(total_orphans, total_shares),
            shares_produced,
            messages_sent: network.messages_sent(),
            messages_delivered: network.messages_delivered(),
            messages_dropped,
            latency_mean_ms: network.latency_mean().map(to_ms),
            latency_p50_ms: network.latency_percentile(50.0).map(to_ms),
            latency_p99_ms: network.latency_percentile(99.0).map(to_ms),
        }
    }
}

/// `part / total` in percent, or 0 when nothing was counted.
pub fn percentage(part: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        part as f64 / total as f64 * 100.0
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Configuration:")?;
        writeln!(f, "  Nodes: {}", self.num_nodes)?;
        writeln!(f, "  Peers per node: {}", self.peers_per_node)?;
        writeln!(
            f,
            "  Latency: {}s (std {}s)",
            self.latency_mean, self.latency_std
        )?;
        writeln!(f, "  Share interval mean: {}s", self.share_mean)?;
        writeln!(f, "  Duration: {}s", self.duration_secs)?;
        writeln!(f, "  Seed: {}", self.seed)?;
        writeln!(f)?;
        writeln!(f, "Results:")?;
        writeln!(f, "  Total shares: {}", self.total_shares)?;
        writeln!(
            f,
            "  Uncle blocks: {} ({:.2}%)",
            self.total_uncles, self.uncle_percentage
        )?;
        writeln!(
            f,
            "  Orphan blocks: {} ({:.2}%)",
            self.total_orphans, self.orphan_percentage
        )?;
        writeln!(f)?;
        writeln!(f, "Network:")?;
        writeln!(f, "  Shares produced: {}", self.shares_produced)?;
        writeln!(f, "  Messages sent: {}", self.messages_sent)?;
        writeln!(f, "  Messages delivered: {}", self.messages_delivered)?;
        write!(f, "  Messages dropped: {}", self.messages_dropped)?;
        if let (Some(mean), Some(p50), Some(p99)) =
            (self.latency_mean_ms, self.latency_p50_ms, self.latency_p99_ms)
        {
            writeln!(f)?;
            write!(
                f,
                "  Latency mean/p50/p99: {:.1}ms / {:.1}ms / {:.1}ms",
                mean, p50, p99
            )?;
        }
        Ok(())
    }
}
