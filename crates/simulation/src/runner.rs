//! Discrete-event simulation runner.

use crate::event_queue::EventQueue;
use crate::network::{ring_mesh, NetworkConfig, SimulatedNetwork};
use crate::random::DistributionSource;
use crate::SimulationError;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use sharechain_core::{Action, Event, StateMachine};
use sharechain_node::PeerNode;
use sharechain_types::NodeIndex;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// Counters kept by the runner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimulationStats {
    /// Events handed to nodes.
    pub events_processed: u64,
    /// Timer events handed to nodes.
    pub timers_fired: u64,
    /// Actions returned by nodes.
    pub actions_processed: u64,
}

/// Drives a set of nodes in simulated time.
///
/// All node callbacks run on the caller's thread, one at a time, in
/// [`EventKey`](crate::EventKey) order. Nodes never share state; everything
/// they learn about each other arrives as a delayed `Event::ShareReceived`.
pub struct SimulationRunner {
    nodes: Vec<PeerNode>,
    network: SimulatedNetwork,
    queue: EventQueue,
    now: Duration,
    started: bool,
    stopped: bool,
    stats: SimulationStats,
}

impl SimulationRunner {
    /// Build a ring-mesh network of nodes with distribution-backed sampling.
    ///
    /// Each node's generator is seeded from a master generator seeded with
    /// `seed`, so the same config and seed reproduce the same run.
    pub fn new(config: &NetworkConfig, seed: u64) -> Result<Self, SimulationError> {
        let mut master = ChaCha8Rng::seed_from_u64(seed);
        let topology = ring_mesh(config.num_nodes, config.peers_per_node);

        let mut nodes = Vec::with_capacity(topology.len());
        for (index, peers) in topology.into_iter().enumerate() {
            let source = DistributionSource::new(
                master.gen(),
                config.share_interval_mean,
                config.latency_mean,
                config.latency_std,
            )?;
            nodes.push(PeerNode::new(
                index as NodeIndex,
                peers,
                Box::new(source),
                config.node.clone(),
            ));
        }

        info!(
            num_nodes = config.num_nodes,
            peers_per_node = config.peers_per_node,
            seed,
            "Created simulation"
        );

        Ok(Self::from_nodes(nodes))
    }

    /// Build a runner around already constructed nodes.
    ///
    /// Node `i` in the vector must have index `i`.
    pub fn from_nodes(nodes: Vec<PeerNode>) -> Self {
        debug_assert!(nodes
            .iter()
            .enumerate()
            .all(|(i, node)| node.index() as usize == i));

        Self {
            network: SimulatedNetwork::new(nodes.len() as u32),
            nodes,
            queue: EventQueue::new(),
            now: Duration::ZERO,
            started: false,
            stopped: false,
            stats: SimulationStats::default(),
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    /// Current simulated time.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// All nodes.
    pub fn nodes(&self) -> &[PeerNode] {
        &self.nodes
    }

    /// A single node.
    pub fn node(&self, index: NodeIndex) -> Option<&PeerNode> {
        self.nodes.get(index as usize)
    }

    /// Network accounting.
    pub fn network(&self) -> &SimulatedNetwork {
        &self.network
    }

    /// Runner counters.
    pub fn stats(&self) -> &SimulationStats {
        &self.stats
    }

    /// Number of events still queued.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Execution
    // ═══════════════════════════════════════════════════════════════════════════

    /// Schedule `Event::Start` for every node at the current time.
    ///
    /// Has no effect after the first call.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        for index in 0..self.nodes.len() {
            self.queue.push(self.now, index as NodeIndex, Event::Start);
        }
    }

    /// Process every event scheduled at or before `end`, then advance the
    /// clock to `end`.
    ///
    /// Starts the nodes first if [`SimulationRunner::start`] has not been
    /// called.
    pub fn run_until(&mut self, end: Duration) {
        self.start();

        while let Some((key, event)) = self.queue.pop_until(end) {
            self.now = key.time;
            self.dispatch(key.node, event);
        }

        if end > self.now {
            self.now = end;
        }

        debug!(
            now = ?self.now,
            events_processed = self.stats.events_processed,
            pending = self.queue.len(),
            "Run finished"
        );
    }

    /// Deliver `Event::Stop` to every node at the current time.
    ///
    /// Events still queued are left in place; stopped nodes ignore them.
    pub fn stop(&mut self) {
        if self.stopped {
            return;
        }
        self.stopped = true;
        for index in 0..self.nodes.len() {
            self.dispatch(index as NodeIndex, Event::Stop);
        }
        info!(now = ?self.now, "Simulation stopped");
    }

    fn dispatch(&mut self, index: NodeIndex, event: Event) {
        let Some(node) = self.nodes.get_mut(index as usize) else {
            warn!(node = index, event = event.type_name(), "Event for unknown node");
            return;
        };

        match &event {
            Event::Timer(_) => self.stats.timers_fired += 1,
            Event::ShareReceived { .. } => self.network.record_delivery(),
            Event::Start | Event::Stop => {}
        }
        self.stats.events_processed += 1;

        node.set_time(self.now);
        let actions = node.handle(event);

        for action in actions {
            self.process_action(index, action);
        }
    }

    fn process_action(&mut self, from: NodeIndex, action: Action) {
        self.stats.actions_processed += 1;
        trace!(node = from, action = action.type_name(), now = ?self.now, "Processing action");
        match action {
            Action::SetTimer { id, duration } => {
                self.queue
                    .push(self.now.saturating_add(duration), from, Event::Timer(id));
            }
            Action::SendShare { to, delay, payload } => {
                if !self.network.is_routable(to) {
                    self.network.record_undeliverable();
                    warn!(from, to, "Dropping share sent to unknown node");
                    return;
                }
                self.network.record_send(delay);
                self.queue.push(
                    self.now.saturating_add(delay),
                    to,
                    Event::ShareReceived { from, payload },
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharechain_core::testing::FixedSource;
    use sharechain_node::NodeConfig;
    use tracing_test::traced_test;

    fn node(index: NodeIndex, peers: Vec<NodeIndex>, source: FixedSource) -> PeerNode {
        PeerNode::new(index, peers, Box::new(source), NodeConfig::default())
    }

    #[traced_test]
    #[test]
    fn test_timers_fire_in_order() {
        let mut runner = SimulationRunner::from_nodes(vec![node(
            0,
            vec![],
            FixedSource::constant(1.0, 0.1),
        )]);

        runner.run_until(Duration::from_millis(3500));

        assert_eq!(runner.now(), Duration::from_millis(3500));
        assert_eq!(runner.node(0).unwrap().shares_produced(), 3);
        assert_eq!(runner.stats().timers_fired, 3);
        // The fourth production timer is still queued.
        assert_eq!(runner.pending_events(), 1);
    }

    #[traced_test]
    #[test]
    fn test_event_at_end_is_processed() {
        let mut runner = SimulationRunner::from_nodes(vec![node(
            0,
            vec![],
            FixedSource::constant(2.0, 0.1),
        )]);

        runner.run_until(Duration::from_secs(2));
        assert_eq!(runner.node(0).unwrap().shares_produced(), 1);
    }

    #[traced_test]
    #[test]
    fn test_stop_halts_production() {
        let mut runner = SimulationRunner::from_nodes(vec![node(
            0,
            vec![],
            FixedSource::constant(1.0, 0.1),
        )]);

        runner.run_until(Duration::from_millis(1500));
        runner.stop();
        runner.run_until(Duration::from_secs(10));

        assert!(runner.node(0).unwrap().is_stopped());
        assert_eq!(runner.node(0).unwrap().shares_produced(), 1);
    }

    #[traced_test]
    #[test]
    fn test_send_to_unknown_node_is_dropped() {
        let mut runner = SimulationRunner::from_nodes(vec![node(
            0,
            vec![7],
            FixedSource::constant(1.0, 0.1),
        )]);

        runner.run_until(Duration::from_millis(1500));

        assert_eq!(runner.network().messages_undeliverable(), 1);
        assert_eq!(runner.network().messages_sent(), 0);
    }

    #[traced_test]
    #[test]
    fn test_new_builds_ring_mesh() {
        let config = NetworkConfig {
            num_nodes: 6,
            peers_per_node: 2,
            ..Default::default()
        };
        let runner = SimulationRunner::new(&config, 1).unwrap();

        assert_eq!(runner.nodes().len(), 6);
        for (i, node) in runner.nodes().iter().enumerate() {
            assert_eq!(node.index() as usize, i);
            assert_eq!(node.peers().len(), 4);
        }
    }

    #[test]
    fn test_new_rejects_bad_distribution() {
        let config = NetworkConfig {
            num_nodes: 2,
            share_interval_mean: 0.0,
            ..Default::default()
        };
        assert!(SimulationRunner::new(&config, 1).is_err());

        let config = NetworkConfig {
            num_nodes: 2,
            latency_std: -1.0,
            ..Default::default()
        };
        assert!(matches!(
            SimulationRunner::new(&config, 1),
            Err(SimulationError::InvalidParameter {
                name: "latency standard deviation",
                ..
            })
        ));
    }
}
