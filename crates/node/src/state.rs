//! Peer node state machine.

use crate::config::NodeConfig;
use crate::production::{floored_delay, select_uncles};
use sharechain_chain::{AddShareOutcome, Sharechain};
use sharechain_core::{Action, Event, RandomSource, StateMachine, TimerId};
use sharechain_messages::{decode_share, encode_share};
use sharechain_types::{NodeIndex, Share, ShareHash, ShareHeight};
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// A sharechain participant.
///
/// The node is single-threaded and never shares its chain: other nodes only
/// learn about its shares through messages the runner delivers with a delay.
pub struct PeerNode {
    /// This node's index, also its identity in share hashes.
    index: NodeIndex,

    /// Protocol constants.
    config: NodeConfig,

    /// Local view of accepted shares.
    chain: Sharechain,

    /// Nodes every produced share is sent to. May contain repeats.
    peers: Vec<NodeIndex>,

    /// Production gaps and link latencies.
    random: Box<dyn RandomSource>,

    /// Number of shares produced so far.
    share_sequence: u64,

    /// Inbound messages that failed to decode.
    dropped_messages: u64,

    /// Whether `Event::Start` has been handled.
    started: bool,

    /// Whether `Event::Stop` has been handled.
    stopped: bool,

    /// Current simulation time.
    now: Duration,
}

impl std::fmt::Debug for PeerNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PeerNode")
            .field("index", &self.index)
            .field("peers", &self.peers)
            .field("shares", &self.chain.total_shares())
            .field("share_sequence", &self.share_sequence)
            .field("started", &self.started)
            .field("stopped", &self.stopped)
            .field("now", &self.now)
            .finish()
    }
}

impl PeerNode {
    /// Create a new node.
    pub fn new(
        index: NodeIndex,
        peers: Vec<NodeIndex>,
        random: Box<dyn RandomSource>,
        config: NodeConfig,
    ) -> Self {
        Self {
            index,
            config,
            chain: Sharechain::new(),
            peers,
            random,
            share_sequence: 0,
            dropped_messages: 0,
            started: false,
            stopped: false,
            now: Duration::ZERO,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Accessors
    // ═══════════════════════════════════════════════════════════════════════════

    /// Get this node's index.
    pub fn index(&self) -> NodeIndex {
        self.index
    }

    /// Get the local chain.
    pub fn chain(&self) -> &Sharechain {
        &self.chain
    }

    /// Get the peers this node sends to.
    pub fn peers(&self) -> &[NodeIndex] {
        &self.peers
    }

    /// Number of shares this node has produced.
    pub fn shares_produced(&self) -> u64 {
        self.share_sequence
    }

    /// Number of inbound messages dropped because they failed to decode.
    pub fn dropped_messages(&self) -> u64 {
        self.dropped_messages
    }

    /// Check if the node has been stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Lifecycle
    // ═══════════════════════════════════════════════════════════════════════════

    fn on_start(&mut self) -> Vec<Action> {
        if self.started || self.stopped {
            return vec![];
        }
        self.started = true;
        info!(node = self.index, now = ?self.now, "Node started");
        vec![self.schedule_production()]
    }

    fn on_stop(&mut self) -> Vec<Action> {
        if !self.stopped {
            self.stopped = true;
            info!(
                node = self.index,
                now = ?self.now,
                shares = self.chain.total_shares(),
                produced = self.share_sequence,
                "Node stopped"
            );
        }
        vec![]
    }

    /// Request the next production timer.
    fn schedule_production(&mut self) -> Action {
        let duration = floored_delay(
            self.random.sample_interval(),
            self.config.min_production_delay,
        );
        Action::SetTimer {
            id: TimerId::ShareProduction,
            duration,
        }
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Production
    // ═══════════════════════════════════════════════════════════════════════════

    /// Handle the production timer: build, store, send, reschedule.
    pub fn on_production_timer(&mut self) -> Vec<Action> {
        if self.stopped {
            trace!(node = self.index, "Ignoring production timer after stop");
            return vec![];
        }

        let share = self.build_share();
        let payload = encode_share(&share);

        info!(
            node = self.index,
            hash = %share.hash,
            height = share.height.0,
            uncles = share.uncles.len(),
            "Generated share"
        );

        let outcome = self.chain.add_share(share, self.now);
        if !outcome.is_accepted() {
            // Parent and height come from the local chain, so this means the
            // hash collided with a stored share.
            warn!(node = self.index, outcome = ?outcome, "Own share was not accepted");
        }

        let mut actions = self.broadcast(payload);
        actions.push(self.schedule_production());
        actions
    }

    /// Build the next share on top of the current tip.
    ///
    /// Advances the local sequence number.
    pub fn build_share(&mut self) -> Share {
        self.share_sequence += 1;

        let (parent_hash, height) = match self.chain.tip() {
            Some(tip) => (tip.hash.clone(), tip.height.next()),
            None => (ShareHash::EMPTY, ShareHeight::GENESIS),
        };
        let uncles = select_uncles(&self.chain, height, self.config.max_uncles);

        let timestamp = self.now.as_secs_f64();
        let hash = ShareHash::for_production(self.index, self.share_sequence, timestamp);

        Share::new(hash, height, timestamp, parent_hash, uncles)
    }

    /// Send an encoded share to every peer with an independently sampled delay.
    fn broadcast(&mut self, payload: Vec<u8>) -> Vec<Action> {
        let mut actions = Vec::with_capacity(self.peers.len() + 1);
        for &to in &self.peers {
            let delay = floored_delay(self.random.sample_latency(), self.config.min_link_latency);
            actions.push(Action::SendShare {
                to,
                delay,
                payload: payload.clone(),
            });
        }
        actions
    }

    // ═══════════════════════════════════════════════════════════════════════════
    // Reception
    // ═══════════════════════════════════════════════════════════════════════════

    /// Handle an encoded share from a peer.
    ///
    /// Malformed messages are dropped; everything else goes through the same
    /// acceptance path as locally produced shares.
    pub fn on_share_received(&mut self, from: NodeIndex, payload: &[u8]) -> Vec<Action> {
        if self.stopped {
            trace!(node = self.index, from, "Ignoring share after stop");
            return vec![];
        }

        let share = match decode_share(payload) {
            Ok(share) => share,
            Err(e) => {
                self.dropped_messages += 1;
                warn!(node = self.index, from, error = %e, "Dropping malformed share message");
                return vec![];
            }
        };

        let hash = share.hash.clone();
        match self.chain.add_share(share, self.now) {
            AddShareOutcome::Accepted { .. } => {
                info!(node = self.index, from, hash = %hash, "Received share");
            }
            AddShareOutcome::Duplicate => {
                trace!(node = self.index, from, hash = %hash, "Received duplicate share");
            }
            AddShareOutcome::Orphan(reason) => {
                debug!(node = self.index, from, hash = %hash, reason = ?reason, "Received orphan share");
            }
        }
        vec![]
    }
}

impl StateMachine for PeerNode {
    fn handle(&mut self, event: Event) -> Vec<Action> {
        match event {
            Event::Start => self.on_start(),
            Event::Timer(TimerId::ShareProduction) => self.on_production_timer(),
            Event::ShareReceived { from, payload } => self.on_share_received(from, &payload),
            Event::Stop => self.on_stop(),
        }
    }

    fn set_time(&mut self, now: Duration) {
        self.now = now;
    }

    fn now(&self) -> Duration {
        self.now
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharechain_core::testing::FixedSource;
    use tracing_test::traced_test;

    fn make_node(index: NodeIndex, peers: Vec<NodeIndex>, source: FixedSource) -> PeerNode {
        PeerNode::new(index, peers, Box::new(source), NodeConfig::default())
    }

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    /// Fire the production timer at `at` and return the produced share.
    fn produce(node: &mut PeerNode, at: f64) -> (Share, Vec<Action>) {
        node.set_time(secs(at));
        let actions = node.handle(Event::Timer(TimerId::ShareProduction));
        let payload = actions
            .iter()
            .find_map(|a| match a {
                Action::SendShare { payload, .. } => Some(payload.clone()),
                _ => None,
            })
            .expect("node with peers should send its share");
        (decode_share(&payload).unwrap(), actions)
    }

    #[traced_test]
    #[test]
    fn test_start_schedules_production() {
        let mut node = make_node(0, vec![1], FixedSource::constant(5.0, 0.1));
        let actions = node.handle(Event::Start);
        assert_eq!(
            actions,
            vec![Action::SetTimer {
                id: TimerId::ShareProduction,
                duration: secs(5.0),
            }]
        );

        // A second start does nothing.
        assert!(node.handle(Event::Start).is_empty());
    }

    #[traced_test]
    #[test]
    fn test_production_delay_is_floored() {
        let mut node = make_node(0, vec![], FixedSource::new(vec![0.0, -1.0, 0.05], vec![0.1]));
        for _ in 0..3 {
            let actions = node.on_production_timer();
            assert_eq!(
                actions.last(),
                Some(&Action::SetTimer {
                    id: TimerId::ShareProduction,
                    duration: Duration::from_millis(100),
                })
            );
        }
    }

    #[traced_test]
    #[test]
    fn test_first_share_is_genesis() {
        let mut node = make_node(3, vec![1], FixedSource::constant(1.0, 0.2));
        let (share, _) = produce(&mut node, 2.5);

        assert_eq!(share.hash.as_str(), "share-3-1-2.500000");
        assert_eq!(share.height, ShareHeight::GENESIS);
        assert!(share.parent_hash.is_empty());
        assert!(share.uncles.is_empty());
        assert_eq!(share.timestamp, 2.5);
        assert!(node.chain().contains(&share.hash));
        assert_eq!(node.shares_produced(), 1);
    }

    #[traced_test]
    #[test]
    fn test_shares_extend_tip_and_claim_uncles() {
        let mut node = make_node(0, vec![1], FixedSource::constant(1.0, 0.2));
        let (first, _) = produce(&mut node, 1.0);
        let (second, _) = produce(&mut node, 2.0);
        let (third, _) = produce(&mut node, 3.0);

        assert_eq!(second.parent_hash, first.hash);
        assert_eq!(second.height, ShareHeight(1));
        // The parent is itself an unclaimed candidate.
        assert_eq!(second.uncles, vec![first.hash.clone()]);

        assert_eq!(third.parent_hash, second.hash);
        assert_eq!(third.height, ShareHeight(2));
        // first is already claimed by second.
        assert_eq!(third.uncles, vec![second.hash.clone()]);

        assert_eq!(node.chain().total_shares(), 3);
        assert_eq!(node.chain().orphan_count(), 0);
        assert_eq!(node.chain().uncle_count(), 2);
    }

    #[traced_test]
    #[test]
    fn test_at_most_two_uncles() {
        let mut node = make_node(9, vec![1], FixedSource::constant(1.0, 0.2));
        for (i, name) in ["a", "b", "c"].iter().enumerate() {
            let payload = format!("{}|0|{}|", name, i).into_bytes();
            node.on_share_received(1, &payload);
        }

        let (share, _) = produce(&mut node, 5.0);
        assert_eq!(share.height, ShareHeight(1));
        assert_eq!(share.parent_hash.as_str(), "a");
        assert_eq!(share.uncles, vec![ShareHash::from("a"), ShareHash::from("b")]);
    }

    #[traced_test]
    #[test]
    fn test_broadcast_to_every_peer_with_sampled_latency() {
        let mut node = make_node(
            0,
            vec![1, 2, 2],
            FixedSource::new(vec![10.0], vec![0.25, 0.001, 0.5]),
        );
        let (share, actions) = produce(&mut node, 1.0);
        let expected_payload = encode_share(&share);

        let sends: Vec<(NodeIndex, Duration)> = actions
            .iter()
            .filter_map(|a| match a {
                Action::SendShare { to, delay, payload } => {
                    assert_eq!(payload, &expected_payload);
                    Some((*to, *delay))
                }
                _ => None,
            })
            .collect();

        assert_eq!(
            sends,
            vec![
                (1, secs(0.25)),
                (2, Duration::from_millis(10)),
                (2, secs(0.5)),
            ]
        );
        assert_eq!(
            actions.last(),
            Some(&Action::SetTimer {
                id: TimerId::ShareProduction,
                duration: secs(10.0),
            })
        );
    }

    #[traced_test]
    #[test]
    fn test_receive_accepts_and_ignores_duplicates() {
        let mut node = make_node(1, vec![0], FixedSource::constant(1.0, 0.1));
        node.set_time(secs(4.0));

        node.handle(Event::ShareReceived {
            from: 0,
            payload: b"s0|0|1.5|".to_vec(),
        });
        node.handle(Event::ShareReceived {
            from: 0,
            payload: b"s0|0|1.5|".to_vec(),
        });

        assert_eq!(node.chain().total_shares(), 1);
        assert_eq!(node.chain().orphan_count(), 0);
    }

    #[traced_test]
    #[test]
    fn test_receive_orphan_is_counted() {
        let mut node = make_node(1, vec![0], FixedSource::constant(1.0, 0.1));
        node.on_share_received(0, b"s5|5|1.5|s4");

        assert_eq!(node.chain().total_shares(), 0);
        assert_eq!(node.chain().orphan_count(), 1);
    }

    #[traced_test]
    #[test]
    fn test_malformed_message_dropped() {
        let mut node = make_node(1, vec![0], FixedSource::constant(1.0, 0.1));
        node.on_share_received(0, b"s0|zero|1.5|");
        node.on_share_received(0, b"garbage");

        assert_eq!(node.dropped_messages(), 2);
        assert!(node.chain().is_empty());
        assert_eq!(node.chain().orphan_count(), 0);
        assert!(logs_contain("Dropping malformed share message"));
    }

    #[traced_test]
    #[test]
    fn test_stopped_node_is_inert() {
        let mut node = make_node(0, vec![1], FixedSource::constant(1.0, 0.1));
        node.handle(Event::Start);
        node.handle(Event::Stop);

        assert!(node.is_stopped());
        assert!(node.handle(Event::Timer(TimerId::ShareProduction)).is_empty());
        assert!(node
            .handle(Event::ShareReceived {
                from: 1,
                payload: b"s0|0|1.0|".to_vec(),
            })
            .is_empty());
        assert_eq!(node.shares_produced(), 0);
        assert!(node.chain().is_empty());
    }

    #[traced_test]
    #[test]
    fn test_two_nodes_exchange_concurrent_genesis_shares() {
        let mut a = make_node(0, vec![1], FixedSource::constant(1.0, 0.1));
        let mut b = make_node(1, vec![0], FixedSource::constant(1.0, 0.1));

        let (share_a, _) = produce(&mut a, 1.0);
        let (share_b, _) = produce(&mut b, 1.0);
        assert_eq!(share_a.height, ShareHeight::GENESIS);
        assert_eq!(share_b.height, ShareHeight::GENESIS);

        // Deliver in opposite orders; neither depends on the other.
        b.set_time(secs(1.1));
        b.handle(Event::ShareReceived {
            from: 0,
            payload: encode_share(&share_a),
        });
        a.set_time(secs(1.1));
        a.handle(Event::ShareReceived {
            from: 1,
            payload: encode_share(&share_b),
        });

        for node in [&a, &b] {
            assert_eq!(node.chain().total_shares(), 2);
            assert_eq!(node.chain().orphan_count(), 0);
            assert!(node.chain().contains(&share_a.hash));
            assert!(node.chain().contains(&share_b.hash));
        }
    }
}
