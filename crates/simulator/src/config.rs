//! Configuration types for the simulator.

use sharechain_node::NodeConfig;
use sharechain_simulation::{NetworkConfig, SimulationError};
use std::time::Duration;
use thiserror::Error;

/// Errors in a simulator configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// The network has no nodes.
    #[error("Number of nodes must be at least 1")]
    NoNodes,

    /// The run length is zero.
    #[error("Simulation duration must be positive")]
    ZeroDuration,

    /// A distribution parameter is out of range.
    #[error("Invalid {name}: {value}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Rejected value.
        value: f64,
    },

    /// The underlying simulation rejected the configuration.
    #[error(transparent)]
    Simulation(#[from] SimulationError),
}

/// Configuration for a simulation run.
#[derive(Clone, Debug)]
pub struct SimulatorConfig {
    /// Number of nodes in the network.
    pub num_nodes: u32,

    /// Successors each node links to (see `ring_mesh`).
    pub peers_per_node: u32,

    /// Mean link latency in seconds.
    pub latency_mean: f64,

    /// Standard deviation of link latency in seconds.
    pub latency_std: f64,

    /// Mean gap between two shares from one node, in seconds.
    pub share_mean: f64,

    /// Simulated run length.
    pub duration: Duration,

    /// Random seed for deterministic simulation.
    pub seed: u64,

    /// Protocol constants applied by every node.
    pub node: NodeConfig,
}

impl SimulatorConfig {
    /// Create a configuration for `num_nodes` nodes with default parameters.
    pub fn new(num_nodes: u32) -> Self {
        Self {
            num_nodes,
            peers_per_node: 4,
            latency_mean: 0.1,
            latency_std: 0.02,
            share_mean: 10.0,
            duration: Duration::from_secs(1800),
            seed: 12345,
            node: NodeConfig::default(),
        }
    }

    /// Set the number of peers per node.
    pub fn with_peers_per_node(mut self, peers: u32) -> Self {
        self.peers_per_node = peers;
        self
    }

    /// Set the latency distribution.
    pub fn with_latency(mut self, mean: f64, std: f64) -> Self {
        self.latency_mean = mean;
        self.latency_std = std;
        self
    }

    /// Set the mean share interval.
    pub fn with_share_mean(mut self, mean: f64) -> Self {
        self.share_mean = mean;
        self
    }

    /// Set the run length.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Set the run length from fractional seconds.
    ///
    /// Negative, non-finite and overflowing values are rejected; zero is left
    /// for [`SimulatorConfig::validate`] to reject.
    pub fn with_duration_secs(self, secs: f64) -> Result<Self, ConfigError> {
        let duration = Duration::try_from_secs_f64(secs)
            .map_err(|_| ConfigError::InvalidParameter {
                name: "duration",
                value: secs,
            })?;
        Ok(self.with_duration(duration))
    }

    /// Set the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every parameter before a run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_nodes == 0 {
            return Err(ConfigError::NoNodes);
        }
        if self.duration.is_zero() {
            return Err(ConfigError::ZeroDuration);
        }
        if !(self.share_mean.is_finite() && self.share_mean > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "share mean",
                value: self.share_mean,
            });
        }
        if !(self.latency_mean.is_finite() && self.latency_mean >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "latency mean",
                value: self.latency_mean,
            });
        }
        if !(self.latency_std.is_finite() && self.latency_std >= 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "latency standard deviation",
                value: self.latency_std,
            });
        }
        Ok(())
    }

    /// Convert to a NetworkConfig for the underlying simulation.
    pub fn to_network_config(&self) -> NetworkConfig {
        NetworkConfig {
            num_nodes: self.num_nodes,
            peers_per_node: self.peers_per_node,
            share_interval_mean: self.share_mean,
            latency_mean: self.latency_mean,
            latency_std: self.latency_std,
            node: self.node.clone(),
        }
    }
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self::new(50)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert_eq!(SimulatorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert_eq!(SimulatorConfig::new(0).validate(), Err(ConfigError::NoNodes));
        assert_eq!(
            SimulatorConfig::new(4)
                .with_duration(Duration::ZERO)
                .validate(),
            Err(ConfigError::ZeroDuration)
        );
        assert!(matches!(
            SimulatorConfig::new(4).with_share_mean(-1.0).validate(),
            Err(ConfigError::InvalidParameter { name: "share mean", .. })
        ));
        assert!(matches!(
            SimulatorConfig::new(4).with_latency(-0.1, 0.02).validate(),
            Err(ConfigError::InvalidParameter { name: "latency mean", .. })
        ));
        assert!(matches!(
            SimulatorConfig::new(4).with_latency(0.1, f64::NAN).validate(),
            Err(ConfigError::InvalidParameter {
                name: "latency standard deviation",
                ..
            })
        ));
    }

    #[test]
    fn test_duration_from_fractional_seconds() {
        let config = SimulatorConfig::new(4).with_duration_secs(90.5).unwrap();
        assert_eq!(config.duration, Duration::from_millis(90_500));
        assert_eq!(config.validate(), Ok(()));

        assert!(matches!(
            SimulatorConfig::new(4).with_duration_secs(-1.0),
            Err(ConfigError::InvalidParameter { name: "duration", .. })
        ));
        assert!(matches!(
            SimulatorConfig::new(4).with_duration_secs(f64::NAN),
            Err(ConfigError::InvalidParameter { name: "duration", .. })
        ));
        assert_eq!(
            SimulatorConfig::new(4)
                .with_duration_secs(0.0)
                .unwrap()
                .validate(),
            Err(ConfigError::ZeroDuration)
        );
    }

    #[test]
    fn test_to_network_config() {
        let network = SimulatorConfig::new(7)
            .with_peers_per_node(2)
            .with_share_mean(3.0)
            .with_latency(0.2, 0.05)
            .to_network_config();

        assert_eq!(network.num_nodes, 7);
        assert_eq!(network.peers_per_node, 2);
        assert_eq!(network.share_interval_mean, 3.0);
        assert_eq!(network.latency_mean, 0.2);
        assert_eq!(network.latency_std, 0.05);
    }
}
