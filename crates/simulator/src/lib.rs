//! Sharechain Simulator
//!
//! Runs a network of sharechain nodes for a fixed amount of simulated time
//! and reports how many shares were accepted and how many uncles and orphans
//! the nodes recorded.
//!
//! # Architecture
//!
//! The simulator builds on `sharechain-simulation` to provide:
//!
//! - **Configuration**: Network size, share rate, latency and run length
//! - **Metrics Collection**: Aggregated share, uncle and orphan counts
//! - **Reporting**: Human-readable and JSON output
//!
//! # Example
//!
//! ```ignore
//! use sharechain_simulator::{Simulator, SimulatorConfig};
//! use std::time::Duration;
//!
//! let config = SimulatorConfig::new(20)
//!     .with_share_mean(5.0)
//!     .with_duration(Duration::from_secs(600));
//!
//! let mut simulator = Simulator::new(config)?;
//! let report = simulator.run();
//!
//! println!("Uncle rate: {:.2}%", report.uncle_percentage);
//! println!("Orphan rate: {:.2}%", report.orphan_percentage);
//! ```

pub mod config;
pub mod metrics;
pub mod runner;

pub use config::{ConfigError, SimulatorConfig};
pub use metrics::SimulationReport;
pub use runner::Simulator;
