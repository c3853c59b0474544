//! Top-level simulator.

use crate::config::{ConfigError, SimulatorConfig};
use crate::metrics::SimulationReport;
use sharechain_simulation::SimulationRunner;
use tracing::info;

/// Runs one configured simulation and reports the result.
pub struct Simulator {
    config: SimulatorConfig,
    runner: SimulationRunner,
}

impl Simulator {
    /// Validate `config` and build the node network.
    pub fn new(config: SimulatorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let runner = SimulationRunner::new(&config.to_network_config(), config.seed)?;
        Ok(Self { config, runner })
    }

    /// The underlying runner.
    pub fn runner(&self) -> &SimulationRunner {
        &self.runner
    }

    /// Start every node, run for the configured duration, stop, and collect
    /// totals.
    pub fn run(&mut self) -> SimulationReport {
        info!(
            num_nodes = self.config.num_nodes,
            duration = ?self.config.duration,
            "Starting simulation"
        );

        self.runner.start();
        self.runner.run_until(self.config.duration);
        self.runner.stop();

        let report = SimulationReport::collect(&self.config, &self.runner);
        info!(
            total_shares = report.total_shares,
            total_uncles = report.total_uncles,
            total_orphans = report.total_orphans,
            events = self.runner.stats().events_processed,
            "Simulation complete"
        );
        report
    }
}
