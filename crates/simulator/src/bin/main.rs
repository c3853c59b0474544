//! Sharechain Simulator CLI
//!
//! Runs a sharechain network for a fixed simulated duration and prints the
//! share, uncle and orphan totals.

use clap::Parser;
use sharechain_simulator::{Simulator, SimulatorConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "sharechain-sim")]
#[command(about = "Sharechain propagation and uncle/orphan simulator")]
#[command(version)]
struct Cli {
    /// Number of nodes
    #[arg(long, default_value = "50")]
    nodes: u32,

    /// Successors each node links to in the ring mesh
    #[arg(long, default_value = "4")]
    peers_per_node: u32,

    /// Mean link latency in seconds
    #[arg(long, default_value = "0.1")]
    latency_mean: f64,

    /// Link latency standard deviation in seconds
    #[arg(long, default_value = "0.02")]
    latency_std: f64,

    /// Mean time between shares from one node, in seconds
    #[arg(long, default_value = "10.0")]
    share_mean: f64,

    /// Simulated run length in seconds (fractions allowed)
    #[arg(long, default_value = "1800")]
    duration: f64,

    /// Random seed
    #[arg(long, default_value = "12345")]
    seed: u64,

    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(&cli.log_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = SimulatorConfig::new(cli.nodes)
        .with_peers_per_node(cli.peers_per_node)
        .with_latency(cli.latency_mean, cli.latency_std)
        .with_share_mean(cli.share_mean)
        .with_seed(cli.seed)
        .with_duration_secs(cli.duration)?;

    let mut simulator = Simulator::new(config)?;
    let report = simulator.run();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
