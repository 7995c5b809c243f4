pub mod clear;
pub mod day_ahead;
pub mod graph;
pub mod sample;
pub mod validate;

use anyhow::{Context, Result};
use gridclear_algo::{ClearingConfig, ClearingEngine};
use gridclear_cli::{ClearingArgs, NetworkSource};
use gridclear_core::io::load_network;
use gridclear_core::samples::sample_with_bids;
use gridclear_core::{BidMap, Network};
use tracing::info;

pub fn load_source(source: &NetworkSource) -> Result<(Network, BidMap)> {
    let (network, bids) = match (&source.network, &source.sample) {
        (Some(path), _) => load_network(path)
            .with_context(|| format!("loading network from {}", path.display()))?,
        (None, Some(name)) => {
            sample_with_bids(name).with_context(|| format!("loading sample network '{name}'"))?
        }
        (None, None) => anyhow::bail!("either a network file or --sample is required"),
    };
    info!(network = %network.name, stats = %network.stats(), "network loaded");
    Ok((network, bids))
}

/// Config file (or defaults) with command-line overrides applied.
pub fn build_engine(args: &ClearingArgs) -> Result<ClearingEngine> {
    let mut config = match &args.config {
        Some(path) => ClearingConfig::from_toml_path(path)
            .with_context(|| format!("reading clearing config {}", path.display()))?,
        None => ClearingConfig::default(),
    };
    if args.line_limits {
        config.line_limits = true;
    }
    if args.no_congestion {
        config.congestion.enabled = false;
    }
    if let Some(solver) = &args.solver {
        config.lp_solver = solver.clone();
    }
    ClearingEngine::new(config).context("configuring clearing engine")
}

pub fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value).context("serializing output")?;
    println!("{payload}");
    Ok(())
}
