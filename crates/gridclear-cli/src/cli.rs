use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gridclear", author, version, about, long_about = None)]
pub struct Cli {
    /// Set the logging level
    #[arg(long, default_value = "info", global = true)]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a network for structural errors and warnings
    Validate {
        #[command(flatten)]
        source: NetworkSource,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Clear a single period and print nodal prices
    Clear {
        #[command(flatten)]
        source: NetworkSource,
        #[command(flatten)]
        clearing: ClearingArgs,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Clear all 24 hours of a trading day
    DayAhead {
        #[command(flatten)]
        source: NetworkSource,
        #[command(flatten)]
        clearing: ClearingArgs,
        /// Hourly factor CSV (hour,load_factor,wind_factor,solar_factor)
        #[arg(long, value_hint = ValueHint::FilePath)]
        profile: Option<PathBuf>,
        /// Write hourly prices as CSV
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
        /// Worker threads for hourly clearing (0 = rayon default)
        #[arg(long, default_value_t = 0)]
        threads: usize,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Print or write one of the built-in networks
    Sample {
        /// Sample name (three-bus, balanced)
        #[arg(default_value = "three-bus")]
        name: String,
        /// Output path; `.json` writes JSON, anything else TOML
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
    /// Network topology utilities
    Graph {
        #[command(subcommand)]
        command: GraphCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum GraphCommands {
    /// Node, edge and degree counts
    Stats {
        #[command(flatten)]
        source: NetworkSource,
    },
    /// Electrically connected groups of nodes
    Islands {
        #[command(flatten)]
        source: NetworkSource,
    },
    /// Export the topology (graphviz)
    Export {
        #[command(flatten)]
        source: NetworkSource,
        #[arg(long, default_value = "graphviz")]
        format: String,
        #[arg(short, long, value_hint = ValueHint::FilePath)]
        out: Option<PathBuf>,
    },
}

/// Where the network comes from: a document on disk or a built-in sample.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct NetworkSource {
    /// Network document (TOML or JSON)
    #[arg(value_hint = ValueHint::FilePath)]
    pub network: Option<PathBuf>,
    /// Use a built-in sample network instead of a file
    #[arg(long)]
    pub sample: Option<String>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ClearingArgs {
    /// Clearing configuration (TOML)
    #[arg(long, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,
    /// Add line flow limits to the dispatch LP
    #[arg(long)]
    pub line_limits: bool,
    /// Skip the congestion adjustment
    #[arg(long)]
    pub no_congestion: bool,
    /// LP backend (clarabel, highs)
    #[arg(long)]
    pub solver: Option<String>,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}
