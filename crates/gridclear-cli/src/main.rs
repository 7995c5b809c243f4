use anyhow::{Context, Result};
use clap::Parser;
use gridclear_cli::cli::{Cli, Commands};
use tracing::debug;
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::day_ahead::DayAheadOptions;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so table and JSON output stay clean on stdout.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(cli.log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default tracing subscriber")?;

    debug!(command = ?cli.command, "gridclear starting");

    match &cli.command {
        Commands::Validate { source, format } => commands::validate::handle(source, *format),
        Commands::Clear {
            source,
            clearing,
            format,
        } => commands::clear::handle(source, clearing, *format),
        Commands::DayAhead {
            source,
            clearing,
            profile,
            out,
            threads,
            format,
        } => commands::day_ahead::handle(
            source,
            clearing,
            DayAheadOptions {
                profile: profile.as_deref(),
                out: out.as_deref(),
                threads: *threads,
                format: *format,
            },
        ),
        Commands::Sample { name, out } => commands::sample::handle(name, out.as_deref()),
        Commands::Graph { command } => commands::graph::handle(command),
    }
}
