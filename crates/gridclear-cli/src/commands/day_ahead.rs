use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use gridclear_cli::{ClearingArgs, NetworkSource, OutputFormat};
use gridclear_ts::{
    run_day_ahead, summarize, write_prices_csv_path, DailyProfile, DailySummary,
    DayAheadMarketData,
};
use serde::Serialize;
use tabwriter::TabWriter;
use tracing::warn;

use super::{build_engine, load_source, print_json};

pub struct DayAheadOptions<'a> {
    pub profile: Option<&'a Path>,
    pub out: Option<&'a Path>,
    pub threads: usize,
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct DayAheadOutput<'a> {
    network: &'a str,
    solver_failures: Vec<usize>,
    summary: &'a DailySummary,
}

pub fn handle(
    source: &NetworkSource,
    clearing: &ClearingArgs,
    options: DayAheadOptions<'_>,
) -> Result<()> {
    let (network, _) = load_source(source)?;
    let engine = build_engine(clearing)?;
    let data = match options.profile {
        Some(path) => {
            let profile = DailyProfile::from_csv_path(path)
                .with_context(|| format!("reading profile {}", path.display()))?;
            DayAheadMarketData::with_profile(&network, &profile)?
        }
        None => DayAheadMarketData::from_network(&network)?,
    };

    let result = run_day_ahead(&data, &engine, options.threads)
        .with_context(|| format!("day-ahead clearing of {}", network.name))?;
    let failures = result.solver_failures();
    if !failures.is_empty() {
        warn!(hours = ?failures, "LP did not solve for some hours; prices come from merit order");
    }
    let prices = result.prices();

    if let Some(path) = options.out {
        write_prices_csv_path(path, &prices)
            .with_context(|| format!("writing prices to {}", path.display()))?;
    }

    let summary = summarize(&prices);
    match options.format {
        OutputFormat::Json => print_json(&DayAheadOutput {
            network: &network.name,
            solver_failures: failures,
            summary: &summary,
        })?,
        OutputFormat::Table => {
            let mut writer = TabWriter::new(Vec::new()).padding(2);
            writeln!(writer, "Node\tMean\tMin\tMax\tPeak hour")?;
            for node in &summary.nodes {
                writeln!(
                    writer,
                    "{}\t{:.2}\t{:.2}\t{:.2}\t{:02}:00",
                    node.node_id, node.mean, node.min, node.max, node.peak_hour
                )?;
            }
            writer.flush()?;
            print!("{}", String::from_utf8(writer.into_inner()?)?);
            println!("System average: {:.2}", summary.system_average);
            if let (Some(peak), Some(off_peak)) = (summary.peak_hour, summary.off_peak_hour) {
                println!("Peak hour: {peak:02}:00, off-peak hour: {off_peak:02}:00");
            }
            if let Some(path) = options.out {
                println!("Hourly prices written to {}", path.display());
            }
        }
    }
    Ok(())
}
