use std::io::Write;

use anyhow::{Context, Result};
use gridclear_algo::{summarize_clearing, ClearingReport, MarketSummary, NodeOutcome};
use gridclear_cli::{ClearingArgs, NetworkSource, OutputFormat};
use serde::Serialize;
use tabwriter::TabWriter;

use super::{build_engine, load_source, print_json};

pub fn handle(source: &NetworkSource, clearing: &ClearingArgs, format: OutputFormat) -> Result<()> {
    let (network, bids) = load_source(source)?;
    let engine = build_engine(clearing)?;
    let offers = (!bids.is_empty()).then_some(&bids);
    let report = engine
        .clear(&network, offers)
        .with_context(|| format!("clearing {}", network.name))?;

    let summary = summarize_clearing(&network, &report.prices);

    match format {
        OutputFormat::Json => print_json(&ClearOutput {
            report: &report,
            summary: &summary,
        }),
        OutputFormat::Table => {
            print_report(&report)?;
            print_summary(&summary)
        }
    }
}

#[derive(Serialize)]
struct ClearOutput<'a> {
    #[serde(flatten)]
    report: &'a ClearingReport,
    summary: &'a MarketSummary,
}

fn print_report(report: &ClearingReport) -> Result<()> {
    let mut writer = TabWriter::new(Vec::new()).padding(2);
    writeln!(writer, "Node\tPrice\tMerit order\tSet by")?;
    for (node_id, price) in &report.prices {
        let (before, set_by) = match report.nodes.get(node_id) {
            Some(node) => (node.price, describe(&node.outcome)),
            None => (*price, String::from("-")),
        };
        writeln!(writer, "{node_id}\t{price:.2}\t{before:.2}\t{set_by}")?;
    }
    writer.flush()?;
    print!("{}", String::from_utf8(writer.into_inner()?)?);

    for adjustment in &report.congestion {
        println!(
            "Congestion on {} ({} -> {}): cost {:.2}",
            adjustment.line_id, adjustment.from_node, adjustment.to_node, adjustment.congestion_cost
        );
    }
    let solver = &report.solver;
    let status = if solver.success { "ok" } else { "failed" };
    match solver.objective {
        Some(objective) => println!("LP ({}): {status}, objective {objective:.2}", solver.backend),
        None => println!("LP ({}): {status}, {}", solver.backend, solver.message),
    }
    if report.diagnostics.has_issues() {
        print!("{}", report.diagnostics);
    }
    Ok(())
}

fn print_summary(summary: &MarketSummary) -> Result<()> {
    println!();
    print!("Demand {} / capacity {}", summary.total_demand, summary.total_capacity);
    match summary.demand_supply_ratio {
        Some(ratio) => println!(" (ratio {:.1}%)", ratio * 100.0),
        None => println!(),
    }

    let mut writer = TabWriter::new(Vec::new()).padding(2);
    writeln!(writer, "Node\tCapacity\tDemand\tPrice\tStatus")?;
    for node in &summary.nodes {
        let status = if node.shortfall.value() > 0.0 {
            format!("{} ({} short)", node.status.as_str(), node.shortfall)
        } else {
            node.status.as_str().to_string()
        };
        writeln!(
            writer,
            "{}\t{}\t{}\t{:.2}\t{status}",
            node.node_id, node.capacity, node.demand, node.price
        )?;
    }
    writer.flush()?;
    print!("{}", String::from_utf8(writer.into_inner()?)?);

    if let Some(stats) = summary.prices {
        println!(
            "Prices: average {:.2}, max {:.2}, min {:.2}, spread {:.2}",
            stats.average, stats.max, stats.min, stats.spread
        );
    }
    Ok(())
}

fn describe(outcome: &NodeOutcome) -> String {
    match outcome {
        NodeOutcome::NoGenerators => "no local generation".to_string(),
        NodeOutcome::Marginal { generator_id } => generator_id.clone(),
        NodeOutcome::Shortage { unserved } => format!("shortage ({unserved} unserved)"),
        NodeOutcome::NoSupply => "no offers".to_string(),
        NodeOutcome::Idle => "idle".to_string(),
    }
}
