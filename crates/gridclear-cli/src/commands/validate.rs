use std::io::Write;

use anyhow::Result;
use gridclear_cli::{NetworkSource, OutputFormat};
use gridclear_core::validation::validate_bids;
use gridclear_core::Diagnostics;
use tabwriter::TabWriter;

use super::{load_source, print_json};

/// Print every finding; fail only when at least one is an error.
pub fn handle(source: &NetworkSource, format: OutputFormat) -> Result<()> {
    let (network, bids) = load_source(source)?;
    let mut diag = Diagnostics::new();
    network.validate_into(&mut diag);
    validate_bids(&network, &bids, &mut diag);

    match format {
        OutputFormat::Json => print_json(&diag)?,
        OutputFormat::Table => {
            println!("{}: {}", network.name, network.stats());
            if diag.has_issues() {
                let mut writer = TabWriter::new(Vec::new()).padding(2);
                writeln!(writer, "Severity\tCategory\tEntity\tMessage")?;
                for issue in &diag.issues {
                    writeln!(
                        writer,
                        "{}\t{}\t{}\t{}",
                        issue.severity,
                        issue.category,
                        issue.entity.as_deref().unwrap_or("-"),
                        issue.message
                    )?;
                }
                writer.flush()?;
                print!("{}", String::from_utf8(writer.into_inner()?)?);
            }
            println!("{}", diag.summary());
        }
    }

    if diag.has_errors() {
        anyhow::bail!("{} failed validation ({})", network.name, diag.summary());
    }
    Ok(())
}
