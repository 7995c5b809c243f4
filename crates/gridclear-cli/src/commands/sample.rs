use std::path::Path;

use anyhow::{Context, Result};
use gridclear_core::io::{save_network, DocumentFormat, NetworkDocument};
use gridclear_core::samples::{sample_with_bids, SAMPLE_NAMES};

pub fn handle(name: &str, out: Option<&Path>) -> Result<()> {
    let (network, bids) = sample_with_bids(name).with_context(|| {
        format!(
            "unknown sample '{name}' (available: {})",
            SAMPLE_NAMES.join(", ")
        )
    })?;

    match out {
        Some(path) => {
            save_network(&network, &bids, path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Sample '{name}' written to {}", path.display());
        }
        None => {
            let text = NetworkDocument::from_network(&network, &bids).render(DocumentFormat::Toml)?;
            print!("{text}");
        }
    }
    Ok(())
}
