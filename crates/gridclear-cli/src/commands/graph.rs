use std::fs;

use anyhow::{Context, Result};
use gridclear_cli::GraphCommands;
use gridclear_core::graph_utils;

use super::load_source;

pub fn handle(command: &GraphCommands) -> Result<()> {
    match command {
        GraphCommands::Stats { source } => {
            let (network, _) = load_source(source)?;
            let stats = graph_utils::graph_stats(&network);
            println!("Graph statistics for {}:", network.name);
            println!("  Nodes         : {}", stats.node_count);
            println!("  Edges         : {}", stats.edge_count);
            println!("  Components    : {}", stats.connected_components);
            println!(
                "  Degree [min/avg/max]: {}/{:.2}/{}",
                stats.min_degree, stats.avg_degree, stats.max_degree
            );
            Ok(())
        }
        GraphCommands::Islands { source } => {
            let (network, _) = load_source(source)?;
            let analysis = graph_utils::find_islands(&network);
            for island in &analysis.islands {
                println!(
                    "Island {}: {} node(s): {}",
                    island.island_id,
                    island.node_ids.len(),
                    island.node_ids.join(", ")
                );
            }
            Ok(())
        }
        GraphCommands::Export {
            source,
            format,
            out,
        } => {
            let (network, _) = load_source(source)?;
            let dot = graph_utils::export_graph(&network, format)?;
            if let Some(path) = out {
                fs::write(path, &dot).with_context(|| format!("writing {}", path.display()))?;
                println!("Graph exported to {}", path.display());
            } else {
                println!("{dot}");
            }
            Ok(())
        }
    }
}
