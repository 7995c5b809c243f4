//! Network documents on disk.
//!
//! A document is a flat list of elements plus an optional offer map:
//!
//! ```toml
//! name = "two-bus"
//!
//! [[nodes]]
//! id = "N1"
//! name = "Bus 1"
//!
//! [[generators]]
//! id = "G1"
//! node_id = "N1"
//! type = "thermal"
//! max_power = 100.0
//! marginal_cost = 30.0
//!
//! [[bids.G1]]
//! start_power = 0.0
//! end_power = 100.0
//! price = 30.0
//! ```
//!
//! The format is chosen from the file extension: `.json` is JSON, anything else TOML.

use crate::market::BidMap;
use crate::{Generator, GridError, GridResult, Load, Network, Node, TransmissionLine};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Toml,
    Json,
}

impl DocumentFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Toml,
        }
    }
}

/// Serialized form of a [`Network`] with its offers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub generators: Vec<Generator>,
    #[serde(default)]
    pub loads: Vec<Load>,
    #[serde(default)]
    pub lines: Vec<TransmissionLine>,
    #[serde(default, skip_serializing_if = "BidMap::is_empty")]
    pub bids: BidMap,
}

impl NetworkDocument {
    pub fn from_network(network: &Network, bids: &BidMap) -> Self {
        Self {
            name: network.name.clone(),
            nodes: network.nodes().to_vec(),
            generators: network.generators().to_vec(),
            loads: network.loads().to_vec(),
            lines: network.lines().to_vec(),
            bids: bids.clone(),
        }
    }

    /// Build the network; duplicate ids collapse to the last occurrence.
    pub fn into_parts(self) -> (Network, BidMap) {
        let mut network = Network::new(self.name);
        for node in self.nodes {
            network.add_node(node);
        }
        for gen in self.generators {
            network.add_generator(gen);
        }
        for load in self.loads {
            network.add_load(load);
        }
        for line in self.lines {
            network.add_line(line);
        }
        (network, self.bids)
    }

    pub fn parse(text: &str, format: DocumentFormat) -> GridResult<Self> {
        Ok(match format {
            DocumentFormat::Toml => toml::from_str(text)?,
            DocumentFormat::Json => serde_json::from_str(text)?,
        })
    }

    pub fn render(&self, format: DocumentFormat) -> GridResult<String> {
        Ok(match format {
            DocumentFormat::Toml => toml::to_string_pretty(self)?,
            DocumentFormat::Json => serde_json::to_string_pretty(self)?,
        })
    }
}

/// Read a document from disk.
pub fn load_document(path: &Path) -> GridResult<NetworkDocument> {
    let text = fs::read_to_string(path)?;
    NetworkDocument::parse(&text, DocumentFormat::from_path(path)).map_err(|err| match err {
        GridError::Parse(msg) => GridError::Parse(format!("{}: {}", path.display(), msg)),
        other => other,
    })
}

/// Read a network and its offers from disk.
pub fn load_network(path: &Path) -> GridResult<(Network, BidMap)> {
    Ok(load_document(path)?.into_parts())
}

/// Write a network and its offers, creating parent directories as needed.
pub fn save_network(network: &Network, bids: &BidMap, path: &Path) -> GridResult<()> {
    let document = NetworkDocument::from_network(network, bids);
    let text = document.render(DocumentFormat::from_path(path))?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, text)?;
    Ok(())
}
