//! # gridclear-core: Market Network Model
//!
//! Data structures shared by the clearing engine and the day-ahead simulator.
//!
//! ## Design
//!
//! A [`Network`] is a named collection of four element kinds:
//! - **Nodes**: pricing locations (buses)
//! - **Generators**: supply attached to a node, with technology class and marginal cost
//! - **Loads**: demand attached to a node
//! - **Transmission lines**: connections between two nodes
//!
//! Every element carries a string id that is unique within its kind. Elements are
//! stored in insertion order; re-adding an id replaces the element in place. Order
//! matters for the congestion pass, which walks lines in the order they were added.
//!
//! ## Quick Start
//!
//! ```rust
//! use gridclear_core::*;
//!
//! let mut network = Network::new("two-bus");
//! network.add_node(Node::new("N1", "Bus 1"));
//! network.add_node(Node::new("N2", "Bus 2"));
//! network.add_generator(
//!     Generator::new("G1", "N1", GeneratorKind::Thermal)
//!         .with_limits(0.0, 100.0)
//!         .with_marginal_cost(30.0),
//! );
//! network.add_load(Load::new("L1", "N2", 50.0));
//! network.add_line(TransmissionLine::new("L12", "N1", "N2", 0.1, 100.0));
//!
//! assert!(network.validate().is_ok());
//! ```
//!
//! ## Modules
//!
//! - [`diagnostics`] - Warning/error collection
//! - [`graph_utils`] - Topology queries (neighbours, islands, DOT export)
//! - [`io`] - TOML/JSON network documents
//! - [`market`] - Bid segments and price result maps
//! - [`samples`] - Reference networks used by the CLI and tests
//! - [`validation`] - Structural checks run before clearing

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod diagnostics;
pub mod error;
pub mod graph_utils;
pub mod io;
pub mod market;
pub mod samples;
pub mod units;
pub mod validation;

pub use diagnostics::{DiagnosticIssue, Diagnostics, Severity};
pub use error::{GridError, GridResult};
pub use graph_utils::{connected_nodes, find_islands, IslandAnalysis};
pub use market::{BidMap, BidSegment, HourlyPrices, NodePrices};
pub use units::{Kilovolts, Megawatts};

/// Default base voltage for nodes created without one (kV)
pub const DEFAULT_BASE_VOLTAGE_KV: f64 = 220.0;

/// Generation technology class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Thermal,
    Hydro,
    Wind,
    Solar,
}

impl GeneratorKind {
    /// Wind and solar units follow a renewable availability profile and bid at zero.
    pub fn is_renewable(&self) -> bool {
        matches!(self, GeneratorKind::Wind | GeneratorKind::Solar)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GeneratorKind::Thermal => "thermal",
            GeneratorKind::Hydro => "hydro",
            GeneratorKind::Wind => "wind",
            GeneratorKind::Solar => "solar",
        }
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GeneratorKind {
    type Err = GridError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "thermal" => Ok(GeneratorKind::Thermal),
            "hydro" => Ok(GeneratorKind::Hydro),
            "wind" => Ok(GeneratorKind::Wind),
            "solar" | "pv" => Ok(GeneratorKind::Solar),
            other => Err(GridError::Parse(format!("Unknown generator type: {}", other))),
        }
    }
}

/// A pricing location in the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    /// Base voltage
    #[serde(default = "default_base_voltage")]
    pub base_voltage: Kilovolts,
    /// Display coordinates, not used by any computation
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
}

fn default_base_voltage() -> Kilovolts {
    Kilovolts(DEFAULT_BASE_VOLTAGE_KV)
}

impl Node {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            base_voltage: default_base_voltage(),
            x: 0.0,
            y: 0.0,
        }
    }

    pub fn with_base_voltage(mut self, kv: f64) -> Self {
        self.base_voltage = Kilovolts(kv);
        self
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.x = x;
        self.y = y;
        self
    }
}

/// A generating unit offering energy at one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub node_id: String,
    #[serde(rename = "type")]
    pub kind: GeneratorKind,
    /// Minimum output
    #[serde(default)]
    pub min_power: Megawatts,
    /// Maximum output
    pub max_power: Megawatts,
    /// Marginal cost (currency/MWh)
    pub marginal_cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub startup_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shutdown_cost: Option<f64>,
    /// Online flag. Informational: clearing does not make commitment decisions.
    #[serde(default = "default_true")]
    pub online: bool,
}

fn default_true() -> bool {
    true
}

impl Generator {
    /// Create a generator with zero limits and zero cost; chain the `with_*` builders.
    pub fn new(id: impl Into<String>, node_id: impl Into<String>, kind: GeneratorKind) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            node_id: node_id.into(),
            kind,
            min_power: Megawatts::ZERO,
            max_power: Megawatts::ZERO,
            marginal_cost: 0.0,
            startup_cost: None,
            shutdown_cost: None,
            online: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set output limits (in MW)
    pub fn with_limits(mut self, min_power: f64, max_power: f64) -> Self {
        self.min_power = Megawatts(min_power);
        self.max_power = Megawatts(max_power);
        self
    }

    pub fn with_marginal_cost(mut self, cost: f64) -> Self {
        self.marginal_cost = cost;
        self
    }

    pub fn with_commitment_costs(mut self, startup: f64, shutdown: f64) -> Self {
        self.startup_cost = Some(startup);
        self.shutdown_cost = Some(shutdown);
        self
    }

    pub fn offline(mut self) -> Self {
        self.online = false;
        self
    }
}

/// Demand at one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Load {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub node_id: String,
    pub demand: Megawatts,
    /// Price elasticity. Carried through snapshots but not used for pricing.
    #[serde(default)]
    pub price_elasticity: f64,
}

impl Load {
    pub fn new(id: impl Into<String>, node_id: impl Into<String>, demand_mw: f64) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            node_id: node_id.into(),
            demand: Megawatts(demand_mw),
            price_elasticity: 0.0,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_price_elasticity(mut self, elasticity: f64) -> Self {
        self.price_elasticity = elasticity;
        self
    }
}

/// A transmission line between two nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransmissionLine {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub from_node: String,
    pub to_node: String,
    /// Series reactance (per-unit)
    pub reactance: f64,
    /// Thermal transfer limit
    pub thermal_limit: Megawatts,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl TransmissionLine {
    pub fn new(
        id: impl Into<String>,
        from_node: impl Into<String>,
        to_node: impl Into<String>,
        reactance: f64,
        thermal_limit_mw: f64,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            from_node: from_node.into(),
            to_node: to_node.into(),
            reactance,
            thermal_limit: Megawatts(thermal_limit_mw),
            active: true,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// True if the line touches the given node
    pub fn touches(&self, node_id: &str) -> bool {
        self.from_node == node_id || self.to_node == node_id
    }
}

/// Element that is keyed by a unique id within its collection
trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for Node {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Generator {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for Load {
    fn key(&self) -> &str {
        &self.id
    }
}

impl Keyed for TransmissionLine {
    fn key(&self) -> &str {
        &self.id
    }
}

/// Insert or replace by id, keeping the original position on replace
fn upsert<T: Keyed>(items: &mut Vec<T>, item: T) {
    match items.iter_mut().find(|existing| existing.key() == item.key()) {
        Some(slot) => *slot = item,
        None => items.push(item),
    }
}

/// The market network: nodes, generators, loads and lines
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Network {
    pub name: String,
    nodes: Vec<Node>,
    generators: Vec<Generator>,
    loads: Vec<Load>,
    lines: Vec<TransmissionLine>,
}

impl Network {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn add_node(&mut self, node: Node) {
        upsert(&mut self.nodes, node);
    }

    pub fn add_generator(&mut self, generator: Generator) {
        upsert(&mut self.generators, generator);
    }

    pub fn add_load(&mut self, load: Load) {
        upsert(&mut self.loads, load);
    }

    pub fn add_line(&mut self, line: TransmissionLine) {
        upsert(&mut self.lines, line);
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn generators(&self) -> &[Generator] {
        &self.generators
    }

    pub fn loads(&self) -> &[Load] {
        &self.loads
    }

    pub fn lines(&self) -> &[TransmissionLine] {
        &self.lines
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn generator(&self, id: &str) -> Option<&Generator> {
        self.generators.iter().find(|g| g.id == id)
    }

    pub fn load(&self, id: &str) -> Option<&Load> {
        self.loads.iter().find(|l| l.id == id)
    }

    pub fn line(&self, id: &str) -> Option<&TransmissionLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    pub fn generator_mut(&mut self, id: &str) -> Option<&mut Generator> {
        self.generators.iter_mut().find(|g| g.id == id)
    }

    pub fn load_mut(&mut self, id: &str) -> Option<&mut Load> {
        self.loads.iter_mut().find(|l| l.id == id)
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node(id).is_some()
    }

    /// Generators located at a node, in insertion order
    pub fn generators_at_node<'a>(
        &'a self,
        node_id: &'a str,
    ) -> impl Iterator<Item = &'a Generator> + 'a {
        self.generators.iter().filter(move |g| g.node_id == node_id)
    }

    /// Loads located at a node, in insertion order
    pub fn loads_at_node<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a Load> + 'a {
        self.loads.iter().filter(move |l| l.node_id == node_id)
    }

    /// Active lines, in insertion order
    pub fn active_lines(&self) -> impl Iterator<Item = &TransmissionLine> {
        self.lines.iter().filter(|l| l.active)
    }

    /// Neighbours of a node over active lines
    pub fn connected_nodes(&self, node_id: &str) -> Vec<String> {
        graph_utils::connected_nodes(self, node_id)
    }

    /// Sum of demand of all loads at a node
    pub fn demand_at_node(&self, node_id: &str) -> Megawatts {
        self.loads_at_node(node_id).map(|l| l.demand).sum()
    }

    pub fn total_demand(&self) -> Megawatts {
        self.loads.iter().map(|l| l.demand).sum()
    }

    /// Sum of generator maximum outputs
    pub fn total_capacity(&self) -> Megawatts {
        self.generators
            .iter()
            .map(|g| g.max_power)
            .filter(|p| p.is_finite())
            .sum()
    }

    /// Compute basic statistics about the network
    pub fn stats(&self) -> NetworkStats {
        NetworkStats {
            num_nodes: self.nodes.len(),
            num_generators: self.generators.len(),
            num_loads: self.loads.len(),
            num_lines: self.lines.len(),
            num_active_lines: self.active_lines().count(),
            total_demand_mw: self.total_demand().value(),
            total_capacity_mw: self.total_capacity().value(),
        }
    }
}

/// Statistics about a network's size and capacity
#[derive(Debug, Clone, Default, Serialize)]
pub struct NetworkStats {
    pub num_nodes: usize,
    pub num_generators: usize,
    pub num_loads: usize,
    pub num_lines: usize,
    pub num_active_lines: usize,
    pub total_demand_mw: f64,
    pub total_capacity_mw: f64,
}

impl fmt::Display for NetworkStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} nodes, {} lines ({} active), {} generators ({:.0} MW), {} loads ({:.0} MW)",
            self.num_nodes,
            self.num_lines,
            self.num_active_lines,
            self.num_generators,
            self.total_capacity_mw,
            self.num_loads,
            self.total_demand_mw
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn three_bus() -> Network {
        let mut network = Network::new("Test3BusSystem");
        network.add_node(Node::new("N1", "Bus 1").at(0.0, 0.0));
        network.add_node(Node::new("N2", "Bus 2").at(1.0, 0.0));
        network.add_node(Node::new("N3", "Bus 3").at(2.0, 0.0));
        network.add_generator(
            Generator::new("G1", "N1", GeneratorKind::Thermal)
                .with_limits(0.0, 100.0)
                .with_marginal_cost(30.0),
        );
        network.add_generator(
            Generator::new("G2", "N2", GeneratorKind::Thermal)
                .with_limits(0.0, 200.0)
                .with_marginal_cost(50.0),
        );
        network.add_load(Load::new("L1", "N1", 80.0));
        network.add_load(Load::new("L2", "N2", 150.0));
        network.add_load(Load::new("L3", "N3", 70.0));
        network.add_line(TransmissionLine::new("L12", "N1", "N2", 0.1, 100.0));
        network.add_line(TransmissionLine::new("L23", "N2", "N3", 0.1, 100.0));
        network.add_line(TransmissionLine::new("L13", "N1", "N3", 0.15, 80.0));
        network
    }

    #[test]
    fn test_network_creation() {
        let network = three_bus();
        assert_eq!(network.nodes().len(), 3);
        assert_eq!(network.generators().len(), 2);
        assert_eq!(network.loads().len(), 3);
        assert_eq!(network.lines().len(), 3);

        assert!(network.contains_node("N1"));
        assert_eq!(network.generator("G2").map(|g| g.node_id.as_str()), Some("N2"));
        assert_eq!(network.load("L3").map(|l| l.node_id.as_str()), Some("N3"));
    }

    #[test]
    fn test_readding_id_replaces_in_place() {
        let mut network = three_bus();
        network.add_line(TransmissionLine::new("L12", "N1", "N2", 0.2, 50.0).inactive());

        let ids: Vec<&str> = network.lines().iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["L12", "L23", "L13"]);
        let line = network.line("L12").unwrap();
        assert!(!line.active);
        assert_eq!(line.thermal_limit, Megawatts(50.0));
    }

    #[test]
    fn test_elements_at_node() {
        let mut network = three_bus();
        network.add_load(Load::new("L1b", "N1", 20.0));

        assert_eq!(network.generators_at_node("N1").count(), 1);
        assert_eq!(network.generators_at_node("N3").count(), 0);
        assert_eq!(network.loads_at_node("N1").count(), 2);
        assert!((network.demand_at_node("N1").value() - 100.0).abs() < 1e-9);
        assert_eq!(network.demand_at_node("N99"), Megawatts::ZERO);
    }

    #[test]
    fn test_network_stats() {
        let mut network = three_bus();
        network.add_line(TransmissionLine::new("L31", "N3", "N1", 0.1, 10.0).inactive());
        let stats = network.stats();

        assert_eq!(stats.num_nodes, 3);
        assert_eq!(stats.num_generators, 2);
        assert_eq!(stats.num_loads, 3);
        assert_eq!(stats.num_lines, 4);
        assert_eq!(stats.num_active_lines, 3);
        assert!((stats.total_demand_mw - 300.0).abs() < 1e-9);
        assert!((stats.total_capacity_mw - 300.0).abs() < 1e-9);
        assert!(stats.to_string().starts_with("3 nodes, 4 lines (3 active)"));
    }

    #[test]
    fn test_generator_kind_parsing() {
        assert_eq!("Wind".parse::<GeneratorKind>().unwrap(), GeneratorKind::Wind);
        assert_eq!("pv".parse::<GeneratorKind>().unwrap(), GeneratorKind::Solar);
        assert!("nuclear".parse::<GeneratorKind>().is_err());
        assert!(GeneratorKind::Solar.is_renewable());
        assert!(!GeneratorKind::Hydro.is_renewable());
    }

    #[test]
    fn test_builders_default_names_to_ids() {
        let gen = Generator::new("G9", "N1", GeneratorKind::Hydro);
        assert_eq!(gen.name, "G9");
        assert!(gen.online);
        assert_eq!(Node::new("N1", "Bus").base_voltage, Kilovolts(220.0));
    }
}
