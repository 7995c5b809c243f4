use crate::{GridError, GridResult, Network};
use petgraph::algo::connected_components;
use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::EdgeRef;
use std::collections::{HashMap, HashSet, VecDeque};

/// Undirected graph over the network's nodes and active lines.
///
/// Graph node weights index into `Network::nodes()`, edge weights into
/// `Network::lines()`. Lines with a dangling endpoint are left out; validation
/// reports them separately.
pub struct Topology {
    pub graph: UnGraph<usize, usize>,
    index: HashMap<String, NodeIndex>,
}

impl Topology {
    pub fn build(network: &Network) -> Self {
        let mut graph = UnGraph::with_capacity(network.nodes().len(), network.lines().len());
        let mut index = HashMap::with_capacity(network.nodes().len());
        for (pos, node) in network.nodes().iter().enumerate() {
            index.insert(node.id.clone(), graph.add_node(pos));
        }
        for (pos, line) in network.lines().iter().enumerate() {
            if !line.active {
                continue;
            }
            if let (Some(&a), Some(&b)) = (index.get(&line.from_node), index.get(&line.to_node)) {
                graph.add_edge(a, b, pos);
            }
        }
        Self { graph, index }
    }

    pub fn node_index(&self, node_id: &str) -> Option<NodeIndex> {
        self.index.get(node_id).copied()
    }
}

/// Summary statistics for `graph stats`
#[derive(Debug)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
    pub connected_components: usize,
    pub min_degree: usize,
    pub avg_degree: f64,
    pub max_degree: usize,
}

#[derive(Debug)]
pub struct IslandSummary {
    pub island_id: usize,
    pub node_ids: Vec<String>,
}

/// Connected components of the active-line graph, in node insertion order.
#[derive(Debug)]
pub struct IslandAnalysis {
    pub islands: Vec<IslandSummary>,
}

impl IslandAnalysis {
    pub fn island_count(&self) -> usize {
        self.islands.len()
    }

    pub fn island_of(&self, node_id: &str) -> Option<usize> {
        self.islands
            .iter()
            .find(|island| island.node_ids.iter().any(|id| id == node_id))
            .map(|island| island.island_id)
    }
}

/// Ids of nodes that share an active line with `node_id`, in line order.
///
/// A node reached over parallel lines is listed once.
pub fn connected_nodes(network: &Network, node_id: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut neighbours = Vec::new();
    for line in network.active_lines() {
        let other = if line.from_node == node_id {
            &line.to_node
        } else if line.to_node == node_id {
            &line.from_node
        } else {
            continue;
        };
        if seen.insert(other.as_str()) {
            neighbours.push(other.clone());
        }
    }
    neighbours
}

pub fn graph_stats(network: &Network) -> GraphStats {
    let topology = Topology::build(network);
    let graph = &topology.graph;
    let node_count = graph.node_count();
    let degrees: Vec<usize> = graph
        .node_indices()
        .map(|n| graph.neighbors(n).count())
        .collect();
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        degrees.iter().sum::<usize>() as f64 / node_count as f64
    };
    GraphStats {
        node_count,
        edge_count: graph.edge_count(),
        connected_components: connected_components(graph),
        min_degree: degrees.iter().copied().min().unwrap_or(0),
        avg_degree,
        max_degree: degrees.iter().copied().max().unwrap_or(0),
    }
}

/// Label connected components with a breadth-first search.
pub fn find_islands(network: &Network) -> IslandAnalysis {
    let topology = Topology::build(network);
    let graph = &topology.graph;
    let mut visited = HashSet::new();
    let mut islands = Vec::new();

    for start in graph.node_indices() {
        if visited.contains(&start) {
            continue;
        }
        let mut queue = VecDeque::from([start]);
        let mut members = Vec::new();
        while let Some(node) = queue.pop_front() {
            if !visited.insert(node) {
                continue;
            }
            members.push(node);
            for neighbour in graph.neighbors(node) {
                if !visited.contains(&neighbour) {
                    queue.push_back(neighbour);
                }
            }
        }
        members.sort_by_key(|n| n.index());
        islands.push(IslandSummary {
            island_id: islands.len(),
            node_ids: members
                .into_iter()
                .map(|n| network.nodes()[graph[n]].id.clone())
                .collect(),
        });
    }

    IslandAnalysis { islands }
}

/// Export the topology for external visualization.
pub fn export_graph(network: &Network, format: &str) -> GridResult<String> {
    match format.to_ascii_lowercase().as_str() {
        "graphviz" | "dot" => Ok(render_dot(network)),
        other => Err(GridError::Config(format!(
            "unsupported graph export format '{other}'"
        ))),
    }
}

fn render_dot(network: &Network) -> String {
    let topology = Topology::build(network);
    let graph = &topology.graph;
    let mut buffer = String::from("graph market_network {\n");
    for node in graph.node_indices() {
        let label = sanitize_label(&network.nodes()[graph[node]].id);
        buffer.push_str(&format!("  n{} [label=\"{}\"];\n", node.index(), label));
    }
    for edge in graph.edge_references() {
        let source = edge.source().index();
        let target = edge.target().index();
        let line = sanitize_label(&network.lines()[*edge.weight()].id);
        buffer.push_str(&format!("  n{source} -- n{target} [label=\"{line}\"];\n"));
    }
    buffer.push('}');
    buffer
}

fn sanitize_label(label: &str) -> String {
    label.replace('"', "\\\"")
}
