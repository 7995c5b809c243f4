//! Economic dispatch LP built from a network and its offers.
//!
//! Variables are generator outputs: one per bid segment for segmented offers,
//! one per generator otherwise. The problem is
//!
//! ```text
//! minimise    c · x
//! subject to  A_eq x  = b_eq     (one balance row per node)
//!             A_ub x <= b_ub     (optional line rows)
//!             lo <= x <= hi
//! ```
//!
//! Node balance only sees generators at the node itself, so a node without
//! local supply but with demand makes the LP infeasible. The solver result is
//! informational; prices come from the merit order.
//!
//! The optional line rows are a coarse stand-in for a PTDF: every variable of a
//! generator at the line's from-node gets +1 and at the to-node -1, and the row
//! is bounded in both directions by the thermal limit.

use crate::config::ClearingConfig;
use crate::offer::{GeneratorOffer, UnitOffer};
use gridclear_core::{Diagnostics, Megawatts, Network};
use serde::Serialize;
use tracing::{debug, warn};

/// What an LP column stands for
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VariableRole {
    /// Output of `generator_id` within segment `segment`
    Segment { generator_id: String, segment: usize },
    /// Whole output of an unsegmented generator
    Unit { generator_id: String },
    /// Keeps the problem non-empty when there are no generators
    Placeholder,
}

/// Dense LP in standard inequality form
#[derive(Debug, Clone, Default, Serialize)]
pub struct LpProblem {
    pub objective: Vec<f64>,
    pub a_eq: Vec<Vec<f64>>,
    pub b_eq: Vec<f64>,
    pub a_ub: Vec<Vec<f64>>,
    pub b_ub: Vec<f64>,
    pub bounds: Vec<(f64, f64)>,
    pub variables: Vec<VariableRole>,
    /// Node id for each equality row
    pub balance_nodes: Vec<String>,
}

impl LpProblem {
    pub fn num_variables(&self) -> usize {
        self.objective.len()
    }

    /// Sum of finite upper bounds
    pub fn upper_capacity(&self) -> f64 {
        self.bounds
            .iter()
            .map(|&(_, hi)| hi)
            .filter(|hi| hi.is_finite())
            .sum()
    }

    /// Column indices of the variables that belong to `generator_id`
    pub fn columns_of<'a>(&'a self, generator_id: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.variables
            .iter()
            .enumerate()
            .filter(move |(_, role)| match role {
                VariableRole::Segment { generator_id: g, .. } | VariableRole::Unit { generator_id: g } => {
                    g == generator_id
                }
                VariableRole::Placeholder => false,
            })
            .map(|(col, _)| col)
    }
}

/// Build the dispatch LP.
///
/// Capacity shortfalls are reported as warnings on `diag` and never fail.
pub fn formulate(
    network: &Network,
    offers: &[UnitOffer<'_>],
    config: &ClearingConfig,
    diag: &mut Diagnostics,
) -> LpProblem {
    let mut problem = LpProblem::default();
    // Column range of each offer, aligned with `offers`
    let mut columns: Vec<(usize, usize)> = Vec::with_capacity(offers.len());

    for unit in offers {
        let first = problem.objective.len();
        let generator_id = unit.generator.id.clone();
        match &unit.offer {
            GeneratorOffer::Segmented(segments) => {
                for (segment, bid) in segments.iter().enumerate() {
                    problem.objective.push(bid.price);
                    problem.bounds.push((0.0, bid.capacity().value()));
                    problem.variables.push(VariableRole::Segment {
                        generator_id: generator_id.clone(),
                        segment,
                    });
                }
            }
            GeneratorOffer::Unsegmented { min, max, cost } => {
                problem.objective.push(*cost);
                problem.bounds.push((min.value(), max.value()));
                problem.variables.push(VariableRole::Unit { generator_id });
            }
        }
        columns.push((first, problem.objective.len()));
    }

    if problem.objective.is_empty() {
        problem.objective.push(0.0);
        problem.bounds.push((0.0, 0.0));
        problem.variables.push(VariableRole::Placeholder);
    }

    let n_vars = problem.objective.len();

    for node in network.nodes() {
        let mut row = vec![0.0; n_vars];
        for (unit, &(first, last)) in offers.iter().zip(&columns) {
            if unit.generator.node_id == node.id {
                row[first..last].iter_mut().for_each(|c| *c = 1.0);
            }
        }
        problem.a_eq.push(row);
        problem.b_eq.push(network.demand_at_node(&node.id).value());
        problem.balance_nodes.push(node.id.clone());
    }

    let capacity = problem.upper_capacity();
    let demand = network.total_demand();
    if capacity < config.shortfall_warning_ratio * demand.value() {
        let message = format!(
            "Offered capacity {} is below {:.0}% of total demand {}",
            Megawatts(capacity),
            config.shortfall_warning_ratio * 100.0,
            demand
        );
        warn!("{}", message);
        diag.add_warning("capacity", &message);
    }

    if config.line_limits {
        add_line_rows(network, offers, &columns, &mut problem);
    }

    debug!(
        variables = n_vars,
        balance_rows = problem.a_eq.len(),
        line_rows = problem.a_ub.len(),
        "formulated dispatch LP"
    );
    problem
}

fn add_line_rows(
    network: &Network,
    offers: &[UnitOffer<'_>],
    columns: &[(usize, usize)],
    problem: &mut LpProblem,
) {
    let n_vars = problem.objective.len();
    for line in network.active_lines() {
        let mut row = vec![0.0; n_vars];
        for (unit, &(first, last)) in offers.iter().zip(columns) {
            let coeff = if unit.generator.node_id == line.from_node {
                1.0
            } else if unit.generator.node_id == line.to_node {
                -1.0
            } else {
                continue;
            };
            row[first..last].iter_mut().for_each(|c| *c += coeff);
        }
        let limit = line.thermal_limit.value();
        let negated = row.iter().map(|c| -c).collect();
        problem.a_ub.push(row);
        problem.b_ub.push(limit);
        problem.a_ub.push(negated);
        problem.b_ub.push(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offer::collect_offers;
    use gridclear_core::{BidMap, BidSegment, Generator, GeneratorKind, Load, Node, TransmissionLine};

    fn two_node() -> Network {
        let mut network = Network::new("two-node");
        network.add_node(Node::new("N1", "Bus 1"));
        network.add_node(Node::new("N2", "Bus 2"));
        network.add_generator(
            Generator::new("G1", "N1", GeneratorKind::Thermal)
                .with_limits(5.0, 100.0)
                .with_marginal_cost(30.0),
        );
        network.add_generator(
            Generator::new("G2", "N2", GeneratorKind::Thermal)
                .with_limits(0.0, 200.0)
                .with_marginal_cost(50.0),
        );
        network.add_load(Load::new("L1", "N1", 80.0));
        network.add_load(Load::new("L2", "N2", 150.0));
        network.add_line(TransmissionLine::new("L12", "N1", "N2", 0.1, 60.0));
        network
    }

    #[test]
    fn unsegmented_offers_use_limits_and_cost() {
        let network = two_node();
        let offers = collect_offers(&network, None);
        let mut diag = Diagnostics::new();
        let lp = formulate(&network, &offers, &ClearingConfig::default(), &mut diag);

        assert_eq!(lp.objective, vec![30.0, 50.0]);
        assert_eq!(lp.bounds, vec![(5.0, 100.0), (0.0, 200.0)]);
        assert_eq!(lp.a_eq, vec![vec![1.0, 0.0], vec![0.0, 1.0]]);
        assert_eq!(lp.b_eq, vec![80.0, 150.0]);
        assert_eq!(lp.balance_nodes, vec!["N1", "N2"]);
        assert!(lp.a_ub.is_empty());
        assert!(!diag.has_warnings());
    }

    #[test]
    fn segments_become_columns() {
        let network = two_node();
        let mut bids = BidMap::new();
        bids.insert(
            "G2".into(),
            vec![
                BidSegment::new(0.0, 60.0, 40.0),
                BidSegment::new(60.0, 140.0, 45.0),
                BidSegment::new(140.0, 200.0, 70.0),
            ],
        );
        let offers = collect_offers(&network, Some(&bids));
        let lp = formulate(&network, &offers, &ClearingConfig::default(), &mut Diagnostics::new());

        assert_eq!(lp.num_variables(), 4);
        assert_eq!(lp.objective, vec![30.0, 40.0, 45.0, 70.0]);
        assert_eq!(lp.bounds[1..], [(0.0, 60.0), (0.0, 80.0), (0.0, 60.0)]);
        assert_eq!(lp.a_eq[1], vec![0.0, 1.0, 1.0, 1.0]);
        assert_eq!(lp.columns_of("G2").collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn no_generators_gets_placeholder() {
        let mut network = Network::new("empty");
        network.add_node(Node::new("N1", "Bus 1"));
        network.add_load(Load::new("L1", "N1", 10.0));
        let lp = formulate(&network, &[], &ClearingConfig::default(), &mut Diagnostics::new());

        assert_eq!(lp.objective, vec![0.0]);
        assert_eq!(lp.bounds, vec![(0.0, 0.0)]);
        assert_eq!(lp.variables, vec![VariableRole::Placeholder]);
        assert_eq!(lp.a_eq, vec![vec![0.0]]);
    }

    #[test]
    fn shortfall_warns() {
        let mut network = two_node();
        network.add_load(Load::new("L3", "N2", 200.0));
        let offers = collect_offers(&network, None);
        let mut diag = Diagnostics::new();
        formulate(&network, &offers, &ClearingConfig::default(), &mut diag);
        assert_eq!(diag.issues_by_category("capacity").count(), 1);
    }

    #[test]
    fn line_rows_span_every_segment() {
        let network = two_node();
        let mut bids = BidMap::new();
        bids.insert(
            "G1".into(),
            vec![BidSegment::new(0.0, 50.0, 20.0), BidSegment::new(50.0, 100.0, 35.0)],
        );
        let config = ClearingConfig {
            line_limits: true,
            ..ClearingConfig::default()
        };
        let offers = collect_offers(&network, Some(&bids));
        let lp = formulate(&network, &offers, &config, &mut Diagnostics::new());

        assert_eq!(lp.a_ub, vec![vec![1.0, 1.0, -1.0], vec![-1.0, -1.0, 1.0]]);
        assert_eq!(lp.b_ub, vec![60.0, 60.0]);
    }
}
