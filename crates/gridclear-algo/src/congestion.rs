//! Congestion adjustment of nodal prices.
//!
//! A large price gap across a line is read as the line binding. A share of the
//! gap is treated as congestion cost and split between the endpoints, pulling
//! the two prices towards each other. Lines are processed in network order and
//! each one sees the prices left by the previous ones. Thermal limits and flow
//! direction are not consulted.

use crate::config::CongestionPolicy;
use gridclear_core::{Network, NodePrices};
use serde::Serialize;
use tracing::debug;

/// Record of one line's adjustment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CongestionAdjustment {
    pub line_id: String,
    pub from_node: String,
    pub to_node: String,
    pub congestion_cost: f64,
    pub from_before: f64,
    pub from_after: f64,
    pub to_before: f64,
    pub to_after: f64,
}

/// Adjust `prices` in place, returning one record per line that fired.
///
/// The cheaper endpoint rises by half the congestion cost and the dearer one
/// falls by the same amount, but never below the raised price.
pub fn apply_congestion(
    network: &Network,
    prices: &mut NodePrices,
    policy: &CongestionPolicy,
) -> Vec<CongestionAdjustment> {
    let mut adjustments = Vec::new();
    if !policy.enabled {
        return adjustments;
    }

    for line in network.active_lines() {
        let (Some(&from_price), Some(&to_price)) =
            (prices.get(&line.from_node), prices.get(&line.to_node))
        else {
            continue;
        };
        let diff = from_price - to_price;
        if diff.abs() <= policy.threshold {
            continue;
        }

        let congestion_cost = diff.abs() * policy.factor;
        let half = congestion_cost / 2.0;
        let (low, high) = (from_price.min(to_price), from_price.max(to_price));
        let raised = low + half;
        let lowered = (high - half).max(raised);
        let (from_after, to_after) = if diff > 0.0 {
            (lowered, raised)
        } else {
            (raised, lowered)
        };

        prices.insert(line.from_node.clone(), from_after);
        prices.insert(line.to_node.clone(), to_after);
        debug!(
            line = %line.id,
            congestion_cost,
            from = from_after,
            to = to_after,
            "congestion adjustment"
        );
        adjustments.push(CongestionAdjustment {
            line_id: line.id.clone(),
            from_node: line.from_node.clone(),
            to_node: line.to_node.clone(),
            congestion_cost,
            from_before: from_price,
            from_after,
            to_before: to_price,
            to_after,
        });
    }
    adjustments
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridclear_core::{Node, TransmissionLine};

    fn line_network(lines: &[(&str, &str, &str)]) -> Network {
        let mut network = Network::new("lines");
        for id in ["A", "B", "C"] {
            network.add_node(Node::new(id, id));
        }
        for &(id, from, to) in lines {
            network.add_line(TransmissionLine::new(id, from, to, 0.1, 100.0));
        }
        network
    }

    fn prices(values: &[(&str, f64)]) -> NodePrices {
        values.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn gap_is_narrowed_symmetrically() {
        let network = line_network(&[("AB", "A", "B")]);
        let mut p = prices(&[("A", 100.0), ("B", 50.0)]);
        let adjustments = apply_congestion(&network, &mut p, &CongestionPolicy::default());

        assert!((p["A"] - 97.5).abs() < 1e-9);
        assert!((p["B"] - 52.5).abs() < 1e-9);
        assert_eq!(adjustments.len(), 1);
        assert!((adjustments[0].congestion_cost - 5.0).abs() < 1e-9);
    }

    #[test]
    fn direction_does_not_matter() {
        let network = line_network(&[("BA", "B", "A")]);
        let mut p = prices(&[("A", 100.0), ("B", 50.0)]);
        apply_congestion(&network, &mut p, &CongestionPolicy::default());
        assert!((p["A"] - 97.5).abs() < 1e-9);
        assert!((p["B"] - 52.5).abs() < 1e-9);
    }

    #[test]
    fn small_gaps_and_inactive_lines_ignored() {
        let mut network = line_network(&[("AB", "A", "B")]);
        let mut p = prices(&[("A", 60.0), ("B", 50.0)]);
        assert!(apply_congestion(&network, &mut p, &CongestionPolicy::default()).is_empty());
        assert_eq!(p["A"], 60.0);

        network.add_line(TransmissionLine::new("AB", "A", "B", 0.1, 100.0).inactive());
        let mut p = prices(&[("A", 100.0), ("B", 50.0)]);
        assert!(apply_congestion(&network, &mut p, &CongestionPolicy::default()).is_empty());
    }

    #[test]
    fn adjustments_accumulate_in_line_order() {
        let network = line_network(&[("AB", "A", "B"), ("BC", "B", "C")]);
        let mut p = prices(&[("A", 100.0), ("B", 50.0), ("C", 1000.0)]);
        let adjustments = apply_congestion(&network, &mut p, &CongestionPolicy::default());

        assert_eq!(adjustments.len(), 2);
        // BC sees B after AB moved it to 52.5: gap 947.5, cost 94.75
        assert!((adjustments[1].to_before - 1000.0).abs() < 1e-9);
        assert!((p["B"] - (52.5 + 47.375)).abs() < 1e-9);
        assert!((p["C"] - (1000.0 - 47.375)).abs() < 1e-9);
    }

    #[test]
    fn large_factor_never_crosses_prices() {
        let network = line_network(&[("AB", "A", "B")]);
        let policy = CongestionPolicy {
            factor: 1.0,
            ..CongestionPolicy::default()
        };
        let mut p = prices(&[("A", 100.0), ("B", 0.0)]);
        apply_congestion(&network, &mut p, &policy);
        assert!(p["A"] >= p["B"]);
        assert!((p["B"] - 50.0).abs() < 1e-9);
    }

    #[test]
    fn disabled_policy_is_noop() {
        let network = line_network(&[("AB", "A", "B")]);
        let policy = CongestionPolicy {
            enabled: false,
            ..CongestionPolicy::default()
        };
        let mut p = prices(&[("A", 100.0), ("B", 50.0)]);
        assert!(apply_congestion(&network, &mut p, &policy).is_empty());
        assert_eq!(p["A"], 100.0);
    }
}
