//! Single-period market summary: local supply status per node and the spread
//! of cleared prices across the system.

use gridclear_core::{Megawatts, Network, NodePrices};
use serde::Serialize;

/// Local capacity above this multiple of local demand counts as surplus
pub const SURPLUS_RATIO: f64 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SupplyStatus {
    /// Local capacity below local demand
    Shortage,
    Surplus,
    Balanced,
}

impl SupplyStatus {
    pub fn classify(capacity: Megawatts, demand: Megawatts) -> Self {
        if capacity < demand {
            SupplyStatus::Shortage
        } else if capacity.value() > demand.value() * SURPLUS_RATIO {
            SupplyStatus::Surplus
        } else {
            SupplyStatus::Balanced
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SupplyStatus::Shortage => "shortage",
            SupplyStatus::Surplus => "surplus",
            SupplyStatus::Balanced => "balanced",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeSupply {
    pub node_id: String,
    /// Sum of local generator maximum outputs
    pub capacity: Megawatts,
    pub demand: Megawatts,
    pub price: f64,
    pub status: SupplyStatus,
    /// Demand left uncovered by local capacity; zero unless short
    pub shortfall: Megawatts,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceStats {
    pub average: f64,
    pub max: f64,
    pub min: f64,
    /// `max - min`
    pub spread: f64,
}

impl PriceStats {
    /// `None` for an empty price set.
    pub fn from_prices<'a>(prices: impl IntoIterator<Item = &'a f64>) -> Option<Self> {
        let (mut sum, mut count) = (0.0, 0usize);
        let (mut max, mut min) = (f64::NEG_INFINITY, f64::INFINITY);
        for &price in prices {
            sum += price;
            count += 1;
            max = max.max(price);
            min = min.min(price);
        }
        (count > 0).then(|| PriceStats {
            average: sum / count as f64,
            max,
            min,
            spread: max - min,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarketSummary {
    pub total_demand: Megawatts,
    pub total_capacity: Megawatts,
    /// `total_demand / total_capacity`; absent without capacity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub demand_supply_ratio: Option<f64>,
    /// In network node order
    pub nodes: Vec<NodeSupply>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prices: Option<PriceStats>,
}

/// Summarize cleared prices against local supply and demand.
///
/// Nodes missing from `prices` are left out of the node list.
pub fn summarize_clearing(network: &Network, prices: &NodePrices) -> MarketSummary {
    let total_demand = network.total_demand();
    let total_capacity = network.total_capacity();

    let nodes = network
        .nodes()
        .iter()
        .filter_map(|node| {
            let price = *prices.get(&node.id)?;
            let capacity: Megawatts = network
                .generators_at_node(&node.id)
                .map(|g| g.max_power)
                .sum();
            let demand = network.demand_at_node(&node.id);
            Some(NodeSupply {
                node_id: node.id.clone(),
                capacity,
                demand,
                price,
                status: SupplyStatus::classify(capacity, demand),
                shortfall: (demand - capacity).max(Megawatts::ZERO),
            })
        })
        .collect();

    MarketSummary {
        total_demand,
        total_capacity,
        demand_supply_ratio: (total_capacity.value() > 0.0).then(|| total_demand / total_capacity),
        nodes,
        prices: PriceStats::from_prices(prices.values()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridclear_core::samples::sample_three_bus;

    #[test]
    fn classification_thresholds() {
        let mw = Megawatts;
        assert_eq!(SupplyStatus::classify(mw(90.0), mw(100.0)), SupplyStatus::Shortage);
        assert_eq!(SupplyStatus::classify(mw(150.0), mw(100.0)), SupplyStatus::Balanced);
        assert_eq!(SupplyStatus::classify(mw(151.0), mw(100.0)), SupplyStatus::Surplus);
        // a node with generation and no load has surplus
        assert_eq!(SupplyStatus::classify(mw(10.0), Megawatts::ZERO), SupplyStatus::Surplus);
        assert_eq!(SupplyStatus::classify(Megawatts::ZERO, Megawatts::ZERO), SupplyStatus::Balanced);
    }

    #[test]
    fn three_bus_summary() {
        let network = sample_three_bus();
        let prices: NodePrices = [("N1", 280.0), ("N2", 320.0), ("N3", 180.0)]
            .into_iter()
            .map(|(n, p)| (n.to_string(), p))
            .collect();
        let summary = summarize_clearing(&network, &prices);

        assert_eq!(summary.total_demand, Megawatts(700.0));
        assert_eq!(summary.total_capacity, Megawatts(900.0));
        assert!((summary.demand_supply_ratio.unwrap() - 700.0 / 900.0).abs() < 1e-12);

        let statuses: Vec<_> = summary.nodes.iter().map(|n| (n.node_id.as_str(), n.status)).collect();
        assert_eq!(
            statuses,
            vec![
                ("N1", SupplyStatus::Balanced),
                ("N2", SupplyStatus::Balanced),
                ("N3", SupplyStatus::Surplus),
            ]
        );

        let stats = summary.prices.unwrap();
        assert!((stats.average - 260.0).abs() < 1e-9);
        assert_eq!((stats.min, stats.max, stats.spread), (180.0, 320.0, 140.0));
    }

    #[test]
    fn shortage_records_shortfall() {
        let mut network = sample_three_bus();
        network.add_load(gridclear_core::Load::new("L4", "N1", 150.0));
        let prices: NodePrices = [("N1".to_string(), 780.0)].into_iter().collect();
        let summary = summarize_clearing(&network, &prices);

        assert_eq!(summary.nodes.len(), 1);
        assert_eq!(summary.nodes[0].status, SupplyStatus::Shortage);
        assert_eq!(summary.nodes[0].shortfall, Megawatts(100.0));
    }

    #[test]
    fn empty_prices_have_no_stats() {
        assert!(PriceStats::from_prices(std::iter::empty()).is_none());
    }
}
