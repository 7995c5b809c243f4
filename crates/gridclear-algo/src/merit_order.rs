//! Node-local merit-order pricing.
//!
//! Each node clears on its own generators only: tranches are stacked cheapest
//! first and the price is set by the tranche that covers local demand. Nodes
//! never pool supply here; transmission effects enter afterwards through the
//! congestion pass.

use crate::config::PricingPolicy;
use crate::offer::{GeneratorOffer, UnitOffer};
use gridclear_core::{Megawatts, Network};
use serde::Serialize;

/// Slack when comparing cumulative capacity with demand
pub const CAPACITY_TOLERANCE_MW: f64 = 1e-9;

/// One step of a local supply curve
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tranche {
    pub generator_id: String,
    pub price: f64,
    pub capacity: Megawatts,
}

/// How a node's price was determined
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum NodeOutcome {
    /// No generator is located at the node
    NoGenerators,
    /// Demand met; `generator_id` offers the marginal tranche
    Marginal { generator_id: String },
    /// Local offers cannot cover demand
    Shortage { unserved: Megawatts },
    /// Generators present but nothing offered against positive demand
    NoSupply,
    /// Generators present, nothing offered, no demand
    Idle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeClearing {
    pub price: f64,
    #[serde(flatten)]
    pub outcome: NodeOutcome,
}

/// Supply and demand at a single node
#[derive(Debug, Clone, Default)]
pub struct LocalMarket {
    pub generator_count: usize,
    /// Tranches in enumeration order (generator order, then segment order)
    pub tranches: Vec<Tranche>,
    pub demand: Megawatts,
}

impl LocalMarket {
    /// Gather the node's tranches from the resolved offers.
    ///
    /// An unsegmented generator contributes a single tranche whose size is
    /// capped at local demand.
    pub fn build(network: &Network, offers: &[UnitOffer<'_>], node_id: &str) -> Self {
        let demand = network.demand_at_node(node_id);
        let mut market = LocalMarket {
            demand,
            ..LocalMarket::default()
        };
        for unit in offers.iter().filter(|u| u.generator.node_id == node_id) {
            market.generator_count += 1;
            let generator_id = &unit.generator.id;
            match &unit.offer {
                GeneratorOffer::Segmented(segments) => {
                    market.tranches.extend(segments.iter().map(|seg| Tranche {
                        generator_id: generator_id.clone(),
                        price: seg.price,
                        capacity: seg.capacity(),
                    }));
                }
                GeneratorOffer::Unsegmented { max, cost, .. } => market.tranches.push(Tranche {
                    generator_id: generator_id.clone(),
                    price: *cost,
                    capacity: (*max).min(demand),
                }),
            }
        }
        market
    }

    /// Clear the node. Pure in (tranches, demand, policy).
    pub fn clear(&self, policy: &PricingPolicy) -> NodeClearing {
        if self.generator_count == 0 {
            return NodeClearing {
                price: policy.no_generator_price,
                outcome: NodeOutcome::NoGenerators,
            };
        }

        let mut curve: Vec<&Tranche> = self.tranches.iter().collect();
        // sort_by is stable: equal prices keep enumeration order
        curve.sort_by(|a, b| a.price.total_cmp(&b.price));

        let demand = self.demand.value();
        let mut cumulative = 0.0;
        for tranche in &curve {
            cumulative += tranche.capacity.value();
            if cumulative + CAPACITY_TOLERANCE_MW >= demand {
                return NodeClearing {
                    price: tranche.price,
                    outcome: NodeOutcome::Marginal {
                        generator_id: tranche.generator_id.clone(),
                    },
                };
            }
        }

        match curve.last() {
            Some(most_expensive) => NodeClearing {
                price: most_expensive.price + policy.shortage_adder,
                outcome: NodeOutcome::Shortage {
                    unserved: Megawatts(demand - cumulative),
                },
            },
            None if demand > 0.0 => NodeClearing {
                price: policy.no_supply_price,
                outcome: NodeOutcome::NoSupply,
            },
            None => NodeClearing {
                price: policy.base_price,
                outcome: NodeOutcome::Idle,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn market(demand: f64, tranches: &[(&str, f64, f64)]) -> LocalMarket {
        LocalMarket {
            generator_count: tranches.len().max(1),
            tranches: tranches
                .iter()
                .map(|&(id, price, cap)| Tranche {
                    generator_id: id.to_string(),
                    price,
                    capacity: Megawatts(cap),
                })
                .collect(),
            demand: Megawatts(demand),
        }
    }

    #[test]
    fn no_generators_gets_penalty() {
        let node = LocalMarket {
            demand: Megawatts(70.0),
            ..LocalMarket::default()
        };
        let cleared = node.clear(&PricingPolicy::default());
        assert_eq!(cleared.price, 1000.0);
        assert_eq!(cleared.outcome, NodeOutcome::NoGenerators);
    }

    #[test]
    fn marginal_tranche_sets_price() {
        let node = market(120.0, &[("G2", 50.0, 100.0), ("G1", 30.0, 100.0)]);
        let cleared = node.clear(&PricingPolicy::default());
        assert_eq!(cleared.price, 50.0);
        assert_eq!(
            cleared.outcome,
            NodeOutcome::Marginal {
                generator_id: "G2".into()
            }
        );
    }

    #[test]
    fn exact_fit_stays_on_tranche() {
        let node = market(100.0, &[("G1", 30.0, 100.0), ("G2", 50.0, 100.0)]);
        assert_eq!(node.clear(&PricingPolicy::default()).price, 30.0);
    }

    #[test]
    fn equal_prices_keep_enumeration_order() {
        let node = market(10.0, &[("A", 40.0, 50.0), ("B", 40.0, 50.0)]);
        let cleared = node.clear(&PricingPolicy::default());
        assert_eq!(
            cleared.outcome,
            NodeOutcome::Marginal {
                generator_id: "A".into()
            }
        );
    }

    #[test]
    fn shortage_adds_to_highest_offer() {
        let node = market(300.0, &[("G1", 30.0, 100.0), ("G2", 80.0, 50.0)]);
        let cleared = node.clear(&PricingPolicy::default());
        assert_eq!(cleared.price, 580.0);
        assert_eq!(
            cleared.outcome,
            NodeOutcome::Shortage {
                unserved: Megawatts(150.0)
            }
        );
    }

    #[test]
    fn empty_curve_prices() {
        let policy = PricingPolicy::default();
        let mut node = market(25.0, &[]);
        assert_eq!(node.clear(&policy).price, 800.0);
        node.demand = Megawatts::ZERO;
        assert_eq!(node.clear(&policy).price, 500.0);
        assert_eq!(node.clear(&policy).outcome, NodeOutcome::Idle);
    }

    #[test]
    fn price_never_decreases_with_demand() {
        let node = market(0.0, &[("A", 20.0, 40.0), ("B", 35.0, 40.0), ("C", 60.0, 40.0)]);
        let policy = PricingPolicy::default();
        let mut last = f64::MIN;
        for step in 0..=30 {
            let at_step = LocalMarket {
                demand: Megawatts(step as f64 * 5.0),
                ..node.clone()
            };
            let price = at_step.clear(&policy).price;
            assert!(price >= last, "price fell at demand {}", step * 5);
            last = price;
        }
    }
}
