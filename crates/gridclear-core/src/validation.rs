//! Structural checks run before clearing.
//!
//! Errors make clearing impossible (no nodes, no generators, dangling
//! references, inverted limits). Warnings describe networks that clear but
//! probably not the way the caller intended (islands, demand above capacity).

use crate::graph_utils::find_islands;
use crate::market::BidMap;
use crate::{Diagnostics, GridError, GridResult, Network};

impl Network {
    /// Validate the network, returning collected warnings on success.
    ///
    /// All errors are gathered first; the returned [`GridError::Validation`]
    /// lists them joined by `"; "`.
    pub fn validate(&self) -> GridResult<Diagnostics> {
        let mut diag = Diagnostics::new();
        self.validate_into(&mut diag);
        into_result(diag)
    }

    /// Validate the network together with an offer map.
    pub fn validate_with_bids(&self, bids: &BidMap) -> GridResult<Diagnostics> {
        let mut diag = Diagnostics::new();
        self.validate_into(&mut diag);
        validate_bids(self, bids, &mut diag);
        into_result(diag)
    }

    /// Append every structural finding to `diag` without failing.
    pub fn validate_into(&self, diag: &mut Diagnostics) {
        if self.nodes().is_empty() {
            diag.add_error("structure", "No nodes defined in network");
        }
        if self.generators().is_empty() {
            diag.add_error("structure", "No generators defined in network");
        }
        if self.loads().is_empty() {
            diag.add_warning("structure", "No loads defined in network");
        }

        for gen in self.generators() {
            if !self.contains_node(&gen.node_id) {
                diag.add_error_with_entity(
                    "reference",
                    &format!(
                        "Generator {} connected to non-existent node {}",
                        gen.id, gen.node_id
                    ),
                    &gen.id,
                );
            }
            if !gen.min_power.is_finite() || !gen.max_power.is_finite() {
                diag.add_error_with_entity(
                    "limits",
                    &format!("Generator {} has non-finite output limits", gen.id),
                    &gen.id,
                );
            } else if gen.min_power.value() < 0.0 {
                diag.add_error_with_entity(
                    "limits",
                    &format!("Generator {} has negative minimum output", gen.id),
                    &gen.id,
                );
            } else if gen.min_power > gen.max_power {
                diag.add_error_with_entity(
                    "limits",
                    &format!(
                        "Generator {} minimum output {} exceeds maximum {}",
                        gen.id, gen.min_power, gen.max_power
                    ),
                    &gen.id,
                );
            }
            if !gen.marginal_cost.is_finite() {
                diag.add_error_with_entity(
                    "costs",
                    &format!("Generator {} has non-finite marginal cost", gen.id),
                    &gen.id,
                );
            }
        }

        for load in self.loads() {
            if !self.contains_node(&load.node_id) {
                diag.add_error_with_entity(
                    "reference",
                    &format!(
                        "Load {} connected to non-existent node {}",
                        load.id, load.node_id
                    ),
                    &load.id,
                );
            }
            if !load.demand.is_finite() {
                diag.add_error_with_entity(
                    "limits",
                    &format!("Load {} has non-finite demand", load.id),
                    &load.id,
                );
            } else if load.demand.value() < 0.0 {
                diag.add_warning_with_entity(
                    "limits",
                    &format!("Load {} has negative demand {}", load.id, load.demand),
                    &load.id,
                );
            }
        }

        for line in self.lines() {
            for endpoint in [&line.from_node, &line.to_node] {
                if !self.contains_node(endpoint) {
                    diag.add_error_with_entity(
                        "reference",
                        &format!(
                            "Line {} references non-existent node {}",
                            line.id, endpoint
                        ),
                        &line.id,
                    );
                }
            }
            if line.from_node == line.to_node {
                diag.add_warning_with_entity(
                    "topology",
                    &format!("Line {} connects node {} to itself", line.id, line.from_node),
                    &line.id,
                );
            }
            if line.reactance <= 0.0 {
                diag.add_warning_with_entity(
                    "topology",
                    &format!("Line {} has non-positive reactance", line.id),
                    &line.id,
                );
            }
        }

        let capacity = self.total_capacity();
        let demand = self.total_demand();
        if !self.generators().is_empty() && capacity < demand {
            diag.add_warning(
                "capacity",
                &format!(
                    "Total generation capacity {} is below total demand {}",
                    capacity, demand
                ),
            );
        }

        if !self.nodes().is_empty() {
            let islands = find_islands(self);
            if islands.island_count() > 1 {
                diag.add_warning(
                    "topology",
                    &format!(
                        "Network splits into {} islands over active lines",
                        islands.island_count()
                    ),
                );
            }
        }
    }
}

/// Check an offer map against the network.
///
/// Offers for unknown generators are ignored by clearing, so they only warn.
pub fn validate_bids(network: &Network, bids: &BidMap, diag: &mut Diagnostics) {
    for (gen_id, segments) in bids {
        if network.generator(gen_id).is_none() {
            diag.add_warning_with_entity(
                "bids",
                &format!("Bids supplied for unknown generator {}", gen_id),
                gen_id,
            );
        }
        for segment in segments {
            if let Err(err) = segment.check() {
                diag.add_error_with_entity("bids", &err.to_string(), gen_id);
            }
        }
    }
}

fn into_result(diag: Diagnostics) -> GridResult<Diagnostics> {
    if diag.has_errors() {
        let message = diag
            .errors()
            .map(|issue| issue.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(GridError::Validation(message));
    }
    Ok(diag)
}
