//! Single-period clearing pipeline.
//!
//! validate -> formulate -> solve (informational) -> merit order -> congestion

use crate::config::ClearingConfig;
use crate::congestion::{apply_congestion, CongestionAdjustment};
use crate::error::ClearingResult;
use crate::formulation::formulate;
use crate::merit_order::{LocalMarket, NodeClearing};
use crate::offer::collect_offers;
use crate::solver::{GoodLpBackend, LpBackend, LpOutcome};
use gridclear_core::{BidMap, Diagnostics, Network, NodePrices};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Solver status as recorded in a report
#[derive(Debug, Clone, Serialize)]
pub struct SolverSummary {
    pub backend: String,
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<f64>,
}

/// Everything a clearing run produced
#[derive(Debug, Clone, Serialize)]
pub struct ClearingReport {
    /// Final nodal prices
    pub prices: NodePrices,
    /// Merit-order result per node, before congestion
    pub nodes: BTreeMap<String, NodeClearing>,
    pub solver: SolverSummary,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub congestion: Vec<CongestionAdjustment>,
    pub diagnostics: Diagnostics,
}

impl ClearingReport {
    /// Prices before the congestion pass
    pub fn merit_order_prices(&self) -> NodePrices {
        self.nodes
            .iter()
            .map(|(id, node)| (id.clone(), node.price))
            .collect()
    }
}

pub struct ClearingEngine {
    config: ClearingConfig,
    backend: Box<dyn LpBackend>,
}

impl ClearingEngine {
    /// Engine with the backend named in `config`.
    pub fn new(config: ClearingConfig) -> ClearingResult<Self> {
        config.check()?;
        let backend = GoodLpBackend::new(config.solver_kind()?);
        Ok(Self {
            config,
            backend: Box::new(backend),
        })
    }

    pub fn with_backend(config: ClearingConfig, backend: Box<dyn LpBackend>) -> Self {
        Self { config, backend }
    }

    pub fn config(&self) -> &ClearingConfig {
        &self.config
    }

    /// Clear one period.
    ///
    /// Fails only on structural validation errors. Solver failures end up in
    /// the report's diagnostics.
    pub fn clear(&self, network: &Network, bids: Option<&BidMap>) -> ClearingResult<ClearingReport> {
        let mut diagnostics = match bids {
            Some(bids) => network.validate_with_bids(bids)?,
            None => network.validate()?,
        };
        for issue in diagnostics.warnings() {
            warn!("{}", issue);
        }

        let offers = collect_offers(network, bids);
        let problem = formulate(network, &offers, &self.config, &mut diagnostics);

        let outcome = match self.backend.solve(&problem) {
            Ok(outcome) => outcome,
            Err(err) => LpOutcome::failed(err.to_string()),
        };
        if outcome.success {
            debug!(objective = ?outcome.objective, "dispatch LP solved");
        } else {
            warn!(
                backend = self.backend.id(),
                "dispatch LP failed: {}; using merit-order prices", outcome.message
            );
            diagnostics.add_warning(
                "solver",
                &format!("{} failed: {}", self.backend.id(), outcome.message),
            );
        }

        let mut nodes = BTreeMap::new();
        let mut prices = NodePrices::new();
        for node in network.nodes() {
            let cleared = LocalMarket::build(network, &offers, &node.id).clear(&self.config.pricing);
            prices.insert(node.id.clone(), cleared.price);
            nodes.insert(node.id.clone(), cleared);
        }

        let congestion = apply_congestion(network, &mut prices, &self.config.congestion);
        info!(
            network = %network.name,
            nodes = prices.len(),
            congested_lines = congestion.len(),
            "cleared"
        );

        Ok(ClearingReport {
            prices,
            nodes,
            solver: SolverSummary {
                backend: self.backend.id().to_string(),
                success: outcome.success,
                message: outcome.message,
                objective: outcome.objective,
            },
            congestion,
            diagnostics,
        })
    }

    /// Clear one period and keep only the prices.
    pub fn clear_prices(&self, network: &Network, bids: Option<&BidMap>) -> ClearingResult<NodePrices> {
        Ok(self.clear(network, bids)?.prices)
    }
}

/// Clear with default configuration and the Clarabel backend.
pub fn run_clearing(network: &Network, bids: Option<&BidMap>) -> ClearingResult<NodePrices> {
    ClearingEngine::new(ClearingConfig::default())?.clear_prices(network, bids)
}
