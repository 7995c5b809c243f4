//! # gridclear-algo: Nodal Price Clearing
//!
//! Computes a clearing price for every node of a [`gridclear_core::Network`].
//!
//! ## Pipeline
//!
//! | Stage | Module | Effect on prices |
//! |-------|--------|------------------|
//! | Validation | `gridclear_core::validation` | Aborts on structural errors |
//! | Formulation | [`formulation`] | Builds the dispatch LP |
//! | Solve | [`solver`] | Informational only; failures become diagnostics |
//! | Merit order | [`merit_order`] | Sets each node's price from local offers |
//! | Congestion | [`congestion`] | Narrows price gaps across lines |
//! | Summary | [`summary`] | None; reports supply status and price spread |
//!
//! The LP never sets prices: the merit order is authoritative whether or not
//! the solver succeeds. Dual values are not extracted.
//!
//! ## Example
//!
//! ```no_run
//! use gridclear_algo::{ClearingConfig, ClearingEngine};
//! use gridclear_core::samples::sample_three_bus;
//!
//! let engine = ClearingEngine::new(ClearingConfig::default())?;
//! let report = engine.clear(&sample_three_bus(), None)?;
//! for (node, price) in &report.prices {
//!     println!("{node}: {price:.2}");
//! }
//! # Ok::<(), gridclear_algo::ClearingError>(())
//! ```

pub mod clearing;
pub mod config;
pub mod congestion;
pub mod error;
pub mod formulation;
pub mod merit_order;
pub mod offer;
pub mod solver;
pub mod summary;

pub use clearing::{run_clearing, ClearingEngine, ClearingReport, SolverSummary};
pub use config::{ClearingConfig, CongestionPolicy, PricingPolicy};
pub use congestion::{apply_congestion, CongestionAdjustment};
pub use error::{ClearingError, ClearingResult};
pub use formulation::{formulate, LpProblem, VariableRole};
pub use merit_order::{LocalMarket, NodeClearing, NodeOutcome, Tranche};
pub use offer::{collect_offers, GeneratorOffer, UnitOffer};
pub use solver::{GoodLpBackend, LpBackend, LpOutcome, LpSolverKind};
pub use summary::{summarize_clearing, MarketSummary, NodeSupply, PriceStats, SupplyStatus};
