//! Clearing configuration.
//!
//! Every field has a default, so an empty TOML file (or no file at all) yields
//! the standard market rules:
//!
//! ```toml
//! shortfall_warning_ratio = 0.9
//! line_limits = false
//! lp_solver = "clarabel"
//!
//! [pricing]
//! no_generator_price = 1000.0
//! shortage_adder = 500.0
//! no_supply_price = 800.0
//! base_price = 500.0
//!
//! [congestion]
//! enabled = true
//! threshold = 10.0
//! factor = 0.1
//! ```

use crate::error::{ClearingError, ClearingResult};
use crate::solver::LpSolverKind;
use gridclear_core::GridError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Administrative prices used when a node cannot clear on its own offers.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingPolicy {
    /// Price at a node with no generators
    #[serde(default = "default_no_generator_price")]
    pub no_generator_price: f64,
    /// Added to the highest offer when local supply falls short
    #[serde(default = "default_shortage_adder")]
    pub shortage_adder: f64,
    /// Price when generators exist but offer nothing and demand is positive
    #[serde(default = "default_no_supply_price")]
    pub no_supply_price: f64,
    /// Price when generators offer nothing and there is no demand
    #[serde(default = "default_base_price")]
    pub base_price: f64,
}

fn default_no_generator_price() -> f64 {
    1000.0
}

fn default_shortage_adder() -> f64 {
    500.0
}

fn default_no_supply_price() -> f64 {
    800.0
}

fn default_base_price() -> f64 {
    500.0
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            no_generator_price: default_no_generator_price(),
            shortage_adder: default_shortage_adder(),
            no_supply_price: default_no_supply_price(),
            base_price: default_base_price(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CongestionPolicy {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Minimum endpoint price gap that triggers an adjustment
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Share of the gap treated as congestion cost
    #[serde(default = "default_factor")]
    pub factor: f64,
}

fn default_true() -> bool {
    true
}

fn default_threshold() -> f64 {
    10.0
}

fn default_factor() -> f64 {
    0.1
}

impl Default for CongestionPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            threshold: default_threshold(),
            factor: default_factor(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClearingConfig {
    #[serde(default)]
    pub pricing: PricingPolicy,
    #[serde(default)]
    pub congestion: CongestionPolicy,
    /// Warn when offered capacity is below this share of demand
    #[serde(default = "default_shortfall_ratio")]
    pub shortfall_warning_ratio: f64,
    /// Add the approximate line-flow rows to the LP
    #[serde(default)]
    pub line_limits: bool,
    #[serde(default = "default_lp_solver")]
    pub lp_solver: String,
}

fn default_shortfall_ratio() -> f64 {
    0.9
}

fn default_lp_solver() -> String {
    LpSolverKind::default().as_str().to_string()
}

impl Default for ClearingConfig {
    fn default() -> Self {
        Self {
            pricing: PricingPolicy::default(),
            congestion: CongestionPolicy::default(),
            shortfall_warning_ratio: default_shortfall_ratio(),
            line_limits: false,
            lp_solver: default_lp_solver(),
        }
    }
}

impl ClearingConfig {
    pub fn from_toml_str(text: &str) -> ClearingResult<Self> {
        let config: ClearingConfig = toml::from_str(text).map_err(GridError::from)?;
        config.check()?;
        Ok(config)
    }

    pub fn from_toml_path(path: &Path) -> ClearingResult<Self> {
        let text = fs::read_to_string(path).map_err(GridError::from)?;
        Self::from_toml_str(&text)
    }

    /// Resolve the configured backend name.
    pub fn solver_kind(&self) -> ClearingResult<LpSolverKind> {
        self.lp_solver.parse()
    }

    /// Reject values that would make prices meaningless.
    pub fn check(&self) -> ClearingResult<()> {
        let p = &self.pricing;
        for (name, value) in [
            ("pricing.no_generator_price", p.no_generator_price),
            ("pricing.shortage_adder", p.shortage_adder),
            ("pricing.no_supply_price", p.no_supply_price),
            ("pricing.base_price", p.base_price),
            ("congestion.threshold", self.congestion.threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(config_error(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&self.congestion.factor) {
            return Err(config_error(format!(
                "congestion.factor must be within [0, 1], got {}",
                self.congestion.factor
            )));
        }
        if !self.shortfall_warning_ratio.is_finite() || self.shortfall_warning_ratio < 0.0 {
            return Err(config_error(format!(
                "shortfall_warning_ratio must be non-negative, got {}",
                self.shortfall_warning_ratio
            )));
        }
        self.solver_kind()?;
        Ok(())
    }
}

fn config_error(message: String) -> ClearingError {
    ClearingError::Grid(GridError::Config(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = ClearingConfig::from_toml_str("").unwrap();
        assert_eq!(config, ClearingConfig::default());
        assert_eq!(config.pricing.no_generator_price, 1000.0);
        assert_eq!(config.pricing.shortage_adder, 500.0);
        assert_eq!(config.pricing.no_supply_price, 800.0);
        assert_eq!(config.pricing.base_price, 500.0);
        assert_eq!(config.congestion.threshold, 10.0);
        assert_eq!(config.congestion.factor, 0.1);
        assert_eq!(config.shortfall_warning_ratio, 0.9);
        assert!(!config.line_limits);
        assert_eq!(config.lp_solver, "clarabel");
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = ClearingConfig::from_toml_str(
            r#"
line_limits = true

[congestion]
threshold = 25.0
"#,
        )
        .unwrap();
        assert!(config.line_limits);
        assert_eq!(config.congestion.threshold, 25.0);
        assert_eq!(config.congestion.factor, 0.1);
        assert!(config.congestion.enabled);
        assert_eq!(config.pricing, PricingPolicy::default());
    }

    #[test]
    fn out_of_range_values_rejected() {
        assert!(ClearingConfig::from_toml_str("[congestion]\nfactor = 1.5\n").is_err());
        assert!(ClearingConfig::from_toml_str("[pricing]\nbase_price = -1.0\n").is_err());
        assert!(ClearingConfig::from_toml_str("lp_solver = \"simplex9000\"\n").is_err());
    }

    #[test]
    fn loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clearing.toml");
        fs::write(&path, "[pricing]\nno_generator_price = 2000.0\n").unwrap();
        let config = ClearingConfig::from_toml_path(&path).unwrap();
        assert_eq!(config.pricing.no_generator_price, 2000.0);
    }
}
