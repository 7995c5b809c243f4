//! Offer curves and price result maps.

use crate::units::Megawatts;
use crate::{GridError, GridResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One price/quantity tranche of a generator's offer curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BidSegment {
    pub start_power: Megawatts,
    pub end_power: Megawatts,
    /// Offer price (currency/MWh)
    pub price: f64,
}

impl BidSegment {
    pub fn new(start_power: f64, end_power: f64, price: f64) -> Self {
        Self {
            start_power: Megawatts(start_power),
            end_power: Megawatts(end_power),
            price,
        }
    }

    /// Width of the tranche
    pub fn capacity(&self) -> Megawatts {
        self.end_power - self.start_power
    }

    /// Reject segments whose end lies before their start.
    pub fn check(&self) -> GridResult<()> {
        if !self.price.is_finite() {
            return Err(GridError::Validation(format!(
                "Bid segment {}-{} has non-finite price",
                self.start_power, self.end_power
            )));
        }
        if !self.start_power.is_finite() || !self.end_power.is_finite() {
            return Err(GridError::Validation(
                "Bid segment has non-finite breakpoints".to_string(),
            ));
        }
        if self.end_power < self.start_power {
            return Err(GridError::Validation(format!(
                "Bid segment end {} is below start {}",
                self.end_power, self.start_power
            )));
        }
        Ok(())
    }
}

/// Generator id -> offer curve
pub type BidMap = BTreeMap<String, Vec<BidSegment>>;

/// Node id -> clearing price
pub type NodePrices = BTreeMap<String, f64>;

/// Hour (0-23) -> node prices
pub type HourlyPrices = BTreeMap<usize, NodePrices>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_capacity_is_width() {
        let seg = BidSegment::new(30.0, 70.0, 50.0);
        assert_eq!(seg.capacity(), Megawatts(40.0));
        assert!(seg.check().is_ok());
    }

    #[test]
    fn zero_width_segment_is_valid() {
        let seg = BidSegment::new(10.0, 10.0, 5.0);
        assert_eq!(seg.capacity(), Megawatts::ZERO);
        assert!(seg.check().is_ok());
    }

    #[test]
    fn reversed_segment_rejected() {
        let err = BidSegment::new(70.0, 30.0, 50.0).check().unwrap_err();
        assert!(matches!(err, GridError::Validation(_)));
    }
}
