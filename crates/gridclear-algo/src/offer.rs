use gridclear_core::{BidMap, BidSegment, Generator, Megawatts, Network};
use serde::Serialize;

/// How a generator participates in clearing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GeneratorOffer {
    /// Stepped offer curve, one LP variable per segment
    Segmented(Vec<BidSegment>),
    /// Single tranche at marginal cost between the generator's limits
    Unsegmented {
        min: Megawatts,
        max: Megawatts,
        cost: f64,
    },
}

impl GeneratorOffer {
    /// Segmented when the map holds a non-empty curve for the generator.
    pub fn for_generator(generator: &Generator, bids: Option<&BidMap>) -> Self {
        match bids.and_then(|map| map.get(&generator.id)) {
            Some(segments) if !segments.is_empty() => GeneratorOffer::Segmented(segments.clone()),
            _ => GeneratorOffer::Unsegmented {
                min: generator.min_power,
                max: generator.max_power,
                cost: generator.marginal_cost,
            },
        }
    }

    pub fn variable_count(&self) -> usize {
        match self {
            GeneratorOffer::Segmented(segments) => segments.len(),
            GeneratorOffer::Unsegmented { .. } => 1,
        }
    }

    /// Largest output the offer allows
    pub fn upper_capacity(&self) -> Megawatts {
        match self {
            GeneratorOffer::Segmented(segments) => segments.iter().map(|s| s.capacity()).sum(),
            GeneratorOffer::Unsegmented { max, .. } => *max,
        }
    }
}

/// A generator paired with its resolved offer
#[derive(Debug, Clone)]
pub struct UnitOffer<'a> {
    pub generator: &'a Generator,
    pub offer: GeneratorOffer,
}

/// Resolve offers for every generator, in network order.
pub fn collect_offers<'a>(network: &'a Network, bids: Option<&BidMap>) -> Vec<UnitOffer<'a>> {
    network
        .generators()
        .iter()
        .map(|generator| UnitOffer {
            generator,
            offer: GeneratorOffer::for_generator(generator, bids),
        })
        .collect()
}
