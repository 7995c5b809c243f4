//! Day-ahead market data: a base network plus hourly curves.
//!
//! Hourly snapshots are derived on request and never written back, so the
//! base network stays the single source of truth.

use crate::profile::{check_hour, DailyProfile};
use crate::series::{GeneratorTimeSeries, LoadTimeSeries};
use gridclear_algo::ClearingResult;
use gridclear_core::{BidMap, Network};

#[derive(Debug, Clone)]
pub struct DayAheadMarketData {
    network: Network,
    generator_series: Vec<GeneratorTimeSeries>,
    load_series: Vec<LoadTimeSeries>,
}

impl DayAheadMarketData {
    /// Curves from the default calendar profile.
    pub fn from_network(network: &Network) -> ClearingResult<Self> {
        Self::with_profile(network, &DailyProfile::default())
    }

    pub fn with_profile(network: &Network, profile: &DailyProfile) -> ClearingResult<Self> {
        let generator_series = network
            .generators()
            .iter()
            .map(|gen| GeneratorTimeSeries::build(gen, profile))
            .collect::<ClearingResult<Vec<_>>>()?;
        let load_series = network
            .loads()
            .iter()
            .map(|load| LoadTimeSeries::build(load, profile))
            .collect::<ClearingResult<Vec<_>>>()?;
        Ok(Self {
            network: network.clone(),
            generator_series,
            load_series,
        })
    }

    pub fn base_network(&self) -> &Network {
        &self.network
    }

    pub fn generator_series(&self) -> &[GeneratorTimeSeries] {
        &self.generator_series
    }

    pub fn load_series(&self) -> &[LoadTimeSeries] {
        &self.load_series
    }

    /// Snapshot with hourly generator availability and hourly demand.
    ///
    /// A renewable unit whose availability drops below its minimum output has
    /// the minimum lowered to match.
    pub fn hourly_network(&self, hour: usize) -> ClearingResult<Network> {
        check_hour(hour)?;
        let mut snapshot = self.network.clone();
        snapshot.name = format!("{}_H{:02}", self.network.name, hour);

        for series in &self.generator_series {
            let available = series.available_capacity(hour)?;
            if let Some(gen) = snapshot.generator_mut(&series.generator_id) {
                gen.max_power = available;
                gen.min_power = gen.min_power.min(available);
            }
        }
        for series in &self.load_series {
            let demand = series.demand_at(hour)?;
            if let Some(load) = snapshot.load_mut(&series.load_id) {
                load.demand = demand;
            }
        }
        Ok(snapshot)
    }

    /// Offer map for the hour, one entry per generator.
    pub fn hourly_bids(&self, hour: usize) -> ClearingResult<BidMap> {
        check_hour(hour)?;
        self.generator_series
            .iter()
            .map(|series| Ok((series.generator_id.clone(), series.bids_at(hour)?)))
            .collect()
    }
}
