//! 24-hour clearing.
//!
//! Each hour is an independent single-period clearing of the hourly snapshot.
//! With the `parallel` feature the hours run on a rayon pool; results are keyed
//! by hour, so the output does not depend on scheduling.

use crate::market::DayAheadMarketData;
use crate::profile::HOURS_PER_DAY;
use gridclear_algo::{ClearingEngine, ClearingReport, ClearingResult};
use gridclear_core::HourlyPrices;
use std::collections::BTreeMap;
use tracing::{debug, info};

#[cfg(feature = "parallel")]
use gridclear_algo::ClearingError;
#[cfg(feature = "parallel")]
use gridclear_core::GridError;
#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Reports for every hour of the day
#[derive(Debug, Clone)]
pub struct DayAheadResult {
    pub reports: BTreeMap<usize, ClearingReport>,
}

impl DayAheadResult {
    pub fn prices(&self) -> HourlyPrices {
        self.reports
            .iter()
            .map(|(hour, report)| (*hour, report.prices.clone()))
            .collect()
    }

    /// Hours whose LP did not solve
    pub fn solver_failures(&self) -> Vec<usize> {
        self.reports
            .iter()
            .filter(|(_, report)| !report.solver.success)
            .map(|(hour, _)| *hour)
            .collect()
    }
}

/// Clear one hour of the day.
pub fn clear_hour(
    data: &DayAheadMarketData,
    engine: &ClearingEngine,
    hour: usize,
) -> ClearingResult<ClearingReport> {
    let network = data.hourly_network(hour)?;
    let bids = data.hourly_bids(hour)?;
    let report = engine.clear(&network, Some(&bids))?;
    debug!(hour, solver_ok = report.solver.success, "hour cleared");
    Ok(report)
}

/// Clear all 24 hours, keeping the full reports.
///
/// `threads = 0` uses rayon's default pool size. Ignored without the
/// `parallel` feature.
pub fn run_day_ahead(
    data: &DayAheadMarketData,
    engine: &ClearingEngine,
    threads: usize,
) -> ClearingResult<DayAheadResult> {
    info!(
        network = %data.base_network().name,
        generators = data.generator_series().len(),
        loads = data.load_series().len(),
        "starting day-ahead clearing"
    );

    let reports = clear_all_hours(data, engine, threads)?;
    let result = DayAheadResult {
        reports: (0..HOURS_PER_DAY).zip(reports).collect(),
    };

    let failures = result.solver_failures();
    info!(
        hours = HOURS_PER_DAY,
        solver_failures = failures.len(),
        "day-ahead clearing complete"
    );
    Ok(result)
}

/// Clear all 24 hours with default threading and return prices by hour.
pub fn run_time_series_clearing(
    data: &DayAheadMarketData,
    engine: &ClearingEngine,
) -> ClearingResult<HourlyPrices> {
    Ok(run_day_ahead(data, engine, 0)?.prices())
}

#[cfg(feature = "parallel")]
fn clear_all_hours(
    data: &DayAheadMarketData,
    engine: &ClearingEngine,
    threads: usize,
) -> ClearingResult<Vec<ClearingReport>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|err| {
            ClearingError::Grid(GridError::Config(format!(
                "building thread pool for hourly clearing: {err}"
            )))
        })?;
    pool.install(|| {
        (0..HOURS_PER_DAY)
            .into_par_iter()
            .map(|hour| clear_hour(data, engine, hour))
            .collect()
    })
}

#[cfg(not(feature = "parallel"))]
fn clear_all_hours(
    data: &DayAheadMarketData,
    engine: &ClearingEngine,
    _threads: usize,
) -> ClearingResult<Vec<ClearingReport>> {
    (0..HOURS_PER_DAY)
        .map(|hour| clear_hour(data, engine, hour))
        .collect()
}
