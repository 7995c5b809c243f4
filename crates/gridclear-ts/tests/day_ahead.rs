//! 24-hour clearing tests on the balanced five-bus system

use gridclear_algo::{ClearingConfig, ClearingEngine, ClearingError, NodeOutcome};
use gridclear_core::samples::balanced_five_bus;
use gridclear_ts::{
    clear_hour, run_day_ahead, run_time_series_clearing, summarize, DailyProfile,
    DayAheadMarketData, HOURS_PER_DAY,
};

fn engine() -> ClearingEngine {
    ClearingEngine::new(ClearingConfig::default()).unwrap()
}

#[test]
fn every_hour_prices_every_node() {
    let data = DayAheadMarketData::from_network(&balanced_five_bus()).unwrap();
    let hourly = run_time_series_clearing(&data, &engine()).unwrap();

    assert_eq!(hourly.len(), HOURS_PER_DAY);
    for (hour, prices) in &hourly {
        assert!(*hour < HOURS_PER_DAY);
        assert_eq!(prices.len(), 5, "hour {hour}");
        assert!(prices.values().all(|p| *p >= 0.0));
    }
}

#[test]
fn results_are_deterministic_across_thread_counts() {
    let data = DayAheadMarketData::from_network(&balanced_five_bus()).unwrap();
    let engine = engine();
    let first = run_day_ahead(&data, &engine, 1).unwrap().prices();
    let second = run_day_ahead(&data, &engine, 4).unwrap().prices();
    let third = run_time_series_clearing(&data, &engine).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, third);
}

#[test]
fn hourly_merit_order_follows_profile() {
    let data = DayAheadMarketData::from_network(&balanced_five_bus()).unwrap();
    let engine = engine();

    // 03:00, ZH: 72 MW demand fully covered by wind offered at zero
    let night = clear_hour(&data, &engine, 3).unwrap();
    assert_eq!(night.nodes["ZH"].price, 0.0);
    // 03:00, GZ: 108 MW inside the first 120 MW step at 280
    assert_eq!(night.nodes["GZ"].price, 280.0);

    // 12:00, DG: 144 MW; solar ~78 MW at zero, then DG_G2's first step at 310
    let noon = clear_hour(&data, &engine, 12).unwrap();
    assert_eq!(noon.nodes["DG"].price, 310.0);
}

#[test]
fn custom_profile_changes_demand() {
    let mut csv = String::from("hour,load_factor,wind_factor,solar_factor\n");
    for hour in 0..HOURS_PER_DAY {
        csv.push_str(&format!("{hour},2.0,0.0,0.0\n"));
    }
    let profile = DailyProfile::from_csv_reader(csv.as_bytes()).unwrap();
    let data = DayAheadMarketData::with_profile(&balanced_five_bus(), &profile).unwrap();
    let report = clear_hour(&data, &engine(), 0).unwrap();

    // GZ: 360 MW against 400 MW of steps -> third step at 330
    assert_eq!(report.nodes["GZ"].price, 330.0);
    // DG has no wind or solar left: top step plus the shortage premium
    assert_eq!(report.nodes["DG"].price, 860.0);
    assert!(matches!(
        report.nodes["DG"].outcome,
        NodeOutcome::Shortage { .. }
    ));
}

#[test]
fn summary_over_the_day() {
    let data = DayAheadMarketData::from_network(&balanced_five_bus()).unwrap();
    let hourly = run_time_series_clearing(&data, &engine()).unwrap();
    let summary = summarize(&hourly);

    assert_eq!(summary.nodes.len(), 5);
    for node in &summary.nodes {
        assert!(node.min <= node.mean && node.mean <= node.max);
        assert!(node.peak_hour < HOURS_PER_DAY);
    }
    assert_eq!(summary.hourly_system_average.len(), HOURS_PER_DAY);
    let peak = summary.peak_hour.unwrap();
    let off_peak = summary.off_peak_hour.unwrap();
    assert!(summary.hourly_system_average[peak] >= summary.hourly_system_average[off_peak]);
}

#[test]
fn hour_24_is_rejected() {
    let data = DayAheadMarketData::from_network(&balanced_five_bus()).unwrap();
    assert!(matches!(
        clear_hour(&data, &engine(), 24),
        Err(ClearingError::HourOutOfRange(24))
    ));
}
