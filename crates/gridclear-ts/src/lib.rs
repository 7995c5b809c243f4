//! # gridclear-ts: Day-Ahead Time Series
//!
//! Extends single-period clearing to a 24-hour trading day. Generator
//! availability, offers and demand vary by hour according to a
//! [`DailyProfile`]:
//!
//! - Loads scale by the hour's load factor.
//! - Wind and solar availability scale by their renewable factor and are
//!   offered at zero.
//! - Thermal and hydro units offer three fixed steps above marginal cost.
//!
//! ```no_run
//! use gridclear_algo::{ClearingConfig, ClearingEngine};
//! use gridclear_core::samples::balanced_five_bus;
//! use gridclear_ts::{run_time_series_clearing, summarize, DayAheadMarketData};
//!
//! let data = DayAheadMarketData::from_network(&balanced_five_bus())?;
//! let engine = ClearingEngine::new(ClearingConfig::default())?;
//! let hourly = run_time_series_clearing(&data, &engine)?;
//! println!("system average {:.2}", summarize(&hourly).system_average);
//! # Ok::<(), gridclear_algo::ClearingError>(())
//! ```

pub mod export;
pub mod market;
pub mod orchestrator;
pub mod profile;
pub mod series;
pub mod summary;

pub use export::{price_records, write_prices_csv, write_prices_csv_path, PriceRecord};
pub use market::DayAheadMarketData;
pub use orchestrator::{clear_hour, run_day_ahead, run_time_series_clearing, DayAheadResult};
pub use profile::{DailyProfile, ProfileRow, HOURS_PER_DAY};
pub use series::{standard_segments, GeneratorTimeSeries, LoadTimeSeries, TimeSlot};
pub use summary::{summarize, DailySummary, NodeDailySummary};
