use crate::profile::{check_hour, DailyProfile, HOURS_PER_DAY};
use gridclear_algo::ClearingResult;
use gridclear_core::{BidSegment, Generator, Load, Megawatts};
use serde::Serialize;

/// Breakpoints of the standard three-step thermal/hydro offer, as shares of max output
const SEGMENT_BREAKS: [f64; 4] = [0.0, 0.3, 0.7, 1.0];
/// Mark-up of each step over marginal cost
const SEGMENT_MARKUPS: [f64; 3] = [0.0, 20.0, 50.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSlot {
    pub hour: usize,
    pub load_factor: f64,
    /// Availability factor; 1.0 for dispatchable units
    pub renewable_factor: f64,
}

fn time_slots(profile: &DailyProfile, generator: Option<&Generator>) -> ClearingResult<Vec<TimeSlot>> {
    (0..HOURS_PER_DAY)
        .map(|hour| {
            Ok(TimeSlot {
                hour,
                load_factor: profile.load_factor(hour)?,
                renewable_factor: match generator {
                    Some(gen) => profile.renewable_factor(gen.kind, hour)?,
                    None => 1.0,
                },
            })
        })
        .collect()
}

/// Three-step offer: cost, cost+20 and cost+50 over 30/40/30 % of max output.
pub fn standard_segments(generator: &Generator) -> Vec<BidSegment> {
    let max = generator.max_power.value();
    SEGMENT_BREAKS
        .windows(2)
        .zip(SEGMENT_MARKUPS)
        .map(|(bounds, markup)| {
            BidSegment::new(bounds[0] * max, bounds[1] * max, generator.marginal_cost + markup)
        })
        .collect()
}

/// Hourly availability and offers of one generator
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorTimeSeries {
    pub generator_id: String,
    pub time_slots: Vec<TimeSlot>,
    /// Stored offers, one entry per hour; each entry is empty for renewables
    pub bid_segments: Vec<Vec<BidSegment>>,
    pub base: Generator,
}

impl GeneratorTimeSeries {
    pub fn build(generator: &Generator, profile: &DailyProfile) -> ClearingResult<Self> {
        let bid_segments = if generator.kind.is_renewable() {
            vec![Vec::new(); HOURS_PER_DAY]
        } else {
            vec![standard_segments(generator); HOURS_PER_DAY]
        };
        Ok(Self {
            generator_id: generator.id.clone(),
            time_slots: time_slots(profile, Some(generator))?,
            bid_segments,
            base: generator.clone(),
        })
    }

    /// `max_power × renewable_factor` for wind and solar, `max_power` otherwise
    pub fn available_capacity(&self, hour: usize) -> ClearingResult<Megawatts> {
        check_hour(hour)?;
        if self.base.kind.is_renewable() {
            Ok(self.base.max_power * self.time_slots[hour].renewable_factor)
        } else {
            Ok(self.base.max_power)
        }
    }

    /// Offers for the hour. Renewables offer their whole availability at zero.
    pub fn bids_at(&self, hour: usize) -> ClearingResult<Vec<BidSegment>> {
        check_hour(hour)?;
        if self.base.kind.is_renewable() {
            let capacity = self.available_capacity(hour)?;
            return Ok(vec![BidSegment::new(0.0, capacity.value(), 0.0)]);
        }
        Ok(self.bid_segments.get(hour).cloned().unwrap_or_default())
    }
}

/// Hourly demand of one load
#[derive(Debug, Clone, Serialize)]
pub struct LoadTimeSeries {
    pub load_id: String,
    pub time_slots: Vec<TimeSlot>,
    pub base: Load,
}

impl LoadTimeSeries {
    pub fn build(load: &Load, profile: &DailyProfile) -> ClearingResult<Self> {
        Ok(Self {
            load_id: load.id.clone(),
            time_slots: time_slots(profile, None)?,
            base: load.clone(),
        })
    }

    pub fn demand_at(&self, hour: usize) -> ClearingResult<Megawatts> {
        check_hour(hour)?;
        Ok(self.base.demand * self.time_slots[hour].load_factor)
    }
}
