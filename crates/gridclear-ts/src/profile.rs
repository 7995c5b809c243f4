//! Hourly scaling factors for a trading day.
//!
//! The default profile uses fixed calendar bands:
//!
//! | Hours | Load | Wind |
//! |-------|------|------|
//! | 0-5, 22-23 | 0.6 | 0.8 |
//! | 6-9 | 0.95 | 0.4 |
//! | 17-21 | 1.0 | 0.4 |
//! | other | 0.8 | 0.4 |
//!
//! Solar follows a triangle peaking at 13:00, floored at 0.1 and held at 0.1
//! outside 07:00-19:00.
//!
//! A profile can also be read from CSV with header
//! `hour,load_factor,wind_factor,solar_factor` and exactly one row per hour.

use gridclear_algo::{ClearingError, ClearingResult};
use gridclear_core::{GeneratorKind, GridError};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::path::Path;

pub const HOURS_PER_DAY: usize = 24;

/// Fail with [`ClearingError::HourOutOfRange`] unless `hour` is 0-23.
pub fn check_hour(hour: usize) -> ClearingResult<()> {
    if hour >= HOURS_PER_DAY {
        return Err(ClearingError::HourOutOfRange(hour));
    }
    Ok(())
}

/// Calendar load band
pub fn default_load_factor(hour: usize) -> f64 {
    match hour {
        6..=9 => 0.95,
        17..=21 => 1.0,
        0..=5 | 22..=23 => 0.6,
        _ => 0.8,
    }
}

/// Wind blows harder at night
pub fn default_wind_factor(hour: usize) -> f64 {
    match hour {
        0..=5 | 22..=23 => 0.8,
        _ => 0.4,
    }
}

pub fn default_solar_factor(hour: usize) -> f64 {
    if !(7..=19).contains(&hour) {
        return 0.1;
    }
    let distance = (hour as f64 - 13.0).abs();
    (0.2 + 0.7 * (1.0 - distance / 6.0)).max(0.1)
}

/// One CSV row of a profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProfileRow {
    pub hour: usize,
    pub load_factor: f64,
    pub wind_factor: f64,
    pub solar_factor: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyProfile {
    load: [f64; HOURS_PER_DAY],
    wind: [f64; HOURS_PER_DAY],
    solar: [f64; HOURS_PER_DAY],
}

impl Default for DailyProfile {
    fn default() -> Self {
        let mut profile = Self {
            load: [0.0; HOURS_PER_DAY],
            wind: [0.0; HOURS_PER_DAY],
            solar: [0.0; HOURS_PER_DAY],
        };
        for hour in 0..HOURS_PER_DAY {
            profile.load[hour] = default_load_factor(hour);
            profile.wind[hour] = default_wind_factor(hour);
            profile.solar[hour] = default_solar_factor(hour);
        }
        profile
    }
}

impl DailyProfile {
    pub fn load_factor(&self, hour: usize) -> ClearingResult<f64> {
        check_hour(hour)?;
        Ok(self.load[hour])
    }

    /// Availability factor for the technology; 1.0 for dispatchable units.
    pub fn renewable_factor(&self, kind: GeneratorKind, hour: usize) -> ClearingResult<f64> {
        check_hour(hour)?;
        Ok(match kind {
            GeneratorKind::Wind => self.wind[hour],
            GeneratorKind::Solar => self.solar[hour],
            GeneratorKind::Thermal | GeneratorKind::Hydro => 1.0,
        })
    }

    pub fn rows(&self) -> Vec<ProfileRow> {
        (0..HOURS_PER_DAY)
            .map(|hour| ProfileRow {
                hour,
                load_factor: self.load[hour],
                wind_factor: self.wind[hour],
                solar_factor: self.solar[hour],
            })
            .collect()
    }

    /// Build from rows; every hour must appear exactly once.
    pub fn from_rows(rows: &[ProfileRow]) -> ClearingResult<Self> {
        let mut seen = [false; HOURS_PER_DAY];
        let mut profile = Self::default();
        for row in rows {
            check_hour(row.hour)?;
            if seen[row.hour] {
                return Err(parse_error(format!("hour {} appears twice in profile", row.hour)));
            }
            for (name, value) in [
                ("load_factor", row.load_factor),
                ("wind_factor", row.wind_factor),
                ("solar_factor", row.solar_factor),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(parse_error(format!(
                        "{name} for hour {} must be non-negative, got {value}",
                        row.hour
                    )));
                }
            }
            if row.wind_factor > 1.0 || row.solar_factor > 1.0 {
                return Err(parse_error(format!(
                    "renewable factors for hour {} must not exceed 1.0",
                    row.hour
                )));
            }
            seen[row.hour] = true;
            profile.load[row.hour] = row.load_factor;
            profile.wind[row.hour] = row.wind_factor;
            profile.solar[row.hour] = row.solar_factor;
        }
        if let Some(missing) = seen.iter().position(|s| !s) {
            return Err(parse_error(format!("profile has no row for hour {missing}")));
        }
        Ok(profile)
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> ClearingResult<Self> {
        let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
        let rows = rdr
            .deserialize()
            .collect::<Result<Vec<ProfileRow>, _>>()
            .map_err(|err| parse_error(format!("reading profile CSV: {err}")))?;
        Self::from_rows(&rows)
    }

    pub fn from_csv_path(path: &Path) -> ClearingResult<Self> {
        let file = std::fs::File::open(path).map_err(GridError::from)?;
        Self::from_csv_reader(file)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> ClearingResult<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        for row in self.rows() {
            wtr.serialize(row)
                .map_err(|err| parse_error(format!("writing profile CSV: {err}")))?;
        }
        wtr.flush().map_err(GridError::from)?;
        Ok(())
    }
}

fn parse_error(message: String) -> ClearingError {
    ClearingError::Grid(GridError::Parse(message))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_bands() {
        let expected = [
            (0, 0.6),
            (5, 0.6),
            (6, 0.95),
            (9, 0.95),
            (10, 0.8),
            (16, 0.8),
            (17, 1.0),
            (21, 1.0),
            (22, 0.6),
            (23, 0.6),
        ];
        for (hour, factor) in expected {
            assert_eq!(default_load_factor(hour), factor, "hour {hour}");
        }
    }

    #[test]
    fn wind_bands() {
        assert_eq!(default_wind_factor(3), 0.8);
        assert_eq!(default_wind_factor(22), 0.8);
        assert_eq!(default_wind_factor(6), 0.4);
        assert_eq!(default_wind_factor(21), 0.4);
    }

    #[test]
    fn solar_curve() {
        assert_eq!(default_solar_factor(6), 0.1);
        assert_eq!(default_solar_factor(20), 0.1);
        assert!((default_solar_factor(13) - 0.9).abs() < 1e-12);
        assert!((default_solar_factor(7) - 0.2).abs() < 1e-12);
        assert!((default_solar_factor(10) - 0.55).abs() < 1e-12);
        for hour in 0..HOURS_PER_DAY {
            let f = default_solar_factor(hour);
            assert!((0.1..=0.9 + 1e-12).contains(&f));
        }
    }

    #[test]
    fn hour_out_of_range_is_error() {
        let profile = DailyProfile::default();
        assert!(matches!(
            profile.load_factor(24),
            Err(ClearingError::HourOutOfRange(24))
        ));
        assert!(profile.renewable_factor(GeneratorKind::Wind, 99).is_err());
        assert_eq!(profile.renewable_factor(GeneratorKind::Hydro, 12).unwrap(), 1.0);
    }

    #[test]
    fn csv_profile_written_then_read() {
        let mut buffer = Vec::new();
        DailyProfile::default().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        assert!(text.starts_with("hour,load_factor,wind_factor,solar_factor"));
        let parsed = DailyProfile::from_csv_reader(text.as_bytes()).unwrap();
        assert_eq!(parsed, DailyProfile::default());
    }

    #[test]
    fn incomplete_csv_rejected() {
        let text = "hour,load_factor,wind_factor,solar_factor\n0,0.5,0.5,0.1\n";
        let err = DailyProfile::from_csv_reader(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("no row for hour 1"));

        let dup = "hour,load_factor,wind_factor,solar_factor\n0,0.5,0.5,0.1\n0,0.5,0.5,0.1\n";
        assert!(DailyProfile::from_csv_reader(dup.as_bytes()).is_err());
    }
}
