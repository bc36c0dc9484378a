//! Time-index alignment checks and explicit calendar pre-steps.
//!
//! The engine never fills or interpolates. Weather, price and load series must
//! share one gap-free index at the run resolution; anything else is an
//! [`SimError::Alignment`]. Moving a reference-year load profile onto the
//! simulation year is available as [`recast_to_year`], which callers apply
//! explicitly before a run.

use chrono::{Datelike, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};

use super::types::{LoadSample, Timestamped};

/// Unit of the raw load values in an input file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadUnit {
    /// Energy per step (kWh).
    #[default]
    Kwh,
    /// Average power over the step (kW).
    AverageKw,
}

impl LoadUnit {
    /// Converts a raw value into kWh for a step of `step_hours`.
    pub fn to_kwh(self, value: f64, step_hours: f64) -> f64 {
        match self {
            Self::Kwh => value,
            Self::AverageKw => value * step_hours,
        }
    }
}

/// Checks that a series is non-empty, strictly increasing and gap-free.
///
/// # Errors
///
/// Returns [`SimError::Alignment`] naming `name` and the first offending index.
pub fn check_index<T: Timestamped>(name: &str, samples: &[T], resolution: TimeDelta) -> Result<()> {
    if samples.is_empty() {
        return Err(SimError::Alignment(format!("{name} series is empty")));
    }
    for (i, pair) in samples.windows(2).enumerate() {
        let (prev, next) = (pair[0].timestamp(), pair[1].timestamp());
        let step = next - prev;
        if step != resolution {
            let what = if step <= TimeDelta::zero() {
                "is not strictly increasing"
            } else if step > resolution {
                "has a gap"
            } else {
                "is finer than the run resolution"
            };
            return Err(SimError::Alignment(format!(
                "{name} series {what} at index {}: {prev} -> {next} (expected step {} min)",
                i + 1,
                resolution.num_minutes()
            )));
        }
    }
    Ok(())
}

/// Checks that two series carry identical timestamps.
///
/// # Errors
///
/// Returns [`SimError::Alignment`] on a length difference or the first
/// differing timestamp.
pub fn ensure_same_index<A: Timestamped, B: Timestamped>(
    name_a: &str,
    a: &[A],
    name_b: &str,
    b: &[B],
) -> Result<()> {
    if a.len() != b.len() {
        return Err(SimError::Alignment(format!(
            "{name_a} has {} steps but {name_b} has {}",
            a.len(),
            b.len()
        )));
    }
    if let Some(i) = a
        .iter()
        .zip(b)
        .position(|(x, y)| x.timestamp() != y.timestamp())
    {
        return Err(SimError::Alignment(format!(
            "{name_a} and {name_b} differ at index {i}: {} vs {}",
            a[i].timestamp(),
            b[i].timestamp()
        )));
    }
    Ok(())
}

/// Checks that weather, price and load share one gap-free index.
///
/// # Errors
///
/// Returns [`SimError::Alignment`] describing the first violation found.
pub fn check_alignment<W: Timestamped, P: Timestamped, L: Timestamped>(
    weather: &[W],
    prices: &[P],
    load: &[L],
    resolution: TimeDelta,
) -> Result<()> {
    check_index("weather", weather, resolution)?;
    ensure_same_index("weather", weather, "price", prices)?;
    ensure_same_index("weather", weather, "load", load)
}

/// Moves a load series onto `year`.
///
/// February 29th becomes February 28th in non-leap years. The result is
/// sorted by timestamp and keeps the first sample of any duplicate.
///
/// # Errors
///
/// Returns [`SimError::Timestamp`] if a timestamp cannot be represented in
/// the target year.
pub fn recast_to_year(samples: &[LoadSample], year: i32) -> Result<Vec<LoadSample>> {
    let mut out = samples
        .iter()
        .map(|s| {
            let ts = s.timestamp;
            ts.with_year(year)
                .or_else(|| ts.with_day(28).and_then(|t| t.with_year(year)))
                .map(|timestamp| LoadSample {
                    timestamp,
                    load_kwh: s.load_kwh,
                })
                .ok_or_else(|| SimError::Timestamp(format!("cannot move {ts} to year {year}")))
        })
        .collect::<Result<Vec<_>>>()?;

    // Stable sort keeps input order among equal timestamps.
    out.sort_by_key(|s| s.timestamp);
    out.dedup_by_key(|s| s.timestamp);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::sim::types::{PriceSample, Timestamp, WeatherSample};

    fn ts(y: i32, mo: u32, d: u32, h: u32) -> Timestamp {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    fn weather(hours: &[u32]) -> Vec<WeatherSample> {
        hours
            .iter()
            .map(|&h| WeatherSample {
                timestamp: ts(2019, 1, 1, h),
                wind_speed: 5.0,
                roughness_length: 0.1,
            })
            .collect()
    }

    fn prices(hours: &[u32]) -> Vec<PriceSample> {
        hours
            .iter()
            .map(|&h| PriceSample {
                timestamp: ts(2019, 1, 1, h),
                price: 40.0,
            })
            .collect()
    }

    fn load(hours: &[u32]) -> Vec<LoadSample> {
        hours
            .iter()
            .map(|&h| LoadSample {
                timestamp: ts(2019, 1, 1, h),
                load_kwh: 100.0,
            })
            .collect()
    }

    #[test]
    fn aligned_series_pass() {
        let h = [0, 1, 2];
        assert!(check_alignment(&weather(&h), &prices(&h), &load(&h), TimeDelta::hours(1)).is_ok());
    }

    #[test]
    fn gap_is_rejected() {
        let err = check_index("weather", &weather(&[0, 2]), TimeDelta::hours(1)).unwrap_err();
        assert!(err.to_string().contains("gap"), "{err}");
    }

    #[test]
    fn unsorted_is_rejected() {
        let err = check_index("weather", &weather(&[1, 0]), TimeDelta::hours(1)).unwrap_err();
        assert!(err.to_string().contains("strictly increasing"), "{err}");
    }

    #[test]
    fn empty_is_rejected() {
        let empty: Vec<WeatherSample> = Vec::new();
        assert!(matches!(
            check_index("weather", &empty, TimeDelta::hours(1)),
            Err(SimError::Alignment(_))
        ));
    }

    #[test]
    fn shifted_load_is_rejected() {
        let err = check_alignment(
            &weather(&[0, 1]),
            &prices(&[0, 1]),
            &load(&[1, 2]),
            TimeDelta::hours(1),
        )
        .unwrap_err();
        assert!(err.to_string().contains("load"), "{err}");
    }

    #[test]
    fn short_price_series_is_rejected() {
        let err = check_alignment(
            &weather(&[0, 1]),
            &prices(&[0]),
            &load(&[0, 1]),
            TimeDelta::hours(1),
        );
        assert!(matches!(err, Err(SimError::Alignment(_))));
    }

    #[test]
    fn recast_folds_leap_day() {
        let samples = vec![
            LoadSample {
                timestamp: ts(2020, 2, 28, 0),
                load_kwh: 1.0,
            },
            LoadSample {
                timestamp: ts(2020, 2, 29, 0),
                load_kwh: 2.0,
            },
            LoadSample {
                timestamp: ts(2020, 3, 1, 0),
                load_kwh: 3.0,
            },
        ];
        let out = recast_to_year(&samples, 2019).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].timestamp, ts(2019, 2, 28, 0));
        assert_eq!(out[0].load_kwh, 1.0);
        assert_eq!(out[1].timestamp, ts(2019, 3, 1, 0));
    }

    #[test]
    fn recast_sorts_wrapped_years() {
        let samples = vec![
            LoadSample {
                timestamp: ts(2018, 12, 31, 23),
                load_kwh: 9.0,
            },
            LoadSample {
                timestamp: ts(2019, 1, 1, 0),
                load_kwh: 1.0,
            },
        ];
        let out = recast_to_year(&samples, 2019).unwrap();
        assert_eq!(out[0].timestamp, ts(2019, 1, 1, 0));
        assert_eq!(out[1].timestamp, ts(2019, 12, 31, 23));
    }

    #[test]
    fn average_kw_converts_with_step() {
        assert_eq!(LoadUnit::AverageKw.to_kwh(400.0, 0.25), 100.0);
        assert_eq!(LoadUnit::Kwh.to_kwh(400.0, 0.25), 400.0);
    }
}
