//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use chrono::{TimeDelta, TimeZone, Utc};

use ppa_sim::sim::engine::{Engine, EngineConfig};
use ppa_sim::sim::types::{
    LoadProfile, LoadSample, PriceSample, ProfileMeta, ProfilePlan, SiteSeries, Timestamp,
    WeatherSample,
};
use ppa_sim::turbine::{PowerCurve, TurbineSpec};

/// PPA price used by the hand-calculated cases (€/MWh).
pub const PPA_PRICE: f64 = 45.0;

/// Hourly timestamp `h` hours after 2019-01-01T00:00Z.
pub fn ts(h: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap() + TimeDelta::hours(i64::from(h))
}

/// 1 MW turbine, flat from 5 m/s, hub at the 10 m measurement height.
///
/// With hub and reference at the same height the measured speed passes
/// through unchanged, so any speed in [5, 25) yields exactly 1 MW.
pub fn flat_turbine() -> TurbineSpec {
    let curve =
        PowerCurve::from_pairs(&[(3.0, 0.0), (5.0, 1_000_000.0), (25.0, 1_000_000.0)]).unwrap();
    TurbineSpec::new("flat_1mw", 10.0, curve).unwrap()
}

/// `n` hourly steps with constant wind, roughness and price.
pub fn constant_site(n: u32, wind_speed: f64, price: f64) -> SiteSeries {
    SiteSeries {
        weather: (0..n)
            .map(|h| WeatherSample {
                timestamp: ts(h),
                wind_speed,
                roughness_length: 0.1,
            })
            .collect(),
        prices: (0..n)
            .map(|h| PriceSample {
                timestamp: ts(h),
                price,
            })
            .collect(),
    }
}

/// Profile `id` with a constant hourly load (kWh) and a fixed fleet.
pub fn constant_plan(id: u32, n: u32, load_kwh: f64, turbine_count: u32) -> ProfilePlan {
    ProfilePlan {
        profile: LoadProfile {
            meta: ProfileMeta {
                profile_id: id,
                sector_group_id: 24,
                sector_group: "Metal production".into(),
                plz: "47057".into(),
                nuts_id: "DEA12".into(),
            },
            samples: (0..n)
                .map(|h| LoadSample {
                    timestamp: ts(h),
                    load_kwh,
                })
                .collect(),
        },
        turbine_count,
    }
}

/// Hourly engine over the flat turbine with the default multiplier grid.
pub fn default_engine() -> Engine {
    Engine::new(EngineConfig::new(PPA_PRICE), flat_turbine()).unwrap()
}
