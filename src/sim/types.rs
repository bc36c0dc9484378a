//! Core simulation types: input samples, profile metadata, and result rows.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Timestamp of one simulation step (UTC, start of the interval).
pub type Timestamp = DateTime<Utc>;

/// Anything carrying a position on the run's time index.
pub trait Timestamped {
    /// Start of the interval this sample describes.
    fn timestamp(&self) -> Timestamp;
}

/// Wind reading at the measurement height for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub timestamp: Timestamp,
    /// Wind speed at the reference height (m/s).
    pub wind_speed: f64,
    /// Terrain roughness length (m).
    pub roughness_length: f64,
}

/// Spot price for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub timestamp: Timestamp,
    /// Day-ahead price (€/MWh). May be negative.
    pub price: f64,
}

/// Consumer demand for one step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoadSample {
    pub timestamp: Timestamp,
    /// Energy consumed during the step (kWh).
    pub load_kwh: f64,
}

impl Timestamped for WeatherSample {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl Timestamped for PriceSample {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl Timestamped for LoadSample {
    fn timestamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Identity and location of one industrial consumer archetype.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileMeta {
    pub profile_id: u32,
    pub sector_group_id: u32,
    /// Human-readable sector label (e.g. `"Metal processing"`).
    pub sector_group: String,
    /// German postal code.
    pub plz: String,
    /// NUTS statistical region identifier.
    pub nuts_id: String,
}

impl fmt::Display for ProfileMeta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "profile {} ({} #{}, {} / {})",
            self.profile_id, self.sector_group, self.sector_group_id, self.plz, self.nuts_id
        )
    }
}

/// Load series of one consumer archetype.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadProfile {
    pub meta: ProfileMeta,
    /// Demand per step, in timestamp order.
    pub samples: Vec<LoadSample>,
}

impl LoadProfile {
    /// Total demand over the series (MWh).
    pub fn total_mwh(&self) -> f64 {
        self.samples.iter().map(|s| s.load_kwh).sum::<f64>() / 1000.0
    }
}

/// Weather and price series shared by every profile at one site.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteSeries {
    pub weather: Vec<WeatherSample>,
    pub prices: Vec<PriceSample>,
}

/// A load profile together with the fleet size serving it.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePlan {
    pub profile: LoadProfile,
    /// Number of turbines contracted for this profile.
    pub turbine_count: u32,
}

/// Fully materialised inputs for one run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunInputs {
    pub site: SiteSeries,
    pub profiles: Vec<ProfilePlan>,
}

/// Costs of one multiplier at one step (€).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioCost {
    pub multiplier: f64,
    /// Buying all load at the scaled spot price.
    pub as_is: f64,
    /// Buying the PPA-covered share at the PPA price and the rest at spot.
    pub with_ppa: f64,
}

/// One output row, keyed by `(timestamp, profile_id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioResult {
    pub timestamp: Timestamp,
    pub profile: Arc<ProfileMeta>,
    pub wind_speed: f64,
    pub roughness_length: f64,
    pub price: f64,
    /// Single-turbine output (W).
    pub power_w: f64,
    /// Single-turbine energy for the step (MWh).
    pub power_mwh: f64,
    /// Fleet energy for the step (MWh).
    pub fleet_power_mwh: f64,
    /// Single-turbine energy valued at spot (€).
    pub market_value: f64,
    /// Fleet energy valued at spot (€).
    pub fleet_market_value: f64,
    pub load_kwh: f64,
    pub load_mwh: f64,
    /// Fleet energy minus load (MWh); negative is a deficit.
    pub ppa_surplus_mwh: f64,
    /// One entry per multiplier, in grid order.
    pub scenarios: Vec<ScenarioCost>,
}

impl fmt::Display for ScenarioResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | profile={} | wind={:.2} m/s price={:.2} €/MWh | \
             fleet={:.3} MWh load={:.3} MWh surplus={:+.3} MWh",
            self.timestamp.format("%Y-%m-%d %H:%M"),
            self.profile.profile_id,
            self.wind_speed,
            self.price,
            self.fleet_power_mwh,
            self.load_mwh,
            self.ppa_surplus_mwh,
        )
    }
}
