//! Seeded synthetic inputs for demos and tests.
//!
//! Produces a site (wind and spot price) and industrial load series that are
//! fully reproducible from one seed, so the binary runs without external data.

use std::f64::consts::PI;

use chrono::{Datelike, TimeDelta, Timelike, Weekday};
use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::sim::types::{LoadSample, PriceSample, SiteSeries, Timestamp, WeatherSample};

/// Seed offset for the price RNG so it does not mirror the wind draws.
const PRICE_SEED_OFFSET: u64 = 1;
/// Seed offset for load RNGs; the profile id is added on top.
const LOAD_SEED_OFFSET: u64 = 100;

/// Wind climate of a site.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindClimate {
    /// Weibull scale parameter at the measurement height (m/s).
    pub weibull_scale: f64,
    /// Weibull shape parameter.
    pub weibull_shape: f64,
    /// AR(1) persistence of hourly wind (0.0 = independent draws).
    pub persistence: f64,
    /// Terrain roughness length (m).
    pub roughness_length: f64,
}

impl Default for WindClimate {
    fn default() -> Self {
        Self {
            weibull_scale: 6.5,
            weibull_shape: 2.0,
            persistence: 0.85,
            roughness_length: 0.1,
        }
    }
}

/// Shape of the spot price series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceShape {
    /// Average price (€/MWh).
    pub mean: f64,
    /// Amplitude of the intraday swing (€/MWh).
    pub daily_amplitude: f64,
    /// Amplitude of the winter/summer swing (€/MWh).
    pub seasonal_amplitude: f64,
    /// Price drop per m/s of wind above the Weibull scale (€/MWh).
    pub wind_sensitivity: f64,
    /// Standard deviation of the price noise (€/MWh).
    pub noise_std: f64,
}

impl Default for PriceShape {
    fn default() -> Self {
        Self {
            mean: 45.0,
            daily_amplitude: 8.0,
            seasonal_amplitude: 6.0,
            wind_sensitivity: 2.0,
            noise_std: 4.0,
        }
    }
}

/// Shift-work industrial demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadShape {
    /// Demand around the clock (kW).
    pub base_kw: f64,
    /// Additional demand on weekdays between 06:00 and 22:00 (kW).
    pub shift_kw: f64,
    /// Relative noise on the demand (fraction of the current level).
    pub noise_frac: f64,
}

impl Default for LoadShape {
    fn default() -> Self {
        Self {
            base_kw: 800.0,
            shift_kw: 1200.0,
            noise_frac: 0.03,
        }
    }
}

/// Time index and seed of a synthetic run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyntheticSpec {
    pub start: Timestamp,
    pub steps: usize,
    pub resolution: TimeDelta,
    pub seed: u64,
    pub wind: WindClimate,
    pub price: PriceShape,
}

impl SyntheticSpec {
    /// Timestamps of the run, `start + i * resolution`.
    pub fn timestamps(&self) -> Vec<Timestamp> {
        let mut out = Vec::with_capacity(self.steps);
        let mut ts = self.start;
        for _ in 0..self.steps {
            out.push(ts);
            ts += self.resolution;
        }
        out
    }

    fn step_hours(&self) -> f64 {
        self.resolution.num_seconds() as f64 / 3600.0
    }
}

/// Gaussian draw via Box-Muller.
fn gaussian_noise(rng: &mut StdRng, std_dev: f64) -> f64 {
    if std_dev <= 0.0 {
        return 0.0;
    }
    let u1: f64 = rng.random::<f64>().clamp(1e-12, 1.0);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos() * std_dev
}

/// Weibull draw via inverse CDF.
fn weibull(rng: &mut StdRng, scale: f64, shape: f64) -> f64 {
    let u: f64 = rng.random::<f64>().clamp(0.0, 1.0 - 1e-12);
    scale * (-(1.0 - u).ln()).powf(1.0 / shape)
}

/// Wind series with Weibull-distributed draws smoothed by an AR(1) filter.
///
/// The filtered speed evolves as
/// ```text
/// v(t) = persistence * v(t-1) + (1 - persistence) * w(t)
/// ```
/// where `w` are independent Weibull draws. Roughness is constant.
pub fn weather(spec: &SyntheticSpec) -> Vec<WeatherSample> {
    let mut rng = StdRng::seed_from_u64(spec.seed);
    let w = spec.wind;
    let alpha = w.persistence.clamp(0.0, 0.999);
    let mut v = weibull(&mut rng, w.weibull_scale, w.weibull_shape);

    spec.timestamps()
        .into_iter()
        .map(|timestamp| {
            let draw = weibull(&mut rng, w.weibull_scale, w.weibull_shape);
            v = alpha * v + (1.0 - alpha) * draw;
            WeatherSample {
                timestamp,
                wind_speed: v.max(0.0),
                roughness_length: w.roughness_length,
            }
        })
        .collect()
}

/// Spot prices with intraday and seasonal shape, a merit-order wind effect,
/// and Gaussian noise. Negative prices can occur in windy low-demand hours.
pub fn prices(spec: &SyntheticSpec, weather: &[WeatherSample]) -> Vec<PriceSample> {
    let mut rng = StdRng::seed_from_u64(spec.seed.wrapping_add(PRICE_SEED_OFFSET));
    let p = spec.price;

    weather
        .iter()
        .map(|w| {
            let hour = f64::from(w.timestamp.hour()) + f64::from(w.timestamp.minute()) / 60.0;
            let day = f64::from(w.timestamp.ordinal0());
            // Peak around 18:00, trough at night; winter above summer.
            let daily = p.daily_amplitude * (2.0 * PI * (hour - 12.0) / 24.0).sin();
            let seasonal = p.seasonal_amplitude * (2.0 * PI * day / 365.0).cos();
            let merit = p.wind_sensitivity * (w.wind_speed - spec.wind.weibull_scale);
            PriceSample {
                timestamp: w.timestamp,
                price: p.mean + daily + seasonal - merit + gaussian_noise(&mut rng, p.noise_std),
            }
        })
        .collect()
}

/// Industrial shift-pattern demand (kWh per step) for one profile.
///
/// `profile_id` only decorrelates the noise between profiles.
pub fn load(spec: &SyntheticSpec, shape: &LoadShape, profile_id: u32) -> Vec<LoadSample> {
    let seed = spec
        .seed
        .wrapping_add(LOAD_SEED_OFFSET)
        .wrapping_add(u64::from(profile_id));
    let mut rng = StdRng::seed_from_u64(seed);
    let step_hours = spec.step_hours();

    spec.timestamps()
        .into_iter()
        .map(|timestamp| {
            let weekday = !matches!(timestamp.weekday(), Weekday::Sat | Weekday::Sun);
            let on_shift = weekday && (6..22).contains(&timestamp.hour());
            let level = shape.base_kw + if on_shift { shape.shift_kw } else { 0.0 };
            let kw = (level + gaussian_noise(&mut rng, level * shape.noise_frac)).max(0.0);
            LoadSample {
                timestamp,
                load_kwh: kw * step_hours,
            }
        })
        .collect()
}

/// Weather and prices of a synthetic site.
pub fn site(spec: &SyntheticSpec) -> SiteSeries {
    let weather = weather(spec);
    let prices = prices(spec, &weather);
    SiteSeries { weather, prices }
}
