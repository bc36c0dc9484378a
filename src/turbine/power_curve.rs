//! Manufacturer power curves and the single-turbine power model.
//!
//! [`PowerCurveModel`] chains the logarithmic wind profile with a linear
//! interpolation over the tabulated curve. Below the first tabulated wind
//! speed the turbine produces nothing; from the last tabulated wind speed on
//! it produces the curve's final (rated) value.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SimError};
use crate::sim::types::WeatherSample;

use super::wind_profile::WindProfile;

/// One tabulated point of a power curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    /// Hub-height wind speed (m/s).
    pub wind_speed: f64,
    /// Electrical output at that wind speed (W).
    #[serde(alias = "power")]
    pub power_w: f64,
}

/// Validated power curve: at least two points, strictly increasing wind
/// speed, non-negative and non-decreasing power.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PowerCurve {
    points: Vec<CurvePoint>,
}

impl PowerCurve {
    /// Builds a curve from tabulated points.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSpec`] if there are fewer than two points,
    /// any value is non-finite, wind speeds are not strictly increasing, or
    /// power is negative or decreasing.
    pub fn new(points: Vec<CurvePoint>) -> Result<Self> {
        if points.len() < 2 {
            return Err(SimError::InvalidSpec(format!(
                "power curve needs at least 2 points, got {}",
                points.len()
            )));
        }

        for (i, p) in points.iter().enumerate() {
            if !p.wind_speed.is_finite() || !p.power_w.is_finite() {
                return Err(SimError::InvalidSpec(format!(
                    "power curve point {i} is not finite: ({}, {})",
                    p.wind_speed, p.power_w
                )));
            }
            if p.power_w < 0.0 {
                return Err(SimError::InvalidSpec(format!(
                    "power curve point {i} has negative power {} W",
                    p.power_w
                )));
            }
        }

        for (i, pair) in points.windows(2).enumerate() {
            if pair[1].wind_speed <= pair[0].wind_speed {
                return Err(SimError::InvalidSpec(format!(
                    "power curve wind speeds must be strictly increasing: \
                     point {} ({} m/s) follows {} m/s",
                    i + 1,
                    pair[1].wind_speed,
                    pair[0].wind_speed
                )));
            }
            if pair[1].power_w < pair[0].power_w {
                return Err(SimError::InvalidSpec(format!(
                    "power curve output must be non-decreasing: \
                     point {} ({} W) follows {} W",
                    i + 1,
                    pair[1].power_w,
                    pair[0].power_w
                )));
            }
        }

        Ok(Self { points })
    }

    /// Builds a curve from `(wind_speed, power_w)` pairs.
    ///
    /// # Errors
    ///
    /// Same as [`PowerCurve::new`].
    pub fn from_pairs(pairs: &[(f64, f64)]) -> Result<Self> {
        Self::new(
            pairs
                .iter()
                .map(|&(wind_speed, power_w)| CurvePoint {
                    wind_speed,
                    power_w,
                })
                .collect(),
        )
    }

    /// Tabulated points in ascending wind-speed order.
    pub fn points(&self) -> &[CurvePoint] {
        &self.points
    }

    /// Rated power (W), the output of the last tabulated point.
    pub fn rated_power_w(&self) -> f64 {
        self.points.last().map_or(0.0, |p| p.power_w)
    }

    /// Output (W) at a hub-height wind speed.
    ///
    /// Tabulated speeds return their tabulated power exactly; speeds in
    /// between interpolate linearly between the bracketing points.
    pub fn power_at(&self, wind_speed: f64) -> f64 {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return 0.0,
        };
        if wind_speed < first.wind_speed {
            return 0.0;
        }
        if wind_speed >= last.wind_speed {
            return last.power_w;
        }

        // First index whose wind speed exceeds the query; >= 1 and < len here.
        let upper = self.points.partition_point(|p| p.wind_speed <= wind_speed);
        let lo = self.points[upper - 1];
        let hi = self.points[upper];
        if wind_speed == lo.wind_speed {
            return lo.power_w;
        }
        let frac = (wind_speed - lo.wind_speed) / (hi.wind_speed - lo.wind_speed);
        lo.power_w + frac * (hi.power_w - lo.power_w)
    }
}

/// Physical rotor description used to derive a sampled power curve.
///
/// Output follows `P = efficiency * 0.5 * air_density * pi * r^2 * v^3`
/// between cut-in and rated speed, holds at the rated value up to cut-out,
/// and is zero outside that range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RotorParameters {
    /// Rotor radius (m).
    pub rotor_radius_m: f64,
    /// Cut-in wind speed (m/s).
    pub cut_in: f64,
    /// Rated wind speed (m/s).
    pub rated: f64,
    /// Cut-out wind speed (m/s).
    pub cut_out: f64,
    /// Air density (kg/m^3).
    pub air_density: f64,
    /// Aerodynamic and electrical efficiency (0.0-1.0).
    pub efficiency: f64,
}

impl Default for RotorParameters {
    fn default() -> Self {
        Self {
            rotor_radius_m: 110.0,
            cut_in: 3.0,
            rated: 12.0,
            cut_out: 25.0,
            air_density: 1.225,
            efficiency: 0.4,
        }
    }
}

impl RotorParameters {
    /// Step between sampled wind speeds when tabulating the curve (m/s).
    const SAMPLE_STEP: f64 = 0.5;

    fn cubic_power_w(&self, wind_speed: f64) -> f64 {
        let swept_area = std::f64::consts::PI * self.rotor_radius_m.powi(2);
        self.efficiency * 0.5 * self.air_density * swept_area * wind_speed.powi(3)
    }

    /// Tabulates the cubic model into a [`PowerCurve`].
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSpec`] unless
    /// `0 < cut_in < rated < cut_out`, radius and density are positive, and
    /// efficiency lies in `(0, 1]`.
    pub fn to_power_curve(&self) -> Result<PowerCurve> {
        let ordered = self.cut_in > 0.0 && self.cut_in < self.rated && self.rated < self.cut_out;
        if !ordered || !self.cut_out.is_finite() {
            return Err(SimError::InvalidSpec(format!(
                "rotor speeds must satisfy 0 < cut_in < rated < cut_out, got {} / {} / {}",
                self.cut_in, self.rated, self.cut_out
            )));
        }
        if !(self.rotor_radius_m > 0.0 && self.air_density > 0.0) {
            return Err(SimError::InvalidSpec(
                "rotor radius and air density must be > 0".into(),
            ));
        }
        if !(self.efficiency > 0.0 && self.efficiency <= 1.0) {
            return Err(SimError::InvalidSpec(format!(
                "efficiency must be in (0, 1], got {}",
                self.efficiency
            )));
        }

        let mut points = Vec::new();
        let mut k = 0_u32;
        loop {
            let v = self.cut_in + f64::from(k) * Self::SAMPLE_STEP;
            if v >= self.rated {
                break;
            }
            points.push(CurvePoint {
                wind_speed: v,
                power_w: self.cubic_power_w(v),
            });
            k += 1;
        }
        let rated_power = self.cubic_power_w(self.rated);
        points.push(CurvePoint {
            wind_speed: self.rated,
            power_w: rated_power,
        });
        points.push(CurvePoint {
            wind_speed: self.cut_out,
            power_w: rated_power,
        });
        PowerCurve::new(points)
    }
}

/// Static turbine record: model name, hub height and power curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurbineSpec {
    /// Manufacturer/model identifier.
    pub name: String,
    /// Hub height above ground (m).
    pub hub_height_m: f64,
    /// Validated power curve.
    pub power_curve: PowerCurve,
}

impl TurbineSpec {
    /// Creates a turbine record.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSpec`] for a non-positive hub height.
    pub fn new(name: impl Into<String>, hub_height_m: f64, power_curve: PowerCurve) -> Result<Self> {
        if !hub_height_m.is_finite() || hub_height_m <= 0.0 {
            return Err(SimError::InvalidSpec(format!(
                "hub height must be > 0 m, got {hub_height_m}"
            )));
        }
        Ok(Self {
            name: name.into(),
            hub_height_m,
            power_curve,
        })
    }

    /// Builds a turbine whose curve is sampled from a physical rotor model.
    ///
    /// # Errors
    ///
    /// See [`RotorParameters::to_power_curve`] and [`TurbineSpec::new`].
    pub fn from_rotor(
        name: impl Into<String>,
        hub_height_m: f64,
        rotor: &RotorParameters,
    ) -> Result<Self> {
        Self::new(name, hub_height_m, rotor.to_power_curve()?)
    }

    /// Rated power (W).
    pub fn rated_power_w(&self) -> f64 {
        self.power_curve.rated_power_w()
    }
}

/// Converts a wind reading at the measurement height into turbine output.
///
/// Pure and stateless apart from the immutable turbine and profile geometry,
/// so one instance can be shared across threads.
#[derive(Debug, Clone)]
pub struct PowerCurveModel {
    turbine: TurbineSpec,
    profile: WindProfile,
}

impl PowerCurveModel {
    /// Creates a model for a turbine and a measurement geometry.
    ///
    /// # Arguments
    ///
    /// * `turbine` - Turbine record (hub height and curve)
    /// * `reference_height_m` - Height of the wind-speed measurement
    /// * `obstacle_height_m` - Height of surrounding obstacles (0 for open terrain)
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSpec`] if the geometry is not usable.
    pub fn new(turbine: TurbineSpec, reference_height_m: f64, obstacle_height_m: f64) -> Result<Self> {
        let profile = WindProfile::new(reference_height_m, turbine.hub_height_m, obstacle_height_m)?;
        Ok(Self { turbine, profile })
    }

    /// The turbine this model evaluates.
    pub fn turbine(&self) -> &TurbineSpec {
        &self.turbine
    }

    /// The wind profile used for hub-height extrapolation.
    pub fn profile(&self) -> &WindProfile {
        &self.profile
    }

    /// Single-turbine output (W) for a measured wind speed and roughness length.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidInput`] for a negative or non-finite wind
    /// speed and [`SimError::InvalidSpec`] for an unusable roughness length.
    pub fn power(&self, wind_speed: f64, roughness_length: f64) -> Result<f64> {
        if !wind_speed.is_finite() || wind_speed < 0.0 {
            return Err(SimError::InvalidInput(format!(
                "wind speed must be a finite value >= 0 m/s, got {wind_speed}"
            )));
        }
        let hub_speed = self.profile.hub_wind_speed(wind_speed, roughness_length)?;
        Ok(self.turbine.power_curve.power_at(hub_speed))
    }

    /// Single-turbine output (W) for every weather sample, in input order.
    ///
    /// # Errors
    ///
    /// Fails on the first sample [`PowerCurveModel::power`] rejects, naming
    /// its timestamp.
    pub fn power_series(&self, weather: &[WeatherSample]) -> Result<Vec<f64>> {
        weather
            .iter()
            .map(|w| {
                self.power(w.wind_speed, w.roughness_length).map_err(|e| match e {
                    SimError::InvalidSpec(msg) => {
                        SimError::InvalidSpec(format!("{msg} at {}", w.timestamp))
                    }
                    SimError::InvalidInput(msg) => {
                        SimError::InvalidInput(format!("{msg} at {}", w.timestamp))
                    }
                    other => other,
                })
            })
            .collect()
    }
}

/// Converts a power (W) held for `step_hours` into energy (MWh).
pub fn energy_mwh(power_w: f64, step_hours: f64) -> f64 {
    power_w / 1_000_000.0 * step_hours
}
