//! TOML-based scenario configuration and preset definitions.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{TimeDelta, TimeZone, Utc};
use serde::Deserialize;
use thiserror::Error;

use crate::error::{Result, SimError};
use crate::io::import::read_power_curve_file;
use crate::sim::align::LoadUnit;
use crate::sim::fleet::FleetSizing;
use crate::sim::scenario::{DEFAULT_MULTIPLIERS, MultiplierGrid};
use crate::sim::types::{ProfileMeta, Timestamp};
use crate::synthetic::{LoadShape, PriceShape, SyntheticSpec, WindClimate};
use crate::turbine::{PowerCurve, RotorParameters, TurbineSpec, catalog};

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults; a file only needs what it changes. Load with
/// [`ScenarioConfig::from_toml_file`] or start from a preset via
/// [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Time index, measurement geometry and seed.
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Contract price and sensitivity sweep.
    #[serde(default)]
    pub ppa: PpaConfig,
    /// Turbine selection.
    #[serde(default)]
    pub turbine: TurbineConfig,
    /// External input files.
    #[serde(default)]
    pub inputs: InputsConfig,
    /// Shape of generated inputs when no files are given.
    #[serde(default)]
    pub synthetic: SyntheticConfig,
    /// Consumer profiles to simulate.
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

fn default_start() -> Timestamp {
    Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or_default()
}

/// Time index, measurement geometry and seed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// First timestamp (RFC 3339 string, e.g. `"2019-01-01T00:00:00Z"`).
    pub start: Timestamp,
    /// Days to simulate when inputs are generated (must be > 0).
    pub days: u32,
    /// Step length in minutes (must be > 0).
    pub resolution_minutes: u32,
    /// Height of the wind-speed measurement (m).
    pub reference_height_m: f64,
    /// Height of obstacles around the site (m).
    pub obstacle_height_m: f64,
    /// Master random seed for generated inputs.
    pub seed: u64,
    /// Worker threads for profile fan-out (0 = all cores).
    pub threads: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            start: default_start(),
            days: 7,
            resolution_minutes: 60,
            reference_height_m: 10.0,
            obstacle_height_m: 0.0,
            seed: 42,
            threads: 0,
        }
    }
}

impl SimulationConfig {
    /// Step length.
    pub fn resolution(&self) -> TimeDelta {
        TimeDelta::minutes(i64::from(self.resolution_minutes))
    }

    /// Step length in hours.
    pub fn step_hours(&self) -> f64 {
        f64::from(self.resolution_minutes) / 60.0
    }

    /// Number of generated steps.
    pub fn steps(&self) -> usize {
        if self.resolution_minutes == 0 {
            return 0;
        }
        (self.days as usize * 24 * 60) / self.resolution_minutes as usize
    }
}

/// Rule deriving the PPA price from the run's own data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceRule {
    /// Generation-weighted spot price of one turbine over the run.
    Capture,
}

/// PPA price: a number (€/MWh) or a rule name.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum PpaPrice {
    Fixed(f64),
    Derived(PriceRule),
}

/// Contract price and sensitivity sweep.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PpaConfig {
    /// Fixed price in €/MWh, or `"capture"`.
    pub price: PpaPrice,
    /// Price multipliers, in output order.
    pub multipliers: Vec<f64>,
}

impl Default for PpaConfig {
    fn default() -> Self {
        Self {
            price: PpaPrice::Fixed(45.0),
            multipliers: DEFAULT_MULTIPLIERS.to_vec(),
        }
    }
}

/// Turbine selection.
///
/// An inline `power_curve` wins over `power_curve_file`, which wins over
/// `rotor`, which wins over the catalog `model`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TurbineConfig {
    /// Catalog model name.
    pub model: String,
    /// Display name override.
    pub name: Option<String>,
    /// Hub height override (m); required for custom curves.
    pub hub_height_m: Option<f64>,
    /// Inline `[[wind_speed, power_w], ...]` pairs.
    pub power_curve: Option<Vec<[f64; 2]>>,
    /// CSV with `wind_speed,power` columns.
    pub power_curve_file: Option<PathBuf>,
    /// Physical rotor description.
    pub rotor: Option<RotorParameters>,
}

impl Default for TurbineConfig {
    fn default() -> Self {
        Self {
            model: "generic_3mw".to_string(),
            name: None,
            hub_height_m: None,
            power_curve: None,
            power_curve_file: None,
            rotor: None,
        }
    }
}

impl TurbineConfig {
    fn custom_source(&self) -> bool {
        self.power_curve.is_some() || self.power_curve_file.is_some() || self.rotor.is_some()
    }

    /// Builds the turbine record.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSpec`] for an unknown model, invalid curve
    /// or missing hub height, and [`SimError::Read`] for an unreadable file.
    pub fn resolve(&self) -> Result<TurbineSpec> {
        let custom = match (&self.power_curve, &self.power_curve_file, &self.rotor) {
            (Some(pairs), _, _) => {
                let pairs: Vec<(f64, f64)> = pairs.iter().map(|p| (p[0], p[1])).collect();
                Some(PowerCurve::from_pairs(&pairs)?)
            }
            (None, Some(path), _) => Some(read_power_curve_file(path)?),
            (None, None, Some(rotor)) => Some(rotor.to_power_curve()?),
            (None, None, None) => None,
        };

        let mut spec = match custom {
            Some(curve) => {
                let hub = self.hub_height_m.ok_or_else(|| {
                    SimError::InvalidSpec("turbine.hub_height_m is required for a custom curve".into())
                })?;
                TurbineSpec::new("custom", hub, curve)?
            }
            None => catalog::by_name(&self.model)?,
        };
        if let Some(name) = &self.name {
            spec.name = name.clone();
        }
        if let Some(hub) = self.hub_height_m {
            spec = TurbineSpec::new(spec.name, hub, spec.power_curve)?;
        }
        Ok(spec)
    }
}

/// External input files. Missing series are generated.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputsConfig {
    /// CSV with `timestamp,wind_speed,roughness_length`.
    pub weather: Option<PathBuf>,
    /// CSV with `timestamp,price`.
    pub prices: Option<PathBuf>,
    /// Unit of the `load` column in profile CSVs.
    pub load_unit: LoadUnit,
    /// Move profile CSVs onto the year of `simulation.start` before the run.
    pub recast_load_to_year: bool,
}

/// Shape of generated inputs.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SyntheticConfig {
    pub weibull_scale: f64,
    pub weibull_shape: f64,
    pub persistence: f64,
    pub roughness_length: f64,
    pub mean_price: f64,
    pub daily_price_amplitude: f64,
    pub seasonal_price_amplitude: f64,
    pub wind_price_sensitivity: f64,
    pub price_noise_std: f64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        let w = WindClimate::default();
        let p = PriceShape::default();
        Self {
            weibull_scale: w.weibull_scale,
            weibull_shape: w.weibull_shape,
            persistence: w.persistence,
            roughness_length: w.roughness_length,
            mean_price: p.mean,
            daily_price_amplitude: p.daily_amplitude,
            seasonal_price_amplitude: p.seasonal_amplitude,
            wind_price_sensitivity: p.wind_sensitivity,
            price_noise_std: p.noise_std,
        }
    }
}

/// Sizing rule name for `turbine_count = "auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingRule {
    /// Match annual demand with annual generation.
    Auto,
}

/// Turbine count: a number or `"auto"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TurbineCount {
    Count(u32),
    Rule(SizingRule),
}

impl From<TurbineCount> for FleetSizing {
    fn from(count: TurbineCount) -> Self {
        match count {
            TurbineCount::Count(n) => FleetSizing::Fixed(n),
            TurbineCount::Rule(SizingRule::Auto) => FleetSizing::MatchAnnualDemand,
        }
    }
}

/// One consumer profile.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileConfig {
    pub profile_id: u32,
    pub sector_group_id: u32,
    pub sector_group: String,
    pub plz: String,
    pub nuts_id: String,
    /// CSV with `timestamp,load`; generated from the shift shape when absent.
    pub load: Option<PathBuf>,
    /// Number of turbines, or `"auto"`.
    pub turbine_count: TurbineCount,
    /// Generated demand around the clock (kW).
    pub base_load_kw: f64,
    /// Generated weekday day-shift demand on top of the base (kW).
    pub shift_load_kw: f64,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        let shape = LoadShape::default();
        Self {
            profile_id: 1,
            sector_group_id: 0,
            sector_group: String::new(),
            plz: String::new(),
            nuts_id: String::new(),
            load: None,
            turbine_count: TurbineCount::Count(1),
            base_load_kw: shape.base_kw,
            shift_load_kw: shape.shift_kw,
        }
    }
}

impl ProfileConfig {
    /// Metadata carried into every result row.
    pub fn meta(&self) -> ProfileMeta {
        ProfileMeta {
            profile_id: self.profile_id,
            sector_group_id: self.sector_group_id,
            sector_group: self.sector_group.clone(),
            plz: self.plz.clone(),
            nuts_id: self.nuts_id.clone(),
        }
    }

    /// Shape used when the load is generated.
    pub fn load_shape(&self) -> LoadShape {
        LoadShape {
            base_kw: self.base_load_kw,
            shift_kw: self.shift_load_kw,
            ..LoadShape::default()
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.days"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl From<ConfigError> for SimError {
    fn from(e: ConfigError) -> Self {
        SimError::Config(format!("{}: {}", e.field, e.message))
    }
}

impl ScenarioConfig {
    /// Two-week demo with a metal-works and a chemicals profile on generated data.
    pub fn demo() -> Self {
        Self {
            simulation: SimulationConfig {
                days: 14,
                ..SimulationConfig::default()
            },
            ppa: PpaConfig::default(),
            turbine: TurbineConfig::default(),
            inputs: InputsConfig::default(),
            synthetic: SyntheticConfig::default(),
            profiles: vec![
                ProfileConfig {
                    profile_id: 1,
                    sector_group_id: 24,
                    sector_group: "Metal production".to_string(),
                    plz: "47057".to_string(),
                    nuts_id: "DEA12".to_string(),
                    turbine_count: TurbineCount::Count(2),
                    ..ProfileConfig::default()
                },
                ProfileConfig {
                    profile_id: 2,
                    sector_group_id: 20,
                    sector_group: "Chemicals".to_string(),
                    plz: "06749".to_string(),
                    nuts_id: "DEE05".to_string(),
                    turbine_count: TurbineCount::Count(1),
                    base_load_kw: 1500.0,
                    shift_load_kw: 400.0,
                    ..ProfileConfig::default()
                },
            ],
        }
    }

    /// Demo profiles with the PPA priced at the capture price and fleets
    /// sized to annual demand.
    pub fn capture() -> Self {
        let mut cfg = Self::demo();
        cfg.ppa.price = PpaPrice::Derived(PriceRule::Capture);
        for p in &mut cfg.profiles {
            p.turbine_count = TurbineCount::Rule(SizingRule::Auto);
        }
        cfg
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "capture"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> std::result::Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "capture" => Ok(Self::capture()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// Relative input paths are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> std::result::Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        let mut cfg = Self::from_toml_str(&content)?;
        if let Some(dir) = path.parent() {
            cfg.resolve_paths(dir);
        }
        Ok(cfg)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> std::result::Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    fn resolve_paths(&mut self, base: &Path) {
        let fix = |p: &mut Option<PathBuf>| {
            if let Some(path) = p.as_mut().filter(|p| p.is_relative()) {
                *path = base.join(&*path);
            }
        };
        fix(&mut self.inputs.weather);
        fix(&mut self.inputs.prices);
        fix(&mut self.turbine.power_curve_file);
        for profile in &mut self.profiles {
            fix(&mut profile.load);
        }
    }

    /// The configured multiplier grid.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the multipliers are invalid.
    pub fn multiplier_grid(&self) -> Result<MultiplierGrid> {
        MultiplierGrid::new(self.ppa.multipliers.clone())
    }

    /// Generator settings derived from `[simulation]` and `[synthetic]`.
    pub fn synthetic_spec(&self) -> SyntheticSpec {
        let s = &self.synthetic;
        SyntheticSpec {
            start: self.simulation.start,
            steps: self.simulation.steps(),
            resolution: self.simulation.resolution(),
            seed: self.simulation.seed,
            wind: WindClimate {
                weibull_scale: s.weibull_scale,
                weibull_shape: s.weibull_shape,
                persistence: s.persistence,
                roughness_length: s.roughness_length,
            },
            price: PriceShape {
                mean: s.mean_price,
                daily_amplitude: s.daily_price_amplitude,
                seasonal_amplitude: s.seasonal_price_amplitude,
                wind_sensitivity: s.wind_price_sensitivity,
                noise_std: s.price_noise_std,
            },
        }
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if s.days == 0 {
            errors.push(ConfigError::new("simulation.days", "must be > 0"));
        }
        if s.resolution_minutes == 0 {
            errors.push(ConfigError::new("simulation.resolution_minutes", "must be > 0"));
        }
        if !(s.reference_height_m > 0.0) {
            errors.push(ConfigError::new("simulation.reference_height_m", "must be > 0"));
        }
        if !(s.obstacle_height_m >= 0.0) {
            errors.push(ConfigError::new("simulation.obstacle_height_m", "must be >= 0"));
        }

        if let PpaPrice::Fixed(p) = self.ppa.price {
            if !p.is_finite() {
                errors.push(ConfigError::new("ppa.price", "must be a finite number"));
            }
        }
        if let Err(e) = self.multiplier_grid() {
            errors.push(ConfigError::new("ppa.multipliers", e.to_string()));
        }

        let t = &self.turbine;
        if !t.custom_source() && !catalog::MODELS.contains(&t.model.as_str()) {
            errors.push(ConfigError::new(
                "turbine.model",
                format!(
                    "unknown model \"{}\", available: {}",
                    t.model,
                    catalog::MODELS.join(", ")
                ),
            ));
        }
        if t.custom_source() && t.hub_height_m.is_none() {
            errors.push(ConfigError::new(
                "turbine.hub_height_m",
                "is required with power_curve, power_curve_file or rotor",
            ));
        }
        if let Some(h) = t.hub_height_m {
            if !(h > 0.0) {
                errors.push(ConfigError::new("turbine.hub_height_m", "must be > 0"));
            }
        }

        let syn = &self.synthetic;
        if !(syn.weibull_scale > 0.0 && syn.weibull_shape > 0.0) {
            errors.push(ConfigError::new("synthetic.weibull_scale", "scale and shape must be > 0"));
        }
        if !(0.0..1.0).contains(&syn.persistence) {
            errors.push(ConfigError::new("synthetic.persistence", "must be in [0.0, 1.0)"));
        }
        if !(syn.roughness_length > 0.0) {
            errors.push(ConfigError::new("synthetic.roughness_length", "must be > 0"));
        }

        if self.profiles.is_empty() {
            errors.push(ConfigError::new("profiles", "at least one profile is required"));
        }
        let mut seen = HashSet::new();
        for (i, p) in self.profiles.iter().enumerate() {
            if !seen.insert(p.profile_id) {
                errors.push(ConfigError::new(
                    format!("profiles[{i}].profile_id"),
                    format!("duplicate id {}", p.profile_id),
                ));
            }
            if p.load.is_none() && !(p.base_load_kw >= 0.0 && p.shift_load_kw >= 0.0) {
                errors.push(ConfigError::new(
                    format!("profiles[{i}].base_load_kw"),
                    "generated load levels must be >= 0",
                ));
            }
        }

        errors
    }
}
