//! Turns a [`ScenarioConfig`] into engine inputs and runs them.
//!
//! Everything here happens before or after the pure engine: loading or
//! generating series, the explicit calendar recast, fleet sizing, and the
//! optional capture-price rule.

use chrono::Datelike;
use tracing::{info, warn};

use crate::config::{PpaPrice, PriceRule, ScenarioConfig};
use crate::error::{Result, SimError};
use crate::io::import::{read_load_file, read_prices_file, read_weather_file};
use crate::sim::align::{check_index, ensure_same_index, recast_to_year};
use crate::sim::engine::{Engine, EngineConfig, RunOutput};
use crate::sim::fleet::FleetSizing;
use crate::sim::market::{capture_price, price_column, value_series};
use crate::sim::types::{LoadProfile, ProfilePlan, RunInputs, SiteSeries};
use crate::synthetic;
use crate::turbine::{PowerCurveModel, TurbineSpec, energy_mwh};

/// Engine configuration, turbine and materialised inputs of one run.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub engine_config: EngineConfig,
    pub turbine: TurbineSpec,
    pub inputs: RunInputs,
}

impl PreparedRun {
    /// Keeps only the profile with `profile_id`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if no profile has that id.
    pub fn select_profile(&mut self, profile_id: u32) -> Result<()> {
        self.inputs
            .profiles
            .retain(|p| p.profile.meta.profile_id == profile_id);
        if self.inputs.profiles.is_empty() {
            return Err(SimError::Config(format!("no profile with id {profile_id}")));
        }
        Ok(())
    }
}

fn load_site(cfg: &ScenarioConfig) -> Result<SiteSeries> {
    let spec = cfg.synthetic_spec();
    let weather = match &cfg.inputs.weather {
        Some(path) => {
            let rows = read_weather_file(path)?;
            info!(path = %path.display(), rows = rows.len(), "weather loaded");
            rows
        }
        None => synthetic::weather(&spec),
    };
    let prices = match &cfg.inputs.prices {
        Some(path) => {
            let rows = read_prices_file(path)?;
            info!(path = %path.display(), rows = rows.len(), "prices loaded");
            rows
        }
        None => synthetic::prices(&spec, &weather),
    };
    Ok(SiteSeries { weather, prices })
}

fn load_profiles(cfg: &ScenarioConfig) -> Result<Vec<LoadProfile>> {
    let spec = cfg.synthetic_spec();
    let step_hours = cfg.simulation.step_hours();
    let year = cfg.simulation.start.year();

    cfg.profiles
        .iter()
        .map(|p| {
            let samples = match &p.load {
                Some(path) => {
                    let raw = read_load_file(path, cfg.inputs.load_unit, step_hours)?;
                    if cfg.inputs.recast_load_to_year {
                        let recast = recast_to_year(&raw, year)?;
                        if recast.len() != raw.len() {
                            warn!(
                                profile_id = p.profile_id,
                                dropped = raw.len() - recast.len(),
                                "duplicate timestamps dropped after recast"
                            );
                        }
                        recast
                    } else {
                        raw
                    }
                }
                None => synthetic::load(&spec, &p.load_shape(), p.profile_id),
            };
            Ok(LoadProfile {
                meta: p.meta(),
                samples,
            })
        })
        .collect()
}

/// Loads inputs, sizes fleets and fixes the PPA price.
///
/// # Errors
///
/// Returns [`SimError::Config`] for an invalid configuration or an undefined
/// capture price, and propagates read, alignment and turbine errors.
pub fn prepare(cfg: &ScenarioConfig) -> Result<PreparedRun> {
    let errors = cfg.validate();
    if !errors.is_empty() {
        let joined = errors
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect::<Vec<_>>()
            .join("; ");
        return Err(SimError::Config(joined));
    }

    let turbine = cfg.turbine.resolve()?;
    let resolution = cfg.simulation.resolution();
    let step_hours = cfg.simulation.step_hours();
    let site = load_site(cfg)?;
    let profiles = load_profiles(cfg)?;

    let needs_turbine_energy = matches!(cfg.ppa.price, PpaPrice::Derived(_))
        || cfg
            .profiles
            .iter()
            .any(|p| FleetSizing::from(p.turbine_count) == FleetSizing::MatchAnnualDemand);

    let single_energy: Vec<f64> = if needs_turbine_energy {
        check_index("weather", &site.weather, resolution)?;
        ensure_same_index("weather", &site.weather, "price", &site.prices)?;
        let model = PowerCurveModel::new(
            turbine.clone(),
            cfg.simulation.reference_height_m,
            cfg.simulation.obstacle_height_m,
        )?;
        model
            .power_series(&site.weather)?
            .into_iter()
            .map(|w| energy_mwh(w, step_hours))
            .collect()
    } else {
        Vec::new()
    };
    let single_total: f64 = single_energy.iter().sum();

    let ppa_price = match cfg.ppa.price {
        PpaPrice::Fixed(p) => p,
        PpaPrice::Derived(PriceRule::Capture) => {
            let prices = price_column(&site.prices)?;
            let values = value_series(&single_energy, &prices)?;
            let price = capture_price(&single_energy, &values).ok_or_else(|| {
                SimError::Config("capture price undefined: the turbine generates nothing".into())
            })?;
            info!(capture_price = price, "PPA price set to capture price");
            price
        }
    };

    let plans = cfg
        .profiles
        .iter()
        .zip(profiles)
        .map(|(p, profile)| {
            let sizing = FleetSizing::from(p.turbine_count);
            let turbine_count = sizing.turbine_count(profile.total_mwh(), single_total);
            if sizing == FleetSizing::MatchAnnualDemand {
                info!(
                    profile_id = p.profile_id,
                    turbine_count,
                    load_mwh = profile.total_mwh(),
                    turbine_mwh = single_total,
                    "fleet sized to demand"
                );
            }
            if turbine_count == 0 {
                warn!(profile_id = p.profile_id, "no turbines; load is fully bought at spot");
            }
            ProfilePlan {
                profile,
                turbine_count,
            }
        })
        .collect();

    let engine_config = EngineConfig {
        ppa_price,
        multipliers: cfg.multiplier_grid()?,
        reference_height_m: cfg.simulation.reference_height_m,
        obstacle_height_m: cfg.simulation.obstacle_height_m,
        resolution,
        threads: cfg.simulation.threads,
    };

    Ok(PreparedRun {
        engine_config,
        turbine,
        inputs: RunInputs {
            site,
            profiles: plans,
        },
    })
}

/// Runs a prepared scenario.
///
/// # Errors
///
/// Propagates engine errors; no rows are returned on failure.
pub fn execute(prepared: &PreparedRun) -> Result<RunOutput> {
    let engine = Engine::new(prepared.engine_config.clone(), prepared.turbine.clone())?;
    engine.run(&prepared.inputs)
}

/// Prepares and runs a scenario in one call.
///
/// # Errors
///
/// See [`prepare`] and [`execute`].
pub fn run(cfg: &ScenarioConfig) -> Result<(PreparedRun, RunOutput)> {
    let prepared = prepare(cfg)?;
    let output = execute(&prepared)?;
    Ok((prepared, output))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{SizingRule, TurbineCount};

    #[test]
    fn demo_runs_end_to_end() {
        let cfg = ScenarioConfig::demo();
        let (prepared, out) = run(&cfg).unwrap();
        let steps = cfg.simulation.steps();
        assert_eq!(out.rows.len(), steps * cfg.profiles.len());
        assert_eq!(out.summaries.len(), cfg.profiles.len());
        assert_eq!(prepared.engine_config.ppa_price, 45.0);
    }

    #[test]
    fn capture_preset_derives_price_and_fleet() {
        let (prepared, out) = run(&ScenarioConfig::capture()).unwrap();
        let p = prepared.engine_config.ppa_price;
        assert!(p.is_finite());
        let capture = out.summaries[0].capture_price.unwrap();
        assert!((capture - p).abs() < 1e-9 * p.abs().max(1.0));
        assert!(prepared.inputs.profiles.iter().all(|p| p.turbine_count > 0));
    }

    #[test]
    fn invalid_config_is_rejected_before_loading() {
        let mut cfg = ScenarioConfig::demo();
        cfg.simulation.days = 0;
        let err = prepare(&cfg).unwrap_err();
        assert!(err.to_string().contains("simulation.days"), "{err}");
    }

    #[test]
    fn select_profile_filters() {
        let mut prepared = prepare(&ScenarioConfig::demo()).unwrap();
        prepared.select_profile(2).unwrap();
        assert_eq!(prepared.inputs.profiles.len(), 1);
        assert!(prepared.select_profile(99).is_err());
    }

    #[test]
    fn auto_sizing_covers_demand() {
        let mut cfg = ScenarioConfig::demo();
        cfg.profiles[0].turbine_count = TurbineCount::Rule(SizingRule::Auto);
        let (_, out) = run(&cfg).unwrap();
        let s = &out.summaries[0];
        assert!(s.fleet_generation_mwh >= s.load_mwh);
    }
}
