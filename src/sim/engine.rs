//! Simulation engine that chains turbine power, fleet scaling, valuation,
//! surplus, and the scenario matrix into result rows.

use std::sync::Arc;

use chrono::TimeDelta;
use rayon::ThreadPoolBuilder;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{Result, SimError};
use crate::turbine::{PowerCurveModel, TurbineSpec, energy_mwh};

use super::align::{check_alignment, check_index, ensure_same_index};
use super::assembler::{ProfileColumns, SiteColumns, assemble};
use super::fleet::scale_series;
use super::kpi::ProfileSummary;
use super::market::{price_column, value_series};
use super::scenario::{MultiplierGrid, ScenarioMatrix};
use super::surplus::surplus_series;
use super::types::{ProfilePlan, RunInputs, ScenarioResult, SiteSeries};

/// Immutable parameters shared by every profile of a run.
///
/// # Examples
///
/// ```
/// use ppa_sim::sim::engine::EngineConfig;
///
/// let cfg = EngineConfig::new(45.0);
/// assert_eq!(cfg.step_hours(), 1.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Fixed PPA price for the whole run (€/MWh).
    pub ppa_price: f64,
    /// Price multipliers of the sensitivity sweep.
    pub multipliers: MultiplierGrid,
    /// Height of the wind-speed measurement (m).
    pub reference_height_m: f64,
    /// Height of obstacles around the measurement site (m).
    pub obstacle_height_m: f64,
    /// Duration of one step.
    pub resolution: TimeDelta,
    /// Worker threads for profile fan-out; 0 uses the global rayon pool.
    pub threads: usize,
}

impl EngineConfig {
    /// Hourly run with the default multiplier sweep and a 10 m measurement height.
    pub fn new(ppa_price: f64) -> Self {
        Self {
            ppa_price,
            multipliers: MultiplierGrid::default(),
            reference_height_m: 10.0,
            obstacle_height_m: 0.0,
            resolution: TimeDelta::hours(1),
            threads: 0,
        }
    }

    /// Duration of one step in hours.
    pub fn step_hours(&self) -> f64 {
        self.resolution.num_seconds() as f64 / 3600.0
    }
}

/// Everything a run produces: rows in profile-then-timestamp order, and one
/// summary per profile in input order.
#[derive(Debug, Clone, Default)]
pub struct RunOutput {
    pub rows: Vec<ScenarioResult>,
    pub summaries: Vec<ProfileSummary>,
}

/// Stateless simulation engine.
///
/// Holds only read-only data, so profiles can be evaluated in parallel
/// against one shared instance.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    model: PowerCurveModel,
    matrix: ScenarioMatrix,
}

impl Engine {
    /// Creates an engine for one turbine type.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::InvalidSpec`] for unusable measurement geometry and
    /// [`SimError::Config`] for a non-positive resolution or non-finite PPA price.
    pub fn new(config: EngineConfig, turbine: TurbineSpec) -> Result<Self> {
        if config.resolution <= TimeDelta::zero() {
            return Err(SimError::Config(format!(
                "resolution must be positive, got {} s",
                config.resolution.num_seconds()
            )));
        }
        let model = PowerCurveModel::new(turbine, config.reference_height_m, config.obstacle_height_m)?;
        let matrix = ScenarioMatrix::new(config.multipliers.clone(), config.ppa_price)?;
        Ok(Self {
            config,
            model,
            matrix,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &PowerCurveModel {
        &self.model
    }

    /// Computes the profile-independent columns for a site.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Alignment`] if weather and price are not on one
    /// gap-free index, [`SimError::InvalidInput`] for a non-finite price, and
    /// propagates power-model errors.
    pub fn site_columns(&self, site: &SiteSeries) -> Result<SiteColumns> {
        check_index("weather", &site.weather, self.config.resolution)?;
        ensure_same_index("weather", &site.weather, "price", &site.prices)?;

        let step_hours = self.config.step_hours();
        let power_w = self.model.power_series(&site.weather)?;
        let power_mwh: Vec<f64> = power_w.iter().map(|&p| energy_mwh(p, step_hours)).collect();
        let price = price_column(&site.prices)?;
        let market_value = value_series(&power_mwh, &price)?;

        Ok(SiteColumns {
            timestamps: site.weather.iter().map(|w| w.timestamp).collect(),
            wind_speed: site.weather.iter().map(|w| w.wind_speed).collect(),
            roughness_length: site.weather.iter().map(|w| w.roughness_length).collect(),
            price,
            power_w,
            power_mwh,
            market_value,
        })
    }

    /// Simulates one profile against a site.
    ///
    /// # Errors
    ///
    /// Fails with [`SimError::Alignment`], [`SimError::InvalidSpec`],
    /// [`SimError::InvalidInput`] or [`SimError::SchemaMismatch`]; no rows are
    /// returned on failure.
    pub fn run_profile(&self, site: &SiteSeries, plan: &ProfilePlan) -> Result<Vec<ScenarioResult>> {
        check_alignment(
            &site.weather,
            &site.prices,
            &plan.profile.samples,
            self.config.resolution,
        )?;
        let columns = self.site_columns(site)?;
        self.profile_rows(&columns, plan)
    }

    fn profile_rows(&self, site: &SiteColumns, plan: &ProfilePlan) -> Result<Vec<ScenarioResult>> {
        let profile = &plan.profile;
        if let Some(bad) = profile
            .samples
            .iter()
            .find(|s| !s.load_kwh.is_finite() || s.load_kwh < 0.0)
        {
            return Err(SimError::InvalidInput(format!(
                "profile {} has load {} kWh at {}",
                profile.meta.profile_id, bad.load_kwh, bad.timestamp
            )));
        }

        let fleet_power_mwh = scale_series(&site.power_mwh, plan.turbine_count);
        let fleet_market_value = value_series(&fleet_power_mwh, &site.price)?;
        let load_kwh: Vec<f64> = profile.samples.iter().map(|s| s.load_kwh).collect();
        let load_mwh: Vec<f64> = load_kwh.iter().map(|&kwh| kwh / 1000.0).collect();
        let ppa_surplus_mwh = surplus_series(&fleet_power_mwh, &load_mwh)?;
        let scenarios = self
            .matrix
            .matrix(&load_mwh, &fleet_power_mwh, &ppa_surplus_mwh, &site.price)?;

        let columns = ProfileColumns {
            timestamps: profile.samples.iter().map(|s| s.timestamp).collect(),
            fleet_power_mwh,
            fleet_market_value,
            load_kwh,
            load_mwh,
            ppa_surplus_mwh,
            scenarios,
        };
        let rows = assemble(
            site,
            Arc::new(profile.meta.clone()),
            columns,
            self.matrix.grid().len(),
        )?;

        debug!(
            profile_id = profile.meta.profile_id,
            turbines = plan.turbine_count,
            rows = rows.len(),
            "profile simulated"
        );
        Ok(rows)
    }

    /// Simulates every profile of a run.
    ///
    /// Profiles are evaluated in parallel. The run is all-or-nothing: the
    /// first failing profile fails the whole run and no rows are returned.
    ///
    /// # Errors
    ///
    /// See [`Engine::run_profile`]; also [`SimError::Config`] if a dedicated
    /// thread pool cannot be built.
    pub fn run(&self, inputs: &RunInputs) -> Result<RunOutput> {
        info!(
            turbine = %self.model.turbine().name,
            profiles = inputs.profiles.len(),
            steps = inputs.site.weather.len(),
            ppa_price = self.config.ppa_price,
            "starting run"
        );

        let site = self.site_columns(&inputs.site)?;
        let simulate = |plan: &ProfilePlan| -> Result<(Vec<ScenarioResult>, ProfileSummary)> {
            check_alignment(
                &inputs.site.weather,
                &inputs.site.prices,
                &plan.profile.samples,
                self.config.resolution,
            )
            .map_err(|e| match e {
                SimError::Alignment(msg) => SimError::Alignment(format!(
                    "profile {}: {msg}",
                    plan.profile.meta.profile_id
                )),
                other => other,
            })?;
            let rows = self.profile_rows(&site, plan)?;
            let summary = ProfileSummary::from_rows(
                &plan.profile.meta,
                plan.turbine_count,
                &rows,
                self.matrix.grid(),
            );
            Ok((rows, summary))
        };

        let per_profile: Vec<(Vec<ScenarioResult>, ProfileSummary)> = if self.config.threads == 0 {
            inputs.profiles.par_iter().map(simulate).collect::<Result<_>>()?
        } else {
            let pool = ThreadPoolBuilder::new()
                .num_threads(self.config.threads)
                .build()
                .map_err(|e| SimError::Config(format!("cannot build thread pool: {e}")))?;
            pool.install(|| inputs.profiles.par_iter().map(simulate).collect::<Result<_>>())?
        };

        let mut output = RunOutput {
            rows: Vec::with_capacity(per_profile.iter().map(|(r, _)| r.len()).sum()),
            summaries: Vec::with_capacity(per_profile.len()),
        };
        for (rows, summary) in per_profile {
            output.rows.extend(rows);
            output.summaries.push(summary);
        }

        info!(rows = output.rows.len(), "run complete");
        Ok(output)
    }
}
