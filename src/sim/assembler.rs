//! Packs per-step component outputs into [`ScenarioResult`] rows.

use std::sync::Arc;

use crate::error::{Result, SimError};

use super::types::{ProfileMeta, ScenarioCost, ScenarioResult, Timestamp};

/// Site-level columns shared by every profile of a run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteColumns {
    pub timestamps: Vec<Timestamp>,
    pub wind_speed: Vec<f64>,
    pub roughness_length: Vec<f64>,
    pub price: Vec<f64>,
    pub power_w: Vec<f64>,
    pub power_mwh: Vec<f64>,
    pub market_value: Vec<f64>,
}

/// Profile-level columns produced for one load profile.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileColumns {
    pub timestamps: Vec<Timestamp>,
    pub fleet_power_mwh: Vec<f64>,
    pub fleet_market_value: Vec<f64>,
    pub load_kwh: Vec<f64>,
    pub load_mwh: Vec<f64>,
    pub ppa_surplus_mwh: Vec<f64>,
    pub scenarios: Vec<Vec<ScenarioCost>>,
}

fn check_len(name: &str, len: usize, expected: usize) -> Result<()> {
    if len == expected {
        Ok(())
    } else {
        Err(SimError::SchemaMismatch(format!(
            "{name} has {len} steps, expected {expected}"
        )))
    }
}

/// Merges site and profile columns into rows in timestamp order.
///
/// # Errors
///
/// Returns [`SimError::SchemaMismatch`] if any column differs in length from
/// the site index, the profile index differs from the site index, or a step
/// carries a different number of scenario costs than `multipliers`.
pub fn assemble(
    site: &SiteColumns,
    profile: Arc<ProfileMeta>,
    columns: ProfileColumns,
    multipliers: usize,
) -> Result<Vec<ScenarioResult>> {
    let n = site.timestamps.len();
    check_len("wind_speed", site.wind_speed.len(), n)?;
    check_len("roughness_length", site.roughness_length.len(), n)?;
    check_len("price", site.price.len(), n)?;
    check_len("actual_power(w)", site.power_w.len(), n)?;
    check_len("actual_power(mwh)", site.power_mwh.len(), n)?;
    check_len("market_value", site.market_value.len(), n)?;
    check_len("profile index", columns.timestamps.len(), n)?;
    check_len("fleet_power(mwh)", columns.fleet_power_mwh.len(), n)?;
    check_len("fleet_market_value", columns.fleet_market_value.len(), n)?;
    check_len("load(kwh)", columns.load_kwh.len(), n)?;
    check_len("load(mwh)", columns.load_mwh.len(), n)?;
    check_len("ppa_surplus(mwh)", columns.ppa_surplus_mwh.len(), n)?;
    check_len("scenario matrix", columns.scenarios.len(), n)?;

    if let Some(i) = (0..n).find(|&i| site.timestamps[i] != columns.timestamps[i]) {
        return Err(SimError::SchemaMismatch(format!(
            "profile {} index differs from site index at step {i}: {} vs {}",
            profile.profile_id, columns.timestamps[i], site.timestamps[i]
        )));
    }
    if let Some(i) = columns.scenarios.iter().position(|s| s.len() != multipliers) {
        return Err(SimError::SchemaMismatch(format!(
            "step {i} has {} scenario costs, expected {multipliers}",
            columns.scenarios[i].len()
        )));
    }

    let rows = columns
        .scenarios
        .into_iter()
        .enumerate()
        .map(|(t, scenarios)| ScenarioResult {
            timestamp: site.timestamps[t],
            profile: Arc::clone(&profile),
            wind_speed: site.wind_speed[t],
            roughness_length: site.roughness_length[t],
            price: site.price[t],
            power_w: site.power_w[t],
            power_mwh: site.power_mwh[t],
            fleet_power_mwh: columns.fleet_power_mwh[t],
            market_value: site.market_value[t],
            fleet_market_value: columns.fleet_market_value[t],
            load_kwh: columns.load_kwh[t],
            load_mwh: columns.load_mwh[t],
            ppa_surplus_mwh: columns.ppa_surplus_mwh[t],
            scenarios,
        })
        .collect();
    Ok(rows)
}
