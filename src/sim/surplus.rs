//! Generation surplus (or deficit) against consumer load.

use crate::error::{Result, SimError};

/// Fleet energy minus load (MWh). Negative values are a deficit.
pub fn surplus(fleet_energy_mwh: f64, load_mwh: f64) -> f64 {
    fleet_energy_mwh - load_mwh
}

/// Element-wise surplus. Values are never clamped.
///
/// # Errors
///
/// Returns [`SimError::SchemaMismatch`] if the series differ in length.
pub fn surplus_series(fleet_energy_mwh: &[f64], load_mwh: &[f64]) -> Result<Vec<f64>> {
    if fleet_energy_mwh.len() != load_mwh.len() {
        return Err(SimError::SchemaMismatch(format!(
            "fleet energy has {} steps but load has {}",
            fleet_energy_mwh.len(),
            load_mwh.len()
        )));
    }
    Ok(fleet_energy_mwh
        .iter()
        .zip(load_mwh)
        .map(|(&g, &l)| surplus(g, l))
        .collect())
}
