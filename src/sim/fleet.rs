//! Fleet scaling and the optional caller-side sizing policy.

use serde::{Deserialize, Serialize};

/// Scales a single-turbine quantity (power or energy) to a fleet.
pub fn scale(single: f64, turbine_count: u32) -> f64 {
    single * f64::from(turbine_count)
}

/// Scales every element of a single-turbine series.
pub fn scale_series(single: &[f64], turbine_count: u32) -> Vec<f64> {
    single.iter().map(|&x| scale(x, turbine_count)).collect()
}

/// How many turbines serve a profile.
///
/// Sizing happens before a run; the engine only ever sees the resulting count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FleetSizing {
    /// A contracted number of turbines.
    Fixed(u32),
    /// Enough turbines for annual generation to cover annual demand.
    MatchAnnualDemand,
}

impl Default for FleetSizing {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

impl FleetSizing {
    /// Resolves the policy to a turbine count.
    ///
    /// # Arguments
    ///
    /// * `total_load_mwh` - Profile demand over the run
    /// * `single_energy_mwh` - One turbine's generation over the same run
    ///
    /// # Returns
    ///
    /// `ceil(total_load_mwh / single_energy_mwh)` for
    /// [`FleetSizing::MatchAnnualDemand`], or 0 when the turbine produces
    /// nothing or there is no demand.
    pub fn turbine_count(&self, total_load_mwh: f64, single_energy_mwh: f64) -> u32 {
        match *self {
            Self::Fixed(n) => n,
            Self::MatchAnnualDemand => {
                if single_energy_mwh <= 0.0 || total_load_mwh <= 0.0 {
                    return 0;
                }
                let needed = (total_load_mwh / single_energy_mwh).ceil();
                if needed >= f64::from(u32::MAX) {
                    u32::MAX
                } else {
                    needed as u32
                }
            }
        }
    }
}
