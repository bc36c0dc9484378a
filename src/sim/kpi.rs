//! Per-profile totals computed post-hoc from result rows.

use std::fmt;

use serde::Serialize;

use super::scenario::{MultiplierGrid, multiplier_label};
use super::types::{ProfileMeta, ScenarioResult};

/// Summed costs of one multiplier over a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioTotals {
    pub multiplier: f64,
    /// Total as-is cost (€).
    pub as_is: f64,
    /// Total with-PPA cost (€).
    pub with_ppa: f64,
}

impl ScenarioTotals {
    /// As-is minus with-PPA cost (€); positive means the PPA saves money.
    pub fn savings(&self) -> f64 {
        self.as_is - self.with_ppa
    }
}

/// Aggregate figures for one profile.
///
/// Computed from the emitted rows so that the summary always agrees with the
/// exported data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfileSummary {
    pub profile: ProfileMeta,
    pub turbine_count: u32,
    pub steps: usize,
    /// Single-turbine generation (MWh).
    pub generation_mwh: f64,
    /// Fleet generation (MWh).
    pub fleet_generation_mwh: f64,
    /// Consumer demand (MWh).
    pub load_mwh: f64,
    /// Single-turbine market value (€).
    pub market_value: f64,
    /// Fleet market value (€).
    pub fleet_market_value: f64,
    /// Generation-weighted spot price (€/MWh); `None` without generation.
    pub capture_price: Option<f64>,
    /// Sum of positive surpluses (MWh).
    pub surplus_mwh: f64,
    /// Sum of deficits as a positive magnitude (MWh).
    pub deficit_mwh: f64,
    /// One entry per multiplier, in grid order.
    pub scenarios: Vec<ScenarioTotals>,
}

impl ProfileSummary {
    /// Sums the rows of one profile.
    ///
    /// # Arguments
    ///
    /// * `profile` - Metadata of the profile the rows belong to
    /// * `turbine_count` - Fleet size used for the rows
    /// * `rows` - Result rows of that profile
    /// * `grid` - Multiplier grid the rows were computed with
    pub fn from_rows(
        profile: &ProfileMeta,
        turbine_count: u32,
        rows: &[ScenarioResult],
        grid: &MultiplierGrid,
    ) -> Self {
        let mut scenarios: Vec<ScenarioTotals> = grid
            .values()
            .iter()
            .map(|&multiplier| ScenarioTotals {
                multiplier,
                as_is: 0.0,
                with_ppa: 0.0,
            })
            .collect();

        let mut generation = 0.0;
        let mut fleet_generation = 0.0;
        let mut load = 0.0;
        let mut value = 0.0;
        let mut fleet_value = 0.0;
        let mut surplus = 0.0;
        let mut deficit = 0.0;

        for r in rows {
            generation += r.power_mwh;
            fleet_generation += r.fleet_power_mwh;
            load += r.load_mwh;
            value += r.market_value;
            fleet_value += r.fleet_market_value;
            if r.ppa_surplus_mwh >= 0.0 {
                surplus += r.ppa_surplus_mwh;
            } else {
                deficit -= r.ppa_surplus_mwh;
            }
            for (total, cost) in scenarios.iter_mut().zip(&r.scenarios) {
                total.as_is += cost.as_is;
                total.with_ppa += cost.with_ppa;
            }
        }

        Self {
            profile: profile.clone(),
            turbine_count,
            steps: rows.len(),
            generation_mwh: generation,
            fleet_generation_mwh: fleet_generation,
            load_mwh: load,
            market_value: value,
            fleet_market_value: fleet_value,
            capture_price: (generation > 0.0).then(|| value / generation),
            surplus_mwh: surplus,
            deficit_mwh: deficit,
            scenarios,
        }
    }

    /// Totals for the multiplier whose label matches `m`.
    pub fn scenario(&self, m: f64) -> Option<&ScenarioTotals> {
        let label = multiplier_label(m);
        self.scenarios
            .iter()
            .find(|s| multiplier_label(s.multiplier) == label)
    }
}

impl fmt::Display for ProfileSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Summary: {} ---", self.profile)?;
        writeln!(f, "Turbines:              {}", self.turbine_count)?;
        writeln!(f, "Steps:                 {}", self.steps)?;
        writeln!(f, "Load:                  {:.3} MWh", self.load_mwh)?;
        writeln!(f, "Turbine generation:    {:.3} MWh", self.generation_mwh)?;
        writeln!(f, "Fleet generation:      {:.3} MWh", self.fleet_generation_mwh)?;
        writeln!(f, "Fleet market value:    {:.2} €", self.fleet_market_value)?;
        match self.capture_price {
            Some(p) => writeln!(f, "Capture price:         {p:.2} €/MWh")?,
            None => writeln!(f, "Capture price:         n/a")?,
        }
        writeln!(f, "Surplus:               {:.3} MWh", self.surplus_mwh)?;
        writeln!(f, "Deficit:               {:.3} MWh", self.deficit_mwh)?;
        write!(
            f,
            "{:>10}  {:>16}  {:>16}  {:>14}",
            "multiplier", "as-is (€)", "with PPA (€)", "savings (€)"
        )?;
        for s in &self.scenarios {
            write!(
                f,
                "\n{:>10}  {:>16.2}  {:>16.2}  {:>14.2}",
                multiplier_label(s.multiplier),
                s.as_is,
                s.with_ppa,
                s.savings()
            )?;
        }
        Ok(())
    }
}
