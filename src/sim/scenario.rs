//! Price-multiplier scenario matrix: as-is versus with-PPA costs.
//!
//! For every step and every multiplier `m` of the grid:
//!
//! - `as_is(m) = load_mwh * price * m`
//! - `with_ppa(m) = load_mwh * ppa_price * m` when the fleet covers the load
//!   (`surplus >= 0`), otherwise
//!   `(fleet_mwh * ppa_price + |surplus| * price) * m`.

use serde::Serialize;

use crate::error::{Result, SimError};

use super::types::ScenarioCost;

/// Default price-multiplier sweep.
pub const DEFAULT_MULTIPLIERS: [f64; 7] = [0.90, 0.95, 0.98, 1.00, 1.02, 1.05, 1.10];

/// Upper bound on the values of a stepped grid.
pub const MAX_GRID_STEPS: usize = 10_000;

/// Ordered, non-empty set of positive price multipliers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiplierGrid {
    values: Vec<f64>,
}

impl Default for MultiplierGrid {
    fn default() -> Self {
        Self {
            values: DEFAULT_MULTIPLIERS.to_vec(),
        }
    }
}

impl MultiplierGrid {
    /// Builds a grid from explicit multipliers, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the grid is empty, contains a
    /// non-finite or non-positive value, or two values share a column label.
    pub fn new(values: Vec<f64>) -> Result<Self> {
        if values.is_empty() {
            return Err(SimError::Config("multiplier grid must not be empty".into()));
        }
        if let Some(bad) = values.iter().find(|m| !m.is_finite() || **m <= 0.0) {
            return Err(SimError::Config(format!(
                "multipliers must be finite and > 0, got {bad}"
            )));
        }
        let mut labels: Vec<String> = values.iter().map(|&m| multiplier_label(m)).collect();
        labels.sort();
        if let Some(pair) = labels.windows(2).find(|w| w[0] == w[1]) {
            return Err(SimError::Config(format!(
                "multiplier {} appears more than once",
                pair[0]
            )));
        }
        Ok(Self { values })
    }

    /// Builds `lo, lo + step, ...` up to and including `hi`.
    ///
    /// Values are rounded to nine decimals so accumulated float error does
    /// not leak into column labels.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] unless `0 < lo <= hi` and `step > 0`, or
    /// when the grid would exceed [`MAX_GRID_STEPS`] values.
    pub fn stepped(lo: f64, hi: f64, step: f64) -> Result<Self> {
        if !(lo > 0.0 && hi >= lo && step > 0.0 && hi.is_finite() && step.is_finite()) {
            return Err(SimError::Config(format!(
                "stepped grid needs 0 < lo <= hi and step > 0, got {lo}..{hi} by {step}"
            )));
        }
        let steps = ((hi - lo) / step + 1e-9).floor();
        if steps >= MAX_GRID_STEPS as f64 {
            return Err(SimError::Config(format!(
                "stepped grid {lo}..{hi} by {step} exceeds {MAX_GRID_STEPS} multipliers"
            )));
        }
        let n = steps as usize;
        let values = (0..=n)
            .map(|i| ((lo + i as f64 * step) * 1e9).round() / 1e9)
            .collect();
        Self::new(values)
    }

    /// Multipliers in grid order.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Number of multipliers.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false` for a constructed grid.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Output column names, as-is then with-PPA for each multiplier.
    pub fn column_labels(&self) -> Vec<String> {
        self.values
            .iter()
            .flat_map(|&m| {
                let label = multiplier_label(m);
                [
                    format!("scenario_as_is_{label}(€)"),
                    format!("scenario_with_ppa_{label}(€)"),
                ]
            })
            .collect()
    }
}

/// Renders a multiplier with two decimals, or more when two would lose precision.
pub fn multiplier_label(m: f64) -> String {
    let fixed = format!("{m:.2}");
    if fixed.parse::<f64>() == Ok(m) {
        fixed
    } else {
        format!("{m}")
    }
}

/// Cost of buying the whole load at the scaled spot price.
pub fn scenario_as_is(load_mwh: f64, price: f64, multiplier: f64) -> f64 {
    load_mwh * price * multiplier
}

/// Cost under the PPA at one step.
///
/// A zero surplus counts as covered: nothing is bought at spot.
pub fn scenario_with_ppa(
    load_mwh: f64,
    fleet_mwh: f64,
    surplus_mwh: f64,
    price: f64,
    ppa_price: f64,
    multiplier: f64,
) -> f64 {
    if surplus_mwh >= 0.0 {
        load_mwh * ppa_price * multiplier
    } else {
        (fleet_mwh * ppa_price + surplus_mwh.abs() * price) * multiplier
    }
}

/// Multiplier grid bound to one PPA price for a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioMatrix {
    grid: MultiplierGrid,
    ppa_price: f64,
}

impl ScenarioMatrix {
    /// Binds a grid to a fixed PPA price.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for a non-finite PPA price.
    pub fn new(grid: MultiplierGrid, ppa_price: f64) -> Result<Self> {
        if !ppa_price.is_finite() {
            return Err(SimError::Config(format!(
                "PPA price must be finite, got {ppa_price}"
            )));
        }
        Ok(Self { grid, ppa_price })
    }

    pub fn grid(&self) -> &MultiplierGrid {
        &self.grid
    }

    pub fn ppa_price(&self) -> f64 {
        self.ppa_price
    }

    /// Costs for every multiplier at one step.
    pub fn costs(&self, load_mwh: f64, fleet_mwh: f64, surplus_mwh: f64, price: f64) -> Vec<ScenarioCost> {
        self.grid
            .values()
            .iter()
            .map(|&m| ScenarioCost {
                multiplier: m,
                as_is: scenario_as_is(load_mwh, price, m),
                with_ppa: scenario_with_ppa(load_mwh, fleet_mwh, surplus_mwh, price, self.ppa_price, m),
            })
            .collect()
    }

    /// Costs for every step of aligned series.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::SchemaMismatch`] if the four series differ in length.
    pub fn matrix(
        &self,
        load_mwh: &[f64],
        fleet_mwh: &[f64],
        surplus_mwh: &[f64],
        prices: &[f64],
    ) -> Result<Vec<Vec<ScenarioCost>>> {
        let n = load_mwh.len();
        if fleet_mwh.len() != n || surplus_mwh.len() != n || prices.len() != n {
            return Err(SimError::SchemaMismatch(format!(
                "scenario inputs differ in length: load {n}, fleet {}, surplus {}, price {}",
                fleet_mwh.len(),
                surplus_mwh.len(),
                prices.len()
            )));
        }
        Ok((0..n)
            .map(|t| self.costs(load_mwh[t], fleet_mwh[t], surplus_mwh[t], prices[t]))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_is_the_sweep() {
        let grid = MultiplierGrid::default();
        assert_eq!(grid.values(), &DEFAULT_MULTIPLIERS);
        assert_eq!(grid.column_labels().len(), 14);
    }

    #[test]
    fn labels_use_two_decimals() {
        assert_eq!(multiplier_label(1.0), "1.00");
        assert_eq!(multiplier_label(0.9), "0.90");
        assert_eq!(multiplier_label(0.925), "0.925");
        let grid = MultiplierGrid::new(vec![0.9, 1.1]).unwrap();
        assert_eq!(
            grid.column_labels(),
            vec![
                "scenario_as_is_0.90(€)",
                "scenario_with_ppa_0.90(€)",
                "scenario_as_is_1.10(€)",
                "scenario_with_ppa_1.10(€)",
            ]
        );
    }

    #[test]
    fn grid_rejects_bad_values() {
        assert!(MultiplierGrid::new(vec![]).is_err());
        assert!(MultiplierGrid::new(vec![0.0]).is_err());
        assert!(MultiplierGrid::new(vec![f64::NAN]).is_err());
        assert!(MultiplierGrid::new(vec![1.0, 1.0]).is_err());
    }

    #[test]
    fn tiny_step_is_rejected_not_allocated() {
        let err = MultiplierGrid::stepped(0.9, 1.1, 1e-300).unwrap_err();
        assert!(matches!(err, SimError::Config(_)), "{err}");
        assert!(MultiplierGrid::stepped(0.5, 1.5, 1e-5).is_err());
        assert!(MultiplierGrid::stepped(0.5, 1.5, 1e-3).is_ok());
    }

    #[test]
    fn stepped_grid_includes_both_ends() {
        let grid = MultiplierGrid::stepped(0.9, 1.1, 0.05).unwrap();
        assert_eq!(grid.values(), &[0.9, 0.95, 1.0, 1.05, 1.1]);
    }

    #[test]
    fn covered_load_is_billed_at_ppa_price() {
        let cost = scenario_with_ppa(1.5, 2.0, 0.5, 50.0, 45.0, 1.0);
        assert_eq!(cost, 67.5);
        assert_eq!(scenario_as_is(1.5, 50.0, 1.0), 75.0);
    }

    #[test]
    fn deficit_is_bought_at_spot() {
        let cost = scenario_with_ppa(3.0, 2.0, -1.0, 50.0, 45.0, 1.0);
        assert_eq!(cost, 140.0);
        assert_eq!(scenario_as_is(3.0, 50.0, 1.0), 150.0);
    }

    #[test]
    fn zero_surplus_takes_covered_branch() {
        let cost = scenario_with_ppa(2.0, 2.0, 0.0, 500.0, 40.0, 1.0);
        assert_eq!(cost, 80.0);
    }

    #[test]
    fn matrix_has_one_cost_per_multiplier() {
        let matrix = ScenarioMatrix::new(MultiplierGrid::default(), 45.0).unwrap();
        let rows = matrix
            .matrix(&[1.5, 3.0], &[2.0, 2.0], &[0.5, -1.0], &[50.0, 50.0])
            .unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.len() == DEFAULT_MULTIPLIERS.len()));
        let at_one = rows[1].iter().find(|c| c.multiplier == 1.0).map(|c| c.with_ppa);
        assert_eq!(at_one, Some(140.0));
    }

    #[test]
    fn matrix_rejects_ragged_input() {
        let matrix = ScenarioMatrix::new(MultiplierGrid::default(), 45.0).unwrap();
        let err = matrix.matrix(&[1.0], &[1.0, 2.0], &[0.0], &[1.0]);
        assert!(matches!(err, Err(SimError::SchemaMismatch(_))));
    }
}
