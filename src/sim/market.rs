//! Spot-market valuation of generated energy.

use crate::error::{Result, SimError};
use crate::sim::types::PriceSample;

/// Market value (€) of `energy_mwh` sold at `price_per_mwh`.
pub fn value(energy_mwh: f64, price_per_mwh: f64) -> f64 {
    energy_mwh * price_per_mwh
}

/// Spot prices of a series, rejecting non-finite entries.
///
/// Negative prices are valid market outcomes; `NaN` and infinities are not.
///
/// # Errors
///
/// Returns [`SimError::InvalidInput`] naming the first bad timestamp.
pub fn price_column(prices: &[PriceSample]) -> Result<Vec<f64>> {
    prices
        .iter()
        .map(|p| {
            if p.price.is_finite() {
                Ok(p.price)
            } else {
                Err(SimError::InvalidInput(format!(
                    "spot price must be finite, got {} at {}",
                    p.price, p.timestamp
                )))
            }
        })
        .collect()
}

/// Element-wise market value of an energy series.
///
/// # Errors
///
/// Returns [`SimError::SchemaMismatch`] if the series differ in length.
pub fn value_series(energy_mwh: &[f64], prices: &[f64]) -> Result<Vec<f64>> {
    if energy_mwh.len() != prices.len() {
        return Err(SimError::SchemaMismatch(format!(
            "energy series has {} steps but price series has {}",
            energy_mwh.len(),
            prices.len()
        )));
    }
    Ok(energy_mwh
        .iter()
        .zip(prices)
        .map(|(&e, &p)| value(e, p))
        .collect())
}

/// Generation-weighted average price (€/MWh): total market value over total energy.
///
/// This is the price a wind asset actually captures on the spot market and a
/// common reference for pay-as-produced PPAs. `None` when nothing is generated.
pub fn capture_price(energy_mwh: &[f64], market_value: &[f64]) -> Option<f64> {
    let energy: f64 = energy_mwh.iter().sum();
    if energy <= 0.0 {
        return None;
    }
    Some(market_value.iter().sum::<f64>() / energy)
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn prices(values: &[f64]) -> Vec<PriceSample> {
        values
            .iter()
            .enumerate()
            .map(|(h, &price)| PriceSample {
                timestamp: Utc.with_ymd_and_hms(2019, 1, 1, h as u32, 0, 0).unwrap(),
                price,
            })
            .collect()
    }

    #[test]
    fn price_column_keeps_negative_prices() {
        assert_eq!(price_column(&prices(&[42.0, -5.5])).unwrap(), vec![42.0, -5.5]);
    }

    #[test]
    fn non_finite_price_is_rejected() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let err = price_column(&prices(&[42.0, bad])).unwrap_err();
            assert!(matches!(err, SimError::InvalidInput(_)), "{err}");
            assert!(err.to_string().contains("2019-01-01 01:00:00"), "{err}");
        }
    }

    #[test]
    fn value_is_product() {
        assert_eq!(value(2.0, 50.0), 100.0);
        assert_eq!(value(1.0, -10.0), -10.0);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = value_series(&[1.0, 2.0], &[1.0]);
        assert!(matches!(err, Err(SimError::SchemaMismatch(_))));
    }

    #[test]
    fn capture_price_weights_by_energy() {
        let energy = [1.0, 3.0];
        let values = value_series(&energy, &[20.0, 60.0]).unwrap();
        assert_eq!(capture_price(&energy, &values), Some(50.0));
    }

    #[test]
    fn capture_price_without_generation() {
        assert_eq!(capture_price(&[0.0, 0.0], &[0.0, 0.0]), None);
    }
}
