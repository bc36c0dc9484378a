use crate::error::{Result, SimError};

use super::power_curve::{PowerCurve, RotorParameters, TurbineSpec};

/// Names accepted by [`by_name`].
pub const MODELS: &[&str] = &["generic_3mw", "rotor_110m"];

/// Generic 3 MW onshore machine on a 120 m tower.
const GENERIC_3MW_CURVE: &[(f64, f64)] = &[
    (3.0, 40_000.0),
    (4.0, 150_000.0),
    (5.0, 320_000.0),
    (6.0, 560_000.0),
    (7.0, 900_000.0),
    (8.0, 1_350_000.0),
    (9.0, 1_880_000.0),
    (10.0, 2_420_000.0),
    (11.0, 2_840_000.0),
    (12.0, 3_000_000.0),
    (25.0, 3_000_000.0),
];

/// Returns the generic 3 MW reference turbine.
///
/// # Errors
///
/// Never fails for the built-in table; the `Result` mirrors [`TurbineSpec::new`].
pub fn generic_3mw() -> Result<TurbineSpec> {
    TurbineSpec::new("generic_3mw", 120.0, PowerCurve::from_pairs(GENERIC_3MW_CURVE)?)
}

/// Returns a turbine sampled from the cubic model with a 110 m rotor radius.
///
/// # Errors
///
/// Never fails for the built-in parameters.
pub fn rotor_110m() -> Result<TurbineSpec> {
    TurbineSpec::from_rotor("rotor_110m", 135.0, &RotorParameters::default())
}

/// Looks up a built-in turbine by name.
///
/// # Errors
///
/// Returns [`SimError::InvalidSpec`] for an unknown name.
pub fn by_name(name: &str) -> Result<TurbineSpec> {
    match name {
        "generic_3mw" => generic_3mw(),
        "rotor_110m" => rotor_110m(),
        _ => Err(SimError::InvalidSpec(format!(
            "unknown turbine model \"{name}\", available: {}",
            MODELS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_models_load() {
        for name in MODELS {
            let spec = by_name(name);
            assert!(spec.is_ok(), "model \"{name}\" should load: {spec:?}");
        }
    }

    #[test]
    fn generic_is_three_megawatt() {
        let spec = generic_3mw().unwrap();
        assert_eq!(spec.rated_power_w(), 3_000_000.0);
        assert_eq!(spec.hub_height_m, 120.0);
    }

    #[test]
    fn unknown_model_is_rejected() {
        let err = by_name("bogus").unwrap_err();
        assert!(err.to_string().contains("unknown turbine model"));
    }
}
