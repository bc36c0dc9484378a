//! Turbine reference data and the single-turbine power model.

/// Built-in turbine specifications selectable by name.
pub mod catalog;
pub mod power_curve;
/// Logarithmic hub-height wind extrapolation.
pub mod wind_profile;

pub use power_curve::{
    CurvePoint, PowerCurve, PowerCurveModel, RotorParameters, TurbineSpec, energy_mwh,
};
pub use wind_profile::WindProfile;
