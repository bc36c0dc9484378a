//! Wind power-purchase-agreement cost simulator for German industrial consumers.
//!
//! For every step of a historical period the engine turns wind, spot price and
//! load into turbine output, market value, surplus, and a matrix of as-is
//! versus with-PPA costs across a price-multiplier sweep.

/// Read-only HTTP access to run results.
#[cfg(feature = "api")]
pub mod api;
/// Command-line arguments.
pub mod cli;
pub mod config;
pub mod error;
/// CSV import and export.
pub mod io;
pub mod runner;
/// Simulation engine and its per-step components.
pub mod sim;
pub mod synthetic;
pub mod telemetry;
/// Turbine power curves and wind extrapolation.
pub mod turbine;

pub use error::{Result, SimError};
