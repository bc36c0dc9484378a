//! CSV readers for weather, price, load and power-curve inputs.
//!
//! Timestamps are RFC 3339 strings (e.g. `2019-01-01T00:00:00Z`). Headers are
//! matched by name, so column order is free.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use serde::Deserialize;

use crate::error::{Result, SimError};
use crate::sim::align::LoadUnit;
use crate::sim::types::{LoadSample, PriceSample, Timestamp, WeatherSample};
use crate::turbine::{CurvePoint, PowerCurve};

#[derive(Debug, Deserialize)]
struct LoadRecord {
    timestamp: Timestamp,
    load: f64,
}

#[derive(Debug, Deserialize)]
struct CurveRecord {
    wind_speed: f64,
    power: f64,
}

fn open(path: &Path) -> Result<BufReader<File>> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| SimError::Read {
            path: path.to_path_buf(),
            source,
        })
}

fn read_records<T, R>(reader: R) -> Result<Vec<T>>
where
    T: for<'de> Deserialize<'de>,
    R: Read,
{
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut out = Vec::new();
    for record in rdr.deserialize() {
        out.push(record?);
    }
    Ok(out)
}

/// Reads `timestamp,wind_speed,roughness_length` rows.
///
/// # Errors
///
/// Returns [`SimError::Csv`] for malformed rows.
pub fn read_weather(reader: impl Read) -> Result<Vec<WeatherSample>> {
    read_records(reader)
}

/// Reads a weather CSV file.
///
/// # Errors
///
/// Returns [`SimError::Read`] if the file cannot be opened, otherwise as
/// [`read_weather`].
pub fn read_weather_file(path: &Path) -> Result<Vec<WeatherSample>> {
    read_weather(open(path)?)
}

/// Reads `timestamp,price` rows (€/MWh).
///
/// # Errors
///
/// Returns [`SimError::Csv`] for malformed rows.
pub fn read_prices(reader: impl Read) -> Result<Vec<PriceSample>> {
    read_records(reader)
}

/// Reads a price CSV file.
///
/// # Errors
///
/// Returns [`SimError::Read`] if the file cannot be opened, otherwise as
/// [`read_prices`].
pub fn read_prices_file(path: &Path) -> Result<Vec<PriceSample>> {
    read_prices(open(path)?)
}

/// Reads `timestamp,load` rows and converts them to kWh per step.
///
/// # Arguments
///
/// * `reader` - CSV source
/// * `unit` - Unit of the `load` column
/// * `step_hours` - Step duration, used by [`LoadUnit::AverageKw`]
///
/// # Errors
///
/// Returns [`SimError::Csv`] for malformed rows.
pub fn read_load(reader: impl Read, unit: LoadUnit, step_hours: f64) -> Result<Vec<LoadSample>> {
    let records: Vec<LoadRecord> = read_records(reader)?;
    Ok(records
        .into_iter()
        .map(|r| LoadSample {
            timestamp: r.timestamp,
            load_kwh: unit.to_kwh(r.load, step_hours),
        })
        .collect())
}

/// Reads a load CSV file.
///
/// # Errors
///
/// Returns [`SimError::Read`] if the file cannot be opened, otherwise as
/// [`read_load`].
pub fn read_load_file(path: &Path, unit: LoadUnit, step_hours: f64) -> Result<Vec<LoadSample>> {
    read_load(open(path)?, unit, step_hours)
}

/// Reads `wind_speed,power` rows (m/s, W) into a validated curve.
///
/// # Errors
///
/// Returns [`SimError::Csv`] for malformed rows and [`SimError::InvalidSpec`]
/// if the curve itself is invalid.
pub fn read_power_curve(reader: impl Read) -> Result<PowerCurve> {
    let records: Vec<CurveRecord> = read_records(reader)?;
    PowerCurve::new(
        records
            .into_iter()
            .map(|r| CurvePoint {
                wind_speed: r.wind_speed,
                power_w: r.power,
            })
            .collect(),
    )
}

/// Reads a power-curve CSV file.
///
/// # Errors
///
/// Returns [`SimError::Read`] if the file cannot be opened, otherwise as
/// [`read_power_curve`].
pub fn read_power_curve_file(path: &Path) -> Result<PowerCurve> {
    read_power_curve(open(path)?)
}
