//! CSV export for scenario result rows.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use chrono::SecondsFormat;

use crate::error::Result;
use crate::sim::scenario::MultiplierGrid;
use crate::sim::types::ScenarioResult;

/// Fixed leading columns of the persisted result table.
const BASE_HEADER: &str = "timestamp,profile_id,sector_group_id,sector_group,plz,nuts_id,\
                           wind_speed,roughness_length,price,actual_power(w),actual_power(mwh),\
                           fleet_power(mwh),market_value(€),fleet_market_value(€),\
                           load(kwh),load(mwh),ppa_surplus(mwh)";

/// Full header: the fixed columns, then one as-is and one with-PPA column per
/// multiplier in grid order.
pub fn header(grid: &MultiplierGrid) -> Vec<String> {
    BASE_HEADER
        .split(',')
        .map(str::to_string)
        .chain(grid.column_labels())
        .collect()
}

/// Exports result rows to a CSV file at the given path.
///
/// Values are written in their shortest round-trip form, so sums over the
/// file equal sums over the in-memory rows.
///
/// # Arguments
///
/// * `rows` - Result rows in output order
/// * `grid` - Multiplier grid the rows were computed with
/// * `path` - Output file path
///
/// # Errors
///
/// Returns [`crate::SimError::Io`] or [`crate::SimError::Csv`] if file
/// creation or writing fails.
pub fn export_csv(rows: &[ScenarioResult], grid: &MultiplierGrid, path: &Path) -> Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(rows, grid, buf)
}

/// Writes result rows as CSV to any writer.
///
/// # Errors
///
/// Returns [`crate::SimError::Csv`] if writing fails.
pub fn write_csv(rows: &[ScenarioResult], grid: &MultiplierGrid, writer: impl Write) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(header(grid))?;

    for r in rows {
        let p = &r.profile;
        let mut record = vec![
            r.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true),
            p.profile_id.to_string(),
            p.sector_group_id.to_string(),
            p.sector_group.clone(),
            p.plz.clone(),
            p.nuts_id.clone(),
            r.wind_speed.to_string(),
            r.roughness_length.to_string(),
            r.price.to_string(),
            r.power_w.to_string(),
            r.power_mwh.to_string(),
            r.fleet_power_mwh.to_string(),
            r.market_value.to_string(),
            r.fleet_market_value.to_string(),
            r.load_kwh.to_string(),
            r.load_mwh.to_string(),
            r.ppa_surplus_mwh.to_string(),
        ];
        for c in &r.scenarios {
            record.push(c.as_is.to_string());
            record.push(c.with_ppa.to_string());
        }
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}
