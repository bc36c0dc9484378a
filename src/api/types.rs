//! API response and query types.
//!
//! Result field names follow the CSV export columns where JSON allows it.

use serde::{Deserialize, Serialize};

use crate::sim::kpi::ProfileSummary;
use crate::sim::types::{ScenarioCost, ScenarioResult, Timestamp};

/// Run parameters and per-profile totals.
#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub turbine: String,
    pub ppa_price: f64,
    pub multipliers: Vec<f64>,
    pub profiles: Vec<ProfileSummary>,
}

/// One result row.
#[derive(Debug, Serialize)]
pub struct ResultRecord {
    pub timestamp: Timestamp,
    pub profile_id: u32,
    pub sector_group_id: u32,
    pub sector_group: String,
    pub plz: String,
    pub nuts_id: String,
    pub wind_speed: f64,
    pub roughness_length: f64,
    pub price: f64,
    pub actual_power_w: f64,
    pub actual_power_mwh: f64,
    pub fleet_power_mwh: f64,
    pub market_value: f64,
    pub fleet_market_value: f64,
    pub load_kwh: f64,
    pub load_mwh: f64,
    pub ppa_surplus_mwh: f64,
    pub scenarios: Vec<ScenarioCost>,
}

impl From<&ScenarioResult> for ResultRecord {
    fn from(r: &ScenarioResult) -> Self {
        Self {
            timestamp: r.timestamp,
            profile_id: r.profile.profile_id,
            sector_group_id: r.profile.sector_group_id,
            sector_group: r.profile.sector_group.clone(),
            plz: r.profile.plz.clone(),
            nuts_id: r.profile.nuts_id.clone(),
            wind_speed: r.wind_speed,
            roughness_length: r.roughness_length,
            price: r.price,
            actual_power_w: r.power_w,
            actual_power_mwh: r.power_mwh,
            fleet_power_mwh: r.fleet_power_mwh,
            market_value: r.market_value,
            fleet_market_value: r.fleet_market_value,
            load_kwh: r.load_kwh,
            load_mwh: r.load_mwh,
            ppa_surplus_mwh: r.ppa_surplus_mwh,
            scenarios: r.scenarios.clone(),
        }
    }
}

/// Optional filters for the results endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct ResultsQuery {
    /// Only rows of this profile.
    pub profile_id: Option<u32>,
    /// Start timestamp (inclusive).
    pub from: Option<Timestamp>,
    /// End timestamp (inclusive).
    pub to: Option<Timestamp>,
}

/// Error response body for 400-class errors.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::sim::types::ProfileMeta;

    #[test]
    fn record_from_result_maps_fields() {
        let row = ScenarioResult {
            timestamp: Utc.with_ymd_and_hms(2019, 1, 1, 5, 0, 0).unwrap(),
            profile: Arc::new(ProfileMeta {
                profile_id: 3,
                sector_group_id: 20,
                sector_group: "Chemicals".into(),
                plz: "06749".into(),
                nuts_id: "DEE05".into(),
            }),
            wind_speed: 8.0,
            roughness_length: 0.1,
            price: 50.0,
            power_w: 1e6,
            power_mwh: 1.0,
            fleet_power_mwh: 2.0,
            market_value: 50.0,
            fleet_market_value: 100.0,
            load_kwh: 1500.0,
            load_mwh: 1.5,
            ppa_surplus_mwh: 0.5,
            scenarios: vec![ScenarioCost {
                multiplier: 1.0,
                as_is: 75.0,
                with_ppa: 67.5,
            }],
        };
        let record = ResultRecord::from(&row);
        assert_eq!(record.profile_id, 3);
        assert_eq!(record.nuts_id, "DEE05");
        assert_eq!(record.actual_power_w, 1e6); // power_w
        assert_eq!(record.ppa_surplus_mwh, 0.5);
        assert_eq!(record.scenarios[0].with_ppa, 67.5);
    }
}
