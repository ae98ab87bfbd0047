use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Identity of the machine the report was generated on.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SystemInformation {
    pub computer_name: String,
    pub manufacturer: Option<String>,
    pub product_name: Option<String>,
    pub bios_version: Option<String>,
    pub os_build: Option<String>,
}

/// One installed battery pack as listed under `<Batteries>`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct BatteryInfo {
    pub id: String,
    pub manufacturer: Option<String>,
    pub chemistry: Option<String>,
    pub design_capacity_mwh: Option<i64>,
    pub full_charge_capacity_mwh: Option<i64>,
    pub cycle_count: Option<u32>,
}

/// A single row of the report's capacity history.
///
/// Rows are kept in document order. Windows does not promise that dates are
/// unique or sorted, see [`crate::aggregate`] for how they are folded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapacityHistoryEntry {
    pub date: NaiveDate,
    pub full_charge_capacity_mwh: i64,
    /// Design capacity recorded for the period. Inherits the report-level
    /// value when the row leaves it out.
    pub design_capacity_mwh: i64,
    pub cycle_count: Option<u32>,
}

/// One point of the deduplicated, date-ordered capacity series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CapacitySeriesPoint {
    pub date: NaiveDate,
    pub full_charge_capacity_mwh: i64,
    pub design_capacity_mwh: i64,
    /// Full-charge capacity as a percentage of design capacity. Not clamped:
    /// a fresh or replaced pack can legitimately read above 100.
    pub health_percent: f64,
}

/// Parsed battery report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatteryReport {
    pub system: SystemInformation,
    /// Local wall-clock time of the scan.
    pub scan_time: NaiveDateTime,
    pub design_capacity_mwh: i64,
    pub full_charge_capacity_mwh: i64,
    pub batteries: Vec<BatteryInfo>,
    pub history: Vec<CapacityHistoryEntry>,
}

impl BatteryReport {
    pub fn computer_name(&self) -> &str {
        &self.system.computer_name
    }

    /// Current full-charge capacity relative to design capacity.
    pub fn health_percent(&self) -> f64 {
        health_percent(self.full_charge_capacity_mwh, self.design_capacity_mwh)
    }
}

pub(crate) fn health_percent(full_charge_mwh: i64, design_mwh: i64) -> f64 {
    100.0 * full_charge_mwh as f64 / design_mwh as f64
}
