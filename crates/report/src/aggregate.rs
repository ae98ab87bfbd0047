//! Folding of the raw capacity history into a chart-ready series.
//!
//! Windows appends a fresh row every time it rescans, so the same calendar day
//! can show up several times. The last row for a day wins: the result depends
//! on input order, which is intended since later rows are newer measurements.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::error::AggregateError;
use crate::types::{health_percent, BatteryReport, CapacityHistoryEntry, CapacitySeriesPoint};

/// Deduplicate `entries` by date (last occurrence wins) and return them in
/// ascending date order with the health percentage filled in.
pub fn aggregate(
    entries: &[CapacityHistoryEntry],
) -> Result<Vec<CapacitySeriesPoint>, AggregateError> {
    let mut by_day: BTreeMap<NaiveDate, &CapacityHistoryEntry> = BTreeMap::new();
    for entry in entries {
        by_day.insert(entry.date, entry);
    }

    if by_day.len() < entries.len() {
        debug!(
            raw = entries.len(),
            unique_days = by_day.len(),
            "Merged duplicate capacity history rows"
        );
    }

    by_day
        .into_values()
        .map(|entry| {
            if entry.design_capacity_mwh <= 0 {
                return Err(AggregateError::NonPositiveDesignCapacity {
                    date: entry.date,
                    design_capacity_mwh: entry.design_capacity_mwh,
                });
            }

            Ok(CapacitySeriesPoint {
                date: entry.date,
                full_charge_capacity_mwh: entry.full_charge_capacity_mwh,
                design_capacity_mwh: entry.design_capacity_mwh,
                health_percent: health_percent(
                    entry.full_charge_capacity_mwh,
                    entry.design_capacity_mwh,
                ),
            })
        })
        .collect()
}

impl BatteryReport {
    /// Capacity history as a deduplicated, date-ordered series.
    pub fn capacity_series(&self) -> Result<Vec<CapacitySeriesPoint>, AggregateError> {
        aggregate(&self.history)
    }
}

/// Headline numbers over a capacity series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesSummary {
    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
    pub days: usize,
    pub first_health_percent: f64,
    pub last_health_percent: f64,
    pub min_full_charge_mwh: i64,
    pub max_full_charge_mwh: i64,
}

impl SeriesSummary {
    /// `None` for an empty series.
    pub fn from_series(series: &[CapacitySeriesPoint]) -> Option<Self> {
        let first = series.first()?;
        let last = series.last()?;

        let (min, max) = series.iter().fold((i64::MAX, i64::MIN), |(min, max), p| {
            (
                min.min(p.full_charge_capacity_mwh),
                max.max(p.full_charge_capacity_mwh),
            )
        });

        Some(Self {
            first_date: first.date,
            last_date: last.date,
            days: series.len(),
            first_health_percent: first.health_percent,
            last_health_percent: last.health_percent,
            min_full_charge_mwh: min,
            max_full_charge_mwh: max,
        })
    }

    /// Percentage points of health lost between the first and last point.
    pub fn health_change(&self) -> f64 {
        self.last_health_percent - self.first_health_percent
    }
}
