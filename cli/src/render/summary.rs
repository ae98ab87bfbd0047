use std::io::{self, Write};

use bbr_report::{BatteryReport, SeriesSummary};

pub const SCAN_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Plain-text battery summary as printed by `bbr info`.
pub fn write_summary(
    out: &mut impl Write,
    report: &BatteryReport,
    history: Option<&SeriesSummary>,
) -> io::Result<()> {
    writeln!(out, "Computer Name: {}", report.computer_name())?;
    writeln!(out, "Scan Time: {}", report.scan_time.format(SCAN_TIME_FORMAT))?;
    writeln!(out, "Design Capacity: {} mWh", report.design_capacity_mwh)?;
    writeln!(
        out,
        "Full Charge Capacity: {} mWh",
        report.full_charge_capacity_mwh
    )?;
    writeln!(out, "Battery Health: {:.1}%", report.health_percent())?;

    for battery in &report.batteries {
        if let Some(cycles) = battery.cycle_count {
            let name = if battery.id.is_empty() {
                "Battery"
            } else {
                battery.id.as_str()
            };
            writeln!(out, "Cycle Count ({}): {}", name, cycles)?;
        }
    }

    match history {
        Some(h) => writeln!(
            out,
            "Capacity History: {} {} ({} to {}), health {:.1}% -> {:.1}% ({:+.1} points), full charge {}-{} mWh",
            h.days,
            if h.days == 1 { "day" } else { "days" },
            h.first_date,
            h.last_date,
            h.first_health_percent,
            h.last_health_percent,
            h.health_change(),
            h.min_full_charge_mwh,
            h.max_full_charge_mwh
        )?,
        None => writeln!(out, "Capacity History: none recorded")?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use bbr_report::{BatteryInfo, CapacityHistoryEntry, SystemInformation};
    use chrono::NaiveDate;

    use super::*;

    fn sample_report() -> BatteryReport {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        BatteryReport {
            system: SystemInformation {
                computer_name: "DESK-1234".to_string(),
                ..Default::default()
            },
            scan_time: day.and_hms_opt(10, 0, 0).unwrap(),
            design_capacity_mwh: 50000,
            full_charge_capacity_mwh: 48000,
            batteries: vec![BatteryInfo {
                id: "BAT-01".to_string(),
                cycle_count: Some(87),
                ..Default::default()
            }],
            history: vec![CapacityHistoryEntry {
                date: day,
                full_charge_capacity_mwh: 48000,
                design_capacity_mwh: 50000,
                cycle_count: None,
            }],
        }
    }

    fn render(report: &BatteryReport, history: Option<&SeriesSummary>) -> String {
        let mut out = Vec::new();
        write_summary(&mut out, report, history).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_summary_contains_core_values() {
        let report = sample_report();
        let series = report.capacity_series().unwrap();
        let text = render(&report, SeriesSummary::from_series(&series).as_ref());

        assert!(text.contains("Computer Name: DESK-1234"));
        assert!(text.contains("Scan Time: 2024-01-15T10:00:00"));
        assert!(text.contains("Design Capacity: 50000 mWh"));
        assert!(text.contains("Full Charge Capacity: 48000 mWh"));
        assert!(text.contains("Battery Health: 96.0%"));
        assert!(text.contains("Cycle Count (BAT-01): 87"));
        assert!(text.contains("Capacity History: 1 day (2024-01-15 to 2024-01-15)"));
        assert!(text.contains("health 96.0% -> 96.0% (+0.0 points), full charge 48000-48000 mWh"));
    }

    #[test]
    fn test_summary_without_history() {
        let mut report = sample_report();
        report.history.clear();
        report.batteries.clear();
        let text = render(&report, None);

        assert!(text.contains("Capacity History: none recorded"));
        assert!(!text.contains("Cycle Count"));
        assert_eq!(text.lines().count(), 6);
    }
}
