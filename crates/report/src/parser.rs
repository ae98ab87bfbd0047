//! Mapping of the `powercfg /batteryreport /xml` document onto [`BatteryReport`].
//!
//! Elements are matched by local name only, so the report namespace and any
//! elements added by newer Windows builds are tolerated.

use std::fs;
use std::path::Path;

use roxmltree::{Document, Node};
use tracing::{debug, warn};

use crate::error::ReportError;
use crate::timestamp::{parse_date, parse_timestamp};
use crate::types::{BatteryInfo, BatteryReport, CapacityHistoryEntry, SystemInformation};
use crate::REPORT_NAMESPACE;

const ROOT_ELEMENT: &str = "BatteryReport";

impl BatteryReport {
    /// Read and parse a report file written by `powercfg`.
    pub fn from_path(path: &Path) -> Result<Self, ReportError> {
        let content = fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_xml(&content)
    }

    /// Parse report XML held in memory.
    pub fn from_xml(xml: &str) -> Result<Self, ReportError> {
        let doc = Document::parse(xml.trim_start_matches('\u{feff}'))?;
        let root = doc.root_element();

        if root.tag_name().name() != ROOT_ELEMENT {
            return Err(ReportError::invalid(
                "BatteryReport",
                format!("unexpected root element <{}>", root.tag_name().name()),
            ));
        }
        if let Some(ns) = root.tag_name().namespace() {
            if ns != REPORT_NAMESPACE {
                warn!(namespace = ns, "Unknown battery report namespace, parsing anyway");
            }
        }

        let system = parse_system_information(root)?;
        let scan_time = parse_scan_time(root)?;
        let batteries = parse_batteries(root)?;
        let design_capacity_mwh = parse_design_capacity(root, &batteries)?;
        let history = parse_history(root, design_capacity_mwh)?;
        let full_charge_capacity_mwh = parse_full_charge_capacity(root, &batteries, &history)?;

        debug!(
            computer = %system.computer_name,
            batteries = batteries.len(),
            history_entries = history.len(),
            "Parsed battery report"
        );

        Ok(BatteryReport {
            system,
            scan_time,
            design_capacity_mwh,
            full_charge_capacity_mwh,
            batteries,
            history,
        })
    }
}

fn parse_system_information(root: Node) -> Result<SystemInformation, ReportError> {
    let section =
        child(root, "SystemInformation").ok_or(ReportError::missing("SystemInformation"))?;

    let computer_name = child_text(section, "ComputerName")
        .ok_or(ReportError::missing("SystemInformation.ComputerName"))?
        .to_string();

    Ok(SystemInformation {
        computer_name,
        manufacturer: child_text(section, "SystemManufacturer").map(str::to_string),
        product_name: child_text(section, "SystemProductName").map(str::to_string),
        bios_version: child_text(section, "BIOSVersion").map(str::to_string),
        os_build: child_text(section, "OSBuild").map(str::to_string),
    })
}

fn parse_scan_time(root: Node) -> Result<chrono::NaiveDateTime, ReportError> {
    let section =
        child(root, "ReportInformation").ok_or(ReportError::missing("ReportInformation"))?;

    let raw = child_text(section, "LocalScanTime")
        .or_else(|| child_text(section, "ScanTime"))
        .ok_or(ReportError::missing("ReportInformation.LocalScanTime"))?;

    parse_timestamp(raw).ok_or_else(|| {
        ReportError::invalid(
            "ReportInformation.LocalScanTime",
            format!("unrecognised timestamp {raw:?}"),
        )
    })
}

fn parse_batteries(root: Node) -> Result<Vec<BatteryInfo>, ReportError> {
    let Some(section) = child(root, "Batteries") else {
        return Ok(Vec::new());
    };

    children(section, "Battery")
        .map(|battery| -> Result<BatteryInfo, ReportError> {
            Ok(BatteryInfo {
                id: child_text(battery, "Id").unwrap_or_default().to_string(),
                manufacturer: child_text(battery, "Manufacturer").map(str::to_string),
                chemistry: child_text(battery, "Chemistry").map(str::to_string),
                design_capacity_mwh: child_text(battery, "DesignCapacity")
                    .map(|v| parse_capacity("Battery.DesignCapacity", v))
                    .transpose()?,
                full_charge_capacity_mwh: child_text(battery, "FullChargeCapacity")
                    .map(|v| parse_capacity("Battery.FullChargeCapacity", v))
                    .transpose()?,
                cycle_count: child_text(battery, "CycleCount").and_then(|v| v.parse().ok()),
            })
        })
        .collect()
}

fn parse_design_capacity(root: Node, batteries: &[BatteryInfo]) -> Result<i64, ReportError> {
    const FIELD: &str = "RuntimeEstimates.DesignCapacity";

    let capacity = match runtime_estimate(root, "DesignCapacity") {
        Some(raw) => parse_capacity(FIELD, raw)?,
        None => sum_capacities(FIELD, batteries.iter().map(|b| b.design_capacity_mwh))?
            .ok_or(ReportError::missing(FIELD))?,
    };

    if capacity <= 0 {
        return Err(ReportError::invalid(
            FIELD,
            format!("design capacity must be positive, got {capacity}"),
        ));
    }
    Ok(capacity)
}

fn parse_full_charge_capacity(
    root: Node,
    batteries: &[BatteryInfo],
    history: &[CapacityHistoryEntry],
) -> Result<i64, ReportError> {
    const FIELD: &str = "RuntimeEstimates.FullChargeCapacity";

    if let Some(raw) = runtime_estimate(root, "FullChargeCapacity") {
        return parse_capacity(FIELD, raw);
    }

    sum_capacities(FIELD, batteries.iter().map(|b| b.full_charge_capacity_mwh))?
        .or_else(|| history.last().map(|e| e.full_charge_capacity_mwh))
        .ok_or(ReportError::missing(FIELD))
}

fn parse_history(
    root: Node,
    report_design_mwh: i64,
) -> Result<Vec<CapacityHistoryEntry>, ReportError> {
    let section = child(root, "History").ok_or(ReportError::missing("History"))?;

    children(section, "HistoryEntry")
        .enumerate()
        .map(|(index, entry)| parse_history_entry(entry, index, report_design_mwh))
        .collect()
}

fn parse_history_entry(
    entry: Node,
    index: usize,
    report_design_mwh: i64,
) -> Result<CapacityHistoryEntry, ReportError> {
    let raw_date = entry_value(entry, "LocalStartDate")
        .or_else(|| entry_value(entry, "StartDate"))
        .ok_or_else(|| {
            ReportError::invalid("HistoryEntry.StartDate", format!("entry {index} has no date"))
        })?;
    let date = parse_date(raw_date).ok_or_else(|| {
        ReportError::invalid(
            "HistoryEntry.StartDate",
            format!("entry {index} has unrecognised date {raw_date:?}"),
        )
    })?;

    let full_charge_capacity_mwh = entry_value(entry, "FullChargeCapacity")
        .ok_or_else(|| {
            ReportError::invalid(
                "HistoryEntry.FullChargeCapacity",
                format!("entry {index} has no full-charge capacity"),
            )
        })
        .and_then(|raw| parse_capacity("HistoryEntry.FullChargeCapacity", raw))?;

    // powercfg writes 0 when it has no design figure for the period
    let design_capacity_mwh = match entry_value(entry, "DesignCapacity") {
        Some(raw) => match parse_capacity("HistoryEntry.DesignCapacity", raw)? {
            0 => report_design_mwh,
            value => value,
        },
        None => report_design_mwh,
    };

    Ok(CapacityHistoryEntry {
        date,
        full_charge_capacity_mwh,
        design_capacity_mwh,
        cycle_count: entry_value(entry, "CycleCount").and_then(|v| v.parse().ok()),
    })
}

/// Capacities are emitted as plain mWh integers. Negative values are rejected.
fn parse_capacity(field: &'static str, raw: &str) -> Result<i64, ReportError> {
    let value: i64 = raw
        .trim()
        .parse()
        .map_err(|_| ReportError::invalid(field, format!("{raw:?} is not an integer")))?;

    if value < 0 {
        return Err(ReportError::invalid(
            field,
            format!("capacity cannot be negative, got {value}"),
        ));
    }
    Ok(value)
}

/// Total over the batteries that report a value, `None` when none do.
fn sum_capacities(
    field: &'static str,
    values: impl Iterator<Item = Option<i64>>,
) -> Result<Option<i64>, ReportError> {
    values.flatten().try_fold(None, |total: Option<i64>, value| match total {
        None => Ok(Some(value)),
        Some(total) => total
            .checked_add(value)
            .map(Some)
            .ok_or_else(|| ReportError::invalid(field, "capacity sum overflows")),
    })
}

/// `RuntimeEstimates/<name>/Capacity`
fn runtime_estimate<'a>(root: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(root, "RuntimeEstimates")
        .and_then(|n| child(n, name))
        .and_then(|n| child_text(n, "Capacity"))
}

fn child<'a, 'input>(node: Node<'a, 'input>, name: &str) -> Option<Node<'a, 'input>> {
    node.children()
        .find(|n| n.is_element() && n.tag_name().name() == name)
}

fn children<'a, 'input: 'a>(
    node: Node<'a, 'input>,
    name: &'a str,
) -> impl Iterator<Item = Node<'a, 'input>> + 'a {
    node.children()
        .filter(move |n| n.is_element() && n.tag_name().name() == name)
}

fn child_text<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    child(node, name)
        .and_then(|n| n.text())
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// History values are attributes in current builds; older builds used child elements.
fn entry_value<'a>(entry: Node<'a, '_>, name: &str) -> Option<&'a str> {
    entry
        .attribute(name)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .or_else(|| child_text(entry, name))
}
