//! Typed access to the battery report produced by `powercfg /batteryreport /xml`.
//!
//! The crate turns the XML document written by Windows into a [`BatteryReport`]
//! and folds its capacity history into a chart-ready series.
//!
//! # Example
//!
//! ```
//! use bbr_report::BatteryReport;
//!
//! let xml = r#"
//! <BatteryReport xmlns="http://schemas.microsoft.com/battery/2012">
//!   <ReportInformation><LocalScanTime>2024-01-15T10:00:00</LocalScanTime></ReportInformation>
//!   <SystemInformation><ComputerName>DESK-1234</ComputerName></SystemInformation>
//!   <RuntimeEstimates>
//!     <FullChargeCapacity><Capacity>48000</Capacity></FullChargeCapacity>
//!     <DesignCapacity><Capacity>50000</Capacity></DesignCapacity>
//!   </RuntimeEstimates>
//!   <History>
//!     <HistoryEntry LocalStartDate="2024-01-15T00:00:00" FullChargeCapacity="48000" DesignCapacity="50000" />
//!   </History>
//! </BatteryReport>"#;
//!
//! let report = BatteryReport::from_xml(xml)?;
//! let series = report.capacity_series()?;
//! assert_eq!(series.len(), 1);
//! assert_eq!(series[0].health_percent, 96.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod aggregate;
mod error;
mod parser;
mod timestamp;
mod types;

pub use aggregate::{aggregate, SeriesSummary};
pub use error::{AggregateError, ReportError};
pub use timestamp::{parse_date, parse_timestamp};
pub use types::{
    BatteryInfo, BatteryReport, CapacityHistoryEntry, CapacitySeriesPoint, SystemInformation,
};

/// XML namespace used by every report version shipped so far.
pub const REPORT_NAMESPACE: &str = "http://schemas.microsoft.com/battery/2012";
