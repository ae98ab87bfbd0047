pub mod config;
pub mod generate;
pub mod info;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use bbr_platform::{InvokeError, Powercfg, ReportKind};
use bbr_report::{BatteryReport, ReportError};
use color_eyre::eyre::{Report, Result};
use color_eyre::Section;
use tracing::{debug, info};

use crate::config::{scratch_report_path, UserConfig};

/// Run powercfg into `output`, turning failures into a report with a hint.
fn run_powercfg(config: &UserConfig, output: &Path, kind: ReportKind) -> Result<()> {
    bbr_platform::ensure_supported().map_err(tool_error)?;

    let powercfg = Powercfg::new().with_timeout(config.report.timeout());
    debug!(
        timeout = %humantime::format_duration(powercfg.timeout()),
        ?kind,
        "Invoking powercfg"
    );
    let started = Instant::now();
    powercfg.generate(output, kind).map_err(tool_error)?;

    info!(
        path = %output.display(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "powercfg finished"
    );
    Ok(())
}

fn tool_error(err: InvokeError) -> Report {
    let hint = match &err {
        InvokeError::NotFound { .. } => {
            "powercfg ships with Windows; check that C:\\Windows\\System32 is on PATH"
        }
        InvokeError::PermissionDenied { .. } => {
            "Run the command again from an elevated (Run as administrator) terminal"
        }
        InvokeError::Timeout { .. } => "Raise report.timeout in the config file (`bbr config --edit`)",
        InvokeError::Unsupported { .. } => {
            "Copy an XML report from a Windows machine and pass it with --from"
        }
        _ => "Run `powercfg /batteryreport /xml` by hand to see what Windows reports",
    };
    Report::new(err)
        .wrap_err("Could not generate the battery report")
        .suggestion(hint)
}

/// Parse the XML report at `path`.
fn load_report(path: &Path) -> Result<BatteryReport> {
    BatteryReport::from_path(path).map_err(|err| {
        let hint = match &err {
            ReportError::Io { .. } => "Check the path of the XML report",
            e if e.is_syntax_error() => {
                "The file is truncated or not XML; regenerate it with `powercfg /batteryreport /xml`"
            }
            _ => "Only reports written by `powercfg /batteryreport /xml` are understood",
        };
        Report::new(err)
            .wrap_err(format!(
                "Could not understand the battery report at {}",
                path.display()
            ))
            .suggestion(hint)
    })
}

/// The report behind `info` and `generate`: parsed from `from` when given,
/// otherwise freshly generated into the scratch location and cleaned up.
fn obtain_report(from: Option<PathBuf>, config: &UserConfig) -> Result<BatteryReport> {
    if let Some(path) = from {
        return load_report(&path);
    }

    let path = scratch_report_path();
    run_powercfg(config, &path, ReportKind::Xml)?;
    let report = load_report(&path);
    if let Err(e) = fs::remove_file(&path) {
        debug!(path = %path.display(), error = %e, "Could not remove scratch report");
    }
    report
}
