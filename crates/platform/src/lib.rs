//! Operating-system side of bbr.
//!
//! This crate wraps the `powercfg /batteryreport` tool that ships with
//! Windows and the desktop's "open with default application" action.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use bbr_platform::{ensure_supported, Powercfg, ReportKind};
//!
//! ensure_supported()?;
//! Powercfg::new().generate(Path::new("reports/battery.xml"), ReportKind::Xml)?;
//! ```

pub mod browser;
mod powercfg;

pub use powercfg::{InvokeError, Powercfg, ReportKind, DEFAULT_TIMEOUT};

/// Whether `powercfg` can be expected on this system.
pub fn is_supported() -> bool {
    cfg!(windows)
}

/// Fail with [`InvokeError::Unsupported`] anywhere but Windows.
pub fn ensure_supported() -> Result<(), InvokeError> {
    if is_supported() {
        Ok(())
    } else {
        Err(InvokeError::Unsupported {
            os: std::env::consts::OS,
        })
    }
}
