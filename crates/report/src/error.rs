use std::path::PathBuf;

use chrono::NaiveDate;

/// Errors raised while turning a report document into a [`crate::BatteryReport`].
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("battery report is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("battery report is missing or has an invalid `{field}`: {reason}")]
    Malformed { field: &'static str, reason: String },

    #[error("failed to read battery report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReportError {
    pub(crate) fn missing(field: &'static str) -> Self {
        ReportError::Malformed {
            field,
            reason: "element not found".to_string(),
        }
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ReportError::Malformed {
            field,
            reason: reason.into(),
        }
    }

    /// True when the document itself could not be read as XML.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, ReportError::Xml(_))
    }
}

/// Errors raised while folding the capacity history into a series.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AggregateError {
    #[error("design capacity for {date} is {design_capacity_mwh} mWh, cannot compute health")]
    NonPositiveDesignCapacity {
        date: NaiveDate,
        design_capacity_mwh: i64,
    },
}
