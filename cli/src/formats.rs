use std::path::{Path, PathBuf};

use bbr_platform::ReportKind;

/// Report flavours `bbr generate` can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// Interactive capacity-history chart rendered by bbr.
    #[default]
    Better,
    /// The HTML page powercfg renders itself.
    Default,
    /// The raw XML document.
    Raw,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "better" => Some(ReportFormat::Better),
            "default" | "windows" => Some(ReportFormat::Default),
            "raw" | "xml" => Some(ReportFormat::Raw),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ReportFormat::Better => "better",
            ReportFormat::Default => "default",
            ReportFormat::Raw => "raw",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Better => "html",
            ReportFormat::Default | ReportFormat::Raw => self.report_kind().extension(),
        }
    }

    /// What powercfg has to be asked for.
    pub fn report_kind(&self) -> ReportKind {
        match self {
            ReportFormat::Better | ReportFormat::Raw => ReportKind::Xml,
            ReportFormat::Default => ReportKind::Html,
        }
    }

    /// Whether the XML has to be parsed into a report.
    pub fn needs_report(&self) -> bool {
        matches!(self, ReportFormat::Better)
    }

    pub fn browser_viewable(&self) -> bool {
        matches!(self, ReportFormat::Better | ReportFormat::Default)
    }

    /// `path` with this format's extension.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        path.with_extension(self.extension())
    }
}
