use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{warn, Level};

use bbr_platform::DEFAULT_TIMEOUT;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "off" | "none" => LogLevel::Off,
            "error" => LogLevel::Error,
            "info" => LogLevel::Info,
            "debug" => LogLevel::Debug,
            "trace" => LogLevel::Trace,
            _ => LogLevel::Warn,
        }
    }

    pub fn as_tracing_level(&self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartTheme {
    #[default]
    Dark,
    Light,
}

impl ChartTheme {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "dark" => Some(ChartTheme::Dark),
            "light" => Some(ChartTheme::Light),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ChartMetric {
    /// Design and full-charge capacity in mWh.
    #[default]
    Capacity,
    /// Full-charge capacity as a percentage of design.
    Health,
}

impl ChartMetric {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "capacity" => Some(ChartMetric::Capacity),
            "health" | "percent" => Some(ChartMetric::Health),
            _ => None,
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("./reports/battery_report.html")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    #[serde(default = "default_output")]
    pub output: PathBuf,
    pub open_browser: bool,
    /// How long powercfg may run, e.g. "90s" or "2m".
    pub timeout: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            open_browser: true,
            timeout: humantime::format_duration(DEFAULT_TIMEOUT).to_string(),
        }
    }
}

impl ReportConfig {
    pub fn timeout(&self) -> Duration {
        match humantime::parse_duration(&self.timeout) {
            Ok(d) if !d.is_zero() => d,
            Ok(_) | Err(_) => {
                warn!(value = %self.timeout, "Invalid report timeout in config, using default");
                DEFAULT_TIMEOUT
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub theme: ChartTheme,
    pub metric: ChartMetric,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub log_level: LogLevel,
    pub log_to_file: bool,
    pub report: ReportConfig,
    pub chart: ChartConfig,
}

pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("bbr")
}

pub fn cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("bbr")
}

pub fn log_dir() -> PathBuf {
    cache_dir().join("logs")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

/// Scratch location for the XML report behind `bbr info`.
pub fn scratch_report_path() -> PathBuf {
    cache_dir().join("battery_report.xml")
}

pub fn ensure_dirs() -> std::io::Result<()> {
    fs::create_dir_all(config_dir())?;
    fs::create_dir_all(cache_dir())?;
    Ok(())
}

impl UserConfig {
    pub fn load() -> Self {
        let path = config_path();
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(&path) {
            Ok(content) => Self::from_toml(&content),
            Err(_) => Self::default(),
        }
    }

    fn from_toml(content: &str) -> Self {
        toml::from_str(content).unwrap_or_else(|e| {
            eprintln!("Warning: ignoring invalid config file: {}", e);
            Self::default()
        })
    }

    pub fn save(&self) -> std::io::Result<()> {
        let _ = ensure_dirs();
        let path = config_path();
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        fs::write(path, content)
    }

    pub fn merge_with_args(
        &mut self,
        theme: Option<ChartTheme>,
        metric: Option<ChartMetric>,
        no_open: bool,
    ) {
        if let Some(t) = theme {
            self.chart.theme = t;
        }
        if let Some(m) = metric {
            self.chart.metric = m;
        }
        if no_open {
            self.report.open_browser = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_from_str() {
        assert_eq!(LogLevel::from_str("debug"), LogLevel::Debug);
        assert_eq!(LogLevel::from_str(" TRACE "), LogLevel::Trace);
        assert_eq!(LogLevel::from_str("off"), LogLevel::Off);
        assert_eq!(LogLevel::from_str("verbose"), LogLevel::Warn);
        assert_eq!(LogLevel::Off.as_tracing_level(), None);
        assert_eq!(LogLevel::Info.as_tracing_level(), Some(Level::INFO));
    }

    #[test]
    fn test_default_config_round_trips() {
        let config = UserConfig::default();
        let content = toml::to_string_pretty(&config).unwrap();
        let parsed = UserConfig::from_toml(&content);

        assert_eq!(parsed.log_level, LogLevel::Warn);
        assert_eq!(parsed.report.output, default_output());
        assert!(parsed.report.open_browser);
        assert_eq!(parsed.report.timeout(), DEFAULT_TIMEOUT);
        assert_eq!(parsed.chart.theme, ChartTheme::Dark);
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config = UserConfig::from_toml(
            r#"
log_level = "debug"

[chart]
theme = "light"
"#,
        );

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.chart.theme, ChartTheme::Light);
        assert_eq!(config.chart.metric, ChartMetric::Capacity);
        assert_eq!(config.report.output, default_output());
        assert!(config.report.open_browser);
    }

    #[test]
    fn test_invalid_config_falls_back_to_defaults() {
        let config = UserConfig::from_toml("log_level = [1, 2]");
        assert_eq!(config.log_level, LogLevel::Warn);
    }

    #[test]
    fn test_report_timeout() {
        let mut report = ReportConfig {
            timeout: "90s".to_string(),
            ..ReportConfig::default()
        };
        assert_eq!(report.timeout(), Duration::from_secs(90));

        report.timeout = "soon".to_string();
        assert_eq!(report.timeout(), DEFAULT_TIMEOUT);

        report.timeout = "0s".to_string();
        assert_eq!(report.timeout(), DEFAULT_TIMEOUT);
    }

    #[test]
    fn test_chart_options_from_str() {
        assert_eq!(ChartTheme::from_str("Light"), Some(ChartTheme::Light));
        assert_eq!(ChartTheme::from_str("dark"), Some(ChartTheme::Dark));
        assert_eq!(ChartTheme::from_str("solarized"), None);
        assert_eq!(ChartMetric::from_str("percent"), Some(ChartMetric::Health));
        assert_eq!(ChartMetric::from_str("capacity"), Some(ChartMetric::Capacity));
        assert_eq!(ChartMetric::from_str("helth"), None);
    }

    #[test]
    fn test_merge_with_args_keeps_unset_options() {
        let mut config = UserConfig::default();
        config.merge_with_args(None, Some(ChartMetric::Health), false);

        assert_eq!(config.chart.theme, ChartTheme::Dark);
        assert_eq!(config.chart.metric, ChartMetric::Health);
        assert!(config.report.open_browser);
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = UserConfig::default();
        config.merge_with_args(Some(ChartTheme::Light), Some(ChartMetric::Health), true);

        assert_eq!(config.chart.theme, ChartTheme::Light);
        assert_eq!(config.chart.metric, ChartMetric::Health);
        assert!(!config.report.open_browser);
    }
}
