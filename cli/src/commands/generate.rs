use std::fs;
use std::path::PathBuf;

use bytesize::ByteSize;
use color_eyre::eyre::{eyre, Result, WrapErr};
use color_eyre::Section;
use tracing::{info, warn};

use super::{obtain_report, run_powercfg};
use crate::config::{ChartMetric, ChartTheme, UserConfig};
use crate::formats::ReportFormat;
use crate::render::CapacityChart;

pub struct GenerateArgs {
    pub output: Option<PathBuf>,
    pub format: String,
    pub no_open: bool,
    pub from: Option<PathBuf>,
    pub theme: Option<String>,
    pub metric: Option<String>,
}

pub fn run(args: GenerateArgs, config: &mut UserConfig) -> Result<()> {
    let GenerateArgs {
        output,
        format,
        no_open,
        from,
        theme,
        metric,
    } = args;

    let format = ReportFormat::from_str(&format)
        .ok_or_else(|| eyre!("Unknown report format `{}`", format))
        .suggestion("Use one of: better, default, raw")?;
    let theme = theme
        .map(|t| {
            ChartTheme::from_str(&t)
                .ok_or_else(|| eyre!("Unknown chart theme `{}`", t))
                .suggestion("Use one of: dark, light")
        })
        .transpose()?;
    let metric = metric
        .map(|m| {
            ChartMetric::from_str(&m)
                .ok_or_else(|| eyre!("Unknown chart metric `{}`", m))
                .suggestion("Use one of: capacity, health")
        })
        .transpose()?;
    config.merge_with_args(theme, metric, no_open);

    if from.is_some() && !format.needs_report() {
        return Err(eyre!("--from only applies to the `better` format"))
            .suggestion("Drop --from, or use --format better");
    }

    // An explicit --output is taken as-is; the configured default follows the format.
    let output = output.unwrap_or_else(|| format.output_path(&config.report.output));
    info!(format = format.label(), path = %output.display(), "Generating battery report");

    let written = match format {
        ReportFormat::Better => {
            let report = obtain_report(from, config)?;
            let series = report
                .capacity_series()
                .wrap_err("Capacity history contains an invalid entry")?;
            let chart = CapacityChart::new(&report, series)
                .theme(config.chart.theme)
                .metric(config.chart.metric);
            if chart.is_empty() {
                warn!("Report has no capacity history, the chart will be empty");
            }

            chart
                .write_to(&output)
                .wrap_err("Could not write the battery report")
                .suggestion("Check that the output directory exists and is writable")?
                as u64
        }
        ReportFormat::Default | ReportFormat::Raw => {
            run_powercfg(config, &output, format.report_kind())?;
            fs::metadata(&output).map(|m| m.len()).unwrap_or(0)
        }
    };

    println!(
        "Battery report saved to {} ({})",
        output.display(),
        ByteSize::b(written)
    );

    if config.report.open_browser && format.browser_viewable() {
        if let Err(e) = bbr_platform::browser::open(&output) {
            warn!(path = %output.display(), error = %e, "Could not open the report in a browser");
        }
    }

    Ok(())
}
