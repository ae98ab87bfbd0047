use std::io;
use std::path::PathBuf;

use bbr_report::SeriesSummary;
use color_eyre::eyre::{Result, WrapErr};

use super::obtain_report;
use crate::config::UserConfig;
use crate::render::write_summary;

pub fn run(from: Option<PathBuf>, config: &UserConfig) -> Result<()> {
    let report = obtain_report(from, config)?;

    let series = report
        .capacity_series()
        .wrap_err("Capacity history contains an invalid entry")?;
    let summary = SeriesSummary::from_series(&series);

    let stdout = io::stdout();
    write_summary(&mut stdout.lock(), &report, summary.as_ref())?;
    Ok(())
}
