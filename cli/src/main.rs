mod cli;
mod commands;
mod config;
mod formats;
mod logging;
mod render;

use clap::Parser;
use color_eyre::eyre::Result;

use cli::{Cli, Commands};
use config::{ensure_dirs, LogLevel, UserConfig};
use logging::LogMode;

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = ensure_dirs();

    let cli = Cli::parse();
    let mut config = UserConfig::load();
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);
    let _guard = logging::init(
        config.log_level,
        LogMode::from_config(config.log_to_file),
        log_level_override,
    );

    match cli.command {
        Commands::Info { from } => commands::info::run(from, &config),
        Commands::Generate {
            output,
            format,
            no_open,
            from,
            theme,
            metric,
        } => commands::generate::run(
            commands::generate::GenerateArgs {
                output,
                format,
                no_open,
                from,
                theme,
                metric,
            },
            &mut config,
        ),
        Commands::Config { path, reset, edit } => commands::config::run(path, reset, edit),
    }
}
