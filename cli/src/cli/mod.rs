use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Print computer name, scan time and battery capacities
    Info {
        /// Read an existing XML report instead of running powercfg
        #[arg(long, value_name = "XML")]
        from: Option<PathBuf>,
    },

    /// Generate a battery report and open it in the browser
    #[command(alias = "gen")]
    Generate {
        /// Output file (default: ./reports/battery_report.html)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// Report format: better, default, raw
        #[arg(short, long, default_value = "better")]
        format: String,

        /// Do not open the report when done
        #[arg(long)]
        no_open: bool,

        /// Chart from an existing XML report instead of running powercfg
        #[arg(long, value_name = "XML")]
        from: Option<PathBuf>,

        /// Chart theme: dark, light
        #[arg(long)]
        theme: Option<String>,

        /// Chart metric: capacity, health
        #[arg(long)]
        metric: Option<String>,
    },

    /// Show or edit configuration
    Config {
        /// Print config file path
        #[arg(long)]
        path: bool,

        /// Reset config to defaults
        #[arg(long)]
        reset: bool,

        /// Open config file in $EDITOR
        #[arg(short, long)]
        edit: bool,
    },
}

/// Better battery reports for Windows
#[derive(Debug, Parser)]
#[command(name = "bbr", version, verbatim_doc_comment)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_generate_defaults() {
        let cli = Cli::parse_from(["bbr", "generate"]);
        match cli.command {
            Commands::Generate {
                output,
                format,
                no_open,
                from,
                ..
            } => {
                assert_eq!(output, None);
                assert_eq!(format, "better");
                assert!(!no_open);
                assert_eq!(from, None);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_info_from_file() {
        let cli = Cli::parse_from(["bbr", "--log-level", "debug", "info", "--from", "r.xml"]);
        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        assert!(matches!(cli.command, Commands::Info { from: Some(ref p) } if p == &PathBuf::from("r.xml")));
    }
}
