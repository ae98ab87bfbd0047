use std::path::Path;
use std::process::Command;

use color_eyre::eyre::{bail, Result, WrapErr};
use color_eyre::Section;

use crate::config::{config_path, log_dir, scratch_report_path, UserConfig};

fn default_editor() -> &'static str {
    if cfg!(windows) {
        "notepad"
    } else {
        "nano"
    }
}

pub fn run(path: bool, reset: bool, edit: bool) -> Result<()> {
    let file = config_path();

    if path {
        println!("{}", file.display());
    } else if reset {
        write_defaults(&file)?;
        println!("Config reset to defaults at: {}", file.display());
    } else if edit {
        open_in_editor(&file)?;
    } else {
        show(&file)?;
    }

    Ok(())
}

fn write_defaults(file: &Path) -> Result<()> {
    UserConfig::default()
        .save()
        .wrap_err_with(|| format!("Could not write {}", file.display()))
        .suggestion("Check that the config directory is writable")
}

fn open_in_editor(file: &Path) -> Result<()> {
    if !file.exists() {
        write_defaults(file)?;
    }

    let editor = std::env::var("EDITOR").unwrap_or_else(|_| default_editor().to_string());
    let status = Command::new(&editor)
        .arg(file)
        .status()
        .wrap_err_with(|| format!("Could not launch editor `{}`", editor))
        .suggestion("Set $EDITOR to an installed editor")?;

    if !status.success() {
        bail!("Editor `{}` exited with {}", editor, status);
    }
    Ok(())
}

fn show(file: &Path) -> Result<()> {
    let config = UserConfig::load();
    let state = if file.exists() { "" } else { " (not created, showing defaults)" };

    println!("Config file: {}{}", file.display(), state);
    println!("Log directory: {}", log_dir().display());
    println!("Scratch report: {}", scratch_report_path().display());
    println!();
    print!("{}", toml::to_string_pretty(&config)?);

    Ok(())
}
