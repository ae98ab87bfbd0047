//! Opening generated files with the desktop's default handler.

use std::path::Path;
use std::process::{Command, Stdio};

use tracing::debug;

/// Open `path` in the default browser (or whatever handles its extension).
///
/// Only the launch is checked: the handler runs detached.
pub fn open(path: &Path) -> std::io::Result<()> {
    let path = path.canonicalize()?;
    let mut command = opener_command(&path);
    debug!(path = %path.display(), ?command, "Opening file with default handler");

    command
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}

#[cfg(windows)]
fn opener_command(path: &Path) -> Command {
    // canonicalize() yields a verbatim \\?\ path that `start` does not understand
    let display = path.to_string_lossy();
    let target = display.trim_start_matches(r"\\?\");

    let mut command = Command::new("cmd");
    command.args(["/C", "start", ""]).arg(target);
    command
}

#[cfg(target_os = "macos")]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("open");
    command.arg(path);
    command
}

#[cfg(not(any(windows, target_os = "macos")))]
fn opener_command(path: &Path) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(path);
    command
}
