//! Invocation of `powercfg /batteryreport`.
//!
//! ```text
//! POWERCFG /BATTERYREPORT [/OUTPUT <FILENAME>] [/XML] [/DURATION <DAYS>]
//! ```

use std::fs;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

/// Upper bound on how long a single report generation may take.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Bytes kept per stream for error messages; the rest is read and dropped.
const MAX_CAPTURED_OUTPUT: usize = 16 * 1024;

/// Win32 `ERROR_ACCESS_DENIED`.
const ACCESS_DENIED_CODE: i32 = 5;

/// Output flavour requested from `powercfg`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportKind {
    /// Machine-readable XML (`/xml`).
    #[default]
    Xml,
    /// The stock HTML page Windows renders itself.
    Html,
}

impl ReportKind {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportKind::Xml => "xml",
            ReportKind::Html => "html",
        }
    }

    fn extra_args(&self) -> &'static [&'static str] {
        match self {
            ReportKind::Xml => &["/xml"],
            ReportKind::Html => &[],
        }
    }
}

/// Failures of the external report generator.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
    #[error("`{program}` was not found; it ships with Windows under System32")]
    NotFound { program: String },

    #[error("`{program}` was denied access ({}): {output}", describe_code(.code))]
    PermissionDenied {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[error("`{program}` failed ({}): {output}", describe_code(.code))]
    Failed {
        program: String,
        code: Option<i32>,
        output: String,
    },

    #[error("`{program}` did not finish within {}", describe_timeout(.timeout))]
    Timeout { program: String, timeout: Duration },

    #[error("`{program}` exited successfully but did not write {}", .path.display())]
    MissingOutput { program: String, path: PathBuf },

    #[error("battery reports need Windows' powercfg, which is not available on {os}")]
    Unsupported { os: &'static str },

    #[error("I/O error while running powercfg: {0}")]
    Io(#[from] std::io::Error),
}

fn describe_timeout(timeout: &Duration) -> String {
    humantime::format_duration(*timeout).to_string()
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated without exit code".to_string(),
    }
}

/// Handle on the `powercfg` executable.
#[derive(Debug, Clone)]
pub struct Powercfg {
    program: String,
    timeout: Duration,
}

impl Default for Powercfg {
    fn default() -> Self {
        Self::new()
    }
}

impl Powercfg {
    pub fn new() -> Self {
        Self {
            program: "powercfg".to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Use a different executable name or path.
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Write a battery report to `output`, blocking until `powercfg` exits.
    ///
    /// Parent directories are created and an existing file is replaced.
    pub fn generate(&self, output: &Path, kind: ReportKind) -> Result<(), InvokeError> {
        if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        if output.exists() {
            fs::remove_file(output)?;
        }

        debug!(
            program = %self.program,
            output = %output.display(),
            ?kind,
            "Running battery report generator"
        );

        let mut child = Command::new(&self.program)
            .arg("/batteryreport")
            .arg("/output")
            .arg(output)
            .args(kind.extra_args())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        // drained while waiting, a full pipe would stall the child
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = self.wait(&mut child);
        let text = collect_output(stdout, stderr);
        let status = status?;

        if !status.success() {
            return Err(self.failure(status.code(), text));
        }
        if !output.exists() {
            return Err(InvokeError::MissingOutput {
                program: self.program.clone(),
                path: output.to_path_buf(),
            });
        }

        info!(output = %output.display(), "Battery report generated");
        Ok(())
    }

    fn wait(&self, child: &mut Child) -> Result<ExitStatus, InvokeError> {
        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => return Ok(status),
                Ok(None) => {}
                Err(e) => {
                    // readers only finish once the child is gone
                    let _ = child.kill();
                    return Err(e.into());
                }
            }
            if started.elapsed() >= self.timeout {
                warn!(
                    program = %self.program,
                    timeout = %describe_timeout(&self.timeout),
                    "Battery report generator timed out, killing it"
                );
                let _ = child.kill();
                let _ = child.wait();
                return Err(InvokeError::Timeout {
                    program: self.program.clone(),
                    timeout: self.timeout,
                });
            }
            thread::sleep(POLL_INTERVAL);
        }
    }

    fn spawn_error(&self, err: std::io::Error) -> InvokeError {
        match err.kind() {
            std::io::ErrorKind::NotFound => InvokeError::NotFound {
                program: self.program.clone(),
            },
            std::io::ErrorKind::PermissionDenied => InvokeError::PermissionDenied {
                program: self.program.clone(),
                code: None,
                output: err.to_string(),
            },
            _ => InvokeError::Io(err),
        }
    }

    fn failure(&self, code: Option<i32>, output: String) -> InvokeError {
        let program = self.program.clone();
        if is_access_denied(code, &output) {
            InvokeError::PermissionDenied {
                program,
                code,
                output,
            }
        } else {
            InvokeError::Failed {
                program,
                code,
                output,
            }
        }
    }
}

fn is_access_denied(code: Option<i32>, output: &str) -> bool {
    let output = output.to_lowercase();
    code == Some(ACCESS_DENIED_CODE)
        || output.contains("access is denied")
        || output.contains("administrator")
        || output.contains("elevat")
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    let mut pipe = pipe?;
    Some(thread::spawn(move || {
        let mut kept = Vec::new();
        let mut chunk = [0u8; 8192];
        loop {
            match pipe.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => {
                    let room = MAX_CAPTURED_OUTPUT.saturating_sub(kept.len());
                    kept.extend_from_slice(&chunk[..n.min(room)]);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(_) => break,
            }
        }
        kept
    }))
}

fn collect_output(
    stdout: Option<JoinHandle<Vec<u8>>>,
    stderr: Option<JoinHandle<Vec<u8>>>,
) -> String {
    let mut text = String::new();
    for handle in [stdout, stderr].into_iter().flatten() {
        if let Ok(bytes) = handle.join() {
            text.push_str(&String::from_utf8_lossy(&bytes));
        }
    }
    let text = text.trim();
    if text.is_empty() {
        "no output".to_string()
    } else {
        text.to_string()
    }
}
