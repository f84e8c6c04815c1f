// Standard library
use std::ffi::OsStr;
use std::thread;
use std::time::{Duration, Instant};

// External crates
use crate::error::{DdevError, Result};
use duct::cmd;
use tracing::debug;
use which::which;

/// Captured result of an external command.
///
/// The exit code is kept as data; callers decide what a non-zero exit means
/// instead of trusting stdout that merely looks plausible.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the process was killed by a signal.
    pub exit_code: Option<i32>,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Turn a non-zero exit into `DdevError::Command`, naming `what` failed.
    pub fn check(self, what: &str) -> Result<Self> {
        if self.success() {
            return Ok(self);
        }
        let detail = if self.stderr.trim().is_empty() {
            self.stdout.trim().to_string()
        } else {
            self.stderr.trim().to_string()
        };
        Err(DdevError::Command(format!(
            "{} exited with {:?}: {}",
            what, self.exit_code, detail
        )))
    }
}

fn render<A: AsRef<OsStr>>(command: &str, args: &[A]) -> String {
    format!(
        "{} {}",
        command,
        args.iter()
            .map(|a| a.as_ref().to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    )
}

/// Run a command to completion, capturing stdout and stderr separately.
/// A non-zero exit is returned as data, not as an error.
pub fn run_captured<A: AsRef<OsStr>>(command: &str, args: &[A]) -> Result<ExecOutput> {
    run_captured_with_timeout(command, args, None)
}

/// Run a command with an optional timeout (in seconds).
/// If the timeout is exceeded the process is killed and `DdevError::Timeout`
/// carries the full command line for debugging.
pub fn run_captured_with_timeout<A: AsRef<OsStr>>(
    command: &str,
    args: &[A],
    timeout_secs: Option<u64>,
) -> Result<ExecOutput> {
    let full_command = render(command, args);
    debug!(command = %full_command, "running");

    let argv: Vec<std::ffi::OsString> = args.iter().map(|a| a.as_ref().to_os_string()).collect();
    let handle = cmd(command, argv)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .start()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                DdevError::Io(e)
            } else {
                DdevError::Internal(format!("Failed to start command '{}': {}", full_command, e))
            }
        })?;

    let start = Instant::now();
    let timeout = timeout_secs.map(Duration::from_secs);

    loop {
        if let Some(limit) = timeout {
            if start.elapsed() >= limit {
                let _ = handle.kill();
                return Err(DdevError::Timeout(format!(
                    "Command timed out after {}s: {}\n\nTo debug, try running manually:\n  {}",
                    limit.as_secs(),
                    full_command,
                    full_command
                )));
            }
        }

        match handle.try_wait() {
            Ok(Some(output)) => {
                return Ok(ExecOutput {
                    stdout: String::from_utf8_lossy(&output.stdout).to_string(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                    exit_code: output.status.code(),
                });
            }
            Ok(None) => thread::sleep(Duration::from_millis(50)),
            Err(e) => {
                return Err(DdevError::Internal(format!(
                    "Error waiting for command '{}': {}",
                    full_command, e
                )));
            }
        }
    }
}

/// Checks if a command-line tool is available in the system's PATH.
pub fn is_tool_installed(tool_name: &str) -> bool {
    which(tool_name).is_ok()
}
