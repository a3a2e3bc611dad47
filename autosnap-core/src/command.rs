// Standard library
use std::thread;
use std::time::{Duration, Instant};

// External crates
use crate::error::{Result, SnapError};
use duct::cmd;
use tracing::debug;
use which::which;

/// Runs an external program and returns its captured stdout.
///
/// The Proxmox provider talks to the cluster exclusively through this trait so
/// tests can substitute a scripted runner.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

/// Runner backed by `duct`, with an optional wall-clock timeout.
#[derive(Debug, Clone, Default)]
pub struct DuctRunner {
    timeout: Option<Duration>,
}

impl DuctRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl CommandRunner for DuctRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<String> {
        run_capture(program, args, self.timeout)
    }
}

fn render_command(program: &str, args: &[String]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Run a command to completion, capturing stdout and stderr.
///
/// A non-zero exit becomes `SnapError::Command` carrying the tail of stderr.
/// When `timeout` elapses the child is killed and `SnapError::Timeout` is
/// returned.
pub fn run_capture(program: &str, args: &[String], timeout: Option<Duration>) -> Result<String> {
    let full_command = render_command(program, args);
    debug!(command = %full_command, "running command");

    let handle = cmd(program, args)
        .stdout_capture()
        .stderr_capture()
        .unchecked()
        .start()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                SnapError::Dependency(program.to_string())
            } else {
                SnapError::Command(format!("Failed to start '{}': {}", full_command, e))
            }
        })?;

    let start = Instant::now();
    loop {
        if let Some(limit) = timeout {
            if start.elapsed() >= limit {
                if let Err(e) = handle.kill() {
                    debug!(command = %full_command, error = %e, "failed to kill timed out command");
                }
                return Err(SnapError::Timeout(format!(
                    "'{}' did not finish within {}s",
                    full_command,
                    limit.as_secs_f64()
                )));
            }
        }

        match handle.try_wait() {
            Ok(Some(output)) => {
                if !output.status.success() {
                    let stderr = String::from_utf8_lossy(&output.stderr);
                    // Last 20 lines are enough to see what pvesh complained about
                    let tail: Vec<&str> = stderr.lines().rev().take(20).collect();
                    let tail: Vec<&str> = tail.into_iter().rev().collect();
                    return Err(SnapError::Command(format!(
                        "'{}' exited with code {:?}: {}",
                        full_command,
                        output.status.code(),
                        tail.join("\n")
                    )));
                }
                return Ok(String::from_utf8_lossy(&output.stdout).into_owned());
            }
            Ok(None) => thread::sleep(Duration::from_millis(50)),
            Err(e) => {
                return Err(SnapError::Command(format!(
                    "Error waiting for '{}': {}",
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

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_run_capture_returns_stdout() {
        let out = run_capture("sh", &args(&["-c", "echo hello"]), None).unwrap();
        assert_eq!(out.trim(), "hello");
    }

    #[test]
    fn test_run_capture_reports_exit_code_and_stderr() {
        let err = run_capture("sh", &args(&["-c", "echo boom >&2; exit 3"]), None).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, SnapError::Command(_)));
        assert!(msg.contains("Some(3)"));
        assert!(msg.contains("boom"));
    }

    #[test]
    fn test_run_capture_times_out() {
        let err = run_capture(
            "sh",
            &args(&["-c", "sleep 5"]),
            Some(Duration::from_millis(200)),
        )
        .unwrap_err();
        assert!(matches!(err, SnapError::Timeout(_)));
    }

    #[test]
    fn test_missing_binary_is_dependency_error() {
        let err = run_capture("autosnap-definitely-missing-binary", &[], None).unwrap_err();
        assert!(matches!(err, SnapError::Dependency(_)));
    }

    #[test]
    fn test_render_command() {
        assert_eq!(render_command("pvesh", &[]), "pvesh");
        assert_eq!(
            render_command("pvesh", &args(&["get", "/version"])),
            "pvesh get /version"
        );
    }
}
