//! The four tool stages and how they are run.

use std::fmt;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc::{self, Sender};
use std::thread;

use serde::Serialize;

/// One external tool invocation per combination, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Analysis, synthesis and technology mapping.
    Map,
    /// Database merge.
    Merge,
    /// Placement and routing.
    Fit,
    /// Static timing analysis.
    Sta,
}

impl Stage {
    pub const ALL: [Stage; 4] = [Stage::Map, Stage::Merge, Stage::Fit, Stage::Sta];

    /// Name used in log file names, `{run}.{stage}.log`.
    pub fn as_str(self) -> &'static str {
        match self {
            Stage::Map => "map",
            Stage::Merge => "merge",
            Stage::Fit => "fit",
            Stage::Sta => "sta",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What happened when a stage was run.
///
/// Outcomes are informational only; the next stage runs regardless.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "kebab-case")]
pub enum StageOutcome {
    Succeeded,
    /// The tool ran and exited unsuccessfully; `code` is `None` on a signal.
    ToolFailed { code: Option<i32> },
    /// The tool could not be started.
    LaunchFailed { reason: String },
}

impl StageOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, StageOutcome::Succeeded)
    }
}

impl fmt::Display for StageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageOutcome::Succeeded => write!(f, "succeeded"),
            StageOutcome::ToolFailed { code: Some(code) } => write!(f, "failed (exit {code})"),
            StageOutcome::ToolFailed { code: None } => write!(f, "failed (terminated by signal)"),
            StageOutcome::LaunchFailed { reason } => write!(f, "not started: {reason}"),
        }
    }
}

/// Runs one tool stage, copying its combined output into `log`.
///
/// `Err` is reserved for failures writing the log; tool failures are
/// reported through [`StageOutcome`].
pub trait StageRunner {
    fn run(
        &mut self,
        stage: Stage,
        program: &str,
        args: &[String],
        workdir: &Path,
        log: &mut dyn Write,
    ) -> io::Result<StageOutcome>;
}

/// Runs stages as child processes, teeing their output to the console.
///
/// There is no timeout: a tool that never exits blocks the sweep.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    /// Copy tool output to stdout as well as the log.
    pub echo: bool,
}

impl Default for ProcessRunner {
    fn default() -> Self {
        ProcessRunner { echo: true }
    }
}

impl StageRunner for ProcessRunner {
    fn run(
        &mut self,
        _stage: Stage,
        program: &str,
        args: &[String],
        workdir: &Path,
        log: &mut dyn Write,
    ) -> io::Result<StageOutcome> {
        let mut child = match Command::new(program)
            .args(args)
            .current_dir(workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
        {
            Ok(child) => child,
            Err(e) => {
                return Ok(StageOutcome::LaunchFailed {
                    reason: format!("{program}: {e}"),
                })
            }
        };

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let echo = self.echo;
        let (tx, rx) = mpsc::channel::<Vec<u8>>();

        let copied = thread::scope(|scope| -> io::Result<()> {
            if let Some(out) = stdout {
                let tx = tx.clone();
                scope.spawn(move || forward(out, tx));
            }
            if let Some(err) = stderr {
                let tx = tx.clone();
                scope.spawn(move || forward(err, tx));
            }
            drop(tx);

            let mut result = Ok(());
            for chunk in rx {
                if echo {
                    let mut console = io::stdout().lock();
                    let _ = console.write_all(&chunk);
                    let _ = console.flush();
                }
                // Keep draining after a log failure so the child never blocks.
                if result.is_ok() {
                    result = log.write_all(&chunk);
                }
            }
            result
        });

        let status = child.wait();
        copied?;
        log.flush()?;

        Ok(match status {
            Ok(status) if status.success() => StageOutcome::Succeeded,
            Ok(status) => StageOutcome::ToolFailed {
                code: status.code(),
            },
            Err(e) => StageOutcome::LaunchFailed {
                reason: format!("{program}: {e}"),
            },
        })
    }
}

fn forward(mut reader: impl Read, tx: Sender<Vec<u8>>) {
    let mut buf = [0u8; 8192];
    loop {
        match reader.read(&mut buf) {
            Ok(0) | Err(_) => break,
            Ok(n) => {
                if tx.send(buf[..n].to_vec()).is_err() {
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> ProcessRunner {
        ProcessRunner { echo: false }
    }

    #[test]
    fn stage_order_and_names() {
        let names: Vec<&str> = Stage::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(names, vec!["map", "merge", "fit", "sta"]);
    }

    #[test]
    fn missing_program_is_launch_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = Vec::new();
        let outcome = quiet()
            .run(
                Stage::Map,
                "mpsweep-no-such-tool-anywhere",
                &[],
                dir.path(),
                &mut log,
            )
            .unwrap();
        assert!(matches!(outcome, StageOutcome::LaunchFailed { .. }));
        assert!(!outcome.is_success());
    }

    #[cfg(unix)]
    #[test]
    fn output_of_both_streams_reaches_log() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = Vec::new();
        let args = vec!["-c".to_string(), "echo to-out; echo to-err >&2".to_string()];
        let outcome = quiet()
            .run(Stage::Fit, "sh", &args, dir.path(), &mut log)
            .unwrap();
        assert_eq!(outcome, StageOutcome::Succeeded);
        let text = String::from_utf8(log).unwrap();
        assert!(text.contains("to-out"));
        assert!(text.contains("to-err"));
    }

    #[cfg(unix)]
    #[test]
    fn nonzero_exit_is_tool_failure() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = Vec::new();
        let args = vec!["-c".to_string(), "exit 3".to_string()];
        let outcome = quiet()
            .run(Stage::Sta, "sh", &args, dir.path(), &mut log)
            .unwrap();
        assert_eq!(outcome, StageOutcome::ToolFailed { code: Some(3) });
        assert_eq!(outcome.to_string(), "failed (exit 3)");
    }

    #[cfg(unix)]
    #[test]
    fn runs_in_workdir() {
        let dir = tempfile::tempdir().unwrap();
        let mut log = Vec::new();
        let args = vec!["-c".to_string(), "touch here.txt".to_string()];
        quiet()
            .run(Stage::Map, "sh", &args, dir.path(), &mut log)
            .unwrap();
        assert!(dir.path().join("here.txt").exists());
    }
}
