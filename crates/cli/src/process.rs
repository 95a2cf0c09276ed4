// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Child process execution with captured output and a preemptive timeout.

use std::collections::BTreeMap;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crate::error::RunError;

/// How often a child with a deadline is polled.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How long readers may drain the pipes after a timed out child is killed.
const DRAIN_GRACE: Duration = Duration::from_millis(50);

/// What to execute.
#[derive(Debug, Clone)]
pub enum Invocation {
    /// Run through `sh -c`.
    Shell(String),
    /// Program followed by its arguments.
    Argv(Vec<String>),
}

impl Invocation {
    /// Human-readable form used in errors and default names.
    pub fn display(&self) -> String {
        match self {
            Invocation::Shell(cmd) => cmd.clone(),
            Invocation::Argv(argv) => argv.join(" "),
        }
    }

    fn command(&self) -> Result<Command, RunError> {
        match self {
            Invocation::Shell(cmd) => {
                let mut command = Command::new("sh");
                command.arg("-c").arg(cmd);
                Ok(command)
            }
            Invocation::Argv(argv) => {
                let Some((program, args)) = argv.split_first() else {
                    return Err(RunError::Spawn {
                        command: String::new(),
                        source: std::io::Error::new(
                            std::io::ErrorKind::InvalidInput,
                            "empty command",
                        ),
                    });
                };
                let mut command = Command::new(program);
                command.args(args);
                Ok(command)
            }
        }
    }
}

/// How a command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExitKind {
    Success,
    Failed { code: Option<i32> },
    TimedOut { after: Duration },
}

/// Result of running a command to completion (or to its deadline).
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub exit: ExitKind,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutcome {
    pub fn success(&self) -> bool {
        self.exit == ExitKind::Success
    }

    /// One-line failure description, or `None` on success.
    pub fn failure_message(&self) -> Option<String> {
        let detail = match &self.exit {
            ExitKind::Success => return None,
            ExitKind::TimedOut { after } => {
                return Some(format!("timed out after {}", format_duration(*after)));
            }
            ExitKind::Failed { code: Some(code) } => format!("exit code {code}"),
            ExitKind::Failed { code: None } => "terminated by signal".to_string(),
        };
        match last_line(&self.stderr) {
            Some(line) => Some(format!("{detail}: {line}")),
            None => Some(detail),
        }
    }
}

/// Run `invocation` in `cwd` with extra `env`, killing it after `timeout`.
pub fn run(
    invocation: &Invocation,
    cwd: &Path,
    env: &BTreeMap<String, String>,
    timeout: Option<Duration>,
) -> Result<CommandOutcome, RunError> {
    let mut command = invocation.command()?;
    command
        .current_dir(cwd)
        .envs(env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| RunError::Spawn {
        command: invocation.display(),
        source,
    })?;

    let stdout = child.stdout.take().map(Capture::spawn);
    let stderr = child.stderr.take().map(Capture::spawn);

    match wait(&mut child, timeout)? {
        Some(status) => Ok(CommandOutcome {
            exit: exit_kind(status),
            stdout: Capture::finish(stdout),
            stderr: Capture::finish(stderr),
        }),
        // Grandchildren may still hold the pipes, so keep what was read by now.
        None => Ok(CommandOutcome {
            exit: ExitKind::TimedOut {
                after: timeout.unwrap_or_default(),
            },
            stdout: Capture::drain(stdout, DRAIN_GRACE),
            stderr: Capture::drain(stderr, DRAIN_GRACE),
        }),
    }
}

/// Run a hook command; any failure becomes [`RunError::Hook`].
pub fn run_hook(hook: &'static str, command: &str, cwd: &Path) -> Result<(), RunError> {
    let outcome = run(
        &Invocation::Shell(command.to_string()),
        cwd,
        &BTreeMap::new(),
        None,
    )?;
    match outcome.failure_message() {
        None => Ok(()),
        Some(message) => Err(RunError::Hook { hook, message }),
    }
}

/// Wait for exit; `None` means the deadline passed and the child was killed.
fn wait(child: &mut Child, timeout: Option<Duration>) -> Result<Option<ExitStatus>, RunError> {
    let Some(timeout) = timeout else {
        return Ok(Some(child.wait()?));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            if let Err(e) = child.kill() {
                tracing::warn!("failed to kill timed out child {}: {}", child.id(), e);
            }
            child.wait()?;
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Output collected by a reader thread, readable while the thread runs.
struct Capture {
    buf: Arc<Mutex<Vec<u8>>>,
    handle: JoinHandle<()>,
}

impl Capture {
    fn spawn<R: Read + Send + 'static>(mut reader: R) -> Self {
        let buf = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&buf);
        let handle = thread::spawn(move || {
            let mut chunk = [0u8; 8192];
            loop {
                match reader.read(&mut chunk) {
                    Ok(0) => break,
                    Ok(n) => sink
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .extend_from_slice(&chunk[..n]),
                    Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
                    Err(e) => {
                        tracing::debug!("output capture ended early: {}", e);
                        break;
                    }
                }
            }
        });
        Self { buf, handle }
    }

    fn snapshot(&self) -> String {
        lossy(&self.buf)
    }

    /// Wait for EOF and return everything read.
    fn finish(capture: Option<Self>) -> String {
        let Some(capture) = capture else {
            return String::new();
        };
        let Capture { buf, handle } = capture;
        if handle.join().is_err() {
            tracing::debug!("output reader panicked");
        }
        lossy(&buf)
    }

    /// Wait up to `grace` for EOF, then return what was read so far.
    /// A reader still blocked after that is left detached.
    fn drain(capture: Option<Self>, grace: Duration) -> String {
        let Some(capture) = capture else {
            return String::new();
        };
        let deadline = Instant::now() + grace;
        while !capture.handle.is_finished() && Instant::now() < deadline {
            thread::sleep(POLL_INTERVAL);
        }
        capture.snapshot()
    }
}

fn lossy(buf: &Mutex<Vec<u8>>) -> String {
    let buf = buf.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    String::from_utf8_lossy(&buf).into_owned()
}

fn exit_kind(status: ExitStatus) -> ExitKind {
    if status.success() {
        ExitKind::Success
    } else {
        ExitKind::Failed {
            code: status.code(),
        }
    }
}

fn last_line(output: &str) -> Option<&str> {
    output.lines().rev().map(str::trim).find(|l| !l.is_empty())
}

/// Format a duration as seconds with two decimals, or whole milliseconds
/// below one second.
pub fn format_duration(d: Duration) -> String {
    if d < Duration::from_secs(1) {
        format!("{}ms", d.as_millis())
    } else {
        format!("{:.2}s", d.as_secs_f64())
    }
}

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
