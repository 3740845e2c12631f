//! External process execution.
//!
//! Commands are argv lists: the first token is the program, the rest are
//! passed verbatim as arguments. No shell is involved, so tokens never need
//! quoting.

use crate::error::{DeckhandError, Result};
use std::io::{BufRead, BufReader};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;

/// Result of executing a process.
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,

    /// Standard output.
    pub stdout: String,

    /// Standard error.
    pub stderr: String,

    /// Whether the process succeeded (exit code 0).
    pub success: bool,
}

impl CommandResult {
    fn from_status(
        status: std::process::ExitStatus,
        stdout: String,
        stderr: String,
    ) -> Self {
        Self {
            exit_code: status.code(),
            stdout,
            stderr,
            success: status.success(),
        }
    }

    /// Last non-empty line of stderr, if any.
    pub fn last_error_line(&self) -> Option<&str> {
        self.stderr.lines().rev().find(|l| !l.trim().is_empty())
    }
}

/// Options for process execution.
#[derive(Debug, Clone, Default)]
pub struct CommandOptions {
    /// Working directory.
    pub cwd: Option<PathBuf>,
}

impl CommandOptions {
    /// Options running in `cwd`.
    pub fn in_dir(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(cwd.into()),
        }
    }
}

/// Output line from a running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputLine {
    Stdout(String),
    Stderr(String),
}

impl OutputLine {
    /// Stream prefix used when output is revealed.
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Stdout(_) => "OUT > ",
            Self::Stderr(_) => "ERR > ",
        }
    }

    /// Line content without the prefix.
    pub fn text(&self) -> &str {
        match self {
            Self::Stdout(s) | Self::Stderr(s) => s,
        }
    }
}

impl std::fmt::Display for OutputLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.prefix(), self.text())
    }
}

/// Render an argv list for display.
pub fn display_command(argv: &[String]) -> String {
    argv.iter()
        .map(|token| {
            if token.is_empty() || token.contains(char::is_whitespace) {
                format!("{:?}", token)
            } else {
                token.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn build(argv: &[String], options: &CommandOptions) -> Result<Command> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| DeckhandError::CommandFailed {
            command: String::new(),
            code: None,
        })?;

    let mut cmd = Command::new(program);
    cmd.args(args);

    if let Some(cwd) = &options.cwd {
        cmd.current_dir(cwd);
    }

    Ok(cmd)
}

fn spawn_failed(argv: &[String]) -> DeckhandError {
    DeckhandError::CommandFailed {
        command: display_command(argv),
        code: None,
    }
}

/// Run a process to completion, capturing its output.
///
/// Returns `Err` only when the process cannot be started; a non-zero exit
/// is reported through [`CommandResult`].
pub fn execute(argv: &[String], options: &CommandOptions) -> Result<CommandResult> {
    let mut cmd = build(argv, options)?;
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().map_err(|_| spawn_failed(argv))?;

    Ok(CommandResult::from_status(
        output.status,
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    ))
}

/// Run a process, handing every output line to `callback` as it arrives.
///
/// Readers run on helper threads; `callback` itself is always invoked on
/// the calling thread, in arrival order.
pub fn execute_streaming<F>(
    argv: &[String],
    options: &CommandOptions,
    mut callback: F,
) -> Result<CommandResult>
where
    F: FnMut(OutputLine),
{
    let mut cmd = build(argv, options)?;
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|_| spawn_failed(argv))?;

    let stdout = child.stdout.take().ok_or_else(|| spawn_failed(argv))?;
    let stderr = child.stderr.take().ok_or_else(|| spawn_failed(argv))?;

    let (tx, rx) = mpsc::channel();
    let tx_stdout = tx.clone();
    let tx_stderr = tx;

    let stdout_handle = thread::spawn(move || {
        let reader = BufReader::new(stdout);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stdout.send(OutputLine::Stdout(line));
        }
        output
    });

    let stderr_handle = thread::spawn(move || {
        let reader = BufReader::new(stderr);
        let mut output = String::new();
        for line in reader.lines().map_while(std::result::Result::ok) {
            output.push_str(&line);
            output.push('\n');
            let _ = tx_stderr.send(OutputLine::Stderr(line));
        }
        output
    });

    for line in rx {
        callback(line);
    }

    let stdout_output = stdout_handle.join().unwrap_or_default();
    let stderr_output = stderr_handle.join().unwrap_or_default();

    let status = child.wait().map_err(|_| spawn_failed(argv))?;

    Ok(CommandResult::from_status(
        status,
        stdout_output,
        stderr_output,
    ))
}
