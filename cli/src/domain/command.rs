//! Captured results of external commands.
//!
//! Pure data — conversion from `std::process::Output` is the only contact with
//! process types, and it only reads already-captured bytes.

use std::fmt;
use std::process::Output;

/// Captured result of one external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutcome {
    /// Standard output, lossily decoded.
    pub stdout: String,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Exit code, `None` when the process was terminated by a signal.
    pub code: Option<i32>,
}

impl CommandOutcome {
    /// `true` when the command exited with status 0.
    #[must_use]
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

impl From<&Output> for CommandOutcome {
    fn from(output: &Output) -> Self {
        Self {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            code: output.status.code(),
        }
    }
}

/// A command that exited non-zero, with everything needed to report it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFailure {
    /// Rendered command line (for display only; never re-executed).
    pub command: String,
    /// The captured result.
    pub outcome: CommandOutcome,
}

impl CommandFailure {
    #[must_use]
    pub fn new(command: impl Into<String>, outcome: CommandOutcome) -> Self {
        Self {
            command: command.into(),
            outcome,
        }
    }

    /// Returns `true` if `needle` occurs in either captured stream.
    #[must_use]
    pub fn mentions(&self, needle: &str) -> bool {
        self.outcome.stdout.contains(needle) || self.outcome.stderr.contains(needle)
    }
}

impl fmt::Display for CommandFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self
            .outcome
            .code
            .map_or_else(|| "signal".to_string(), |c| c.to_string());
        write!(
            f,
            "Command failed (exit {code}): {}\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
            self.command,
            self.outcome.stdout.trim_end(),
            self.outcome.stderr.trim_end(),
        )
    }
}

/// Render a program and its arguments as a readable command line.
#[must_use]
pub fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .map(crate::domain::shell::quote_arg)
        .collect::<Vec<_>>()
        .join(" ")
}
