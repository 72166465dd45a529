//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::config::DeployConfig;

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts local process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program with stdin piped from `stdin`.
    async fn run_with_stdin(&self, program: &str, args: &[&str], stdin: &[u8]) -> Result<Output>;
}

// ── Remote Host Ports ─────────────────────────────────────────────────────────

/// Host-to-remote file transfer.
#[allow(async_fn_in_trait)]
pub trait FileTransfer {
    /// Copy a local file to `remote_path` on the remote host.
    async fn transfer(&self, local: &Path, remote_path: &str) -> Result<Output>;
    /// Human-readable rendering of what `transfer` runs, for error reports.
    fn describe_transfer(&self, local: &Path, remote_path: &str) -> String;
}

/// Command execution on the remote side (a host over SSH, or a container).
#[allow(async_fn_in_trait)]
pub trait ShellExecutor {
    /// Run `args` remotely and capture output.
    async fn exec(&self, args: &[&str]) -> Result<Output>;
    /// Run `args` remotely with stdin piped from `input`.
    async fn exec_with_stdin(&self, args: &[&str], input: &[u8]) -> Result<Output>;
    /// Human-readable rendering of what `exec(args)` runs, for error reports.
    fn describe(&self, args: &[&str]) -> String;
}

/// Composite trait — anything that can both receive files and run commands.
pub trait RemoteHost: FileTransfer + ShellExecutor {}

/// Blanket implementation: any type implementing both sub-traits is a `RemoteHost`.
impl<T> RemoteHost for T where T: FileTransfer + ShellExecutor {}

// ── Interaction Ports ─────────────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Relay the captured output of a command to the user's terminal.
    fn echo(&self, stdout: &str, stderr: &str);
}

/// Abstracts terminal prompts so credential and config resolution can be
/// tested without a TTY.
pub trait UserPrompt {
    /// `true` when prompting is possible (stdin is a terminal and the user
    /// did not ask for non-interactive mode).
    fn is_interactive(&self) -> bool;
    /// Ask for a secret without echoing it.
    fn password(&self, prompt: &str) -> Result<String>;
    /// Ask for a line of text.
    fn input(&self, prompt: &str) -> Result<String>;
}

// ── Filesystem and Config Ports ───────────────────────────────────────────────

/// Abstracts the local filesystem operations the pipeline performs.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    /// Move `from` to `to`, falling back to copy+delete across filesystems.
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;
    /// Remove a file; a file that is already gone is not an error.
    fn remove_file(&self, path: &Path) -> Result<()>;
}

/// Abstracts persistence of the user configuration file.
pub trait ConfigStore {
    /// Load configuration, returning defaults when no file exists.
    fn load(&self) -> Result<DeployConfig>;
    /// Persist configuration.
    fn save(&self, config: &DeployConfig) -> Result<()>;
    /// Location of the configuration file.
    fn path(&self) -> Result<PathBuf>;
}
