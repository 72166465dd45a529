//! Shared mock infrastructure for unit tests.
//!
//! Each mock records every call it receives and answers from a queue of
//! canned outputs, so tests can assert on the exact commands the services
//! issued.

#![allow(dead_code, clippy::expect_used)]

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;
use hb_deploy::application::ports::{
    CommandRunner, FileTransfer, LocalFs, ProgressReporter, ShellExecutor, UserPrompt,
};

fn next(queue: &RefCell<VecDeque<Output>>, what: &str) -> Result<Output> {
    queue
        .borrow_mut()
        .pop_front()
        .ok_or_else(|| anyhow::anyhow!("{what} not expected in this test"))
}

// ── CommandRunner ────────────────────────────────────────────────────────────

/// One recorded local command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunCall {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

/// Local runner answering from a queue.
#[derive(Default)]
pub struct ScriptedRunner {
    pub outputs: RefCell<VecDeque<Output>>,
    pub calls: RefCell<Vec<RunCall>>,
}

impl ScriptedRunner {
    pub fn new(outputs: impl IntoIterator<Item = Output>) -> Self {
        Self {
            outputs: RefCell::new(outputs.into_iter().collect()),
            calls: RefCell::default(),
        }
    }

    fn record(&self, program: &str, args: &[&str], timeout: Option<Duration>) {
        self.calls.borrow_mut().push(RunCall {
            program: program.to_string(),
            args: args.iter().map(|s| (*s).to_string()).collect(),
            timeout,
        });
    }
}

impl CommandRunner for ScriptedRunner {
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output> {
        self.record(program, args, None);
        next(&self.outputs, "run")
    }

    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output> {
        self.record(program, args, Some(timeout));
        next(&self.outputs, "run_with_timeout")
    }

    async fn run_with_stdin(&self, _: &str, _: &[&str], _: &[u8]) -> Result<Output> {
        anyhow::bail!("run_with_stdin not expected in this test")
    }
}

// ── RemoteHost ───────────────────────────────────────────────────────────────

/// One recorded remote command; `stdin` is `Some` for the password path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecCall {
    pub args: Vec<String>,
    pub stdin: Option<Vec<u8>>,
}

impl ExecCall {
    /// The script handed to `bash -lc`.
    pub fn script(&self) -> &str {
        self.args.last().map_or("", String::as_str)
    }

    pub fn is_passwordless(&self) -> bool {
        self.args.get(1).is_some_and(|a| a == "-n")
    }
}

/// Remote host (or container) answering transfers and execs from queues.
#[derive(Default)]
pub struct ScriptedRemote {
    pub transfer_outputs: RefCell<VecDeque<Output>>,
    pub exec_outputs: RefCell<VecDeque<Output>>,
    pub transfers: RefCell<Vec<(PathBuf, String)>>,
    pub execs: RefCell<Vec<ExecCall>>,
}

impl ScriptedRemote {
    pub fn new(
        transfers: impl IntoIterator<Item = Output>,
        execs: impl IntoIterator<Item = Output>,
    ) -> Self {
        Self {
            transfer_outputs: RefCell::new(transfers.into_iter().collect()),
            exec_outputs: RefCell::new(execs.into_iter().collect()),
            ..Self::default()
        }
    }

    fn record(&self, args: &[&str], stdin: Option<&[u8]>) {
        self.execs.borrow_mut().push(ExecCall {
            args: args.iter().map(|s| (*s).to_string()).collect(),
            stdin: stdin.map(<[u8]>::to_vec),
        });
    }
}

impl FileTransfer for ScriptedRemote {
    async fn transfer(&self, local: &Path, remote_path: &str) -> Result<Output> {
        self.transfers
            .borrow_mut()
            .push((local.to_path_buf(), remote_path.to_string()));
        next(&self.transfer_outputs, "transfer")
    }

    fn describe_transfer(&self, local: &Path, remote_path: &str) -> String {
        format!("scp {} remote:{remote_path}", local.display())
    }
}

impl ShellExecutor for ScriptedRemote {
    async fn exec(&self, args: &[&str]) -> Result<Output> {
        self.record(args, None);
        next(&self.exec_outputs, "exec")
    }

    async fn exec_with_stdin(&self, args: &[&str], input: &[u8]) -> Result<Output> {
        self.record(args, Some(input));
        next(&self.exec_outputs, "exec_with_stdin")
    }

    fn describe(&self, args: &[&str]) -> String {
        format!("ssh remote {}", args.join(" "))
    }
}

// ── LocalFs ──────────────────────────────────────────────────────────────────

/// In-memory filesystem view recording moves and deletions.
pub struct RecordingFs {
    pub existing_dirs: Vec<PathBuf>,
    pub fail_rename: bool,
    pub renames: RefCell<Vec<(PathBuf, PathBuf)>>,
    pub removed: RefCell<Vec<PathBuf>>,
}

impl RecordingFs {
    pub fn new() -> Self {
        Self {
            existing_dirs: Vec::new(),
            fail_rename: false,
            renames: RefCell::default(),
            removed: RefCell::default(),
        }
    }

    pub fn with_dir(dir: &str) -> Self {
        Self {
            existing_dirs: vec![PathBuf::from(dir)],
            ..Self::new()
        }
    }
}

impl LocalFs for RecordingFs {
    fn exists(&self, path: &Path) -> bool {
        self.existing_dirs.iter().any(|d| d == path)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if self.fail_rename {
            anyhow::bail!("permission denied");
        }
        self.renames
            .borrow_mut()
            .push((from.to_path_buf(), to.to_path_buf()));
        Ok(())
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        self.removed.borrow_mut().push(path.to_path_buf());
        Ok(())
    }
}

// ── UserPrompt ───────────────────────────────────────────────────────────────

/// Prompt with a fixed answer that counts how often it was asked.
pub struct CountingPrompt {
    pub interactive: bool,
    pub answer: String,
    pub password_calls: Cell<usize>,
    pub last_prompt: RefCell<Option<String>>,
}

impl CountingPrompt {
    pub fn interactive(answer: &str) -> Self {
        Self {
            interactive: true,
            answer: answer.to_string(),
            password_calls: Cell::new(0),
            last_prompt: RefCell::new(None),
        }
    }

    pub fn headless() -> Self {
        Self {
            interactive: false,
            ..Self::interactive("")
        }
    }
}

impl UserPrompt for CountingPrompt {
    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn password(&self, prompt: &str) -> Result<String> {
        assert!(self.interactive, "prompted without a terminal");
        self.password_calls.set(self.password_calls.get() + 1);
        *self.last_prompt.borrow_mut() = Some(prompt.to_string());
        Ok(self.answer.clone())
    }

    fn input(&self, _: &str) -> Result<String> {
        anyhow::bail!("input not expected in this test")
    }
}

// ── ProgressReporter ─────────────────────────────────────────────────────────

/// Reporter that keeps every event for later inspection.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
    pub echoed_stdout: RefCell<String>,
    pub echoed_stderr: RefCell<String>,
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(format!("step: {message}"));
    }

    fn success(&self, message: &str) {
        self.events.borrow_mut().push(format!("success: {message}"));
    }

    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(format!("warn: {message}"));
    }

    fn echo(&self, stdout: &str, stderr: &str) {
        self.echoed_stdout.borrow_mut().push_str(stdout);
        self.echoed_stderr.borrow_mut().push_str(stderr);
    }
}
