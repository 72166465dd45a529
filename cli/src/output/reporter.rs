//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`.
//!
//! Wraps `&OutputContext` and implements the `application::ports::ProgressReporter`
//! trait so application services can emit progress events without depending on
//! any presentation type directly.

use std::cell::RefCell;
use std::io::Write as _;

use indicatif::ProgressBar;
use owo_colors::OwoColorize as _;

use crate::application::ports::ProgressReporter;
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` shows a spinner on a TTY, else prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ⚠ {message}"`
/// - `echo()` relays captured command output
///
/// Everything but the stderr half of `echo()` is suppressed when `ctx.quiet`.
/// In machine mode (`--json`) progress is silent and command stdout is
/// relayed to stderr so stdout carries only the JSON document.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
    machine: bool,
    spinner: RefCell<Option<ProgressBar>>,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            machine: false,
            spinner: RefCell::new(None),
        }
    }

    /// Reporter for `--json` runs.
    #[must_use]
    pub fn machine(ctx: &'a OutputContext) -> Self {
        Self {
            ctx,
            machine: true,
            spinner: RefCell::new(None),
        }
    }

    fn silent(&self) -> bool {
        self.ctx.quiet || self.machine
    }

    fn close_spinner(&self) {
        if let Some(pb) = self.spinner.borrow_mut().take() {
            let arrow = format!("{}", "→".style(self.ctx.styles.step));
            progress::finish_step(&pb, &arrow);
        }
    }

    /// Run `f` with the spinner (if any) hidden so plain lines don't tear it.
    fn above_spinner(&self, f: impl FnOnce()) {
        match self.spinner.borrow().as_ref() {
            Some(pb) => pb.suspend(f),
            None => f(),
        }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        if self.silent() {
            return;
        }
        self.close_spinner();
        if self.ctx.show_progress() {
            *self.spinner.borrow_mut() = Some(progress::spinner(message));
        } else {
            println!("  {} {message}", "→".style(self.ctx.styles.step));
        }
    }

    fn success(&self, message: &str) {
        if self.silent() {
            return;
        }
        if let Some(pb) = self.spinner.borrow_mut().take() {
            pb.finish_and_clear();
        }
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        if self.silent() {
            return;
        }
        self.above_spinner(|| self.ctx.warn(message));
    }

    fn echo(&self, stdout: &str, stderr: &str) {
        self.above_spinner(|| {
            if !stdout.is_empty() && !self.ctx.quiet {
                if self.machine {
                    eprint!("{}", with_newline(stdout));
                } else {
                    print!("{}", with_newline(stdout));
                    let _ = std::io::stdout().flush();
                }
            }
            if !stderr.is_empty() {
                eprint!("{}", with_newline(stderr));
            }
        });
    }
}

impl Drop for TerminalReporter<'_> {
    fn drop(&mut self) {
        self.close_spinner();
    }
}

fn with_newline(text: &str) -> String {
    if text.ends_with('\n') {
        text.to_string()
    } else {
        format!("{text}\n")
    }
}
