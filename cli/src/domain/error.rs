//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator, so callers can `downcast_ref` them back.

use thiserror::Error;

use crate::domain::command::CommandFailure;

// ── Deploy errors ─────────────────────────────────────────────────────────────

/// Errors raised by the deploy pipeline. Each aborts the run.
#[derive(Debug, Error)]
pub enum DeployError {
    #[error("Packaging failed.\n{0}")]
    Packaging(CommandFailure),

    #[error("Packaging succeeded but printed no artifact name.")]
    NoArtifact,

    #[error("Transfer failed.\n{0}")]
    Transfer(TransferFailure),

    #[error("Remote command failed.\n{0}")]
    RemoteExec(CommandFailure),

    #[error(
        "Sudo password required on {host} but no TTY available to prompt.\nRe-run in an interactive terminal, or set {env_var} in the environment."
    )]
    NoCredential { host: String, env_var: String },
}

/// Why a transfer step failed: a copy command exited non-zero, or a local
/// filesystem move failed.
#[derive(Debug, Error)]
pub enum TransferFailure {
    #[error("{0}")]
    Command(CommandFailure),

    #[error("cannot move {from} to {to}: {reason}")]
    Move {
        from: String,
        to: String,
        reason: String,
    },
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration resolution and key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {field}. Pass --{flag}, set {env_var}, or run: hb-deploy config set {key} <value>")]
    Missing {
        field: &'static str,
        flag: &'static str,
        env_var: &'static str,
        key: &'static str,
    },

    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nValid values: {valid}")]
    InvalidValue {
        key: String,
        value: String,
        valid: String,
    },
}
