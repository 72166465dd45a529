//! JSON output helpers.
//!
//! Every `--json` code path prints exactly one pretty-printed object on
//! stdout: the command result, or the error object from [`format_error`].

use std::path::Path;

use anyhow::{Context, Result};

use crate::application::services::deploy::DeployOutcome;
use crate::domain::config::DeployConfig;
use crate::output::human::escalation_display;

/// Renders command results as JSON on stdout.
pub struct JsonRenderer;

impl JsonRenderer {
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_version(version: &str) -> Result<()> {
        print_pretty(&serde_json::json!({ "version": version }))
    }

    /// `escalation` is `"none"` for targets that install without sudo.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_deploy(outcome: &DeployOutcome) -> Result<()> {
        print_pretty(&deploy_value(outcome))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config(config: &DeployConfig, path: &Path) -> Result<()> {
        print_pretty(&serde_json::json!({
            "path": path.display().to_string(),
            "config": config,
        }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config_path(path: &Path) -> Result<()> {
        print_pretty(&serde_json::json!({ "path": path.display().to_string() }))
    }

    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_config_set(key: &str, value: &str) -> Result<()> {
        print_pretty(&serde_json::json!({ "key": key, "value": value }))
    }
}

#[must_use]
pub fn deploy_value(outcome: &DeployOutcome) -> serde_json::Value {
    serde_json::json!({
        "target": outcome.target,
        "artifact": outcome.artifact,
        "escalation": outcome.escalation.map_or("none", escalation_display),
        "remote_artifact_removed": outcome.remote_artifact_removed,
    })
}

fn print_pretty(value: &serde_json::Value) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("JSON serialization failed")?;
    println!("{out}");
    Ok(())
}

/// Format a JSON error object.
///
/// Output (pretty-printed):
/// ```json
/// {
///   "error": true,
///   "message": "...",
///   "code": "..."
/// }
/// ```
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn format_error(message: &str, code: &str) -> Result<String> {
    let obj = serde_json::json!({
        "error": true,
        "message": message,
        "code": code,
    });
    serde_json::to_string_pretty(&obj).context("JSON serialization failed")
}
