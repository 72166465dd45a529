//! Human-readable terminal renderer.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::OwoColorize as _;

use crate::application::services::deploy::DeployOutcome;
use crate::domain::config::DeployConfig;
use crate::domain::escalation::Escalation;
use crate::domain::target::{PI_PASSWORD_ENV, VM_PASSWORD_ENV};
use crate::output::OutputContext;

/// Environment variables shown under `config show`. Password variables are
/// reported as set/unset only.
const SHOWN_ENV: &[&str] = &["HB_DEPLOY_CONFIG", "HB_DEPLOY_NON_INTERACTIVE", "NO_COLOR"];

/// Renders domain types as human-readable terminal output using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the CLI version information.
    pub fn render_version(&self, version: &str) {
        if self.ctx.quiet {
            return;
        }
        println!("hb-deploy {version}");
    }

    /// Render the summary line after a successful deploy.
    pub fn render_deploy(&self, outcome: &DeployOutcome) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.success(&format!(
            "deployed {} to {}",
            outcome.artifact.style(self.ctx.styles.bold),
            outcome.target
        ));
        if let Some(how) = outcome.escalation {
            self.ctx.kv("sudo:", escalation_display(how));
        }
        if outcome.remote_artifact_removed {
            self.ctx.kv("cleanup:", "remote copy removed");
        }
    }

    /// Render the effective configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized.
    pub fn render_config(&self, config: &DeployConfig, path: &Path) -> Result<()> {
        let yaml = serde_yaml::to_string(config).context("cannot serialize config")?;
        println!();
        println!(
            "  {}",
            format!("Configuration ({})", path.display()).style(self.ctx.styles.header)
        );
        println!();
        for line in yaml.lines() {
            println!("    {line}");
        }
        println!();
        println!("  {}", "Environment:".style(self.ctx.styles.bold));
        for var in SHOWN_ENV {
            println!(
                "    {:<28} {}",
                format!("{var}:"),
                std::env::var(var).unwrap_or_else(|_| "(not set)".to_string())
            );
        }
        for var in [VM_PASSWORD_ENV, PI_PASSWORD_ENV] {
            let state = if std::env::var_os(var).is_some() {
                "(set)"
            } else {
                "(not set)"
            };
            println!("    {:<28} {state}", format!("{var}:"));
        }
        println!();
        Ok(())
    }

    /// Render the config file location.
    pub fn render_config_path(&self, path: &Path) {
        println!("{}", path.display());
    }

    /// Confirm a `config set`.
    pub fn render_config_set(&self, key: &str, value: &str) {
        self.ctx.success(&format!("set {key} = {value}"));
    }
}

#[must_use]
pub fn escalation_display(escalation: Escalation) -> &'static str {
    match escalation {
        Escalation::Passwordless => "passwordless",
        Escalation::Password => "password",
    }
}
