//! Application service — the packaging stage.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, ProgressReporter};
use crate::domain::artifact::Artifact;
use crate::domain::command::{CommandFailure, CommandOutcome, display_command};
use crate::domain::error::DeployError;

/// Packaging tool.
pub const PACK_PROGRAM: &str = "npm";

/// Run `npm pack <project_dir>` and return the produced artifact.
///
/// The archive lands in the current working directory under the name printed
/// on the last non-empty line of stdout.
///
/// # Errors
///
/// Returns [`DeployError::Packaging`] on non-zero exit,
/// [`DeployError::NoArtifact`] when no name was printed, or a spawn/timeout
/// error from the runner.
pub async fn package(
    runner: &impl CommandRunner,
    reporter: &impl ProgressReporter,
    project_dir: &Path,
    timeout: Duration,
) -> Result<Artifact> {
    let dir = project_dir.to_string_lossy();
    let args = ["pack", dir.as_ref()];

    reporter.step("packing plugin...");
    tracing::info!(project = %project_dir.display(), "packing plugin");

    let output = runner
        .run_with_timeout(PACK_PROGRAM, &args, timeout)
        .await
        .context("running npm pack")?;
    let outcome = CommandOutcome::from(&output);
    reporter.echo(&outcome.stdout, &outcome.stderr);

    if !outcome.success() {
        return Err(DeployError::Packaging(CommandFailure::new(
            display_command(PACK_PROGRAM, &args),
            outcome,
        ))
        .into());
    }

    let artifact = Artifact::from_pack_output(&outcome.stdout).ok_or(DeployError::NoArtifact)?;
    tracing::info!(artifact = %artifact, "packed");
    reporter.success(&format!("packed {artifact}"));
    Ok(artifact)
}
