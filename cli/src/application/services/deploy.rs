//! Application service — the deploy pipeline: pack → transfer → install →
//! cleanup.
//!
//! Imports only from `crate::domain` and `crate::application`. All I/O is
//! routed through injected port traits; one `Artifact` value is threaded
//! through every stage.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{
    CommandRunner, LocalFs, ProgressReporter, RemoteHost, ShellExecutor, UserPrompt,
};
use crate::application::services::escalation::SudoSession;
use crate::application::services::package::package;
use crate::domain::artifact::Artifact;
use crate::domain::command::{CommandFailure, CommandOutcome};
use crate::domain::error::{DeployError, TransferFailure};
use crate::domain::escalation::Escalation;
use crate::domain::target::{LocalTarget, RemoteCleanup, RemoteRecipe, TargetKind};

/// Inputs shared by every target.
pub struct DeployOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    /// Directory handed to `npm pack`.
    pub project_dir: &'a Path,
    pub pack_timeout: Duration,
}

/// Result of a successful deploy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployOutcome {
    pub target: TargetKind,
    pub artifact: String,
    /// `None` for targets that install without sudo.
    pub escalation: Option<Escalation>,
    pub remote_artifact_removed: bool,
}

/// Deploy to an SSH-reachable host.
///
/// The local artifact is deleted only after the install (and remote cleanup,
/// when enabled) succeeded; on failure it is left in place.
///
/// # Errors
///
/// Returns a [`DeployError`] (downcastable from the `anyhow::Error`) for the
/// first failing stage, or a spawn/timeout error from a runner.
pub async fn deploy_remote(
    runner: &impl CommandRunner,
    remote: &impl RemoteHost,
    local_fs: &impl LocalFs,
    prompt: &impl UserPrompt,
    recipe: &impl RemoteRecipe,
    opts: DeployOptions<'_, impl ProgressReporter>,
) -> Result<DeployOutcome> {
    let reporter = opts.reporter;
    let artifact = package(runner, reporter, opts.project_dir, opts.pack_timeout).await?;
    let local = artifact.local_path();

    transfer(remote, reporter, recipe, &artifact, &local).await?;

    reporter.step(&format!(
        "installing {artifact} on {}...",
        recipe.endpoint().host
    ));
    tracing::info!(kind = %recipe.kind(), artifact = %artifact, "installing");
    let mut sudo = SudoSession::new(recipe, prompt);
    let escalation = sudo
        .run(remote, reporter, &recipe.install_script(&artifact))
        .await?;
    reporter.success(&format!("installed {artifact}"));

    let remote_artifact_removed = match recipe.cleanup() {
        RemoteCleanup::Remove => {
            reporter.step("removing remote copy...");
            tracing::info!(path = %recipe.installed_path(&artifact), "removing remote copy");
            sudo.run(remote, reporter, &recipe.cleanup_script(&artifact))
                .await?;
            true
        }
        RemoteCleanup::Keep => false,
    };

    remove_local(local_fs, &local)?;

    Ok(DeployOutcome {
        target: recipe.kind(),
        artifact: artifact.file_name().to_string(),
        escalation: Some(escalation),
        remote_artifact_removed,
    })
}

async fn transfer(
    remote: &impl RemoteHost,
    reporter: &impl ProgressReporter,
    recipe: &impl RemoteRecipe,
    artifact: &Artifact,
    local: &Path,
) -> Result<()> {
    let staged = recipe.staging_path(artifact);
    reporter.step(&format!(
        "copying {artifact} to {}:{staged}...",
        recipe.endpoint().address()
    ));
    tracing::info!(artifact = %artifact, staged = %staged, "transferring");

    let output = remote
        .transfer(local, &staged)
        .await
        .context("running scp")?;
    let outcome = CommandOutcome::from(&output);
    reporter.echo(&outcome.stdout, &outcome.stderr);
    if !outcome.success() {
        let failure = CommandFailure::new(remote.describe_transfer(local, &staged), outcome);
        return Err(DeployError::Transfer(TransferFailure::Command(failure)).into());
    }
    Ok(())
}

/// Deploy into a Docker container on this machine.
///
/// The artifact is moved into the container's volume directory, so there is
/// no separate local copy left to delete afterwards.
///
/// # Errors
///
/// Returns a [`DeployError`] for the first failing stage.
pub async fn deploy_local(
    runner: &impl CommandRunner,
    container: &impl ShellExecutor,
    local_fs: &impl LocalFs,
    target: &LocalTarget,
    opts: DeployOptions<'_, impl ProgressReporter>,
) -> Result<DeployOutcome> {
    let reporter = opts.reporter;
    let artifact = package(runner, reporter, opts.project_dir, opts.pack_timeout).await?;
    let local = artifact.local_path();
    let dest = artifact.path_in(&target.volume_dir);

    reporter.step(&format!("moving {artifact} to {}...", target.volume_dir.display()));
    tracing::info!(artifact = %artifact, dest = %dest.display(), "moving into volume");
    let moved = if local_fs.exists(&target.volume_dir) {
        local_fs.rename(&local, &dest).map_err(|e| format!("{e:#}"))
    } else {
        Err("volume directory does not exist".to_string())
    };
    if let Err(reason) = moved {
        return Err(DeployError::Transfer(TransferFailure::Move {
            from: local.display().to_string(),
            to: dest.display().to_string(),
            reason,
        })
        .into());
    }

    reporter.step(&format!("installing {artifact} in container {}...", target.container));
    let install = target.install_args(&artifact);
    let args: Vec<&str> = install.iter().map(String::as_str).collect();
    let output = container
        .exec(&args)
        .await
        .context("running docker exec")?;
    let outcome = CommandOutcome::from(&output);
    reporter.echo(&outcome.stdout, &outcome.stderr);
    if !outcome.success() {
        return Err(
            DeployError::RemoteExec(CommandFailure::new(container.describe(&args), outcome)).into(),
        );
    }
    reporter.success(&format!("installed {artifact}"));

    let remote_artifact_removed = match target.cleanup {
        RemoteCleanup::Remove => {
            remove_local(local_fs, &dest)?;
            true
        }
        RemoteCleanup::Keep => false,
    };

    Ok(DeployOutcome {
        target: TargetKind::Local,
        artifact: artifact.file_name().to_string(),
        escalation: None,
        remote_artifact_removed,
    })
}

fn remove_local(local_fs: &impl LocalFs, path: &Path) -> Result<()> {
    tracing::debug!(path = %path.display(), "removing local artifact");
    local_fs
        .remove_file(path)
        .with_context(|| format!("cleaning up {}", path.display()))
}
