//! Application service — running root scripts on a remote host.
//!
//! `sudo -n` is tried first. Only when it fails because sudo wants a password
//! is a credential obtained (configured value, else prompt, else error) and
//! the same script re-run through `sudo -S`. The credential is kept for the
//! rest of the run so the user is asked at most once.

use anyhow::{Context, Result};

use crate::application::ports::{ProgressReporter, ShellExecutor, UserPrompt};
use crate::domain::command::{CommandFailure, CommandOutcome};
use crate::domain::credential::Credential;
use crate::domain::error::DeployError;
use crate::domain::escalation::{Escalation, needs_password};
use crate::domain::target::RemoteRecipe;

/// Resolve the sudo password: configured value first, then an interactive
/// prompt, else [`DeployError::NoCredential`].
///
/// The prompt is never touched when a configured value exists, and
/// `prompt.password` is never called when `prompt.is_interactive()` is false.
///
/// # Errors
///
/// Returns [`DeployError::NoCredential`] when nothing is configured and no
/// terminal is available, or the prompt's own error.
pub fn obtain_credential(
    configured: Option<&Credential>,
    prompt: &impl UserPrompt,
    host: &str,
    user: &str,
    env_var: &str,
) -> Result<Credential> {
    if let Some(credential) = configured {
        tracing::debug!(env_var, "using configured sudo password");
        return Ok(credential.clone());
    }
    if !prompt.is_interactive() {
        return Err(DeployError::NoCredential {
            host: host.to_string(),
            env_var: env_var.to_string(),
        }
        .into());
    }
    let secret = prompt
        .password(&format!("[{host}] sudo password for '{user}'"))
        .context("reading sudo password")?;
    Ok(Credential::new(secret))
}

/// Privilege escalation state for one run against one host.
pub struct SudoSession<'a, P: UserPrompt> {
    prompt: &'a P,
    host: String,
    user: String,
    env_var: &'static str,
    configured: Option<Credential>,
    obtained: Option<Credential>,
}

impl<'a, P: UserPrompt> SudoSession<'a, P> {
    #[must_use]
    pub fn new(recipe: &impl RemoteRecipe, prompt: &'a P) -> Self {
        let endpoint = recipe.endpoint();
        Self {
            prompt,
            host: endpoint.host.clone(),
            user: endpoint.user.clone(),
            env_var: recipe.password_env(),
            configured: recipe.sudo_password().cloned(),
            obtained: None,
        }
    }

    /// Run `script` as root and report which escalation mode succeeded.
    ///
    /// # Errors
    ///
    /// Returns [`DeployError::RemoteExec`] when the script fails for any
    /// reason other than a password requirement, or when the password re-run
    /// fails; [`DeployError::NoCredential`] when a password is needed but
    /// cannot be obtained.
    pub async fn run(
        &mut self,
        shell: &impl ShellExecutor,
        reporter: &impl ProgressReporter,
        script: &str,
    ) -> Result<Escalation> {
        if let Some(credential) = self.obtained.clone() {
            self.run_with_password(shell, reporter, script, &credential)
                .await?;
            return Ok(Escalation::Password);
        }

        let args = Escalation::Passwordless.sudo_args(script);
        let output = shell
            .exec(&args)
            .await
            .context("running remote command (sudo -n)")?;
        let outcome = CommandOutcome::from(&output);
        reporter.echo(&outcome.stdout, &outcome.stderr);
        if outcome.success() {
            return Ok(Escalation::Passwordless);
        }

        let failure = CommandFailure::new(shell.describe(&args), outcome);
        if !needs_password(&failure) {
            return Err(DeployError::RemoteExec(failure).into());
        }

        tracing::info!(host = %self.host, "passwordless sudo refused, retrying with password");
        reporter.warn("passwordless sudo unavailable, retrying with password");
        let credential = obtain_credential(
            self.configured.as_ref(),
            self.prompt,
            &self.host,
            &self.user,
            self.env_var,
        )?;
        self.run_with_password(shell, reporter, script, &credential)
            .await?;
        self.obtained = Some(credential);
        Ok(Escalation::Password)
    }

    async fn run_with_password(
        &self,
        shell: &impl ShellExecutor,
        reporter: &impl ProgressReporter,
        script: &str,
        credential: &Credential,
    ) -> Result<()> {
        let args = Escalation::Password.sudo_args(script);
        let output = shell
            .exec_with_stdin(&args, &credential.stdin_bytes())
            .await
            .context("running remote command (sudo -S)")?;
        let outcome = CommandOutcome::from(&output);
        reporter.echo(&outcome.stdout, &outcome.stderr);
        if !outcome.success() {
            return Err(
                DeployError::RemoteExec(CommandFailure::new(shell.describe(&args), outcome)).into(),
            );
        }
        Ok(())
    }
}
