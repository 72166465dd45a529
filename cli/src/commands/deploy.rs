//! `hb-deploy local|vm|pi` — resolve a target, wire the infrastructure and
//! run the deploy pipeline.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::services::config_service::{
    self, LocalOverrides, PiOverrides, SshOverrides, VmOverrides,
};
use crate::application::services::deploy::{DeployOptions, deploy_local, deploy_remote};
use crate::domain::config::Timeouts;
use crate::domain::target::{PI_PASSWORD_ENV, RemoteCleanup, VM_PASSWORD_ENV};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::docker::DockerContainer;
use crate::infra::fs::StdFs;
use crate::infra::ssh::SshRemote;

/// Plugin project to pack.
#[derive(Args, Debug, Clone)]
pub struct ProjectArgs {
    /// Directory containing the plugin's package.json
    #[arg(long, default_value = ".")]
    pub project: PathBuf,
}

/// Per-run override of the target's cleanup policy.
#[derive(Args, Debug, Clone, Default)]
pub struct CleanupArgs {
    /// Delete the installed archive after a successful install
    #[arg(long, conflicts_with = "keep_remote")]
    pub remove_remote: bool,

    /// Leave the installed archive in place
    #[arg(long)]
    pub keep_remote: bool,
}

impl CleanupArgs {
    #[must_use]
    pub fn policy(&self) -> Option<RemoteCleanup> {
        if self.remove_remote {
            Some(RemoteCleanup::Remove)
        } else if self.keep_remote {
            Some(RemoteCleanup::Keep)
        } else {
            None
        }
    }
}

/// Arguments for `hb-deploy local`.
#[derive(Args, Debug)]
pub struct LocalArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Container running Homebridge
    #[arg(long)]
    pub container: Option<String>,

    /// Host directory mounted as the container's plugin volume
    #[arg(long)]
    pub volume_dir: Option<PathBuf>,

    /// Mount point of the volume inside the container
    #[arg(long)]
    pub container_dir: Option<String>,

    #[command(flatten)]
    pub cleanup: CleanupArgs,
}

/// Arguments for `hb-deploy vm`.
#[derive(Args, Debug)]
pub struct VmArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// VM host name or address
    #[arg(long, env = "HOMEBRIDGE_VM_HOST")]
    pub host: Option<String>,

    /// SSH user
    #[arg(long, env = "HOMEBRIDGE_VM_USERNAME")]
    pub user: Option<String>,

    /// SSH port
    #[arg(long, env = "HOMEBRIDGE_VM_PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// SSH private key
    #[arg(long, env = "HOMEBRIDGE_VM_SSH_PEM")]
    pub identity: Option<PathBuf>,

    /// User the Homebridge service runs as
    #[arg(long)]
    pub service_user: Option<String>,

    /// Home directory of the service user
    #[arg(long)]
    pub service_home: Option<String>,

    /// Script that puts the Homebridge node runtime on PATH
    #[arg(long)]
    pub runtime_env: Option<String>,

    /// Remote directory scp copies the archive into
    #[arg(long)]
    pub staging_dir: Option<String>,

    #[command(flatten)]
    pub cleanup: CleanupArgs,
}

/// Arguments for `hb-deploy pi`.
#[derive(Args, Debug)]
pub struct PiArgs {
    #[command(flatten)]
    pub project: ProjectArgs,

    /// Pi host name or IP address
    #[arg(long, env = "HOMEBRIDGE_PI_IP_ADDRESS")]
    pub host: Option<String>,

    /// SSH user
    #[arg(long, env = "HOMEBRIDGE_PI_USERNAME")]
    pub user: Option<String>,

    /// SSH port
    #[arg(long, env = "HOMEBRIDGE_PI_PORT", value_parser = clap::value_parser!(u16).range(1..))]
    pub port: Option<u16>,

    /// SSH private key (PEM)
    #[arg(long, env = "HOMEBRIDGE_PI_SSH_PEM")]
    pub identity: Option<PathBuf>,

    /// Container running Homebridge
    #[arg(long)]
    pub container: Option<String>,

    /// Directory on the Pi mounted as the container's plugin volume
    #[arg(long)]
    pub volume_dir: Option<String>,

    /// Mount point of the volume inside the container
    #[arg(long)]
    pub container_dir: Option<String>,

    /// Remote directory scp copies the archive into
    #[arg(long)]
    pub staging_dir: Option<String>,

    #[command(flatten)]
    pub cleanup: CleanupArgs,
}

/// Sudo password from the environment. A set but empty value is a valid
/// (empty) password.
fn password_from_env(var: &str) -> Option<String> {
    std::env::var(var).ok()
}

impl From<LocalArgs> for LocalOverrides {
    fn from(args: LocalArgs) -> Self {
        Self {
            cleanup: args.cleanup.policy(),
            container: args.container,
            volume_dir: args.volume_dir,
            container_dir: args.container_dir,
        }
    }
}

impl From<VmArgs> for VmOverrides {
    fn from(args: VmArgs) -> Self {
        Self {
            ssh: SshOverrides {
                cleanup: args.cleanup.policy(),
                host: args.host,
                user: args.user,
                port: args.port,
                identity: args.identity,
                staging_dir: args.staging_dir,
                sudo_password: password_from_env(VM_PASSWORD_ENV),
            },
            service_user: args.service_user,
            service_home: args.service_home,
            runtime_env: args.runtime_env,
        }
    }
}

impl From<PiArgs> for PiOverrides {
    fn from(args: PiArgs) -> Self {
        Self {
            ssh: SshOverrides {
                cleanup: args.cleanup.policy(),
                host: args.host,
                user: args.user,
                port: args.port,
                identity: args.identity,
                staging_dir: args.staging_dir,
                sudo_password: password_from_env(PI_PASSWORD_ENV),
            },
            container: args.container,
            volume_dir: args.volume_dir,
            container_dir: args.container_dir,
        }
    }
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

/// Local runners: `pack` gets its own timeout through `DeployOptions`.
fn pack_runner(timeouts: &Timeouts) -> TokioCommandRunner {
    TokioCommandRunner::new(secs(timeouts.pack))
}

/// Run `hb-deploy local`.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or any stage fails.
pub async fn run_local(app: &AppContext, args: LocalArgs) -> Result<()> {
    let config = config_service::load_config(&app.config_store)?;
    let project_dir = args.project.project.clone();
    let target = config_service::resolve_local(&config, args.into());
    tracing::debug!(resolved = ?target, "resolved local target");

    let container = DockerContainer::new(
        target.container.clone(),
        TokioCommandRunner::new(secs(config.timeouts.remote)),
    );
    let reporter = app.reporter();
    let outcome = deploy_local(
        &pack_runner(&config.timeouts),
        &container,
        &StdFs,
        &target,
        DeployOptions {
            reporter: &reporter,
            project_dir: &project_dir,
            pack_timeout: secs(config.timeouts.pack),
        },
    )
    .await?;
    drop(reporter);
    app.renderer().render_deploy(&outcome)
}

/// Run `hb-deploy vm`.
///
/// # Errors
///
/// Returns an error if configuration cannot be loaded or any stage fails.
pub async fn run_vm(app: &AppContext, args: VmArgs) -> Result<()> {
    let config = config_service::load_config(&app.config_store)?;
    let project_dir = args.project.project.clone();
    let target = config_service::resolve_vm(&config, args.into());
    tracing::debug!(resolved = ?target, "resolved vm target");

    let remote = SshRemote::new(
        target.endpoint.clone(),
        TokioCommandRunner::new(secs(config.timeouts.remote)),
        secs(config.timeouts.transfer),
    );
    let prompt = app.prompt();
    let reporter = app.reporter();
    let outcome = deploy_remote(
        &pack_runner(&config.timeouts),
        &remote,
        &StdFs,
        &prompt,
        &target,
        DeployOptions {
            reporter: &reporter,
            project_dir: &project_dir,
            pack_timeout: secs(config.timeouts.pack),
        },
    )
    .await?;
    drop(reporter);
    app.renderer().render_deploy(&outcome)
}

/// Run `hb-deploy pi`.
///
/// # Errors
///
/// Returns an error if a required setting is missing, configuration cannot
/// be loaded, or any stage fails.
pub async fn run_pi(app: &AppContext, args: PiArgs) -> Result<()> {
    let config = config_service::load_config(&app.config_store)?;
    let project_dir = args.project.project.clone();
    let prompt = app.prompt();
    let target = config_service::resolve_pi(&config, args.into(), &prompt)?;
    tracing::debug!(resolved = ?target, "resolved pi target");

    let remote = SshRemote::new(
        target.endpoint.clone(),
        TokioCommandRunner::new(secs(config.timeouts.remote)),
        secs(config.timeouts.transfer),
    );
    let reporter = app.reporter();
    let outcome = deploy_remote(
        &pack_runner(&config.timeouts),
        &remote,
        &StdFs,
        &prompt,
        &target,
        DeployOptions {
            reporter: &reporter,
            project_dir: &project_dir,
            pack_timeout: secs(config.timeouts.pack),
        },
    )
    .await?;
    drop(reporter);
    app.renderer().render_deploy(&outcome)
}
