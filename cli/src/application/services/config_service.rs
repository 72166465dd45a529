//! Application service — configuration use-cases.
//!
//! Targets are resolved once, before anything runs, with the precedence:
//! command-line flag or environment variable > config file > built-in
//! default > interactive prompt > [`ConfigError::Missing`].

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::application::ports::{ConfigStore, UserPrompt};
use crate::domain::config::{
    DEFAULT_CONTAINER, DEFAULT_CONTAINER_DIR, DEFAULT_LOCAL_VOLUME_DIR, DEFAULT_RUNTIME_ENV,
    DEFAULT_SERVICE_HOME, DEFAULT_SERVICE_USER, DEFAULT_VM_HOST, DEFAULT_VM_USER, DeployConfig,
};
use crate::domain::credential::Credential;
use crate::domain::error::ConfigError;
use crate::domain::ssh::{DEFAULT_SSH_PORT, SshEndpoint};
use crate::domain::target::{LocalTarget, PiTarget, RemoteCleanup, VmTarget};

/// Load configuration.
///
/// # Errors
///
/// Returns an error if the config file exists but cannot be read or parsed.
pub fn load_config(store: &impl ConfigStore) -> Result<DeployConfig> {
    store.load()
}

/// Save configuration.
///
/// # Errors
///
/// Returns an error if the config file cannot be written.
pub fn save_config(store: &impl ConfigStore, config: &DeployConfig) -> Result<()> {
    store.save(config)
}

/// Validate and persist one `key = value` setting.
///
/// # Errors
///
/// Returns an error if the key or value is invalid, or persistence fails.
pub fn set_value(store: &impl ConfigStore, key: &str, value: &str) -> Result<DeployConfig> {
    let mut config = load_config(store)?;
    config.set(key, value)?;
    save_config(store, &config)?;
    Ok(config)
}

// ── Overrides ────────────────────────────────────────────────────────────────

/// Per-run values that win over the config file (flags or env vars).
#[derive(Debug, Clone, Default)]
pub struct SshOverrides {
    pub host: Option<String>,
    pub user: Option<String>,
    pub port: Option<u16>,
    pub identity: Option<PathBuf>,
    pub staging_dir: Option<String>,
    pub sudo_password: Option<String>,
    pub cleanup: Option<RemoteCleanup>,
}

#[derive(Debug, Clone, Default)]
pub struct VmOverrides {
    pub ssh: SshOverrides,
    pub service_user: Option<String>,
    pub service_home: Option<String>,
    pub runtime_env: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PiOverrides {
    pub ssh: SshOverrides,
    pub container: Option<String>,
    pub volume_dir: Option<String>,
    pub container_dir: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LocalOverrides {
    pub container: Option<String>,
    pub volume_dir: Option<PathBuf>,
    pub container_dir: Option<String>,
    pub cleanup: Option<RemoteCleanup>,
}

// ── Resolution ───────────────────────────────────────────────────────────────

/// Resolve the local Docker target. Every field has a default.
#[must_use]
pub fn resolve_local(config: &DeployConfig, o: LocalOverrides) -> LocalTarget {
    let section = &config.local;
    LocalTarget {
        container: o
            .container
            .or_else(|| section.container.clone())
            .unwrap_or_else(|| DEFAULT_CONTAINER.to_string()),
        volume_dir: expand_home(
            o.volume_dir
                .or_else(|| section.volume_dir.clone())
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_VOLUME_DIR)),
        ),
        container_dir: o
            .container_dir
            .or_else(|| section.container_dir.clone())
            .unwrap_or_else(|| DEFAULT_CONTAINER_DIR.to_string()),
        cleanup: o.cleanup.or(section.cleanup).unwrap_or(RemoteCleanup::Keep),
    }
}

/// Resolve the VM target. Every field has a default; the sudo password is
/// only ever taken from the override.
#[must_use]
pub fn resolve_vm(config: &DeployConfig, o: VmOverrides) -> VmTarget {
    let section = &config.vm;
    let user = o
        .ssh
        .user
        .or_else(|| section.user.clone())
        .unwrap_or_else(|| DEFAULT_VM_USER.to_string());
    VmTarget {
        endpoint: SshEndpoint {
            host: o
                .ssh
                .host
                .or_else(|| section.host.clone())
                .unwrap_or_else(|| DEFAULT_VM_HOST.to_string()),
            port: o.ssh.port.or(section.port).unwrap_or(DEFAULT_SSH_PORT),
            identity: o
                .ssh
                .identity
                .or_else(|| section.identity.clone())
                .map(expand_home),
            user: user.clone(),
        },
        service_user: o
            .service_user
            .or_else(|| section.service_user.clone())
            .unwrap_or_else(|| DEFAULT_SERVICE_USER.to_string()),
        service_home: o
            .service_home
            .or_else(|| section.service_home.clone())
            .unwrap_or_else(|| DEFAULT_SERVICE_HOME.to_string()),
        runtime_env: o
            .runtime_env
            .or_else(|| section.runtime_env.clone())
            .unwrap_or_else(|| DEFAULT_RUNTIME_ENV.to_string()),
        staging_dir: o
            .ssh
            .staging_dir
            .or_else(|| section.staging_dir.clone())
            .unwrap_or_else(|| format!("/home/{user}")),
        sudo_password: o.ssh.sudo_password.map(Credential::new),
        cleanup: o.ssh.cleanup.or(section.cleanup).unwrap_or(RemoteCleanup::Keep),
    }
}

/// Resolve the Raspberry Pi target. Host, user and key have no default and
/// are prompted for when a terminal is available.
///
/// # Errors
///
/// Returns [`ConfigError::Missing`] for a required value that is neither
/// configured nor obtainable by prompt, or the prompt's own error.
pub fn resolve_pi(
    config: &DeployConfig,
    o: PiOverrides,
    prompt: &impl UserPrompt,
) -> Result<PiTarget> {
    let section = &config.pi;
    let host = required(
        o.ssh.host.or_else(|| section.host.clone()),
        prompt,
        "Enter ip address",
        ConfigError::Missing {
            field: "Raspberry Pi host",
            flag: "host",
            env_var: "HOMEBRIDGE_PI_IP_ADDRESS",
            key: "pi.host",
        },
    )?;
    let user = required(
        o.ssh.user.or_else(|| section.user.clone()),
        prompt,
        "Enter username",
        ConfigError::Missing {
            field: "Raspberry Pi username",
            flag: "user",
            env_var: "HOMEBRIDGE_PI_USERNAME",
            key: "pi.user",
        },
    )?;
    let identity = required(
        o.ssh
            .identity
            .or_else(|| section.identity.clone())
            .map(|p| p.display().to_string()),
        prompt,
        "Enter PEM file path",
        ConfigError::Missing {
            field: "SSH private key",
            flag: "identity",
            env_var: "HOMEBRIDGE_PI_SSH_PEM",
            key: "pi.identity",
        },
    )?;

    Ok(PiTarget {
        endpoint: SshEndpoint {
            host,
            user: user.clone(),
            port: o.ssh.port.or(section.port).unwrap_or(DEFAULT_SSH_PORT),
            identity: Some(expand_home(PathBuf::from(identity))),
        },
        container: o
            .container
            .or_else(|| section.container.clone())
            .unwrap_or_else(|| DEFAULT_CONTAINER.to_string()),
        volume_dir: o
            .volume_dir
            .or_else(|| section.volume_dir.clone())
            .unwrap_or_else(|| format!("/home/{user}/homebridge")),
        container_dir: o
            .container_dir
            .or_else(|| section.container_dir.clone())
            .unwrap_or_else(|| DEFAULT_CONTAINER_DIR.to_string()),
        staging_dir: o
            .ssh
            .staging_dir
            .or_else(|| section.staging_dir.clone())
            .unwrap_or_else(|| format!("/home/{user}")),
        sudo_password: o.ssh.sudo_password.map(Credential::new),
        cleanup: o.ssh.cleanup.or(section.cleanup).unwrap_or(RemoteCleanup::Remove),
    })
}

fn required(
    value: Option<String>,
    prompt: &impl UserPrompt,
    label: &str,
    missing: ConfigError,
) -> Result<String> {
    if let Some(v) = value.filter(|v| !v.trim().is_empty()) {
        return Ok(v);
    }
    if !prompt.is_interactive() {
        return Err(missing.into());
    }
    let answer = prompt
        .input(label)
        .with_context(|| format!("reading {label}"))?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(missing.into());
    }
    Ok(answer.to_string())
}

/// Expand a leading `~/` to the home directory; other paths are unchanged.
#[must_use]
pub fn expand_home(path: PathBuf) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path,
    }
}
