//! Deployment targets, resolved once at startup, and the remote install
//! scripts they produce for a given artifact.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::artifact::Artifact;
use crate::domain::credential::Credential;
use crate::domain::error::ConfigError;
use crate::domain::shell::{join_args, quote_arg};
use crate::domain::ssh::SshEndpoint;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VM_PASSWORD_ENV: &str = "HOMEBRIDGE_VM_SUDO_PASSWORD";
pub const PI_PASSWORD_ENV: &str = "HOMEBRIDGE_PI_SUDO_PASSWORD";

// ── Cleanup policy ───────────────────────────────────────────────────────────

/// Whether the installed copy of the artifact is deleted after install.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteCleanup {
    Keep,
    Remove,
}

impl RemoteCleanup {
    pub const VALUES: &'static [&'static str] = &["keep", "remove"];
}

impl FromStr for RemoteCleanup {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "keep" => Ok(Self::Keep),
            "remove" => Ok(Self::Remove),
            other => Err(ConfigError::InvalidValue {
                key: "cleanup".to_string(),
                value: other.to_string(),
                valid: Self::VALUES.join(", "),
            }),
        }
    }
}

impl fmt::Display for RemoteCleanup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Keep => "keep",
            Self::Remove => "remove",
        })
    }
}

// ── Target kinds ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Local,
    Vm,
    Pi,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Local => "local",
            Self::Vm => "vm",
            Self::Pi => "pi",
        })
    }
}

// ── Local Docker target ──────────────────────────────────────────────────────

/// Homebridge in a Docker container on this machine.
#[derive(Debug, Clone)]
pub struct LocalTarget {
    pub container: String,
    /// Host directory mounted into the container.
    pub volume_dir: PathBuf,
    /// Where `volume_dir` appears inside the container.
    pub container_dir: String,
    pub cleanup: RemoteCleanup,
}

impl LocalTarget {
    /// Command run inside the container to install the artifact.
    #[must_use]
    pub fn install_args(&self, artifact: &Artifact) -> Vec<String> {
        vec![
            "npm".to_string(),
            "install".to_string(),
            artifact.remote_path(&self.container_dir),
        ]
    }
}

// ── Remote (SSH) targets ─────────────────────────────────────────────────────

/// What differs between SSH targets; the deploy pipeline is shared.
pub trait RemoteRecipe {
    fn kind(&self) -> TargetKind;
    fn endpoint(&self) -> &SshEndpoint;
    /// Password supplied up front (from the environment), if any.
    fn sudo_password(&self) -> Option<&Credential>;
    /// Environment variable users can set to supply the password.
    fn password_env(&self) -> &'static str;
    fn cleanup(&self) -> RemoteCleanup;
    /// Where `scp` drops the artifact.
    fn staging_path(&self, artifact: &Artifact) -> String;
    /// Where the install script leaves the artifact.
    fn installed_path(&self, artifact: &Artifact) -> String;
    /// Root script installing the staged artifact.
    fn install_script(&self, artifact: &Artifact) -> String;

    /// Root script deleting the installed copy.
    fn cleanup_script(&self, artifact: &Artifact) -> String {
        join_args(&["rm", "-f", self.installed_path(artifact).as_str()])
    }
}

/// Homebridge VM image: plugins live in the `homebridge` user's home and npm
/// is only on PATH after sourcing the runtime environment.
#[derive(Debug, Clone)]
pub struct VmTarget {
    pub endpoint: SshEndpoint,
    pub service_user: String,
    pub service_home: String,
    pub runtime_env: String,
    pub staging_dir: String,
    pub sudo_password: Option<Credential>,
    pub cleanup: RemoteCleanup,
}

impl RemoteRecipe for VmTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::Vm
    }

    fn endpoint(&self) -> &SshEndpoint {
        &self.endpoint
    }

    fn sudo_password(&self) -> Option<&Credential> {
        self.sudo_password.as_ref()
    }

    fn password_env(&self) -> &'static str {
        VM_PASSWORD_ENV
    }

    fn cleanup(&self) -> RemoteCleanup {
        self.cleanup
    }

    fn staging_path(&self, artifact: &Artifact) -> String {
        artifact.remote_path(&self.staging_dir)
    }

    fn installed_path(&self, artifact: &Artifact) -> String {
        artifact.remote_path(&self.service_home)
    }

    fn install_script(&self, artifact: &Artifact) -> String {
        let src = self.staging_path(artifact);
        let dst = self.installed_path(artifact);
        let user = self.service_user.as_str();
        let home = self.service_home.as_str();
        let home_env = format!("HOME={home}");
        // A non-interactive login shell may skip the rcfile that sources the
        // runtime env, so source it explicitly.
        let npm = format!(
            "cd {} && . {} && npm install {}",
            quote_arg(home),
            quote_arg(&self.runtime_env),
            quote_arg(&dst),
        );
        [
            "set -e".to_string(),
            join_args(&["install", "-o", user, "-g", user, "-m", "0644", src.as_str(), dst.as_str()]),
            join_args(&["sudo", "-u", user, "env", home_env.as_str(), "bash", "-lc", npm.as_str()]),
        ]
        .join("\n")
    }
}

/// Raspberry Pi running Homebridge in Docker with a volume under the SSH
/// user's home.
#[derive(Debug, Clone)]
pub struct PiTarget {
    pub endpoint: SshEndpoint,
    pub container: String,
    pub volume_dir: String,
    pub container_dir: String,
    pub staging_dir: String,
    pub sudo_password: Option<Credential>,
    pub cleanup: RemoteCleanup,
}

impl RemoteRecipe for PiTarget {
    fn kind(&self) -> TargetKind {
        TargetKind::Pi
    }

    fn endpoint(&self) -> &SshEndpoint {
        &self.endpoint
    }

    fn sudo_password(&self) -> Option<&Credential> {
        self.sudo_password.as_ref()
    }

    fn password_env(&self) -> &'static str {
        PI_PASSWORD_ENV
    }

    fn cleanup(&self) -> RemoteCleanup {
        self.cleanup
    }

    fn staging_path(&self, artifact: &Artifact) -> String {
        artifact.remote_path(&self.staging_dir)
    }

    fn installed_path(&self, artifact: &Artifact) -> String {
        artifact.remote_path(&self.volume_dir)
    }

    fn install_script(&self, artifact: &Artifact) -> String {
        let in_container = artifact.remote_path(&self.container_dir);
        [
            "set -e".to_string(),
            join_args(&[
                "mv",
                self.staging_path(artifact).as_str(),
                self.installed_path(artifact).as_str(),
            ]),
            join_args(&[
                "docker",
                "exec",
                "-i",
                self.container.as_str(),
                "npm",
                "install",
                in_container.as_str(),
            ]),
        ]
        .join("\n")
    }
}
