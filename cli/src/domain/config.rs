//! Domain types and validators for hb-deploy configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::error::ConfigError;
use crate::domain::target::RemoteCleanup;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "timeouts.pack",
    "timeouts.transfer",
    "timeouts.remote",
    "local.container",
    "local.volume_dir",
    "local.container_dir",
    "local.cleanup",
    "vm.host",
    "vm.user",
    "vm.port",
    "vm.identity",
    "vm.service_user",
    "vm.service_home",
    "vm.runtime_env",
    "vm.staging_dir",
    "vm.cleanup",
    "pi.host",
    "pi.user",
    "pi.port",
    "pi.identity",
    "pi.container",
    "pi.volume_dir",
    "pi.container_dir",
    "pi.staging_dir",
    "pi.cleanup",
];

pub const DEFAULT_CONTAINER: &str = "homebridge";
pub const DEFAULT_LOCAL_VOLUME_DIR: &str = ".homebridge";
pub const DEFAULT_CONTAINER_DIR: &str = "/homebridge";
pub const DEFAULT_VM_HOST: &str = "homebridge-vm.local";
pub const DEFAULT_VM_USER: &str = "admin";
pub const DEFAULT_SERVICE_USER: &str = "homebridge";
pub const DEFAULT_SERVICE_HOME: &str = "/var/lib/homebridge";
pub const DEFAULT_RUNTIME_ENV: &str = "/opt/homebridge/source.sh";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.hb-deploy/config.yaml`.
///
/// Every field is optional; unset fields fall back to built-in defaults or
/// to an interactive prompt at resolution time. Credentials are never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    pub timeouts: Timeouts,
    pub local: LocalSection,
    pub vm: VmSection,
    pub pi: PiSection,
}

/// Per-step command timeouts in seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    pub pack: u64,
    pub transfer: u64,
    pub remote: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            pack: 120,
            transfer: 300,
            remote: 900,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_dir: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<RemoteCleanup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VmSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_home: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime_env: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<RemoteCleanup>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PiSection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identity: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub staging_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup: Option<RemoteCleanup>,
}

impl DeployConfig {
    /// Validate and apply `key = value`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid for it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        validate_config_key(key)?;
        validate_config_value(key, value)?;
        let text = || Some(value.to_string());
        match key {
            "timeouts.pack" => self.timeouts.pack = parse_timeout(key, value)?,
            "timeouts.transfer" => self.timeouts.transfer = parse_timeout(key, value)?,
            "timeouts.remote" => self.timeouts.remote = parse_timeout(key, value)?,
            "local.container" => self.local.container = text(),
            "local.volume_dir" => self.local.volume_dir = Some(PathBuf::from(value)),
            "local.container_dir" => self.local.container_dir = text(),
            "local.cleanup" => self.local.cleanup = Some(value.parse()?),
            "vm.host" => self.vm.host = text(),
            "vm.user" => self.vm.user = text(),
            "vm.port" => self.vm.port = Some(parse_port(key, value)?),
            "vm.identity" => self.vm.identity = Some(PathBuf::from(value)),
            "vm.service_user" => self.vm.service_user = text(),
            "vm.service_home" => self.vm.service_home = text(),
            "vm.runtime_env" => self.vm.runtime_env = text(),
            "vm.staging_dir" => self.vm.staging_dir = text(),
            "vm.cleanup" => self.vm.cleanup = Some(value.parse()?),
            "pi.host" => self.pi.host = text(),
            "pi.user" => self.pi.user = text(),
            "pi.port" => self.pi.port = Some(parse_port(key, value)?),
            "pi.identity" => self.pi.identity = Some(PathBuf::from(value)),
            "pi.container" => self.pi.container = text(),
            "pi.volume_dir" => self.pi.volume_dir = text(),
            "pi.container_dir" => self.pi.container_dir = text(),
            "pi.staging_dir" => self.pi.staging_dir = text(),
            "pi.cleanup" => self.pi.cleanup = Some(value.parse()?),
            _ => anyhow::bail!("Unknown setting: {key}"),
        }
        Ok(())
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    match key.rsplit('.').next().unwrap_or(key) {
        "port" => {
            parse_port(key, value)?;
        }
        "pack" | "transfer" | "remote" => {
            parse_timeout(key, value)?;
        }
        "cleanup" => {
            if !RemoteCleanup::VALUES.contains(&value) {
                return Err(invalid(key, value, &RemoteCleanup::VALUES.join(", ")).into());
            }
        }
        _ => {
            if value.trim().is_empty() {
                return Err(invalid(key, value, "any non-empty value").into());
            }
        }
    }
    Ok(())
}

fn parse_port(key: &str, value: &str) -> Result<u16, ConfigError> {
    match value.parse::<u16>() {
        Ok(port) if port != 0 => Ok(port),
        _ => Err(invalid(key, value, "1-65535")),
    }
}

fn parse_timeout(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(invalid(key, value, "a positive number of seconds")),
    }
}

fn invalid(key: &str, value: &str, valid: &str) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        valid: valid.to_string(),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
