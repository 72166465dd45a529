//! Shared test helpers: exit statuses, output constructors and target fixtures.

#![allow(dead_code)]

use std::path::PathBuf;
use std::process::{ExitStatus, Output};

use hb_deploy::domain::credential::Credential;
use hb_deploy::domain::ssh::SshEndpoint;
use hb_deploy::domain::target::{LocalTarget, PiTarget, RemoteCleanup, VmTarget};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
/// On Windows `ExitStatusExt::from_raw` takes the exit code directly.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

// ── Target fixtures ──────────────────────────────────────────────────────────

pub const ARTIFACT: &str = "plugin-1.2.3.tgz";
pub const PACK_STDOUT: &[u8] = b"npm notice package: plugin@1.2.3\nplugin-1.2.3.tgz\n";
pub const PASSWORD_REQUIRED: &[u8] = b"sudo: a password is required\n";

pub fn vm_target() -> VmTarget {
    VmTarget {
        endpoint: SshEndpoint {
            user: "admin".to_string(),
            host: "homebridge-vm.local".to_string(),
            port: 22,
            identity: None,
        },
        service_user: "homebridge".to_string(),
        service_home: "/var/lib/homebridge".to_string(),
        runtime_env: "/opt/homebridge/source.sh".to_string(),
        staging_dir: "/home/admin".to_string(),
        sudo_password: None,
        cleanup: RemoteCleanup::Keep,
    }
}

pub fn pi_target() -> PiTarget {
    PiTarget {
        endpoint: SshEndpoint {
            user: "pi".to_string(),
            host: "192.168.1.20".to_string(),
            port: 22,
            identity: Some(PathBuf::from("/home/me/.ssh/pi.pem")),
        },
        container: "homebridge".to_string(),
        volume_dir: "/home/pi/homebridge".to_string(),
        container_dir: "/homebridge".to_string(),
        staging_dir: "/home/pi".to_string(),
        sudo_password: None,
        cleanup: RemoteCleanup::Remove,
    }
}

pub fn with_password(mut target: VmTarget, secret: &str) -> VmTarget {
    target.sudo_password = Some(Credential::new(secret));
    target
}

pub fn local_target(volume_dir: &str) -> LocalTarget {
    LocalTarget {
        container: "homebridge".to_string(),
        volume_dir: PathBuf::from(volume_dir),
        container_dir: "/homebridge".to_string(),
        cleanup: RemoteCleanup::Keep,
    }
}
