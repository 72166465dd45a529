//! SSH endpoint and the argument vectors handed to `ssh` and `scp`.

use std::path::{Path, PathBuf};

use crate::domain::shell::join_args;

/// Default SSH port; omitted from argument vectors when unchanged.
pub const DEFAULT_SSH_PORT: u16 = 22;

/// Options applied to every non-interactive connection so a stalled link or
/// an unexpected auth prompt fails instead of hanging.
const BATCH_OPTIONS: &[&str] = &[
    "BatchMode=yes",
    "ConnectTimeout=10",
    "ServerAliveInterval=15",
    "ServerAliveCountMax=3",
];

/// Where and how to reach a remote host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshEndpoint {
    pub user: String,
    pub host: String,
    pub port: u16,
    /// Private key passed with `-i`; `None` leaves key selection to ssh.
    pub identity: Option<PathBuf>,
}

impl SshEndpoint {
    /// `user@host`.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }

    fn options(&self, port_flag: &str) -> Vec<String> {
        let mut args = Vec::new();
        if let Some(identity) = &self.identity {
            args.push("-i".to_string());
            args.push(identity.display().to_string());
        }
        if self.port != DEFAULT_SSH_PORT {
            args.push(port_flag.to_string());
            args.push(self.port.to_string());
        }
        for opt in BATCH_OPTIONS {
            args.push("-o".to_string());
            args.push((*opt).to_string());
        }
        args
    }

    /// Arguments for `scp <local> user@host:<remote_path>`.
    #[must_use]
    pub fn scp_args(&self, local: &Path, remote_path: &str) -> Vec<String> {
        let mut args = self.options("-P");
        args.push(local.display().to_string());
        args.push(format!("{}:{remote_path}", self.address()));
        args
    }

    /// Arguments for `ssh user@host <command>`.
    ///
    /// ssh hands the command to the remote login shell as one string, so each
    /// remote argument is quoted before joining.
    #[must_use]
    pub fn ssh_args(&self, remote_args: &[&str]) -> Vec<String> {
        let mut args = self.options("-p");
        args.push(self.address());
        args.push(join_args(remote_args));
        args
    }
}
