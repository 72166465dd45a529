//! SSH transport — implements `FileTransfer` with `scp` and `ShellExecutor`
//! with `ssh`, both through an injected `CommandRunner`.

use std::path::Path;
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::application::ports::{CommandRunner, FileTransfer, ShellExecutor};
use crate::domain::command::display_command;
use crate::domain::ssh::SshEndpoint;

const SCP: &str = "scp";
const SSH: &str = "ssh";

/// A remote host reached with the system OpenSSH client.
pub struct SshRemote<R: CommandRunner> {
    endpoint: SshEndpoint,
    runner: R,
    transfer_timeout: Duration,
}

impl<R: CommandRunner> SshRemote<R> {
    /// `runner`'s own timeout applies to remote commands; copies use
    /// `transfer_timeout`.
    #[must_use]
    pub fn new(endpoint: SshEndpoint, runner: R, transfer_timeout: Duration) -> Self {
        Self {
            endpoint,
            runner,
            transfer_timeout,
        }
    }
}

fn as_strs(args: &[String]) -> Vec<&str> {
    args.iter().map(String::as_str).collect()
}

impl<R: CommandRunner> FileTransfer for SshRemote<R> {
    async fn transfer(&self, local: &Path, remote_path: &str) -> Result<Output> {
        let args = self.endpoint.scp_args(local, remote_path);
        self.runner
            .run_with_timeout(SCP, &as_strs(&args), self.transfer_timeout)
            .await
    }

    fn describe_transfer(&self, local: &Path, remote_path: &str) -> String {
        display_command(SCP, &as_strs(&self.endpoint.scp_args(local, remote_path)))
    }
}

impl<R: CommandRunner> ShellExecutor for SshRemote<R> {
    async fn exec(&self, args: &[&str]) -> Result<Output> {
        let ssh_args = self.endpoint.ssh_args(args);
        self.runner.run(SSH, &as_strs(&ssh_args)).await
    }

    async fn exec_with_stdin(&self, args: &[&str], input: &[u8]) -> Result<Output> {
        let ssh_args = self.endpoint.ssh_args(args);
        self.runner
            .run_with_stdin(SSH, &as_strs(&ssh_args), input)
            .await
    }

    fn describe(&self, args: &[&str]) -> String {
        display_command(SSH, &as_strs(&self.endpoint.ssh_args(args)))
    }
}
