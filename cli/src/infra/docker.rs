//! Local container executor — implements `ShellExecutor` with `docker exec`.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::{CommandRunner, ShellExecutor};
use crate::domain::command::display_command;

const DOCKER: &str = "docker";

/// A running container on this machine.
pub struct DockerContainer<R: CommandRunner> {
    container: String,
    runner: R,
}

impl<R: CommandRunner> DockerContainer<R> {
    #[must_use]
    pub fn new(container: impl Into<String>, runner: R) -> Self {
        Self {
            container: container.into(),
            runner,
        }
    }

    fn exec_args<'a>(&'a self, args: &[&'a str]) -> Vec<&'a str> {
        let mut full = vec!["exec", "-i", self.container.as_str()];
        full.extend_from_slice(args);
        full
    }
}

impl<R: CommandRunner> ShellExecutor for DockerContainer<R> {
    async fn exec(&self, args: &[&str]) -> Result<Output> {
        self.runner.run(DOCKER, &self.exec_args(args)).await
    }

    async fn exec_with_stdin(&self, args: &[&str], input: &[u8]) -> Result<Output> {
        self.runner
            .run_with_stdin(DOCKER, &self.exec_args(args), input)
            .await
    }

    fn describe(&self, args: &[&str]) -> String {
        display_command(DOCKER, &self.exec_args(args))
    }
}
