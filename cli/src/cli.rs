//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Package a Homebridge plugin and install it on a Homebridge host
#[derive(Parser)]
#[command(
    name = "hb-deploy",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log debug details to stderr (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Never prompt; fail when a value or password is missing
    #[arg(long, global = true, env = "HB_DEPLOY_NON_INTERACTIVE")]
    pub non_interactive: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Deploy into a Docker container on this machine
    Local(commands::deploy::LocalArgs),

    /// Deploy to a Homebridge VM over SSH
    Vm(commands::deploy::VmArgs),

    /// Deploy to a Raspberry Pi running Homebridge in Docker
    Pi(commands::deploy::PiArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            non_interactive,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { non_interactive },
        });

        match command {
            Command::Local(args) => commands::deploy::run_local(&app, args).await,
            Command::Vm(args) => commands::deploy::run_vm(&app, args).await,
            Command::Pi(args) => commands::deploy::run_pi(&app, args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
