//! hb-deploy - package a Homebridge plugin and install it on a Homebridge host

use clap::Parser;
use tracing_subscriber::EnvFilter;

use hb_deploy::cli::Cli;
use hb_deploy::domain::error::{ConfigError, DeployError};
use hb_deploy::output::json::format_error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let json = cli.json;
    if let Err(e) = cli.run().await {
        if json {
            if let Ok(obj) = format_error(&format!("{e:#}"), error_code(&e)) {
                println!("{obj}");
            }
        }
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins; otherwise `--verbose` selects debug and the default is warn.
fn init_tracing(verbose: bool) {
    let fallback = if verbose { "hb_deploy=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn error_code(e: &anyhow::Error) -> &'static str {
    if let Some(err) = e.downcast_ref::<DeployError>() {
        return match err {
            DeployError::Packaging(_) | DeployError::NoArtifact => "packaging_failed",
            DeployError::Transfer(_) => "transfer_failed",
            DeployError::RemoteExec(_) => "remote_exec_failed",
            DeployError::NoCredential { .. } => "no_credential",
        };
    }
    if e.downcast_ref::<ConfigError>().is_some() {
        return "config_error";
    }
    "error"
}
