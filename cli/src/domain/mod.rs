//! Domain layer — pure types, validation, and command construction.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod artifact;
pub mod command;
pub mod config;
pub mod credential;
pub mod error;
pub mod escalation;
pub mod shell;
pub mod ssh;
pub mod target;

#[allow(unused_imports)]
pub use artifact::Artifact;
#[allow(unused_imports)]
pub use command::{CommandFailure, CommandOutcome};
#[allow(unused_imports)]
pub use config::{DeployConfig, validate_config_key, validate_config_value};
#[allow(unused_imports)]
pub use credential::Credential;
#[allow(unused_imports)]
pub use error::{ConfigError, DeployError, TransferFailure};
#[allow(unused_imports)]
pub use escalation::{Escalation, needs_password};
#[allow(unused_imports)]
pub use target::{LocalTarget, PiTarget, RemoteCleanup, RemoteRecipe, TargetKind, VmTarget};
