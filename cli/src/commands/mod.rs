//! Command implementations

pub mod config;
pub mod deploy;
pub mod version;
