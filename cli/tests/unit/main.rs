//! Unit tests for hb-deploy
//!
//! These tests drive the application services with mocked ports and run
//! fast without spawning processes or touching the network.

mod escalation;
mod helpers;
mod mocks;
mod package_service;
mod property_tests;
