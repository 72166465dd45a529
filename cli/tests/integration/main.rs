//! Integration tests for hb-deploy
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! Tests that touch configuration point `HB_DEPLOY_CONFIG` at a temp file so the user's real
//! configuration is never read or written.

mod config_command;
