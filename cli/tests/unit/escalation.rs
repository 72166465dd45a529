//! Unit tests for credential resolution and the sudo session.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use hb_deploy::application::services::escalation::{SudoSession, obtain_credential};
use hb_deploy::domain::credential::Credential;
use hb_deploy::domain::error::DeployError;
use hb_deploy::domain::escalation::Escalation;

use crate::helpers::{PASSWORD_REQUIRED, err_output, ok_output, pi_target};
use crate::mocks::{CountingPrompt, RecordingReporter, ScriptedRemote};

#[test]
fn test_configured_credential_wins_over_prompt() {
    let prompt = CountingPrompt::interactive("typed");
    let configured = Credential::new("from-env");

    let got = obtain_credential(Some(&configured), &prompt, "pi.lan", "pi", "X").unwrap();

    assert_eq!(got, configured);
    assert_eq!(prompt.password_calls.get(), 0);
}

#[test]
fn test_headless_without_credential_names_env_var() {
    let prompt = CountingPrompt::headless();

    let err = obtain_credential(None, &prompt, "pi.lan", "pi", "HOMEBRIDGE_PI_SUDO_PASSWORD")
        .unwrap_err();

    let msg = err.to_string();
    assert!(msg.contains("pi.lan"), "got: {msg}");
    assert!(msg.contains("HOMEBRIDGE_PI_SUDO_PASSWORD"), "got: {msg}");
    assert!(matches!(
        err.downcast_ref::<DeployError>(),
        Some(DeployError::NoCredential { .. })
    ));
}

#[test]
fn test_interactive_prompt_is_asked_once() {
    let prompt = CountingPrompt::interactive("secret");

    let got = obtain_credential(None, &prompt, "pi.lan", "pi", "X").unwrap();

    assert_eq!(got.stdin_bytes(), b"secret\n");
    assert_eq!(prompt.password_calls.get(), 1);
}

#[test]
fn test_credential_debug_is_redacted() {
    let debug = format!("{:?}", Credential::new("hunter2"));
    assert!(!debug.contains("hunter2"));
}

#[tokio::test]
async fn test_session_prompts_at_most_once_across_scripts() {
    let target = pi_target();
    let prompt = CountingPrompt::interactive("pw");
    let remote = ScriptedRemote::new(
        [],
        [err_output(1, PASSWORD_REQUIRED), ok_output(b""), ok_output(b"")],
    );
    let reporter = RecordingReporter::default();
    let mut session = SudoSession::new(&target, &prompt);

    let first = session.run(&remote, &reporter, "true").await.unwrap();
    let second = session.run(&remote, &reporter, "true").await.unwrap();

    assert_eq!(first, Escalation::Password);
    assert_eq!(second, Escalation::Password);
    assert_eq!(prompt.password_calls.get(), 1);
    assert_eq!(remote.execs.borrow().len(), 3);
    assert!(
        reporter
            .events
            .borrow()
            .iter()
            .any(|e| e.starts_with("warn:")),
        "fallback is announced"
    );
}

#[tokio::test]
async fn test_session_passwordless_never_prompts() {
    let target = pi_target();
    let prompt = CountingPrompt::interactive("pw");
    let remote = ScriptedRemote::new([], [ok_output(b""), ok_output(b"")]);
    let reporter = RecordingReporter::default();
    let mut session = SudoSession::new(&target, &prompt);

    session.run(&remote, &reporter, "true").await.unwrap();
    let again = session.run(&remote, &reporter, "true").await.unwrap();

    assert_eq!(again, Escalation::Passwordless);
    assert_eq!(prompt.password_calls.get(), 0);
    assert!(remote.execs.borrow().iter().all(|c| c.stdin.is_none()));
}
