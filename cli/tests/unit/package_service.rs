//! Unit tests for the packaging stage.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;
use std::time::Duration;

use hb_deploy::application::services::package::package;
use hb_deploy::domain::error::DeployError;

use crate::helpers::{err_output, ok_output};
use crate::mocks::{RecordingReporter, ScriptedRunner};

const TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::test]
async fn test_artifact_is_last_non_empty_line() {
    let runner = ScriptedRunner::new([ok_output(b"plugin-1.2.3.tgz\n")]);
    let reporter = RecordingReporter::default();

    let artifact = package(&runner, &reporter, Path::new("plugins/demo"), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(artifact.file_name(), "plugin-1.2.3.tgz");
    assert_eq!(runner.calls.borrow()[0].args, ["pack", "plugins/demo"]);
    assert_eq!(*reporter.echoed_stdout.borrow(), "plugin-1.2.3.tgz\n");
}

#[tokio::test]
async fn test_notices_and_trailing_blank_lines_are_skipped() {
    let runner = ScriptedRunner::new([ok_output(
        b"npm notice Tarball Contents\nnpm notice 1.2kB package.json\n  demo-0.0.1.tgz  \n\n\n",
    )]);

    let artifact = package(&runner, &RecordingReporter::default(), Path::new("."), TIMEOUT)
        .await
        .unwrap();

    assert_eq!(artifact.file_name(), "demo-0.0.1.tgz");
}

#[tokio::test]
async fn test_empty_output_is_no_artifact() {
    let runner = ScriptedRunner::new([ok_output(b"\n  \n")]);

    let err = package(&runner, &RecordingReporter::default(), Path::new("."), TIMEOUT)
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<DeployError>(),
        Some(DeployError::NoArtifact)
    ));
}

#[tokio::test]
async fn test_non_zero_exit_is_packaging_error_with_output() {
    let runner = ScriptedRunner::new([err_output(254, b"npm ERR! enoent package.json\n")]);

    let err = package(&runner, &RecordingReporter::default(), Path::new("."), TIMEOUT)
        .await
        .unwrap_err();

    match err.downcast_ref::<DeployError>() {
        Some(DeployError::Packaging(failure)) => {
            assert_eq!(failure.outcome.code, Some(254));
            assert_eq!(failure.command, "npm pack .");
            assert!(failure.mentions("enoent"));
        }
        other => panic!("expected Packaging, got {other:?}"),
    }
}

#[tokio::test]
async fn test_spawn_error_propagates_with_context() {
    let runner = ScriptedRunner::new([]);

    let err = package(&runner, &RecordingReporter::default(), Path::new("."), TIMEOUT)
        .await
        .unwrap_err();

    assert!(format!("{err:#}").contains("running npm pack"), "got: {err:#}");
}
