use crate::{CommandExecutor, CoreError, ProcessExecutor};

use std::path::Path;

/// WHAT: Successful process resolves with its stdout
/// WHY: The list query parses exactly what the tool printed
#[cfg(unix)]
#[tokio::test]
#[allow(clippy::unwrap_used)]
async fn given_succeeding_process_when_executing_then_stdout_returned() {
    // Given: A shell that prints to stdout
    let executor = ProcessExecutor;

    // When: Executing it
    let stdout = executor
        .execute(Path::new("/bin/sh"), &["-c", "printf 'hello'"])
        .await
        .unwrap();

    // Then: Captured stdout is returned verbatim
    assert_eq!(stdout, "hello");
}

/// WHAT: Non-zero exit rejects with exit code and stderr attached
/// WHY: Callers must see why the hypervisor refused a command
#[cfg(unix)]
#[tokio::test]
#[allow(clippy::panic)]
async fn given_failing_process_when_executing_then_external_command_error_with_details() {
    // Given: A shell that writes to stderr and exits 3
    let executor = ProcessExecutor;

    // When: Executing it
    let result = executor
        .execute(Path::new("/bin/sh"), &["-c", "echo boom >&2; exit 3"])
        .await;

    // Then: Error carries exit code and trimmed stderr, no OS error
    match result {
        Err(CoreError::ExternalCommand {
            exit_code,
            stderr,
            source,
            ..
        }) => {
            assert_eq!(exit_code, Some(3));
            assert_eq!(stderr, "boom");
            assert!(source.is_none());
        }
        other => panic!("expected ExternalCommand error, got {other:?}"),
    }
}

/// WHAT: Missing executable rejects with the spawn error attached
/// WHY: A wrong PRLCTL_PATH must surface instead of hanging the engine
#[tokio::test]
#[allow(clippy::panic)]
async fn given_missing_program_when_executing_then_external_command_error_with_source() {
    // Given: A path that does not exist
    let executor = ProcessExecutor;

    // When: Executing it
    let result = executor
        .execute(Path::new("/nonexistent/prlctl"), &["list"])
        .await;

    // Then: Spawn failure is reported without an exit code
    match result {
        Err(CoreError::ExternalCommand {
            command,
            exit_code,
            source,
            ..
        }) => {
            assert_eq!(command, "/nonexistent/prlctl list");
            assert_eq!(exit_code, None);
            assert!(source.is_some());
        }
        other => panic!("expected ExternalCommand error, got {other:?}"),
    }
}
