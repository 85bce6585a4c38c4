//! Single-shot external process execution.

use crate::{CoreError, CoreResult};

use std::{panic::Location, path::Path};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::{debug, instrument, warn};

/// Runs one external command and returns its standard output.
///
/// Implementations spawn exactly one process per call, impose no timeout
/// and never retry.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Execute `program` with `args`, resolving to captured stdout.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ExternalCommand`] when the process cannot be
    /// spawned or exits with a non-zero status.
    async fn execute(&self, program: &Path, args: &[&str]) -> CoreResult<String>;
}

/// [`CommandExecutor`] backed by `tokio::process`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

#[async_trait]
impl CommandExecutor for ProcessExecutor {
    #[instrument(skip(self))]
    async fn execute(&self, program: &Path, args: &[&str]) -> CoreResult<String> {
        let command = command_line(program, args);
        debug!(command = %command, "Executing external command");

        let output = tokio::process::Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|e| {
                warn!(command = %command, error = ?e, "Failed to spawn external command");
                CoreError::ExternalCommand {
                    command: command.clone(),
                    exit_code: None,
                    stderr: String::new(),
                    source: Some(e),
                    location: ErrorLocation::from(Location::caller()),
                }
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!(
                command = %command,
                exit_code = ?output.status.code(),
                stderr = %stderr,
                "External command exited unsuccessfully"
            );
            return Err(CoreError::ExternalCommand {
                command,
                exit_code: output.status.code(),
                stderr,
                source: None,
                location: ErrorLocation::from(Location::caller()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Render a program and its arguments for logs and error messages.
pub(crate) fn command_line(program: &Path, args: &[&str]) -> String {
    let mut line = program.display().to_string();
    for arg in args {
        line.push(' ');
        line.push_str(arg);
    }
    line
}
