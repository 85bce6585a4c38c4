use error_location::ErrorLocation;
use thiserror::Error;

/// Engine errors with source location tracking.
#[derive(Error, Debug)]
pub enum CoreError {
    /// External process could not be spawned or exited unsuccessfully.
    #[error("External command `{command}` failed (exit code {exit_code:?}): {stderr} {location}")]
    ExternalCommand {
        /// The command line that was executed.
        command: String,
        /// Exit code, if the process ran and exited normally.
        exit_code: Option<i32>,
        /// Captured standard error, trimmed.
        stderr: String,
        /// Spawn or wait failure reported by the OS.
        #[source]
        source: Option<std::io::Error>,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Hypervisor output was not valid structured data.
    #[error("Failed to parse hypervisor output: {reason} {location}")]
    Parse {
        /// What was being parsed.
        reason: String,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Preference file could not be read or written.
    #[error("Preferences error: {reason} {location}")]
    Preferences {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },

    /// Display collaborator is no longer accepting updates.
    #[error("Display unavailable: {reason} {location}")]
    Display {
        /// Description of the failure.
        reason: String,
        /// Source location where error occurred.
        location: ErrorLocation,
    },
}

/// Result type alias using [`CoreError`].
pub type Result<T> = std::result::Result<T, CoreError>;
