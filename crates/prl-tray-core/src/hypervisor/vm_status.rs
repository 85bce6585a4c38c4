use std::fmt;

use serde::{Deserialize, Serialize};

/// Status marker the hypervisor reports for a running VM.
pub const STATUS_RUNNING: &str = "running";

/// Status marker the hypervisor reports for a stopped VM.
pub const STATUS_STOPPED: &str = "stopped";

/// Observed lifecycle status of a virtual machine.
///
/// Only `running` and `stopped` are acted upon. Anything else the tool
/// reports is carried verbatim in [`VmStatus::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum VmStatus {
    /// VM is running.
    Running,
    /// VM is stopped.
    Stopped,
    /// Any status the engine does not recognize (e.g. `suspended`).
    Other(String),
}

impl VmStatus {
    /// Status text as reported by the hypervisor.
    pub fn as_str(&self) -> &str {
        match self {
            VmStatus::Running => STATUS_RUNNING,
            VmStatus::Stopped => STATUS_STOPPED,
            VmStatus::Other(raw) => raw,
        }
    }

    /// Whether this status is one the engine knows how to act on.
    pub fn is_known(&self) -> bool {
        !matches!(self, VmStatus::Other(_))
    }

    /// Whether raw `status` command output indicates this status.
    ///
    /// The tool's free-text format is not parsed; only substring
    /// containment of the status marker is relied upon. Unrecognized
    /// statuses never match.
    pub fn matches_output(&self, output: &str) -> bool {
        let output = output.trim();
        match self {
            VmStatus::Running => output.contains(STATUS_RUNNING),
            VmStatus::Stopped => output.contains(STATUS_STOPPED),
            VmStatus::Other(_) => false,
        }
    }
}

impl From<String> for VmStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            STATUS_RUNNING => VmStatus::Running,
            STATUS_STOPPED => VmStatus::Stopped,
            _ => VmStatus::Other(raw),
        }
    }
}

impl From<&str> for VmStatus {
    fn from(raw: &str) -> Self {
        VmStatus::from(raw.to_string())
    }
}

impl From<VmStatus> for String {
    fn from(status: VmStatus) -> Self {
        match status {
            VmStatus::Other(raw) => raw,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for VmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
