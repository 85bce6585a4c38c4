use crate::hypervisor::VmStatus;

use serde::{Deserialize, Serialize};

/// One virtual machine as reported by a single list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VmRecord {
    /// VM name, unique within one list result.
    pub name: String,
    /// Status observed at query time.
    pub status: VmStatus,
}

impl VmRecord {
    /// Create a record from a name and status.
    pub fn new(name: impl Into<String>, status: impl Into<VmStatus>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
        }
    }

    /// Whether the VM was running when listed.
    pub fn is_running(&self) -> bool {
        self.status == VmStatus::Running
    }
}
