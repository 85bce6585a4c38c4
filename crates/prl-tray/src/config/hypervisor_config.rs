use std::path::PathBuf;

/// Hypervisor tool configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HypervisorConfig {
    /// Path to the `prlctl` executable.
    pub command_path: PathBuf,
}
