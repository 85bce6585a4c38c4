//! Hypervisor command-line protocol.
//!
//! All knowledge of the tool's command shapes and output formats lives
//! here, so swapping to a richer API only means another [`Hypervisor`]
//! implementation.

use crate::{
    CoreError, CoreResult,
    executor::CommandExecutor,
    hypervisor::VmRecord,
};

use std::{
    panic::Location,
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use error_location::ErrorLocation;
use tracing::{debug, info, instrument};

/// Environment variable overriding the hypervisor tool location.
pub const PRLCTL_PATH_ENV: &str = "PRLCTL_PATH";

/// Hypervisor tool location used when no override is set.
pub const DEFAULT_PRLCTL_PATH: &str = "/usr/local/bin/prlctl";

/// Operations the engine needs from a hypervisor.
#[async_trait]
pub trait Hypervisor: Send + Sync {
    /// List every VM with its current status, in the tool's order.
    ///
    /// # Errors
    ///
    /// [`CoreError::ExternalCommand`] if the tool fails,
    /// [`CoreError::Parse`] if its output is not the expected JSON.
    async fn list_all(&self) -> CoreResult<Vec<VmRecord>>;

    /// Ask the hypervisor to start `name`. Resolves once the command is
    /// accepted, not once the VM is actually running.
    async fn start_vm(&self, name: &str) -> CoreResult<()>;

    /// Ask the hypervisor to stop `name`. Resolves once the command is
    /// accepted, not once the VM is actually stopped.
    async fn stop_vm(&self, name: &str) -> CoreResult<()>;

    /// Raw, unparsed output of the single-VM status query.
    async fn query_status(&self, name: &str) -> CoreResult<String>;
}

/// [`Hypervisor`] implementation driving the `prlctl` command-line tool.
pub struct PrlctlClient {
    executor: Arc<dyn CommandExecutor>,
    command_path: PathBuf,
}

impl PrlctlClient {
    /// Create a client invoking the tool at `command_path` through `executor`.
    pub fn new(executor: Arc<dyn CommandExecutor>, command_path: impl Into<PathBuf>) -> Self {
        Self {
            executor,
            command_path: command_path.into(),
        }
    }

    /// Path of the hypervisor tool this client invokes.
    pub fn command_path(&self) -> &Path {
        &self.command_path
    }

    async fn prlctl(&self, args: &[&str]) -> CoreResult<String> {
        self.executor.execute(&self.command_path, args).await
    }
}

#[async_trait]
impl Hypervisor for PrlctlClient {
    #[instrument(skip(self))]
    async fn list_all(&self) -> CoreResult<Vec<VmRecord>> {
        let output = self
            .prlctl(&["list", "--all", "-o", "name,status", "-j"])
            .await?;
        let vms = parse_vm_list(&output)?;

        debug!(vm_count = vms.len(), "VM list parsed");

        Ok(vms)
    }

    #[instrument(skip(self))]
    async fn start_vm(&self, name: &str) -> CoreResult<()> {
        self.prlctl(&["start", name]).await?;
        info!(vm = %name, "Start command accepted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop_vm(&self, name: &str) -> CoreResult<()> {
        self.prlctl(&["stop", name]).await?;
        info!(vm = %name, "Stop command accepted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn query_status(&self, name: &str) -> CoreResult<String> {
        self.prlctl(&["status", name]).await
    }
}

/// Parse the JSON array printed by `list --all -o name,status -j`.
///
/// # Errors
///
/// Returns [`CoreError::Parse`] when `output` is not a JSON array of
/// `{name, status}` objects.
#[track_caller]
pub fn parse_vm_list(output: &str) -> CoreResult<Vec<VmRecord>> {
    serde_json::from_str::<Vec<VmRecord>>(output.trim()).map_err(|e| CoreError::Parse {
        reason: "VM list is not a JSON array of {name, status} objects".to_string(),
        source: e,
        location: ErrorLocation::from(Location::caller()),
    })
}

