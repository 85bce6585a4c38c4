//! prl-tray Core Library
//!
//! VM state synchronization and command orchestration for a status-bar
//! controller driving the `prlctl` hypervisor tool.
//!
//! # Example
//!
//! ```no_run
//! use prl_tray_core::{
//!     CoreResult, DEFAULT_PRLCTL_PATH, Hypervisor, PreferenceSet, PrlctlClient,
//!     ProcessExecutor, menu,
//! };
//!
//! use std::sync::Arc;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> CoreResult<()> {
//!     let client = PrlctlClient::new(Arc::new(ProcessExecutor), DEFAULT_PRLCTL_PATH);
//!
//!     let vms = client.list_all().await?;
//!     let model = menu::build(&vms, &PreferenceSet::default());
//!
//!     println!("{} running", model.title);
//!     Ok(())
//! }
//! ```

mod display;
mod error;
mod executor;
mod hypervisor;
pub mod menu;
mod orchestrator;
mod poller;
mod preferences;

pub use {
    display::MenuDisplay,
    error::CoreError,
    error::Result as CoreResult,
    executor::{CommandExecutor, ProcessExecutor},
    hypervisor::{
        DEFAULT_PRLCTL_PATH, Hypervisor, PRLCTL_PATH_ENV, PrlctlClient, STATUS_RUNNING,
        STATUS_STOPPED, VmRecord, VmStatus, parse_vm_list,
    },
    menu::{MenuAction, MenuEntry, MenuIcon, MenuModel, MenuNode},
    orchestrator::{OrchestratorState, RefreshOrchestrator, VmCommand, follow_icon_preference},
    poller::{Sleeper, StatePoller, TokioSleeper},
    preferences::{
        DEFAULT_ICON, ICON_KEY, PreferenceSet, Preferences, SELECTABLE_ICONS, Subscription,
    },
};

#[cfg(test)]
mod tests;
