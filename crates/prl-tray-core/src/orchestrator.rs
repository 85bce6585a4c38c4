//! Top-level refresh cycle and lifecycle action sequencing.

use crate::{
    CoreResult,
    display::MenuDisplay,
    hypervisor::{Hypervisor, VmStatus},
    menu,
    poller::StatePoller,
    preferences::{DEFAULT_ICON, ICON_KEY, PreferenceSet, Preferences, Subscription},
};

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{error, info, instrument};

/// Where the orchestrator is in its refresh cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrchestratorState {
    /// Placeholder menu shown, a list query or lifecycle action is pending.
    Loading,
    /// Menu from the last completed list query is shown.
    Ready,
}

/// Lifecycle command a user can issue for one VM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VmCommand {
    /// Start the VM and wait for `running`.
    Start,
    /// Stop the VM and wait for `stopped`.
    Stop,
}

impl VmCommand {
    /// Status that signals the command has taken effect.
    pub fn target_status(self) -> VmStatus {
        match self {
            VmCommand::Start => VmStatus::Running,
            VmCommand::Stop => VmStatus::Stopped,
        }
    }
}

/// Drives LOADING → READY cycles and VM lifecycle actions.
///
/// Only this type mutates the displayed menu. Callers are expected to run
/// one refresh at a time; overlapping refreshes are not guarded against.
pub struct RefreshOrchestrator {
    hypervisor: Arc<dyn Hypervisor>,
    poller: StatePoller,
    display: Arc<dyn MenuDisplay>,
    preferences: Arc<Preferences>,
    state_tx: watch::Sender<OrchestratorState>,
}

impl RefreshOrchestrator {
    /// Create an orchestrator. It starts in [`OrchestratorState::Loading`]
    /// until the first refresh completes.
    pub fn new(
        hypervisor: Arc<dyn Hypervisor>,
        poller: StatePoller,
        display: Arc<dyn MenuDisplay>,
        preferences: Arc<Preferences>,
    ) -> Self {
        let (state_tx, _) = watch::channel(OrchestratorState::Loading);
        Self {
            hypervisor,
            poller,
            display,
            preferences,
            state_tx,
        }
    }

    /// Current cycle state.
    pub fn state(&self) -> OrchestratorState {
        *self.state_tx.borrow()
    }

    /// Watch cycle state transitions.
    pub fn subscribe_state(&self) -> watch::Receiver<OrchestratorState> {
        self.state_tx.subscribe()
    }

    /// Run one refresh cycle: placeholder, list query, rebuilt menu.
    ///
    /// # Errors
    ///
    /// Propagates list query failures. No menu is built in that case and
    /// the placeholder stays up.
    #[instrument(skip(self))]
    pub async fn refresh(&self) -> CoreResult<()> {
        self.enter_loading()?;

        let vms = self.hypervisor.list_all().await?;
        let model = menu::build(&vms, &self.preferences.snapshot());
        let running = menu::running_count(&vms);

        self.display.show(model)?;
        self.state_tx.send_replace(OrchestratorState::Ready);

        info!(vm_count = vms.len(), running, "Menu refreshed");

        Ok(())
    }

    /// Start `name`, wait until it runs, then refresh.
    ///
    /// # Errors
    ///
    /// See [`RefreshOrchestrator::run_command`].
    pub async fn start_vm(&self, name: &str) -> CoreResult<()> {
        self.run_command(name, VmCommand::Start).await
    }

    /// Stop `name`, wait until it stops, then refresh.
    ///
    /// # Errors
    ///
    /// See [`RefreshOrchestrator::run_command`].
    pub async fn stop_vm(&self, name: &str) -> CoreResult<()> {
        self.run_command(name, VmCommand::Stop).await
    }

    /// Issue `command` for `name`, poll until it takes effect, then refresh.
    ///
    /// The lifecycle command is never retried; only the status query is.
    /// Polling has no bound, so this resolves only once the target status
    /// is observed.
    ///
    /// # Errors
    ///
    /// Propagates a failed lifecycle command (no polling happens then) and
    /// any failure of the follow-up refresh.
    #[instrument(skip(self))]
    pub async fn run_command(&self, name: &str, command: VmCommand) -> CoreResult<()> {
        self.enter_loading()?;

        match command {
            VmCommand::Start => self.hypervisor.start_vm(name).await?,
            VmCommand::Stop => self.hypervisor.stop_vm(name).await?,
        }

        let attempts = self
            .poller
            .wait_for_status(name, &command.target_status())
            .await;

        info!(vm = %name, ?command, attempts, "Lifecycle command took effect");

        self.refresh().await
    }

    fn enter_loading(&self) -> CoreResult<()> {
        self.state_tx.send_replace(OrchestratorState::Loading);
        self.display.show(menu::loading())
    }
}

/// Forward every icon preference change to `display`.
///
/// The tray icon follows the preference until the returned handle is
/// dropped or unsubscribed.
pub fn follow_icon_preference(
    preferences: &Preferences,
    display: Arc<dyn MenuDisplay>,
) -> Subscription {
    preferences.subscribe(move |values: &PreferenceSet| {
        let icon = values.get(ICON_KEY, DEFAULT_ICON);
        if let Err(e) = display.set_icon(&icon) {
            error!(error = ?e, icon = %icon, "Failed to forward icon change");
        }
    })
}
