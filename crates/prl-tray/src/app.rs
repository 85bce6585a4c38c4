use crate::{AppCommand, AppResult, TrayDisplay, config::Config};

use std::sync::Arc;

use prl_tray_core::{
    Hypervisor, ICON_KEY, MenuDisplay, Preferences, PrlctlClient, ProcessExecutor,
    RefreshOrchestrator, StatePoller, TokioSleeper, follow_icon_preference,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument};
use tray_icon::menu::MenuEvent;

/// Main application state.
///
/// Runs on the async runtime thread. Tray updates go back to the main
/// thread through `display` because `TrayIcon` is `!Send` and must remain
/// on the UI thread.
pub struct App {
    pub(crate) orchestrator: Arc<RefreshOrchestrator>,
    pub(crate) preferences: Arc<Preferences>,
    pub(crate) display: Arc<TrayDisplay>,
    pub(crate) command_tx: mpsc::Sender<AppCommand>,
    pub(crate) command_rx: mpsc::Receiver<AppCommand>,
}

impl App {
    /// Wire the engine against the real hypervisor tool.
    pub(crate) fn new(
        config: &Config,
        preferences: Arc<Preferences>,
        display: Arc<TrayDisplay>,
    ) -> Self {
        let client = PrlctlClient::new(
            Arc::new(ProcessExecutor),
            config.hypervisor.command_path.clone(),
        );
        info!(command_path = ?client.command_path(), "Hypervisor client configured");

        let hypervisor: Arc<dyn Hypervisor> = Arc::new(client);
        let poller = StatePoller::new(Arc::clone(&hypervisor), Arc::new(TokioSleeper));
        let orchestrator = Arc::new(RefreshOrchestrator::new(
            hypervisor,
            poller,
            Arc::clone(&display) as Arc<dyn MenuDisplay>,
            Arc::clone(&preferences),
        ));
        let (command_tx, command_rx) = mpsc::channel(32);

        Self {
            orchestrator,
            preferences,
            display,
            command_tx,
            command_rx,
        }
    }

    /// Run the main application event loop.
    #[instrument(skip(self))]
    pub(crate) async fn run(mut self) -> AppResult<()> {
        info!("prl-tray starting");

        let icon_subscription = follow_icon_preference(
            &self.preferences,
            Arc::clone(&self.display) as Arc<dyn MenuDisplay>,
        );

        self.spawn_refresh();

        // Tray event forwarding via single persistent blocking task.
        //
        // MenuEvent::receiver() returns a crossbeam_channel::Receiver which
        // HAS blocking recv() -- zero polling, instant response, one thread.
        //
        // Shutdown: recv() only returns on the next click, so the task is
        // not joined. The process exits once the tray loop handles Shutdown.
        let command_tx = self.command_tx.clone();
        let _ = tokio::task::spawn_blocking(move || {
            let receiver = MenuEvent::receiver();
            while let Ok(event) = receiver.recv() {
                let Some(command) = AppCommand::from_menu_id(&event.id.0) else {
                    debug!(menu_id = %event.id.0, "Ignoring unknown menu id");
                    continue;
                };
                if command_tx.blocking_send(command).is_err() {
                    break;
                }
            }
        });

        loop {
            tokio::select! {
                Some(cmd) = self.command_rx.recv() => {
                    if !self.handle_command(cmd) {
                        break;
                    }
                }

                result = tokio::signal::ctrl_c() => {
                    match result {
                        Ok(()) => info!("Interrupt received, shutting down"),
                        Err(e) => error!(error = ?e, "Failed to listen for interrupt, shutting down"),
                    }
                    break;
                }

                else => {
                    info!("All channels closed, shutting down");
                    break;
                }
            }
        }

        // Subscriptions are released before the tray goes away.
        icon_subscription.unsubscribe();
        drop(self.command_rx);

        // In-flight poll loops and the event forwarder are not cancelled;
        // they end with the process.
        self.display.shutdown()?;
        info!("prl-tray shut down successfully");

        Ok(())
    }

    /// Dispatch one command. Returns `false` when the loop should exit.
    #[instrument(skip(self))]
    fn handle_command(&self, cmd: AppCommand) -> bool {
        match cmd {
            AppCommand::Refresh => self.spawn_refresh(),
            AppCommand::StartVm { name } => {
                let orchestrator = Arc::clone(&self.orchestrator);
                tokio::spawn(async move {
                    if let Err(e) = orchestrator.start_vm(&name).await {
                        error!(vm = %name, error = ?e, "Failed to start VM");
                    }
                });
            }
            AppCommand::StopVm { name } => {
                let orchestrator = Arc::clone(&self.orchestrator);
                tokio::spawn(async move {
                    if let Err(e) = orchestrator.stop_vm(&name).await {
                        error!(vm = %name, error = ?e, "Failed to stop VM");
                    }
                });
            }
            AppCommand::SelectIcon { icon } => {
                if let Err(e) = self.preferences.set(ICON_KEY, &icon) {
                    error!(icon = %icon, error = ?e, "Failed to save icon preference");
                    return true;
                }
                // Rebuild so the picker marks the new choice.
                self.spawn_refresh();
            }
            AppCommand::Shutdown => {
                info!("Shutdown requested");
                return false;
            }
        }

        true
    }

    fn spawn_refresh(&self) {
        let orchestrator = Arc::clone(&self.orchestrator);
        tokio::spawn(async move {
            if let Err(e) = orchestrator.refresh().await {
                error!(error = ?e, "Refresh failed");
            }
        });
    }
}
