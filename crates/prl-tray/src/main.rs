//! prl-tray: status-bar controller for Parallels Desktop virtual machines.

mod app;
mod app_command;
mod config;
mod error;
mod tray_command;
mod tray_display;
mod tray_manager;

pub(crate) use {
    app::App,
    app_command::AppCommand,
    error::{AppError, Result as AppResult},
    tray_command::TrayCommand,
    tray_display::TrayDisplay,
    tray_manager::TrayManager,
};

use crate::config::Config;

use std::sync::Arc;

use prl_tray_core::{DEFAULT_ICON, ICON_KEY, Preferences};
use tao::{
    event::{Event, StartCause},
    event_loop::{ControlFlow, EventLoopBuilder},
};
use tracing::{error, info};

/// Application entry point.
fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("prl_tray=debug,prl_tray_core=debug")
        .init();

    #[allow(unused_mut)]
    let mut event_loop = EventLoopBuilder::<TrayCommand>::with_user_event().build();

    // Tray-only app: no dock icon.
    #[cfg(target_os = "macos")]
    {
        use tao::platform::macos::{ActivationPolicy, EventLoopExtMacOS};
        event_loop.set_activation_policy(ActivationPolicy::Accessory);
    }

    let tray_proxy = event_loop.create_proxy();

    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load config: {:?}", e);
            std::process::exit(1);
        }
    };

    let preferences = Arc::new(Preferences::open(&config.preferences_path));

    // TrayManager lives on the main thread - TrayIcon is !Send on all platforms.
    // Created on Init so the platform event loop is already running.
    let mut tray_manager: Option<TrayManager> = None;

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::Wait;

        match event {
            Event::UserEvent(cmd) => match cmd {
                TrayCommand::ShowMenu(model) => {
                    if let Some(tm) = tray_manager.as_mut() {
                        if let Err(e) = tm.show(&model) {
                            error!(error = ?e, "Failed to install menu");
                        }
                    }
                }
                TrayCommand::SetIcon(icon) => {
                    if let Some(tm) = tray_manager.as_mut() {
                        if let Err(e) = tm.set_icon(&icon) {
                            error!(error = ?e, "Failed to update tray icon");
                        }
                    }
                }
                TrayCommand::Shutdown => {
                    if let Some(tm) = tray_manager.take() {
                        tm.shutdown();
                    }
                    *control_flow = ControlFlow::ExitWithCode(0);
                }
            },
            Event::NewEvents(StartCause::Init) => {
                let icon = preferences.get(ICON_KEY, DEFAULT_ICON);
                tray_manager = match TrayManager::new(&icon) {
                    Ok(tm) => Some(tm),
                    Err(e) => {
                        error!("Failed to create TrayManager: {:?}", e);
                        std::process::exit(1);
                    }
                };

                #[cfg(target_os = "macos")]
                unsafe {
                    use core_foundation::runloop::{CFRunLoopGetMain, CFRunLoopWakeUp};
                    CFRunLoopWakeUp(CFRunLoopGetMain());
                }

                let display = Arc::new(TrayDisplay::new(tray_proxy.clone()));
                let app = App::new(&config, Arc::clone(&preferences), display);

                // Single cooperative scheduler on its own thread.
                // TrayManager stays on the main thread.
                std::thread::spawn(move || {
                    let rt = match tokio::runtime::Builder::new_current_thread()
                        .enable_all()
                        .build()
                    {
                        Ok(rt) => rt,
                        Err(e) => {
                            error!("Failed to create tokio runtime: {:?}", e);
                            std::process::exit(1);
                        }
                    };

                    if let Err(e) = rt.block_on(app.run()) {
                        error!(error = ?e, "App error");
                    }

                    // Abandon poll loops and the blocked menu forwarder.
                    rt.shutdown_background();
                    info!("Async runtime stopped");
                });
            }
            _ => {}
        }
    });
}
