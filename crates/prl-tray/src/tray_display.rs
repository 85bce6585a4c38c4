use crate::TrayCommand;

use std::{
    panic::Location,
    sync::{Mutex, PoisonError},
};

use error_location::ErrorLocation;
use prl_tray_core::{CoreError, CoreResult, MenuDisplay, MenuModel};
use tao::event_loop::EventLoopProxy;

/// [`MenuDisplay`] that forwards updates to the main thread's event loop.
pub struct TrayDisplay {
    proxy: Mutex<EventLoopProxy<TrayCommand>>,
}

impl TrayDisplay {
    /// Wrap the event loop proxy.
    pub fn new(proxy: EventLoopProxy<TrayCommand>) -> Self {
        Self {
            proxy: Mutex::new(proxy),
        }
    }

    /// Ask the main thread to tear down the tray and exit.
    pub fn shutdown(&self) -> CoreResult<()> {
        self.send(TrayCommand::Shutdown)
    }

    #[track_caller]
    fn send(&self, command: TrayCommand) -> CoreResult<()> {
        self.proxy
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .send_event(command)
            .map_err(|_| CoreError::Display {
                reason: "Tray event loop has exited".to_string(),
                location: ErrorLocation::from(Location::caller()),
            })
    }
}

impl MenuDisplay for TrayDisplay {
    fn show(&self, menu: MenuModel) -> CoreResult<()> {
        self.send(TrayCommand::ShowMenu(menu))
    }

    fn set_icon(&self, icon: &str) -> CoreResult<()> {
        self.send(TrayCommand::SetIcon(icon.to_string()))
    }
}
