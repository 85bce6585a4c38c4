use prl_tray_core::MenuAction;

/// Commands delivered to the application loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Re-run the refresh cycle.
    Refresh,
    /// Start a VM and wait for it to run.
    StartVm {
        /// VM name.
        name: String,
    },
    /// Stop a VM and wait for it to stop.
    StopVm {
        /// VM name.
        name: String,
    },
    /// Persist a new tray icon choice.
    SelectIcon {
        /// Icon name.
        icon: String,
    },
    /// Request application shutdown.
    Shutdown,
}

impl AppCommand {
    /// Decode a clicked menu id. Ids the engine did not produce map to `None`.
    pub fn from_menu_id(id: &str) -> Option<Self> {
        MenuAction::from_id(id).map(Self::from)
    }
}

impl From<MenuAction> for AppCommand {
    fn from(action: MenuAction) -> Self {
        match action {
            MenuAction::Refresh => AppCommand::Refresh,
            MenuAction::Start(name) => AppCommand::StartVm { name },
            MenuAction::Stop(name) => AppCommand::StopVm { name },
            MenuAction::SelectIcon(icon) => AppCommand::SelectIcon { icon },
            MenuAction::Quit => AppCommand::Shutdown,
        }
    }
}
