use prl_tray_core::MenuModel;

/// Commands sent from the async runtime to the main UI thread.
///
/// The main thread owns `TrayManager` (because `TrayIcon` is `!Send`),
/// so all tray mutations and process lifecycle events flow through this enum.
#[derive(Debug, Clone)]
pub enum TrayCommand {
    /// Replace the context menu and title.
    ShowMenu(MenuModel),
    /// Switch the tray icon to the named image.
    SetIcon(String),
    /// Shut down the application. The main thread will exit the event loop.
    Shutdown,
}
