use crate::{CoreResult, menu::MenuModel};

/// Host that renders menus and the tray icon.
///
/// Clicking an entry is reported back by the host as the entry's
/// [`MenuAction`](crate::MenuAction) id; that is the only input channel
/// into the engine.
pub trait MenuDisplay: Send + Sync {
    /// Replace the displayed menu and title with `menu`.
    fn show(&self, menu: MenuModel) -> CoreResult<()>;

    /// Switch the tray icon to the named image.
    fn set_icon(&self, icon: &str) -> CoreResult<()>;
}
