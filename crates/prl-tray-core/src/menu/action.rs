const REFRESH_ID: &str = "refresh";
const QUIT_ID: &str = "quit";
const START_PREFIX: &str = "start:";
const STOP_PREFIX: &str = "stop:";
const ICON_PREFIX: &str = "icon:";

/// What happens when a menu entry is clicked.
///
/// Actions round-trip through plain string ids so the UI toolkit never
/// needs to know what an entry means.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Re-run the refresh cycle.
    Refresh,
    /// Start the named VM, then wait until it runs.
    Start(String),
    /// Stop the named VM, then wait until it stops.
    Stop(String),
    /// Switch the tray icon preference.
    SelectIcon(String),
    /// Leave the application.
    Quit,
}

impl MenuAction {
    /// Stable menu id for this action.
    pub fn id(&self) -> String {
        match self {
            MenuAction::Refresh => REFRESH_ID.to_string(),
            MenuAction::Quit => QUIT_ID.to_string(),
            MenuAction::Start(name) => format!("{START_PREFIX}{name}"),
            MenuAction::Stop(name) => format!("{STOP_PREFIX}{name}"),
            MenuAction::SelectIcon(icon) => format!("{ICON_PREFIX}{icon}"),
        }
    }

    /// Decode a menu id produced by [`MenuAction::id`].
    ///
    /// Returns `None` for ids this engine did not produce.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            REFRESH_ID => Some(MenuAction::Refresh),
            QUIT_ID => Some(MenuAction::Quit),
            _ => {
                if let Some(name) = id.strip_prefix(START_PREFIX) {
                    non_empty(name).map(MenuAction::Start)
                } else if let Some(name) = id.strip_prefix(STOP_PREFIX) {
                    non_empty(name).map(MenuAction::Stop)
                } else if let Some(icon) = id.strip_prefix(ICON_PREFIX) {
                    non_empty(icon).map(MenuAction::SelectIcon)
                } else {
                    None
                }
            }
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
