use crate::menu::MenuAction;

/// Icon attached to a menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuIcon {
    /// Status glyph, already rendered into the entry label.
    Glyph(&'static str),
    /// Named tray icon image.
    Image(String),
}

/// A clickable or informational menu entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Display text.
    pub label: String,
    /// Optional icon.
    pub icon: Option<MenuIcon>,
    /// Action fired on click, if any.
    pub action: Option<MenuAction>,
    /// Whether the entry can be clicked.
    pub enabled: bool,
    /// Selection mark for choice entries; `None` for plain entries.
    pub checked: Option<bool>,
    /// Submenu entries, in display order.
    pub children: Vec<MenuNode>,
}

impl MenuEntry {
    /// Plain entry with a label and nothing else.
    pub fn label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            icon: None,
            action: None,
            enabled: true,
            checked: None,
            children: Vec::new(),
        }
    }

    /// Entry that fires `action` when clicked.
    pub fn action(label: impl Into<String>, action: MenuAction) -> Self {
        Self {
            action: Some(action),
            ..Self::label(label)
        }
    }

    /// Entry that opens a submenu.
    pub fn submenu(label: impl Into<String>, children: Vec<MenuNode>) -> Self {
        Self {
            children,
            ..Self::label(label)
        }
    }

    /// Set the icon.
    pub fn with_icon(mut self, icon: Option<MenuIcon>) -> Self {
        self.icon = icon;
        self
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set the selection mark.
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// Whether this entry opens a submenu.
    pub fn is_submenu(&self) -> bool {
        !self.children.is_empty()
    }
}

/// One node of the menu tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuNode {
    /// Visual divider.
    Separator,
    /// Regular entry, possibly with children.
    Entry(MenuEntry),
}

impl MenuNode {
    /// The entry, unless this node is a separator.
    pub fn entry(&self) -> Option<&MenuEntry> {
        match self {
            MenuNode::Entry(entry) => Some(entry),
            MenuNode::Separator => None,
        }
    }

    /// Whether this node is a separator.
    pub fn is_separator(&self) -> bool {
        matches!(self, MenuNode::Separator)
    }
}

impl From<MenuEntry> for MenuNode {
    fn from(entry: MenuEntry) -> Self {
        MenuNode::Entry(entry)
    }
}

/// Display-ready menu tree plus the tray title.
///
/// Built fresh on every refresh and handed to the display as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuModel {
    /// Top-level nodes, in display order.
    pub nodes: Vec<MenuNode>,
    /// Tray title text.
    pub title: String,
}

impl MenuModel {
    /// Iterate over top-level entries, skipping separators.
    pub fn entries(&self) -> impl Iterator<Item = &MenuEntry> {
        self.nodes.iter().filter_map(MenuNode::entry)
    }

    /// Find the first top-level entry whose action equals `action`.
    pub fn find_action(&self, action: &MenuAction) -> Option<&MenuEntry> {
        self.entries()
            .find(|entry| entry.action.as_ref() == Some(action))
    }
}
