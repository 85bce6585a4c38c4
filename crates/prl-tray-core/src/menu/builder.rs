//! Pure transformation from a VM list into a [`MenuModel`].

use crate::{
    hypervisor::{VmRecord, VmStatus},
    menu::{MenuAction, MenuEntry, MenuIcon, MenuModel, MenuNode},
    preferences::{DEFAULT_ICON, ICON_KEY, PreferenceSet, SELECTABLE_ICONS},
};

/// Label of the entry that re-runs the refresh cycle.
pub const REFRESH_LABEL: &str = "🔄 Refresh List";
/// Indicator shown in front of a running VM.
pub const RUNNING_INDICATOR: &str = "🟢";
/// Indicator shown in front of a stopped VM.
pub const STOPPED_INDICATOR: &str = "🛑";
/// Label of the per-VM stop action.
pub const STOP_LABEL: &str = "🛑 Stop";
/// Label of the per-VM start action.
pub const START_LABEL: &str = "▶️ Start";
/// Label of the preferences submenu.
pub const PREFERENCES_LABEL: &str = "Preferences";
/// Label of the icon picker inside the preferences submenu.
pub const ICON_MENU_LABEL: &str = "Icon";
/// Label of the quit entry.
pub const QUIT_LABEL: &str = "Quit";
/// Placeholder label and title while a refresh is in flight.
pub const LOADING_LABEL: &str = "Refreshing...";

/// Build the menu for `vms`, preserving their order.
///
/// Total and side-effect free: identical inputs give identical trees.
pub fn build(vms: &[VmRecord], preferences: &PreferenceSet) -> MenuModel {
    let mut nodes = Vec::with_capacity(vms.len() + 6);

    nodes.push(MenuEntry::action(REFRESH_LABEL, MenuAction::Refresh).into());
    nodes.push(MenuNode::Separator);

    nodes.extend(vms.iter().map(vm_node));

    nodes.push(MenuNode::Separator);
    nodes.push(preferences_node(preferences));
    nodes.push(MenuNode::Separator);
    nodes.push(MenuEntry::action(QUIT_LABEL, MenuAction::Quit).into());

    MenuModel {
        nodes,
        title: running_count(vms).to_string(),
    }
}

/// Placeholder menu shown while a refresh or lifecycle action is pending.
pub fn loading() -> MenuModel {
    MenuModel {
        nodes: vec![
            MenuEntry::label(LOADING_LABEL).with_enabled(false).into(),
            MenuEntry::action(QUIT_LABEL, MenuAction::Quit).into(),
        ],
        title: LOADING_LABEL.to_string(),
    }
}

/// Number of VMs whose status is running.
pub fn running_count(vms: &[VmRecord]) -> usize {
    vms.iter().filter(|vm| vm.is_running()).count()
}

/// Status indicator glyph, if the status is recognized.
pub fn indicator(status: &VmStatus) -> Option<&'static str> {
    match status {
        VmStatus::Running => Some(RUNNING_INDICATOR),
        VmStatus::Stopped => Some(STOPPED_INDICATOR),
        VmStatus::Other(_) => None,
    }
}

fn vm_node(vm: &VmRecord) -> MenuNode {
    let glyph = indicator(&vm.status);
    let status = vm.status.as_str().to_uppercase();
    let label = match glyph {
        Some(glyph) => format!("{glyph} {} ({status})", vm.name),
        None => format!("{} ({status})", vm.name),
    };

    // Unknown statuses offer no action, so the entry is greyed out.
    let actionable = glyph.is_some();
    let children = match vm.status {
        VmStatus::Running => vec![MenuNode::from(MenuEntry::action(
            STOP_LABEL,
            MenuAction::Stop(vm.name.clone()),
        ))],
        VmStatus::Stopped => vec![MenuNode::from(MenuEntry::action(
            START_LABEL,
            MenuAction::Start(vm.name.clone()),
        ))],
        VmStatus::Other(_) => Vec::new(),
    };

    MenuEntry::submenu(label, children)
        .with_icon(glyph.map(MenuIcon::Glyph))
        .with_enabled(actionable)
        .into()
}

fn preferences_node(preferences: &PreferenceSet) -> MenuNode {
    let current = preferences.get(ICON_KEY, DEFAULT_ICON);

    let icons = SELECTABLE_ICONS
        .iter()
        .map(|icon| {
            MenuNode::from(
                MenuEntry::action(*icon, MenuAction::SelectIcon((*icon).to_string()))
                    .with_icon(Some(MenuIcon::Image((*icon).to_string())))
                    .with_checked(current == *icon),
            )
        })
        .collect::<Vec<_>>();

    MenuEntry::submenu(
        PREFERENCES_LABEL,
        vec![MenuEntry::submenu(ICON_MENU_LABEL, icons).into()],
    )
    .into()
}
