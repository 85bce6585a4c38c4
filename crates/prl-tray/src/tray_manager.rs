//! System tray icon mirroring the engine's menu model.
//!
//! Converts each `MenuModel` into a native context menu whose item ids are
//! the engine's action ids, and swaps the tray image when the icon
//! preference changes.

use crate::{AppError, AppResult};

use std::panic::Location;

use error_location::ErrorLocation;
use prl_tray_core::{MenuEntry, MenuIcon, MenuModel, MenuNode, menu};
use tracing::{debug, info, instrument, warn};
use tray_icon::menu::{
    Icon as MenuItemIcon, IconMenuItem, IsMenuItem, Menu, MenuItem, PredefinedMenuItem, Submenu,
};
use tray_icon::{Icon, TrayIcon, TrayIconBuilder};

const TOOLTIP_PREFIX: &str = "prl-tray";

/// System tray icon manager.
///
/// Lives on the main thread for the whole application lifetime and is
/// torn down explicitly with [`TrayManager::shutdown`].
pub struct TrayManager {
    tray_icon: TrayIcon,
}

impl TrayManager {
    /// Create the tray icon showing the loading placeholder.
    #[track_caller]
    #[instrument]
    pub fn new(icon_name: &str) -> AppResult<Self> {
        let placeholder = menu::loading();
        let context_menu = Self::build_menu(&placeholder)?;
        let icon = Self::load_icon(icon_name)?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(tooltip(&placeholder))
            .with_title(&placeholder.title)
            .with_menu(Box::new(context_menu))
            .with_icon(icon)
            .build()
            .map_err(|e| AppError::Tray {
                reason: format!("Failed to create tray icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(icon = %icon_name, "System tray icon initialized");

        Ok(Self { tray_icon })
    }

    /// Install `model` as the context menu and title.
    #[track_caller]
    #[instrument(skip(self, model), fields(title = %model.title))]
    pub fn show(&mut self, model: &MenuModel) -> AppResult<()> {
        let context_menu = Self::build_menu(model)?;

        self.tray_icon.set_menu(Some(Box::new(context_menu)));
        self.tray_icon.set_title(Some(&model.title));
        if let Err(e) = self.tray_icon.set_tooltip(Some(tooltip(model))) {
            warn!(error = ?e, "Failed to update tooltip");
        }

        debug!(node_count = model.nodes.len(), "Menu installed");

        Ok(())
    }

    /// Switch the tray image to the named icon.
    #[track_caller]
    #[instrument(skip(self))]
    pub fn set_icon(&mut self, icon_name: &str) -> AppResult<()> {
        let icon = Self::load_icon(icon_name)?;

        self.tray_icon
            .set_icon(Some(icon))
            .map_err(|e| AppError::Tray {
                reason: format!("Failed to update icon: {}", e),
                location: ErrorLocation::from(Location::caller()),
            })?;

        info!(icon = %icon_name, "Tray icon updated");

        Ok(())
    }

    /// Hide and release the tray icon.
    #[instrument(skip(self))]
    pub fn shutdown(self) {
        if let Err(e) = self.tray_icon.set_visible(false) {
            warn!(error = ?e, "Failed to hide tray icon during shutdown");
        }
        drop(self.tray_icon);
        info!("System tray icon released");
    }

    #[track_caller]
    fn build_menu(model: &MenuModel) -> AppResult<Menu> {
        let context_menu = Menu::new();

        for node in &model.nodes {
            let item = Self::build_item(node)?;
            context_menu
                .append(&*item)
                .map_err(|e| AppError::Tray {
                    reason: format!("Failed to add menu item: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
        }

        Ok(context_menu)
    }

    #[track_caller]
    fn build_item(node: &MenuNode) -> AppResult<Box<dyn IsMenuItem>> {
        let entry = match node {
            MenuNode::Separator => return Ok(Box::new(PredefinedMenuItem::separator())),
            MenuNode::Entry(entry) => entry,
        };

        if entry.is_submenu() {
            let submenu = Submenu::new(&entry.label, entry.enabled);
            for child in &entry.children {
                let item = Self::build_item(child)?;
                submenu.append(&*item).map_err(|e| AppError::Tray {
                    reason: format!("Failed to add submenu item: {}", e),
                    location: ErrorLocation::from(Location::caller()),
                })?;
            }
            return Ok(Box::new(submenu));
        }

        let label = Self::label(entry);
        let item: Box<dyn IsMenuItem> = match (&entry.icon, &entry.action) {
            (Some(MenuIcon::Image(name)), Some(action)) => Box::new(IconMenuItem::with_id(
                action.id(),
                label,
                entry.enabled,
                Some(Self::load_menu_icon(name)?),
                None,
            )),
            (_, Some(action)) => {
                Box::new(MenuItem::with_id(action.id(), label, entry.enabled, None))
            }
            (_, None) => Box::new(MenuItem::new(label, entry.enabled, None)),
        };

        Ok(item)
    }

    fn label(entry: &MenuEntry) -> String {
        match entry.checked {
            Some(true) => format!("{} ✓", entry.label),
            _ => entry.label.clone(),
        }
    }

    /// Decode an embedded icon PNG to RGBA.
    ///
    /// Icons are embedded via include_bytes! so they work regardless of
    /// install location. Unknown names fall back to the default icon.
    #[track_caller]
    fn decode_png(icon_name: &str) -> AppResult<(Vec<u8>, u32, u32)> {
        let png_bytes: &[u8] = match icon_name {
            "icon" => include_bytes!("../resources/icons/icon.png"),
            "icon2" => include_bytes!("../resources/icons/icon2.png"),
            _ => include_bytes!("../resources/icons/icon3.png"),
        };

        let img = image::load_from_memory(png_bytes).map_err(|e| AppError::Tray {
            reason: format!("Failed to decode embedded icon: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })?;

        let rgba = img.into_rgba8();
        let (width, height) = (rgba.width(), rgba.height());

        Ok((rgba.into_raw(), width, height))
    }

    #[track_caller]
    fn load_icon(icon_name: &str) -> AppResult<Icon> {
        let (rgba, width, height) = Self::decode_png(icon_name)?;

        Icon::from_rgba(rgba, width, height).map_err(|e| AppError::Tray {
            reason: format!("Failed to create icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }

    #[track_caller]
    fn load_menu_icon(icon_name: &str) -> AppResult<MenuItemIcon> {
        let (rgba, width, height) = Self::decode_png(icon_name)?;

        MenuItemIcon::from_rgba(rgba, width, height).map_err(|e| AppError::Tray {
            reason: format!("Failed to create menu icon from RGBA: {}", e),
            location: ErrorLocation::from(Location::caller()),
        })
    }
}

/// Hover text for `model`: the running count, or the placeholder while loading.
pub(crate) fn tooltip(model: &MenuModel) -> String {
    if *model == menu::loading() {
        format!("{TOOLTIP_PREFIX} - {}", model.title)
    } else {
        format!("{TOOLTIP_PREFIX} - {} running", model.title)
    }
}
