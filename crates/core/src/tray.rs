/// System tray icon and context menu
///
/// Owns the tray widget only. Clicks are reported as `MenuId`s by the event
/// loop and translated here into `TrayAction`s; all state lives in the
/// `SettingsController`.
use crate::actions::TrayAction;
use crate::icons::{self, IconKind};
use crate::setting::{SettingKey, SettingsSnapshot};
use crate::status;
use anyhow::{anyhow, Result};
use tray_icon::menu::{IconMenuItem, Menu, MenuId, PredefinedMenuItem};
use tray_icon::{TrayIcon, TrayIconBuilder};

pub struct TrayIconManager {
    tray_icon: TrayIcon,
    app_title: String,
    conservation_item: IconMenuItem,
    fnlock_item: IconMenuItem,
    kbd_led_item: IconMenuItem,
    pub menu_item_refresh: MenuId,
    pub menu_item_exit: MenuId,
}

impl TrayIconManager {
    /// Build the tray icon. Fails when no tray host is available.
    pub fn new(app_title: &str) -> Result<Self> {
        tracing::info!("Creating tray icon");

        let icon = icons::app_tray_icon()?;
        tracing::debug!("Icon loaded");

        let menu = Menu::new();
        let conservation_item =
            IconMenuItem::new(status::loading_text(SettingKey::Conservation), true, None, None);
        let fnlock_item = IconMenuItem::new(status::loading_text(SettingKey::FnLock), true, None, None);
        let kbd_led_item = IconMenuItem::new(status::loading_text(SettingKey::KbdLed), true, None, None);
        let refresh_item = IconMenuItem::new(
            "Refresh Status",
            true,
            Some(icons::menu_icon(IconKind::Refresh)?),
            None,
        );
        let exit_item = IconMenuItem::new("Exit", true, Some(icons::menu_icon(IconKind::Exit)?), None);

        menu.append(&conservation_item)
            .map_err(|e| anyhow!("Failed to add conservation item: {}", e))?;
        menu.append(&fnlock_item)
            .map_err(|e| anyhow!("Failed to add fnlock item: {}", e))?;
        menu.append(&kbd_led_item)
            .map_err(|e| anyhow!("Failed to add keyboard LED item: {}", e))?;
        menu.append(&PredefinedMenuItem::separator())
            .map_err(|e| anyhow!("Failed to add separator: {}", e))?;
        menu.append(&refresh_item)
            .map_err(|e| anyhow!("Failed to add refresh item: {}", e))?;
        menu.append(&PredefinedMenuItem::separator())
            .map_err(|e| anyhow!("Failed to add separator: {}", e))?;
        menu.append(&exit_item)
            .map_err(|e| anyhow!("Failed to add exit item: {}", e))?;

        let tray_icon = TrayIconBuilder::new()
            .with_tooltip(app_title)
            .with_icon(icon)
            .with_menu(Box::new(menu))
            .build()
            .map_err(|e| anyhow!("Failed to create tray icon: {}", e))?;

        tracing::info!("Tray icon created successfully with context menu");

        Ok(Self {
            tray_icon,
            app_title: app_title.to_string(),
            menu_item_refresh: refresh_item.id().clone(),
            menu_item_exit: exit_item.id().clone(),
            conservation_item,
            fnlock_item,
            kbd_led_item,
        })
    }

    /// Map a clicked menu item to its action
    pub fn action_for(&self, id: &MenuId) -> Option<TrayAction> {
        if id == self.conservation_item.id() {
            Some(TrayAction::ToggleConservation)
        } else if id == self.fnlock_item.id() {
            Some(TrayAction::ToggleFnLock)
        } else if id == self.kbd_led_item.id() {
            Some(TrayAction::CycleKbdLed)
        } else if *id == self.menu_item_refresh {
            Some(TrayAction::Refresh)
        } else if *id == self.menu_item_exit {
            Some(TrayAction::Exit)
        } else {
            None
        }
    }

    /// Update item labels, item icons and the tooltip
    pub fn render(&self, snapshot: &SettingsSnapshot) {
        for entry in status::menu_entries(snapshot) {
            let item = match entry.key {
                SettingKey::Conservation => &self.conservation_item,
                SettingKey::FnLock => &self.fnlock_item,
                SettingKey::KbdLed => &self.kbd_led_item,
            };
            item.set_text(&entry.text);
            match icons::menu_icon(entry.icon) {
                Ok(icon) => item.set_icon(Some(icon)),
                Err(e) => tracing::warn!("{}", e),
            }
        }

        let tooltip = status::tooltip(&self.app_title, snapshot);
        if let Err(e) = self.tray_icon.set_tooltip(Some(&tooltip)) {
            tracing::warn!("Failed to set tooltip: {}", e);
        }
    }
}
