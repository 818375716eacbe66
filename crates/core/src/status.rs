/// Display strings derived from a settings snapshot
use crate::icons::IconKind;
use crate::setting::{SettingKey, SettingValue, SettingsSnapshot};

/// Text and icon for one setting's menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub key: SettingKey,
    pub text: String,
    pub icon: IconKind,
}

fn entry<T: SettingValue>(value: T, icon: IconKind) -> MenuEntry {
    MenuEntry {
        key: T::KEY,
        text: format!("{}: {}", T::KEY.menu_title(), value.label()),
        icon,
    }
}

/// Menu entries in display order
pub fn menu_entries(snapshot: &SettingsSnapshot) -> [MenuEntry; 3] {
    [
        entry(snapshot.conservation, IconKind::Conservation(snapshot.conservation)),
        entry(snapshot.fnlock, IconKind::FnLock(snapshot.fnlock)),
        entry(snapshot.kbd_led, IconKind::KbdLed(snapshot.kbd_led)),
    ]
}

/// Placeholder shown before the first render
pub fn loading_text(key: SettingKey) -> String {
    format!("{}: Loading...", key.menu_title())
}

/// Four-line tray tooltip
pub fn tooltip(app_title: &str, snapshot: &SettingsSnapshot) -> String {
    format!(
        "{}\n{}: {}\n{}: {}\n{}: {}",
        app_title,
        SettingKey::Conservation.status_title(),
        snapshot.conservation.status_label(),
        SettingKey::FnLock.status_title(),
        snapshot.fnlock.status_label(),
        SettingKey::KbdLed.status_title(),
        snapshot.kbd_led.status_label(),
    )
}
