//! Typed setting domains
//!
//! Each firmware setting gets its own sum type. The backing files overlap
//! numerically ("1" is Enabled for conservation but Min for the keyboard
//! backlight), so values are never passed around as raw integers.
use std::num::IntErrorKind;

/// Identity of one of the three firmware settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingKey {
    Conservation,
    FnLock,
    KbdLed,
}

impl SettingKey {
    pub const ALL: [SettingKey; 3] = [
        SettingKey::Conservation,
        SettingKey::FnLock,
        SettingKey::KbdLed,
    ];

    /// Backing file location relative to the device base directory
    pub fn relative_path(self) -> &'static str {
        match self {
            SettingKey::Conservation => "conservation_mode",
            SettingKey::FnLock => "fn_lock",
            SettingKey::KbdLed => "leds/platform::kbd_backlight/brightness",
        }
    }

    /// Title used for menu items and notifications
    pub fn menu_title(self) -> &'static str {
        match self {
            SettingKey::Conservation => "Conservation Mode",
            SettingKey::FnLock => "FnLock",
            SettingKey::KbdLed => "Keyboard LEDs",
        }
    }

    /// Shorter title used in the tooltip status lines
    pub fn status_title(self) -> &'static str {
        match self {
            SettingKey::Conservation => "Conservation",
            SettingKey::FnLock => "FnLock",
            SettingKey::KbdLed => "KBD LEDs",
        }
    }
}

/// Battery charge cap
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConservationState {
    #[default]
    Disabled,
    Enabled,
}

/// Function key lock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FnLockState {
    #[default]
    Disabled,
    Enabled,
}

/// Keyboard backlight level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KbdLedState {
    #[default]
    Off,
    Min,
    Max,
}

/// Behaviour shared by every setting domain.
///
/// `advance` is the transition a menu click performs: complement for the
/// binary settings, Off -> Min -> Max -> Off for the backlight.
pub trait SettingValue: Copy + PartialEq + std::fmt::Debug + Send + 'static {
    const KEY: SettingKey;
    const DEFAULT: Self;

    /// Map trimmed file content to a value. Never fails.
    fn parse(content: &str) -> Self;

    fn advance(self) -> Self;

    /// Exact string written to the backing file to select this value
    fn write_value(self) -> &'static str;

    /// Menu label ("Enabled", "Min", ...)
    fn label(self) -> &'static str;

    /// Tooltip label ("On", "Off", "Min", ...)
    fn status_label(self) -> &'static str;

    fn applied(self) -> AppliedValue;
}

fn parse_binary(content: &str) -> bool {
    content.trim() == "1"
}

impl SettingValue for ConservationState {
    const KEY: SettingKey = SettingKey::Conservation;
    const DEFAULT: Self = ConservationState::Disabled;

    fn parse(content: &str) -> Self {
        if parse_binary(content) {
            ConservationState::Enabled
        } else {
            ConservationState::Disabled
        }
    }

    fn advance(self) -> Self {
        match self {
            ConservationState::Disabled => ConservationState::Enabled,
            ConservationState::Enabled => ConservationState::Disabled,
        }
    }

    fn write_value(self) -> &'static str {
        match self {
            ConservationState::Disabled => "0",
            ConservationState::Enabled => "1",
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConservationState::Disabled => "Disabled",
            ConservationState::Enabled => "Enabled",
        }
    }

    fn status_label(self) -> &'static str {
        match self {
            ConservationState::Disabled => "Off",
            ConservationState::Enabled => "On",
        }
    }

    fn applied(self) -> AppliedValue {
        AppliedValue::Conservation(self)
    }
}

impl SettingValue for FnLockState {
    const KEY: SettingKey = SettingKey::FnLock;
    const DEFAULT: Self = FnLockState::Disabled;

    fn parse(content: &str) -> Self {
        if parse_binary(content) {
            FnLockState::Enabled
        } else {
            FnLockState::Disabled
        }
    }

    fn advance(self) -> Self {
        match self {
            FnLockState::Disabled => FnLockState::Enabled,
            FnLockState::Enabled => FnLockState::Disabled,
        }
    }

    fn write_value(self) -> &'static str {
        match self {
            FnLockState::Disabled => "0",
            FnLockState::Enabled => "1",
        }
    }

    fn label(self) -> &'static str {
        match self {
            FnLockState::Disabled => "Disabled",
            FnLockState::Enabled => "Enabled",
        }
    }

    fn status_label(self) -> &'static str {
        match self {
            FnLockState::Disabled => "Off",
            FnLockState::Enabled => "On",
        }
    }

    fn applied(self) -> AppliedValue {
        AppliedValue::FnLock(self)
    }
}

impl SettingValue for KbdLedState {
    const KEY: SettingKey = SettingKey::KbdLed;
    const DEFAULT: Self = KbdLedState::Off;

    fn parse(content: &str) -> Self {
        match content.trim().parse::<i64>() {
            Ok(0) => KbdLedState::Off,
            Ok(1) => KbdLedState::Min,
            Ok(_) => KbdLedState::Max,
            // Still an integer, just a wide one
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                KbdLedState::Max
            }
            Err(_) => KbdLedState::Off,
        }
    }

    fn advance(self) -> Self {
        match self {
            KbdLedState::Off => KbdLedState::Min,
            KbdLedState::Min => KbdLedState::Max,
            KbdLedState::Max => KbdLedState::Off,
        }
    }

    fn write_value(self) -> &'static str {
        match self {
            KbdLedState::Off => "0",
            KbdLedState::Min => "1",
            KbdLedState::Max => "2",
        }
    }

    fn label(self) -> &'static str {
        match self {
            KbdLedState::Off => "Off",
            KbdLedState::Min => "Min",
            KbdLedState::Max => "Max",
        }
    }

    fn status_label(self) -> &'static str {
        self.label()
    }

    fn applied(self) -> AppliedValue {
        AppliedValue::KbdLed(self)
    }
}

/// Cached state of all three settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsSnapshot {
    pub conservation: ConservationState,
    pub fnlock: FnLockState,
    pub kbd_led: KbdLedState,
}

/// Value that landed after a successful toggle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppliedValue {
    Conservation(ConservationState),
    FnLock(FnLockState),
    KbdLed(KbdLedState),
}

impl AppliedValue {
    pub fn key(&self) -> SettingKey {
        match self {
            AppliedValue::Conservation(_) => SettingKey::Conservation,
            AppliedValue::FnLock(_) => SettingKey::FnLock,
            AppliedValue::KbdLed(_) => SettingKey::KbdLed,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AppliedValue::Conservation(v) => v.label(),
            AppliedValue::FnLock(v) => v.label(),
            AppliedValue::KbdLed(v) => v.label(),
        }
    }
}
