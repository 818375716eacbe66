//! Runtime configuration for the tray.
//!
//! There is no configuration file: every value comes from the compiled
//! defaults below. The builder methods exist for embedding the controller
//! elsewhere (tests point `base_dir` at a temporary directory).
//!
//! # Example
//!
//! ```rust
//! use legion_tray_core::config::TrayConfig;
//! use legion_tray_core::setting::SettingKey;
//!
//! let config = TrayConfig::default().with_base_dir("/tmp/vpc");
//! assert_eq!(
//!     config.setting_path(SettingKey::FnLock),
//!     std::path::PathBuf::from("/tmp/vpc/fn_lock")
//! );
//! ```
use crate::setting::SettingKey;
use std::path::PathBuf;
use std::time::Duration;

/// ideapad_acpi device directory on the reference machine
pub const DEFAULT_BASE_DIR: &str = "/sys/devices/pci0000:00/0000:00:14.3/PNP0C09:00/VPC2004:00/";
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_NOTIFICATION_TIMEOUT: Duration = Duration::from_secs(2);
pub const DEFAULT_APP_TITLE: &str = "Lenovo Control";

#[derive(Clone, Debug)]
pub struct TrayConfig {
    /// Directory holding the backing files
    pub base_dir: PathBuf,
    /// How often the backing files are re-read
    pub poll_interval: Duration,
    /// Upper bound on one elevated write
    pub write_timeout: Duration,
    /// First tooltip line and notification app name
    pub app_title: String,
    pub notification_timeout: Duration,
}

impl Default for TrayConfig {
    fn default() -> Self {
        TrayConfig {
            base_dir: PathBuf::from(DEFAULT_BASE_DIR),
            poll_interval: DEFAULT_POLL_INTERVAL,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            app_title: DEFAULT_APP_TITLE.to_string(),
            notification_timeout: DEFAULT_NOTIFICATION_TIMEOUT,
        }
    }
}

impl TrayConfig {
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// Absolute path of a setting's backing file
    pub fn setting_path(&self, key: SettingKey) -> PathBuf {
        self.base_dir.join(key.relative_path())
    }
}
