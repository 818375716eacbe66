//! Legion Tray Core Library
//!
//! Settings logic for the Lenovo tray utility: conservation mode, FnLock
//! and keyboard backlight, backed by ideapad_acpi sysfs files.
//!
//! Architecture:
//! - `controller` owns the cached settings and the only read/write path
//! - `privileged` performs root writes through an external helper
//! - `tray`, `icons`, `status` turn a snapshot into menu text and pixels
//! - the runner binary drives everything from its event loop

pub mod actions;
pub mod config;
pub mod controller;
pub mod error;
pub mod icons;
pub mod notify;
pub mod privileged;
pub mod schedule;
pub mod setting;
pub mod status;
pub mod tray;

pub use controller::SettingsController;
pub use error::WriteFailure;
