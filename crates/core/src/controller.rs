//! Settings controller
//!
//! Owns the cached state of the three firmware settings and is the only
//! component that reads or writes their backing files.
//!
//! Every operation holds the state lock for its full duration, elevated
//! write included, so a poll can never interleave with a toggle.
use crate::config::TrayConfig;
use crate::error::{ReadFailure, WriteFailure};
use crate::privileged::ElevatedWriter;
use crate::setting::{
    AppliedValue, ConservationState, FnLockState, KbdLedState, SettingKey, SettingValue,
    SettingsSnapshot,
};
use parking_lot::Mutex;
use std::path::Path;

pub struct SettingsController {
    config: TrayConfig,
    writer: Box<dyn ElevatedWriter>,
    state: Mutex<SettingsSnapshot>,
}

impl SettingsController {
    /// Create the controller and read the initial state from disk
    pub fn new(config: TrayConfig, writer: Box<dyn ElevatedWriter>) -> Self {
        let controller = Self {
            config,
            writer,
            state: Mutex::new(SettingsSnapshot::default()),
        };
        let initial = controller.refresh_all();
        tracing::info!("Initial settings: {:?}", initial);
        controller
    }

    pub fn config(&self) -> &TrayConfig {
        &self.config
    }

    /// Cached state, without touching the backing files
    pub fn snapshot(&self) -> SettingsSnapshot {
        *self.state.lock()
    }

    /// Re-read all three backing files and overwrite the cache.
    ///
    /// Unreadable files become that setting's default; nothing is merged
    /// with the previous cache.
    pub fn refresh_all(&self) -> SettingsSnapshot {
        let mut state = self.state.lock();
        *state = SettingsSnapshot {
            conservation: self.read_setting::<ConservationState>(),
            fnlock: self.read_setting::<FnLockState>(),
            kbd_led: self.read_setting::<KbdLedState>(),
        };
        *state
    }

    pub fn toggle_conservation(&self) -> Result<AppliedValue, WriteFailure> {
        self.transition(|s| &mut s.conservation)
    }

    pub fn toggle_fnlock(&self) -> Result<AppliedValue, WriteFailure> {
        self.transition(|s| &mut s.fnlock)
    }

    /// Off -> Min -> Max -> Off
    pub fn cycle_kbd_led(&self) -> Result<AppliedValue, WriteFailure> {
        self.transition(|s| &mut s.kbd_led)
    }

    /// Hand one write to the privileged helper
    pub fn write_backing_value(&self, path: &Path, content: &str) -> Result<(), WriteFailure> {
        self.writer
            .elevated_write(path, content, self.config.write_timeout)
    }

    /// Optimistic set, then confirm or restore the exact prior value
    fn transition<T: SettingValue>(
        &self,
        slot: fn(&mut SettingsSnapshot) -> &mut T,
    ) -> Result<AppliedValue, WriteFailure> {
        let mut state = self.state.lock();
        let prior = *slot(&mut *state);
        let target = prior.advance();
        *slot(&mut *state) = target;

        let path = self.config.setting_path(T::KEY);
        match self.write_backing_value(&path, target.write_value()) {
            Ok(()) => {
                tracing::info!("{} set to {}", T::KEY.menu_title(), target.label());
                Ok(target.applied())
            }
            Err(e) => {
                *slot(&mut *state) = prior;
                tracing::warn!(
                    "{} stays {}: {}",
                    T::KEY.menu_title(),
                    prior.label(),
                    e
                );
                Err(e)
            }
        }
    }

    fn read_setting<T: SettingValue>(&self) -> T {
        match read_backing_value(&self.config.setting_path(T::KEY)) {
            Ok(content) => T::parse(&content),
            Err(e) => {
                tracing::debug!("Using default for {:?}: {}", T::KEY, e);
                T::DEFAULT
            }
        }
    }
}

/// Read a backing file as trimmed UTF-8 text
pub fn read_backing_value(path: &Path) -> Result<String, ReadFailure> {
    let bytes = std::fs::read(path).map_err(|source| ReadFailure::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let text = String::from_utf8(bytes).map_err(|_| ReadFailure::Malformed {
        path: path.to_path_buf(),
    })?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Records requested writes; either writes them through or fails
    #[derive(Clone, Default)]
    pub(crate) struct FakeWriter {
        pub requests: Arc<Mutex<Vec<(PathBuf, String)>>>,
        pub fail_with: Arc<Mutex<Option<WriteFailure>>>,
    }

    impl FakeWriter {
        pub fn fail_next(&self, failure: WriteFailure) {
            *self.fail_with.lock() = Some(failure);
        }

        pub fn last_request(&self) -> Option<(PathBuf, String)> {
            self.requests.lock().last().cloned()
        }
    }

    impl ElevatedWriter for FakeWriter {
        fn elevated_write(&self, path: &Path, content: &str, _timeout: Duration) -> Result<(), WriteFailure> {
            self.requests
                .lock()
                .push((path.to_path_buf(), content.to_string()));
            if let Some(failure) = self.fail_with.lock().take() {
                return Err(failure);
            }
            std::fs::write(path, content).map_err(|e| WriteFailure::Invocation {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
        }
    }

    pub(crate) fn backing_dir(conservation: &str, fnlock: &str, kbd: &str) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        let config = TrayConfig::default().with_base_dir(dir.path());
        std::fs::create_dir_all(dir.path().join("leds/platform::kbd_backlight")).unwrap();
        std::fs::write(config.setting_path(SettingKey::Conservation), conservation).unwrap();
        std::fs::write(config.setting_path(SettingKey::FnLock), fnlock).unwrap();
        std::fs::write(config.setting_path(SettingKey::KbdLed), kbd).unwrap();
        dir
    }

    pub(crate) fn controller_for(dir: &TempDir) -> (SettingsController, FakeWriter) {
        let writer = FakeWriter::default();
        let config = TrayConfig::default().with_base_dir(dir.path());
        (SettingsController::new(config, Box::new(writer.clone())), writer)
    }

    fn state(c: ConservationState, f: FnLockState, k: KbdLedState) -> SettingsSnapshot {
        SettingsSnapshot {
            conservation: c,
            fnlock: f,
            kbd_led: k,
        }
    }

    fn timeout(path: PathBuf) -> WriteFailure {
        WriteFailure::Timeout {
            path,
            after: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_refresh_reads_all_zero_files() {
        let dir = backing_dir("0\n", "0\n", "0\n");
        let (controller, _) = controller_for(&dir);
        assert_eq!(
            controller.refresh_all(),
            state(ConservationState::Disabled, FnLockState::Disabled, KbdLedState::Off)
        );
    }

    #[test]
    fn test_refresh_is_idempotent() {
        let dir = backing_dir("1\n", "0\n", "1\n");
        let (controller, _) = controller_for(&dir);
        let first = controller.refresh_all();
        assert_eq!(first, controller.refresh_all());
        assert_eq!(
            first,
            state(ConservationState::Enabled, FnLockState::Disabled, KbdLedState::Min)
        );
    }

    #[test]
    fn test_refresh_maps_large_brightness_to_max() {
        let dir = backing_dir("0", "0", "7\n");
        let (controller, _) = controller_for(&dir);
        assert_eq!(controller.refresh_all().kbd_led, KbdLedState::Max);
    }

    #[test]
    fn test_missing_files_reset_to_defaults() {
        let dir = backing_dir("1", "1", "2");
        let (controller, _) = controller_for(&dir);
        assert_eq!(
            controller.snapshot(),
            state(ConservationState::Enabled, FnLockState::Enabled, KbdLedState::Max)
        );

        let config = controller.config().clone();
        std::fs::remove_file(config.setting_path(SettingKey::FnLock)).unwrap();
        std::fs::write(config.setting_path(SettingKey::KbdLed), [0xff, 0xfe]).unwrap();

        assert_eq!(
            controller.refresh_all(),
            state(ConservationState::Enabled, FnLockState::Disabled, KbdLedState::Off)
        );
    }

    #[test]
    fn test_refresh_picks_up_external_changes() {
        let dir = backing_dir("0", "0", "0");
        let (controller, _) = controller_for(&dir);
        let path = controller.config().setting_path(SettingKey::FnLock);
        std::fs::write(path, "1\n").unwrap();
        assert_eq!(controller.refresh_all().fnlock, FnLockState::Enabled);
    }

    #[test]
    fn test_toggle_conservation_writes_complement() {
        let dir = backing_dir("0", "0", "0");
        let (controller, writer) = controller_for(&dir);
        let path = controller.config().setting_path(SettingKey::Conservation);

        let applied = controller.toggle_conservation().unwrap();
        assert_eq!(applied, AppliedValue::Conservation(ConservationState::Enabled));
        assert_eq!(writer.last_request(), Some((path.clone(), "1".to_string())));
        assert_eq!(
            controller.snapshot(),
            state(ConservationState::Enabled, FnLockState::Disabled, KbdLedState::Off)
        );

        controller.toggle_conservation().unwrap();
        assert_eq!(writer.last_request(), Some((path, "0".to_string())));
        assert_eq!(controller.snapshot().conservation, ConservationState::Disabled);
    }

    #[test]
    fn test_toggle_fnlock_writes_complement() {
        let dir = backing_dir("0", "1", "0");
        let (controller, writer) = controller_for(&dir);
        let path = controller.config().setting_path(SettingKey::FnLock);

        let applied = controller.toggle_fnlock().unwrap();
        assert_eq!(applied, AppliedValue::FnLock(FnLockState::Disabled));
        assert_eq!(writer.last_request(), Some((path, "0".to_string())));
        assert_eq!(controller.refresh_all().fnlock, FnLockState::Disabled);
    }

    #[test]
    fn test_cycle_kbd_led_closes_after_three_steps() {
        let dir = backing_dir("0", "0", "0");
        let (controller, writer) = controller_for(&dir);

        let expected = [
            ("1", KbdLedState::Min),
            ("2", KbdLedState::Max),
            ("0", KbdLedState::Off),
        ];
        for (content, level) in expected {
            assert_eq!(controller.cycle_kbd_led().unwrap(), AppliedValue::KbdLed(level));
            assert_eq!(writer.last_request().unwrap().1, content);
            assert_eq!(controller.snapshot().kbd_led, level);
        }
    }

    #[test]
    fn test_failed_cycle_reverts_to_prior_level() {
        let dir = backing_dir("0", "0", "1");
        let (controller, writer) = controller_for(&dir);
        let path = controller.config().setting_path(SettingKey::KbdLed);
        writer.fail_next(timeout(path.clone()));

        let err = controller.cycle_kbd_led().unwrap_err();
        assert!(matches!(err, WriteFailure::Timeout { .. }));
        assert_eq!(writer.last_request(), Some((path, "2".to_string())));
        assert_eq!(
            controller.snapshot(),
            state(ConservationState::Disabled, FnLockState::Disabled, KbdLedState::Min)
        );
    }

    #[test]
    fn test_failed_toggle_restores_exact_value() {
        let failures = |path: PathBuf| {
            vec![
                timeout(path.clone()),
                WriteFailure::NonZeroExit {
                    path: path.clone(),
                    code: Some(126),
                    stderr: "Request dismissed".to_string(),
                },
                WriteFailure::Invocation {
                    path,
                    message: "No such file or directory".to_string(),
                },
            ]
        };

        for (conservation, fnlock) in [("0", "1"), ("1", "0")] {
            let dir = backing_dir(conservation, fnlock, "2");
            let (controller, writer) = controller_for(&dir);
            let before = controller.snapshot();

            for failure in failures(controller.config().setting_path(SettingKey::Conservation)) {
                writer.fail_next(failure);
                assert!(controller.toggle_conservation().is_err());
                assert_eq!(controller.snapshot(), before);
            }
            for failure in failures(controller.config().setting_path(SettingKey::FnLock)) {
                writer.fail_next(failure);
                assert!(controller.toggle_fnlock().is_err());
                assert_eq!(controller.snapshot(), before);
            }
            writer.fail_next(timeout(controller.config().setting_path(SettingKey::KbdLed)));
            assert!(controller.cycle_kbd_led().is_err());
            assert_eq!(controller.snapshot(), before);
        }
    }

    #[test]
    fn test_toggles_leave_other_settings_alone() {
        let dir = backing_dir("1", "0", "2");
        let (controller, _) = controller_for(&dir);

        controller.toggle_fnlock().unwrap();
        let after = controller.snapshot();
        assert_eq!(after.conservation, ConservationState::Enabled);
        assert_eq!(after.kbd_led, KbdLedState::Max);

        controller.cycle_kbd_led().unwrap();
        let after = controller.snapshot();
        assert_eq!(after.conservation, ConservationState::Enabled);
        assert_eq!(after.fnlock, FnLockState::Enabled);
    }

    #[test]
    fn test_read_backing_value_trims() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conservation_mode");
        std::fs::write(&path, "  1\n").unwrap();
        assert_eq!(read_backing_value(&path).unwrap(), "1");
        assert!(matches!(
            read_backing_value(&dir.path().join("missing")),
            Err(ReadFailure::Io { .. })
        ));
    }
}
