/// Commands the tray menu can issue, and their effect on the controller
use crate::controller::SettingsController;
use crate::notify::Notifier;
use crate::setting::SettingsSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayAction {
    ToggleConservation,
    ToggleFnLock,
    CycleKbdLed,
    Refresh,
    Exit,
}

/// What the event loop should do after an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// State changed; redraw the menu
    Render(SettingsSnapshot),
    /// A write failed and the cache was restored; redraw anyway so the
    /// menu snaps back
    Unchanged(SettingsSnapshot),
    Exit,
}

pub fn perform(controller: &SettingsController, notifier: &dyn Notifier, action: TrayAction) -> ActionOutcome {
    let result = match action {
        TrayAction::ToggleConservation => controller.toggle_conservation(),
        TrayAction::ToggleFnLock => controller.toggle_fnlock(),
        TrayAction::CycleKbdLed => controller.cycle_kbd_led(),
        TrayAction::Refresh => return ActionOutcome::Render(controller.refresh_all()),
        TrayAction::Exit => return ActionOutcome::Exit,
    };

    match result {
        Ok(applied) => {
            notifier.notify(applied.key().menu_title(), applied.label());
            ActionOutcome::Render(controller.snapshot())
        }
        Err(e) => {
            tracing::debug!("{:?} failed: {}", action, e.diagnostic());
            ActionOutcome::Unchanged(controller.snapshot())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::tests::{backing_dir, controller_for};
    use crate::error::WriteFailure;
    use crate::setting::{ConservationState, FnLockState, KbdLedState, SettingKey};
    use parking_lot::Mutex;
    use std::time::Duration;

    #[derive(Default)]
    struct RecordingNotifier {
        shown: Mutex<Vec<(String, String)>>,
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, title: &str, body: &str) {
            self.shown.lock().push((title.to_string(), body.to_string()));
        }
    }

    #[test]
    fn test_successful_toggle_notifies() {
        let dir = backing_dir("0", "0", "0");
        let (controller, _) = controller_for(&dir);
        let notifier = RecordingNotifier::default();

        let outcome = perform(&controller, &notifier, TrayAction::ToggleConservation);
        assert_eq!(
            outcome,
            ActionOutcome::Render(SettingsSnapshot {
                conservation: ConservationState::Enabled,
                fnlock: FnLockState::Disabled,
                kbd_led: KbdLedState::Off,
            })
        );

        perform(&controller, &notifier, TrayAction::CycleKbdLed);
        assert_eq!(
            *notifier.shown.lock(),
            vec![
                ("Conservation Mode".to_string(), "Enabled".to_string()),
                ("Keyboard LEDs".to_string(), "Min".to_string()),
            ]
        );
    }

    #[test]
    fn test_failed_toggle_is_silent_and_reverted() {
        let dir = backing_dir("0", "0", "1");
        let (controller, writer) = controller_for(&dir);
        let notifier = RecordingNotifier::default();
        writer.fail_next(WriteFailure::Timeout {
            path: controller.config().setting_path(SettingKey::KbdLed),
            after: Duration::from_secs(30),
        });

        let outcome = perform(&controller, &notifier, TrayAction::CycleKbdLed);
        assert_eq!(
            outcome,
            ActionOutcome::Unchanged(SettingsSnapshot {
                conservation: ConservationState::Disabled,
                fnlock: FnLockState::Disabled,
                kbd_led: KbdLedState::Min,
            })
        );
        assert!(notifier.shown.lock().is_empty());
    }

    #[test]
    fn test_refresh_and_exit() {
        let dir = backing_dir("0", "0", "0");
        let (controller, _) = controller_for(&dir);
        let notifier = RecordingNotifier::default();

        std::fs::write(controller.config().setting_path(SettingKey::FnLock), "1").unwrap();
        match perform(&controller, &notifier, TrayAction::Refresh) {
            ActionOutcome::Render(snapshot) => assert_eq!(snapshot.fnlock, FnLockState::Enabled),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert_eq!(perform(&controller, &notifier, TrayAction::Exit), ActionOutcome::Exit);
        assert!(notifier.shown.lock().is_empty());
    }
}
