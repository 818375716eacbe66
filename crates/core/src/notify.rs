/// Desktop notifications shown after a setting changes
use notify_rust::{Notification, Timeout};
use std::time::Duration;

/// Fire-and-forget notification sink
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, body: &str);
}

/// freedesktop.org notifications over D-Bus
pub struct DesktopNotifier {
    app_name: String,
    timeout: Duration,
}

impl DesktopNotifier {
    pub fn new(app_name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            app_name: app_name.into(),
            timeout,
        }
    }
}

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) {
        let result = Notification::new()
            .appname(&self.app_name)
            .summary(title)
            .body(body)
            .icon("dialog-information")
            .timeout(Timeout::Milliseconds(self.timeout.as_millis() as u32))
            .show();

        if let Err(e) = result {
            tracing::warn!("Failed to show notification '{}': {}", title, e);
        }
    }
}
