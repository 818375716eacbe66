//! legion-tray - System Tray Process
//!
//! This process manages:
//! - Tray icon with the settings context menu
//! - Periodic re-read of the ideapad_acpi backing files
//! - Elevated writes when a menu item is clicked
//! - A notification after each successful change

use anyhow::Result;
use std::time::Instant;

use legion_tray_core::{
    actions::{self, ActionOutcome},
    config::TrayConfig,
    notify::DesktopNotifier,
    privileged::PkexecWriter,
    schedule::RefreshSchedule,
    tray::TrayIconManager,
    SettingsController,
};

use tao::event::{Event, StartCause};
use tao::event_loop::{ControlFlow, EventLoopBuilder};
use tracing_subscriber::EnvFilter;
use tray_icon::menu::MenuEvent;
use tray_icon::TrayIconEvent;

enum UserEvent {
    TrayIcon(TrayIconEvent),
    Menu(MenuEvent),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    tracing::info!("legion-tray starting...");

    let config = TrayConfig::default();
    tracing::info!("Device directory: {:?}", config.base_dir);

    let notifier = DesktopNotifier::new(config.app_title.clone(), config.notification_timeout);
    let controller = SettingsController::new(config, Box::new(PkexecWriter::new()));

    let event_loop = EventLoopBuilder::<UserEvent>::with_user_event().build();

    let proxy = event_loop.create_proxy();
    TrayIconEvent::set_event_handler(Some(move |event| {
        let _ = proxy.send_event(UserEvent::TrayIcon(event));
    }));

    let proxy = event_loop.create_proxy();
    MenuEvent::set_event_handler(Some(move |event| {
        let _ = proxy.send_event(UserEvent::Menu(event));
    }));

    let mut tray: Option<TrayIconManager> = None;
    let mut schedule = RefreshSchedule::new(controller.config().poll_interval, Instant::now());

    tracing::info!("Event handlers set, entering event loop");

    event_loop.run(move |event, _, control_flow| {
        *control_flow = ControlFlow::WaitUntil(schedule.deadline());

        match event {
            Event::NewEvents(StartCause::Init) => {
                // The tray must be created once the loop (and GTK) is running
                match TrayIconManager::new(&controller.config().app_title) {
                    Ok(manager) => {
                        manager.render(&controller.snapshot());
                        tray = Some(manager);
                    }
                    Err(e) => {
                        tracing::error!("{:#}", e);
                        show_tray_unavailable();
                        *control_flow = ControlFlow::ExitWithCode(1);
                    }
                }
            }

            Event::NewEvents(StartCause::ResumeTimeReached { .. }) => {
                let now = Instant::now();
                if schedule.is_due(now) {
                    let snapshot = controller.refresh_all();
                    tracing::trace!("Polled settings: {:?}", snapshot);
                    if let Some(ref manager) = tray {
                        manager.render(&snapshot);
                    }
                    schedule.mark_ran(now);
                    *control_flow = ControlFlow::WaitUntil(schedule.deadline());
                }
            }

            Event::UserEvent(UserEvent::TrayIcon(event)) => {
                tracing::trace!("Tray event: {:?}", event);
            }

            Event::UserEvent(UserEvent::Menu(event)) => {
                tracing::debug!("Menu event: {:?}", event);
                let Some(action) = tray.as_ref().and_then(|m| m.action_for(&event.id)) else {
                    return;
                };

                tracing::info!("Menu action: {:?}", action);
                match actions::perform(&controller, &notifier, action) {
                    ActionOutcome::Render(snapshot) | ActionOutcome::Unchanged(snapshot) => {
                        if let Some(ref manager) = tray {
                            manager.render(&snapshot);
                        }
                        if action == actions::TrayAction::Refresh {
                            schedule.mark_ran(Instant::now());
                            *control_flow = ControlFlow::WaitUntil(schedule.deadline());
                        }
                    }
                    ActionOutcome::Exit => {
                        tracing::info!("Exit menu clicked");
                        tray = None;
                        *control_flow = ControlFlow::Exit;
                    }
                }
            }

            _ => {}
        }
    })
}

/// Modal error shown when no tray host accepted the icon
fn show_tray_unavailable() {
    let _ = rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title("System Tray")
        .set_description("System tray is not available on this system.")
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
}
