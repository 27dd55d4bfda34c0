use crate::core::models::FeedItem;
use crate::core::settings::{NotificationSettings, Settings};
use anyhow::Result;
use notify_rust::{Hint, Notification, Timeout, Urgency};

const ALERT_TITLE: &str = "Orynth: new launch detected";
const ALERT_SOUND: &str = "message-new-instant";

/// Presentation seam for the poll engine. Implementations are
/// fire-and-forget: the engine never waits on the alert and a failed
/// presentation never feeds back into polling state.
pub trait Notifier: Send + Sync {
    fn present(&self, item: &FeedItem);
}

/// Desktop notifications via the XDG notification service. Alerts stay
/// visible until dismissed; clicking one opens the configured feed page.
pub struct DesktopNotifier {
    destination_url: String,
    settings: NotificationSettings,
}

impl DesktopNotifier {
    pub fn new(settings: &Settings) -> Self {
        Self {
            destination_url: settings.feed.destination_url.clone(),
            settings: settings.notifications.clone(),
        }
    }

    fn show_alert(body: String, sound: bool, destination: String) -> Result<()> {
        let mut notification = Notification::new();
        notification
            .summary(ALERT_TITLE)
            .body(&body)
            .appname("orynth-watch")
            .urgency(Urgency::Critical)
            .timeout(Timeout::Never)
            .action("default", "Open feed");

        if sound {
            notification.hint(Hint::SoundName(ALERT_SOUND.to_string()));
        }

        let handle = notification.show()?;

        handle.wait_for_action(|action| {
            if action == "default" {
                if let Err(e) = open::that(&destination) {
                    tracing::error!(error = %e, url = %destination, "Failed to open browser");
                }
            }
        });

        Ok(())
    }
}

impl Notifier for DesktopNotifier {
    fn present(&self, item: &FeedItem) {
        if !self.settings.enabled {
            tracing::debug!(id = %item.id, "Notifications disabled, suppressing alert");
            return;
        }

        let body = item.display_text().to_string();
        let sound = self.settings.sound;
        let destination = self.destination_url.clone();
        let id = item.id.clone();

        tracing::info!(%id, message = %body, "Showing notification");

        // show() and the click wait are blocking D-Bus calls; keep them
        // off the polling task entirely.
        tokio::task::spawn_blocking(move || {
            if let Err(e) = Self::show_alert(body, sound, destination) {
                tracing::warn!(%id, error = %e, "Failed to show notification");
            }
        });
    }
}
