use crate::core::models::StatusSnapshot;
use crate::daemon::scheduler::Wake;
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::mpsc;
use zbus::interface;

pub const DBUS_NAME: &str = "dev.orynth.Watch";
pub const DBUS_PATH: &str = "/dev/orynth/Watch";

pub type StatusQuery = Arc<dyn Fn() -> StatusSnapshot + Send + Sync>;

/// Session-bus surface of the daemon: a read-only status query plus a
/// manual poll trigger. The trigger is just an injected wake-up; the
/// engine's in-flight gate still applies.
pub struct WatchService {
    status: StatusQuery,
    wake_tx: mpsc::UnboundedSender<Wake>,
    timer: Arc<str>,
}

#[interface(name = "dev.orynth.Watch")]
impl WatchService {
    /// Current poll state as a JSON object.
    async fn status(&self) -> zbus::fdo::Result<String> {
        serde_json::to_string(&(self.status)())
            .map_err(|e| zbus::fdo::Error::Failed(e.to_string()))
    }

    async fn poll_now(&self) -> zbus::fdo::Result<()> {
        tracing::info!("D-Bus PollNow called");
        self.wake_tx
            .send(Wake {
                timer: Arc::clone(&self.timer),
            })
            .map_err(|_| zbus::fdo::Error::Failed("daemon is shutting down".to_string()))
    }
}

pub async fn start_dbus_server(
    status: StatusQuery,
    wake_tx: mpsc::UnboundedSender<Wake>,
    timer: Arc<str>,
) -> Result<zbus::Connection> {
    let service = WatchService {
        status,
        wake_tx,
        timer,
    };

    let connection = zbus::connection::Builder::session()?
        .name(DBUS_NAME)?
        .serve_at(DBUS_PATH, service)?
        .build()
        .await?;

    tracing::info!(name = DBUS_NAME, "D-Bus service started");
    Ok(connection)
}
