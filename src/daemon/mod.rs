mod dbus;
mod engine;
mod scheduler;

use crate::core::notifications::DesktopNotifier;
use crate::core::settings::Settings;
use crate::feed::HttpFeedSource;
use anyhow::Result;
use engine::PollEngine;
use scheduler::Scheduler;
use std::sync::Arc;
use tokio::sync::mpsc;

pub use dbus::{DBUS_NAME, DBUS_PATH};

const TIMER_NAME: &str = "orynth-poll";

pub async fn run() -> Result<()> {
    let settings = Settings::load()?;
    settings.validate()?;

    tracing::info!(
        url = %settings.feed.url,
        base_interval_secs = settings.polling.base_interval_secs,
        max_interval_secs = settings.polling.max_interval_secs,
        "Starting orynth-watch daemon"
    );

    let (wake_tx, mut wake_rx) = mpsc::unbounded_channel();
    let (_scheduler, timer) =
        Scheduler::spawn(TIMER_NAME, settings.polling.base_interval(), wake_tx.clone());

    let feed = HttpFeedSource::new(&settings)?;
    let notifier = DesktopNotifier::new(&settings);
    let engine = Arc::new(PollEngine::new(
        feed,
        notifier,
        timer,
        settings.polling.base_interval(),
        settings.polling.max_interval(),
    ));

    let status_engine = Arc::clone(&engine);
    let _dbus_connection = dbus::start_dbus_server(
        Arc::new(move || status_engine.status()),
        wake_tx,
        Arc::from(TIMER_NAME),
    )
    .await?;

    // First check runs immediately; the timer covers everything after.
    engine.run_cycle().await;

    while let Some(wake) = wake_rx.recv().await {
        engine.on_wake(&wake).await;
    }

    Ok(())
}
