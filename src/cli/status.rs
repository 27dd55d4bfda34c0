use crate::core::models::StatusSnapshot;
use crate::daemon::{DBUS_NAME, DBUS_PATH};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Serialize)]
struct StatusOutput {
    #[serde(flatten)]
    status: StatusSnapshot,
    #[serde(with = "chrono::serde::ts_seconds")]
    fetched_at: DateTime<Utc>,
}

pub async fn run(json: bool) -> Result<()> {
    let connection = zbus::Connection::session()
        .await
        .context("Failed to connect to session D-Bus")?;

    let reply = connection
        .call_method(Some(DBUS_NAME), DBUS_PATH, Some(DBUS_NAME), "Status", &())
        .await
        .context("Failed to call Status method - is the daemon running?")?;

    let body: String = reply
        .body()
        .deserialize()
        .context("Failed to deserialize response")?;

    let status: StatusSnapshot =
        serde_json::from_str(&body).context("Daemon returned an invalid status payload")?;

    if json {
        let output = StatusOutput {
            status,
            fetched_at: Utc::now(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text_output(&status);
    }

    Ok(())
}

fn print_text_output(status: &StatusSnapshot) {
    match &status.last_seen_id {
        Some(id) => println!("Last seen:    {}", id),
        None => println!("Last seen:    (no baseline yet)"),
    }
    println!("Interval:     {}s", status.current_interval_secs);
    println!(
        "Polling now:  {}",
        if status.in_flight { "yes" } else { "no" }
    );
}
