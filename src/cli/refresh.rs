use crate::daemon::{DBUS_NAME, DBUS_PATH};
use anyhow::{Context, Result};

pub async fn run() -> Result<()> {
    let connection = zbus::Connection::session()
        .await
        .context("Failed to connect to session D-Bus")?;

    connection
        .call_method(Some(DBUS_NAME), DBUS_PATH, Some(DBUS_NAME), "PollNow", &())
        .await
        .context("Failed to call PollNow method - is the daemon running?")?;

    println!("Poll triggered successfully");
    Ok(())
}
