use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub feed: FeedSettings,
    pub polling: PollingSettings,
    pub notifications: NotificationSettings,
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            feed: FeedSettings::default(),
            polling: PollingSettings::default(),
            notifications: NotificationSettings::default(),
            debug: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedSettings {
    /// Endpoint returning the newest-first JSON array of notifications.
    pub url: String,
    /// Page opened when the user clicks a desktop alert.
    pub destination_url: String,
}

impl Default for FeedSettings {
    fn default() -> Self {
        Self {
            url: "https://www.orynth.dev/api/notifications?limit=10".to_string(),
            destination_url: "https://www.orynth.dev/notifications".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingSettings {
    pub base_interval_secs: u64,
    /// Ceiling for throttle-driven doubling.
    pub max_interval_secs: u64,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            base_interval_secs: 3,
            max_interval_secs: 600,
        }
    }
}

impl PollingSettings {
    pub fn base_interval(&self) -> Duration {
        Duration::from_secs(self.base_interval_secs)
    }

    pub fn max_interval(&self) -> Duration {
        Duration::from_secs(self.max_interval_secs)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationSettings {
    pub enabled: bool,
    pub sound: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("orynth-watch").join("config.toml"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::config_path().context("Could not determine config directory")?;

        if !path.exists() {
            tracing::info!(?path, "Config file not found, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        tracing::info!(?path, "Loaded config");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.feed.url.is_empty() {
            anyhow::bail!("feed.url must not be empty");
        }
        if self.polling.base_interval_secs == 0 {
            anyhow::bail!("polling.base_interval_secs must be at least 1");
        }
        if self.polling.max_interval_secs < self.polling.base_interval_secs {
            anyhow::bail!(
                "polling.max_interval_secs ({}) must not be below base_interval_secs ({})",
                self.polling.max_interval_secs,
                self.polling.base_interval_secs
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.polling.base_interval_secs, 3);
        assert_eq!(settings.polling.max_interval_secs, 600);
        assert!(settings.notifications.enabled);
        assert!(settings.notifications.sound);
        assert!(settings.feed.url.contains("/api/notifications"));
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        assert!(settings.validate().is_ok());

        settings.polling.base_interval_secs = 0;
        assert!(settings.validate().is_err());

        settings.polling.base_interval_secs = 30;
        settings.polling.max_interval_secs = 10;
        assert!(settings.validate().is_err());

        settings.polling.max_interval_secs = 30;
        assert!(settings.validate().is_ok());

        settings.feed.url.clear();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
            debug = true

            [feed]
            url = "https://feed.example.com/api/notifications"
            destination_url = "https://feed.example.com/inbox"

            [polling]
            base_interval_secs = 5
            max_interval_secs = 120

            [notifications]
            enabled = false
            sound = false
        "#;

        let settings: Settings = toml::from_str(toml).unwrap();
        assert!(settings.debug);
        assert_eq!(settings.feed.url, "https://feed.example.com/api/notifications");
        assert_eq!(settings.feed.destination_url, "https://feed.example.com/inbox");
        assert_eq!(settings.polling.base_interval(), Duration::from_secs(5));
        assert_eq!(settings.polling.max_interval(), Duration::from_secs(120));
        assert!(!settings.notifications.enabled);
        assert!(!settings.notifications.sound);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str("[polling]\nbase_interval_secs = 10").unwrap();
        assert_eq!(settings.polling.base_interval_secs, 10);
        assert_eq!(settings.polling.max_interval_secs, 600);
        assert!(settings.notifications.enabled);
    }
}
