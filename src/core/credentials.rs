use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const CREDENTIALS_FILE: &str = "credentials.json";

/// Session credentials for the feed endpoint. The token is forwarded as the
/// `auth_token` cookie on every fetch; without it the feed serves only
/// public data (or rejects the request outright, which the engine treats
/// as any other HTTP error).
#[derive(Debug, Deserialize)]
pub struct Credentials {
    pub auth_token: String,
}

impl Credentials {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("orynth-watch").join(CREDENTIALS_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read credentials from {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse credentials file")
    }

    pub fn cookie_header(&self) -> String {
        format!("auth_token={}", self.auth_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_credentials() {
        let creds: Credentials =
            serde_json::from_str(r#"{"auth_token":"tok-123"}"#).unwrap();
        assert_eq!(creds.auth_token, "tok-123");
        assert_eq!(creds.cookie_header(), "auth_token=tok-123");
    }

    #[test]
    fn test_load_missing_file_errors() {
        let result = Credentials::load(Path::new("/nonexistent/credentials.json"));
        assert!(result.is_err());
    }
}
