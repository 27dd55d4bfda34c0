use crate::core::credentials::Credentials;
use crate::core::models::FeedItem;
use crate::core::settings::Settings;
use crate::feed::{FeedError, FeedSource};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, COOKIE};
use reqwest::StatusCode;
use std::path::PathBuf;
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub struct HttpFeedSource {
    client: reqwest::Client,
    url: String,
    credentials_path: Option<PathBuf>,
}

impl HttpFeedSource {
    pub fn new(settings: &Settings) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            url: settings.feed.url.clone(),
            credentials_path: Credentials::default_path(),
        })
    }

    /// Credentials are re-read on every fetch so a refreshed token is
    /// picked up without restarting the daemon. A missing or unreadable
    /// file just means an unauthenticated request.
    fn session_cookie(&self) -> Option<String> {
        let path = self.credentials_path.as_deref()?;
        if !path.exists() {
            return None;
        }

        match Credentials::load(path) {
            Ok(creds) => Some(creds.cookie_header()),
            Err(e) => {
                tracing::warn!(?path, error = %e, "Ignoring unreadable credentials file");
                None
            }
        }
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>, FeedError> {
        let mut request = self
            .client
            .get(&self.url)
            .header(ACCEPT, "application/json");

        if let Some(cookie) = self.session_cookie() {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;

        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => return Err(FeedError::Throttled),
            status if !status.is_success() => return Err(FeedError::Status(status)),
            _ => {}
        }

        // Parse via serde_json rather than response.json() so a non-array
        // body is classified as Malformed, not Transport.
        let body = response.text().await?;
        let items: Vec<FeedItem> = serde_json::from_str(&body)?;
        Ok(items)
    }
}
