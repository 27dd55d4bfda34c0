mod http;

use crate::core::models::FeedItem;
use async_trait::async_trait;
use reqwest::StatusCode;

pub use http::HttpFeedSource;

/// Every way one poll of the feed can fail. Throttling is its own variant
/// because it is the only failure that changes polling cadence; everything
/// else just waits for the next wake-up.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed is rate limiting (HTTP 429)")]
    Throttled,

    #[error("feed returned HTTP {0}")]
    Status(StatusCode),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("response body is not a notification array: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Source of the newest-first notification feed.
#[async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_latest(&self) -> Result<Vec<FeedItem>, FeedError>;
}
