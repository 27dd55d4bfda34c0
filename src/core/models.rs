use serde::{Deserialize, Serialize};

pub const FALLBACK_MESSAGE: &str = "A followed user launched a new product";

/// One entry of the notification feed. Only `id` participates in change
/// detection; the other fields just supply display text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedItem {
    pub id: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl FeedItem {
    /// Text shown in the desktop alert: `content` wins over `message`,
    /// with a generic fallback when the feed supplies neither.
    pub fn display_text(&self) -> &str {
        self.content
            .as_deref()
            .or(self.message.as_deref())
            .unwrap_or(FALLBACK_MESSAGE)
    }
}

/// Read-only view of the engine's polling state, served to diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub last_seen_id: Option<String>,
    pub current_interval_secs: u64,
    pub in_flight: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_text_prefers_content() {
        let item = FeedItem {
            id: "n1".to_string(),
            content: Some("Shipped: whale-tracker v2".to_string()),
            message: Some("ignored".to_string()),
        };
        assert_eq!(item.display_text(), "Shipped: whale-tracker v2");
    }

    #[test]
    fn test_display_text_falls_back_to_message() {
        let item = FeedItem {
            id: "n1".to_string(),
            content: None,
            message: Some("New launch from @whale".to_string()),
        };
        assert_eq!(item.display_text(), "New launch from @whale");
    }

    #[test]
    fn test_display_text_generic_fallback() {
        let item = FeedItem {
            id: "n1".to_string(),
            content: None,
            message: None,
        };
        assert_eq!(item.display_text(), FALLBACK_MESSAGE);
    }

    #[test]
    fn test_feed_item_parses_with_missing_fields() {
        let item: FeedItem = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        assert_eq!(item.id, "abc");
        assert!(item.content.is_none());
        assert!(item.message.is_none());
    }

    #[test]
    fn test_status_snapshot_roundtrip() {
        let snapshot = StatusSnapshot {
            last_seen_id: Some("x1".to_string()),
            current_interval_secs: 12,
            in_flight: false,
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        let back: StatusSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.last_seen_id.as_deref(), Some("x1"));
        assert_eq!(back.current_interval_secs, 12);
        assert!(!back.in_flight);
    }
}
