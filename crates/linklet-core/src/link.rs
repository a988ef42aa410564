use crate::shortcode::ShortCode;
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Click source recorded when no referrer is known.
pub const DIRECT_SOURCE: &str = "Direct";
/// Location recorded for every click; no geolocation is performed.
pub const UNKNOWN_LOCATION: &str = "Unknown";

/// One successful resolution of a non-expired link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClickEvent {
    pub timestamp: Timestamp,
    pub source: String,
    pub location: String,
}

impl ClickEvent {
    /// Creates a click at `timestamp`. An absent or blank source becomes
    /// [`DIRECT_SOURCE`]; any other source is kept as given.
    pub fn new(timestamp: Timestamp, source: Option<&str>) -> Self {
        let source = source
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(DIRECT_SOURCE);
        Self {
            timestamp,
            source: source.to_string(),
            location: UNKNOWN_LOCATION.to_string(),
        }
    }
}

/// A shortened link as held in the persisted collection.
///
/// A custom code is persisted as `"customCode": "<code>"` and omitted for
/// generated codes. A boolean `isCustomCode` is also accepted on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "StoredLinkRecord", into = "StoredLinkRecord")]
pub struct LinkRecord {
    pub id: String,
    pub original_url: String,
    pub short_code: ShortCode,
    pub created_at: Timestamp,
    pub expires_at: Timestamp,
    pub is_custom_code: bool,
    pub click_count: u64,
    pub click_events: Vec<ClickEvent>,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLinkRecord {
    id: String,
    original_url: String,
    short_code: ShortCode,
    created_at: Timestamp,
    expires_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    custom_code: Option<String>,
    #[serde(default, skip_serializing)]
    is_custom_code: Option<bool>,
    #[serde(default)]
    clicks: u64,
    #[serde(default)]
    click_data: Vec<ClickEvent>,
}

impl From<StoredLinkRecord> for LinkRecord {
    fn from(stored: StoredLinkRecord) -> Self {
        let has_custom_code = stored.custom_code.is_some_and(|c| !c.is_empty());
        Self {
            id: stored.id,
            original_url: stored.original_url,
            short_code: stored.short_code,
            created_at: stored.created_at,
            expires_at: stored.expires_at,
            is_custom_code: has_custom_code || stored.is_custom_code.unwrap_or(false),
            click_count: stored.clicks,
            click_events: stored.click_data,
        }
    }
}

impl From<LinkRecord> for StoredLinkRecord {
    fn from(record: LinkRecord) -> Self {
        Self {
            custom_code: record
                .is_custom_code
                .then(|| record.short_code.as_str().to_string()),
            is_custom_code: None,
            id: record.id,
            original_url: record.original_url,
            short_code: record.short_code,
            created_at: record.created_at,
            expires_at: record.expires_at,
            clicks: record.click_count,
            click_data: record.click_events,
        }
    }
}

impl LinkRecord {
    /// A link is expired strictly after its expiry instant.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now > self.expires_at
    }

    /// The length of the validity window.
    pub fn validity(&self) -> SignedDuration {
        self.expires_at.duration_since(self.created_at)
    }

    pub fn short_url(&self, base_url: &str) -> String {
        self.short_code.to_url(base_url)
    }

    /// Returns `true` when the click counter agrees with the recorded clicks.
    pub fn clicks_consistent(&self) -> bool {
        self.click_count == self.click_events.len() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LinkRecord {
        let created_at = Timestamp::from_second(1_700_000_000).unwrap();
        LinkRecord {
            id: "id-1".to_string(),
            original_url: "https://example.com".to_string(),
            short_code: ShortCode::new("abc123").unwrap(),
            created_at,
            expires_at: created_at + SignedDuration::from_mins(30),
            is_custom_code: false,
            click_count: 0,
            click_events: vec![],
        }
    }

    #[test]
    fn expiry_is_strict() {
        let r = record();
        assert!(!r.is_expired(r.created_at));
        assert!(!r.is_expired(r.expires_at));
        assert!(r.is_expired(r.expires_at + SignedDuration::from_nanos(1)));
    }

    #[test]
    fn validity_matches_window() {
        assert_eq!(record().validity(), SignedDuration::from_mins(30));
    }

    #[test]
    fn blank_source_becomes_direct() {
        let ts = Timestamp::from_second(0).unwrap();
        assert_eq!(ClickEvent::new(ts, None).source, DIRECT_SOURCE);
        assert_eq!(ClickEvent::new(ts, Some("  ")).source, DIRECT_SOURCE);
        let click = ClickEvent::new(ts, Some("https://news.example"));
        assert_eq!(click.source, "https://news.example");
        assert_eq!(click.location, UNKNOWN_LOCATION);
    }

    #[test]
    fn source_is_kept_verbatim() {
        let ts = Timestamp::from_second(0).unwrap();
        let click = ClickEvent::new(ts, Some(" https://ref.example/ "));
        assert_eq!(click.source, " https://ref.example/ ");
    }

    #[test]
    fn persisted_layout_uses_camel_case() {
        let mut r = record();
        r.click_events
            .push(ClickEvent::new(r.created_at, Some("ref")));
        r.click_count = 1;

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["shortCode"], "abc123");
        assert_eq!(json["originalUrl"], "https://example.com");
        assert_eq!(json["clicks"], 1);
        assert_eq!(json["createdAt"], "2023-11-14T22:13:20Z");
        assert_eq!(json["clickData"][0]["source"], "ref");
        assert!(json.get("customCode").is_none());
        assert!(json.get("isCustomCode").is_none());
    }

    #[test]
    fn custom_code_is_persisted_as_code() {
        let mut r = record();
        r.is_custom_code = true;

        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["customCode"], "abc123");

        let back: LinkRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, r);
    }

    #[test]
    fn custom_code_flag_is_read_from_either_field() {
        let parse = |extra: &str| {
            let json = format!(
                r#"{{"id":"1","originalUrl":"https://example.com","shortCode":"docs","createdAt":"2024-01-01T00:00:00Z","expiresAt":"2024-01-01T00:30:00Z"{extra}}}"#
            );
            serde_json::from_str::<LinkRecord>(&json).unwrap()
        };

        assert!(parse(r#","customCode":"docs""#).is_custom_code);
        assert!(parse(r#","isCustomCode":true"#).is_custom_code);
        assert!(!parse(r#","customCode":"""#).is_custom_code);
        assert!(!parse("").is_custom_code);
    }

    #[test]
    fn missing_click_history_defaults_to_empty() {
        let json = r#"{
            "id": "1",
            "originalUrl": "https://example.com",
            "shortCode": "abc123",
            "createdAt": "2024-01-01T00:00:00Z",
            "expiresAt": "2024-01-01T00:30:00Z"
        }"#;
        let r: LinkRecord = serde_json::from_str(json).unwrap();
        assert!(r.click_events.is_empty());
        assert_eq!(r.click_count, 0);
        assert!(!r.is_custom_code);
        assert!(r.clicks_consistent());
    }
}
