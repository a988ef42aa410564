use jiff::Timestamp;
use linklet_core::LinkRecord;
use serde::Serialize;
use std::collections::HashMap;

/// Aggregate figures over the whole collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStats {
    pub total_links: usize,
    pub total_clicks: u64,
    pub active_links: usize,
    pub expired_links: usize,
}

impl LinkStats {
    pub fn compute(records: &[LinkRecord], now: Timestamp) -> Self {
        let active_links = records.iter().filter(|r| !r.is_expired(now)).count();
        Self {
            total_links: records.len(),
            total_clicks: records.iter().map(|r| r.click_count).sum(),
            active_links,
            expired_links: records.len() - active_links,
        }
    }
}

/// Human label for a validity window: minutes below an hour, whole hours
/// below a day, whole days beyond that.
pub fn validity_label(created_at: Timestamp, expires_at: Timestamp) -> String {
    let minutes = expires_at.duration_since(created_at).as_secs() / 60;
    if minutes < 60 {
        format!("{minutes} minutes")
    } else if minutes < 1440 {
        plural(minutes / 60, "hour")
    } else {
        plural(minutes / 1440, "day")
    }
}

fn plural(n: i64, unit: &str) -> String {
    if n > 1 {
        format!("{n} {unit}s")
    } else {
        format!("{n} {unit}")
    }
}

/// Click counts per source, busiest first, ties broken by source name.
pub fn clicks_by_source(record: &LinkRecord) -> Vec<(String, u64)> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for click in &record.click_events {
        *counts.entry(click.source.as_str()).or_default() += 1;
    }
    let mut sorted: Vec<_> = counts
        .into_iter()
        .map(|(source, n)| (source.to_string(), n))
        .collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::SignedDuration;
    use linklet_core::{ClickEvent, ShortCode};

    fn base() -> Timestamp {
        Timestamp::from_second(1_700_000_000).unwrap()
    }

    fn record(code: &str, validity_mins: i64, sources: &[Option<&str>]) -> LinkRecord {
        LinkRecord {
            id: code.to_string(),
            original_url: "https://example.com".to_string(),
            short_code: ShortCode::new(code).unwrap(),
            created_at: base(),
            expires_at: base() + SignedDuration::from_mins(validity_mins),
            is_custom_code: false,
            click_count: sources.len() as u64,
            click_events: sources.iter().map(|s| ClickEvent::new(base(), *s)).collect(),
        }
    }

    #[test]
    fn stats_split_active_and_expired() {
        let records = vec![
            record("short1", 10, &[None, None]),
            record("long01", 120, &[Some("a")]),
            record("long02", 600, &[]),
        ];
        let now = base() + SignedDuration::from_mins(60);

        let stats = LinkStats::compute(&records, now);

        assert_eq!(
            stats,
            LinkStats {
                total_links: 3,
                total_clicks: 3,
                active_links: 2,
                expired_links: 1,
            }
        );
    }

    #[test]
    fn link_at_expiry_instant_counts_as_active() {
        let records = vec![record("edge01", 10, &[])];
        let stats = LinkStats::compute(&records, base() + SignedDuration::from_mins(10));
        assert_eq!(stats.active_links, 1);
    }

    #[test]
    fn empty_collection() {
        assert_eq!(LinkStats::compute(&[], base()), LinkStats::default());
    }

    #[test]
    fn labels() {
        let label = |mins: i64| validity_label(base(), base() + SignedDuration::from_mins(mins));
        assert_eq!(label(1), "1 minutes");
        assert_eq!(label(30), "30 minutes");
        assert_eq!(label(60), "1 hour");
        assert_eq!(label(150), "2 hours");
        assert_eq!(label(1440), "1 day");
        assert_eq!(label(10_080), "7 days");
    }

    #[test]
    fn sources_sorted_by_count_then_name() {
        let r = record(
            "abc123",
            30,
            &[Some("b.example"), None, Some("a.example"), None, Some("b.example"), Some("a.example")],
        );
        assert_eq!(
            clicks_by_source(&r),
            vec![
                ("Direct".to_string(), 2),
                ("a.example".to_string(), 2),
                ("b.example".to_string(), 2),
            ]
        );

        let r = record("abc123", 30, &[None, Some("x"), None]);
        assert_eq!(
            clicks_by_source(&r),
            vec![("Direct".to_string(), 2), ("x".to_string(), 1)]
        );
    }
}
