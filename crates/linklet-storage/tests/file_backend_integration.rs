use jiff::{SignedDuration, Timestamp};
use linklet_core::{ClickEvent, KeyValueBackend, LinkRecord, ShortCode};
use linklet_storage::{FileBackend, LinkStore, StorageError, DEFAULT_STORAGE_KEY};
use tempfile::TempDir;

struct Fixture {
    _dir: TempDir,
    backend: FileBackend,
}

impl Fixture {
    fn start() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        let backend = FileBackend::new(dir.path().join("linklet"));
        Self { _dir: dir, backend }
    }

    fn store(&self) -> LinkStore<FileBackend> {
        LinkStore::with_default_key(self.backend.clone())
    }
}

fn record(code: &str, created_at: Timestamp) -> LinkRecord {
    LinkRecord {
        id: format!("id-{code}"),
        original_url: "https://example.com/a/long/path?q=1".to_string(),
        short_code: ShortCode::new(code).unwrap(),
        created_at,
        expires_at: created_at + SignedDuration::from_hours(2),
        is_custom_code: false,
        click_count: 1,
        click_events: vec![ClickEvent::new(
            created_at + SignedDuration::from_secs(5),
            None,
        )],
    }
}

#[tokio::test]
async fn collection_survives_a_new_store_instance() {
    let fixture = Fixture::start();
    let now = Timestamp::now();
    let records = vec![record("abc123", now), record("def456", now)];

    fixture.store().save(&records).await.unwrap();

    // A fresh store over the same directory sees the same collection.
    let reloaded = fixture.store().load().await.unwrap();
    assert_eq!(reloaded, records);
}

#[tokio::test]
async fn stored_file_is_a_json_array_with_iso_timestamps() {
    let fixture = Fixture::start();
    let created_at: Timestamp = "2024-03-01T12:00:00Z".parse().unwrap();

    fixture
        .store()
        .save(&[record("abc123", created_at)])
        .await
        .unwrap();

    let raw = fixture.backend.get(DEFAULT_STORAGE_KEY).await.unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(json.is_array());
    assert_eq!(json[0]["createdAt"], "2024-03-01T12:00:00Z");
    assert_eq!(json[0]["expiresAt"], "2024-03-01T14:00:00Z");
    assert_eq!(json[0]["clickData"][0]["source"], "Direct");
    assert_eq!(json[0]["clickData"][0]["location"], "Unknown");
}

#[tokio::test]
async fn later_save_replaces_earlier_one() {
    let fixture = Fixture::start();
    let store = fixture.store();
    let now = Timestamp::now();

    store.save(&[record("abc123", now)]).await.unwrap();
    store.save(&[record("zzz999", now)]).await.unwrap();

    let loaded = store.load().await.unwrap();
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].short_code, "zzz999");
}

#[tokio::test]
async fn corrupted_file_is_reported_not_panicked() {
    let fixture = Fixture::start();
    fixture
        .backend
        .set(DEFAULT_STORAGE_KEY, "[{\"id\": 1")
        .await
        .unwrap();

    let err = fixture.store().load().await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidData(_)));
}

#[tokio::test]
async fn clear_then_load_is_empty() {
    let fixture = Fixture::start();
    let store = fixture.store();
    store.save(&[record("abc123", Timestamp::now())]).await.unwrap();

    store.clear().await.unwrap();
    store.clear().await.unwrap();

    assert!(store.load().await.unwrap().is_empty());
}
