use crate::events::{EventSink, LinkEvent, TracingEventSink};
use crate::lifecycle::{self, CreateLink};
use crate::redirect::PendingRedirect;
use crate::settings::ShortenerSettings;
use crate::stats::LinkStats;
use linklet_core::{Clock, KeyValueBackend, LinkRecord, ShortenerError, StorageError};
use linklet_generator::Generator;
use linklet_storage::LinkStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

type Result<T> = std::result::Result<T, ShortenerError>;

/// The link lifecycle manager.
///
/// This service wraps a [`LinkStore`], a [`Generator`] and a [`Clock`] to
/// handle:
/// - link creation with collected validation errors
/// - resolution with click recording and expiry gating
/// - deletion and listing
///
/// The collection is loaded once and cached. Operations are serialised by a
/// single lock; each mutation saves the full collection and only replaces the
/// cached copy after the save succeeded. Clones share the same state.
pub struct LinkService<B, G, C> {
    store: Arc<LinkStore<B>>,
    generator: Arc<G>,
    clock: Arc<C>,
    sink: Arc<dyn EventSink>,
    settings: Arc<ShortenerSettings>,
    snapshot: Arc<Mutex<Option<Vec<LinkRecord>>>>,
}

impl<B, G, C> Clone for LinkService<B, G, C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            generator: Arc::clone(&self.generator),
            clock: Arc::clone(&self.clock),
            sink: Arc::clone(&self.sink),
            settings: Arc::clone(&self.settings),
            snapshot: Arc::clone(&self.snapshot),
        }
    }
}

impl<B: KeyValueBackend, G: Generator, C: Clock> LinkService<B, G, C> {
    /// Creates a service over `backend`, storing the collection under
    /// `settings.storage_key`. Events go to [`TracingEventSink`].
    pub fn new(backend: B, generator: G, clock: C, settings: ShortenerSettings) -> Self {
        let store = LinkStore::new(backend, settings.storage_key.clone());
        Self {
            store: Arc::new(store),
            generator: Arc::new(generator),
            clock: Arc::new(clock),
            sink: Arc::new(TracingEventSink),
            settings: Arc::new(settings),
            snapshot: Arc::new(Mutex::new(None)),
        }
    }

    /// Replaces the event sink.
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn settings(&self) -> &ShortenerSettings {
        &self.settings
    }

    pub fn store(&self) -> &LinkStore<B> {
        &self.store
    }

    /// Fills the cache from the store on first use.
    async fn loaded<'a>(
        &self,
        slot: &'a mut Option<Vec<LinkRecord>>,
    ) -> std::result::Result<&'a mut Vec<LinkRecord>, StorageError> {
        if slot.is_none() {
            *slot = Some(self.store.load().await?);
        }
        Ok(slot.get_or_insert_with(Vec::new))
    }

    /// Saves `next` and, on success, makes it the cached collection.
    async fn commit(&self, current: &mut Vec<LinkRecord>, next: Vec<LinkRecord>) -> Result<()> {
        self.store.save(&next).await?;
        *current = next;
        Ok(())
    }

    /// Creates a link and persists the collection.
    ///
    /// On validation failure every field error is returned and nothing is
    /// written.
    pub async fn shorten(&self, request: CreateLink) -> Result<LinkRecord> {
        let mut guard = self.snapshot.lock().await;
        let records = self.loaded(&mut guard).await?;

        let created = lifecycle::create_link(
            &request,
            records.as_slice(),
            self.generator.as_ref(),
            self.clock.now(),
            self.settings.max_links,
        );
        let record = match created {
            Ok(record) => record,
            Err(errors) => {
                debug!(errors = %errors, "link creation rejected");
                self.sink
                    .emit(&LinkEvent::validation_error(&errors, &request));
                return Err(errors.into());
            }
        };

        let mut next = records.clone();
        next.push(record.clone());
        self.commit(records, next).await?;

        info!(code = %record.short_code, url = %record.original_url, expires_at = %record.expires_at, "shortened url");
        self.sink.emit(&LinkEvent::shortened(&record));
        Ok(record)
    }

    /// Resolves `code`, recording a click from `source` when the link is
    /// still active.
    ///
    /// Returns the updated record; its `original_url` is the redirect
    /// target. An expired link yields [`ShortenerError::Expired`] and records
    /// nothing.
    pub async fn resolve(&self, code: &str, source: Option<&str>) -> Result<LinkRecord> {
        let result = self.resolve_and_record(code, source).await;
        if let Err(err) = &result {
            let (message, record) = match err {
                ShortenerError::NotFound(_) => ("URL not found".to_string(), None),
                ShortenerError::Expired(record) => ("URL expired".to_string(), Some(record.as_ref())),
                other => (other.to_string(), None),
            };
            debug!(code, error = %message, "redirect failed");
            self.sink
                .emit(&LinkEvent::redirect_error(code, &message, record));
        }
        result
    }

    async fn resolve_and_record(&self, code: &str, source: Option<&str>) -> Result<LinkRecord> {
        let mut guard = self.snapshot.lock().await;
        let records = self.loaded(&mut guard).await?;
        let now = self.clock.now();

        let index = lifecycle::resolve_link(code, records.as_slice(), now)?;
        let updated = lifecycle::record_click(&records[index], source, now);

        let mut next = records.clone();
        next[index] = updated.clone();
        self.commit(records, next).await?;

        if let Some(click) = updated.click_events.last() {
            self.sink.emit(&LinkEvent::clicked(&updated, click));
        }
        info!(code, clicks = updated.click_count, "recorded click");
        Ok(updated)
    }

    /// Schedules [`resolve`](Self::resolve) after the configured redirect
    /// delay. See [`PendingRedirect`] for cancellation.
    pub fn schedule_redirect(&self, code: &str, source: Option<&str>) -> PendingRedirect {
        self.schedule_redirect_after(code, source, self.settings.redirect_delay)
    }

    pub fn schedule_redirect_after(
        &self,
        code: &str,
        source: Option<&str>,
        delay: Duration,
    ) -> PendingRedirect {
        let service = self.clone();
        let code = code.to_string();
        let source = source.map(str::to_string);
        debug!(code = %code, delay_ms = delay.as_millis() as u64, "scheduling redirect");
        PendingRedirect::spawn(delay, async move {
            service.resolve(&code, source.as_deref()).await
        })
    }

    /// Deletes the link with `id` and persists the collection.
    ///
    /// Returns the removed record, or `None` if no link had that id.
    pub async fn delete(&self, id: &str) -> Result<Option<LinkRecord>> {
        let mut guard = self.snapshot.lock().await;
        let records = self.loaded(&mut guard).await?;

        let removed = records.iter().find(|r| r.id == id).cloned();
        let next = lifecycle::delete_link(id, records.as_slice());
        self.commit(records, next).await?;

        match &removed {
            Some(record) => info!(id, code = %record.short_code, "deleted url"),
            None => debug!(id, "delete of unknown id"),
        }
        self.sink.emit(&LinkEvent::deleted(removed.as_ref()));
        Ok(removed)
    }

    /// The whole collection in creation order.
    pub async fn list(&self) -> Result<Vec<LinkRecord>> {
        let mut guard = self.snapshot.lock().await;
        Ok(self.loaded(&mut guard).await?.clone())
    }

    pub async fn get_by_code(&self, code: &str) -> Result<Option<LinkRecord>> {
        let mut guard = self.snapshot.lock().await;
        let records = self.loaded(&mut guard).await?;
        Ok(records.iter().find(|r| r.short_code == code).cloned())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<LinkRecord>> {
        let mut guard = self.snapshot.lock().await;
        let records = self.loaded(&mut guard).await?;
        Ok(records.iter().find(|r| r.id == id).cloned())
    }

    pub async fn stats(&self) -> Result<LinkStats> {
        let mut guard = self.snapshot.lock().await;
        let records = self.loaded(&mut guard).await?;
        Ok(LinkStats::compute(records.as_slice(), self.clock.now()))
    }

    /// Drops the cached collection so the next operation reads the store.
    pub async fn reload(&self) -> Result<Vec<LinkRecord>> {
        let mut guard = self.snapshot.lock().await;
        *guard = None;
        Ok(self.loaded(&mut guard).await?.clone())
    }

    /// Removes the stored collection.
    pub async fn reset(&self) -> Result<()> {
        let mut guard = self.snapshot.lock().await;
        self.store.clear().await?;
        *guard = Some(Vec::new());
        warn!(key = %self.store.key(), "cleared all links");
        Ok(())
    }

    pub fn is_expired(&self, record: &LinkRecord) -> bool {
        lifecycle::is_expired(record, self.clock.now())
    }

    pub fn short_url(&self, record: &LinkRecord) -> String {
        record.short_url(&self.settings.base_url)
    }

    /// Records that the presentation layer copied a short URL.
    pub fn note_copied(&self, record: &LinkRecord) {
        self.sink.emit(&LinkEvent::copied(&self.short_url(record)));
    }
}
