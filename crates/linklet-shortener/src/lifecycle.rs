//! State transitions applied to link records.
//!
//! Everything here is a pure function over a collection snapshot and an
//! explicit `now`; loading, saving and event emission live in
//! [`LinkService`](crate::LinkService).
//!
//! A link is `Active` until `now > expires_at`, then `Expired` for good.
//! Either state can be deleted, which is terminal.

use jiff::{SignedDuration, Timestamp};
use linklet_core::{ClickEvent, Field, LinkRecord, ShortenerError, ValidationErrors};
use linklet_generator::{allocate_code, check_custom_code, Generator};
use serde::Serialize;
use url::Url;
use uuid::Uuid;

pub const MIN_VALIDITY_MINUTES: i64 = 1;
pub const MAX_VALIDITY_MINUTES: i64 = 10_080;
pub const DEFAULT_VALIDITY_MINUTES: i64 = 30;

pub const URL_REQUIRED_MESSAGE: &str = "URL is required";
pub const URL_INVALID_MESSAGE: &str = "Please enter a valid URL";
pub const VALIDITY_RANGE_MESSAGE: &str = "Validity must be between 1 and 10080 minutes (1 week)";

/// Input for creating a link, as submitted by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLink {
    pub url: String,
    /// Requested code. `None` and `Some("")` both mean "generate one".
    pub custom_code: Option<String>,
    pub validity_minutes: i64,
}

impl CreateLink {
    /// A request with a generated code and the default validity.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            custom_code: None,
            validity_minutes: DEFAULT_VALIDITY_MINUTES,
        }
    }

    pub fn with_custom_code(mut self, code: impl Into<String>) -> Self {
        self.custom_code = Some(code.into());
        self
    }

    pub fn with_validity_minutes(mut self, minutes: i64) -> Self {
        self.validity_minutes = minutes;
        self
    }

    fn requested_code(&self) -> Option<&str> {
        self.custom_code.as_deref().filter(|c| !c.is_empty())
    }
}

/// Runs every creation check and collects all failures.
pub fn validate_create(
    request: &CreateLink,
    existing: &[LinkRecord],
    max_links: usize,
) -> ValidationErrors {
    let mut errors = ValidationErrors::new();

    if request.url.is_empty() {
        errors.set(Field::Url, URL_REQUIRED_MESSAGE);
    } else if Url::parse(&request.url).is_err() {
        errors.set(Field::Url, URL_INVALID_MESSAGE);
    }

    if let Some(code) = request.requested_code() {
        check_custom_code(code, existing, &mut errors);
    }

    if !(MIN_VALIDITY_MINUTES..=MAX_VALIDITY_MINUTES).contains(&request.validity_minutes) {
        errors.set(Field::ValidityMinutes, VALIDITY_RANGE_MESSAGE);
    }

    if existing.len() >= max_links {
        errors.set(
            Field::General,
            format!("Maximum of {max_links} URLs can be shortened concurrently"),
        );
    }

    errors
}

/// Builds a new record for `request`, or returns every validation failure.
///
/// `existing` is not modified; the caller appends the record and persists.
pub fn create_link<G: Generator + ?Sized>(
    request: &CreateLink,
    existing: &[LinkRecord],
    generator: &G,
    now: Timestamp,
    max_links: usize,
) -> Result<LinkRecord, ValidationErrors> {
    validate_create(request, existing, max_links).into_result()?;

    let custom_code = request.requested_code();
    let short_code = allocate_code(generator, custom_code, existing)?;

    Ok(LinkRecord {
        id: Uuid::new_v4().to_string(),
        original_url: request.url.clone(),
        short_code,
        created_at: now,
        expires_at: now + SignedDuration::from_mins(request.validity_minutes),
        is_custom_code: custom_code.is_some(),
        click_count: 0,
        click_events: Vec::new(),
    })
}

/// Finds the record for `code` and checks it may still be followed.
///
/// Returns the record's index in `existing`. An expired record is returned
/// inside [`ShortenerError::Expired`] so it can still be displayed.
pub fn resolve_link(
    code: &str,
    existing: &[LinkRecord],
    now: Timestamp,
) -> Result<usize, ShortenerError> {
    let index = existing
        .iter()
        .position(|record| record.short_code == code)
        .ok_or_else(|| ShortenerError::NotFound(code.to_string()))?;

    let record = &existing[index];
    if is_expired(record, now) {
        return Err(ShortenerError::Expired(Box::new(record.clone())));
    }

    Ok(index)
}

/// Returns a copy of `record` with one more click recorded at `now`.
pub fn record_click(record: &LinkRecord, source: Option<&str>, now: Timestamp) -> LinkRecord {
    let mut updated = record.clone();
    updated.click_events.push(ClickEvent::new(now, source));
    updated.click_count += 1;
    updated
}

/// Returns `existing` without the record whose id is `id`.
///
/// Deleting an unknown id returns the collection unchanged.
pub fn delete_link(id: &str, existing: &[LinkRecord]) -> Vec<LinkRecord> {
    existing
        .iter()
        .filter(|record| record.id != id)
        .cloned()
        .collect()
}

pub fn is_expired(record: &LinkRecord, now: Timestamp) -> bool {
    record.is_expired(now)
}
