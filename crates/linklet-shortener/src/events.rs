use crate::lifecycle::CreateLink;
use linklet_core::{ClickEvent, LinkRecord, ValidationErrors};
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::info;

pub const URL_SHORTENED: &str = "URL_SHORTENED";
pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
pub const URL_CLICKED: &str = "URL_CLICKED";
pub const REDIRECT_ERROR: &str = "REDIRECT_ERROR";
pub const URL_DELETED: &str = "URL_DELETED";
pub const URL_COPIED: &str = "URL_COPIED";

/// A structured record of something the service did.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkEvent {
    pub name: &'static str,
    pub payload: Value,
}

impl LinkEvent {
    pub fn shortened(record: &LinkRecord) -> Self {
        Self {
            name: URL_SHORTENED,
            payload: json!(record),
        }
    }

    pub fn validation_error(errors: &ValidationErrors, request: &CreateLink) -> Self {
        Self {
            name: VALIDATION_ERROR,
            payload: json!({ "errors": errors, "formData": request }),
        }
    }

    pub fn clicked(record: &LinkRecord, click: &ClickEvent) -> Self {
        Self {
            name: URL_CLICKED,
            payload: json!({
                "shortCode": record.short_code,
                "originalUrl": record.original_url,
                "clickData": click,
                "totalClicks": record.click_count,
            }),
        }
    }

    pub fn redirect_error(code: &str, error: &str, record: Option<&LinkRecord>) -> Self {
        let mut payload = json!({ "shortCode": code, "error": error });
        if let Some(record) = record {
            payload["url"] = json!(record);
        }
        Self {
            name: REDIRECT_ERROR,
            payload,
        }
    }

    pub fn deleted(record: Option<&LinkRecord>) -> Self {
        Self {
            name: URL_DELETED,
            payload: json!(record),
        }
    }

    pub fn copied(short_url: &str) -> Self {
        Self {
            name: URL_COPIED,
            payload: json!({ "shortUrl": short_url }),
        }
    }
}

/// Receives every [`LinkEvent`] the service emits.
///
/// Emission is fire-and-forget: sinks cannot report failure back to the
/// operation that produced the event.
pub trait EventSink: Send + Sync + 'static {
    fn emit(&self, event: &LinkEvent);
}

/// Logs events through `tracing` under the `linklet::events` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: &LinkEvent) {
        info!(
            target: "linklet::events",
            event = event.name,
            payload = %event.payload,
            "[URL_SHORTENER_LOG] {}",
            event.name
        );
    }
}

/// Keeps every emitted event in memory, in order.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<LinkEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<LinkEvent> {
        self.events.lock().clone()
    }

    /// Names of the emitted events, oldest first.
    pub fn names(&self) -> Vec<&'static str> {
        self.events.lock().iter().map(|e| e.name).collect()
    }

    pub fn last(&self) -> Option<LinkEvent> {
        self.events.lock().last().cloned()
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: &LinkEvent) {
        self.events.lock().push(event.clone());
    }
}
