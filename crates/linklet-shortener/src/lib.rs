//! Short-code lifecycle management.
//!
//! This crate provides the [`LinkService`] that creates, resolves and
//! deletes links over a [`LinkStore`](linklet_storage::LinkStore), the pure
//! [`lifecycle`] operations it is built from, the event sink seam,
//! cancelable delayed redirects and collection statistics. Core types are
//! re-exported from `linklet_core`.

pub mod events;
pub mod lifecycle;
pub mod redirect;
pub mod service;
pub mod settings;
pub mod stats;

pub use events::{EventSink, LinkEvent, MemoryEventSink, TracingEventSink};
pub use lifecycle::CreateLink;
pub use linklet_core::{ClickEvent, LinkRecord, ShortCode, ShortenerError};
pub use redirect::{PendingRedirect, RedirectOutcome};
pub use service::LinkService;
pub use settings::ShortenerSettings;
pub use stats::LinkStats;
