//! Core types and traits for the Linklet URL shortener.
//!
//! This crate provides the link record model, the validated [`ShortCode`],
//! the error types, the [`Clock`] abstraction and the key-value persistence
//! contract shared by the generator, storage and shortener crates.

pub mod backend;
pub mod clock;
pub mod error;
pub mod link;
pub mod shortcode;

pub use backend::KeyValueBackend;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Field, FieldError, InvalidShortCode, ShortenerError, StorageError, ValidationErrors};
pub use link::{ClickEvent, LinkRecord, DIRECT_SOURCE, UNKNOWN_LOCATION};
pub use shortcode::ShortCode;
