//! Persistence for the link collection.
//!
//! [`LinkStore`] serialises the whole collection under one key of a
//! [`KeyValueBackend`](linklet_core::KeyValueBackend). Two backends ship
//! here: [`InMemoryBackend`] and the directory-backed [`FileBackend`].

pub mod file;
pub mod memory;
pub mod store;

pub use file::FileBackend;
pub use linklet_core::error::{Result, StorageError};
pub use memory::InMemoryBackend;
pub use store::{LinkStore, DEFAULT_STORAGE_KEY};
