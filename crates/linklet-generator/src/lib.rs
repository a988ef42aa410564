//! Short code generation and validation.
//!
//! [`Generator`] produces candidate codes; [`allocate_code`] turns a
//! requested custom code or a stream of generated candidates into a code
//! that is free within an existing collection.

pub mod allocate;
pub mod random;

pub use allocate::{allocate_code, check_custom_code, is_code_unique, is_valid_custom_code};
pub use random::RandomGenerator;

use linklet_core::ShortCode;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage;
/// uniqueness against existing links is enforced by [`allocate_code`].
pub trait Generator: Send + Sync + 'static {
    /// Generates a candidate short code.
    fn generate(&self) -> ShortCode;
}
