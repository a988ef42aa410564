use crate::Generator;
use linklet_core::{Field, LinkRecord, ShortCode, ValidationErrors};
use tracing::{debug, trace};

pub const CUSTOM_CODE_FORMAT_MESSAGE: &str =
    "Custom code must be 3-20 characters (letters, numbers, _, -)";
pub const CUSTOM_CODE_TAKEN_MESSAGE: &str = "This custom code is already taken";

/// Returns `true` if `code` is an acceptable custom code.
///
/// The empty string means "no custom code requested" and is accepted.
pub fn is_valid_custom_code(code: &str) -> bool {
    code.is_empty() || ShortCode::is_valid(code)
}

/// Returns `true` if no record in `existing` uses `code`.
pub fn is_code_unique(code: &str, existing: &[LinkRecord]) -> bool {
    !existing.iter().any(|record| record.short_code == code)
}

/// Reports format and uniqueness problems with a requested custom code.
///
/// Both checks run; when both fail the uniqueness message replaces the format
/// message for the field.
pub fn check_custom_code(code: &str, existing: &[LinkRecord], errors: &mut ValidationErrors) {
    if code.is_empty() {
        return;
    }
    if !is_valid_custom_code(code) {
        errors.set(Field::CustomCode, CUSTOM_CODE_FORMAT_MESSAGE);
    }
    if !is_code_unique(code, existing) {
        errors.set(Field::CustomCode, CUSTOM_CODE_TAKEN_MESSAGE);
    }
}

/// Picks the short code for a new link.
///
/// A non-empty `custom_code` is validated and returned verbatim. Otherwise
/// codes are drawn from `generator` until one is not used by `existing`.
pub fn allocate_code<G: Generator + ?Sized>(
    generator: &G,
    custom_code: Option<&str>,
    existing: &[LinkRecord],
) -> Result<ShortCode, ValidationErrors> {
    if let Some(code) = custom_code.filter(|c| !c.is_empty()) {
        let mut errors = ValidationErrors::new();
        check_custom_code(code, existing, &mut errors);
        errors.into_result()?;
        return Ok(ShortCode::new_unchecked(code));
    }

    // Unbounded on purpose: 62^6 candidates against at most a few live links.
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        let candidate = generator.generate();
        if is_code_unique(candidate.as_str(), existing) {
            debug!(code = %candidate, attempts, "allocated short code");
            return Ok(candidate);
        }
        trace!(code = %candidate, attempts, "generated code collides, retrying");
    }
}
