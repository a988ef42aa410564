use crate::link::LinkRecord;
use serde::Serialize;
use std::fmt::Display;
use thiserror::Error;

/// Result type for link store and backend operations.
pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage i/o failed: {0}")]
    Io(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("invalid storage key: {0}")]
    InvalidKey(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid short code: {0}")]
pub struct InvalidShortCode(pub String);

/// The input a validation message refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Url,
    CustomCode,
    ValidityMinutes,
    /// Errors not tied to a single input, such as the link cap.
    General,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Url => "url",
            Field::CustomCode => "custom_code",
            Field::ValidityMinutes => "validity_minutes",
            Field::General => "general",
        }
    }
}

impl Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// Field-level validation failures, at most one message per field.
///
/// Order follows the order in which fields were first reported.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `message` for `field`, replacing an earlier message for the same field.
    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        let message = message.into();
        match self.0.iter_mut().find(|e| e.field == field) {
            Some(existing) => existing.message = message,
            None => self.0.push(FieldError { field, message }),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Returns `Ok(())` when nothing was reported, otherwise `Err(self)`.
    pub fn into_result(self) -> std::result::Result<(), Self> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", error.field, error.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Errors surfaced by the lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("URL not found: {0}")]
    NotFound(String),
    /// The link exists but its validity window has passed. The record is
    /// returned for display.
    #[error("this URL has expired: {}", .0.short_code)]
    Expired(Box<LinkRecord>),
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
