use crate::error::InvalidShortCode;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A validated short code identifier for a shortened URL.
///
/// Short codes must be 3-20 characters long and contain only
/// alphanumeric characters, hyphens, or underscores.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ShortCode(String);

pub const MIN_LENGTH: usize = 3;
pub const MAX_LENGTH: usize = 20;

impl ShortCode {
    /// Creates a new `ShortCode` after validating the input.
    ///
    /// Valid codes are 3-20 characters and contain only `[a-zA-Z0-9_-]`.
    pub fn new(code: impl Into<String>) -> Result<Self, InvalidShortCode> {
        let code = code.into();
        Self::validate(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes produced by trusted internal sources
    /// (e.g. generators that are guaranteed to produce valid output).
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns `true` if `code` would be accepted by [`ShortCode::new`].
    pub fn is_valid(code: &str) -> bool {
        Self::validate(code).is_ok()
    }

    /// Generates the full shortened URL based on the provided base URL.
    pub fn to_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate(code: &str) -> Result<(), InvalidShortCode> {
        // Byte length equals char count once the charset check passes.
        if !code
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(InvalidShortCode(format!(
                "must contain only alphanumeric characters, hyphens, or underscores: '{}'",
                code
            )));
        }

        if code.len() < MIN_LENGTH || code.len() > MAX_LENGTH {
            return Err(InvalidShortCode(format!(
                "length must be between {} and {}, got {}",
                MIN_LENGTH,
                MAX_LENGTH,
                code.len()
            )));
        }

        Ok(())
    }
}

impl TryFrom<String> for ShortCode {
    type Error = InvalidShortCode;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ShortCode> for String {
    fn from(value: ShortCode) -> Self {
        value.0
    }
}

impl AsRef<str> for ShortCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ShortCode {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ShortCode {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
