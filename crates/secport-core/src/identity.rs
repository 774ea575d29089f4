//! # Secret Identifiers
//!
//! Secrets are identified by xids: 12 bytes rendered as 20 characters of
//! lowercase base32hex (`0-9`, `a-v`). Twenty 5-bit characters carry 100
//! bits for a 96-bit payload, so the final character only ever encodes the
//! values 0 or 16, i.e. `0` or `g`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::FormatError;

/// Length of an encoded xid.
pub const SECRET_ID_LEN: usize = 20;

/// A validated secret identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretId(String);

impl SecretId {
    /// Validate an encoded xid.
    ///
    /// # Errors
    ///
    /// Returns [`FormatError::InvalidId`] for empty input, wrong length,
    /// characters outside the base32hex alphabet, or a non-canonical
    /// trailing character.
    pub fn parse(s: &str) -> Result<Self, FormatError> {
        let invalid = |reason| FormatError::InvalidId {
            value: s.to_string(),
            reason,
        };
        if s.is_empty() {
            return Err(invalid("empty"));
        }
        if s.len() != SECRET_ID_LEN {
            return Err(invalid("expected 20 characters"));
        }
        if !s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'v')) {
            return Err(invalid("invalid character"));
        }
        if !s.ends_with(['0', 'g']) {
            return Err(invalid("non-canonical encoding"));
        }
        Ok(Self(s.to_string()))
    }

    /// The encoded form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SecretId {
    type Error = FormatError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SecretId> for String {
    fn from(id: SecretId) -> Self {
        id.0
    }
}
