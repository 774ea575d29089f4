//! # Format Errors
//!
//! A string value failed domain-specific parsing: a malformed tag, a
//! malformed secret id, or an unparseable timestamp. Callers higher up wrap
//! these with the entity and field role they were decoding.

use thiserror::Error;

/// A string failed to parse as one of the core domain types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// The string is not of the form `<kind>-<id>` with a known kind.
    #[error("{value:?} is not a valid tag")]
    InvalidTag {
        /// The rejected input.
        value: String,
    },

    /// The kind prefix was recognised but the id part is malformed.
    #[error("{value:?} is not a valid {kind} tag")]
    InvalidTagId {
        /// Tag kind name, e.g. `unit`.
        kind: &'static str,
        /// The rejected input.
        value: String,
    },

    /// The string is not a well-formed secret id.
    #[error("invalid secret id {value:?}: {reason}")]
    InvalidId {
        /// The rejected input.
        value: String,
        /// What was wrong with it.
        reason: &'static str,
    },

    /// The string is not an RFC 3339 timestamp.
    #[error("invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp {
        /// The rejected input.
        value: String,
        /// Parser message.
        reason: String,
    },
}
