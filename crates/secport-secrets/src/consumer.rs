//! # Consumer Bindings
//!
//! A consumer records which revision of a secret a principal has observed.
//! Its `latest_revision` is a snapshot copied from the owning secret each
//! time the secret recomputes its derived fields; it is never read from or
//! written to a snapshot document.

use secport_core::{FormatError, Tag};

/// A principal consuming a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consumer {
    pub(crate) consumer: String,
    pub(crate) label: String,
    pub(crate) current_revision: i64,
    pub(crate) latest_revision: i64,
}

/// Arguments for [`Consumer::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsumerArgs {
    /// The consuming principal; `None` leaves it unset.
    pub consumer: Option<Tag>,
    /// Consumer-local label for the secret.
    pub label: String,
    /// Revision the consumer is currently tracking.
    pub current_revision: i64,
}

impl Consumer {
    /// Build a consumer from its arguments. `latest_revision` starts at 0
    /// until the owning secret recomputes it.
    pub fn new(args: ConsumerArgs) -> Self {
        Self {
            consumer: args.consumer.map(|tag| tag.to_string()).unwrap_or_default(),
            label: args.label,
            current_revision: args.current_revision,
            latest_revision: 0,
        }
    }

    /// Decode the consumer tag; `Ok(None)` when unset.
    pub fn consumer(&self) -> Result<Option<Tag>, FormatError> {
        if self.consumer.is_empty() {
            return Ok(None);
        }
        Tag::parse(&self.consumer).map(Some)
    }

    /// The consumer tag in string form, empty when unset.
    pub fn consumer_str(&self) -> &str {
        &self.consumer
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn current_revision(&self) -> i64 {
        self.current_revision
    }

    /// The owning secret's latest revision as of its last recomputation.
    pub fn latest_revision(&self) -> i64 {
        self.latest_revision
    }
}
