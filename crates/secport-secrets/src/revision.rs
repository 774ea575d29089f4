//! # Secret Revisions
//!
//! A revision is one value of a secret over time. Three of its fields are
//! optional and their absence is meaningful:
//!
//! - `backend_id`: `None` means the content is inline (or absent), while
//!   `Some("")` is an explicitly recorded empty backend id.
//! - `content`: `None` means no inline content; `Some` of an empty map is
//!   inline content with no keys.
//! - `expire_time`: `None` means the revision never expires.

use std::collections::BTreeMap;

use secport_core::Timestamp;

/// One revision of a secret.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub(crate) number: i64,
    pub(crate) created: Timestamp,
    pub(crate) updated: Timestamp,
    pub(crate) obsolete: bool,
    pub(crate) expire_time: Option<Timestamp>,
    pub(crate) backend_id: Option<String>,
    pub(crate) content: Option<BTreeMap<String, String>>,
}

/// Arguments for [`Revision::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionArgs {
    pub number: i64,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub obsolete: bool,
    pub expire_time: Option<Timestamp>,
    pub backend_id: Option<String>,
    pub content: Option<BTreeMap<String, String>>,
}

impl Revision {
    /// Build a revision from its arguments.
    pub fn new(args: RevisionArgs) -> Self {
        Self {
            number: args.number,
            created: args.created,
            updated: args.updated,
            obsolete: args.obsolete,
            expire_time: args.expire_time,
            backend_id: args.backend_id,
            content: args.content,
        }
    }

    pub fn number(&self) -> i64 {
        self.number
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn updated(&self) -> Timestamp {
        self.updated
    }

    /// Whether the revision is no longer referenced by any consumer.
    pub fn obsolete(&self) -> bool {
        self.obsolete
    }

    pub fn expire_time(&self) -> Option<Timestamp> {
        self.expire_time
    }

    /// Id of the external backend holding the content, if recorded.
    pub fn backend_id(&self) -> Option<&str> {
        self.backend_id.as_deref()
    }

    /// Inline content, if any.
    pub fn content(&self) -> Option<&BTreeMap<String, String>> {
        self.content.as_ref()
    }
}
