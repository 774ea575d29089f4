//! # Secrets
//!
//! A secret owns its ACL, its consumers and its ordered revisions, and
//! carries two derived fields:
//!
//! - `latest_revision`: the highest revision number, never below 0.
//! - `latest_expire_time`: the expiry of the **last** revision in sequence
//!   order. This is a position rule, not a maximum: a later revision with no
//!   expiry clears it even if an earlier one had one.
//!
//! Every consumer's `latest_revision` is overwritten with the secret's value
//! during the same step.
//!
//! An empty rotate policy is stored as `None`.
//!
//! ## Construction
//!
//! Fields are private. A `Secret` comes either from [`Secret::new`] or from
//! the importer, and both paths end in the same recomputation step, so the
//! derived fields can never be stale. Replacing revisions or consumers goes
//! through [`Secret::with_revisions`] / [`Secret::with_consumers`], which
//! recompute again.

use std::collections::BTreeMap;

use secport_core::{FormatError, Tag, Timestamp};

use crate::access::{AccessArgs, AccessEntry};
use crate::consumer::{Consumer, ConsumerArgs};
use crate::revision::{Revision, RevisionArgs};

/// A secret and everything it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Secret {
    id: String,
    version: i64,
    description: String,
    label: String,
    rotate_policy: Option<String>,
    owner: String,
    created: Timestamp,
    updated: Timestamp,
    next_rotate_time: Option<Timestamp>,
    acl: BTreeMap<String, AccessEntry>,
    revisions: Vec<Revision>,
    consumers: Vec<Consumer>,

    latest_revision: i64,
    latest_expire_time: Option<Timestamp>,
}

/// Arguments for [`Secret::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretArgs {
    pub id: String,
    pub version: i64,
    pub description: String,
    pub label: String,
    pub rotate_policy: Option<String>,
    /// Owning principal; `None` means the secret has no owner.
    pub owner: Option<Tag>,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub next_rotate_time: Option<Timestamp>,
    /// ACL keyed by subject tag string.
    pub acl: BTreeMap<String, AccessArgs>,
    pub revisions: Vec<RevisionArgs>,
    pub consumers: Vec<ConsumerArgs>,
}

/// Everything the importer decodes for one secret, before derived fields.
pub(crate) struct SecretParts {
    pub id: String,
    pub version: i64,
    pub description: String,
    pub label: String,
    pub rotate_policy: Option<String>,
    pub owner: String,
    pub created: Timestamp,
    pub updated: Timestamp,
    pub next_rotate_time: Option<Timestamp>,
    pub acl: BTreeMap<String, AccessEntry>,
    pub revisions: Vec<Revision>,
    pub consumers: Vec<Consumer>,
}

impl Secret {
    /// Build a secret from its arguments and compute its derived fields.
    pub fn new(args: SecretArgs) -> Self {
        Self::assemble(SecretParts {
            id: args.id,
            version: args.version,
            description: args.description,
            label: args.label,
            rotate_policy: args.rotate_policy,
            owner: args.owner.map(|tag| tag.to_string()).unwrap_or_default(),
            created: args.created,
            updated: args.updated,
            next_rotate_time: args.next_rotate_time,
            acl: args
                .acl
                .into_iter()
                .map(|(subject, access)| (subject, AccessEntry::new(access)))
                .collect(),
            revisions: args.revisions.into_iter().map(Revision::new).collect(),
            consumers: args.consumers.into_iter().map(Consumer::new).collect(),
        })
    }

    pub(crate) fn assemble(parts: SecretParts) -> Self {
        let mut secret = Self {
            id: parts.id,
            version: parts.version,
            description: parts.description,
            label: parts.label,
            rotate_policy: parts.rotate_policy.filter(|policy| !policy.is_empty()),
            owner: parts.owner,
            created: parts.created,
            updated: parts.updated,
            next_rotate_time: parts.next_rotate_time,
            acl: parts.acl,
            revisions: parts.revisions,
            consumers: parts.consumers,
            latest_revision: 0,
            latest_expire_time: None,
        };
        secret.update_computed_fields();
        secret
    }

    /// Replace the revisions and recompute derived fields.
    pub fn with_revisions(mut self, revisions: Vec<RevisionArgs>) -> Self {
        self.revisions = revisions.into_iter().map(Revision::new).collect();
        self.update_computed_fields();
        self
    }

    /// Replace the consumers and recompute derived fields.
    pub fn with_consumers(mut self, consumers: Vec<ConsumerArgs>) -> Self {
        self.consumers = consumers.into_iter().map(Consumer::new).collect();
        self.update_computed_fields();
        self
    }

    fn update_computed_fields(&mut self) {
        self.latest_expire_time = self.revisions.last().and_then(|rev| rev.expire_time);
        self.latest_revision = self
            .revisions
            .iter()
            .map(Revision::number)
            .fold(0, i64::max);
        for consumer in &mut self.consumers {
            consumer.latest_revision = self.latest_revision;
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// The secret's own version counter (`secret-version`), not the schema
    /// version of the document it was imported from.
    pub fn version(&self) -> i64 {
        self.version
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rotate_policy(&self) -> Option<&str> {
        self.rotate_policy.as_deref()
    }

    /// Decode the owner tag; `Ok(None)` when the secret has no owner.
    pub fn owner(&self) -> Result<Option<Tag>, FormatError> {
        if self.owner.is_empty() {
            return Ok(None);
        }
        Tag::parse(&self.owner).map(Some)
    }

    /// The owner in string form, empty when there is none.
    pub fn owner_str(&self) -> &str {
        &self.owner
    }

    pub fn created(&self) -> Timestamp {
        self.created
    }

    pub fn updated(&self) -> Timestamp {
        self.updated
    }

    pub fn next_rotate_time(&self) -> Option<Timestamp> {
        self.next_rotate_time
    }

    /// ACL entries keyed by subject tag string.
    pub fn acl(&self) -> &BTreeMap<String, AccessEntry> {
        &self.acl
    }

    /// Revisions in the order they were supplied.
    pub fn revisions(&self) -> &[Revision] {
        &self.revisions
    }

    pub fn consumers(&self) -> &[Consumer] {
        &self.consumers
    }

    pub fn latest_revision(&self) -> i64 {
        self.latest_revision
    }

    pub fn latest_expire_time(&self) -> Option<Timestamp> {
        self.latest_expire_time
    }
}
