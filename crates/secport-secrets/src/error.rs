//! # Error Types
//!
//! Three concerns, three enums:
//!
//! - [`ImportError`]: a raw document could not be turned into entities.
//!   Nested failures are wrapped with their position (`secret 2`,
//!   `revision 0`, `access for unit-mysql-0`) so the final message pinpoints
//!   the failing element, and every message carries the messages of the
//!   errors it wraps.
//! - [`ValidationError`]: a constructed secret failed semantic checks.
//! - [`ExportError`]: entities could not be rendered for a version.
//!
//! Nothing is retried: the transformation is deterministic, so the same
//! input always fails the same way.

use std::fmt;

use secport_core::FormatError;
use secport_schema::SchemaError;
use thiserror::Error;

/// The kind of entity an importer works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    /// The versioned collection envelope.
    Secrets,
    /// A single secret.
    Secret,
    /// An ACL entry.
    Access,
    /// A consumer binding.
    Consumer,
    /// A secret revision.
    Revision,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Secrets => "secrets",
            Self::Secret => "secret",
            Self::Access => "access",
            Self::Consumer => "consumer",
            Self::Revision => "revision",
        };
        f.write_str(s)
    }
}

/// A raw snapshot could not be imported.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// No importer is registered for the requested version.
    #[error("{entity} version {version} not supported")]
    UnsupportedVersion {
        /// Entity whose importer is missing.
        entity: EntityKind,
        /// Requested schema version.
        version: i64,
    },

    /// The collection envelope failed the field check.
    #[error("secrets version schema check failed: {source}")]
    Envelope {
        /// Field checker failure.
        #[source]
        source: SchemaError,
    },

    /// An element failed its per-version field check.
    #[error("{entity} v{version} schema check failed: {source}")]
    Schema {
        /// Entity being imported.
        entity: EntityKind,
        /// Schema version in use.
        version: u32,
        /// Field checker failure, naming the field.
        #[source]
        source: SchemaError,
    },

    /// A collection element is not a map.
    #[error("unexpected value for {entity} {index}, {found}")]
    UnexpectedValue {
        /// Entity the element should have been.
        entity: EntityKind,
        /// Zero-based position in its collection.
        index: usize,
        /// Description of what was found.
        found: String,
    },

    /// An ACL value is not a map.
    #[error("unexpected value for subject {subject}, {found}")]
    UnexpectedAccess {
        /// ACL key.
        subject: String,
        /// Description of what was found.
        found: String,
    },

    /// An element of a collection failed to import.
    #[error("{entity} {index}: {source}")]
    Positional {
        /// Entity the element represents.
        entity: EntityKind,
        /// Zero-based position in its collection.
        index: usize,
        /// The element's own failure.
        #[source]
        source: Box<ImportError>,
    },

    /// An ACL entry failed to import.
    #[error("access for {subject}: {source}")]
    Subject {
        /// ACL key the entry was stored under.
        subject: String,
        /// The entry's own failure.
        #[source]
        source: Box<ImportError>,
    },
}

impl ImportError {
    /// Wrap `self` with the position of the failing element.
    pub fn at(self, entity: EntityKind, index: usize) -> Self {
        Self::Positional {
            entity,
            index,
            source: Box::new(self),
        }
    }

    /// Wrap `self` with the ACL subject of the failing entry.
    pub fn for_subject(self, subject: impl Into<String>) -> Self {
        Self::Subject {
            subject: subject.into(),
            source: Box::new(self),
        }
    }

    /// The innermost error, after peeling off positional annotations.
    pub fn innermost(&self) -> &ImportError {
        match self {
            Self::Positional { source, .. } | Self::Subject { source, .. } => source.innermost(),
            other => other,
        }
    }

    /// Positions from the outermost collection inwards,
    /// e.g. `[(Secret, 2), (Revision, 0)]`. An element that is not a map
    /// contributes its own index last.
    pub fn positions(&self) -> Vec<(EntityKind, usize)> {
        let mut out = Vec::new();
        let mut current = self;
        loop {
            match current {
                Self::Positional {
                    entity,
                    index,
                    source,
                } => {
                    out.push((*entity, *index));
                    current = source.as_ref();
                }
                Self::Subject { source, .. } => current = source.as_ref(),
                Self::UnexpectedValue { entity, index, .. } => {
                    out.push((*entity, *index));
                    return out;
                }
                _ => return out,
            }
        }
    }
}

/// The field of a secret a format error was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRole {
    /// `owner`.
    Owner,
    /// An ACL key.
    AccessSubject,
    /// A consumer's `consumer` field.
    Consumer,
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Owner => "owner",
            Self::AccessSubject => "access entity",
            Self::Consumer => "consumer",
        };
        f.write_str(s)
    }
}

/// A constructed secret failed validation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// The secret has an empty id.
    #[error("secret missing id")]
    MissingId,

    /// The id is not a well-formed xid.
    #[error("secret ID {id:?} not valid: {source}")]
    InvalidId {
        /// The rejected id.
        id: String,
        /// Parser failure.
        #[source]
        source: FormatError,
    },

    /// A tag-valued field does not parse.
    #[error("secret {id:?} invalid {role}: {source}")]
    InvalidTag {
        /// Id of the secret being validated.
        id: String,
        /// Which field held the bad tag.
        role: FieldRole,
        /// Parser failure.
        #[source]
        source: FormatError,
    },
}

/// Entities could not be exported.
#[derive(Error, Debug)]
pub enum ExportError {
    /// No exporter exists for the requested version.
    #[error("secrets export version {version} not supported")]
    UnsupportedVersion {
        /// Requested schema version.
        version: i64,
    },

    /// YAML serialization failed.
    #[error("serialization error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
