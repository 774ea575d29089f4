//! # secport-secrets: Versioned Secret Snapshots
//!
//! Turns a raw, versioned snapshot document into a tree of typed entities
//! and back:
//!
//! ```text
//! Secret
//!  ├─ acl:       subject tag → AccessEntry
//!  ├─ revisions: [Revision]   (ordered)
//!  └─ consumers: [Consumer]   (ordered)
//! ```
//!
//! ## Importing
//!
//! [`ImporterRegistry`] maps a schema version to the importers for each
//! entity kind. [`import_secrets`] uses the built-in registry; build a custom
//! one with [`ImporterRegistry::builder`] or narrow the built-in one with
//! [`ImporterRegistry::retain_versions`].
//!
//! Import fails as a whole on the first bad element, with an
//! [`ImportError`] that names its position (`secret 2: revision 0: ...`).
//!
//! ## Derived Fields
//!
//! [`Secret::latest_revision`], [`Secret::latest_expire_time`] and every
//! [`Consumer::latest_revision`] are recomputed whenever a secret is built
//! or its revisions or consumers are replaced. They are never read from or
//! written to documents.
//!
//! ## Validation and Export
//!
//! - [`Secret::validate`] checks ids and tags after import.
//! - [`export_secrets`] renders secrets in the version 1 shape.

pub mod access;
pub mod consumer;
pub mod error;
pub mod export;
pub mod import;
pub mod registry;
pub mod revision;
pub mod secret;
pub mod v1;
mod validate;

pub use access::{AccessArgs, AccessEntry};
pub use consumer::{Consumer, ConsumerArgs};
pub use error::{EntityKind, ExportError, FieldRole, ImportError, ValidationError};
pub use export::{export_secrets, to_yaml_string, EXPORT_VERSIONS};
pub use import::import_secrets;
pub use registry::{Importer, ImporterRegistry, ImporterRegistryBuilder, SecretFieldsFn};
pub use revision::{Revision, RevisionArgs};
pub use secret::{Secret, SecretArgs};
