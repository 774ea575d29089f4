//! # ACL Entries
//!
//! An access entry grants a subject a role within a scope. Entries have no
//! identity of their own: a secret's ACL stores them keyed by the subject's
//! tag string.

/// A single ACL entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessEntry {
    pub(crate) scope: String,
    pub(crate) role: String,
}

/// Arguments for [`AccessEntry::new`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessArgs {
    /// Targeting qualifier, e.g. a model or relation tag.
    pub scope: String,
    /// Permission level, e.g. `view` or `manage`.
    pub role: String,
}

impl AccessEntry {
    /// Build an entry from its arguments.
    pub fn new(args: AccessArgs) -> Self {
        Self {
            scope: args.scope,
            role: args.role,
        }
    }

    /// The scope the grant applies in.
    pub fn scope(&self) -> &str {
        &self.scope
    }

    /// The granted role.
    pub fn role(&self) -> &str {
        &self.role
    }
}
