//! # Importer Registry
//!
//! Maps schema versions to the importers that understand them. One registry
//! holds four tables:
//!
//! | table       | version → |
//! |-------------|-----------|
//! | secrets     | secret-level [`FieldMap`] |
//! | access      | [`Importer<AccessEntry>`] |
//! | consumers   | [`Importer<Consumer>`] |
//! | revisions   | [`Importer<Revision>`] |
//!
//! A registry is built explicitly and never changes afterwards. Tests and
//! tools that need a custom version set build their own with
//! [`ImporterRegistry::builder`]; [`ImporterRegistry::standard`] holds every
//! built-in version.
//!
//! ## Thread Safety
//!
//! Importers are `Send + Sync` and held behind `Arc`, so a registry can be
//! cloned cheaply and shared across threads.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use secport_schema::FieldMap;
use serde_yaml::Value;

use crate::access::AccessEntry;
use crate::consumer::Consumer;
use crate::error::{EntityKind, ImportError};
use crate::revision::Revision;
use crate::v1;

/// Builds one entity of type `T` from a raw map.
pub trait Importer<T>: Send + Sync {
    /// Import one element.
    fn import(&self, source: &Value) -> Result<T, ImportError>;
}

impl<T, F> Importer<T> for F
where
    F: Fn(&Value) -> Result<T, ImportError> + Send + Sync,
{
    fn import(&self, source: &Value) -> Result<T, ImportError> {
        self(source)
    }
}

/// Produces the secret-level field map for one version.
pub type SecretFieldsFn = fn() -> FieldMap;

/// Version dispatch tables for every entity kind.
#[derive(Clone, Default)]
pub struct ImporterRegistry {
    secrets: BTreeMap<u32, SecretFieldsFn>,
    access: BTreeMap<u32, Arc<dyn Importer<AccessEntry>>>,
    consumers: BTreeMap<u32, Arc<dyn Importer<Consumer>>>,
    revisions: BTreeMap<u32, Arc<dyn Importer<Revision>>>,
}

impl ImporterRegistry {
    /// Start an empty registry.
    pub fn builder() -> ImporterRegistryBuilder {
        ImporterRegistryBuilder::default()
    }

    /// Registry with every built-in schema version.
    pub fn standard() -> Self {
        Self::builder()
            .secret(1, v1::secret_fields)
            .access(1, v1::import_access)
            .consumer(1, v1::import_consumer)
            .revision(1, v1::import_revision)
            .build()
    }

    /// A copy keeping only the listed versions.
    pub fn retain_versions(&self, versions: &[u32]) -> Self {
        let keep = |v: &u32| versions.contains(v);
        Self {
            secrets: filter(&self.secrets, keep),
            access: filter(&self.access, keep),
            consumers: filter(&self.consumers, keep),
            revisions: filter(&self.revisions, keep),
        }
    }

    /// Versions with a registered secret importer, ascending.
    pub fn versions(&self) -> Vec<u32> {
        self.secrets.keys().copied().collect()
    }

    /// Whether `version` has a registered secret importer.
    pub fn supports(&self, version: i64) -> bool {
        u32::try_from(version).is_ok_and(|v| self.secrets.contains_key(&v))
    }

    pub(crate) fn secret_fields(&self, version: u32) -> Result<FieldMap, ImportError> {
        self.secrets
            .get(&version)
            .map(|fields| fields())
            .ok_or_else(|| unsupported(EntityKind::Secret, version))
    }

    pub(crate) fn access_importer(
        &self,
        version: u32,
    ) -> Result<&dyn Importer<AccessEntry>, ImportError> {
        lookup(&self.access, EntityKind::Access, version)
    }

    pub(crate) fn consumer_importer(
        &self,
        version: u32,
    ) -> Result<&dyn Importer<Consumer>, ImportError> {
        lookup(&self.consumers, EntityKind::Consumer, version)
    }

    pub(crate) fn revision_importer(
        &self,
        version: u32,
    ) -> Result<&dyn Importer<Revision>, ImportError> {
        lookup(&self.revisions, EntityKind::Revision, version)
    }
}

impl fmt::Debug for ImporterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImporterRegistry")
            .field("secrets", &self.secrets.keys().collect::<Vec<_>>())
            .field("access", &self.access.keys().collect::<Vec<_>>())
            .field("consumers", &self.consumers.keys().collect::<Vec<_>>())
            .field("revisions", &self.revisions.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`ImporterRegistry`].
#[derive(Default)]
pub struct ImporterRegistryBuilder {
    registry: ImporterRegistry,
}

impl ImporterRegistryBuilder {
    /// Register the secret-level field map for `version`.
    pub fn secret(mut self, version: u32, fields: SecretFieldsFn) -> Self {
        self.registry.secrets.insert(version, fields);
        self
    }

    /// Register the ACL entry importer for `version`.
    pub fn access(mut self, version: u32, importer: impl Importer<AccessEntry> + 'static) -> Self {
        self.registry.access.insert(version, Arc::new(importer));
        self
    }

    /// Register the consumer importer for `version`.
    pub fn consumer(mut self, version: u32, importer: impl Importer<Consumer> + 'static) -> Self {
        self.registry.consumers.insert(version, Arc::new(importer));
        self
    }

    /// Register the revision importer for `version`.
    pub fn revision(mut self, version: u32, importer: impl Importer<Revision> + 'static) -> Self {
        self.registry.revisions.insert(version, Arc::new(importer));
        self
    }

    pub fn build(self) -> ImporterRegistry {
        self.registry
    }
}

fn unsupported(entity: EntityKind, version: u32) -> ImportError {
    ImportError::UnsupportedVersion {
        entity,
        version: i64::from(version),
    }
}

fn lookup<'a, T: ?Sized>(
    table: &'a BTreeMap<u32, Arc<T>>,
    entity: EntityKind,
    version: u32,
) -> Result<&'a T, ImportError> {
    table
        .get(&version)
        .map(|importer| importer.as_ref())
        .ok_or_else(|| unsupported(entity, version))
}

fn filter<V: Clone>(table: &BTreeMap<u32, V>, keep: impl Fn(&u32) -> bool) -> BTreeMap<u32, V> {
    table
        .iter()
        .filter(|(version, _)| keep(version))
        .map(|(version, value)| (*version, value.clone()))
        .collect()
}
