//! # Collection & Secret Import
//!
//! Entry points that turn a raw snapshot document into [`Secret`]s:
//!
//! ```text
//! import_secrets(envelope)
//!   └─ envelope check {version, secrets}
//!   └─ version lookup ──────────────── UnsupportedVersion
//!   └─ for each element i:             Positional(secret, i)
//!        import_secret(element, version)
//!          ├─ secret field check ────── Schema(secret, v)
//!          ├─ acl[subject]  → access importer     Subject(subject)
//!          ├─ revisions[j]  → revision importer   Positional(revision, j)
//!          ├─ consumers[k]  → consumer importer   Positional(consumer, k)
//!          └─ recompute derived fields (once)
//! ```
//!
//! Import is all-or-nothing: the first failure anywhere in the tree aborts
//! the whole call and no partial results are returned.

use std::collections::BTreeMap;

use secport_schema::{describe, FieldKind, FieldMap, SchemaError};
use serde_yaml::Value;

use crate::access::AccessEntry;
use crate::error::{EntityKind, ImportError};
use crate::registry::{Importer, ImporterRegistry};
use crate::secret::{Secret, SecretParts};

fn envelope_fields() -> FieldMap {
    FieldMap::new()
        .required("version", FieldKind::Int)
        .required("secrets", FieldKind::List)
}

impl ImporterRegistry {
    /// Import a versioned collection `{version, secrets}`.
    ///
    /// # Errors
    ///
    /// - [`ImportError::Envelope`] if the envelope itself is malformed.
    /// - [`ImportError::UnsupportedVersion`] if `version` is not registered.
    /// - [`ImportError::Positional`] wrapping the first element failure.
    pub fn import_secrets(&self, source: &Value) -> Result<Vec<Secret>, ImportError> {
        let envelope = |source: SchemaError| ImportError::Envelope { source };
        let mut valid = envelope_fields().coerce(source).map_err(envelope)?;
        let version = valid.take_int("version").map_err(envelope)?;
        let secrets = valid.take_list("secrets").map_err(envelope)?;
        self.import_secret_list(&secrets, version)
    }

    /// Import a list of raw secrets that all use schema `version`.
    pub fn import_secret_list(
        &self,
        source: &[Value],
        version: i64,
    ) -> Result<Vec<Secret>, ImportError> {
        let schema_version = self.resolve(EntityKind::Secrets, version)?;
        tracing::debug!(version, count = source.len(), "importing secrets");

        let importer = |element: &Value| self.import_versioned(element, schema_version);
        let secrets = import_list(source, EntityKind::Secret, &importer)?;

        tracing::debug!(version, count = secrets.len(), "imported secrets");
        Ok(secrets)
    }

    /// Import one raw secret using schema `version`.
    pub fn import_secret(&self, source: &Value, version: i64) -> Result<Secret, ImportError> {
        let schema_version = self.resolve(EntityKind::Secret, version)?;
        self.import_versioned(source, schema_version)
    }

    fn resolve(&self, entity: EntityKind, version: i64) -> Result<u32, ImportError> {
        u32::try_from(version)
            .ok()
            .filter(|v| self.supports(i64::from(*v)))
            .ok_or(ImportError::UnsupportedVersion { entity, version })
    }

    fn import_versioned(&self, source: &Value, version: u32) -> Result<Secret, ImportError> {
        let fields = self.secret_fields(version)?;
        let access_importer = self.access_importer(version)?;
        let revision_importer = self.revision_importer(version)?;
        let consumer_importer = self.consumer_importer(version)?;

        let err = |source: SchemaError| ImportError::Schema {
            entity: EntityKind::Secret,
            version,
            source,
        };
        let mut valid = fields.coerce(source).map_err(err)?;

        let id = valid.take_string("id").map_err(err)?;
        let secret_version = valid.take_int("secret-version").map_err(err)?;
        let description = valid.take_string("description").map_err(err)?;
        let label = valid.take_string("label").map_err(err)?;
        let rotate_policy = valid.take_opt_string("rotate-policy").map_err(err)?;
        let owner = valid.take_string("owner").map_err(err)?;
        let created = valid.take_time("create-time").map_err(err)?;
        let updated = valid.take_time("update-time").map_err(err)?;
        let next_rotate_time = valid.take_opt_time("next-rotate-time").map_err(err)?;
        let raw_acl = valid.take_map("acl").map_err(err)?;
        let raw_revisions = valid.take_list("revisions").map_err(err)?;
        let raw_consumers = valid.take_list("consumers").map_err(err)?;

        let acl = import_acl(raw_acl, access_importer)?;
        let revisions = import_list(&raw_revisions, EntityKind::Revision, revision_importer)?;
        let consumers = import_list(&raw_consumers, EntityKind::Consumer, consumer_importer)?;

        let secret = Secret::assemble(SecretParts {
            id,
            version: secret_version,
            description,
            label,
            rotate_policy,
            owner,
            created,
            updated,
            next_rotate_time,
            acl,
            revisions,
            consumers,
        });
        tracing::debug!(
            id = secret.id(),
            revisions = secret.revisions().len(),
            consumers = secret.consumers().len(),
            latest_revision = secret.latest_revision(),
            "imported secret"
        );
        Ok(secret)
    }
}

/// Import a collection of raw secrets with the built-in registry.
pub fn import_secrets(source: &Value) -> Result<Vec<Secret>, ImportError> {
    ImporterRegistry::standard().import_secrets(source)
}

fn import_list<T>(
    source: &[Value],
    entity: EntityKind,
    importer: &dyn Importer<T>,
) -> Result<Vec<T>, ImportError> {
    let mut result = Vec::with_capacity(source.len());
    for (index, value) in source.iter().enumerate() {
        if !is_map(value) {
            return Err(ImportError::UnexpectedValue {
                entity,
                index,
                found: describe(value),
            });
        }
        let item = importer.import(value).map_err(|e| e.at(entity, index))?;
        result.push(item);
    }
    Ok(result)
}

fn import_acl(
    source: BTreeMap<String, Value>,
    importer: &dyn Importer<AccessEntry>,
) -> Result<BTreeMap<String, AccessEntry>, ImportError> {
    let mut result = BTreeMap::new();
    for (subject, value) in source {
        if !is_map(&value) {
            return Err(ImportError::UnexpectedAccess {
                subject,
                found: describe(&value),
            });
        }
        let access = importer.import(&value).map_err(|e| e.for_subject(&subject))?;
        result.insert(subject, access);
    }
    Ok(result)
}

fn is_map(value: &Value) -> bool {
    match value {
        Value::Mapping(_) => true,
        Value::Tagged(tagged) => is_map(&tagged.value),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(s: &str) -> Value {
        serde_yaml::from_str(s).unwrap()
    }

    const SECRET: &str = "
id: 9m4e2mr0ui3e8a215n4g
secret-version: 1
description: ''
label: ''
owner: application-mysql
create-time: 2026-01-01T00:00:00Z
update-time: 2026-01-01T00:00:00Z
acl: {}
revisions: []
";

    #[test]
    fn test_envelope_missing_secrets() {
        let err = import_secrets(&yaml("version: 1\n")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "secrets version schema check failed: secrets: expected list, got nothing"
        );
    }

    #[test]
    fn test_envelope_not_a_map() {
        let err = import_secrets(&yaml("- 1\n")).unwrap_err();
        assert!(matches!(err, ImportError::Envelope { .. }));
    }

    #[test]
    fn test_non_map_element() {
        let err = import_secrets(&yaml("version: 1\nsecrets: [42]\n")).unwrap_err();
        assert_eq!(err.to_string(), "unexpected value for secret 0, int(42)");
    }

    #[test]
    fn test_non_map_acl_value() {
        let registry = ImporterRegistry::standard();
        let source = yaml(&SECRET.replace("acl: {}", "acl:\n  unit-wordpress-0: view"));
        let err = registry.import_secret(&source, 1).unwrap_err();
        assert_eq!(
            err,
            ImportError::UnexpectedAccess {
                subject: "unit-wordpress-0".to_string(),
                found: "string(\"view\")".to_string(),
            }
        );
    }

    #[test]
    fn test_bad_access_entry_names_subject() {
        let registry = ImporterRegistry::standard();
        let source = yaml(&SECRET.replace("acl: {}", "acl:\n  unit-wordpress-0:\n    role: view"));
        let err = registry.import_secret(&source, 1).unwrap_err();
        assert_eq!(
            err.to_string(),
            "access for unit-wordpress-0: access v1 schema check failed: scope: expected string, got nothing"
        );
    }

    #[test]
    fn test_import_secret_unknown_version() {
        let registry = ImporterRegistry::standard();
        let err = registry.import_secret(&yaml(SECRET), 9).unwrap_err();
        assert_eq!(
            err,
            ImportError::UnsupportedVersion {
                entity: EntityKind::Secret,
                version: 9
            }
        );
    }

    #[test]
    fn test_negative_version_unsupported() {
        let err = import_secrets(&yaml("version: -1\nsecrets: []\n")).unwrap_err();
        assert_eq!(err.to_string(), "secrets version -1 not supported");
    }

    #[test]
    fn test_consumers_default_empty() {
        let secret = ImporterRegistry::standard().import_secret(&yaml(SECRET), 1).unwrap();
        assert!(secret.consumers().is_empty());
        assert_eq!(secret.rotate_policy(), None);
        assert_eq!(secret.next_rotate_time(), None);
    }
}
