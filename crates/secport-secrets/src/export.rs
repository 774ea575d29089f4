//! # Snapshot Export
//!
//! Renders secrets back into the version 1 document shape, so that
//! importing the output yields equal secrets.
//!
//! - Optional fields that are `None` are left out, never written as `null`.
//! - `obsolete` is written only when `true`.
//! - Derived fields (`latest_revision`, `latest_expire_time`, the consumer
//!   snapshot) are never written; import recomputes them.
//! - Timestamps are written as RFC 3339 in UTC.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_yaml::Value;

use crate::error::ExportError;
use crate::secret::Secret;

/// Schema versions this crate can export.
pub const EXPORT_VERSIONS: &[i64] = &[1];

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct SecretsV1<'a> {
    version: i64,
    secrets: Vec<SecretV1<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct SecretV1<'a> {
    id: &'a str,
    secret_version: i64,
    description: &'a str,
    label: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    rotate_policy: Option<&'a str>,
    owner: &'a str,
    create_time: String,
    update_time: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    next_rotate_time: Option<String>,
    acl: BTreeMap<&'a str, AccessV1<'a>>,
    revisions: Vec<RevisionV1<'a>>,
    consumers: Vec<ConsumerV1<'a>>,
}

#[derive(Serialize)]
struct AccessV1<'a> {
    scope: &'a str,
    role: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct ConsumerV1<'a> {
    consumer: &'a str,
    label: &'a str,
    current_revision: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct RevisionV1<'a> {
    number: i64,
    create_time: String,
    update_time: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    obsolete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    expire_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    backend_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a BTreeMap<String, String>>,
}

impl<'a> From<&'a Secret> for SecretV1<'a> {
    fn from(secret: &'a Secret) -> Self {
        Self {
            id: secret.id(),
            secret_version: secret.version(),
            description: secret.description(),
            label: secret.label(),
            rotate_policy: secret.rotate_policy(),
            owner: secret.owner_str(),
            create_time: secret.created().to_rfc3339(),
            update_time: secret.updated().to_rfc3339(),
            next_rotate_time: secret.next_rotate_time().map(|t| t.to_rfc3339()),
            acl: secret
                .acl()
                .iter()
                .map(|(subject, access)| {
                    (
                        subject.as_str(),
                        AccessV1 {
                            scope: access.scope(),
                            role: access.role(),
                        },
                    )
                })
                .collect(),
            revisions: secret
                .revisions()
                .iter()
                .map(|rev| RevisionV1 {
                    number: rev.number(),
                    create_time: rev.created().to_rfc3339(),
                    update_time: rev.updated().to_rfc3339(),
                    obsolete: rev.obsolete(),
                    expire_time: rev.expire_time().map(|t| t.to_rfc3339()),
                    backend_id: rev.backend_id(),
                    content: rev.content(),
                })
                .collect(),
            consumers: secret
                .consumers()
                .iter()
                .map(|c| ConsumerV1 {
                    consumer: c.consumer_str(),
                    label: c.label(),
                    current_revision: c.current_revision(),
                })
                .collect(),
        }
    }
}

/// Render `secrets` as a `{version, secrets}` document for schema `version`.
///
/// # Errors
///
/// [`ExportError::UnsupportedVersion`] for any version other than 1.
pub fn export_secrets(secrets: &[Secret], version: i64) -> Result<Value, ExportError> {
    if !EXPORT_VERSIONS.contains(&version) {
        return Err(ExportError::UnsupportedVersion { version });
    }
    let document = SecretsV1 {
        version,
        secrets: secrets.iter().map(SecretV1::from).collect(),
    };
    tracing::debug!(version, count = secrets.len(), "exporting secrets");
    Ok(serde_yaml::to_value(document)?)
}

/// [`export_secrets`] rendered as a YAML string.
pub fn to_yaml_string(secrets: &[Secret], version: i64) -> Result<String, ExportError> {
    let document = export_secrets(secrets, version)?;
    Ok(serde_yaml::to_string(&document)?)
}

#[cfg(test)]
mod tests {
    use secport_core::{Tag, Timestamp};

    use super::*;
    use crate::consumer::ConsumerArgs;
    use crate::revision::RevisionArgs;
    use crate::secret::SecretArgs;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn secret() -> Secret {
        Secret::new(SecretArgs {
            id: "9m4e2mr0ui3e8a215n4g".to_string(),
            version: 2,
            description: "db".to_string(),
            label: String::new(),
            rotate_policy: None,
            owner: Some(Tag::parse("application-mysql").unwrap()),
            created: ts("2026-01-01T00:00:00Z"),
            updated: ts("2026-01-01T00:00:00Z"),
            next_rotate_time: None,
            acl: BTreeMap::new(),
            revisions: vec![RevisionArgs {
                number: 1,
                created: ts("2026-01-01T00:00:00Z"),
                updated: ts("2026-01-01T00:00:00Z"),
                obsolete: false,
                expire_time: None,
                backend_id: None,
                content: None,
            }],
            consumers: vec![ConsumerArgs::default()],
        })
    }

    #[test]
    fn test_omits_absent_optionals() {
        let doc = export_secrets(&[secret()], 1).unwrap();
        let s = &doc["secrets"][0];
        assert!(s.get("rotate-policy").is_none());
        assert!(s.get("next-rotate-time").is_none());
        let rev = &s["revisions"][0];
        assert!(rev.get("obsolete").is_none());
        assert!(rev.get("expire-time").is_none());
        assert!(rev.get("backend-id").is_none());
        assert!(rev.get("content").is_none());
    }

    #[test]
    fn test_consumer_label_always_written() {
        let doc = export_secrets(&[secret()], 1).unwrap();
        let consumer = &doc["secrets"][0]["consumers"][0];
        assert_eq!(consumer["label"].as_str(), Some(""));
        assert_eq!(consumer["consumer"].as_str(), Some(""));
        assert!(consumer.get("latest-revision").is_none());
    }

    #[test]
    fn test_times_are_utc_strings() {
        let doc = export_secrets(&[secret()], 1).unwrap();
        assert_eq!(
            doc["secrets"][0]["create-time"].as_str(),
            Some("2026-01-01T00:00:00Z")
        );
    }

    #[test]
    fn test_unsupported_version() {
        let err = export_secrets(&[], 2).unwrap_err();
        assert!(matches!(err, ExportError::UnsupportedVersion { version: 2 }));
    }

    #[test]
    fn test_yaml_string_starts_with_version() {
        let yaml = to_yaml_string(&[], 1).unwrap();
        assert!(yaml.starts_with("version: 1"));
    }
}
