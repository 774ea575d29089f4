//! Integration tests: import whole snapshot documents through the public API
//! and check positional errors, derived fields and export round trips.

use std::collections::BTreeMap;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use secport_core::{Tag, Timestamp};
use secport_schema::SchemaError;
use secport_secrets::{
    export_secrets, import_secrets, AccessArgs, ConsumerArgs, EntityKind, FieldRole, ImportError,
    ImporterRegistry, RevisionArgs, Secret, SecretArgs, ValidationError,
};
use serde_yaml::Value;

fn yaml(s: &str) -> Value {
    serde_yaml::from_str(s).unwrap()
}

const SNAPSHOT: &str = r#"
version: 1
secrets:
  - id: 9m4e2mr0ui3e8a215n4g
    secret-version: 3
    description: database credentials
    label: db
    rotate-policy: monthly
    owner: application-mysql
    create-time: 2026-01-01T00:00:00Z
    update-time: 2026-02-01T10:00:00+05:00
    next-rotate-time: 2026-03-01T00:00:00Z
    acl:
      unit-wordpress-0:
        scope: relation-wordpress.db#mysql.server
        role: view
      application-mysql:
        scope: model-deadbeef-0bad-400d-8000-4b1d0d06f00d
        role: manage
    revisions:
      - number: 1
        create-time: 2026-01-01T00:00:00Z
        update-time: 2026-01-01T00:00:00Z
        obsolete: true
        expire-time: 2026-12-01T00:00:00Z
        backend-id: vault-1
      - number: 3
        create-time: 2026-01-10T00:00:00Z
        update-time: 2026-01-10T00:00:00Z
        content:
          password: s3cret
      - number: 2
        create-time: 2026-01-05T00:00:00Z
        update-time: 2026-01-05T00:00:00Z
        expire-time: 2026-06-01T00:00:00Z
    consumers:
      - consumer: unit-wordpress-0
        label: wp-db
        current-revision: 1
      - consumer: unit-wordpress-1
        current-revision: 2
  - id: cbt2v8ne8bdkeo3g0ji0
    secret-version: 1
    description: ''
    label: ''
    owner: ''
    create-time: 2026-01-01T00:00:00Z
    update-time: 2026-01-01T00:00:00Z
    acl: {}
    revisions: []
"#;

#[test]
fn test_import_snapshot() {
    let secrets = import_secrets(&yaml(SNAPSHOT)).unwrap();
    assert_eq!(secrets.len(), 2);

    let first = &secrets[0];
    assert_eq!(first.id(), "9m4e2mr0ui3e8a215n4g");
    assert_eq!(first.version(), 3);
    assert_eq!(first.rotate_policy(), Some("monthly"));
    assert_eq!(first.owner().unwrap(), Some(Tag::application("mysql").unwrap()));
    assert_eq!(first.updated(), Timestamp::parse("2026-02-01T05:00:00Z").unwrap());
    assert_eq!(first.acl().len(), 2);
    assert_eq!(first.acl()["unit-wordpress-0"].role(), "view");

    // Derived fields: max number, expiry of the last revision by position.
    assert_eq!(first.latest_revision(), 3);
    assert_eq!(
        first.latest_expire_time(),
        Some(Timestamp::parse("2026-06-01T00:00:00Z").unwrap())
    );
    assert!(first.consumers().iter().all(|c| c.latest_revision() == 3));
    assert_eq!(first.consumers()[1].label(), "");

    let second = &secrets[1];
    assert_eq!(second.owner().unwrap(), None);
    assert_eq!(second.latest_revision(), 0);
    assert_eq!(second.latest_expire_time(), None);
    assert!(second.consumers().is_empty());

    for secret in &secrets {
        secret.validate().unwrap();
    }
}

#[test]
fn test_revision_order_preserved() {
    let secrets = import_secrets(&yaml(SNAPSHOT)).unwrap();
    let numbers: Vec<i64> = secrets[0].revisions().iter().map(|r| r.number()).collect();
    assert_eq!(numbers, vec![1, 3, 2]);
    assert_eq!(secrets[0].revisions()[0].backend_id(), Some("vault-1"));
    assert!(secrets[0].revisions()[0].obsolete());
    assert_eq!(secrets[0].revisions()[1].content().unwrap()["password"], "s3cret");
}

#[test]
fn test_export_round_trip() {
    let secrets = import_secrets(&yaml(SNAPSHOT)).unwrap();
    let exported = export_secrets(&secrets, 1).unwrap();
    let reimported = import_secrets(&exported).unwrap();
    assert_eq!(reimported, secrets);
}

#[test]
fn test_unsupported_version_returns_nothing() {
    let source = SNAPSHOT.replacen("version: 1", "version: 2", 1);
    let err = import_secrets(&yaml(&source)).unwrap_err();
    assert_eq!(
        err,
        ImportError::UnsupportedVersion {
            entity: EntityKind::Secrets,
            version: 2
        }
    );
}

#[test]
fn test_custom_registry_without_v1() {
    let registry = ImporterRegistry::standard().retain_versions(&[]);
    let err = registry.import_secrets(&yaml(SNAPSHOT)).unwrap_err();
    assert!(matches!(err, ImportError::UnsupportedVersion { version: 1, .. }));
}

#[test]
fn test_missing_field_names_position() {
    let mut doc = yaml(SNAPSHOT);
    let list = doc["secrets"].as_sequence_mut().unwrap();
    let mut third = list[1].clone();
    third.as_mapping_mut().unwrap().remove("owner");
    list.push(third);

    let err = import_secrets(&doc).unwrap_err();
    assert_eq!(err.positions(), vec![(EntityKind::Secret, 2)]);
    match err.innermost() {
        ImportError::Schema {
            entity: EntityKind::Secret,
            version: 1,
            source: SchemaError::Missing { field, .. },
        } => assert_eq!(field, "owner"),
        other => panic!("expected missing owner, got: {other}"),
    }
    assert_eq!(
        err.to_string(),
        "secret 2: secret v1 schema check failed: owner: expected string, got nothing"
    );
}

#[test]
fn test_nested_revision_error_positions() {
    let source = SNAPSHOT.replacen("      - number: 3\n", "      - number: three\n", 1);
    let err = import_secrets(&yaml(&source)).unwrap_err();
    assert_eq!(
        err.positions(),
        vec![(EntityKind::Secret, 0), (EntityKind::Revision, 1)]
    );
    assert!(err.to_string().starts_with("secret 0: revision 1: revision v1 schema check failed"));
}

#[test]
fn test_nested_consumer_error_positions() {
    let source = SNAPSHOT.replacen("        current-revision: 2\n", "", 1);
    let err = import_secrets(&yaml(&source)).unwrap_err();
    assert_eq!(
        err.positions(),
        vec![(EntityKind::Secret, 0), (EntityKind::Consumer, 1)]
    );
}

#[test]
fn test_first_failure_wins() {
    let source = SNAPSHOT
        .replacen("    secret-version: 3\n", "    secret-version: x\n", 1)
        .replacen("    secret-version: 1\n", "    secret-version: y\n", 1);
    let err = import_secrets(&yaml(&source)).unwrap_err();
    assert_eq!(err.positions(), vec![(EntityKind::Secret, 0)]);
}

#[test]
fn test_validate_rejects_bad_owner() {
    let source = SNAPSHOT.replacen("    owner: ''\n", "    owner: 'not-a-valid-tag!!'\n", 1);
    let secrets = import_secrets(&yaml(&source)).unwrap();
    let err = secrets[1].validate().unwrap_err();
    assert!(matches!(
        err,
        ValidationError::InvalidTag {
            role: FieldRole::Owner,
            ..
        }
    ));
    assert!(secrets[1].owner().is_err());
}

#[test]
fn test_empty_rotate_policy_is_absent() {
    let source = SNAPSHOT.replacen("    rotate-policy: monthly\n", "    rotate-policy: ''\n", 1);
    let secrets = import_secrets(&yaml(&source)).unwrap();
    assert_eq!(secrets[0].rotate_policy(), None);

    let exported = export_secrets(&secrets, 1).unwrap();
    assert!(exported["secrets"][0].get("rotate-policy").is_none());
}

#[test]
fn test_non_map_secret_names_position() {
    let mut doc = yaml(SNAPSHOT);
    doc["secrets"].as_sequence_mut().unwrap().push(Value::Number(serde_yaml::Number::from(42i64)));

    let err = import_secrets(&doc).unwrap_err();
    assert_eq!(err.positions(), vec![(EntityKind::Secret, 2)]);
    assert_eq!(err.to_string(), "unexpected value for secret 2, int(42)");
}

#[test]
fn test_non_map_revision_names_position() {
    let source = SNAPSHOT.replacen("    revisions: []\n", "    revisions: [7]\n", 1);
    let err = import_secrets(&yaml(&source)).unwrap_err();
    assert_eq!(
        err.positions(),
        vec![(EntityKind::Secret, 1), (EntityKind::Revision, 0)]
    );
}

#[test]
fn test_validate_rejects_bad_consumer() {
    let source = SNAPSHOT.replacen(
        "      - consumer: unit-wordpress-1\n",
        "      - consumer: 'bogus!!'\n",
        1,
    );
    let secrets = import_secrets(&yaml(&source)).unwrap();
    assert!(secrets[0].consumers()[1].consumer().is_err());

    let err = secrets[0].validate().unwrap_err();
    assert!(matches!(
        err,
        ValidationError::InvalidTag {
            role: FieldRole::Consumer,
            ..
        }
    ));
    assert!(err.to_string().contains("invalid consumer"));
}

fn ts(secs: i64) -> Timestamp {
    Timestamp::from(Utc.timestamp_opt(secs, 0).single().unwrap())
}

fn revision_strategy() -> impl Strategy<Value = RevisionArgs> {
    (
        -3i64..50,
        1_700_000_000i64..1_900_000_000,
        any::<bool>(),
        proptest::option::of(1_700_000_000i64..1_900_000_000),
        proptest::option::of("([a-z]{1,8}-[0-9]{1,3})?"),
        proptest::option::of(proptest::collection::btree_map("[a-z]{1,6}", "[a-zA-Z0-9]{0,10}", 0..3)),
    )
        .prop_map(|(number, created, obsolete, expire, backend_id, content)| RevisionArgs {
            number,
            created: ts(created),
            updated: ts(created + 60),
            obsolete,
            expire_time: expire.map(ts),
            backend_id,
            content,
        })
}

fn secret_with(revisions: Vec<RevisionArgs>, consumers: usize) -> Secret {
    let mut acl = BTreeMap::new();
    acl.insert(
        "unit-wordpress-0".to_string(),
        AccessArgs {
            scope: "model".to_string(),
            role: "view".to_string(),
        },
    );
    Secret::new(SecretArgs {
        id: "9m4e2mr0ui3e8a215n4g".to_string(),
        version: 1,
        description: String::new(),
        label: String::new(),
        rotate_policy: None,
        owner: None,
        created: ts(1_700_000_000),
        updated: ts(1_700_000_000),
        next_rotate_time: None,
        acl,
        revisions,
        consumers: (0..consumers)
            .map(|i| ConsumerArgs {
                consumer: Some(Tag::unit(&format!("app/{i}")).unwrap()),
                label: String::new(),
                current_revision: i as i64,
            })
            .collect(),
    })
}

proptest! {
    #[test]
    fn prop_derived_fields(revisions in proptest::collection::vec(revision_strategy(), 0..6), consumers in 0usize..4) {
        let expected_latest = revisions.iter().map(|r| r.number).fold(0, i64::max);
        let expected_expire = revisions.last().and_then(|r| r.expire_time);
        let secret = secret_with(revisions, consumers);

        prop_assert_eq!(secret.latest_revision(), expected_latest);
        prop_assert_eq!(secret.latest_expire_time(), expected_expire);
        prop_assert!(secret.consumers().iter().all(|c| c.latest_revision() == expected_latest));
    }

    #[test]
    fn prop_export_import_round_trip(revisions in proptest::collection::vec(revision_strategy(), 0..6), consumers in 0usize..3) {
        let secret = secret_with(revisions, consumers);
        let exported = export_secrets(std::slice::from_ref(&secret), 1).unwrap();
        let reimported = import_secrets(&exported).unwrap();
        prop_assert_eq!(reimported, vec![secret]);
    }
}
