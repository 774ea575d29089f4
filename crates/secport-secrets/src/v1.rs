//! # Schema Version 1
//!
//! Field maps and importers for version 1 of the snapshot format.
//!
//! | entity   | required | optional (default) |
//! |----------|----------|--------------------|
//! | secret   | id, secret-version, description, label, owner, create-time, update-time, revisions, acl | rotate-policy (omit), next-rotate-time (omit), consumers (empty) |
//! | access   | scope, role | none |
//! | consumer | consumer, current-revision | label (omit) |
//! | revision | number, create-time, update-time | obsolete (false), expire-time (omit), backend-id (omit), content (omit) |

use secport_schema::{FieldDefault, FieldKind, FieldMap, FieldValue, SchemaError};
use serde_yaml::Value;

use crate::access::AccessEntry;
use crate::consumer::Consumer;
use crate::error::{EntityKind, ImportError};
use crate::revision::Revision;

const VERSION: u32 = 1;

/// Secret-level fields. Children (`acl`, `consumers`, `revisions`) are only
/// checked for shape here; their importers check their contents.
pub fn secret_fields() -> FieldMap {
    FieldMap::new()
        .required("id", FieldKind::String)
        .required("secret-version", FieldKind::Int)
        .required("description", FieldKind::String)
        .required("label", FieldKind::String)
        .optional("rotate-policy", FieldKind::String, FieldDefault::Omit)
        .required("owner", FieldKind::String)
        .required("create-time", FieldKind::Time)
        .required("update-time", FieldKind::Time)
        .optional("next-rotate-time", FieldKind::Time, FieldDefault::Omit)
        .required("revisions", FieldKind::List)
        .required("acl", FieldKind::Map)
        .optional(
            "consumers",
            FieldKind::List,
            FieldDefault::Value(FieldValue::List(Vec::new())),
        )
}

fn access_fields() -> FieldMap {
    FieldMap::new()
        .required("scope", FieldKind::String)
        .required("role", FieldKind::String)
}

fn consumer_fields() -> FieldMap {
    FieldMap::new()
        .required("consumer", FieldKind::String)
        .optional("label", FieldKind::String, FieldDefault::Omit)
        .required("current-revision", FieldKind::Int)
}

fn revision_fields() -> FieldMap {
    FieldMap::new()
        .required("number", FieldKind::Int)
        .required("create-time", FieldKind::Time)
        .required("update-time", FieldKind::Time)
        .optional(
            "obsolete",
            FieldKind::Bool,
            FieldDefault::Value(FieldValue::Bool(false)),
        )
        .optional("expire-time", FieldKind::Time, FieldDefault::Omit)
        .optional("backend-id", FieldKind::String, FieldDefault::Omit)
        .optional("content", FieldKind::StringMap, FieldDefault::Omit)
}

fn schema_error(entity: EntityKind) -> impl Fn(SchemaError) -> ImportError {
    move |source| ImportError::Schema {
        entity,
        version: VERSION,
        source,
    }
}

/// Import one ACL entry. The subject key is supplied by the caller.
pub fn import_access(source: &Value) -> Result<AccessEntry, ImportError> {
    let err = schema_error(EntityKind::Access);
    let mut valid = access_fields().coerce(source).map_err(&err)?;
    // From here the checked fields are known to have the right kinds.
    Ok(AccessEntry {
        scope: valid.take_string("scope").map_err(&err)?,
        role: valid.take_string("role").map_err(&err)?,
    })
}

/// Import one consumer. `latest_revision` is left at 0 for the owning
/// secret to fill in.
pub fn import_consumer(source: &Value) -> Result<Consumer, ImportError> {
    let err = schema_error(EntityKind::Consumer);
    let mut valid = consumer_fields().coerce(source).map_err(&err)?;
    Ok(Consumer {
        consumer: valid.take_string("consumer").map_err(&err)?,
        label: valid.take_opt_string("label").map_err(&err)?.unwrap_or_default(),
        current_revision: valid.take_int("current-revision").map_err(&err)?,
        latest_revision: 0,
    })
}

/// Import one revision.
pub fn import_revision(source: &Value) -> Result<Revision, ImportError> {
    let err = schema_error(EntityKind::Revision);
    let mut valid = revision_fields().coerce(source).map_err(&err)?;
    Ok(Revision {
        number: valid.take_int("number").map_err(&err)?,
        created: valid.take_time("create-time").map_err(&err)?,
        updated: valid.take_time("update-time").map_err(&err)?,
        obsolete: valid.take_bool("obsolete").map_err(&err)?,
        expire_time: valid.take_opt_time("expire-time").map_err(&err)?,
        backend_id: valid.take_opt_string("backend-id").map_err(&err)?,
        content: valid.take_opt_string_map("content").map_err(&err)?,
    })
}
