//! # Field Checker
//!
//! Coerces one raw map against a [`FieldMap`].
//!
//! ## Rules
//!
//! - Absent field with no default: [`SchemaError::Missing`].
//! - Absent field with [`FieldDefault::Omit`]: left out of the result.
//! - Absent field with [`FieldDefault::Value`]: the default is used.
//! - An explicit `null` counts as absent when the field has a default, and
//!   as a type mismatch when it does not.
//! - YAML tags are ignored; the tagged inner value is checked.
//!
//! Errors carry the field path (`content.key` for values nested inside a
//! string map) and a short description of what was found.

use std::collections::BTreeMap;

use secport_core::Timestamp;
use serde_yaml::Value;
use thiserror::Error;

use crate::field::{FieldDefault, FieldKind, FieldMap, FieldValue};

/// A raw map failed the field check.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaError {
    /// The value being checked is not a map.
    #[error("expected map, got {found}")]
    NotAMap {
        /// Description of what was found instead.
        found: String,
    },

    /// A required field is absent.
    #[error("{field}: expected {expected}, got nothing")]
    Missing {
        /// Field path.
        field: String,
        /// Expected kind.
        expected: FieldKind,
    },

    /// A field is present with the wrong shape.
    #[error("{field}: expected {expected}, got {found}")]
    TypeMismatch {
        /// Field path.
        field: String,
        /// Expected kind.
        expected: FieldKind,
        /// Description of what was found instead.
        found: String,
    },

    /// A checked value was read back as a different kind than it was
    /// declared with, or was never declared.
    #[error("{field}: not checked as {requested}")]
    Unchecked {
        /// Field name.
        field: String,
        /// Kind the caller asked for.
        requested: FieldKind,
    },
}

impl FieldMap {
    /// Check `source` against this field map.
    ///
    /// # Errors
    ///
    /// Returns the first [`SchemaError`] encountered, in field declaration
    /// order.
    pub fn coerce(&self, source: &Value) -> Result<CheckedFields, SchemaError> {
        let map = match untag(source) {
            Value::Mapping(map) => map,
            other => {
                return Err(SchemaError::NotAMap {
                    found: describe(other),
                })
            }
        };

        let mut values = BTreeMap::new();
        for field in self.fields() {
            let raw = map
                .get(field.name)
                .map(untag)
                .filter(|v| !v.is_null() || field.default.is_none());
            let value = match (raw, &field.default) {
                (Some(raw), _) => coerce_value(field.name, field.kind, raw)?,
                (None, Some(FieldDefault::Omit)) => continue,
                (None, Some(FieldDefault::Value(default))) => default.clone(),
                (None, None) => {
                    return Err(SchemaError::Missing {
                        field: field.name.to_string(),
                        expected: field.kind,
                    })
                }
            };
            values.insert(field.name, value);
        }
        Ok(CheckedFields { values })
    }
}

/// The typed result of a successful field check.
///
/// Accessors remove the value they return, so each field is read once.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckedFields {
    values: BTreeMap<&'static str, FieldValue>,
}

macro_rules! take_accessors {
    ($take:ident, $take_opt:ident, $variant:ident, $kind:expr, $ty:ty) => {
        /// Take a field that is always present after checking.
        pub fn $take(&mut self, name: &str) -> Result<$ty, SchemaError> {
            self.$take_opt(name)?.ok_or_else(|| SchemaError::Missing {
                field: name.to_string(),
                expected: $kind,
            })
        }

        /// Take a field that may have been omitted.
        pub fn $take_opt(&mut self, name: &str) -> Result<Option<$ty>, SchemaError> {
            match self.values.remove(name) {
                None => Ok(None),
                Some(FieldValue::$variant(v)) => Ok(Some(v)),
                Some(_) => Err(SchemaError::Unchecked {
                    field: name.to_string(),
                    requested: $kind,
                }),
            }
        }
    };
}

impl CheckedFields {
    take_accessors!(take_string, take_opt_string, String, FieldKind::String, String);
    take_accessors!(take_int, take_opt_int, Int, FieldKind::Int, i64);
    take_accessors!(take_bool, take_opt_bool, Bool, FieldKind::Bool, bool);
    take_accessors!(take_time, take_opt_time, Time, FieldKind::Time, Timestamp);
    take_accessors!(take_list, take_opt_list, List, FieldKind::List, Vec<Value>);
    take_accessors!(take_map, take_opt_map, Map, FieldKind::Map, BTreeMap<String, Value>);
    take_accessors!(
        take_string_map,
        take_opt_string_map,
        StringMap,
        FieldKind::StringMap,
        BTreeMap<String, String>
    );
    take_accessors!(take_any, take_opt_any, Any, FieldKind::Any, Value);

    /// Whether a value is present for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

fn coerce_value(name: &str, kind: FieldKind, raw: &Value) -> Result<FieldValue, SchemaError> {
    let mismatch = || SchemaError::TypeMismatch {
        field: name.to_string(),
        expected: kind,
        found: describe(raw),
    };

    match kind {
        FieldKind::String => match raw {
            Value::String(s) => Ok(FieldValue::String(s.clone())),
            _ => Err(mismatch()),
        },
        FieldKind::Int => match raw {
            Value::Number(n) => n.as_i64().map(FieldValue::Int).ok_or_else(mismatch),
            Value::String(s) => s.parse().map(FieldValue::Int).map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        FieldKind::Bool => match raw {
            Value::Bool(b) => Ok(FieldValue::Bool(*b)),
            Value::String(s) => parse_bool(s).map(FieldValue::Bool).ok_or_else(mismatch),
            _ => Err(mismatch()),
        },
        FieldKind::Time => match raw {
            Value::String(s) => Timestamp::parse(s).map(FieldValue::Time).map_err(|_| mismatch()),
            _ => Err(mismatch()),
        },
        FieldKind::List => match raw {
            Value::Sequence(seq) => Ok(FieldValue::List(seq.clone())),
            _ => Err(mismatch()),
        },
        FieldKind::Map => match raw {
            Value::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    let key = scalar_to_string(untag(k)).ok_or_else(|| SchemaError::TypeMismatch {
                        field: format!("{name} key"),
                        expected: FieldKind::String,
                        found: describe(k),
                    })?;
                    out.insert(key, v.clone());
                }
                Ok(FieldValue::Map(out))
            }
            _ => Err(mismatch()),
        },
        FieldKind::StringMap => match raw {
            Value::Mapping(map) => {
                let mut out = BTreeMap::new();
                for (k, v) in map {
                    let key = scalar_to_string(untag(k)).ok_or_else(|| SchemaError::TypeMismatch {
                        field: format!("{name} key"),
                        expected: FieldKind::String,
                        found: describe(k),
                    })?;
                    let value = scalar_to_string(untag(v)).ok_or_else(|| SchemaError::TypeMismatch {
                        field: format!("{name}.{key}"),
                        expected: FieldKind::String,
                        found: describe(v),
                    })?;
                    out.insert(key, value);
                }
                Ok(FieldValue::StringMap(out))
            }
            _ => Err(mismatch()),
        },
        FieldKind::Any => Ok(FieldValue::Any(raw.clone())),
    }
}

// Same spellings as Go's strconv.ParseBool.
fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Short description of a raw value for error messages.
pub fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("bool({b})"),
        Value::Number(n) if n.is_f64() => format!("float({n})"),
        Value::Number(n) => format!("int({n})"),
        Value::String(s) => format!("string({s:?})"),
        Value::Sequence(seq) => format!("list(len {})", seq.len()),
        Value::Mapping(map) => format!("map(len {})", map.len()),
        Value::Tagged(tagged) => format!("tagged({})", tagged.tag),
    }
}
