//! # Field Specifications
//!
//! A [`FieldMap`] pairs each field name with the [`FieldKind`] its raw value
//! must coerce to and, optionally, a [`FieldDefault`] applied when the field
//! is absent. A field with no default is required.

use std::collections::BTreeMap;
use std::fmt;

use secport_core::Timestamp;
use serde_yaml::Value;

/// The kind a raw value must coerce to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A string.
    String,
    /// A signed integer, or a decimal string holding one (no surrounding
    /// whitespace).
    Int,
    /// A boolean, or a string such as `true`, `t`, `1`, `FALSE`.
    Bool,
    /// An RFC 3339 timestamp string, normalized to UTC.
    Time,
    /// A sequence of arbitrary values.
    List,
    /// A mapping with scalar keys and arbitrary values.
    Map,
    /// A mapping with scalar keys and scalar values, all rendered as strings.
    StringMap,
    /// Any value, passed through unchecked.
    Any,
}

impl FieldKind {
    /// Name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Bool => "bool",
            Self::Time => "time",
            Self::List => "list",
            Self::Map => "map",
            Self::StringMap => "string map",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A coerced, typed field value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Coerced from [`FieldKind::String`].
    String(String),
    /// Coerced from [`FieldKind::Int`].
    Int(i64),
    /// Coerced from [`FieldKind::Bool`].
    Bool(bool),
    /// Coerced from [`FieldKind::Time`].
    Time(Timestamp),
    /// Coerced from [`FieldKind::List`].
    List(Vec<Value>),
    /// Coerced from [`FieldKind::Map`]; keys rendered as strings.
    Map(BTreeMap<String, Value>),
    /// Coerced from [`FieldKind::StringMap`].
    StringMap(BTreeMap<String, String>),
    /// Coerced from [`FieldKind::Any`].
    Any(Value),
}

/// What the checker does when a field is absent from the input.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    /// Leave the field out of the checked result.
    Omit,
    /// Use this value.
    Value(FieldValue),
}

/// One entry of a [`FieldMap`].
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    /// Key in the raw map.
    pub name: &'static str,
    /// Expected kind.
    pub kind: FieldKind,
    /// Applied when absent; `None` means the field is required.
    pub default: Option<FieldDefault>,
}

/// A field specification with defaults.
///
/// ```
/// use secport_schema::{FieldDefault, FieldKind, FieldMap};
///
/// let fields = FieldMap::new()
///     .required("scope", FieldKind::String)
///     .optional("label", FieldKind::String, FieldDefault::Omit);
/// assert_eq!(fields.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMap {
    fields: Vec<Field>,
}

impl FieldMap {
    /// An empty field map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required field.
    pub fn required(mut self, name: &'static str, kind: FieldKind) -> Self {
        self.fields.push(Field {
            name,
            kind,
            default: None,
        });
        self
    }

    /// Add a field with a default applied when it is absent.
    pub fn optional(mut self, name: &'static str, kind: FieldKind, default: FieldDefault) -> Self {
        self.fields.push(Field {
            name,
            kind,
            default: Some(default),
        });
        self
    }

    /// The fields, in declaration order.
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no fields are declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
