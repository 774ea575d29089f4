//! # secport-schema: Field Checking for Snapshot Documents
//!
//! Snapshot documents arrive as untyped nested maps (YAML, or JSON read into
//! the same value model). This crate turns one such map into typed values
//! according to a [`FieldMap`]: which fields exist, what kind each one is,
//! and what happens when it is absent.
//!
//! ## Field Checking (`checker`)
//!
//! - [`FieldMap::coerce`]: checks a raw map and returns [`CheckedFields`],
//!   or a [`SchemaError`] naming the offending field.
//! - [`CheckedFields`]: typed accessors (`take_string`, `take_time`, ...)
//!   over the coerced values.
//!
//! ## Document Loading (`document`)
//!
//! - [`load_document`]: reads a YAML or JSON file into a `serde_yaml::Value`,
//!   choosing the parser from the file extension.
//!
//! ## Crate Policy
//!
//! - The checker never mutates its input.
//! - Keys present in the input but absent from the field map are ignored.

pub mod checker;
pub mod document;
pub mod field;

pub use checker::{describe, CheckedFields, SchemaError};
pub use document::{load_document, parse_json, parse_yaml, DocumentError};
pub use field::{FieldDefault, FieldKind, FieldMap, FieldValue};
