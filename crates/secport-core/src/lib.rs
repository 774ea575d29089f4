//! # secport-core: Foundational Types
//!
//! Leaf crate of the secport workspace. Defines the primitives every other
//! crate builds on:
//!
//! - [`Timestamp`]: UTC-normalized instants. Any offset supplied by a caller
//!   is converted at construction; nothing downstream ever sees local time.
//! - [`Tag`]: principal tags (`application-mysql`, `unit-mysql-0`,
//!   `model-<uuid>`, ...) with validated parsing and a canonical string form.
//! - [`SecretId`]: globally unique secret identifiers in xid encoding.
//! - [`FormatError`]: raised when a string fails one of the parsers above.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `secport-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod error;
pub mod identity;
pub mod tag;
pub mod temporal;

pub use error::FormatError;
pub use identity::SecretId;
pub use tag::{Tag, TagKind};
pub use temporal::Timestamp;
