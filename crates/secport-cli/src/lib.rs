//! # secport-cli: Snapshot Command-Line Interface
//!
//! ## Subcommands
//!
//! - `inspect`: per-secret summary, including derived fields
//! - `validate`: import and validate every secret
//! - `normalize`: re-export a snapshot in canonical version-1 form
//!
//! ## Crate Policy
//!
//! - Argument parsing is separated from the handlers.
//! - Handlers delegate to `secport-secrets`; no import logic lives here.

pub mod config;
pub mod inspect;
pub mod normalize;
pub mod snapshot;
pub mod validate;
