//! # Validate Subcommand
//!
//! Imports a snapshot and validates every secret. Exits 0 when everything
//! passes; otherwise reports the first failure and exits 1.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::config::CliConfig;
use crate::snapshot::{load_secrets, validate_all};

/// Arguments for the validate subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Snapshot document (YAML, or JSON with a `.json` extension).
    pub path: PathBuf,
}

/// Execute the validate subcommand. Validation runs regardless of the
/// config's `validate` setting.
pub fn run_validate(args: &ValidateArgs, config: &CliConfig) -> Result<u8> {
    let secrets = load_secrets(&args.path, config)?;
    if let Err(e) = validate_all(&secrets) {
        println!("FAIL: {}: {e}", args.path.display());
        return Ok(1);
    }
    println!("OK: {} secret(s) valid in {}", secrets.len(), args.path.display());
    Ok(0)
}
