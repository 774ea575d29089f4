//! # Normalize Subcommand
//!
//! Imports a snapshot and writes it back out in canonical form: UTC
//! timestamps, absent optionals dropped, ACL keys sorted, derived fields
//! omitted.

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::Args;
use secport_secrets::to_yaml_string;

use crate::config::CliConfig;
use crate::snapshot::{load_secrets, validate_all};

/// Arguments for the normalize subcommand.
#[derive(Args, Debug)]
pub struct NormalizeArgs {
    /// Snapshot document (YAML, or JSON with a `.json` extension).
    pub path: PathBuf,

    /// Write the result here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Schema version to write.
    #[arg(long, default_value_t = 1)]
    pub version: i64,
}

/// Execute the normalize subcommand.
pub fn run_normalize(args: &NormalizeArgs, config: &CliConfig) -> Result<u8> {
    let secrets = load_secrets(&args.path, config)?;
    if config.validate {
        validate_all(&secrets)?;
    }
    let yaml = to_yaml_string(&secrets, args.version).map_err(|e| anyhow!("{e}"))?;

    match &args.out {
        Some(out) => {
            std::fs::write(out, &yaml)
                .with_context(|| format!("failed to write {}", out.display()))?;
            tracing::info!(out = %out.display(), count = secrets.len(), "wrote snapshot");
        }
        None => print!("{yaml}"),
    }
    Ok(0)
}
