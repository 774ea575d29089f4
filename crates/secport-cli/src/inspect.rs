//! # Inspect Subcommand
//!
//! Imports a snapshot and prints one summary line (or JSON object) per
//! secret, including the derived fields.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use secport_secrets::Secret;
use serde::Serialize;

use crate::config::{CliConfig, OutputFormat};
use crate::snapshot::{load_secrets, validate_all};

/// Arguments for the inspect subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Snapshot document (YAML, or JSON with a `.json` extension).
    pub path: PathBuf,

    /// Report format; overrides the config file.
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Per-secret summary.
#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct SecretSummary {
    pub id: String,
    pub owner: String,
    pub revisions: usize,
    pub latest_revision: i64,
    pub latest_expire_time: Option<String>,
    pub consumers: usize,
    pub acl: usize,
}

impl From<&Secret> for SecretSummary {
    fn from(secret: &Secret) -> Self {
        Self {
            id: secret.id().to_string(),
            owner: secret.owner_str().to_string(),
            revisions: secret.revisions().len(),
            latest_revision: secret.latest_revision(),
            latest_expire_time: secret.latest_expire_time().map(|t| t.to_rfc3339()),
            consumers: secret.consumers().len(),
            acl: secret.acl().len(),
        }
    }
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs, config: &CliConfig) -> Result<u8> {
    let secrets = load_secrets(&args.path, config)?;
    if config.validate {
        validate_all(&secrets)?;
    }
    let format = args.format.unwrap_or(config.format);
    print!("{}", render(&secrets, format)?);
    Ok(0)
}

/// Render the summaries of `secrets` in `format`.
pub fn render(secrets: &[Secret], format: OutputFormat) -> Result<String> {
    let summaries: Vec<SecretSummary> = secrets.iter().map(SecretSummary::from).collect();
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&summaries)? + "\n"),
        OutputFormat::Text => {
            let mut out = String::new();
            for s in &summaries {
                let owner = if s.owner.is_empty() { "-" } else { &s.owner };
                let expiry = s.latest_expire_time.as_deref().unwrap_or("never");
                writeln!(
                    out,
                    "{}  owner={owner}  revisions={}  latest={}  expires={expiry}  consumers={}  acl={}",
                    s.id, s.revisions, s.latest_revision, s.consumers, s.acl
                )?;
            }
            writeln!(out, "{} secret(s)", summaries.len())?;
            Ok(out)
        }
    }
}
