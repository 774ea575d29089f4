//! Shared snapshot loading for the subcommands.

use std::path::Path;

use anyhow::{anyhow, Result};
use secport_schema::load_document;
use secport_secrets::Secret;

use crate::config::CliConfig;

/// Read, parse and import the snapshot at `path` with the configured
/// registry.
///
/// Library errors already carry their full cause in their message, so they
/// are flattened into one line prefixed with the path rather than chained.
pub fn load_secrets(path: &Path, config: &CliConfig) -> Result<Vec<Secret>> {
    let document = load_document(path).map_err(|e| anyhow!("{e}"))?;
    let secrets = config
        .registry()
        .import_secrets(&document)
        .map_err(|e| anyhow!("{}: {e}", path.display()))?;
    tracing::info!(path = %path.display(), count = secrets.len(), "imported snapshot");
    Ok(secrets)
}

/// Validate every secret, stopping at the first failure.
pub fn validate_all(secrets: &[Secret]) -> Result<()> {
    for secret in secrets {
        secret.validate().map_err(|e| anyhow!("{e}"))?;
    }
    Ok(())
}
