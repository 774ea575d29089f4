//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! accepted-versions: [1]   # default: every built-in version
//! validate: true           # run validation after import
//! format: text             # or json
//! ```
//!
//! Every key is optional. Unknown keys are rejected so that typos surface.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use secport_secrets::ImporterRegistry;
use serde::Deserialize;

/// Report format for commands that print summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Settings loaded from the `--config` file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct CliConfig {
    /// Schema versions to accept. `None` accepts every built-in version.
    pub accepted_versions: Option<Vec<u32>>,
    /// Run secret validation after import.
    pub validate: bool,
    /// Default report format.
    pub format: OutputFormat,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            accepted_versions: None,
            validate: true,
            format: OutputFormat::Text,
        }
    }
}

impl CliConfig {
    /// Load the config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("failed to parse config: {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    /// The importer registry these settings allow.
    pub fn registry(&self) -> ImporterRegistry {
        let standard = ImporterRegistry::standard();
        match &self.accepted_versions {
            Some(versions) => standard.retain_versions(versions),
            None => standard,
        }
    }
}
