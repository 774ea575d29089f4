//! # secport CLI entry point
//!
//! Parses command-line arguments, loads the optional config file and
//! dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use secport_cli::config::CliConfig;
use secport_cli::inspect::{run_inspect, InspectArgs};
use secport_cli::normalize::{run_normalize, NormalizeArgs};
use secport_cli::validate::{run_validate, ValidateArgs};

/// secport: versioned secret snapshot tooling.
///
/// Imports snapshot documents through the per-version importers, validates
/// the resulting secrets and writes them back in canonical form.
#[derive(Parser, Debug)]
#[command(name = "secport", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a summary of every secret in a snapshot.
    Inspect(InspectArgs),

    /// Import a snapshot and validate every secret.
    Validate(ValidateArgs),

    /// Re-export a snapshot in canonical form.
    Normalize(NormalizeArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!("secport CLI v{} starting", env!("CARGO_PKG_VERSION"));

    let result = CliConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Inspect(args) => run_inspect(args, &config),
        Commands::Validate(args) => run_validate(args, &config),
        Commands::Normalize(args) => run_normalize(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secport_cli::config::OutputFormat;

    #[test]
    fn cli_parse_inspect() {
        let cli = Cli::try_parse_from(["secport", "inspect", "snap.yaml"]).unwrap();
        match cli.command {
            Commands::Inspect(args) => {
                assert_eq!(args.path, PathBuf::from("snap.yaml"));
                assert!(args.format.is_none());
            }
            other => panic!("expected inspect, got {other:?}"),
        }
    }

    #[test]
    fn cli_parse_inspect_json() {
        let cli = Cli::try_parse_from(["secport", "inspect", "snap.yaml", "--format", "json"]).unwrap();
        if let Commands::Inspect(args) = cli.command {
            assert_eq!(args.format, Some(OutputFormat::Json));
        }
    }

    #[test]
    fn cli_parse_normalize_defaults() {
        let cli = Cli::try_parse_from(["secport", "normalize", "snap.json"]).unwrap();
        if let Commands::Normalize(args) = cli.command {
            assert_eq!(args.version, 1);
            assert!(args.out.is_none());
        } else {
            panic!("expected normalize");
        }
    }

    #[test]
    fn cli_parse_normalize_out() {
        let cli = Cli::try_parse_from([
            "secport", "normalize", "snap.json", "--out", "out.yaml", "--version", "1",
        ])
        .unwrap();
        if let Commands::Normalize(args) = cli.command {
            assert_eq!(args.out, Some(PathBuf::from("out.yaml")));
        }
    }

    #[test]
    fn cli_parse_global_flags() {
        let cli = Cli::try_parse_from(["secport", "-vv", "validate", "snap.yaml", "--config", "c.yaml"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("c.yaml")));
    }

    #[test]
    fn cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["secport"]).is_err());
    }

    #[test]
    fn cli_validate_requires_path() {
        assert!(Cli::try_parse_from(["secport", "validate"]).is_err());
    }
}
