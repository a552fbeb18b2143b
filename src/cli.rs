//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::{ConfigError, HomeConfig};

#[derive(Debug, Parser)]
#[command(name = "homeload", version, about = "Price-aware household appliance control")]
pub struct Cli {
    /// Load configuration from a TOML file
    #[arg(long, global = true, conflicts_with = "preset")]
    pub config: Option<PathBuf>,

    /// Use a built-in preset (demo, apartment)
    #[arg(long, global = true)]
    pub preset: Option<String>,

    /// Write logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the banded price day used by the simulation
    Bands,
    /// Simulate one day of household load and appliance control
    Simulate(SimulateArgs),
    /// Run the control service and HTTP api
    #[cfg(feature = "api")]
    Run,
}

#[derive(Debug, Args)]
pub struct SimulateArgs {
    /// Override the random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Export step results to CSV
    #[arg(long)]
    pub telemetry_out: Option<PathBuf>,
}

impl Cli {
    /// Loads the selected configuration; the `demo` preset when none is given.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` for an unreadable file, invalid TOML or an
    /// unknown preset.
    pub fn load_config(&self) -> Result<HomeConfig, ConfigError> {
        match (&self.config, &self.preset) {
            (Some(path), _) => HomeConfig::from_toml_file(path),
            (None, Some(name)) => HomeConfig::from_preset(name),
            (None, None) => Ok(HomeConfig::demo()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("homeload").chain(args.iter().copied()))
    }

    #[test]
    fn supports_config_cli() {
        let cli = parse(&["--config", "home.toml", "bands"]).expect("parse should succeed");
        assert_eq!(
            cli.config.as_deref().and_then(|p| p.to_str()),
            Some("home.toml")
        );
        assert!(cli.preset.is_none());
        assert!(matches!(cli.command, Command::Bands));
    }

    #[test]
    fn supports_preset_after_subcommand() {
        let cli = parse(&["simulate", "--preset", "apartment", "--seed", "7"])
            .expect("parse should succeed");
        assert_eq!(cli.preset.as_deref(), Some("apartment"));
        match cli.command {
            Command::Simulate(args) => {
                assert_eq!(args.seed, Some(7));
                assert!(args.telemetry_out.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn config_and_preset_are_mutually_exclusive() {
        assert!(parse(&["--config", "a.toml", "--preset", "demo", "bands"]).is_err());
    }

    #[test]
    fn subcommand_is_required() {
        assert!(parse(&["--json-logs"]).is_err());
    }

    #[test]
    fn defaults_to_demo_preset() {
        let cli = parse(&["bands"]).expect("parse should succeed");
        let cfg = cli.load_config().expect("demo loads");
        assert_eq!(cfg.appliances.len(), HomeConfig::demo().appliances.len());
    }

    #[test]
    fn unknown_preset_fails_to_load() {
        let cli = parse(&["--preset", "castle", "bands"]).expect("parse should succeed");
        assert!(cli.load_config().is_err());
    }
}
