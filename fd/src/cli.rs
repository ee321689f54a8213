//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// fleetd - package transport fleet simulator
#[derive(Parser)]
#[command(
    name = "fd",
    about = "Coordinate a fleet of transport units moving packages to a terminal",
    version = env!("CARGO_PKG_VERSION"),
    after_help = "Logs are written to: ~/.local/share/fleetd/logs/fleetd.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Launch the coordinator and units until interrupted
    Run {
        /// Number of units (overrides fleet.units)
        #[arg(short, long)]
        units: Option<usize>,

        /// Seed for reproducible runs (overrides fleet.seed)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop after this many seconds
        #[arg(short, long)]
        duration_secs: Option<u64>,

        /// Output format for status lines and the final snapshot
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Print the effective configuration
    Config {
        /// Output format
        #[arg(short, long, default_value = "yaml")]
        format: ConfigFormat,
    },
}

/// Output format for run status
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text or json", s)),
        }
    }
}

/// Output format for the config command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigFormat {
    #[default]
    Yaml,
    Json,
}

impl std::str::FromStr for ConfigFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Self::Yaml),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: yaml or json", s)),
        }
    }
}

/// Path of the log file written by `fd`
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fleetd")
        .join("logs")
        .join("fleetd.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_run() {
        let cli = Cli::parse_from(["fd", "--verbose", "run", "--units", "4", "--seed", "1", "-f", "json"]);
        assert!(cli.verbose);
        match cli.command {
            Command::Run {
                units,
                seed,
                duration_secs,
                format,
            } => {
                assert_eq!(units, Some(4));
                assert_eq!(seed, Some(1));
                assert_eq!(duration_secs, None);
                assert_eq!(format, OutputFormat::Json);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn test_parse_config_format() {
        let cli = Cli::parse_from(["fd", "config", "--format", "json"]);
        assert!(matches!(
            cli.command,
            Command::Config {
                format: ConfigFormat::Json
            }
        ));
        assert!("toml".parse::<ConfigFormat>().is_err());
    }

    #[test]
    fn test_log_path() {
        assert!(get_log_path().ends_with("fleetd/logs/fleetd.log"));
    }
}
