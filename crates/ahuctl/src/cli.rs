//! CLI - Command-line argument parsing
//!
//! Defines the CLI structure using clap.
//! Keeps argument parsing separate from execution logic.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// AHU alarm doctor CLI
#[derive(Parser, Debug)]
#[command(name = "ahuctl")]
#[command(
    about = "AHU alarm doctor - likely causes and corrective actions for BAS alarm messages",
    long_about = None
)]
#[command(version = env!("AHUCTL_VERSION"))]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    /// Config file (overrides $AHU_CONFIG and the standard locations)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Knowledge base file (overrides the config file and the standard locations)
    #[arg(long, global = true, value_name = "PATH")]
    pub kb: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Plain output without colors
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Diagnose an alarm message (reads stdin when no text is given)
    Diagnose {
        /// Alarm text, e.g. "Filter DP high on AHU F201"
        text: Vec<String>,

        /// Leave the diagnosis time out of the report
        #[arg(long)]
        no_timestamp: bool,

        /// Output the report as JSON
        #[arg(long, conflicts_with = "summary")]
        json: bool,

        /// Output the copyable plain-text summary
        #[arg(long)]
        summary: bool,

        /// Show which matching tier found each alarm type, and why
        #[arg(long)]
        explain: bool,
    },

    /// List the known alarm types and their keywords
    List,

    /// Show one alarm type in detail
    Show {
        /// Alarm type id, e.g. "pump_failure"
        id: String,
    },

    /// Print the active knowledge base as TOML
    ExportKb,

    /// Write a default config file (defaults to ~/.config/ahu/config.toml)
    InitConfig {
        path: Option<PathBuf>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_diagnose_words() {
        let cli = Cli::try_parse_from(["ahuctl", "diagnose", "Filter", "DP", "high"]).unwrap();
        match cli.command {
            Commands::Diagnose { text, json, .. } => {
                assert_eq!(text, vec!["Filter", "DP", "high"]);
                assert!(!json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "ahuctl",
            "list",
            "--kb",
            "/tmp/alarms.toml",
            "--no-color",
            "-v",
        ])
        .unwrap();
        assert_eq!(cli.kb, Some(PathBuf::from("/tmp/alarms.toml")));
        assert!(cli.no_color);
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::List));
    }

    #[test]
    fn test_json_conflicts_with_summary() {
        assert!(Cli::try_parse_from(["ahuctl", "diagnose", "--json", "--summary", "x"]).is_err());
    }

    #[test]
    fn test_show_requires_id() {
        assert!(Cli::try_parse_from(["ahuctl", "show"]).is_err());
        let cli = Cli::try_parse_from(["ahuctl", "show", "pump_failure"]).unwrap();
        assert!(matches!(cli.command, Commands::Show { id } if id == "pump_failure"));
    }

    #[test]
    fn test_init_config_path_is_optional() {
        let cli = Cli::try_parse_from(["ahuctl", "init-config"]).unwrap();
        assert!(matches!(cli.command, Commands::InitConfig { path: None }));
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
