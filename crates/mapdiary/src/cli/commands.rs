//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{ArgGroup, Args, Subcommand, ValueEnum};

/// `list` command arguments.
#[derive(Debug, Args)]
pub struct EntriesCommand {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// `cluster` command arguments.
#[derive(Debug, Args)]
#[command(group(ArgGroup::new("level").required(true).args(["zoom", "span"])))]
pub struct ClusterCommand {
    /// Zoom level to cluster at
    #[arg(short, long, allow_negative_numbers = true)]
    pub zoom: Option<f64>,

    /// Longitude span in degrees; the zoom level is derived from it
    #[arg(short, long)]
    pub span: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// `simulate` command arguments.
#[derive(Debug, Args)]
pub struct SimulateCommand {
    /// Number of region changes to send
    #[arg(short = 'n', long, default_value = "5")]
    pub events: u32,

    /// Delay between region changes in milliseconds
    #[arg(short, long, default_value = "50")]
    pub interval_ms: u64,

    /// Longitude spans to cycle through (defaults to the configured initial span)
    #[arg(short, long = "span", value_name = "DEGREES")]
    pub spans: Vec<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    Plain,
    /// Formatted table
    #[default]
    Table,
    /// JSON output
    Json,
}
