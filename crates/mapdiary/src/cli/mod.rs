//! Command-line interface for mapdiary.
//!
//! This module provides the CLI structure for the `mapdiary` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{ClusterCommand, ConfigCommand, EntriesCommand, OutputFormat, SimulateCommand};

/// mapdiary - Trip entries on a zoom-aware map
///
/// Lists diary entries, clusters them for a given zoom level and replays
/// viewport changes through the debounced map viewport.
#[derive(Debug, Parser)]
#[command(name = "mapdiary")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// JSON file of entries (overrides the configured source)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub entries: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List diary entries
    #[command(name = "list")]
    List(EntriesCommand),

    /// Cluster entries for one zoom level
    Cluster(ClusterCommand),

    /// Replay a burst of viewport changes through the debouncer
    Simulate(SimulateCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub const fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}
