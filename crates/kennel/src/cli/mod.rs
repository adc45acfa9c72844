//! Command-line interface for kennel.
//!
//! This module provides the CLI structure for the `kennel` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::logging::Verbosity;

pub use commands::{ConfigCommand, RecordCommand, ServeCommand};

/// kennel - Keep a profile for every dog
///
/// Serves named text records over HTTP, one file per record.
#[derive(Debug, Parser)]
#[command(name = "kennel")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

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
    /// Run the HTTP service
    Serve(ServeCommand),

    /// Read or write records without the server
    #[command(subcommand)]
    Record(RecordCommand),

    /// View or check configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> Verbosity {
        if self.quiet {
            Verbosity::Quiet
        } else {
            match self.verbose {
                0 => Verbosity::Normal,
                1 => Verbosity::Verbose,
                _ => Verbosity::Trace,
            }
        }
    }
}

impl ServeCommand {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if let Some(bind) = &self.bind {
            config.server.bind_address.clone_from(bind);
        }
        if let Some(dir) = &self.data_dir {
            config.storage.data_dir = Some(dir.clone());
        }
        if let Some(dir) = &self.templates {
            config.render.templates_dir = Some(dir.clone());
        }
    }
}
