//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides configuration)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,

    /// Directory holding record files (overrides configuration)
    #[arg(short, long, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Directory containing view.html and edit.html (overrides configuration)
    #[arg(short, long, value_name = "DIR")]
    pub templates: Option<PathBuf>,
}

/// Record commands, operating on the store directly.
#[derive(Debug, Subcommand)]
pub enum RecordCommand {
    /// Print a record's body
    Show {
        /// Record name (ASCII letters and digits)
        name: String,
    },

    /// Save a record, replacing any previous body
    Save {
        /// Record name (ASCII letters and digits)
        name: String,

        /// The new body
        body: String,
    },
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
