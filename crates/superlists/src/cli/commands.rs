//! CLI command definitions.

use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Serve command arguments.
#[derive(Debug, Args)]
pub struct ServeCommand {
    /// Address to listen on (overrides `server.bind_addr`)
    #[arg(short, long, value_name = "ADDR")]
    pub bind: Option<String>,
}

/// Item management commands.
#[derive(Debug, Subcommand)]
pub enum ItemsCommand {
    /// Print every saved item in list order
    List {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Add an item to the list
    Add {
        /// Text of the new item
        text: String,
    },

    /// Delete every item
    Clear {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
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
