//! CLI argument definitions for servex.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Servex - expose build-settings server credentials as session properties.
#[derive(Parser, Debug)]
#[command(name = "svx")]
#[command(author, version, about = "Expose build-settings server credentials as session properties", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Settings file to read server records from.
    /// Defaults to ./settings.kdl, then ~/.config/servex/settings.kdl.
    /// Can also be set via the SVX_SETTINGS environment variable.
    #[arg(short = 's', long = "settings", global = true, env = "SVX_SETTINGS")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve every server field and print the property table
    Resolve {
        /// User-supplied property override (repeatable). `key=value`, or a
        /// bare `key` which defines "true". Overrides also feed `${...}`
        /// expansion as session properties.
        #[arg(short = 'D', long = "define", value_name = "KEY[=VALUE]")]
        define: Vec<String>,

        /// Print password/passphrase values unmasked in human output
        #[arg(long)]
        show_secrets: bool,
    },

    /// Server record commands
    Servers {
        #[command(subcommand)]
        command: ServerCommands,
    },
}

/// Server record subcommands
#[derive(Subcommand, Debug)]
pub enum ServerCommands {
    /// List server ids with a summary of which fields are set
    List,

    /// Show a single server record
    Show {
        /// Server id (e.g. "deploy")
        id: String,

        /// Print password/passphrase values unmasked in human output
        #[arg(long)]
        show_secrets: bool,
    },
}
