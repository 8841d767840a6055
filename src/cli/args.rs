//! CLI argument definitions using clap
//!
//! Commands:
//! - typed-params validate --schema <file> --input <file|->
//! - typed-params validate --schemas <dir> --name <name> [--action <action>] --input <file|->
//! - typed-params check --schemas <dir>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// typed-params - strict schema validation and coercion for request parameters
#[derive(Parser, Debug)]
#[command(name = "typed-params")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to engine configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Validate and coerce one JSON input
    Validate {
        /// Schema definition file
        #[arg(long, conflicts_with = "schemas", required_unless_present = "schemas")]
        schema: Option<PathBuf>,

        /// Directory of schema definitions
        #[arg(long, requires = "name")]
        schemas: Option<PathBuf>,

        /// Schema name within --schemas
        #[arg(long)]
        name: Option<String>,

        /// Schema action within --schemas
        #[arg(long, default_value = "default")]
        action: String,

        /// Input JSON file, or "-" for stdin
        #[arg(long, default_value = "-")]
        input: PathBuf,
    },

    /// Load every schema definition in a directory and list them
    Check {
        /// Directory of schema definitions
        #[arg(long, default_value = "./schemas")]
        schemas: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
