//! CLI module for typed-params
//!
//! Provides command-line interface for:
//! - validate: Validate and coerce one JSON input against a schema
//! - check: Load a directory of schema definitions and list them

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{check, load_config, run, run_command, validate};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_input, write_error, write_response};
