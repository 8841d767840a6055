//! CLI command implementations
//!
//! Each command is one-shot:
//! 1. Load configuration (defaults when no file is given)
//! 2. Load schema definitions
//! 3. Read input, validate, write exactly one JSON response line

use std::path::Path;
use std::sync::Arc;

use serde_json::json;

use crate::config::EngineConfig;
use crate::observability::{Event, Logger};
use crate::schema::{read_document, RegistryError, Schema, SchemaRegistry};
use crate::types::Value;
use crate::validator::Validator;

use super::args::Command;
use super::errors::{CliError, CliResult};
use super::io::{read_input, write_error, write_response};

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.config.as_deref(), cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(config: Option<&Path>, cmd: Command) -> CliResult<()> {
    let config = load_config(config)?;

    match cmd {
        Command::Validate {
            schema,
            schemas,
            name,
            action,
            input,
        } => {
            let schema = match (schema, schemas, name) {
                (Some(file), _, _) => single_schema(&file)?,
                (None, Some(dir), Some(name)) => registered_schema(&dir, &name, &action)?,
                _ => return Err(CliError::schema_error("No schema source given")),
            };
            validate(&config, &schema, &input)
        }
        Command::Check { schemas } => check(&schemas),
    }
}

/// Load the engine configuration and apply its log level
pub fn load_config(path: Option<&Path>) -> CliResult<EngineConfig> {
    let config = match path {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    Logger::set_min_severity(config.severity()?);

    let max_depth = config.max_depth.to_string();
    Logger::info(
        Event::ConfigLoaded,
        &[
            ("max_depth", max_depth.as_str()),
            ("log_level", config.log_level.as_str()),
        ],
    );

    Ok(config)
}

fn single_schema(path: &Path) -> CliResult<Arc<Schema>> {
    let document = read_document(path)?;
    let schema = document
        .to_schema()
        .map_err(|e| CliError::schema_error(format!("{}: {}", path.display(), e)))?;
    Ok(Arc::new(schema))
}

fn registered_schema(dir: &Path, name: &str, action: &str) -> CliResult<Arc<Schema>> {
    let mut registry = SchemaRegistry::new();
    registry.load_dir(dir)?;

    registry.get(name, action).ok_or_else(|| {
        CliError::from(RegistryError::UnknownSchema {
            name: name.to_string(),
            action: action.to_string(),
        })
    })
}

/// Validate one input document
///
/// Writes `{"status":"ok","data":...}` on success. On rejection, writes
/// `{"status":"error","code":...,"path":...,"message":...}` and returns an
/// error so the process exits non-zero.
pub fn validate(config: &EngineConfig, schema: &Schema, input_path: &Path) -> CliResult<()> {
    let input = Value::from(read_input(input_path)?);

    match Validator::with_config(schema, config).call(&input) {
        Ok(output) => write_response(output.to_json()),
        Err(err) => {
            let path = err.path().to_string();
            write_error(err.code().code(), Some(&path), &err.message())?;
            Err(CliError::rejected(err.to_string()))
        }
    }
}

/// Load every definition in `dir` and list the registered pairs
pub fn check(dir: &Path) -> CliResult<()> {
    let mut registry = SchemaRegistry::new();
    if let Err(e) = registry.load_dir(dir) {
        let err = CliError::from(e);
        write_error(err.code_str(), None, err.message())?;
        return Err(err);
    }

    let schemas: Vec<_> = registry
        .keys()
        .into_iter()
        .map(|(name, action)| json!({ "name": name, "action": action }))
        .collect();

    write_response(json!({ "schemas": schemas }))
}
