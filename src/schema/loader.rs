//! Schema registry
//!
//! Holds one schema per (name, action) pair:
//! - Schemas are registered once, at boot, and never replaced
//! - Definition files are `*.json` documents in a single directory
//! - A malformed or invalid definition fails the whole load

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use super::definition::SchemaDocument;
use super::errors::{RegistryError, RegistryResult};
use super::node::Schema;
use crate::config::EngineConfig;
use crate::observability::{Event, Logger};
use crate::types::Value;
use crate::validator::Validator;

/// In-memory registry of schemas keyed by (name, action).
#[derive(Debug, Default, Clone)]
pub struct SchemaRegistry {
    schemas: HashMap<(String, String), Arc<Schema>>,
    config: EngineConfig,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry whose validations use `config`.
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            schemas: HashMap::new(),
            config,
        }
    }

    /// Registers a schema. Existing registrations are immutable.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        action: impl Into<String>,
        schema: Schema,
    ) -> RegistryResult<()> {
        let key = (name.into(), action.into());

        if self.schemas.contains_key(&key) {
            return Err(RegistryError::AlreadyRegistered {
                name: key.0,
                action: key.1,
            });
        }

        Logger::info(
            Event::SchemaRegistered,
            &[("name", key.0.as_str()), ("action", key.1.as_str())],
        );
        self.schemas.insert(key, Arc::new(schema));
        Ok(())
    }

    /// Builds and registers a declarative definition.
    pub fn register_document(&mut self, document: &SchemaDocument) -> RegistryResult<()> {
        let schema = document
            .to_schema()
            .map_err(|source| RegistryError::Definition {
                path: "<in-memory>".into(),
                source,
            })?;
        self.register(document.name.clone(), document.action.clone(), schema)
    }

    /// Loads every `*.json` definition in `dir`, in file name order.
    ///
    /// Returns the number of schemas loaded.
    pub fn load_dir(&mut self, dir: &Path) -> RegistryResult<usize> {
        let entries = fs::read_dir(dir).map_err(|e| {
            RegistryError::malformed(
                dir.display().to_string(),
                format!("Failed to read schema directory: {}", e),
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                RegistryError::malformed(
                    dir.display().to_string(),
                    format!("Failed to read directory entry: {}", e),
                )
            })?;

            let path = entry.path();
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        for path in &paths {
            if let Err(e) = self.load_file(path) {
                let file = path.display().to_string();
                let reason = e.to_string();
                Logger::error(
                    Event::SchemaRejected,
                    &[("path", file.as_str()), ("reason", reason.as_str())],
                );
                return Err(e);
            }
        }

        let dir = dir.display().to_string();
        let count = paths.len().to_string();
        Logger::info(
            Event::SchemasLoaded,
            &[("dir", dir.as_str()), ("count", count.as_str())],
        );

        Ok(paths.len())
    }

    /// Loads a single definition file.
    pub fn load_file(&mut self, path: &Path) -> RegistryResult<()> {
        let document = read_document(path)?;
        let schema = document
            .to_schema()
            .map_err(|source| RegistryError::Definition {
                path: path.display().to_string(),
                source,
            })?;
        self.register(document.name, document.action, schema)
    }

    pub fn get(&self, name: &str, action: &str) -> Option<Arc<Schema>> {
        self.schemas
            .get(&(name.to_string(), action.to_string()))
            .cloned()
    }

    pub fn contains(&self, name: &str, action: &str) -> bool {
        self.schemas
            .contains_key(&(name.to_string(), action.to_string()))
    }

    /// Registered (name, action) pairs, sorted.
    pub fn keys(&self) -> Vec<(String, String)> {
        let mut keys: Vec<_> = self.schemas.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Validates `input` against the schema registered for (name, action).
    pub fn validate(&self, name: &str, action: &str, input: &Value) -> RegistryResult<Value> {
        let schema = self.get(name, action).ok_or_else(|| RegistryError::UnknownSchema {
            name: name.to_string(),
            action: action.to_string(),
        })?;

        let output = Validator::with_config(&schema, &self.config).call(input)?;
        Ok(output)
    }
}

/// Reads and parses one definition file.
pub fn read_document(path: &Path) -> RegistryResult<SchemaDocument> {
    let content = fs::read_to_string(path).map_err(|e| {
        RegistryError::malformed(path.display().to_string(), format!("Failed to read file: {}", e))
    })?;

    SchemaDocument::from_json_str(&content).map_err(|e| {
        RegistryError::malformed(path.display().to_string(), format!("Invalid JSON: {}", e))
    })
}
