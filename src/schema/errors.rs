//! Schema definition and registry error types
//!
//! `SchemaDefinitionError` variants are programmer errors raised while a
//! schema is being declared; none of them can occur during validation.

use thiserror::Error;

use crate::types::TypeName;
use crate::validator::ValidationError;

/// Result type for schema construction
pub type SchemaResult<T> = Result<T, SchemaDefinitionError>;

/// Schema construction contract violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaDefinitionError {
    /// Type name is not registered
    #[error("type {0} is not a registered type")]
    UnknownType(String),

    /// Key declared twice on the same object node
    #[error("key {0} has already been defined")]
    DuplicateKey(String),

    /// Index declared twice on the same array node
    #[error("index {0} has already been defined")]
    DuplicateIndex(usize),

    /// Positional item declared past the next free index
    #[error("index {index} skips ahead of next index {next}")]
    NonContiguousIndex { index: usize, next: usize },

    /// `field` called on a non-object node
    #[error("cannot define field for non-object type (got {0})")]
    NotAnObject(TypeName),

    /// `item` called on a non-array node
    #[error("cannot define item for non-array type (got {0})")]
    NotAnArray(TypeName),

    /// Array node already finalized as homogeneous
    #[error("array has been finalized with a single item template")]
    Finalized,

    /// Nested declarations on a scalar type
    #[error("type {0} does not accept nested declarations")]
    BlockNotAccepted(TypeName),

    /// Declarative definition is structurally invalid
    #[error("invalid definition: {0}")]
    InvalidDefinition(String),
}

/// Result type for registry operations
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Schema registry errors
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Definition file unreadable or not valid JSON
    #[error("malformed schema file '{path}': {reason}")]
    Malformed { path: String, reason: String },

    /// Definition parsed but violates a construction rule
    #[error("invalid schema '{path}': {source}")]
    Definition {
        path: String,
        #[source]
        source: SchemaDefinitionError,
    },

    /// (name, action) already taken; registered schemas are immutable
    #[error("schema '{name}' for action '{action}' is already registered")]
    AlreadyRegistered { name: String, action: String },

    #[error("schema '{name}' for action '{action}' not found")]
    UnknownSchema { name: String, action: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl RegistryError {
    pub(crate) fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        RegistryError::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}
