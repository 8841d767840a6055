//! Schema subsystem
//!
//! Schemas are declared once, at boot, and are immutable afterwards.
//!
//! # Design Principles
//!
//! - Construction errors surface at declaration time, never at first use
//! - Node children always agree with the node type
//! - Homogeneous arrays are a distinct variant, fixed when declared
//! - Strictness is a property of the whole schema
//! - Schemas can be declared in code (builder) or in JSON (definitions)

mod builder;
mod definition;
mod errors;
mod loader;
mod node;

pub use builder::{NodeBuilder, SchemaBuilder};
pub use definition::{ParamDefinition, SchemaDocument};
pub use errors::{RegistryError, RegistryResult, SchemaDefinitionError, SchemaResult};
pub use loader::{read_document, SchemaRegistry};
pub use node::{Check, Children, NodeId, NodeKey, ParamOptions, Schema, SchemaNode, Transform};
