//! typed-params - declarative schema validation and coercion for request parameters
//!
//! A schema is a tree of typed nodes declared once at boot. The validator
//! walks an untrusted input tree against it and returns either a new,
//! coerced output tree containing only declared keys, or the first
//! violation with the path where it occurred.
//!
//! ```
//! use typed_params::{ParamOptions, Schema, TypeName, Value, validate_and_coerce};
//!
//! let schema = Schema::build(true, |root| {
//!     root.field("name", TypeName::String, ParamOptions::new())?;
//!     root.field("age", TypeName::Integer, ParamOptions::new().coerce().optional())?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let input = Value::from_json_str(r#"{"name": "Ada", "age": "36"}"#).unwrap();
//! let output = validate_and_coerce(&schema, &input).unwrap();
//! assert_eq!(output.get("age"), Some(&Value::Int(36)));
//! ```

pub mod cli;
pub mod config;
pub mod observability;
pub mod schema;
pub mod types;
pub mod validator;

pub use config::EngineConfig;
pub use schema::{ParamOptions, Schema, SchemaDefinitionError, SchemaRegistry};
pub use types::{TypeName, Value};
pub use validator::{validate_and_coerce, ValidationError, ValidationErrorCode, Validator};
