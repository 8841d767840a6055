//! Validation subsystem
//!
//! # Design Principles
//!
//! - Fail fast: the first violation aborts the walk
//! - Every error carries the path from the input root
//! - No partial output on failure
//! - Deterministic: equal (schema, input) pairs give equal results
//! - Stateless between calls

mod engine;
mod errors;
mod path;

pub use engine::{validate_and_coerce, Validator};
pub use errors::{ValidationError, ValidationErrorCode, ValidationFailure, ValidationResult};
pub use path::WalkPath;
