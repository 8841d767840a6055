//! Value model and type registry
//!
//! Every comparison the validator makes goes through this module:
//! - `Value` is the closed set of observed shapes
//! - `registry::classify` maps a value to its registered `Type`
//! - `Type::coerce` performs the conversions a type declares

mod errors;
pub mod registry;
mod value;

pub use errors::{CoercionError, CoercionResult};
pub use registry::{classify, lookup, Type, TypeName};
pub use value::Value;
