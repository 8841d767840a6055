//! Coercion error types

use thiserror::Error;

use super::registry::TypeName;
use super::value::Value;

/// Result type for coercions
pub type CoercionResult<T> = Result<T, CoercionError>;

/// A value could not be converted into the declared type.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoercionError {
    /// No conversion exists between the two types
    #[error("no coercion from {from} to {to}")]
    Unsupported {
        from: &'static str,
        to: &'static str,
    },

    /// A conversion exists but this particular value does not convert
    #[error("cannot coerce {value} to {to}")]
    Invalid { value: String, to: TypeName },
}

impl CoercionError {
    pub(crate) fn invalid(value: &Value, to: TypeName) -> Self {
        CoercionError::Invalid {
            value: value.to_string(),
            to,
        }
    }
}
