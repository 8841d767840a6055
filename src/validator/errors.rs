//! Validation error types
//!
//! Error codes:
//! - PARAM_MISSING
//! - PARAM_NIL
//! - PARAM_TYPE_MISMATCH
//! - PARAM_COERCION_FAILED
//! - PARAM_UNPERMITTED_TYPE
//! - PARAM_REQUIRED_KEYS_MISSING
//! - PARAM_KEY_NOT_ALLOWED
//! - PARAM_REQUIRED_ITEMS_MISSING
//! - PARAM_INDEX_NOT_ALLOWED
//! - PARAM_NOT_INCLUDED
//! - PARAM_INVALID
//! - PARAM_TOO_DEEP

use std::fmt;

use thiserror::Error;

use super::path::WalkPath;
use crate::types::TypeName;

/// Stable error codes, one per failure reason
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorCode {
    Missing,
    Nil,
    TypeMismatch,
    CoercionFailed,
    UnpermittedType,
    RequiredKeysMissing,
    KeyNotAllowed,
    RequiredItemsMissing,
    IndexNotAllowed,
    NotIncluded,
    Invalid,
    TooDeep,
}

impl ValidationErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationErrorCode::Missing => "PARAM_MISSING",
            ValidationErrorCode::Nil => "PARAM_NIL",
            ValidationErrorCode::TypeMismatch => "PARAM_TYPE_MISMATCH",
            ValidationErrorCode::CoercionFailed => "PARAM_COERCION_FAILED",
            ValidationErrorCode::UnpermittedType => "PARAM_UNPERMITTED_TYPE",
            ValidationErrorCode::RequiredKeysMissing => "PARAM_REQUIRED_KEYS_MISSING",
            ValidationErrorCode::KeyNotAllowed => "PARAM_KEY_NOT_ALLOWED",
            ValidationErrorCode::RequiredItemsMissing => "PARAM_REQUIRED_ITEMS_MISSING",
            ValidationErrorCode::IndexNotAllowed => "PARAM_INDEX_NOT_ALLOWED",
            ValidationErrorCode::NotIncluded => "PARAM_NOT_INCLUDED",
            ValidationErrorCode::Invalid => "PARAM_INVALID",
            ValidationErrorCode::TooDeep => "PARAM_TOO_DEEP",
        }
    }
}

impl fmt::Display for ValidationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Why a value was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationFailure {
    #[error("is missing")]
    Missing,

    #[error("cannot be nil")]
    Nil,

    /// `received` is "unknown" for values no registered type matches
    #[error("type mismatch (received {received}, expected {expected})")]
    TypeMismatch {
        received: &'static str,
        expected: TypeName,
    },

    #[error("could not be coerced")]
    CoercionFailed,

    /// An undeclared object/array held a nested non-scalar
    #[error("unpermitted type (expected {0} of scalar types)")]
    NonScalarMember(TypeName),

    /// A scalar node received a non-scalar
    #[error("unpermitted type (expected scalar type)")]
    NonScalar,

    #[error("required keys are missing: {0}")]
    RequiredKeysMissing(String),

    #[error("key {0} is not allowed")]
    KeyNotAllowed(String),

    #[error("required items are missing")]
    RequiredItemsMissing,

    #[error("index {0} is not allowed")]
    IndexNotAllowed(usize),

    #[error("not included in set")]
    NotIncluded,

    /// Rejected by a check hook
    #[error("{0}")]
    Invalid(String),

    #[error("input too deeply nested")]
    TooDeep,
}

impl ValidationFailure {
    pub fn code(&self) -> ValidationErrorCode {
        match self {
            ValidationFailure::Missing => ValidationErrorCode::Missing,
            ValidationFailure::Nil => ValidationErrorCode::Nil,
            ValidationFailure::TypeMismatch { .. } => ValidationErrorCode::TypeMismatch,
            ValidationFailure::CoercionFailed => ValidationErrorCode::CoercionFailed,
            ValidationFailure::NonScalarMember(_) | ValidationFailure::NonScalar => {
                ValidationErrorCode::UnpermittedType
            }
            ValidationFailure::RequiredKeysMissing(_) => ValidationErrorCode::RequiredKeysMissing,
            ValidationFailure::KeyNotAllowed(_) => ValidationErrorCode::KeyNotAllowed,
            ValidationFailure::RequiredItemsMissing => ValidationErrorCode::RequiredItemsMissing,
            ValidationFailure::IndexNotAllowed(_) => ValidationErrorCode::IndexNotAllowed,
            ValidationFailure::NotIncluded => ValidationErrorCode::NotIncluded,
            ValidationFailure::Invalid(_) => ValidationErrorCode::Invalid,
            ValidationFailure::TooDeep => ValidationErrorCode::TooDeep,
        }
    }
}

/// The first violation found in an input, with the path to it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{} at {path}: {failure}", .failure.code())]
pub struct ValidationError {
    path: WalkPath,
    failure: ValidationFailure,
}

impl ValidationError {
    pub fn new(path: WalkPath, failure: ValidationFailure) -> Self {
        Self { path, failure }
    }

    pub fn path(&self) -> &WalkPath {
        &self.path
    }

    pub fn failure(&self) -> &ValidationFailure {
        &self.failure
    }

    pub fn code(&self) -> ValidationErrorCode {
        self.failure.code()
    }

    /// Human-readable message without the path
    pub fn message(&self) -> String {
        self.failure.to_string()
    }
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, ValidationError>;
