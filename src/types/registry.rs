//! Type registry
//!
//! Registered types:
//! - nil: absent value
//! - boolean: true / false
//! - integer: 64-bit signed integer
//! - float: finite 64-bit floating point
//! - string: UTF-8 string
//! - object: string-keyed map
//! - array: ordered list
//!
//! The registry is a static table. It is the single source of truth for
//! classifying observed values and deciding which coercions exist.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{CoercionError, CoercionResult};
use super::value::Value;

/// Symbolic names of the registered types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeName {
    Nil,
    Boolean,
    Integer,
    Float,
    String,
    Object,
    Array,
}

impl TypeName {
    /// Returns the type name used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            TypeName::Nil => "nil",
            TypeName::Boolean => "boolean",
            TypeName::Integer => "integer",
            TypeName::Float => "float",
            TypeName::String => "string",
            TypeName::Object => "object",
            TypeName::Array => "array",
        }
    }

    /// Returns the registered descriptor for this name.
    pub fn descriptor(&self) -> &'static Type {
        match self {
            TypeName::Nil => &NIL,
            TypeName::Boolean => &BOOLEAN,
            TypeName::Integer => &INTEGER,
            TypeName::Float => &FLOAT,
            TypeName::String => &STRING,
            TypeName::Object => &OBJECT,
            TypeName::Array => &ARRAY,
        }
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable type descriptor.
#[derive(Debug, PartialEq, Eq)]
pub struct Type {
    name: TypeName,
    scalar: bool,
    coercible_from: &'static [TypeName],
}

static NIL: Type = Type {
    name: TypeName::Nil,
    scalar: true,
    coercible_from: &[],
};

static BOOLEAN: Type = Type {
    name: TypeName::Boolean,
    scalar: true,
    coercible_from: &[TypeName::String, TypeName::Integer],
};

static INTEGER: Type = Type {
    name: TypeName::Integer,
    scalar: true,
    coercible_from: &[TypeName::String, TypeName::Float],
};

static FLOAT: Type = Type {
    name: TypeName::Float,
    scalar: true,
    coercible_from: &[TypeName::Integer, TypeName::String],
};

static STRING: Type = Type {
    name: TypeName::String,
    scalar: true,
    coercible_from: &[TypeName::Integer, TypeName::Float, TypeName::Boolean],
};

static OBJECT: Type = Type {
    name: TypeName::Object,
    scalar: false,
    coercible_from: &[],
};

static ARRAY: Type = Type {
    name: TypeName::Array,
    scalar: false,
    coercible_from: &[],
};

static ALL: [&Type; 7] = [&NIL, &BOOLEAN, &INTEGER, &FLOAT, &STRING, &OBJECT, &ARRAY];

impl Type {
    pub fn name(&self) -> TypeName {
        self.name
    }

    pub fn is_scalar(&self) -> bool {
        self.scalar
    }

    /// Object and array types accept nested child declarations.
    pub fn accepts_children(&self) -> bool {
        !self.scalar
    }

    pub fn coercible_from(&self) -> &'static [TypeName] {
        self.coercible_from
    }

    /// Returns true if a value of the observed type can be coerced into this type.
    pub fn can_coerce_from(&self, observed: &Type) -> bool {
        self.coercible_from.contains(&observed.name)
    }

    /// True when `observed` is neither this type nor nil.
    pub fn mismatch(&self, observed: &Type) -> bool {
        observed.name != self.name && observed.name != TypeName::Nil
    }

    /// Converts `value` into this type.
    ///
    /// Only conversions listed in `coercible_from` exist; anything else is
    /// reported as unsupported.
    pub fn coerce(&self, value: &Value) -> CoercionResult<Value> {
        let from = classify(value).map(Type::name);
        let unsupported = || CoercionError::Unsupported {
            from: from.map_or("unknown", |t| t.as_str()),
            to: self.name.as_str(),
        };

        match (self.name, value) {
            (TypeName::Integer, Value::Text(s)) => s
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| CoercionError::invalid(value, self.name)),
            (TypeName::Integer, Value::Float(f)) => {
                if f.is_finite() && f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 {
                    Ok(Value::Int(*f as i64))
                } else {
                    Err(CoercionError::invalid(value, self.name))
                }
            }
            (TypeName::Float, Value::Int(i)) => Ok(Value::Float(*i as f64)),
            (TypeName::Float, Value::Text(s)) => match s.parse::<f64>() {
                Ok(f) if f.is_finite() => Ok(Value::Float(f)),
                _ => Err(CoercionError::invalid(value, self.name)),
            },
            (TypeName::String, Value::Int(i)) => Ok(Value::Text(i.to_string())),
            (TypeName::String, Value::Float(f)) if f.is_finite() => Ok(Value::Text(f.to_string())),
            (TypeName::String, Value::Bool(b)) => Ok(Value::Text(b.to_string())),
            (TypeName::Boolean, Value::Text(s)) => match s.to_ascii_lowercase().as_str() {
                "true" | "t" | "1" | "yes" | "on" => Ok(Value::Bool(true)),
                "false" | "f" | "0" | "no" | "off" => Ok(Value::Bool(false)),
                _ => Err(CoercionError::invalid(value, self.name)),
            },
            (TypeName::Boolean, Value::Int(1)) => Ok(Value::Bool(true)),
            (TypeName::Boolean, Value::Int(0)) => Ok(Value::Bool(false)),
            (TypeName::Boolean, Value::Int(_)) => Err(CoercionError::invalid(value, self.name)),
            _ => Err(unsupported()),
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Looks up a registered type by name or alias (case-insensitive).
pub fn lookup(name: &str) -> Option<&'static Type> {
    let name = match name.to_ascii_lowercase().as_str() {
        "nil" | "null" => TypeName::Nil,
        "boolean" | "bool" => TypeName::Boolean,
        "integer" | "int" => TypeName::Integer,
        "float" | "number" => TypeName::Float,
        "string" | "str" => TypeName::String,
        "object" | "hash" => TypeName::Object,
        "array" | "list" => TypeName::Array,
        _ => return None,
    };
    Some(name.descriptor())
}

/// Infers the registered type of an observed value.
///
/// Classification is exact: no truthiness, no numeric widening. Non-finite
/// floats match no registered type.
pub fn classify(value: &Value) -> Option<&'static Type> {
    match value {
        Value::Nil => Some(&NIL),
        Value::Bool(_) => Some(&BOOLEAN),
        Value::Int(_) => Some(&INTEGER),
        Value::Float(f) if f.is_finite() => Some(&FLOAT),
        Value::Float(_) => None,
        Value::Text(_) => Some(&STRING),
        Value::Seq(_) => Some(&ARRAY),
        Value::Map(_) => Some(&OBJECT),
    }
}

/// Iterates over every registered type.
pub fn all() -> impl Iterator<Item = &'static Type> {
    ALL.iter().copied()
}
