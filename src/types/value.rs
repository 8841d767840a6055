//! Untyped parameter values
//!
//! Request data arrives as a tree of maps, lists and scalars of unknown
//! shape. `Value` is the closed set of shapes the engine understands; every
//! decision point in the validator matches on it exhaustively.

use std::collections::BTreeMap;
use std::fmt;

/// A dynamically-typed parameter value.
///
/// Maps are key-ordered so that walking a value is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Absent / null
    Nil,
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
    /// UTF-8 string
    Text(String),
    /// Ordered list
    Seq(Vec<Value>),
    /// String-keyed map
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// Returns true for `Nil`.
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Returns true for leaf values (everything except lists and maps).
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Seq(_) | Value::Map(_))
    }

    /// Blank values are nil, whitespace-only strings, and empty collections.
    ///
    /// `false` is a value, not a blank.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Nil => true,
            Value::Text(s) => s.trim().is_empty(),
            Value::Seq(items) => items.is_empty(),
            Value::Map(entries) => entries.is_empty(),
            Value::Bool(_) | Value::Int(_) | Value::Float(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Map(entries) => Some(entries),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Looks up a key in a map value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Parses a JSON document into a value.
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        let json: serde_json::Value = serde_json::from_str(s)?;
        Ok(Value::from(json))
    }

    /// Renders the value as a JSON value.
    ///
    /// Non-finite floats have no JSON representation and render as `null`.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.clone())
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::Seq(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Nil => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(b),
            Value::Int(i) => serde_json::Value::from(i),
            Value::Float(f) => serde_json::Number::from_f64(f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Value::Text(s) => serde_json::Value::String(s),
            Value::Seq(items) => {
                serde_json::Value::Array(items.into_iter().map(Into::into).collect())
            }
            Value::Map(entries) => serde_json::Value::Object(
                entries.into_iter().map(|(k, v)| (k, v.into())).collect(),
            ),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_integers_stay_integers() {
        assert_eq!(Value::from(json!(42)), Value::Int(42));
        assert_eq!(Value::from(json!(-7)), Value::Int(-7));
    }

    #[test]
    fn test_fractional_numbers_become_floats() {
        assert_eq!(Value::from(json!(1.5)), Value::Float(1.5));
    }

    #[test]
    fn test_u64_beyond_i64_becomes_float() {
        let big = Value::from(json!(u64::MAX));
        assert!(matches!(big, Value::Float(_)));
    }

    #[test]
    fn test_nested_conversion() {
        let value = Value::from(json!({ "a": [1, "x", null], "b": { "c": true } }));
        assert_eq!(
            value.get("a"),
            Some(&Value::Seq(vec![
                Value::Int(1),
                Value::Text("x".into()),
                Value::Nil
            ]))
        );
        assert_eq!(value.get("b").and_then(|b| b.get("c")), Some(&Value::Bool(true)));
    }

    #[test]
    fn test_non_finite_float_renders_as_null() {
        assert_eq!(Value::Float(f64::NAN).to_json(), json!(null));
    }

    #[test]
    fn test_blankness() {
        assert!(Value::Nil.is_blank());
        assert!(Value::Text("   ".into()).is_blank());
        assert!(Value::Seq(vec![]).is_blank());
        assert!(Value::Map(BTreeMap::new()).is_blank());
        assert!(!Value::Bool(false).is_blank());
        assert!(!Value::Int(0).is_blank());
        assert!(!Value::Text("x".into()).is_blank());
    }

    #[test]
    fn test_scalars() {
        assert!(Value::Nil.is_scalar());
        assert!(Value::Float(0.5).is_scalar());
        assert!(!Value::Seq(vec![]).is_scalar());
        assert!(!Value::Map(BTreeMap::new()).is_scalar());
    }
}
