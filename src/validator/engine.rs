//! Validation and coercion engine
//!
//! Walks an input tree in lock-step with a schema, depth-first, and returns
//! either a new output tree or the first violation found.
//!
//! At every node:
//! 1. Classify the observed value (unknown values are rejected)
//! 2. Nil handling, before any type check
//! 3. Type match, or coercion when enabled and supported
//! 4. Structure: keyed children, positional/homogeneous items, or scalar leaf
//! 5. Hooks: inclusion, then check, then transform
//!
//! The walk is stateless between calls. Unknown keys/indices are rejected
//! in strict schemas and dropped otherwise.

use std::borrow::Cow;
use std::collections::BTreeMap;

use indexmap::IndexMap;

use super::errors::{ValidationError, ValidationFailure, ValidationResult};
use super::path::WalkPath;
use crate::config::{EngineConfig, MAX_DEPTH_LIMIT};
use crate::observability::{Event, Logger};
use crate::schema::{Children, NodeId, Schema, SchemaNode};
use crate::types::{classify, TypeName, Value};

/// Validates inputs against one schema.
///
/// Holds no mutable state; a single validator may be shared across threads.
#[derive(Debug, Clone, Copy)]
pub struct Validator<'s> {
    schema: &'s Schema,
    max_depth: usize,
}

impl<'s> Validator<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self::with_config(schema, &EngineConfig::default())
    }

    pub fn with_config(schema: &'s Schema, config: &EngineConfig) -> Self {
        Self {
            schema,
            max_depth: config.max_depth.clamp(1, MAX_DEPTH_LIMIT),
        }
    }

    pub fn schema(&self) -> &'s Schema {
        self.schema
    }

    /// Reduces `input` to an output tree according to the schema.
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` encountered; no partial output is
    /// produced.
    pub fn call(&self, input: &Value) -> ValidationResult<Value> {
        let mut path = WalkPath::root();
        let result = self.call_root(input, &mut path);

        match &result {
            Ok(_) => Logger::trace(Event::ValidationPassed, &[]),
            Err(err) => {
                let event = match err.failure() {
                    ValidationFailure::TooDeep => Event::DepthLimitExceeded,
                    _ => Event::ValidationFailed,
                };
                let path = err.path().to_string();
                let message = err.message();
                Logger::trace(
                    event,
                    &[
                        ("code", err.code().code()),
                        ("path", path.as_str()),
                        ("message", message.as_str()),
                    ],
                );
            }
        }

        result
    }

    fn call_root(&self, input: &Value, path: &mut WalkPath) -> ValidationResult<Value> {
        let root = self.schema.root_node();
        if input.is_nil() && root.is_required() && !root.allows_nil() {
            return Err(fail(path, ValidationFailure::Missing));
        }

        self.visit(self.schema.root_id(), input, path, 0)
    }

    fn visit(&self, id: NodeId, input: &Value, path: &mut WalkPath, depth: usize) -> ValidationResult<Value> {
        if depth > self.max_depth {
            return Err(fail(path, ValidationFailure::TooDeep));
        }

        let node = self.schema.node(id);
        let declared = node.node_type();

        let observed = classify(input).ok_or_else(|| {
            fail(
                path,
                ValidationFailure::TypeMismatch {
                    received: "unknown",
                    expected: declared.name(),
                },
            )
        })?;

        if input.is_nil() {
            return if declared.name() == TypeName::Nil || node.is_optional() || node.allows_nil() {
                Ok(Value::Nil)
            } else {
                Err(fail(path, ValidationFailure::Nil))
            };
        }

        let value = if declared.mismatch(observed) {
            if !(node.coerces() && declared.can_coerce_from(observed)) {
                return Err(fail(
                    path,
                    ValidationFailure::TypeMismatch {
                        received: observed.name().as_str(),
                        expected: declared.name(),
                    },
                ));
            }
            let coerced = declared
                .coerce(input)
                .map_err(|_| fail(path, ValidationFailure::CoercionFailed))?;
            Cow::Owned(coerced)
        } else {
            Cow::Borrowed(input)
        };

        let output = match (&node.children, &*value) {
            (Children::Keyed(keys), Value::Map(entries)) if keys.is_empty() => {
                self.undeclared_map(node, entries, path, depth)?
            }
            (Children::Keyed(keys), Value::Map(entries)) => self.keyed(keys, entries, path, depth)?,
            (Children::Positional(items), Value::Seq(values)) if items.is_empty() => {
                self.undeclared_seq(node, values, path, depth)?
            }
            (Children::Positional(_), Value::Seq(values)) | (Children::Homogeneous(_), Value::Seq(values)) => {
                self.indexed(id, values, path, depth)?
            }
            (Children::Scalar, leaf) if leaf.is_scalar() => leaf.clone(),
            (Children::Scalar, _) => return Err(fail(path, ValidationFailure::NonScalar)),
            (_, other) => {
                return Err(fail(
                    path,
                    ValidationFailure::TypeMismatch {
                        received: classify(other).map_or("unknown", |t| t.name().as_str()),
                        expected: declared.name(),
                    },
                ))
            }
        };

        apply_hooks(node, output, path)
    }

    fn keyed(
        &self,
        keys: &IndexMap<String, NodeId>,
        entries: &BTreeMap<String, Value>,
        path: &mut WalkPath,
        depth: usize,
    ) -> ValidationResult<Value> {
        // First missing required key, in declaration order. A value that
        // would be skipped counts as missing.
        let missing = keys.iter().find(|(key, id)| {
            let child = self.schema.node(**id);
            child.is_required() && entries.get(key.as_str()).map_or(true, |value| skipped(child, value))
        });
        if let Some((key, _)) = missing {
            return Err(fail(path, ValidationFailure::RequiredKeysMissing(key.clone())));
        }

        let mut output = BTreeMap::new();
        for (key, value) in entries {
            let Some(&child_id) = keys.get(key.as_str()) else {
                if self.schema.is_strict() {
                    path.push_key(key);
                    return Err(fail(path, ValidationFailure::KeyNotAllowed(key.clone())));
                }
                continue;
            };

            if skipped(self.schema.node(child_id), value) {
                continue;
            }

            path.push_key(key);
            let result = self.visit(child_id, value, path, depth + 1)?;
            path.pop();
            output.insert(key.clone(), result);
        }

        Ok(Value::Map(output))
    }

    fn indexed(&self, id: NodeId, values: &[Value], path: &mut WalkPath, depth: usize) -> ValidationResult<Value> {
        let positional = match &self.schema.node(id).children {
            Children::Positional(items) => {
                let missing = items.iter().enumerate().any(|(index, item)| {
                    let child = self.schema.node(*item);
                    child.is_required() && values.get(index).map_or(true, |value| skipped(child, value))
                });
                if missing {
                    return Err(fail(path, ValidationFailure::RequiredItemsMissing));
                }
                true
            }
            _ => false,
        };

        let mut output = Vec::with_capacity(values.len());
        for (index, value) in values.iter().enumerate() {
            let Some(child_id) = self.schema.item(id, index) else {
                if self.schema.is_strict() {
                    path.push_index(index);
                    return Err(fail(path, ValidationFailure::IndexNotAllowed(index)));
                }
                continue;
            };

            // Positions are significant: a skipped positional item keeps its
            // slot as nil. Homogeneous elements are simply dropped.
            if skipped(self.schema.node(child_id), value) {
                if positional {
                    output.push(Value::Nil);
                }
                continue;
            }

            path.push_index(index);
            let result = self.visit(child_id, value, path, depth + 1)?;
            path.pop();
            output.push(result);
        }

        Ok(Value::Seq(output))
    }

    fn undeclared_map(
        &self,
        node: &SchemaNode,
        entries: &BTreeMap<String, Value>,
        path: &mut WalkPath,
        depth: usize,
    ) -> ValidationResult<Value> {
        for (key, value) in entries {
            path.push_key(key);
            self.check_member(node, TypeName::Object, value, path, depth + 1)?;
            path.pop();
        }
        Ok(Value::Map(entries.clone()))
    }

    fn undeclared_seq(
        &self,
        node: &SchemaNode,
        values: &[Value],
        path: &mut WalkPath,
        depth: usize,
    ) -> ValidationResult<Value> {
        for (index, value) in values.iter().enumerate() {
            path.push_index(index);
            self.check_member(node, TypeName::Array, value, path, depth + 1)?;
            path.pop();
        }
        Ok(Value::Seq(values.to_vec()))
    }

    /// Members of an object/array with no declared children must be scalars,
    /// unless the node allows nested non-scalars; those are copied as-is
    /// within the depth limit.
    fn check_member(
        &self,
        node: &SchemaNode,
        container: TypeName,
        value: &Value,
        path: &WalkPath,
        depth: usize,
    ) -> ValidationResult<()> {
        if value.is_scalar() {
            return Ok(());
        }
        if !node.allows_non_scalars() {
            return Err(fail(path, ValidationFailure::NonScalarMember(container)));
        }
        if depth + nesting_depth(value) > self.max_depth {
            return Err(fail(path, ValidationFailure::TooDeep));
        }
        Ok(())
    }
}

/// Blank values of blank-rejecting children, and nils of optional children,
/// are dropped from the output.
fn skipped(child: &SchemaNode, value: &Value) -> bool {
    (!child.allows_blank() && value.is_blank()) || (child.is_optional() && value.is_nil())
}

fn apply_hooks(node: &SchemaNode, value: Value, path: &WalkPath) -> ValidationResult<Value> {
    if !node.inclusion().is_empty() && !node.inclusion().contains(&value) {
        return Err(fail(path, ValidationFailure::NotIncluded));
    }

    if let Some(check) = node.check() {
        check.run(&value).map_err(|message| {
            fail(
                path,
                ValidationFailure::Invalid(message.unwrap_or_else(|| "is invalid".to_string())),
            )
        })?;
    }

    Ok(match node.transform() {
        Some(transform) => transform.apply(value),
        None => value,
    })
}

/// Levels of collections below `value` (0 for scalars). Iterative so that
/// adversarial inputs cannot exhaust the stack here.
fn nesting_depth(value: &Value) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(value, 0usize)];
    while let Some((current, level)) = stack.pop() {
        match current {
            Value::Seq(items) => stack.extend(items.iter().map(|v| (v, level + 1))),
            Value::Map(entries) => stack.extend(entries.values().map(|v| (v, level + 1))),
            _ => deepest = deepest.max(level),
        }
        if !current.is_scalar() {
            deepest = deepest.max(level + 1);
        }
    }
    deepest.saturating_sub(1)
}

fn fail(path: &WalkPath, failure: ValidationFailure) -> ValidationError {
    ValidationError::new(path.clone(), failure)
}

/// Validates and coerces `input` against `schema` with default settings.
pub fn validate_and_coerce(schema: &Schema, input: &Value) -> ValidationResult<Value> {
    Validator::new(schema).call(input)
}
