//! Declarative schema definitions
//!
//! A definition file describes one schema for one action:
//!
//! ```json
//! {
//!   "name": "policies",
//!   "action": "create",
//!   "strict": true,
//!   "params": {
//!     "type": "object",
//!     "fields": [
//!       { "key": "policy", "type": "object", "fields": [
//!         { "key": "product", "type": "string" },
//!         { "key": "duration", "type": "integer", "optional": true, "coerce": true }
//!       ] }
//!     ]
//!   }
//! }
//! ```
//!
//! Definitions are turned into schemas through the builder, so they are
//! subject to the same construction rules as hand-written schemas.
//! Hooks cannot be expressed declaratively.

use serde::{Deserialize, Serialize};

use super::builder::NodeBuilder;
use super::errors::{SchemaDefinitionError, SchemaResult};
use super::node::{ParamOptions, Schema};
use crate::types::{lookup, TypeName, Value};

fn default_action() -> String {
    "default".to_string()
}

fn default_true() -> bool {
    true
}

/// One schema file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SchemaDocument {
    /// Schema name, e.g. the resource it guards
    pub name: String,

    /// Action the schema applies to (e.g. "create", "update")
    #[serde(default = "default_action")]
    pub action: String,

    /// Reject undeclared keys and indices
    #[serde(default = "default_true")]
    pub strict: bool,

    /// Root parameter
    pub params: ParamDefinition,
}

/// One parameter node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParamDefinition {
    /// Key under the parent object (fields only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    /// Registered type name or alias
    #[serde(rename = "type")]
    pub type_name: String,

    #[serde(default)]
    pub optional: bool,

    #[serde(default)]
    pub allow_nil: bool,

    #[serde(default = "default_true")]
    pub allow_blank: bool,

    #[serde(default)]
    pub coerce: bool,

    #[serde(default)]
    pub allow_non_scalars: bool,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inclusion: Vec<serde_json::Value>,

    /// Keyed children of an object
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<ParamDefinition>>,

    /// Positional children of an array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ParamDefinition>>,

    /// Template applied to every element of an array
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub each: Option<Box<ParamDefinition>>,
}

impl SchemaDocument {
    pub fn from_json_str(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Builds the schema described by this document.
    pub fn to_schema(&self) -> SchemaResult<Schema> {
        let ty = self.params.resolve_type()?;
        let builder = Schema::root(ty, self.params.options(), self.strict);

        if self.params.has_children() {
            builder.define(|root| self.params.declare_children(root))
        } else {
            Ok(builder.finish())
        }
    }
}

impl ParamDefinition {
    fn resolve_type(&self) -> SchemaResult<TypeName> {
        lookup(&self.type_name)
            .map(|t| t.name())
            .ok_or_else(|| SchemaDefinitionError::UnknownType(self.type_name.clone()))
    }

    fn has_children(&self) -> bool {
        self.fields.is_some() || self.items.is_some() || self.each.is_some()
    }

    fn options(&self) -> ParamOptions {
        ParamOptions {
            optional: self.optional,
            allow_nil: self.allow_nil,
            allow_blank: self.allow_blank,
            coerce: self.coerce,
            allow_non_scalars: self.allow_non_scalars,
            inclusion: self.inclusion.iter().cloned().map(Value::from).collect(),
            ..ParamOptions::default()
        }
    }

    fn declare_children(&self, node: &mut NodeBuilder<'_>) -> SchemaResult<()> {
        if self.items.is_some() && self.each.is_some() {
            return Err(SchemaDefinitionError::InvalidDefinition(
                "an array declares either items or each, not both".into(),
            ));
        }

        for field in self.fields.iter().flatten() {
            let key = field.key.clone().ok_or_else(|| {
                SchemaDefinitionError::InvalidDefinition(format!(
                    "field of type {} has no key",
                    field.type_name
                ))
            })?;
            let ty = field.resolve_type()?;
            if field.has_children() {
                node.field_with(key, ty, field.options(), |child| field.declare_children(child))?;
            } else {
                node.field(key, ty, field.options())?;
            }
        }

        for item in self.items.iter().flatten() {
            let ty = item.resolve_type()?;
            if item.has_children() {
                node.item_with(ty, item.options(), |child| item.declare_children(child))?;
            } else {
                node.item(ty, item.options())?;
            }
        }

        if let Some(template) = &self.each {
            let ty = template.resolve_type()?;
            if template.has_children() {
                node.items_with(ty, template.options(), |child| template.declare_children(child))?;
            } else {
                node.items(ty, template.options())?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::Children;
    use serde_json::json;

    fn document(params: serde_json::Value) -> SchemaDocument {
        serde_json::from_value(json!({ "name": "test", "params": params })).unwrap()
    }

    #[test]
    fn test_defaults() {
        let doc = document(json!({ "type": "object" }));
        assert_eq!(doc.action, "default");
        assert!(doc.strict);
        assert!(doc.params.allow_blank);
        assert!(!doc.params.optional);
    }

    #[test]
    fn test_nested_definition() {
        let doc = document(json!({
            "type": "hash",
            "fields": [
                { "key": "name", "type": "string" },
                { "key": "tags", "type": "array", "optional": true, "each": { "type": "string" } },
                { "key": "pair", "type": "array", "items": [{ "type": "int" }, { "type": "bool" }] }
            ]
        }));
        let schema = doc.to_schema().unwrap();

        let tags = schema.child(schema.root_id(), "tags").unwrap();
        assert!(schema.node(tags).is_optional());
        assert!(matches!(schema.node(tags).children(), Children::Homogeneous(_)));

        let pair = schema.child(schema.root_id(), "pair").unwrap();
        let second = schema.item(pair, 1).unwrap();
        assert_eq!(schema.node(second).node_type().name(), TypeName::Boolean);
        assert!(schema.item(pair, 2).is_none());
    }

    #[test]
    fn test_inclusion_values() {
        let doc = document(json!({
            "type": "object",
            "fields": [{ "key": "color", "type": "string", "inclusion": ["red", "blue"] }]
        }));
        let schema = doc.to_schema().unwrap();
        let color = schema.child(schema.root_id(), "color").unwrap();
        assert_eq!(schema.node(color).inclusion(), &[Value::from("red"), Value::from("blue")]);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let doc = document(json!({ "type": "object", "fields": [{ "key": "x", "type": "decimal" }] }));
        assert_eq!(
            doc.to_schema().unwrap_err(),
            SchemaDefinitionError::UnknownType("decimal".into())
        );
    }

    #[test]
    fn test_construction_errors_surface() {
        let doc = document(json!({
            "type": "object",
            "fields": [{ "key": "a", "type": "string" }, { "key": "a", "type": "string" }]
        }));
        assert_eq!(doc.to_schema().unwrap_err(), SchemaDefinitionError::DuplicateKey("a".into()));

        let doc = document(json!({
            "type": "object",
            "fields": [{ "key": "a", "type": "string", "fields": [] }]
        }));
        assert_eq!(
            doc.to_schema().unwrap_err(),
            SchemaDefinitionError::BlockNotAccepted(TypeName::String)
        );

        let doc = document(json!({ "type": "array", "fields": [{ "key": "a", "type": "string" }] }));
        assert_eq!(doc.to_schema().unwrap_err(), SchemaDefinitionError::NotAnObject(TypeName::Array));
    }

    #[test]
    fn test_items_and_each_conflict() {
        let doc = document(json!({
            "type": "array",
            "items": [{ "type": "string" }],
            "each": { "type": "string" }
        }));
        assert!(matches!(
            doc.to_schema().unwrap_err(),
            SchemaDefinitionError::InvalidDefinition(_)
        ));
    }

    #[test]
    fn test_field_without_key() {
        let doc = document(json!({ "type": "object", "fields": [{ "type": "string" }] }));
        assert!(matches!(
            doc.to_schema().unwrap_err(),
            SchemaDefinitionError::InvalidDefinition(_)
        ));
    }

    #[test]
    fn test_unknown_attribute_rejected() {
        let result: Result<SchemaDocument, _> = serde_json::from_value(json!({
            "name": "test",
            "params": { "type": "object", "requried": true }
        }));
        assert!(result.is_err());
    }
}
