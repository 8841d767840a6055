//! Schema builder
//!
//! Schemas are declared once, through nested closures, and are immutable
//! afterwards:
//!
//! ```ignore
//! let schema = Schema::build(true, |root| {
//!     root.object("machine", ParamOptions::new(), |machine| {
//!         machine.field("fingerprint", TypeName::String, ParamOptions::new())?;
//!         machine.field("name", TypeName::String, ParamOptions::new().optional())?;
//!         Ok(())
//!     })?;
//!     Ok(())
//! })?;
//! ```
//!
//! Every contract violation is returned as a `SchemaDefinitionError` at
//! declaration time.

use super::errors::{SchemaDefinitionError, SchemaResult};
use super::node::{Children, NodeId, NodeKey, ParamOptions, Schema, SchemaNode};
use crate::types::TypeName;

/// Builds a schema from its root node.
#[derive(Debug)]
pub struct SchemaBuilder {
    nodes: Vec<SchemaNode>,
    strict: bool,
}

impl SchemaBuilder {
    /// Starts a schema whose root has the given type and options.
    ///
    /// `strict` applies to every object and array node in the tree.
    pub fn new(ty: TypeName, options: ParamOptions, strict: bool) -> Self {
        Self {
            nodes: vec![SchemaNode::new(None, None, ty, options)],
            strict,
        }
    }

    /// Runs the nested declarations for the root and freezes the schema.
    pub fn define<F>(mut self, f: F) -> SchemaResult<Schema>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> SchemaResult<()>,
    {
        let ty = self.nodes[Schema::ROOT.0].node_type.name();
        if !ty.descriptor().accepts_children() {
            return Err(SchemaDefinitionError::BlockNotAccepted(ty));
        }

        let mut root = NodeBuilder {
            nodes: &mut self.nodes,
            id: Schema::ROOT,
        };
        f(&mut root)?;

        Ok(self.finish())
    }

    /// Freezes the schema without nested declarations.
    pub fn finish(self) -> Schema {
        Schema {
            nodes: self.nodes,
            strict: self.strict,
        }
    }
}

impl Schema {
    /// Declares a schema with an object root.
    pub fn build<F>(strict: bool, f: F) -> SchemaResult<Schema>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> SchemaResult<()>,
    {
        SchemaBuilder::new(TypeName::Object, ParamOptions::default(), strict).define(f)
    }

    /// Starts a schema with an arbitrary root type.
    pub fn root(ty: TypeName, options: ParamOptions, strict: bool) -> SchemaBuilder {
        SchemaBuilder::new(ty, options, strict)
    }
}

/// Declares children beneath one node.
pub struct NodeBuilder<'a> {
    nodes: &'a mut Vec<SchemaNode>,
    id: NodeId,
}

impl<'a> NodeBuilder<'a> {
    /// The node being declared.
    pub fn id(&self) -> NodeId {
        self.id
    }

    fn node(&self) -> &SchemaNode {
        &self.nodes[self.id.0]
    }

    fn node_type(&self) -> TypeName {
        self.node().node_type.name()
    }

    /// Declares a keyed field on an object node.
    pub fn field(
        &mut self,
        key: impl Into<String>,
        ty: TypeName,
        options: ParamOptions,
    ) -> SchemaResult<NodeId> {
        self.attach_field(key.into(), ty, options)
    }

    /// Declares a keyed object/array field and its nested children.
    pub fn field_with<F>(
        &mut self,
        key: impl Into<String>,
        ty: TypeName,
        options: ParamOptions,
        f: F,
    ) -> SchemaResult<NodeId>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> SchemaResult<()>,
    {
        reject_scalar_block(ty)?;
        let child = self.attach_field(key.into(), ty, options)?;
        self.nest(child, f)?;
        Ok(child)
    }

    pub fn object<F>(&mut self, key: impl Into<String>, options: ParamOptions, f: F) -> SchemaResult<NodeId>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> SchemaResult<()>,
    {
        self.field_with(key, TypeName::Object, options, f)
    }

    pub fn array<F>(&mut self, key: impl Into<String>, options: ParamOptions, f: F) -> SchemaResult<NodeId>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> SchemaResult<()>,
    {
        self.field_with(key, TypeName::Array, options, f)
    }

    /// Declares the next positional item on an array node.
    pub fn item(&mut self, ty: TypeName, options: ParamOptions) -> SchemaResult<NodeId> {
        self.attach_item(None, ty, options)
    }

    /// Declares a positional item at an explicit index.
    ///
    /// Indices must be declared in order without gaps.
    pub fn item_at(&mut self, index: usize, ty: TypeName, options: ParamOptions) -> SchemaResult<NodeId> {
        self.attach_item(Some(index), ty, options)
    }

    /// Declares the next positional object/array item and its nested children.
    pub fn item_with<F>(&mut self, ty: TypeName, options: ParamOptions, f: F) -> SchemaResult<NodeId>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> SchemaResult<()>,
    {
        reject_scalar_block(ty)?;
        let child = self.attach_item(None, ty, options)?;
        self.nest(child, f)?;
        Ok(child)
    }

    /// Declares the single template applied to every element and finalizes
    /// the array node.
    pub fn items(&mut self, ty: TypeName, options: ParamOptions) -> SchemaResult<NodeId> {
        self.attach_template(ty, options)
    }

    /// Declares an object/array template with nested children and finalizes
    /// the array node.
    pub fn items_with<F>(&mut self, ty: TypeName, options: ParamOptions, f: F) -> SchemaResult<NodeId>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> SchemaResult<()>,
    {
        reject_scalar_block(ty)?;
        let child = self.attach_template(ty, options)?;
        self.nest(child, f)?;
        Ok(child)
    }

    fn attach_field(&mut self, key: String, ty: TypeName, options: ParamOptions) -> SchemaResult<NodeId> {
        match &self.node().children {
            Children::Keyed(keys) if keys.contains_key(&key) => {
                return Err(SchemaDefinitionError::DuplicateKey(key));
            }
            Children::Keyed(_) => {}
            _ => return Err(SchemaDefinitionError::NotAnObject(self.node_type())),
        }

        let child = self.push(NodeKey::Field(key.clone()), ty, options);
        if let Children::Keyed(keys) = &mut self.nodes[self.id.0].children {
            keys.insert(key, child);
        }
        Ok(child)
    }

    fn attach_item(&mut self, index: Option<usize>, ty: TypeName, options: ParamOptions) -> SchemaResult<NodeId> {
        let index = match &self.node().children {
            Children::Positional(items) => {
                let next = items.len();
                let index = index.unwrap_or(next);
                if index < next {
                    return Err(SchemaDefinitionError::DuplicateIndex(index));
                }
                if index > next {
                    return Err(SchemaDefinitionError::NonContiguousIndex { index, next });
                }
                index
            }
            Children::Homogeneous(_) => return Err(SchemaDefinitionError::Finalized),
            _ => return Err(SchemaDefinitionError::NotAnArray(self.node_type())),
        };

        let child = self.push(NodeKey::Index(index), ty, options);
        if let Children::Positional(items) = &mut self.nodes[self.id.0].children {
            items.push(child);
        }
        Ok(child)
    }

    fn attach_template(&mut self, ty: TypeName, options: ParamOptions) -> SchemaResult<NodeId> {
        match &self.node().children {
            Children::Positional(items) if items.is_empty() => {}
            Children::Positional(_) => return Err(SchemaDefinitionError::DuplicateIndex(0)),
            Children::Homogeneous(_) => return Err(SchemaDefinitionError::Finalized),
            _ => return Err(SchemaDefinitionError::NotAnArray(self.node_type())),
        }

        let template = self.push(NodeKey::Index(0), ty, options);
        self.nodes[self.id.0].children = Children::Homogeneous(template);
        Ok(template)
    }

    fn push(&mut self, key: NodeKey, ty: TypeName, options: ParamOptions) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(SchemaNode::new(Some(key), Some(self.id), ty, options));
        id
    }

    fn nest<F>(&mut self, id: NodeId, f: F) -> SchemaResult<()>
    where
        F: FnOnce(&mut NodeBuilder<'_>) -> SchemaResult<()>,
    {
        let mut nested = NodeBuilder {
            nodes: &mut *self.nodes,
            id,
        };
        f(&mut nested)
    }
}

fn reject_scalar_block(ty: TypeName) -> SchemaResult<()> {
    if ty.descriptor().accepts_children() {
        Ok(())
    } else {
        Err(SchemaDefinitionError::BlockNotAccepted(ty))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_declaration() {
        let schema = Schema::build(true, |root| {
            root.object("user", ParamOptions::new(), |user| {
                user.field("name", TypeName::String, ParamOptions::new())?;
                user.array("tags", ParamOptions::new().optional(), |tags| {
                    tags.items(TypeName::String, ParamOptions::new())?;
                    Ok(())
                })?;
                Ok(())
            })?;
            Ok(())
        })
        .unwrap();

        assert_eq!(schema.len(), 5);
        let user = schema.child(schema.root_id(), "user").unwrap();
        let tags = schema.child(user, "tags").unwrap();
        let template = schema.item(tags, 42).unwrap();
        assert_eq!(schema.node(template).node_type().name(), TypeName::String);
        assert_eq!(
            schema.path_of(template),
            vec![
                NodeKey::Field("user".into()),
                NodeKey::Field("tags".into()),
                NodeKey::Index(0)
            ]
        );
    }

    #[test]
    fn test_children_match_node_type() {
        let schema = Schema::build(false, |root| {
            root.field("s", TypeName::String, ParamOptions::new())?;
            root.field("o", TypeName::Object, ParamOptions::new())?;
            root.field("a", TypeName::Array, ParamOptions::new())?;
            Ok(())
        })
        .unwrap();

        let s = schema.child(schema.root_id(), "s").unwrap();
        let o = schema.child(schema.root_id(), "o").unwrap();
        let a = schema.child(schema.root_id(), "a").unwrap();
        assert_eq!(schema.node(s).children(), &Children::Scalar);
        assert!(matches!(schema.node(o).children(), Children::Keyed(_)));
        assert!(matches!(schema.node(a).children(), Children::Positional(_)));
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = Schema::build(true, |root| {
            root.field("a", TypeName::String, ParamOptions::new())?;
            root.field("a", TypeName::Integer, ParamOptions::new())?;
            Ok(())
        });
        assert_eq!(result.unwrap_err(), SchemaDefinitionError::DuplicateKey("a".into()));
    }

    #[test]
    fn test_item_on_object_rejected() {
        let result = Schema::build(true, |root| {
            root.item(TypeName::String, ParamOptions::new())?;
            Ok(())
        });
        assert_eq!(result.unwrap_err(), SchemaDefinitionError::NotAnArray(TypeName::Object));
    }

    #[test]
    fn test_field_on_array_rejected() {
        let result = Schema::root(TypeName::Array, ParamOptions::new(), true).define(|root| {
            root.field("a", TypeName::String, ParamOptions::new())?;
            Ok(())
        });
        assert_eq!(result.unwrap_err(), SchemaDefinitionError::NotAnObject(TypeName::Array));
    }

    #[test]
    fn test_item_after_finalize_rejected() {
        let result = Schema::root(TypeName::Array, ParamOptions::new(), true).define(|root| {
            root.items(TypeName::String, ParamOptions::new())?;
            root.item(TypeName::String, ParamOptions::new())?;
            Ok(())
        });
        assert_eq!(result.unwrap_err(), SchemaDefinitionError::Finalized);
    }

    #[test]
    fn test_items_after_positional_rejected() {
        let result = Schema::root(TypeName::Array, ParamOptions::new(), true).define(|root| {
            root.item(TypeName::String, ParamOptions::new())?;
            root.items(TypeName::String, ParamOptions::new())?;
            Ok(())
        });
        assert_eq!(result.unwrap_err(), SchemaDefinitionError::DuplicateIndex(0));
    }

    #[test]
    fn test_explicit_indices() {
        let result = Schema::root(TypeName::Array, ParamOptions::new(), true).define(|root| {
            root.item_at(0, TypeName::String, ParamOptions::new())?;
            root.item_at(0, TypeName::String, ParamOptions::new())?;
            Ok(())
        });
        assert_eq!(result.unwrap_err(), SchemaDefinitionError::DuplicateIndex(0));

        let result = Schema::root(TypeName::Array, ParamOptions::new(), true).define(|root| {
            root.item_at(2, TypeName::String, ParamOptions::new())?;
            Ok(())
        });
        assert_eq!(
            result.unwrap_err(),
            SchemaDefinitionError::NonContiguousIndex { index: 2, next: 0 }
        );
    }

    #[test]
    fn test_block_on_scalar_rejected() {
        let result = Schema::build(true, |root| {
            root.field_with("name", TypeName::String, ParamOptions::new(), |_| Ok(()))?;
            Ok(())
        });
        assert_eq!(result.unwrap_err(), SchemaDefinitionError::BlockNotAccepted(TypeName::String));

        let result = Schema::root(TypeName::Integer, ParamOptions::new(), true).define(|_| Ok(()));
        assert_eq!(result.unwrap_err(), SchemaDefinitionError::BlockNotAccepted(TypeName::Integer));
    }

    #[test]
    fn test_strict_is_schema_wide() {
        let schema = Schema::build(true, |_| Ok(())).unwrap();
        assert!(schema.is_strict());
        let schema = Schema::root(TypeName::String, ParamOptions::new(), false).finish();
        assert!(!schema.is_strict());
        assert_eq!(schema.root_node().children(), &Children::Scalar);
    }
}
