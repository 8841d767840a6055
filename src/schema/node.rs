//! Schema node definitions
//!
//! A schema is an arena of nodes addressed by `NodeId`. Parents own their
//! children through the arena; the `parent` link on each node is
//! navigation only.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::types::{Type, TypeName, Value};

/// Index of a node within its schema's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Position of a node under its parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKey {
    /// Key under an object node
    Field(String),
    /// Index under an array node
    Index(usize),
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKey::Field(key) => f.write_str(key),
            NodeKey::Index(i) => write!(f, "{}", i),
        }
    }
}

/// Children of a node. The variant always agrees with the node's type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    /// Scalar types never have children
    Scalar,
    /// Object children, in declaration order
    Keyed(IndexMap<String, NodeId>),
    /// Array children matched by position
    Positional(Vec<NodeId>),
    /// Array children matched by a single template
    Homogeneous(NodeId),
}

impl Children {
    pub(crate) fn for_type(ty: TypeName) -> Self {
        match ty {
            TypeName::Object => Children::Keyed(IndexMap::new()),
            TypeName::Array => Children::Positional(Vec::new()),
            _ => Children::Scalar,
        }
    }

    /// True for object/array nodes with nothing declared beneath them.
    pub fn is_undeclared(&self) -> bool {
        match self {
            Children::Scalar => false,
            Children::Keyed(keys) => keys.is_empty(),
            Children::Positional(items) => items.is_empty(),
            Children::Homogeneous(_) => false,
        }
    }
}

/// Pure value-to-value mapping applied after every check has passed.
#[derive(Clone)]
pub struct Transform(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl Transform {
    pub fn new(f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn apply(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform(..)")
    }
}

/// Validation hook attached to a node.
#[derive(Clone)]
pub enum Check {
    /// Accepts or rejects; rejection uses the default message
    Predicate(Arc<dyn Fn(&Value) -> bool + Send + Sync>),
    /// Rejects with its own message
    Verify(Arc<dyn Fn(&Value) -> Result<(), String> + Send + Sync>),
}

impl Check {
    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Check::Predicate(Arc::new(f))
    }

    pub fn verify(f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static) -> Self {
        Check::Verify(Arc::new(f))
    }

    /// Runs the hook. `Err(None)` means rejected without a message.
    pub fn run(&self, value: &Value) -> Result<(), Option<String>> {
        match self {
            Check::Predicate(f) => {
                if f(value) {
                    Ok(())
                } else {
                    Err(None)
                }
            }
            Check::Verify(f) => f(value).map_err(Some),
        }
    }
}

impl fmt::Debug for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Predicate(_) => f.write_str("Check::Predicate(..)"),
            Check::Verify(_) => f.write_str("Check::Verify(..)"),
        }
    }
}

/// Per-node options.
///
/// Defaults: required, nil rejected, blanks passed through, no coercion,
/// no nested non-scalars, unconstrained inclusion, no hooks.
#[derive(Debug, Clone)]
pub struct ParamOptions {
    pub(crate) optional: bool,
    pub(crate) allow_nil: bool,
    pub(crate) allow_blank: bool,
    pub(crate) coerce: bool,
    pub(crate) allow_non_scalars: bool,
    pub(crate) inclusion: Vec<Value>,
    pub(crate) transform: Option<Transform>,
    pub(crate) check: Option<Check>,
}

impl Default for ParamOptions {
    fn default() -> Self {
        Self {
            optional: false,
            allow_nil: false,
            allow_blank: true,
            coerce: false,
            allow_non_scalars: false,
            inclusion: Vec::new(),
            transform: None,
            check: None,
        }
    }
}

impl ParamOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn allow_nil(mut self) -> Self {
        self.allow_nil = true;
        self
    }

    pub fn allow_blank(mut self, allow: bool) -> Self {
        self.allow_blank = allow;
        self
    }

    pub fn coerce(mut self) -> Self {
        self.coerce = true;
        self
    }

    pub fn allow_non_scalars(mut self) -> Self {
        self.allow_non_scalars = true;
        self
    }

    pub fn inclusion<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.inclusion = values.into_iter().map(Into::into).collect();
        self
    }

    pub fn transform(mut self, f: impl Fn(Value) -> Value + Send + Sync + 'static) -> Self {
        self.transform = Some(Transform::new(f));
        self
    }

    pub fn validate(mut self, f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        self.check = Some(Check::predicate(f));
        self
    }

    pub fn verify(mut self, f: impl Fn(&Value) -> Result<(), String> + Send + Sync + 'static) -> Self {
        self.check = Some(Check::verify(f));
        self
    }
}

/// One declared field or array item.
#[derive(Debug, Clone)]
pub struct SchemaNode {
    pub(crate) key: Option<NodeKey>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) node_type: &'static Type,
    pub(crate) options: ParamOptions,
    pub(crate) children: Children,
}

impl SchemaNode {
    pub(crate) fn new(
        key: Option<NodeKey>,
        parent: Option<NodeId>,
        ty: TypeName,
        options: ParamOptions,
    ) -> Self {
        Self {
            key,
            parent,
            node_type: ty.descriptor(),
            options,
            children: Children::for_type(ty),
        }
    }

    /// Key under the parent; `None` for the root.
    pub fn key(&self) -> Option<&NodeKey> {
        self.key.as_ref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn node_type(&self) -> &'static Type {
        self.node_type
    }

    pub fn children(&self) -> &Children {
        &self.children
    }

    pub fn is_optional(&self) -> bool {
        self.options.optional
    }

    pub fn is_required(&self) -> bool {
        !self.options.optional
    }

    pub fn allows_nil(&self) -> bool {
        self.options.allow_nil
    }

    pub fn allows_blank(&self) -> bool {
        self.options.allow_blank
    }

    pub fn coerces(&self) -> bool {
        self.options.coerce
    }

    pub fn allows_non_scalars(&self) -> bool {
        self.options.allow_non_scalars
    }

    pub fn inclusion(&self) -> &[Value] {
        &self.options.inclusion
    }

    pub fn transform(&self) -> Option<&Transform> {
        self.options.transform.as_ref()
    }

    pub fn check(&self) -> Option<&Check> {
        self.options.check.as_ref()
    }
}

/// An immutable schema tree.
#[derive(Debug, Clone)]
pub struct Schema {
    pub(crate) nodes: Vec<SchemaNode>,
    pub(crate) strict: bool,
}

impl Schema {
    pub(crate) const ROOT: NodeId = NodeId(0);

    pub fn root_id(&self) -> NodeId {
        Self::ROOT
    }

    pub fn root_node(&self) -> &SchemaNode {
        self.node(Self::ROOT)
    }

    /// Returns a node. Ids are only handed out by the schema that owns them.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id.0]
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Number of declared nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Resolves the node declared for `key` under an object node.
    pub fn child(&self, id: NodeId, key: &str) -> Option<NodeId> {
        match &self.node(id).children {
            Children::Keyed(keys) => keys.get(key).copied(),
            _ => None,
        }
    }

    /// Resolves the node that applies to `index` under an array node.
    pub fn item(&self, id: NodeId, index: usize) -> Option<NodeId> {
        match &self.node(id).children {
            Children::Positional(items) => items.get(index).copied(),
            Children::Homogeneous(template) => Some(*template),
            _ => None,
        }
    }

    /// Walks parent links from `id` back to the root.
    pub fn path_of(&self, id: NodeId) -> Vec<NodeKey> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.node(node_id);
            if let Some(key) = &node.key {
                path.push(key.clone());
            }
            current = node.parent;
        }
        path.reverse();
        path
    }
}
