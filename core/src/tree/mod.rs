#![deny(missing_docs)]

//! # Schema Tree
//!
//! The in-memory YANG schema tree handed over by the (external) schema parser.
//!
//! Nodes live in a single arena owned by [`SchemaTree`] and are addressed by
//! [`NodeId`]. Parent links are plain indices, so ancestor traversal never
//! creates ownership cycles; leafref paths are resolved by lookup over these
//! links (see [`crate::leafref`]), never stored as extra edges.

pub mod decl;

use crate::error::{AppError, AppResult};
use crate::range::SubRange;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Index of a node inside its owning [`SchemaTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    pub fn index(self) -> usize {
        self.0
    }
}

/// YANG tri-state flag. `Unset` means "inherit from the parent".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriState {
    /// Explicitly true.
    True,
    /// Explicitly false.
    False,
    /// Not declared on this node.
    #[default]
    Unset,
}

impl TriState {
    /// Returns `true` only for an explicit `True`.
    pub fn is_true(self) -> bool {
        self == TriState::True
    }

    /// Returns `self` when set, otherwise the inherited value.
    pub fn or_inherit(self, inherited: TriState) -> TriState {
        match self {
            TriState::Unset => inherited,
            set => set,
        }
    }
}

impl From<Option<bool>> for TriState {
    fn from(value: Option<bool>) -> Self {
        match value {
            Some(true) => TriState::True,
            Some(false) => TriState::False,
            None => TriState::Unset,
        }
    }
}

/// The structural kind of a schema node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeKind {
    /// Groups children, never repeats.
    #[default]
    Container,
    /// Keyed, repeating group of children.
    List,
    /// Single scalar value.
    Leaf,
    /// Repeating scalar value.
    LeafList,
}

impl NodeKind {
    /// Leaves and leaf-lists carry a type and have no children.
    pub fn is_leaf_like(self) -> bool {
        matches!(self, NodeKind::Leaf | NodeKind::LeafList)
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Container => "container",
            NodeKind::List => "list",
            NodeKind::Leaf => "leaf",
            NodeKind::LeafList => "leaf-list",
        };
        write!(f, "{}", s)
    }
}

/// Built-in YANG type of a leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TypeKind {
    /// `int8`
    Int8,
    /// `int16`
    Int16,
    /// `int32`
    Int32,
    /// `int64`
    Int64,
    /// `uint8`
    Uint8,
    /// `uint16`
    Uint16,
    /// `uint32`
    Uint32,
    /// `uint64`
    Uint64,
    /// `decimal64`
    Decimal64,
    /// `string`
    #[default]
    String,
    /// `boolean`
    Boolean,
    /// `enumeration`
    Enumeration,
    /// `bits`
    Bits,
    /// `binary`
    Binary,
    /// `empty`
    Empty,
    /// `identityref`
    #[serde(rename = "identityref")]
    IdentityRef,
    /// `instance-identifier`
    InstanceIdentifier,
    /// `leafref`
    #[serde(rename = "leafref")]
    LeafRef,
    /// `union`
    Union,
}

impl TypeKind {
    /// The YANG keyword for this type.
    pub fn keyword(self) -> &'static str {
        match self {
            TypeKind::Int8 => "int8",
            TypeKind::Int16 => "int16",
            TypeKind::Int32 => "int32",
            TypeKind::Int64 => "int64",
            TypeKind::Uint8 => "uint8",
            TypeKind::Uint16 => "uint16",
            TypeKind::Uint32 => "uint32",
            TypeKind::Uint64 => "uint64",
            TypeKind::Decimal64 => "decimal64",
            TypeKind::String => "string",
            TypeKind::Boolean => "boolean",
            TypeKind::Enumeration => "enumeration",
            TypeKind::Bits => "bits",
            TypeKind::Binary => "binary",
            TypeKind::Empty => "empty",
            TypeKind::IdentityRef => "identityref",
            TypeKind::InstanceIdentifier => "instance-identifier",
            TypeKind::LeafRef => "leafref",
            TypeKind::Union => "union",
        }
    }

    /// Integer widths, signed and unsigned.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            TypeKind::Int8
                | TypeKind::Int16
                | TypeKind::Int32
                | TypeKind::Int64
                | TypeKind::Uint8
                | TypeKind::Uint16
                | TypeKind::Uint32
                | TypeKind::Uint64
        )
    }

    /// Kinds that accept a `range` restriction.
    pub fn is_numeric(self) -> bool {
        self.is_integer() || self == TypeKind::Decimal64
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// The resolved type of a leaf or leaf-list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LeafType {
    /// Built-in kind.
    pub kind: TypeKind,
    /// Declared `range` sub-ranges, in declaration order.
    pub range: Vec<SubRange>,
    /// Declared `length` sub-ranges, in declaration order.
    pub length: Vec<SubRange>,
    /// Declared `pattern` statements.
    pub pattern: Vec<String>,
    /// Declared default value, as written in the schema.
    pub default: Option<String>,
    /// The leafref path expression (only for [`TypeKind::LeafRef`]).
    pub path: Option<String>,
    /// Enumeration names or identityref identities.
    pub enum_values: Vec<String>,
}

impl LeafType {
    /// Creates an unrestricted type of the given kind.
    pub fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Creates a leafref type pointing at `path`.
    pub fn leafref(path: impl Into<String>) -> Self {
        Self {
            kind: TypeKind::LeafRef,
            path: Some(path.into()),
            ..Self::default()
        }
    }

    /// Sets the range restriction.
    pub fn with_range(mut self, range: Vec<SubRange>) -> Self {
        self.range = range;
        self
    }

    /// Sets the length restriction.
    pub fn with_length(mut self, length: Vec<SubRange>) -> Self {
        self.length = length;
        self
    }

    /// Adds a pattern restriction.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern.push(pattern.into());
        self
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets enumeration names / identities.
    pub fn with_enum_values(mut self, values: Vec<String>) -> Self {
        self.enum_values = values;
        self
    }
}

/// A single node of the schema tree.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    /// Local name, unique among siblings.
    pub name: String,
    /// Structural kind.
    pub kind: NodeKind,
    /// Human readable description.
    pub description: Option<String>,
    /// The `config` statement; `Unset` inherits from the parent.
    pub config: TriState,
    /// The `mandatory` statement.
    pub mandatory: TriState,
    /// Present for leaves and leaf-lists.
    pub leaf_type: Option<LeafType>,
    /// Key leaf names of a list, in declaration order.
    pub keys: Vec<String>,
    /// Short name of the declaring module.
    pub namespace_prefix: Option<String>,
}

impl SchemaNode {
    fn bare(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
            config: TriState::Unset,
            mandatory: TriState::Unset,
            leaf_type: None,
            keys: Vec::new(),
            namespace_prefix: None,
        }
    }

    /// A container node.
    pub fn container(name: impl Into<String>) -> Self {
        Self::bare(name, NodeKind::Container)
    }

    /// A list node keyed by `keys` (may be empty for keyless state lists).
    pub fn list<K: Into<String>>(name: impl Into<String>, keys: impl IntoIterator<Item = K>) -> Self {
        let mut node = Self::bare(name, NodeKind::List);
        node.keys = keys.into_iter().map(Into::into).collect();
        node
    }

    /// A leaf of the given type.
    pub fn leaf(name: impl Into<String>, leaf_type: LeafType) -> Self {
        let mut node = Self::bare(name, NodeKind::Leaf);
        node.leaf_type = Some(leaf_type);
        node
    }

    /// A leaf-list of the given type.
    pub fn leaf_list(name: impl Into<String>, leaf_type: LeafType) -> Self {
        let mut node = Self::bare(name, NodeKind::LeafList);
        node.leaf_type = Some(leaf_type);
        node
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the `config` flag.
    pub fn with_config(mut self, config: TriState) -> Self {
        self.config = config;
        self
    }

    /// Sets the `mandatory` flag.
    pub fn with_mandatory(mut self, mandatory: TriState) -> Self {
        self.mandatory = mandatory;
        self
    }

    /// Sets the declaring module prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.namespace_prefix = Some(prefix.into());
        self
    }

    /// Whether the node repeats (list or leaf-list).
    pub fn is_list(&self) -> bool {
        matches!(self.kind, NodeKind::List | NodeKind::LeafList)
    }
}

#[derive(Debug, Clone)]
struct Slot {
    node: SchemaNode,
    parent: Option<NodeId>,
    children: IndexMap<String, NodeId>,
}

/// Arena-backed schema tree. The first node is the root.
#[derive(Debug, Clone)]
pub struct SchemaTree {
    slots: Vec<Slot>,
}

impl SchemaTree {
    /// Creates a tree holding only `root`.
    pub fn new(root: SchemaNode) -> Self {
        Self {
            slots: vec![Slot {
                node: root,
                parent: None,
                children: IndexMap::new(),
            }],
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Appends `node` as the last child of `parent`.
    ///
    /// Fails when `parent` is a leaf, when the name is already taken among the
    /// siblings, or when a leaf/leaf-list is missing its type.
    pub fn add_child(&mut self, parent: NodeId, node: SchemaNode) -> AppResult<NodeId> {
        let parent_slot = self
            .slots
            .get(parent.0)
            .ok_or_else(|| AppError::InvalidTree(format!("unknown parent node #{}", parent.0)))?;
        if parent_slot.node.kind.is_leaf_like() {
            return Err(AppError::InvalidTree(format!(
                "{} '{}' cannot have children ({})",
                parent_slot.node.kind,
                self.node_path(parent),
                node.name
            )));
        }
        if parent_slot.children.contains_key(&node.name) {
            return Err(AppError::InvalidTree(format!(
                "duplicate child '{}' under {}",
                node.name,
                self.node_path(parent)
            )));
        }
        if node.kind.is_leaf_like() && node.leaf_type.is_none() {
            return Err(AppError::InvalidTree(format!(
                "{} '{}' under {} has no type",
                node.kind,
                node.name,
                self.node_path(parent)
            )));
        }

        let id = NodeId(self.slots.len());
        let name = node.name.clone();
        self.slots.push(Slot {
            node,
            parent: Some(parent),
            children: IndexMap::new(),
        });
        self.slots[parent.0].children.insert(name, id);
        Ok(id)
    }

    /// The node stored at `id`.
    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.slots[id.0].node
    }

    /// The parent of `id`, `None` for the root.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slots[id.0].parent
    }

    /// Children of `id` in declaration order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.slots[id.0].children.values().copied()
    }

    /// Looks up a direct child by local name.
    pub fn child_by_name(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.slots[id.0].children.get(name).copied()
    }

    /// Strict ancestors of `id`, nearest first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&p| self.parent(p))
    }

    /// Full `/a/b/c` path of a node, used in diagnostics. Unnamed roots are skipped.
    pub fn node_path(&self, id: NodeId) -> String {
        let mut names: Vec<&str> = self
            .ancestors(id)
            .map(|a| self.node(a).name.as_str())
            .collect();
        names.reverse();
        names.push(self.node(id).name.as_str());

        let mut path = String::new();
        for name in names.into_iter().filter(|n| !n.is_empty()) {
            path.push('/');
            path.push_str(name);
        }
        if path.is_empty() {
            path.push('/');
        }
        path
    }

    /// Resolves the `config` flag: own value if set, else the nearest set ancestor.
    pub fn effective_config(&self, id: NodeId) -> TriState {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .map(|n| self.node(n).config)
            .find(|c| *c != TriState::Unset)
            .unwrap_or(TriState::Unset)
    }

    /// A node is writable unless its effective `config` is `false`.
    pub fn is_writable(&self, id: NodeId) -> bool {
        self.effective_config(id) != TriState::False
    }
}
