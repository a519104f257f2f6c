//! Nested, serde-friendly declaration of a schema tree.
//!
//! Lets a tree be written as YAML or JSON (fixtures, parser hand-off) and
//! flattened into a [`SchemaTree`]. Ranges and lengths use YANG range syntax,
//! e.g. `"min..10 | 20..100"`.

use super::{LeafType, NodeId, NodeKind, SchemaNode, SchemaTree, TypeKind};
use crate::error::AppResult;
use crate::range::parse_range_expr;
use serde::Deserialize;

/// One node of a nested declaration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeDecl {
    /// Local name.
    pub name: String,
    /// Structural kind, defaults to `container`.
    #[serde(default)]
    pub kind: NodeKind,
    /// Description text.
    #[serde(default)]
    pub description: Option<String>,
    /// `config` statement; absent inherits.
    #[serde(default)]
    pub config: Option<bool>,
    /// `mandatory` statement.
    #[serde(default)]
    pub mandatory: Option<bool>,
    /// Module prefix; absent inherits the parent's.
    #[serde(default)]
    pub prefix: Option<String>,
    /// List keys.
    #[serde(default)]
    pub keys: Vec<String>,
    /// Leaf type.
    #[serde(default, rename = "type")]
    pub leaf_type: Option<TypeDecl>,
    /// Child declarations.
    #[serde(default)]
    pub children: Vec<NodeDecl>,
}

/// Declared leaf type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TypeDecl {
    /// Built-in kind.
    pub kind: TypeKind,
    /// Range expression.
    #[serde(default)]
    pub range: Option<String>,
    /// Length expression.
    #[serde(default)]
    pub length: Option<String>,
    /// Patterns.
    #[serde(default)]
    pub pattern: Vec<String>,
    /// Default value.
    #[serde(default)]
    pub default: Option<String>,
    /// Leafref path.
    #[serde(default)]
    pub path: Option<String>,
    /// Enumeration names or identities.
    #[serde(default, rename = "enum")]
    pub enum_values: Vec<String>,
}

impl TypeDecl {
    fn to_leaf_type(&self) -> AppResult<LeafType> {
        let range = match &self.range {
            Some(expr) => parse_range_expr(expr)?,
            None => Vec::new(),
        };
        let length = match &self.length {
            Some(expr) => parse_range_expr(expr)?,
            None => Vec::new(),
        };
        Ok(LeafType {
            kind: self.kind,
            range,
            length,
            pattern: self.pattern.clone(),
            default: self.default.clone(),
            path: self.path.clone(),
            enum_values: self.enum_values.clone(),
        })
    }
}

impl NodeDecl {
    fn to_node(&self, inherited_prefix: Option<&str>, node_path: &str) -> AppResult<SchemaNode> {
        let leaf_type = self
            .leaf_type
            .as_ref()
            .map(TypeDecl::to_leaf_type)
            .transpose()
            .map_err(|e| e.at_node(node_path))?;
        Ok(SchemaNode {
            name: self.name.clone(),
            kind: self.kind,
            description: self.description.clone(),
            config: self.config.into(),
            mandatory: self.mandatory.into(),
            leaf_type,
            keys: self.keys.clone(),
            namespace_prefix: self
                .prefix
                .clone()
                .or_else(|| inherited_prefix.map(str::to_string)),
        })
    }
}

impl SchemaTree {
    /// Flattens a nested declaration into an arena tree. `decl` becomes the root.
    pub fn from_decl(decl: &NodeDecl) -> AppResult<SchemaTree> {
        let root_path = format!("/{}", decl.name);
        let mut tree = SchemaTree::new(decl.to_node(None, &root_path)?);
        let root = tree.root();
        add_children(&mut tree, root, decl)?;
        Ok(tree)
    }

    /// Parses a YAML declaration and flattens it.
    pub fn from_yaml_str(yaml: &str) -> AppResult<SchemaTree> {
        let decl: NodeDecl = serde_yaml::from_str(yaml)?;
        SchemaTree::from_decl(&decl)
    }
}

fn add_children(tree: &mut SchemaTree, parent: NodeId, decl: &NodeDecl) -> AppResult<()> {
    for child in &decl.children {
        let prefix = tree.node(parent).namespace_prefix.clone();
        let path = format!("{}/{}", tree.node_path(parent).trim_end_matches('/'), child.name);
        let id = tree.add_child(parent, child.to_node(prefix.as_deref(), &path)?)?;
        add_children(tree, id, child)?;
    }
    Ok(())
}
